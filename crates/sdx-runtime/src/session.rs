//! Session lifecycle: bind, begin/end bracketing, teardown.
//!
//! All state the runtime keeps between calls lives here, owned by an
//! explicit `Session` object instead of process-wide globals. The host
//! constructs it at bind time and the outer `end` tears everything
//! down.

use crate::error::{RuntimeError, RuntimeResult};
use sdx_core::ScratchArena;
use sdx_kernels::{InvertScratch, IrrStreams};

/// Magic words a host handle must carry to prove layout compatibility.
pub const SESSION_MAGIC_START: u32 = 0x3F27_8CB1;
pub const SESSION_MAGIC_END: u32 = 0x872E_1DF3;

/// Host/extension interface version. A host built against a different
/// version must not bind.
pub const RUNTIME_VERSION: u32 = 62051;

/// Version of the function table itself; bumped whenever descriptors
/// change so the host can tell a stale model to be reformed.
pub const FUNCTION_TABLE_VERSION: u16 = 1;

/// The handle a host presents when binding.
#[derive(Clone, Copy, Debug)]
pub struct SessionHandle {
    pub magic_start: u32,
    pub version: u32,
    pub magic_end: u32,
}

impl SessionHandle {
    /// A handle as a compatible host would build it.
    pub fn current() -> Self {
        Self {
            magic_start: SESSION_MAGIC_START,
            version: RUNTIME_VERSION,
            magic_end: SESSION_MAGIC_END,
        }
    }
}

/// One bound host session. Owns the scratch arena and every kernel's
/// persistent state; never shared across threads (the host serializes
/// all calls).
#[derive(Debug, Default)]
pub struct Session {
    pub(crate) arena: ScratchArena,
    pub(crate) invert_scratch: InvertScratch,
    pub(crate) irr_streams: IrrStreams,
}

impl Session {
    /// Validate the host's handle and construct the session. Rejects a
    /// handle whose magic words or version do not match this build.
    pub fn bind(handle: &SessionHandle) -> RuntimeResult<Self> {
        if handle.magic_start != SESSION_MAGIC_START || handle.magic_end != SESSION_MAGIC_END {
            return Err(RuntimeError::SessionRejected {
                what: "magic word mismatch",
            });
        }
        if handle.version != RUNTIME_VERSION {
            return Err(RuntimeError::SessionRejected {
                what: "interface version mismatch",
            });
        }
        Ok(Session::default())
    }

    /// Bracket the start of a simulation run. The outer call is the
    /// place to refuse a run; this runtime has nothing to refuse.
    pub fn begin(&mut self, _outer: bool) {}

    /// Bracket the end of a simulation run. The outer call frees every
    /// scratch block and destroys all per-stream state; inner calls
    /// (repeated during optimization) keep state alive.
    pub fn end(&mut self, outer: bool) {
        if outer {
            self.arena.clear();
            self.invert_scratch.reset();
            self.irr_streams.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_accepts_current_handle() {
        assert!(Session::bind(&SessionHandle::current()).is_ok());
    }

    #[test]
    fn bind_rejects_bad_magic() {
        let mut handle = SessionHandle::current();
        handle.magic_end ^= 1;
        assert!(matches!(
            Session::bind(&handle),
            Err(RuntimeError::SessionRejected { .. })
        ));
    }

    #[test]
    fn bind_rejects_version_mismatch() {
        let mut handle = SessionHandle::current();
        handle.version = RUNTIME_VERSION - 1;
        assert!(Session::bind(&handle).is_err());
    }

    #[test]
    fn outer_end_clears_everything() {
        let mut session = Session::bind(&SessionHandle::current()).unwrap();
        session.begin(true);
        session.arena.allocate(4).unwrap();
        session.irr_streams.find_or_create(1).unwrap();

        session.end(false);
        assert!(!session.arena.is_empty());

        session.end(true);
        assert!(session.arena.is_empty());
        assert!(session.irr_streams.is_empty());
    }
}

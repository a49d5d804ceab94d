//! sdx-runtime: registry, dispatch and session lifecycle for the sdx
//! extension runtime.
//!
//! The host binds once at load time, enumerates the function table,
//! then drives every extension-backed equation through
//! [`Session::dispatch`]. All persistent state (scratch arena, IRR
//! streams, inversion scratch) is owned by the [`Session`] object and
//! torn down by the outer [`Session::end`].

pub mod dispatch;
pub mod error;
pub mod registry;
pub mod session;

pub use error::{RuntimeError, RuntimeResult};
pub use registry::{
    enumerate, FunctionDescriptor, FunctionId, LoopKind, Mutability, FUNCTION_TABLE,
};
pub use session::{
    Session, SessionHandle, FUNCTION_TABLE_VERSION, RUNTIME_VERSION, SESSION_MAGIC_END,
    SESSION_MAGIC_START,
};

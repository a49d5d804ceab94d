//! sdx-core: stable foundation for the sdx extension runtime.
//!
//! Contains:
//! - numeric (Real + the host's "not available" sentinel)
//! - error (shared error types)
//! - host (the capability trait the kernels call back through)
//! - arena (the tracked scratch pool reused across evaluations)

pub mod arena;
pub mod error;
pub mod host;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use arena::{BlockHandle, IndexHandle, ScratchArena};
pub use error::{CoreError, CoreResult};
pub use host::{DataStorage, HostBridge, LoopOutcome, Severity, TimeAxis};
pub use numeric::*;

//! Error types for the dispatch boundary.

use sdx_args::ArgError;
use sdx_kernels::KernelError;
use thiserror::Error;

/// Errors surfaced to the host at the dispatch boundary.
///
/// `UnknownFunction` is recoverable: it signals a library/model version
/// mismatch and never touches argument storage. Everything else is
/// fatal to the current evaluation and has already been reported
/// through the host bridge by the time it propagates.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Unknown function id {id}")]
    UnknownFunction { id: u16 },

    #[error("Host session rejected: {what}")]
    SessionRejected { what: &'static str },

    #[error("Argument error: {0}")]
    Arg(#[from] ArgError),

    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

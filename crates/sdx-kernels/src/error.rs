//! Error types for kernel evaluation.

use sdx_args::ArgError;
use sdx_core::CoreError;
use thiserror::Error;

/// Errors that abort a kernel evaluation. Convergence failures and
/// singular matrices are not errors: they are reported as diagnostics
/// and the kernel still produces a result.
#[derive(Error, Debug)]
pub enum KernelError {
    #[error("Argument error: {0}")]
    Arg(#[from] ArgError),

    #[error("Scratch error: {0}")]
    Scratch(#[from] CoreError),
}

pub type KernelResult<T> = Result<T, KernelError>;

//! sdx-kernels: the numerical kernels behind the extension functions.
//!
//! Provides:
//! - Square-matrix inversion via LU decomposition with partial pivoting
//!   (in-place and out-of-place), with arena-backed grow-only scratch
//! - Host-coupled iterative zero-finder driving the host's own loop
//! - Streaming per-identifier internal-rate-of-return solver
//! - Piecewise-linear lookup evaluation with out-of-range clamping
//! - The simple scalar functions and the two declaration-only fills

pub mod basic;
pub mod define;
pub mod error;
pub mod interp;
pub mod invert;
pub mod irr;
pub mod zero;

#[cfg(test)]
pub(crate) mod testhost;

pub use error::{KernelError, KernelResult};
pub use interp::lookup_evaluate;
pub use invert::{matrix_invert, matrix_invert_in_place, InvertScratch};
pub use irr::{internal_ror, IrrStream, IrrStreams};
pub use zero::find_zero;

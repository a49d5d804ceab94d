//! sdx-args: argument marshalling for the sdx extension runtime.
//!
//! Provides:
//! - ShapeInfo (per-dimension extents/volumes + pure flat-offset math)
//! - ArgValue (the closed set of argument variants crossing the host
//!   boundary) and VectorArg with bounds-checked range validation
//! - LookupTable (piecewise-linear samples + current-index cache)

pub mod error;
pub mod lookup;
pub mod shape;
pub mod value;

// Re-exports for ergonomics
pub use error::{ArgError, ArgResult};
pub use lookup::LookupTable;
pub use shape::ShapeInfo;
pub use value::{ArgValue, ConstantMatrix, DataMatrix, VectorArg};
pub use value::{CONSTANT_MATRIX_KEY, DATA_MATRIX_KEY};

//! Piecewise-linear lookup table arguments.

use crate::error::{ArgError, ArgResult};
use sdx_core::Real;

/// A lookup-table handle: parallel x/y samples, a signed sample count
/// (negative marks the host's alternate "lookup definition" table kind),
/// and the host's current-index cache.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LookupTable {
    xs: Vec<Real>,
    ys: Vec<Real>,
    signed_count: i64,
    cached_index: usize,
}

impl LookupTable {
    /// Build a table from parallel samples sorted by x.
    pub fn new(xs: Vec<Real>, ys: Vec<Real>) -> ArgResult<Self> {
        if xs.len() != ys.len() {
            return Err(ArgError::InvalidShape {
                what: "lookup x and y sample counts differ",
            });
        }
        let signed_count = xs.len() as i64;
        Ok(Self {
            xs,
            ys,
            signed_count,
            cached_index: 0,
        })
    }

    /// Mark this table as the host's alternate table kind, encoded as a
    /// negative sample count. Callers take the absolute value.
    pub fn into_alternate_kind(mut self) -> Self {
        self.signed_count = -self.signed_count;
        self
    }

    pub fn is_alternate_kind(&self) -> bool {
        self.signed_count < 0
    }

    /// Effective sample count; absolute value of the signed encoding.
    pub fn sample_count(&self) -> usize {
        self.signed_count.unsigned_abs() as usize
    }

    pub fn xs(&self) -> &[Real] {
        &self.xs
    }

    pub fn ys(&self) -> &[Real] {
        &self.ys
    }

    pub fn cached_index(&self) -> usize {
        self.cached_index
    }

    /// Remember the interval located by the last evaluation.
    pub fn set_cached_index(&mut self, index: usize) {
        self.cached_index = index;
    }
}

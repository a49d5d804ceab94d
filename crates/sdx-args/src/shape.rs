//! Dimension metadata for vector/matrix arguments.
//!
//! The host flattens every array argument to contiguous storage with the
//! last subscript varying fastest. `ShapeInfo` carries the per-dimension
//! extents plus the precomputed "volume" of each dimension (the product
//! of all faster-varying extents), so flat offsets are a pure dot
//! product that can be tested independently of any kernel.

use crate::error::{ArgError, ArgResult};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeInfo {
    extents: Vec<usize>,
    volumes: Vec<usize>,
}

impl ShapeInfo {
    /// Build shape metadata from per-dimension extents, outermost first.
    /// Every extent must be at least 1.
    pub fn new(extents: &[usize]) -> ArgResult<Self> {
        if extents.is_empty() {
            return Err(ArgError::InvalidShape {
                what: "shape must have at least one dimension",
            });
        }
        if extents.iter().any(|&e| e == 0) {
            return Err(ArgError::InvalidShape {
                what: "every extent must be at least 1",
            });
        }
        let mut volumes = vec![1usize; extents.len()];
        for i in (0..extents.len() - 1).rev() {
            volumes[i] = volumes[i + 1] * extents[i + 1];
        }
        Ok(Self {
            extents: extents.to_vec(),
            volumes,
        })
    }

    /// Shape of a one-dimensional vector.
    pub fn vector(len: usize) -> ArgResult<Self> {
        Self::new(&[len])
    }

    /// Shape of a square `n` x `n` matrix.
    pub fn square(n: usize) -> ArgResult<Self> {
        Self::new(&[n, n])
    }

    pub fn rank(&self) -> usize {
        self.extents.len()
    }

    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    pub fn volumes(&self) -> &[usize] {
        &self.volumes
    }

    /// Total number of elements addressed by this shape.
    pub fn total_volume(&self) -> usize {
        self.extents[0] * self.volumes[0]
    }

    /// Flat offset of a full index tuple, outermost subscript first.
    pub fn flat_offset(&self, indices: &[usize]) -> ArgResult<usize> {
        if indices.len() != self.extents.len() {
            return Err(ArgError::InvalidShape {
                what: "index tuple rank does not match shape rank",
            });
        }
        let mut offset = 0usize;
        for ((&idx, &extent), &volume) in indices
            .iter()
            .zip(self.extents.iter())
            .zip(self.volumes.iter())
        {
            if idx >= extent {
                return Err(ArgError::InvalidShape {
                    what: "subscript exceeds extent",
                });
            }
            offset += idx * volume;
        }
        Ok(offset)
    }

    /// For kernels that need squareness: the common trailing extent `n`
    /// when the shape has rank >= 2 and its last two extents are equal.
    pub fn trailing_square(&self) -> Option<usize> {
        if self.extents.len() < 2 {
            return None;
        }
        let n = self.extents[self.extents.len() - 1];
        (self.extents[self.extents.len() - 2] == n).then_some(n)
    }

    /// Extent of the fastest-varying dimension.
    pub fn trailing_extent(&self) -> usize {
        self.extents[self.extents.len() - 1]
    }
}

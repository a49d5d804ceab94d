//! Tracked scratch pool reused across repeated evaluations.
//!
//! Kernels never allocate directly; they take blocks from the arena so
//! that allocation cost is amortized over the run and everything is torn
//! down in one place at session end. Allocations hand back opaque
//! integer handles into a block table, so reallocation is O(1) and
//! clearing is a single sweep.

use crate::error::{CoreError, CoreResult};
use crate::numeric::Real;

/// Handle to a block of `Real` scratch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockHandle(usize);

/// Handle to a block of index scratch (pivot tables and the like).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexHandle(usize);

/// Block tables grow in fixed-size steps so a steady-state run settles
/// into a stable footprint.
const TABLE_GROWTH: usize = 100;

/// Scratch arena tracking every block the runtime allocates.
#[derive(Debug, Default)]
pub struct ScratchArena {
    floats: Vec<Vec<Real>>,
    indices: Vec<Vec<usize>>,
}

impl ScratchArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_table_slot<T>(table: &mut Vec<T>) -> CoreResult<()> {
        if table.len() == table.capacity() {
            table
                .try_reserve(TABLE_GROWTH)
                .map_err(|_| CoreError::AllocationFailure {
                    what: "scratch block table",
                })?;
        }
        Ok(())
    }

    fn grown(len: usize, what: &'static str) -> CoreResult<Vec<Real>> {
        let mut block = Vec::new();
        block
            .try_reserve_exact(len)
            .map_err(|_| CoreError::AllocationFailure { what })?;
        block.resize(len, 0.0);
        Ok(block)
    }

    /// Allocate a zero-filled block of `len` reals.
    pub fn allocate(&mut self, len: usize) -> CoreResult<BlockHandle> {
        Self::ensure_table_slot(&mut self.floats)?;
        let block = Self::grown(len, "scratch block")?;
        self.floats.push(block);
        Ok(BlockHandle(self.floats.len() - 1))
    }

    /// Resize a block to `new_len`, preserving contents up to the
    /// smaller of the old and new length. With no handle this is a
    /// plain allocation.
    pub fn reallocate(
        &mut self,
        handle: Option<BlockHandle>,
        new_len: usize,
    ) -> CoreResult<BlockHandle> {
        let Some(handle) = handle else {
            return self.allocate(new_len);
        };
        let block = self
            .floats
            .get_mut(handle.0)
            .ok_or(CoreError::StaleHandle {
                what: "scratch block",
            })?;
        if new_len > block.len() {
            block
                .try_reserve_exact(new_len - block.len())
                .map_err(|_| CoreError::AllocationFailure {
                    what: "scratch block grow",
                })?;
        }
        block.resize(new_len, 0.0);
        Ok(handle)
    }

    /// Allocate a zero-filled block of `len` indices.
    pub fn allocate_indices(&mut self, len: usize) -> CoreResult<IndexHandle> {
        Self::ensure_table_slot(&mut self.indices)?;
        let mut block = Vec::new();
        block
            .try_reserve_exact(len)
            .map_err(|_| CoreError::AllocationFailure {
                what: "index scratch block",
            })?;
        block.resize(len, 0);
        self.indices.push(block);
        Ok(IndexHandle(self.indices.len() - 1))
    }

    /// Resize an index block, preserving contents like [`reallocate`].
    ///
    /// [`reallocate`]: ScratchArena::reallocate
    pub fn reallocate_indices(
        &mut self,
        handle: Option<IndexHandle>,
        new_len: usize,
    ) -> CoreResult<IndexHandle> {
        let Some(handle) = handle else {
            return self.allocate_indices(new_len);
        };
        let block = self
            .indices
            .get_mut(handle.0)
            .ok_or(CoreError::StaleHandle {
                what: "index scratch block",
            })?;
        if new_len > block.len() {
            block
                .try_reserve_exact(new_len - block.len())
                .map_err(|_| CoreError::AllocationFailure {
                    what: "index scratch block grow",
                })?;
        }
        block.resize(new_len, 0);
        Ok(handle)
    }

    pub fn block(&self, handle: BlockHandle) -> CoreResult<&[Real]> {
        self.floats
            .get(handle.0)
            .map(Vec::as_slice)
            .ok_or(CoreError::StaleHandle {
                what: "scratch block",
            })
    }

    pub fn block_mut(&mut self, handle: BlockHandle) -> CoreResult<&mut [Real]> {
        self.floats
            .get_mut(handle.0)
            .map(Vec::as_mut_slice)
            .ok_or(CoreError::StaleHandle {
                what: "scratch block",
            })
    }

    pub fn index_block_mut(&mut self, handle: IndexHandle) -> CoreResult<&mut [usize]> {
        self.indices
            .get_mut(handle.0)
            .map(Vec::as_mut_slice)
            .ok_or(CoreError::StaleHandle {
                what: "index scratch block",
            })
    }

    /// Both a float block and an index block borrowed mutably at once,
    /// for kernels whose scratch spans both tables.
    pub fn float_and_index_mut(
        &mut self,
        float: BlockHandle,
        index: IndexHandle,
    ) -> CoreResult<(&mut [Real], &mut [usize])> {
        if float.0 >= self.floats.len() || index.0 >= self.indices.len() {
            return Err(CoreError::StaleHandle {
                what: "scratch block pair",
            });
        }
        Ok((
            self.floats[float.0].as_mut_slice(),
            self.indices[index.0].as_mut_slice(),
        ))
    }

    /// Free every tracked block and reset tracking state. Idempotent;
    /// safe to call when nothing was ever allocated. Outstanding handles
    /// become stale.
    pub fn clear(&mut self) {
        self.floats = Vec::new();
        self.indices = Vec::new();
    }

    pub fn is_empty(&self) -> bool {
        self.floats.is_empty() && self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn allocate_is_zero_filled() {
        let mut arena = ScratchArena::new();
        let h = arena.allocate(8).unwrap();
        assert_eq!(arena.block(h).unwrap(), &[0.0; 8]);
    }

    #[test]
    fn reallocate_preserves_contents() {
        let mut arena = ScratchArena::new();
        let h = arena.allocate(3).unwrap();
        arena.block_mut(h).unwrap().copy_from_slice(&[1.0, 2.0, 3.0]);

        let h = arena.reallocate(Some(h), 5).unwrap();
        assert_eq!(arena.block(h).unwrap(), &[1.0, 2.0, 3.0, 0.0, 0.0]);

        let h = arena.reallocate(Some(h), 2).unwrap();
        assert_eq!(arena.block(h).unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn reallocate_without_handle_allocates() {
        let mut arena = ScratchArena::new();
        let h = arena.reallocate(None, 4).unwrap();
        assert_eq!(arena.block(h).unwrap().len(), 4);
    }

    #[test]
    fn clear_is_idempotent_and_safe_when_empty() {
        let mut arena = ScratchArena::new();
        arena.clear();
        arena.clear();
        let h = arena.allocate(2).unwrap();
        arena.clear();
        assert!(arena.block(h).is_err());
        arena.clear();
        assert!(arena.is_empty());
    }

    #[test]
    fn index_blocks_track_separately() {
        let mut arena = ScratchArena::new();
        let f = arena.allocate(2).unwrap();
        let i = arena.allocate_indices(2).unwrap();
        arena.index_block_mut(i).unwrap()[0] = 7;
        let (floats, indices) = arena.float_and_index_mut(f, i).unwrap();
        floats[0] = 1.5;
        assert_eq!(indices[0], 7);
    }

    proptest! {
        #[test]
        fn reallocate_keeps_prefix_and_zero_fills_growth(
            initial in prop::collection::vec(-1e6f64..1e6, 1..32),
            new_len in 0usize..48,
        ) {
            let mut arena = ScratchArena::new();
            let h = arena.allocate(initial.len()).unwrap();
            arena.block_mut(h).unwrap().copy_from_slice(&initial);

            let h = arena.reallocate(Some(h), new_len).unwrap();
            let block = arena.block(h).unwrap();
            prop_assert_eq!(block.len(), new_len);

            let kept = initial.len().min(new_len);
            prop_assert_eq!(&block[..kept], &initial[..kept]);
            prop_assert!(block[kept..].iter().all(|&v| v == 0.0));
        }
    }
}

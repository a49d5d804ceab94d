//! Square-matrix inversion via LU decomposition with partial pivoting.
//!
//! Classic Numerical-Recipes-style decomposition: scaled largest-pivot
//! row selection, a determinant-sign accumulator, and one
//! back-substitution per unit basis vector to assemble the inverse
//! column by column. A matrix whose decomposition collapses (a row of
//! zeros) is treated as singular and the result is an all-zero matrix,
//! reported as a non-fatal diagnostic.

use crate::error::{KernelError, KernelResult};
use sdx_args::{ArgError, VectorArg};
use sdx_core::{BlockHandle, CoreError, HostBridge, IndexHandle, Real, ScratchArena, Severity};

/// Zero pivots are nudged to this value so back-substitution stays
/// defined. A numerical-stability compromise, not a correctness
/// guarantee.
const TINY_PIVOT: Real = 1.0e-20;

/// Arena-backed scratch for the inversion kernel: one float block
/// holding the working copy (`n*n`), the scaling vector (`n`) and the
/// basis column (`n`), plus an index block for the pivot table.
///
/// Sized by a grow-only high-water `n`; a smaller matrix reuses the
/// larger block. Only a session teardown releases it.
#[derive(Debug, Default)]
pub struct InvertScratch {
    max_n: usize,
    floats: Option<BlockHandle>,
    pivots: Option<IndexHandle>,
}

impl InvertScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the tracked blocks. Must be called whenever the owning
    /// arena is cleared, since the handles go stale with it.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn ensure(&mut self, arena: &mut ScratchArena, n: usize) -> KernelResult<()> {
        if n > self.max_n {
            self.floats = Some(arena.reallocate(self.floats, n * n + 2 * n)?);
            self.pivots = Some(arena.reallocate_indices(self.pivots, n)?);
            self.max_n = n;
        }
        Ok(())
    }
}

/// Invert `src` into `dst`, overwriting `dst`'s storage. Returns the
/// destination's first element (a calling convention, not a meaningful
/// summary value).
pub fn matrix_invert(
    scratch: &mut InvertScratch,
    arena: &mut ScratchArena,
    bridge: &mut dyn HostBridge,
    src: &VectorArg,
    dst: &mut VectorArg,
) -> KernelResult<Real> {
    let n = match (dst.shape().trailing_square(), src.shape().trailing_square()) {
        (Some(n), Some(m)) if n == m => n,
        _ => return Err(shape_error(bridge)),
    };
    let volume = n * n;
    dst.span_mut(volume)?.copy_from_slice(src.span(volume)?);
    invert_core(scratch, arena, bridge, dst.span_mut(volume)?, n)?;
    Ok(dst.first_value())
}

/// Invert a matrix in its own storage.
pub fn matrix_invert_in_place(
    scratch: &mut InvertScratch,
    arena: &mut ScratchArena,
    bridge: &mut dyn HostBridge,
    mat: &mut VectorArg,
) -> KernelResult<Real> {
    let Some(n) = mat.shape().trailing_square() else {
        return Err(shape_error(bridge));
    };
    invert_core(scratch, arena, bridge, mat.span_mut(n * n)?, n)?;
    Ok(mat.first_value())
}

fn shape_error(bridge: &mut dyn HostBridge) -> KernelError {
    bridge.report(
        Severity::Error,
        "Matrix inversion can only be performed on square arrays (in last two dimensions)",
    );
    KernelError::Arg(ArgError::ShapeMismatch {
        what: "matrix inversion requires square trailing dimensions",
    })
}

/// Invert `mat` (row-major, `n*n`) in place using arena scratch.
fn invert_core(
    scratch: &mut InvertScratch,
    arena: &mut ScratchArena,
    bridge: &mut dyn HostBridge,
    mat: &mut [Real],
    n: usize,
) -> KernelResult<()> {
    if n == 0 {
        return Ok(());
    }
    scratch.ensure(arena, n)?;
    let (Some(float_handle), Some(pivot_handle)) = (scratch.floats, scratch.pivots) else {
        return Err(KernelError::Scratch(CoreError::StaleHandle {
            what: "inversion scratch",
        }));
    };
    let (floats, pivots) = arena.float_and_index_mut(float_handle, pivot_handle)?;
    let (work, rest) = floats.split_at_mut(n * n);
    let (scaling, rest) = rest.split_at_mut(n);
    let column = &mut rest[..n];
    let pivots = &mut pivots[..n];

    work.copy_from_slice(mat);
    let sign = lu_decompose(work, n, pivots, scaling);

    if sign == 0.0 {
        tracing::warn!(n, "singular matrix, substituting zero result");
        bridge.report(
            Severity::Warning,
            "Matrix inversion of a singular matrix; returning a zero matrix",
        );
        mat.fill(0.0);
        return Ok(());
    }

    for j in 0..n {
        column.fill(0.0);
        column[j] = 1.0;
        lu_back_substitute(work, n, pivots, column);
        for i in 0..n {
            mat[i * n + j] = column[i];
        }
    }
    Ok(())
}

/// Decompose `a` in place into LU form with partial pivoting. `pivots`
/// records the row interchanges and `scaling` holds the per-row scale
/// factors. Returns the accumulated determinant sign, or exactly 0.0
/// for a singular matrix.
fn lu_decompose(a: &mut [Real], n: usize, pivots: &mut [usize], scaling: &mut [Real]) -> Real {
    let mut sign = 1.0;

    for i in 0..n {
        let mut big: Real = 0.0;
        for j in 0..n {
            big = big.max(a[i * n + j].abs());
        }
        if big == 0.0 {
            return 0.0;
        }
        scaling[i] = 1.0 / big;
    }

    for j in 0..n {
        for i in 0..j {
            let mut sum = a[i * n + j];
            for k in 0..i {
                sum -= a[i * n + k] * a[k * n + j];
            }
            a[i * n + j] = sum;
        }

        let mut big: Real = 0.0;
        let mut imax = j;
        for i in j..n {
            let mut sum = a[i * n + j];
            for k in 0..j {
                sum -= a[i * n + k] * a[k * n + j];
            }
            a[i * n + j] = sum;
            let scaled = scaling[i] * sum.abs();
            if scaled > big {
                big = scaled;
                imax = i;
            }
        }

        if j != imax {
            for k in 0..n {
                a.swap(imax * n + k, j * n + k);
            }
            sign = -sign;
            scaling[imax] = scaling[j];
        }
        pivots[j] = imax;

        if a[j * n + j] == 0.0 {
            a[j * n + j] = TINY_PIVOT;
        }

        if j != n - 1 {
            let inv_pivot = 1.0 / a[j * n + j];
            for i in j + 1..n {
                a[i * n + j] *= inv_pivot;
            }
        }
    }

    sign
}

/// Solve `LU x = b` in place, following the pivot table, skipping
/// leading zeros of `b` for the unit basis vectors.
fn lu_back_substitute(a: &[Real], n: usize, pivots: &[usize], b: &mut [Real]) {
    let mut first_nonzero: Option<usize> = None;

    for i in 0..n {
        let ip = pivots[i];
        let mut sum = b[ip];
        b[ip] = b[i];
        if let Some(start) = first_nonzero {
            for j in start..i {
                sum -= a[i * n + j] * b[j];
            }
        } else if sum != 0.0 {
            first_nonzero = Some(i);
        }
        b[i] = sum;
    }

    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in i + 1..n {
            sum -= a[i * n + j] * b[j];
        }
        b[i] = sum / a[i * n + i];
    }
}

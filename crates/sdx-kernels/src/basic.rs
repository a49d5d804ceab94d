//! The simple extension functions: scalar helpers, the validated
//! partial sum, the host-visible message, and the managed-loop vector
//! scale used to exercise every argument kind.

use crate::error::{KernelError, KernelResult};
use sdx_args::{ArgError, LookupTable, VectorArg};
use sdx_core::{HostBridge, Real, Severity};

pub fn cosine(x: Real) -> Real {
    x.cos()
}

/// Clamp `x` into `[min_value, max_value]`.
pub fn in_range(x: Real, min_value: Real, max_value: Real) -> Real {
    if x > max_value {
        max_value
    } else if x < min_value {
        min_value
    } else {
        x
    }
}

/// Sum the first `count` elements of `vec`, never more than `limit`.
/// The range is validated before any element is touched.
pub fn partial_sum(vec: &VectorArg, count: Real, limit: usize) -> KernelResult<Real> {
    let count = count.min(limit as Real);
    let n = (count + 0.5) as usize;
    Ok(vec.span(n)?.iter().sum())
}

/// Surface a model-authored message through the host's notification
/// channel, stamped with the simulation time. Always returns 1.0.
pub fn message(bridge: &mut dyn HostBridge, literal: &str, time: Real) -> Real {
    tracing::debug!(literal, time, "MESSAGE function");
    bridge.report(Severity::Inform, &format!("At time {time}"));
    1.0
}

/// Managed-loop function filling the left-hand side with `vec * x`.
/// The literal and lookup arguments are accepted but unused; the
/// function exists to exercise the full marshalling surface.
pub fn vector_scale(
    bridge: &mut dyn HostBridge,
    lhs: &mut VectorArg,
    _literal: &str,
    _table: &LookupTable,
    vec: &VectorArg,
    x: Real,
) -> KernelResult<Real> {
    let n = lhs.shape().trailing_extent();
    if n != vec.shape().trailing_extent() {
        bridge.report(
            Severity::Error,
            "The vector argument must have the same trailing dimension as the left hand side",
        );
        return Err(KernelError::Arg(ArgError::ShapeMismatch {
            what: "vector scale operands disagree on trailing extent",
        }));
    }
    let src = vec.span(n)?.to_vec();
    let dst = lhs.span_mut(n)?;
    for (d, s) in dst.iter_mut().zip(src) {
        *d = s * x;
    }
    Ok(lhs.first_value())
}

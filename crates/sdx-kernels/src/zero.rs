//! Host-coupled iterative zero-finder.
//!
//! Drives the unknown vector `x` toward a root of the host-evaluated
//! residual `y(x)`: each iteration asks the host to re-execute one pass
//! of its own evaluation loop, then nudges every unknown by a fixed
//! fractional step. Fixed-point iteration, not Newton; the 50-iteration
//! cap and the 1e-4 tolerance are externally observable behavior.

use crate::error::KernelResult;
use sdx_args::VectorArg;
use sdx_core::{HostBridge, LoopOutcome, Real, Severity, NOT_AVAILABLE};

const MAX_ITERATIONS: usize = 50;
const TOLERANCE: Real = 1.0e-4;
const STEP_DIVISOR: Real = 10.0;

/// Iterate `x` toward a zero of `y(x)`. Returns `x[0]` (or the host's
/// "not available" sentinel after a floating point fault inside the
/// host's pass). Convergence failure is reported, not fatal.
pub fn find_zero(
    bridge: &mut dyn HostBridge,
    x: &mut VectorArg,
    y: &mut VectorArg,
    narg: usize,
) -> KernelResult<Real> {
    x.validate_range(0, narg as i64)?;
    y.validate_range(0, narg as i64)?;
    let x = x.span_mut(narg)?;
    let y = y.span_mut(narg)?;

    // A sentinel in x[0] marks the first call for this buffer.
    if x[0] == NOT_AVAILABLE {
        x.fill(1.0);
    }

    let mut max_residual: Real = 0.0;
    for _ in 0..MAX_ITERATIONS {
        match bridge.rerun_evaluation_pass(x, y) {
            LoopOutcome::Failed => break,
            LoopOutcome::FloatingPointFault => {
                bridge.report(
                    Severity::Error,
                    "Floating point fault in the host pass while solving FIND_ZERO",
                );
                return Ok(NOT_AVAILABLE);
            }
            LoopOutcome::Completed => {
                max_residual = 0.0;
                for (xi, yi) in x.iter_mut().zip(y.iter()) {
                    max_residual = max_residual.max(yi.abs());
                    *xi += yi / STEP_DIVISOR;
                }
                if max_residual < TOLERANCE {
                    break;
                }
            }
        }
    }

    if max_residual > TOLERANCE {
        let time = bridge.time();
        tracing::warn!(time, max_residual, "FIND_ZERO convergence failure");
        bridge.report(
            Severity::Warning,
            &format!("FIND_ZERO convergence failure at time {time}"),
        );
    }

    Ok(x[0])
}

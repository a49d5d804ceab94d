//! Routing from numeric function ids to kernels.
//!
//! One entry point, total over all ids: unknown ids come back as
//! `UnknownFunction` (a version-mismatch signal, never a crash) with
//! argument storage untouched. Fatal argument errors are reported
//! through the host bridge before they propagate, so the host can
//! attribute them to the originating equation.

use crate::error::{RuntimeError, RuntimeResult};
use crate::registry::FunctionId;
use crate::session::Session;
use sdx_args::{ArgError, ArgValue, ConstantMatrix, DataMatrix, LookupTable, VectorArg};
use sdx_core::{HostBridge, Real, Severity};
use sdx_kernels::{basic, define, error::KernelError, interp, invert, irr, zero};

impl Session {
    /// Evaluate function `id` over marshalled `args`, returning the
    /// scalar result. On success the result is also written back into
    /// argument slot 0 when that slot holds a scalar, because the
    /// host's result path reads it from there.
    pub fn dispatch(
        &mut self,
        bridge: &mut dyn HostBridge,
        id: FunctionId,
        args: &mut [ArgValue],
    ) -> RuntimeResult<Real> {
        match self.route(bridge, id, args) {
            Ok(result) => {
                tracing::debug!(id = id.0, result, "dispatched extension function");
                if let Some(ArgValue::Scalar(slot)) = args.first_mut() {
                    *slot = result;
                }
                Ok(result)
            }
            Err(err) => {
                report_fatal(bridge, &err);
                Err(err)
            }
        }
    }

    fn route(
        &mut self,
        bridge: &mut dyn HostBridge,
        id: FunctionId,
        args: &mut [ArgValue],
    ) -> RuntimeResult<Real> {
        match id {
            FunctionId::COSINE => Ok(basic::cosine(as_scalar(args.first(), 0)?)),

            FunctionId::IN_RANGE => Ok(basic::in_range(
                as_scalar(args.first(), 0)?,
                as_scalar(args.get(1), 1)?,
                as_scalar(args.get(2), 2)?,
            )),

            FunctionId::PARTIAL_SUM => {
                let count = as_scalar(args.get(1), 1)?;
                let limit = rounded(as_scalar(args.get(2), 2)?);
                let vec = as_vector(args.first(), 0)?;
                Ok(basic::partial_sum(vec, count, limit)?)
            }

            FunctionId::MATRIX_INVERT => {
                // Self-looping: the host prepends the destination.
                let (dst, rest) = split_first(args, 0)?;
                let dst = as_vector_mut(dst, 0)?;
                let src = as_vector(rest.first(), 1)?;
                Ok(invert::matrix_invert(
                    &mut self.invert_scratch,
                    &mut self.arena,
                    bridge,
                    src,
                    dst,
                )?)
            }

            FunctionId::MATRIX_INPLACE_INVERT => {
                let (mat, _) = split_first(args, 0)?;
                let mat = as_vector_mut(mat, 0)?;
                Ok(invert::matrix_invert_in_place(
                    &mut self.invert_scratch,
                    &mut self.arena,
                    bridge,
                    mat,
                )?)
            }

            FunctionId::INTERNAL_ROR => Ok(irr::internal_ror(
                &mut self.irr_streams,
                as_scalar(args.first(), 0)?,
                as_scalar(args.get(1), 1)?,
                as_scalar(args.get(2), 2)?,
                as_scalar(args.get(3), 3)?,
                as_scalar(args.get(4), 4)? as i64,
                as_scalar(args.get(5), 5)?,
            )?),

            FunctionId::MESSAGE => {
                let time = as_scalar(args.get(1), 1)?;
                let literal = as_literal(args.first(), 0)?;
                Ok(basic::message(bridge, literal, time))
            }

            FunctionId::FIND_ZERO => {
                let narg = rounded(as_scalar(args.get(2), 2)?);
                let (x, rest) = split_first(args, 0)?;
                let x = as_vector_mut(x, 0)?;
                let y = as_vector_mut(
                    rest.first_mut().ok_or(missing(1, "vector"))?,
                    1,
                )?;
                Ok(zero::find_zero(bridge, x, y, narg)?)
            }

            FunctionId::LOOKUP => {
                let x = as_scalar(args.get(1), 1)?;
                let table = as_lookup_mut(args.first_mut(), 0)?;
                Ok(interp::lookup_evaluate(table, x))
            }

            FunctionId::VECTOR_SCALE => {
                let (lhs, rest) = split_first(args, 0)?;
                let lhs = as_vector_mut(lhs, 0)?;
                let literal = as_literal(rest.first(), 1)?;
                let table = as_lookup(rest.get(1), 2)?;
                let vec = as_vector(rest.get(2), 3)?;
                let x = as_scalar(rest.get(3), 4)?;
                Ok(basic::vector_scale(bridge, lhs, literal, table, vec, x)?)
            }

            FunctionId::CONST_DEF => {
                let (cmat, rest) = split_first(args, 0)?;
                let cmat = as_constant_mut(cmat, 0)?;
                let literal = as_literal(rest.first(), 1)?;
                Ok(define::constant_def(bridge, cmat, literal)?)
            }

            FunctionId::DATA_DEF => {
                let (dmat, rest) = split_first(args, 0)?;
                let dmat = as_data_mut(dmat, 0)?;
                let literal = as_literal(rest.first(), 1)?;
                Ok(define::data_def(bridge, dmat, literal)?)
            }

            FunctionId(id) => Err(RuntimeError::UnknownFunction { id }),
        }
    }
}

/// Report an error through the bridge before it propagates, unless it
/// is recoverable (`UnknownFunction`) or the kernel already issued a
/// more specific diagnostic (`ShapeMismatch`).
fn report_fatal(bridge: &mut dyn HostBridge, err: &RuntimeError) {
    match err {
        RuntimeError::UnknownFunction { .. } | RuntimeError::SessionRejected { .. } => {}
        RuntimeError::Arg(ArgError::ShapeMismatch { .. })
        | RuntimeError::Kernel(KernelError::Arg(ArgError::ShapeMismatch { .. })) => {}
        other => bridge.report(Severity::Error, &other.to_string()),
    }
}

/// The host rounds count-like scalars to the nearest integer.
fn rounded(v: Real) -> usize {
    (v + 0.5) as usize
}

fn missing(index: usize, expected: &'static str) -> RuntimeError {
    RuntimeError::Arg(ArgError::ArgumentType { index, expected })
}

fn split_first<'a>(
    args: &'a mut [ArgValue],
    index: usize,
) -> RuntimeResult<(&'a mut ArgValue, &'a mut [ArgValue])> {
    args.split_first_mut()
        .ok_or(missing(index, "argument"))
}

fn as_scalar(arg: Option<&ArgValue>, index: usize) -> RuntimeResult<Real> {
    match arg {
        Some(ArgValue::Scalar(v)) => Ok(*v),
        _ => Err(missing(index, "scalar")),
    }
}

fn as_literal(arg: Option<&ArgValue>, index: usize) -> RuntimeResult<&str> {
    match arg {
        Some(ArgValue::Literal(s)) => Ok(s),
        _ => Err(missing(index, "literal")),
    }
}

fn as_vector(arg: Option<&ArgValue>, index: usize) -> RuntimeResult<&VectorArg> {
    match arg {
        Some(ArgValue::Vector(v)) => Ok(v),
        _ => Err(missing(index, "vector")),
    }
}

fn as_vector_mut(arg: &mut ArgValue, index: usize) -> RuntimeResult<&mut VectorArg> {
    match arg {
        ArgValue::Vector(v) => Ok(v),
        _ => Err(missing(index, "vector")),
    }
}

fn as_lookup(arg: Option<&ArgValue>, index: usize) -> RuntimeResult<&LookupTable> {
    match arg {
        Some(ArgValue::Lookup(t)) => Ok(t),
        _ => Err(missing(index, "lookup")),
    }
}

fn as_lookup_mut(arg: Option<&mut ArgValue>, index: usize) -> RuntimeResult<&mut LookupTable> {
    match arg {
        Some(ArgValue::Lookup(t)) => Ok(t),
        _ => Err(missing(index, "lookup")),
    }
}

fn as_constant_mut(arg: &mut ArgValue, index: usize) -> RuntimeResult<&mut ConstantMatrix> {
    match arg {
        ArgValue::ConstantDef(c) => Ok(c),
        _ => Err(missing(index, "constant definition")),
    }
}

fn as_data_mut(arg: &mut ArgValue, index: usize) -> RuntimeResult<&mut DataMatrix> {
    match arg {
        ArgValue::DataDef(d) => Ok(d),
        _ => Err(missing(index, "data definition")),
    }
}

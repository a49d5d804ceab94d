//! Declaration-only functions: constant and data definitions.
//!
//! These never run during the evaluation loop; the host calls them once
//! at declaration time. Both verify the payload's identity tag, obtain
//! host-managed backing storage through the bridge, and fill it with
//! the sample pattern `i * 100 + j`.

use crate::error::KernelResult;
use sdx_args::{ConstantMatrix, DataMatrix, CONSTANT_MATRIX_KEY, DATA_MATRIX_KEY};
use sdx_core::{is_not_available, HostBridge, Real, Severity};

/// Number of time points assumed when the host's time axis is not yet
/// configured.
const FALLBACK_TIME_POINTS: usize = 100;

/// Fill a constant-definition payload. A bad identity tag is reported
/// as a run-stopping diagnostic and the call yields 0.0.
pub fn constant_def(
    bridge: &mut dyn HostBridge,
    cmat: &mut ConstantMatrix,
    _literal: &str,
) -> KernelResult<Real> {
    if cmat.key != CONSTANT_MATRIX_KEY {
        bridge.report(Severity::Stop, "Bad call to CONST_DEF");
        return Ok(0.0);
    }

    let mut values = bridge.allocate_constant_storage(cmat.rows, cmat.cols)?;
    for i in 0..cmat.rows {
        for j in 0..cmat.cols {
            values[i * cmat.cols + j] = i as Real * 100.0 + j as Real;
        }
    }
    cmat.values = values;
    Ok(if cmat.values.is_empty() {
        0.0
    } else {
        cmat.at(0, 0)
    })
}

/// Fill a data-definition payload over the host's simulation time axis.
/// Unset axis parameters fall back the way the host documents: a
/// non-positive step becomes 1, an unavailable initial time becomes 0,
/// and a non-increasing range yields 100 points.
pub fn data_def(
    bridge: &mut dyn HostBridge,
    dmat: &mut DataMatrix,
    _literal: &str,
) -> KernelResult<Real> {
    if dmat.key != DATA_MATRIX_KEY {
        bridge.report(Severity::Stop, "Bad call to DATA_DEF");
        return Ok(0.0);
    }

    let axis = bridge.time_axis();
    let time_step = if axis.time_step > 0.0 {
        axis.time_step
    } else {
        1.0
    };
    let initial_time = if is_not_available(axis.initial_time) {
        0.0
    } else {
        axis.initial_time
    };
    let ntime = if axis.final_time > initial_time {
        ((axis.final_time - initial_time) / time_step + 1.5) as usize
    } else {
        FALLBACK_TIME_POINTS
    };

    let mut storage = bridge.allocate_data_storage(dmat.nvar, ntime)?;
    let mut time = initial_time;
    for slot in storage.time_values.iter_mut() {
        *slot = time;
        time += time_step;
    }
    for (i, row) in storage.rows.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            *value = i as Real * 100.0 + j as Real;
        }
    }

    dmat.ntime = ntime;
    dmat.time_values = storage.time_values;
    dmat.values = storage.rows;
    Ok(dmat
        .values
        .first()
        .and_then(|row| row.first())
        .copied()
        .unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testhost::ScriptedHost;
    use sdx_core::{TimeAxis, NOT_AVAILABLE};

    #[test]
    fn constant_def_fills_sample_pattern() {
        let mut host = ScriptedHost::new();
        let mut cmat = ConstantMatrix::new(3, 2);
        let rval = constant_def(&mut host, &mut cmat, "c1").unwrap();
        assert_eq!(rval, 0.0);
        assert_eq!(cmat.at(2, 1), 201.0);
        assert_eq!(cmat.at(1, 0), 100.0);
    }

    #[test]
    fn constant_def_bad_key_stops() {
        let mut host = ScriptedHost::new();
        let mut cmat = ConstantMatrix::new(2, 2);
        cmat.key = 0xDEAD_BEEF;
        let rval = constant_def(&mut host, &mut cmat, "c1").unwrap();
        assert_eq!(rval, 0.0);
        assert!(cmat.values.is_empty());
        assert_eq!(host.reports_with(Severity::Stop), 1);
    }

    #[test]
    fn data_def_sizes_from_time_axis() {
        let mut host = ScriptedHost::new();
        host.axis = TimeAxis {
            time_step: 0.5,
            initial_time: 2.0,
            final_time: 4.0,
        };
        let mut dmat = DataMatrix::new(2);
        let rval = data_def(&mut host, &mut dmat, "d1").unwrap();
        // (4 - 2) / 0.5 + 1.5 floors to 5 points.
        assert_eq!(dmat.ntime, 5);
        assert_eq!(dmat.time_values, vec![2.0, 2.5, 3.0, 3.5, 4.0]);
        assert_eq!(dmat.values[1][3], 103.0);
        assert_eq!(rval, 0.0);
    }

    #[test]
    fn data_def_falls_back_on_unset_axis() {
        let mut host = ScriptedHost::new();
        host.axis = TimeAxis {
            time_step: -1.0,
            initial_time: NOT_AVAILABLE,
            final_time: NOT_AVAILABLE,
        };
        let mut dmat = DataMatrix::new(1);
        data_def(&mut host, &mut dmat, "d1").unwrap();
        assert_eq!(dmat.ntime, FALLBACK_TIME_POINTS);
        assert_eq!(dmat.time_values[0], 0.0);
        assert_eq!(dmat.time_values[1], 1.0);
    }
}

//! Capability trait for the simulation host that loaded the runtime.
//!
//! The kernels never talk to the host directly; everything goes through
//! this trait so that tests can substitute a scripted host.

use crate::error::CoreResult;
use crate::numeric::Real;

/// Diagnostic severity. The host halts the current evaluation for
/// `Error` and `Stop`; `Inform` and `Warning` never abort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Inform,
    Warning,
    /// Fatal to the current evaluation; the host attributes it to the
    /// originating equation.
    Error,
    /// Fatal to the whole run.
    Stop,
}

/// Result of asking the host to re-execute one pass of its own
/// evaluation loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopOutcome {
    /// The pass ran and residuals were recomputed.
    Completed,
    /// The host could not run the pass; the caller should give up.
    Failed,
    /// A floating point fault occurred inside the host's pass.
    FloatingPointFault,
}

/// The host's simulation time axis, used to size data definitions.
/// Any field may be `NOT_AVAILABLE` before the run is configured.
#[derive(Clone, Copy, Debug)]
pub struct TimeAxis {
    pub time_step: Real,
    pub initial_time: Real,
    pub final_time: Real,
}

/// Host-owned backing storage for a data definition: one time vector
/// plus one row of values per variable.
#[derive(Clone, Debug)]
pub struct DataStorage {
    pub time_values: Vec<Real>,
    /// One row per variable, each `time_values.len()` long.
    pub rows: Vec<Vec<Real>>,
}

/// Callback surface into the host. Calls are strictly serialized by the
/// host model; implementations need no internal synchronization.
pub trait HostBridge {
    /// Report a diagnostic attributed to the currently evaluating
    /// equation. Must be called before returning any fatal error so the
    /// host can tie the failure to an equation and a simulation time.
    fn report(&mut self, severity: Severity, message: &str);

    /// Re-execute one pass of the host's evaluation loop, recomputing
    /// `residuals` from the currently visible `unknowns`. Synchronous:
    /// the extension blocks until the host returns.
    fn rerun_evaluation_pass(
        &mut self,
        unknowns: &[Real],
        residuals: &mut [Real],
    ) -> LoopOutcome;

    /// Current simulation time, for diagnostic attribution.
    fn time(&self) -> Real;

    /// Time axis parameters for sizing data definitions.
    fn time_axis(&self) -> TimeAxis;

    /// Obtain host-managed storage for a constant definition,
    /// `rows * cols` zeroed elements.
    fn allocate_constant_storage(&mut self, rows: usize, cols: usize) -> CoreResult<Vec<Real>>;

    /// Obtain host-managed storage for a data definition: `ntime` time
    /// slots and `nvar` value rows.
    fn allocate_data_storage(&mut self, nvar: usize, ntime: usize) -> CoreResult<DataStorage>;
}

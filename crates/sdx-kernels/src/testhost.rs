//! Scripted host bridge for kernel tests.

use sdx_core::{CoreResult, DataStorage, HostBridge, LoopOutcome, Real, Severity, TimeAxis};

type PassFn = Box<dyn FnMut(&[Real], &mut [Real]) -> LoopOutcome>;

pub struct ScriptedHost {
    pub reports: Vec<(Severity, String)>,
    pub time: Real,
    pub axis: TimeAxis,
    pub passes: usize,
    on_pass: PassFn,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self {
            reports: Vec::new(),
            time: 0.0,
            axis: TimeAxis {
                time_step: 1.0,
                initial_time: 0.0,
                final_time: 10.0,
            },
            passes: 0,
            on_pass: Box::new(|_, _| LoopOutcome::Failed),
        }
    }

    /// Script the evaluation-loop callback.
    pub fn with_pass(mut self, f: impl FnMut(&[Real], &mut [Real]) -> LoopOutcome + 'static) -> Self {
        self.on_pass = Box::new(f);
        self
    }

    pub fn reports_with(&self, severity: Severity) -> usize {
        self.reports.iter().filter(|(s, _)| *s == severity).count()
    }
}

impl HostBridge for ScriptedHost {
    fn report(&mut self, severity: Severity, message: &str) {
        self.reports.push((severity, message.to_string()));
    }

    fn rerun_evaluation_pass(&mut self, unknowns: &[Real], residuals: &mut [Real]) -> LoopOutcome {
        self.passes += 1;
        (self.on_pass)(unknowns, residuals)
    }

    fn time(&self) -> Real {
        self.time
    }

    fn time_axis(&self) -> TimeAxis {
        self.axis
    }

    fn allocate_constant_storage(&mut self, rows: usize, cols: usize) -> CoreResult<Vec<Real>> {
        Ok(vec![0.0; rows * cols])
    }

    fn allocate_data_storage(&mut self, nvar: usize, ntime: usize) -> CoreResult<DataStorage> {
        Ok(DataStorage {
            time_values: vec![0.0; ntime],
            rows: vec![vec![0.0; ntime]; nvar],
        })
    }
}

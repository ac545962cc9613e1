use crate::flow::FlowRange;
use serde::{Deserialize, Serialize};

/// End of the simulated observation window, in seconds.
pub const STOP_TIME: f64 = 15.0;
/// Uniform adjustment applied to every flow deadline.
pub const DEADLINE_DELTA: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub stop_time: f64,
    pub deadline_delta: f64,
    pub deadline_range: FlowRange,
    pub afct_range: FlowRange,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stop_time: STOP_TIME,
            deadline_delta: DEADLINE_DELTA,
            deadline_range: FlowRange::new(100_000, 200_000),
            afct_range: FlowRange::new(200_000, 300_000),
        }
    }
}

impl AnalysisConfig {
    pub fn with_stop_time(mut self, stop_time: f64) -> Self {
        self.stop_time = stop_time;
        self
    }

    pub fn with_deadline_delta(mut self, delta: f64) -> Self {
        self.deadline_delta = delta;
        self
    }

    pub fn with_ranges(mut self, deadline_range: FlowRange, afct_range: FlowRange) -> Self {
        self.deadline_range = deadline_range;
        self.afct_range = afct_range;
        self
    }
}

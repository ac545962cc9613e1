pub mod report;

use crate::analysis::AnalysisConfig;
use crate::flow::FlowRange;
use crate::store::RecordStore;
use serde::{Deserialize, Serialize};
use tracing::info;

/// AFCT over one id range. `afct` is 0 when `finished` is 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionStats {
    pub afct: f64,
    pub finished: usize,
    pub unfinished: usize,
}

impl CompletionStats {
    pub fn has_data(&self) -> bool {
        self.finished > 0
    }
}

/// Deadline misses over one id range. `ratio` is 0 when `eligible` is 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeadlineStats {
    pub ratio: f64,
    pub missed: usize,
    pub eligible: usize,
}

impl DeadlineStats {
    pub fn has_data(&self) -> bool {
        self.eligible > 0
    }
}

/// Read-only view over a loaded [`RecordStore`] that computes flow metrics.
#[derive(Debug, Clone, Copy)]
pub struct MetricsEngine<'a> {
    store: &'a RecordStore,
    stop_time: f64,
    deadline_delta: f64,
}

impl<'a> MetricsEngine<'a> {
    pub fn new(store: &'a RecordStore, config: &AnalysisConfig) -> Self {
        Self {
            store,
            stop_time: config.stop_time,
            deadline_delta: config.deadline_delta,
        }
    }

    /// Mean `stop_time - start_time` over flows whose observed size matches the
    /// expected size. Mismatched flows are counted as unfinished; flows without
    /// an outcome are skipped entirely.
    pub fn average_completion_time(&self, range: FlowRange) -> CompletionStats {
        let mut total_time = 0.0;
        let mut finished = 0;
        let mut unfinished = 0;

        for (spec, outcome) in self.store.matched_in(range) {
            if outcome.completes(spec) {
                total_time += outcome.duration();
                finished += 1;
            } else {
                unfinished += 1;
            }
        }

        info!("Unfinished flows in {}: {}", range, unfinished);

        let afct = if finished > 0 {
            total_time / finished as f64
        } else {
            0.0
        };

        CompletionStats {
            afct,
            finished,
            unfinished,
        }
    }

    /// Fraction of eligible flows that missed their deadline.
    ///
    /// A flow is eligible when `start_time + deadline` falls strictly before the
    /// stop time. It counts as a hit only if its size matches and its duration
    /// is strictly below `deadline + deadline_delta`.
    pub fn deadline_miss_ratio(&self, range: FlowRange) -> DeadlineStats {
        let mut missed = 0;
        let mut eligible = 0;

        for (spec, outcome) in self.store.matched_in(range) {
            if spec.deadline_horizon() >= self.stop_time {
                continue;
            }
            eligible += 1;

            let deadline = spec.deadline + self.deadline_delta;
            if !(outcome.completes(spec) && outcome.duration() < deadline) {
                missed += 1;
            }
        }

        let ratio = if eligible > 0 {
            missed as f64 / eligible as f64
        } else {
            0.0
        };

        DeadlineStats {
            ratio,
            missed,
            eligible,
        }
    }
}

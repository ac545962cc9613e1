pub mod config;
pub use config::{AnalysisConfig, DEADLINE_DELTA, STOP_TIME};

use crate::error::FlowDataError;
use crate::metrics::MetricsEngine;
use crate::metrics::report::RunReport;
use crate::store::RecordStore;
use std::path::PathBuf;
use tracing::{info, warn};

/// One flow-info/flow-result pair produced by a single simulator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInput {
    pub label: String,
    pub spec_path: PathBuf,
    pub outcome_path: PathBuf,
}

impl RunInput {
    pub fn new(label: impl Into<String>, spec_path: impl Into<PathBuf>, outcome_path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            spec_path: spec_path.into(),
            outcome_path: outcome_path.into(),
        }
    }
}

pub struct Analysis {
    config: AnalysisConfig,
    store: RecordStore,
}

impl Analysis {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            store: RecordStore::new(),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Loads one dataset into a fresh store and evaluates both metrics.
    pub fn run(&mut self, input: &RunInput) -> Result<RunReport, FlowDataError> {
        info!("Analyzing run: {}", input.label);

        self.store.reset();
        let spec_records = self.store.load_flow_specs(&input.spec_path)?;
        let outcome_records = self.store.load_flow_outcomes(&input.outcome_path)?;

        let orphans = self.store.orphan_outcomes();
        if orphans > 0 {
            warn!("{}: {} outcomes have no matching flow spec", input.label, orphans);
        }

        let engine = MetricsEngine::new(&self.store, &self.config);
        let deadline = engine.deadline_miss_ratio(self.config.deadline_range);
        let completion = engine.average_completion_time(self.config.afct_range);

        info!(
            "{}: deadline miss {:.4} ({}/{}), AFCT {:.6}s",
            input.label, deadline.ratio, deadline.missed, deadline.eligible, completion.afct
        );

        Ok(RunReport {
            label: input.label.clone(),
            spec_records,
            outcome_records,
            deadline_range: self.config.deadline_range,
            afct_range: self.config.afct_range,
            deadline,
            completion,
        })
    }

    /// Runs each dataset in order. Stops at the first failure.
    pub fn run_all(&mut self, inputs: &[RunInput]) -> Result<Vec<RunReport>, FlowDataError> {
        self.run_all_with(inputs, |_| {})
    }

    /// Like [`Analysis::run_all`], calling `on_done` after every completed run.
    pub fn run_all_with<F>(&mut self, inputs: &[RunInput], mut on_done: F) -> Result<Vec<RunReport>, FlowDataError>
    where
        F: FnMut(&RunReport),
    {
        let mut reports = Vec::with_capacity(inputs.len());
        for input in inputs {
            let report = self.run(input)?;
            on_done(&report);
            reports.push(report);
        }
        self.store.reset();
        Ok(reports)
    }
}

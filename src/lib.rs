pub mod analysis;
pub mod error;
pub mod flow;
pub mod metrics;
pub mod store;

pub use analysis::{Analysis, AnalysisConfig, RunInput};
pub use error::{FlowDataError, RecordError};
pub use metrics::MetricsEngine;
pub use store::RecordStore;

pub mod prelude {
    pub use crate::analysis::{Analysis, AnalysisConfig, RunInput};
    pub use crate::flow::{FlowId, FlowOutcome, FlowRange, FlowSpec};
    pub use crate::metrics::report::{ReportFormat, RunReport};
    pub use crate::metrics::{CompletionStats, DeadlineStats, MetricsEngine};
    pub use crate::store::RecordStore;
}

pub mod record;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlowId(u64);

impl FlowId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a flow was scheduled to do, as written by the simulator before the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowSpec {
    pub id: FlowId,
    pub expected_size: f64,
    pub start_time: f64,
    // Relative to start_time, not an absolute timestamp
    pub deadline: f64,
}

impl FlowSpec {
    pub fn new(id: u64, expected_size: f64, start_time: f64, deadline: f64) -> Self {
        Self {
            id: FlowId(id),
            expected_size,
            start_time,
            deadline,
        }
    }

    /// Scheduled start plus deadline: the latest instant the flow could finish on time.
    pub fn deadline_horizon(&self) -> f64 {
        self.start_time + self.deadline
    }
}

/// What the simulator observed for a flow once the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowOutcome {
    pub id: FlowId,
    pub observed_size: f64,
    pub start_time: f64,
    pub stop_time: f64,
}

impl FlowOutcome {
    pub fn new(id: u64, start_time: f64, stop_time: f64, observed_size: f64) -> Self {
        Self {
            id: FlowId(id),
            observed_size,
            start_time,
            stop_time,
        }
    }

    pub fn duration(&self) -> f64 {
        self.stop_time - self.start_time
    }

    /// Exact size match; any difference means a partial or corrupted transfer.
    pub fn completes(&self, spec: &FlowSpec) -> bool {
        self.observed_size == spec.expected_size
    }
}

/// Half-open id range `[begin, end)` a metric is evaluated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRange {
    pub begin: u64,
    pub end: u64,
}

impl FlowRange {
    pub fn new(begin: u64, end: u64) -> Self {
        Self { begin, end }
    }

    pub fn contains(&self, id: FlowId) -> bool {
        self.begin <= id.0 && id.0 < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }

    // BTreeMap::range panics on inverted bounds, so callers check is_empty first
    pub(crate) fn ids(&self) -> std::ops::Range<FlowId> {
        FlowId(self.begin)..FlowId(self.end)
    }
}

impl fmt::Display for FlowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.begin, self.end)
    }
}

impl FromStr for FlowRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (begin, end) = s
            .split_once("..")
            .ok_or_else(|| format!("expected `begin..end`, got `{}`", s))?;
        let begin = begin
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("invalid range start `{}`: {}", begin.trim(), e))?;
        let end = end
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("invalid range end `{}`: {}", end.trim(), e))?;
        Ok(Self { begin, end })
    }
}

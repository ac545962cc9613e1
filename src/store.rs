use crate::error::{FlowDataError, RecordError};
use crate::flow::record::is_blank;
use crate::flow::{FlowId, FlowOutcome, FlowRange, FlowSpec};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Specifications and outcomes of one dataset, keyed by flow id.
///
/// The two maps are filled independently and only joined when a metric is
/// queried. Loading the same id twice overwrites the earlier record.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    specs: BTreeMap<FlowId, FlowSpec>,
    outcomes: BTreeMap<FlowId, FlowOutcome>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a flow-info file. Returns the number of records read.
    pub fn load_flow_specs(&mut self, path: impl AsRef<Path>) -> Result<usize, FlowDataError> {
        let path = path.as_ref();
        let reader = open(path)?;
        let count = self.read_flow_specs(reader, &path.display().to_string())?;
        debug!("Loaded {} flow specs from {}", count, path.display());
        Ok(count)
    }

    /// Loads a flow-result file. Returns the number of records read.
    pub fn load_flow_outcomes(&mut self, path: impl AsRef<Path>) -> Result<usize, FlowDataError> {
        let path = path.as_ref();
        let reader = open(path)?;
        let count = self.read_flow_outcomes(reader, &path.display().to_string())?;
        debug!("Loaded {} flow outcomes from {}", count, path.display());
        Ok(count)
    }

    pub fn read_flow_specs<R: BufRead>(&mut self, reader: R, origin: &str) -> Result<usize, FlowDataError> {
        read_records(reader, origin, FlowSpec::parse_line, |spec| {
            self.specs.insert(spec.id, spec);
        })
    }

    pub fn read_flow_outcomes<R: BufRead>(&mut self, reader: R, origin: &str) -> Result<usize, FlowDataError> {
        read_records(reader, origin, FlowOutcome::parse_line, |outcome| {
            self.outcomes.insert(outcome.id, outcome);
        })
    }

    pub fn insert_spec(&mut self, spec: FlowSpec) {
        self.specs.insert(spec.id, spec);
    }

    pub fn insert_outcome(&mut self, outcome: FlowOutcome) {
        self.outcomes.insert(outcome.id, outcome);
    }

    pub fn reset(&mut self) {
        self.specs.clear();
        self.outcomes.clear();
    }

    pub fn spec(&self, id: FlowId) -> Option<&FlowSpec> {
        self.specs.get(&id)
    }

    pub fn outcome(&self, id: FlowId) -> Option<&FlowOutcome> {
        self.outcomes.get(&id)
    }

    pub fn spec_count(&self) -> usize {
        self.specs.len()
    }

    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty() && self.outcomes.is_empty()
    }

    /// Flows in `range` that have both a spec and an outcome, in id order.
    pub fn matched_in(&self, range: FlowRange) -> impl Iterator<Item = (&FlowSpec, &FlowOutcome)> {
        let specs = if range.is_empty() {
            None
        } else {
            Some(self.specs.range(range.ids()))
        };
        specs
            .into_iter()
            .flatten()
            .filter_map(move |(id, spec)| {
                debug_assert!(range.contains(*id));
                self.outcomes.get(id).map(|outcome| (spec, outcome))
            })
    }

    /// Outcomes the simulator reported for ids that were never specified.
    pub fn orphan_outcomes(&self) -> usize {
        self.outcomes
            .keys()
            .filter(|id| !self.specs.contains_key(id))
            .count()
    }
}

fn open(path: &Path) -> Result<BufReader<File>, FlowDataError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| FlowDataError::MissingFile {
            path: path.to_path_buf(),
            source,
        })
}

fn read_records<R, T, P, F>(reader: R, origin: &str, parse: P, mut insert: F) -> Result<usize, FlowDataError>
where
    R: BufRead,
    P: Fn(&str) -> Result<T, RecordError>,
    F: FnMut(T),
{
    let mut count = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| FlowDataError::Io {
            origin: origin.to_string(),
            source,
        })?;
        if is_blank(&line) {
            continue;
        }
        let record = parse(&line).map_err(|source| FlowDataError::Parse {
            origin: origin.to_string(),
            line: index + 1,
            source,
        })?;
        insert(record);
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn store_with(specs: &str, outcomes: &str) -> RecordStore {
        let mut store = RecordStore::new();
        store.read_flow_specs(Cursor::new(specs), "specs").unwrap();
        store.read_flow_outcomes(Cursor::new(outcomes), "outcomes").unwrap();
        store
    }

    #[test]
    fn reads_both_streams() {
        let store = store_with("1, 100, 0, 5\n2, 100, 0, 5\n", "1,0,3,100\n2,0,7,90\n");
        assert_eq!(store.spec_count(), 2);
        assert_eq!(store.outcome_count(), 2);
        assert_eq!(store.outcome(FlowId::new(2)).unwrap().observed_size, 90.0);
        assert_eq!(store.spec(FlowId::new(1)).unwrap().deadline, 5.0);
    }

    #[test]
    fn last_write_wins() {
        let store = store_with("1, 100, 0, 5\n1, 200, 1, 6\n", "");
        assert_eq!(store.spec_count(), 1);
        assert_eq!(store.spec(FlowId::new(1)), Some(&FlowSpec::new(1, 200.0, 1.0, 6.0)));
    }

    #[test]
    fn skips_blank_lines() {
        let mut store = RecordStore::new();
        let count = store
            .read_flow_specs(Cursor::new("\n1, 100, 0, 5\n\n   \n2, 100, 0, 5\n"), "specs")
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn parse_error_reports_line() {
        let mut store = RecordStore::new();
        let err = store
            .read_flow_outcomes(Cursor::new("1,0,3,100\n2,0,7\n"), "outcomes.txt")
            .unwrap_err();
        match err {
            FlowDataError::Parse { origin, line, source } => {
                assert_eq!(origin, "outcomes.txt");
                assert_eq!(line, 2);
                assert_eq!(source, RecordError::Arity { expected: 4, found: 3 });
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_file() {
        let mut store = RecordStore::new();
        let err = store.load_flow_specs("/nonexistent/flow-info-0.1.txt").unwrap_err();
        assert!(err.is_missing_file());
    }

    #[test]
    fn join_is_restricted_to_range_and_both_maps() {
        let store = store_with(
            "1, 100, 0, 5\n2, 100, 0, 5\n3, 100, 0, 5\n10, 100, 0, 5\n",
            "1,0,3,100\n3,0,4,100\n10,0,1,100\n42,0,1,100\n",
        );
        let ids: Vec<u64> = store
            .matched_in(FlowRange::new(0, 10))
            .map(|(spec, _)| spec.id.get())
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.matched_in(FlowRange::new(10, 0)).count(), 0);

        let ids: Vec<u64> = store
            .matched_in(FlowRange::new(2, 10))
            .map(|(spec, _)| spec.id.get())
            .collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(store.orphan_outcomes(), 1);
    }

    #[test]
    fn reset_empties_both_maps() {
        let mut store = store_with("1, 100, 0, 5\n", "1,0,3,100\n");
        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.matched_in(FlowRange::new(0, 10)).count(), 0);
    }
}

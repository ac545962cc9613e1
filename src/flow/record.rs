// Line codec for the two record files the simulator writes.
//
//   flow-info:   id, size, start_time, deadline
//   flow-result: id, start_time, stop_time, size
//
// Lines may be wrapped in one pair of parentheses and may carry a single
// trailing comma, matching tuple literal syntax.

use super::{FlowId, FlowOutcome, FlowSpec};
use crate::error::RecordError;

const FIELDS: usize = 4;

const SPEC_FIELDS: [&str; FIELDS] = ["id", "size", "start_time", "deadline"];
const OUTCOME_FIELDS: [&str; FIELDS] = ["id", "start_time", "stop_time", "size"];

impl FlowSpec {
    pub fn parse_line(line: &str) -> Result<Self, RecordError> {
        let tokens = split_fields(line)?;
        Ok(Self {
            id: parse_id(SPEC_FIELDS[0], tokens[0])?,
            expected_size: parse_number(SPEC_FIELDS[1], tokens[1])?,
            start_time: parse_number(SPEC_FIELDS[2], tokens[2])?,
            deadline: parse_number(SPEC_FIELDS[3], tokens[3])?,
        })
    }
}

impl FlowOutcome {
    pub fn parse_line(line: &str) -> Result<Self, RecordError> {
        let tokens = split_fields(line)?;
        Ok(Self {
            id: parse_id(OUTCOME_FIELDS[0], tokens[0])?,
            start_time: parse_number(OUTCOME_FIELDS[1], tokens[1])?,
            stop_time: parse_number(OUTCOME_FIELDS[2], tokens[2])?,
            observed_size: parse_number(OUTCOME_FIELDS[3], tokens[3])?,
        })
    }
}

/// True for lines that carry no record at all.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn split_fields(line: &str) -> Result<[&str; FIELDS], RecordError> {
    let mut body = line.trim();
    if let Some(inner) = body.strip_prefix('(') {
        body = inner.strip_suffix(')').ok_or(RecordError::Unbalanced)?;
    } else if body.ends_with(')') {
        return Err(RecordError::Unbalanced);
    }

    let mut tokens: Vec<&str> = body.split(',').map(str::trim).collect();
    if tokens.len() == FIELDS + 1 && tokens.last() == Some(&"") {
        tokens.pop();
    }

    let found = tokens.len();
    tokens.try_into().map_err(|_| RecordError::Arity {
        expected: FIELDS,
        found,
    })
}

fn parse_id(field: &'static str, token: &str) -> Result<FlowId, RecordError> {
    if token.is_empty() {
        return Err(RecordError::EmptyField { field });
    }
    token
        .parse::<u64>()
        .map(FlowId::new)
        .map_err(|_| RecordError::InvalidId {
            field,
            token: token.to_string(),
        })
}

fn parse_number(field: &'static str, token: &str) -> Result<f64, RecordError> {
    if token.is_empty() {
        return Err(RecordError::EmptyField { field });
    }
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(RecordError::InvalidNumber {
            field,
            token: token.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simulator_spec_line() {
        let spec = FlowSpec::parse_line("10000, 5000, 0.3, 0.0055").unwrap();
        assert_eq!(spec.id, FlowId::new(10000));
        assert_eq!(spec.expected_size, 5000.0);
        assert_eq!(spec.start_time, 0.3);
        assert_eq!(spec.deadline, 0.0055);
    }

    #[test]
    fn outcome_keeps_size_last() {
        let outcome = FlowOutcome::parse_line("20000,0.3,0.41,5000\n").unwrap();
        assert_eq!(outcome.id, FlowId::new(20000));
        assert_eq!(outcome.start_time, 0.3);
        assert_eq!(outcome.stop_time, 0.41);
        assert_eq!(outcome.observed_size, 5000.0);
    }

    #[test]
    fn accepts_tuple_literal() {
        let spec = FlowSpec::parse_line("(1, 100, 0, 5)").unwrap();
        assert_eq!(spec, FlowSpec::new(1, 100.0, 0.0, 5.0));

        let spec = FlowSpec::parse_line("  (1, 100, 0, 5,)  ").unwrap();
        assert_eq!(spec, FlowSpec::new(1, 100.0, 0.0, 5.0));
    }

    #[test]
    fn rejects_wrong_arity() {
        assert_eq!(
            FlowSpec::parse_line("1, 100, 0").unwrap_err(),
            RecordError::Arity { expected: 4, found: 3 }
        );
        assert_eq!(
            FlowOutcome::parse_line("1, 0, 3, 100, 7").unwrap_err(),
            RecordError::Arity { expected: 4, found: 5 }
        );
    }

    #[test]
    fn rejects_unbalanced_parens() {
        assert_eq!(FlowSpec::parse_line("(1, 100, 0, 5").unwrap_err(), RecordError::Unbalanced);
        assert_eq!(FlowSpec::parse_line("1, 100, 0, 5)").unwrap_err(), RecordError::Unbalanced);
    }

    #[test]
    fn rejects_bad_tokens() {
        assert_eq!(
            FlowSpec::parse_line("1.5, 100, 0, 5").unwrap_err(),
            RecordError::InvalidId { field: "id", token: "1.5".into() }
        );
        assert_eq!(
            FlowSpec::parse_line("-1, 100, 0, 5").unwrap_err(),
            RecordError::InvalidId { field: "id", token: "-1".into() }
        );
        assert_eq!(
            FlowOutcome::parse_line("1, 0, abc, 100").unwrap_err(),
            RecordError::InvalidNumber { field: "stop_time", token: "abc".into() }
        );
        assert_eq!(
            FlowSpec::parse_line("1, nan, 0, 5").unwrap_err(),
            RecordError::InvalidNumber { field: "size", token: "nan".into() }
        );
        assert_eq!(
            FlowSpec::parse_line("1, , 0, 5").unwrap_err(),
            RecordError::EmptyField { field: "size" }
        );
    }

    #[test]
    fn blank_lines() {
        assert!(is_blank(""));
        assert!(is_blank("   \t"));
        assert!(!is_blank("1,2,3,4"));
    }
}

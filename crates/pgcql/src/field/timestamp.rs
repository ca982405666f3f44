use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use pgcql_parser::CqlTermNode;
use regex::Regex;

use super::{CqlField, empty_term, ordered_op};
use crate::error::{PgCqlError, PgCqlResult};

/// Terms longer than a plain `YYYY-MM-DD` date are read as date-times.
const DATE_LEN: usize = 10;

/// Zero-padded fields with at most nine fraction digits.
static SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}(T[0-9]{2}:[0-9]{2}(:[0-9]{2}(\.[0-9]{1,9})?)?)?$")
        .expect("timestamp pattern is valid")
});

/// A timestamp column. Terms are ISO dates (`2021-01-01`) or local
/// date-times (`2021-01-01T10:00`, `2021-01-01T10:00:05.250`) and are
/// re-rendered in canonical form before being quoted.
#[derive(Debug, Clone, Default)]
pub struct TimestampField {
    column: String,
}

impl TimestampField {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Parses a date or local date-time and renders it canonically. Leap
/// seconds are rejected.
fn canonical(value: &str) -> PgCqlResult<String> {
    let invalid = |source: Option<chrono::ParseError>| PgCqlError::Timestamp {
        value: value.to_string(),
        source,
    };
    if !SHAPE.is_match(value) {
        return Err(invalid(None));
    }
    if value.len() > DATE_LEN {
        let dt = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
            .map_err(|e| invalid(Some(e)))?;
        if dt.nanosecond() >= 1_000_000_000 {
            return Err(invalid(None));
        }
        Ok(format_date_time(&dt))
    } else {
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| invalid(Some(e)))?;
        Ok(date.to_string())
    }
}

/// `HH:MM`, then seconds only when non-zero, then the fraction in groups of
/// three digits.
fn format_date_time(dt: &NaiveDateTime) -> String {
    let mut out = dt.format("%Y-%m-%dT%H:%M").to_string();
    let nanos = dt.nanosecond();
    if dt.second() == 0 && nanos == 0 {
        return out;
    }
    out.push_str(&format!(":{:02}", dt.second()));
    match nanos {
        0 => {}
        n if n % 1_000_000 == 0 => out.push_str(&format!(".{:03}", n / 1_000_000)),
        n if n % 1_000 == 0 => out.push_str(&format!(".{:06}", n / 1_000)),
        n => out.push_str(&format!(".{:09}", n)),
    }
    out
}

impl CqlField for TimestampField {
    fn column(&self) -> &str {
        &self.column
    }

    fn set_column(&mut self, column: String) {
        self.column = column;
    }

    fn handle_term(&self, term: &CqlTermNode) -> PgCqlResult<Option<String>> {
        if let Some(sql) = empty_term(&self.column, term, false) {
            return Ok(Some(sql));
        }
        let value = canonical(term.term())?;
        let op = ordered_op(term)?;
        Ok(Some(format!("{}{}'{}'", self.column, op, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::term;

    fn handle(relation: &str, value: &str) -> PgCqlResult<Option<String>> {
        TimestampField::new()
            .with_column("created")
            .handle_term(&term("created", relation, value))
    }

    #[test]
    fn test_canonical() {
        assert_eq!(canonical("2021-01-01").unwrap(), "2021-01-01");
        assert_eq!(canonical("2021-01-01T10:00").unwrap(), "2021-01-01T10:00");
        assert_eq!(canonical("2021-01-01T10:00:00").unwrap(), "2021-01-01T10:00");
        assert_eq!(canonical("2021-01-01T10:00:05").unwrap(), "2021-01-01T10:00:05");
        assert_eq!(canonical("2021-01-01T10:00:00.5").unwrap(), "2021-01-01T10:00:00.500");
        assert_eq!(canonical("2021-01-01T10:00:05.0001").unwrap(), "2021-01-01T10:00:05.000100");
        assert_eq!(
            canonical("2021-01-01T10:00:05.123456789").unwrap(),
            "2021-01-01T10:00:05.123456789"
        );
    }

    #[test]
    fn test_relations() {
        assert_eq!(
            handle(">=", "2021-01-01").unwrap().as_deref(),
            Some("created>='2021-01-01'")
        );
        assert_eq!(
            handle("==", "2021-01-01T10:00:00").unwrap().as_deref(),
            Some("created='2021-01-01T10:00'")
        );
        assert_eq!(handle("=", "").unwrap().as_deref(), Some("created IS NOT NULL"));
    }

    #[test]
    fn test_invalid() {
        for bad in [
            "2021-13-01",
            "yesterday",
            "2021-01-01 10:00",
            "2021-01-01T25:00",
            "2021-1-1",
            "2021-01-01T1:2",
            "2021-01-01T10:00:5",
            "2021-01-01T10:00:05.",
            "2021-01-01T10:00:05.1234567890",
            "+2021-01-01",
        ] {
            let err = handle("=", bad).unwrap_err();
            assert!(
                matches!(&err, PgCqlError::Timestamp { value, .. } if value == bad),
                "{bad}: {err}"
            );
        }
        assert!(matches!(handle("<>", ""), Err(PgCqlError::Timestamp { .. })));
    }

    #[test]
    fn test_leap_second_rejected() {
        for bad in ["2021-01-01T23:59:60", "2021-01-01T23:59:60.5", "2016-12-31T23:59:60.999"] {
            let err = handle("=", bad).unwrap_err();
            assert_eq!(err.to_string(), format!("invalid timestamp '{}'", bad));
        }
        assert_eq!(
            handle("<", "2021-01-01T23:59:59.999").unwrap().as_deref(),
            Some("created<'2021-01-01T23:59:59.999'")
        );
    }

    #[test]
    fn test_unsupported_relation() {
        let err = handle("adj", "2021-01-01").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported operator for: created adj 2021-01-01");
    }
}

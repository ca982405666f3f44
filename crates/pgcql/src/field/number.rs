use std::sync::LazyLock;

use pgcql_parser::CqlTermNode;
use regex::Regex;

use super::{CqlField, empty_term, ordered_op};
use crate::error::{PgCqlError, PgCqlResult};

/// Decimal numbers with optional sign, fraction and exponent. ASCII digits
/// only, since the term is emitted unquoted.
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?([0-9]+|[0-9]+\.[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$")
        .expect("numeric pattern is valid")
});

/// A numeric column. Terms are emitted verbatim once they match the numeric
/// grammar.
#[derive(Debug, Clone, Default)]
pub struct NumberField {
    column: String,
}

impl NumberField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `value` is a number this field accepts.
    pub fn is_numeric(value: &str) -> bool {
        NUMERIC.is_match(value)
    }
}

impl CqlField for NumberField {
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
        if !Self::is_numeric(term.term()) {
            return Err(PgCqlError::for_term("Bad numeric", term));
        }
        let op = ordered_op(term)?;
        Ok(Some(format!("{}{}{}", self.column, op, term.term())))
    }
}

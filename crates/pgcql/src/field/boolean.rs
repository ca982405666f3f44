use pgcql_parser::CqlTermNode;

use super::{CqlField, empty_term, unordered_op};
use crate::error::{PgCqlError, PgCqlResult};

/// A boolean column. Terms are `true` or `false` in any case.
#[derive(Debug, Clone, Default)]
pub struct BooleanField {
    column: String,
}

impl BooleanField {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CqlField for BooleanField {
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
        let value = if term.term().eq_ignore_ascii_case("true") {
            "TRUE"
        } else if term.term().eq_ignore_ascii_case("false") {
            "FALSE"
        } else {
            return Err(PgCqlError::for_term("Bad boolean", term));
        };
        let op = unordered_op(term)?;
        Ok(Some(format!("{}{}{}", self.column, op, value)))
    }
}

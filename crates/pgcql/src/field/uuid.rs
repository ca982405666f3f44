use pgcql_parser::CqlTermNode;
use uuid::Uuid;

use super::{CqlField, empty_term, unordered_op};
use crate::error::{PgCqlError, PgCqlResult};

/// Length of the hyphenated form, the only form accepted in queries.
const HYPHENATED_LEN: usize = 36;

/// A UUID column. Terms are canonicalised to lower-case hyphenated form.
#[derive(Debug, Clone, Default)]
pub struct UuidField {
    column: String,
}

impl UuidField {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CqlField for UuidField {
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
        let value = term.term();
        let uuid = match Uuid::parse_str(value) {
            Ok(uuid) if value.len() == HYPHENATED_LEN => uuid,
            _ => return Err(PgCqlError::for_term("Invalid UUID", term)),
        };
        let op = unordered_op(term)?;
        Ok(Some(format!("{}{}'{}'", self.column, op, uuid.hyphenated())))
    }
}

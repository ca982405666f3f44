use pgcql_parser::CqlTermNode;

use super::CqlField;
use crate::error::PgCqlResult;

/// A field that never constrains the result, whatever the relation or term.
///
/// Typically registered as `cql.allRecords` so that `cql.allRecords=1`
/// selects everything.
#[derive(Debug, Clone, Default)]
pub struct AlwaysMatchesField {
    column: String,
}

impl AlwaysMatchesField {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CqlField for AlwaysMatchesField {
    fn column(&self) -> &str {
        &self.column
    }

    fn set_column(&mut self, column: String) {
        self.column = column;
    }

    fn handle_term(&self, _term: &CqlTermNode) -> PgCqlResult<Option<String>> {
        Ok(None)
    }
}

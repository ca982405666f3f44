//! The field registry.

use std::collections::HashMap;

use tracing::debug;

use crate::error::PgCqlResult;
use crate::field::CqlField;
use crate::query::PgCqlQuery;

/// Maps CQL index names to field types.
///
/// Index names are case-insensitive. A field registered without a column
/// searches the column named like its index, lower-cased.
///
/// The definition is built once and then shared; parsing only borrows it.
#[derive(Debug, Default)]
pub struct PgCqlDefinition {
    fields: HashMap<String, Box<dyn CqlField>>,
}

impl PgCqlDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field, replacing any field with the same index name.
    pub fn add_field(&mut self, name: &str, field: impl CqlField + 'static) -> &mut Self {
        self.add_boxed_field(name, Box::new(field))
    }

    /// Registers an already boxed field.
    pub fn add_boxed_field(&mut self, name: &str, mut field: Box<dyn CqlField>) -> &mut Self {
        let key = name.to_lowercase();
        if field.column().is_empty() {
            field.set_column(key.clone());
        }
        debug!(index = %key, column = %field.column(), "Registered CQL field");
        self.fields.insert(key, field);
        self
    }

    /// Registers a field, builder style.
    pub fn with_field(mut self, name: &str, field: impl CqlField + 'static) -> Self {
        self.add_field(name, field);
        self
    }

    /// Looks up the field for an index name, ignoring case.
    pub fn field_type(&self, name: &str) -> Option<&dyn CqlField> {
        self.fields.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    /// Registered index names, lower-cased and sorted.
    pub fn indexes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parses up to two queries. When both are given they are combined with
    /// AND; a sort on the first is dropped and the second may not sort.
    pub fn parse(&self, query: Option<&str>, query2: Option<&str>) -> PgCqlResult<PgCqlQuery<'_>> {
        PgCqlQuery::parse(self, query, query2)
    }

    /// Parses a single query.
    pub fn parse_query(&self, query: &str) -> PgCqlResult<PgCqlQuery<'_>> {
        self.parse(Some(query), None)
    }
}

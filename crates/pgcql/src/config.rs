//! Field definitions loaded from JSON.
//!
//! ```json
//! { "fields": [
//!   { "index": "cql.allRecords", "type": "always_matches" },
//!   { "index": "title", "type": "text", "full_text": true, "language": "english" },
//!   { "index": "isbn", "type": "text", "like_ops": true },
//!   { "index": "cost", "type": "number", "column": "price" }
//! ]}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::definition::PgCqlDefinition;
use crate::error::{PgCqlError, PgCqlResult};
use crate::field::{
    AlwaysMatchesField, BooleanField, CqlField, NumberField, TextField, TimestampField, UuidField,
};

/// The built-in field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    AlwaysMatches,
    Boolean,
    Number,
    Uuid,
    Timestamp,
    Text,
}

/// One searchable index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    /// CQL index name, matched case-insensitively.
    pub index: String,

    #[serde(rename = "type")]
    pub kind: FieldKind,

    /// Column to search. Defaults to the lower-cased index name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    /// Text only: exact comparison.
    #[serde(default)]
    pub exact: bool,

    /// Text only: `LIKE` for masked terms; implies `exact`.
    #[serde(default)]
    pub like_ops: bool,

    /// Text only: full-text search.
    #[serde(default)]
    pub full_text: bool,

    /// Text search configuration for `full_text`; `simple` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// A set of field definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionConfig {
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

impl FieldConfig {
    fn invalid(&self, reason: &str) -> PgCqlError {
        warn!(index = %self.index, reason, "Rejected field definition");
        PgCqlError::Definition(format!("{}: {}", self.index, reason))
    }

    /// Creates the field this entry describes.
    pub fn to_field(&self) -> PgCqlResult<Box<dyn CqlField>> {
        if self.index.is_empty() {
            return Err(self.invalid("index must not be empty"));
        }
        if self.kind != FieldKind::Text && (self.exact || self.like_ops || self.full_text) {
            return Err(self.invalid("exact, like_ops and full_text apply to text fields only"));
        }
        if self.language.is_some() && !self.full_text {
            return Err(self.invalid("language requires full_text"));
        }

        let mut field: Box<dyn CqlField> = match self.kind {
            FieldKind::AlwaysMatches => Box::new(AlwaysMatchesField::new()),
            FieldKind::Boolean => Box::new(BooleanField::new()),
            FieldKind::Number => Box::new(NumberField::new()),
            FieldKind::Uuid => Box::new(UuidField::new()),
            FieldKind::Timestamp => Box::new(TimestampField::new()),
            FieldKind::Text => Box::new(self.text_field()?),
        };
        if let Some(column) = &self.column {
            field.set_column(column.clone());
        }
        Ok(field)
    }

    fn text_field(&self) -> PgCqlResult<TextField> {
        let mut field = TextField::new();
        if self.exact {
            field = field.with_exact();
        }
        if self.like_ops {
            field = field.with_like_ops();
        }
        if self.full_text {
            field = match self.language.as_deref() {
                Some("") => return Err(self.invalid("language must not be empty")),
                Some(language) => field.with_full_text(language),
                None => field.with_full_text_simple(),
            };
        }
        Ok(field)
    }
}

impl DefinitionConfig {
    /// Decodes a configuration from JSON text.
    pub fn from_json(json: &str) -> PgCqlResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and decodes a configuration file.
    pub fn load(path: impl AsRef<Path>) -> PgCqlResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading field definitions");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Builds the registry. Index names must be unique, ignoring case.
    pub fn build(&self) -> PgCqlResult<PgCqlDefinition> {
        let mut definition = PgCqlDefinition::new();
        for entry in &self.fields {
            if definition.field_type(&entry.index).is_some() {
                return Err(entry.invalid("duplicate index"));
            }
            definition.add_boxed_field(&entry.index, entry.to_field()?);
        }
        Ok(definition)
    }
}

//! CQL field types.
//!
//! A field type turns one CQL search clause into a PostgreSQL boolean
//! expression over its column. Each type knows which relations it accepts
//! and how its terms must look:
//!
//! | Type | Relations | Output |
//! |------|-----------|--------|
//! | [`AlwaysMatchesField`] | any | no constraint |
//! | [`BooleanField`] | `=` `==` `<>` | `col=TRUE` |
//! | [`NumberField`] | `=` `==` `<>` `<` `>` `<=` `>=` | `col>1.5` |
//! | [`UuidField`] | `=` `==` `<>` | `col='6736bd11-...'` |
//! | [`TimestampField`] | `=` `==` `<>` `<` `>` `<=` `>=` | `col>='2021-01-01'` |
//! | [`TextField`] | depends on enabled modes | `col = 'v'`, `col LIKE 'v%'`, tsquery |
//!
//! Custom types implement [`CqlField`] and are registered like the built-in ones.

mod always_matches;
mod boolean;
mod masking;
mod number;
mod text;
mod timestamp;
mod uuid;

use std::fmt;

use pgcql_parser::CqlTermNode;

use crate::error::{PgCqlError, PgCqlResult};

pub use always_matches::AlwaysMatchesField;
pub use boolean::BooleanField;
pub use masking::{LikePattern, masked_exact, masked_full_text, masked_like};
pub use number::NumberField;
pub use text::{DEFAULT_LANGUAGE, TextField};
pub use timestamp::TimestampField;
pub use self::uuid::UuidField;

/// A searchable CQL index backed by a column.
///
/// Implementations must be cheap to share: a [`PgCqlDefinition`](crate::PgCqlDefinition)
/// holding them is read concurrently once registration is done.
pub trait CqlField: fmt::Debug + Send + Sync {
    /// Column (or SQL expression) the field searches.
    fn column(&self) -> &str;

    /// Sets the column. An empty column is replaced by the lower-cased index
    /// name when the field is registered.
    fn set_column(&mut self, column: String);

    /// Sets the column, builder style.
    fn with_column(mut self, column: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.set_column(column.into());
        self
    }

    /// Translates a search clause into a SQL boolean expression.
    ///
    /// Returns `Ok(None)` when the clause places no constraint on the result.
    fn handle_term(&self, term: &CqlTermNode) -> PgCqlResult<Option<String>>;
}

/// Handles the empty term: `=` becomes `IS NOT NULL` and, when `null_test`
/// is set, `<>` becomes `IS NULL`.
///
/// Returns `None` when the term is not empty or the relation is not covered;
/// the caller then validates the term as usual.
pub fn empty_term(column: &str, term: &CqlTermNode, null_test: bool) -> Option<String> {
    if !term.term().is_empty() {
        return None;
    }
    match term.relation().base() {
        "=" => Some(format!("{} IS NOT NULL", column)),
        "<>" if null_test => Some(format!("{} IS NULL", column)),
        _ => None,
    }
}

/// Maps an equality relation to SQL: `==` is `=`, `=` and `<>` stay.
pub fn unordered_op(term: &CqlTermNode) -> PgCqlResult<&'static str> {
    match term.relation().base() {
        "==" | "=" => Ok("="),
        "<>" => Ok("<>"),
        _ => Err(PgCqlError::for_term("Unsupported operator", term)),
    }
}

/// Like [`unordered_op`], additionally allowing `<`, `>`, `<=` and `>=`.
pub fn ordered_op(term: &CqlTermNode) -> PgCqlResult<&'static str> {
    match term.relation().base() {
        "<" => Ok("<"),
        ">" => Ok(">"),
        "<=" => Ok("<="),
        ">=" => Ok(">="),
        _ => unordered_op(term),
    }
}

/// Builds a search clause; shared by the field tests.
#[cfg(test)]
pub(crate) fn term(index: &str, relation: &str, value: &str) -> CqlTermNode {
    CqlTermNode::new(index, pgcql_parser::CqlRelation::new(relation), value)
}

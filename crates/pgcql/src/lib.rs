//! CQL to PostgreSQL translation.
//!
//! A [`PgCqlDefinition`] maps CQL indexes to typed fields. Parsing a query
//! against it yields a [`PgCqlQuery`] that renders a WHERE condition and an
//! ORDER BY list ready to append to a `SELECT`.
//!
//! # Example
//!
//! ```
//! use pgcql::{AlwaysMatchesField, CqlField, NumberField, PgCqlDefinition, TextField};
//!
//! let definition = PgCqlDefinition::new()
//!     .with_field("cql.allRecords", AlwaysMatchesField::new())
//!     .with_field("title", TextField::new().with_full_text_simple())
//!     .with_field("cost", NumberField::new().with_column("price"));
//!
//! let query = definition
//!     .parse_query("title = dylan and cost < 10 sortby cost/sort.descending")
//!     .unwrap();
//! assert_eq!(
//!     query.where_clause().unwrap().as_deref(),
//!     Some("(to_tsvector('simple', title) @@ phraseto_tsquery('simple', 'dylan') AND price<10)")
//! );
//! assert_eq!(query.order_by_clause().unwrap().as_deref(), Some("price DESC"));
//!
//! let all = definition.parse_query("cql.allRecords = 1").unwrap();
//! assert_eq!(all.where_clause().unwrap(), None);
//! ```
//!
//! Terms are always emitted inside standard-conforming string literals with
//! quotes doubled, or, for numbers and booleans, only after validation.

pub mod config;
pub mod definition;
pub mod error;
pub mod field;
pub mod query;
pub mod tenant;

pub use config::{DefinitionConfig, FieldConfig, FieldKind};
pub use definition::PgCqlDefinition;
pub use error::{PgCqlError, PgCqlResult};
pub use field::{
    AlwaysMatchesField, BooleanField, CqlField, NumberField, TextField, TimestampField, UuidField,
};
pub use query::PgCqlQuery;
pub use tenant::{ModuleName, TenantId, TenantSchema, check_table_name};

pub use pgcql_parser as parser;

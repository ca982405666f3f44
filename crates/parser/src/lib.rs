//! Contextual Query Language (CQL) parser.
//!
//! Parses CQL 1.2 query strings such as
//!
//! ```text
//! title = "on the road" and cost < 10 sortby cost/sort.descending
//! ```
//!
//! into a [`CqlNode`] tree. Terms keep their backslash escapes verbatim; the
//! meaning of masking characters (`*`, `?`, `^`) is up to whoever consumes the
//! tree.
//!
//! # Example
//!
//! ```
//! use pgcql_parser::{CqlNode, CqlParser};
//!
//! let node = CqlParser::parse("dc.title == \"men's room\" sortby title").unwrap();
//! match &node {
//!     CqlNode::Sort(sort) => assert_eq!(sort.keys[0].base, "title"),
//!     _ => panic!("expected sort node"),
//! }
//! assert_eq!(node.to_cql(), "dc.title == \"men's room\" sortby title");
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{
    BooleanOp, CqlBooleanNode, CqlNode, CqlPrefixNode, CqlRelation, CqlSortNode, CqlTermNode,
    Modifier, ModifierSet, SERVER_CHOICE,
};
pub use error::{CqlParseError, CqlParseResult};
pub use parser::{CqlParser, MAX_DEPTH};

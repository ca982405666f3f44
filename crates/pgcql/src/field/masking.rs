//! CQL masking rules for text terms.
//!
//! CQL terms may contain the masking operators `*` (any sequence) and `?`
//! (any character) and the anchor `^`. A backslash escapes exactly one of
//! `*`, `?`, `^`, `"` or `\`. The functions here turn such terms into the
//! body of a standard-conforming PostgreSQL string literal, so single quotes
//! are always doubled and no input can leave the literal.

use pgcql_parser::CqlTermNode;

use crate::error::{PgCqlError, PgCqlResult};

const BAD_ESCAPE: &str = "A masking backslash in a CQL string must be followed by *, ?, ^, \" or \\";
const TRAILING_BACKSLASH: &str = "A CQL string must not end with a masking backslash";

/// A `LIKE` pattern produced by [`masked_like`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern {
    /// Pattern body, ready to put between single quotes.
    pub pattern: String,
    /// True when `*` or `?` were translated, i.e. `LIKE` is actually needed.
    pub wildcards: bool,
}

/// Reads the character after a backslash, rejecting anything that is not a
/// legal escape.
fn escaped(next: Option<char>, term: &CqlTermNode) -> PgCqlResult<char> {
    match next {
        Some(c @ ('*' | '?' | '^' | '"' | '\\')) => Ok(c),
        Some(_) => Err(PgCqlError::for_term(BAD_ESCAPE, term)),
        None => Err(PgCqlError::for_term(TRAILING_BACKSLASH, term)),
    }
}

/// Converts a term for exact comparison. Masking operators are rejected.
pub fn masked_exact(term: &CqlTermNode) -> PgCqlResult<String> {
    let mut out = String::with_capacity(term.term().len());
    let mut chars = term.term().chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(escaped(chars.next(), term)?),
            '*' => return Err(PgCqlError::for_term("Masking op * unsupported", term)),
            '?' => return Err(PgCqlError::for_term("Masking op ? unsupported", term)),
            '^' => return Err(PgCqlError::for_term("Anchor op ^ unsupported", term)),
            '\'' => out.push_str("''"),
            c => out.push(c),
        }
    }
    Ok(out)
}

/// Converts a term for full-text search. Masking is not supported there, so
/// the rules are those of [`masked_exact`].
pub fn masked_full_text(term: &CqlTermNode) -> PgCqlResult<String> {
    masked_exact(term)
}

/// Converts a term to a `LIKE` pattern: `*` becomes `%`, `?` becomes `_`,
/// and literal `%`, `_` and `\` are escaped with a backslash.
pub fn masked_like(term: &CqlTermNode) -> PgCqlResult<LikePattern> {
    let mut pattern = String::with_capacity(term.term().len() + 2);
    let mut wildcards = false;
    let mut chars = term.term().chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match escaped(chars.next(), term)? {
                '\\' => pattern.push_str("\\\\"),
                e => pattern.push(e),
            },
            '*' => {
                pattern.push('%');
                wildcards = true;
            }
            '?' => {
                pattern.push('_');
                wildcards = true;
            }
            '^' => return Err(PgCqlError::for_term("Anchor op ^ unsupported", term)),
            '%' | '_' => {
                pattern.push('\\');
                pattern.push(c);
            }
            '\'' => pattern.push_str("''"),
            c => pattern.push(c),
        }
    }
    Ok(LikePattern { pattern, wildcards })
}

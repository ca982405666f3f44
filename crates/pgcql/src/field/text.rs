use pgcql_parser::CqlTermNode;

use super::{CqlField, empty_term, masked_exact, masked_full_text, masked_like, unordered_op};
use crate::error::{PgCqlError, PgCqlResult};

/// Text search configuration used by [`TextField::with_full_text_simple`].
pub const DEFAULT_LANGUAGE: &str = "simple";

/// A text column.
///
/// No search mode is enabled by default; every relation is rejected until at
/// least one of these is set:
///
/// - [`with_exact`](Self::with_exact): `==`, `=` and `<>` compare the column
///   with the unmasked term.
/// - [`with_like_ops`](Self::with_like_ops): like exact, but terms using `*`
///   or `?` compile to `LIKE` / `NOT LIKE`.
/// - [`with_full_text`](Self::with_full_text): `=`, `adj` and `all` compile to
///   a PostgreSQL full-text match in the given text search configuration.
///
/// # Example
///
/// ```
/// use pgcql::{CqlField, TextField};
/// use pgcql_parser::{CqlRelation, CqlTermNode};
///
/// let field = TextField::new().with_like_ops().with_column("isbn");
/// let term = CqlTermNode::new("isbn", CqlRelation::new("="), "978-3*");
/// assert_eq!(
///     field.handle_term(&term).unwrap().as_deref(),
///     Some("isbn LIKE '978-3%'")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextField {
    column: String,
    language: Option<String>,
    exact: bool,
    like: bool,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables full-text search with the given text search configuration.
    pub fn with_full_text(mut self, language: &str) -> Self {
        self.language = Some(language.replace('\'', "''"));
        self
    }

    /// Enables full-text search with the `simple` configuration.
    pub fn with_full_text_simple(self) -> Self {
        self.with_full_text(DEFAULT_LANGUAGE)
    }

    /// Enables exact comparison.
    pub fn with_exact(mut self) -> Self {
        self.exact = true;
        self
    }

    /// Enables `LIKE` for masked terms. Implies [`with_exact`](Self::with_exact).
    pub fn with_like_ops(mut self) -> Self {
        self.exact = true;
        self.like = true;
        self
    }

    /// The full-text configuration, with single quotes doubled.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }

    pub fn is_like(&self) -> bool {
        self.like
    }

    fn full_text(&self, language: &str, term: &CqlTermNode) -> PgCqlResult<Option<String>> {
        let func = match term.relation().base() {
            "=" | "adj" => "phraseto_tsquery",
            "all" => "plainto_tsquery",
            _ => return Ok(None),
        };
        let query = masked_full_text(term)?;
        Ok(Some(format!(
            "to_tsvector('{language}', {}) @@ {func}('{language}', '{query}')",
            self.column
        )))
    }
}

impl CqlField for TextField {
    fn column(&self) -> &str {
        &self.column
    }

    fn set_column(&mut self, column: String) {
        self.column = column;
    }

    fn handle_term(&self, term: &CqlTermNode) -> PgCqlResult<Option<String>> {
        if let Some(sql) = empty_term(&self.column, term, self.exact) {
            if !self.exact {
                return Err(PgCqlError::for_term(
                    "= \"\" (not null test) is not supported",
                    term,
                ));
            }
            return Ok(Some(sql));
        }
        if let Some(language) = &self.language {
            if let Some(sql) = self.full_text(language, term)? {
                return Ok(Some(sql));
            }
        }
        if !self.exact {
            return Err(PgCqlError::for_term("Unsupported operator", term));
        }
        let base = term.relation().base();
        if self.like && matches!(base, "=" | "==" | "<>") {
            let like = masked_like(term)?;
            if like.wildcards {
                let op = if base == "<>" { "NOT LIKE" } else { "LIKE" };
                return Ok(Some(format!("{} {} '{}'", self.column, op, like.pattern)));
            }
        }
        let op = unordered_op(term)?;
        Ok(Some(format!("{} {} '{}'", self.column, op, masked_exact(term)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::term;

    fn handle(field: &TextField, relation: &str, value: &str) -> Result<Option<String>, String> {
        field
            .handle_term(&term("title", relation, value))
            .map_err(|e| e.to_string())
    }

    fn full_text() -> TextField {
        TextField::new().with_full_text_simple().with_column("title")
    }

    fn exact() -> TextField {
        TextField::new().with_exact().with_column("title")
    }

    fn like() -> TextField {
        TextField::new().with_like_ops().with_column("title")
    }

    // ========================================================================
    // Full text
    // ========================================================================

    #[test]
    fn test_full_text_relations() {
        let field = full_text();
        assert_eq!(
            handle(&field, "=", "men's room").unwrap().as_deref(),
            Some("to_tsvector('simple', title) @@ phraseto_tsquery('simple', 'men''s room')")
        );
        assert_eq!(
            handle(&field, "adj", "v1").unwrap().as_deref(),
            Some("to_tsvector('simple', title) @@ phraseto_tsquery('simple', 'v1')")
        );
        assert_eq!(
            handle(&field, "all", "v1 v2").unwrap().as_deref(),
            Some("to_tsvector('simple', title) @@ plainto_tsquery('simple', 'v1 v2')")
        );
    }

    #[test]
    fn test_full_text_language_is_quoted() {
        let field = TextField::new().with_full_text("o'lang").with_column("title");
        assert_eq!(field.language(), Some("o''lang"));
        assert_eq!(
            handle(&field, "=", "v").unwrap().as_deref(),
            Some("to_tsvector('o''lang', title) @@ phraseto_tsquery('o''lang', 'v')")
        );
    }

    #[test]
    fn test_full_text_only_rejects_others() {
        let field = full_text();
        assert_eq!(handle(&field, "==", "v1").unwrap_err(), "Unsupported operator for: title == v1");
        assert_eq!(handle(&field, ">", "").unwrap_err(), "Unsupported operator for: title > \"\"");
        assert_eq!(handle(&field, "<>", "").unwrap_err(), "Unsupported operator for: title <> \"\"");
        assert_eq!(
            handle(&field, "=", "").unwrap_err(),
            "= \"\" (not null test) is not supported for: title = \"\""
        );
        assert_eq!(handle(&field, "all", "v*").unwrap_err(), "Masking op * unsupported for: title all v*");
    }

    #[test]
    fn test_no_modes_rejects_everything() {
        let field = TextField::new().with_column("title");
        assert_eq!(handle(&field, "=", "v1").unwrap_err(), "Unsupported operator for: title = v1");
    }

    // ========================================================================
    // Exact
    // ========================================================================

    #[test]
    fn test_exact() {
        let field = exact();
        assert_eq!(handle(&field, "==", "v1").unwrap().as_deref(), Some("title = 'v1'"));
        assert_eq!(handle(&field, "<>", "v1").unwrap().as_deref(), Some("title <> 'v1'"));
        assert_eq!(handle(&field, "==", "").unwrap().as_deref(), Some("title = ''"));
        assert_eq!(handle(&field, "=", "").unwrap().as_deref(), Some("title IS NOT NULL"));
        assert_eq!(handle(&field, "<>", "").unwrap().as_deref(), Some("title IS NULL"));
        assert_eq!(handle(&field, "==", "v1*").unwrap_err(), "Masking op * unsupported for: title == v1*");
        assert_eq!(handle(&field, "all", "v1").unwrap_err(), "Unsupported operator for: title all v1");
    }

    #[test]
    fn test_full_text_and_exact() {
        let field = full_text().with_exact();
        assert!(handle(&field, "=", "v1").unwrap().unwrap().starts_with("to_tsvector"));
        assert_eq!(handle(&field, "==", "v1").unwrap().as_deref(), Some("title = 'v1'"));
    }

    // ========================================================================
    // LIKE
    // ========================================================================

    #[test]
    fn test_like() {
        let field = like();
        assert!(field.is_exact());
        assert_eq!(handle(&field, "=", "2*3").unwrap().as_deref(), Some("title LIKE '2%3'"));
        assert_eq!(handle(&field, "==", "a?").unwrap().as_deref(), Some("title LIKE 'a_'"));
        assert_eq!(handle(&field, "<>", "a*").unwrap().as_deref(), Some("title NOT LIKE 'a%'"));
        assert_eq!(handle(&field, "=", "2'4").unwrap().as_deref(), Some("title = '2''4'"));
        assert_eq!(handle(&field, "=", r"a\*").unwrap().as_deref(), Some("title = 'a*'"));
        assert_eq!(handle(&field, "=", "10%*").unwrap().as_deref(), Some(r"title LIKE '10\%%'"));
        assert_eq!(handle(&field, "=", "^a*").unwrap_err(), "Anchor op ^ unsupported for: title = ^a*");
    }

    #[test]
    fn test_like_ordered_relation() {
        let field = like();
        assert_eq!(handle(&field, ">", "a*").unwrap_err(), "Unsupported operator for: title > a*");
    }
}

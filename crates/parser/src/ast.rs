//! CQL syntax tree.
//!
//! Every node renders back to canonical CQL through [`fmt::Display`]. The
//! rendering re-parses to an equivalent tree, which is what allows two queries
//! to be combined textually.

use std::fmt;

use serde::Serialize;

use crate::lexer::is_reserved_word;

/// Index assigned to terms written without an index.
pub const SERVER_CHOICE: &str = "cql.serverChoice";

/// A node of a parsed CQL query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CqlNode {
    /// `left op right`
    Boolean(CqlBooleanNode),
    /// `index relation term`
    Term(CqlTermNode),
    /// `query sortby keys`
    Sort(CqlSortNode),
    /// `>prefix="uri" query`
    Prefix(CqlPrefixNode),
}

impl CqlNode {
    /// Renders this node as canonical CQL.
    pub fn to_cql(&self) -> String {
        self.to_string()
    }

    /// Returns the term node, if this is one.
    pub fn as_term(&self) -> Option<&CqlTermNode> {
        match self {
            CqlNode::Term(term) => Some(term),
            _ => None,
        }
    }
}

impl fmt::Display for CqlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CqlNode::Boolean(node) => node.fmt(f),
            CqlNode::Term(node) => node.fmt(f),
            CqlNode::Sort(node) => node.fmt(f),
            CqlNode::Prefix(node) => node.fmt(f),
        }
    }
}

/// Boolean operators. They are left-associative and share one precedence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanOp {
    And,
    Or,
    Not,
    Prox,
}

impl BooleanOp {
    /// Parses a boolean keyword (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Some(BooleanOp::And),
            "or" => Some(BooleanOp::Or),
            "not" => Some(BooleanOp::Not),
            "prox" => Some(BooleanOp::Prox),
            _ => None,
        }
    }

    /// Upper-case operator name, as used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            BooleanOp::And => "AND",
            BooleanOp::Or => "OR",
            BooleanOp::Not => "NOT",
            BooleanOp::Prox => "PROX",
        }
    }

    /// Lower-case keyword, as written in CQL.
    pub fn keyword(&self) -> &'static str {
        match self {
            BooleanOp::And => "and",
            BooleanOp::Or => "or",
            BooleanOp::Not => "not",
            BooleanOp::Prox => "prox",
        }
    }
}

/// A `/name` or `/name<comparitor>value` modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Modifier {
    /// Modifier name, e.g. `sort.descending`.
    pub name: String,
    /// Comparison symbol when a value is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,
    /// Modifier value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Modifier {
    /// Creates a value-less modifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comparison: None,
            value: None,
        }
    }

    /// Creates a modifier with a comparison and value.
    pub fn with_value(
        name: impl Into<String>,
        comparison: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            comparison: Some(comparison.into()),
            value: Some(value.into()),
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", maybe_quote(&self.name))?;
        if let (Some(comparison), Some(value)) = (&self.comparison, &self.value) {
            write!(f, "{}{}", comparison, maybe_quote(value))?;
        }
        Ok(())
    }
}

/// A relation: base comparitor (`=`, `==`, `adj`, ...) plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CqlRelation {
    /// `=`, `==`, `<>`, `<`, `>`, `<=`, `>=` or a lower-cased named relation.
    pub base: String,
    /// Relation modifiers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

impl CqlRelation {
    /// Creates a relation without modifiers.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            modifiers: Vec::new(),
        }
    }

    /// Returns the base comparitor.
    pub fn base(&self) -> &str {
        &self.base
    }
}

impl fmt::Display for CqlRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        for modifier in &self.modifiers {
            modifier.fmt(f)?;
        }
        Ok(())
    }
}

/// A search clause: `index relation term`.
///
/// The term keeps backslash escapes exactly as written; interpreting masking
/// characters is left to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CqlTermNode {
    pub index: String,
    pub relation: CqlRelation,
    pub term: String,
}

impl CqlTermNode {
    /// Creates a term node.
    pub fn new(index: impl Into<String>, relation: CqlRelation, term: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            relation,
            term: term.into(),
        }
    }

    /// Index name as written.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Relation of the clause.
    pub fn relation(&self) -> &CqlRelation {
        &self.relation
    }

    /// Term text, escapes included.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Renders this clause as canonical CQL.
    pub fn to_cql(&self) -> String {
        self.to_string()
    }

    fn is_server_choice(&self) -> bool {
        (self.index.eq_ignore_ascii_case(SERVER_CHOICE)
            || self.index.eq_ignore_ascii_case("srw.serverChoice"))
            && self.relation.base == "="
            && self.relation.modifiers.is_empty()
    }
}

impl fmt::Display for CqlTermNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_server_choice() {
            return f.write_str(&maybe_quote(&self.term));
        }
        write!(
            f,
            "{} {} {}",
            maybe_quote(&self.index),
            self.relation,
            render_term(&self.term)
        )
    }
}

/// Two sub-queries joined by a boolean operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CqlBooleanNode {
    pub op: BooleanOp,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
    pub left: Box<CqlNode>,
    pub right: Box<CqlNode>,
}

impl fmt::Display for CqlBooleanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.left, self.op.keyword())?;
        for modifier in &self.modifiers {
            modifier.fmt(f)?;
        }
        write!(f, " ({})", self.right)
    }
}

/// A sort key: index name plus modifiers such as `sort.descending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifierSet {
    pub base: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

impl ModifierSet {
    /// Creates a sort key without modifiers.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            modifiers: Vec::new(),
        }
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&maybe_quote(&self.base))?;
        for modifier in &self.modifiers {
            modifier.fmt(f)?;
        }
        Ok(())
    }
}

/// A query with a `sortby` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CqlSortNode {
    pub subtree: Box<CqlNode>,
    pub keys: Vec<ModifierSet>,
}

impl fmt::Display for CqlSortNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sortby", self.subtree)?;
        for key in &self.keys {
            write!(f, " {}", key)?;
        }
        Ok(())
    }
}

/// A namespace declaration, `>name="uri"` or `>"uri"`, scoping a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CqlPrefixNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub uri: String,
    pub subtree: Box<CqlNode>,
}

impl fmt::Display for CqlPrefixNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(">")?;
        if let Some(name) = &self.name {
            write!(f, "{}=", maybe_quote(name))?;
        }
        write!(f, "\"{}\" ({})", self.uri, self.subtree)
    }
}

/// Double-quotes `s` when it would not survive re-parsing as a bare word.
fn maybe_quote(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || is_reserved_word(s)
        || s.chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '=' | '<' | '>' | '/' | '"'));
    if needs_quotes {
        format!("\"{}\"", s)
    } else {
        s.to_string()
    }
}

/// Renders the term of a search clause. A term ending in an unpaired
/// backslash cannot be written between quotes, so a phrase of bare words is
/// written as is; the parser joins such words back into one term.
fn render_term(term: &str) -> String {
    let trailing = term.chars().rev().take_while(|c| *c == '\\').count();
    if trailing % 2 == 1 && is_bare_phrase(term) {
        return term.to_string();
    }
    maybe_quote(term)
}

/// Words separated by single spaces. Only the first word may be reserved.
fn is_bare_phrase(term: &str) -> bool {
    let is_bare = |w: &str| {
        !w.is_empty()
            && !w
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '=' | '<' | '>' | '/' | '"'))
    };
    let mut words = term.split(' ');
    words.next().is_some_and(is_bare) && words.all(|w| is_bare(w) && !is_reserved_word(w))
}

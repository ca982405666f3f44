//! Compilation of parsed CQL into SQL fragments.

use pgcql_parser::{BooleanOp, CqlNode, CqlParser, CqlSortNode};
use tracing::{debug, trace};

use crate::definition::PgCqlDefinition;
use crate::error::{PgCqlError, PgCqlResult};
use crate::field::CqlField;
use crate::tenant::check_table_name;

/// A parsed CQL query bound to the definition it is compiled against.
#[derive(Debug, Clone)]
pub struct PgCqlQuery<'a> {
    root: Option<CqlNode>,
    definition: &'a PgCqlDefinition,
}

/// Removes the sort of a query, looking through prefix assignments.
fn strip_sort(node: CqlNode) -> CqlNode {
    match node {
        CqlNode::Sort(sort) => *sort.subtree,
        CqlNode::Prefix(mut prefix) => {
            prefix.subtree = Box::new(strip_sort(*prefix.subtree));
            CqlNode::Prefix(prefix)
        }
        other => other,
    }
}

/// Finds the sort of a query, looking through prefix assignments.
fn find_sort(node: &CqlNode) -> Option<&CqlSortNode> {
    match node {
        CqlNode::Sort(sort) => Some(sort),
        CqlNode::Prefix(prefix) => find_sort(&prefix.subtree),
        _ => None,
    }
}

impl<'a> PgCqlQuery<'a> {
    /// Parses `query` and `query2`. With both present the result is
    /// `(query) AND (query2)` with any sort of `query` removed.
    pub fn parse(
        definition: &'a PgCqlDefinition,
        query: Option<&str>,
        query2: Option<&str>,
    ) -> PgCqlResult<Self> {
        let cql = match (query, query2) {
            (None, None) => {
                return Ok(Self {
                    root: None,
                    definition,
                });
            }
            (Some(q1), Some(q2)) => {
                let first = strip_sort(CqlParser::parse(q1)?);
                format!("({}) AND ({})", first, q2)
            }
            (Some(q), None) | (None, Some(q)) => q.to_string(),
        };
        debug!(cql = %cql, "Parsing CQL query");
        let root = CqlParser::parse(&cql)?;
        Ok(Self {
            root: Some(root),
            definition,
        })
    }

    /// The parsed tree, if any query was given.
    pub fn root(&self) -> Option<&CqlNode> {
        self.root.as_ref()
    }

    /// The WHERE condition, or `None` when the query places no constraint.
    pub fn where_clause(&self) -> PgCqlResult<Option<String>> {
        match &self.root {
            Some(node) => self.compile_where(node),
            None => Ok(None),
        }
    }

    /// The ORDER BY list with explicit directions, e.g. `cost DESC, title ASC`.
    pub fn order_by_clause(&self) -> PgCqlResult<Option<String>> {
        self.compile_order_by(true)
    }

    /// The ORDER BY columns without directions, e.g. `cost, title`.
    pub fn order_by_fields(&self) -> PgCqlResult<Option<String>> {
        self.compile_order_by(false)
    }

    /// A complete `SELECT *` statement over `from`, which must be a plain or
    /// schema-qualified table name.
    pub fn select_sql(&self, from: &str) -> PgCqlResult<String> {
        let mut sql = format!("SELECT * FROM {}", check_table_name(from)?);
        if let Some(condition) = self.where_clause()? {
            sql.push_str(" WHERE ");
            sql.push_str(&condition);
        }
        if let Some(order) = self.order_by_clause()? {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order);
        }
        Ok(sql)
    }

    fn resolve(&self, index: &str) -> PgCqlResult<&'a dyn CqlField> {
        self.definition
            .field_type(index)
            .ok_or_else(|| PgCqlError::new(format!("Unsupported CQL index: {}", index)))
    }

    fn compile_where(&self, node: &CqlNode) -> PgCqlResult<Option<String>> {
        match node {
            CqlNode::Boolean(boolean) => {
                let left = self.compile_where(&boolean.left)?;
                let right = self.compile_where(&boolean.right)?;
                match boolean.op {
                    BooleanOp::And => Ok(match (left, right) {
                        (Some(l), Some(r)) => Some(format!("({} AND {})", l, r)),
                        (l, None) => l,
                        (None, r) => r,
                    }),
                    BooleanOp::Or => Ok(match (left, right) {
                        (Some(l), Some(r)) => Some(format!("({} OR {})", l, r)),
                        _ => None,
                    }),
                    BooleanOp::Not => Ok(Some(match (left, right) {
                        (Some(l), Some(r)) => format!("({} AND NOT {})", l, r),
                        (None, Some(r)) => format!("NOT ({})", r),
                        _ => "FALSE".to_string(),
                    })),
                    op => Err(PgCqlError::new(format!("Unsupported operator {}", op.name()))),
                }
            }
            CqlNode::Term(term) => {
                let field = self.resolve(term.index())?;
                trace!(index = %term.index(), relation = %term.relation().base(), "Compiling search clause");
                field.handle_term(term)
            }
            CqlNode::Sort(sort) => self.compile_where(&sort.subtree),
            CqlNode::Prefix(prefix) => self.compile_where(&prefix.subtree),
        }
    }

    fn compile_order_by(&self, directions: bool) -> PgCqlResult<Option<String>> {
        let Some(sort) = self.root.as_ref().and_then(find_sort) else {
            return Ok(None);
        };
        let mut keys = Vec::with_capacity(sort.keys.len());
        for key in &sort.keys {
            let column = self.resolve(&key.base)?.column();
            if !directions {
                keys.push(column.to_string());
                continue;
            }
            let mut direction = "ASC";
            for modifier in &key.modifiers {
                match modifier.name.as_str() {
                    "sort.ascending" => {}
                    "sort.descending" => direction = "DESC",
                    other => {
                        return Err(PgCqlError::new(format!("Unsupported sort modifier: {}", other)));
                    }
                }
            }
            keys.push(format!("{} {}", column, direction));
        }
        Ok(Some(keys.join(", ")))
    }
}

//! Recursive-descent parser for CQL 1.2.
//!
//! # Grammar
//!
//! ```text
//! sortedQuery   = prefixAssign sortedQuery / scopedClause ["sortby" 1*sortKey]
//! cqlQuery      = prefixAssign cqlQuery / scopedClause
//! scopedClause  = searchClause *(boolean [modifiers] searchClause)
//! boolean       = "and" / "or" / "not" / "prox"
//! searchClause  = "(" cqlQuery ")" / index relation [modifiers] term / term
//! relation      = "=" / "==" / "<>" / "<" / ">" / "<=" / ">=" / word
//! modifiers     = 1*("/" name [comparitor value])
//! prefixAssign  = ">" name "=" uri / ">" uri
//! sortKey       = index [modifiers]
//! ```
//!
//! Booleans are left-associative and share one precedence level, so
//! `a=1 or b=2 and c=3` is `(a=1 or b=2) and c=3`.
//!
//! Trees are at most [`MAX_DEPTH`] levels deep. Each boolean operator,
//! parenthesis and prefix assignment adds a level; deeper queries are
//! rejected with `query too deeply nested`.

use tracing::trace;

use crate::ast::{
    BooleanOp, CqlBooleanNode, CqlNode, CqlPrefixNode, CqlRelation, CqlSortNode, CqlTermNode,
    Modifier, ModifierSet, SERVER_CHOICE,
};
use crate::error::{CqlParseError, CqlParseResult};
use crate::lexer::{Lexer, Token};

/// Maximum nesting of the parsed tree.
pub const MAX_DEPTH: usize = 256;

/// Parser for CQL query strings.
pub struct CqlParser<'a> {
    lexer: Lexer<'a>,
    token: Token,
    position: usize,
    depth: usize,
}

impl<'a> CqlParser<'a> {
    /// Creates a parser and reads the first token.
    pub fn new(input: &'a str) -> CqlParseResult<Self> {
        let mut lexer = Lexer::new(input);
        let (token, position) = lexer.next_token()?;
        Ok(Self {
            lexer,
            token,
            position,
            depth: 0,
        })
    }

    /// Parses a complete query, including prefixes and a trailing `sortby`.
    pub fn parse(input: &str) -> CqlParseResult<CqlNode> {
        trace!(query = %input, "parsing CQL");
        let mut parser = CqlParser::new(input)?;
        let node = parser.parse_sorted_query()?;
        if parser.token != Token::Eof {
            return Err(parser.unexpected("boolean or sortby"));
        }
        Ok(node)
    }

    fn advance(&mut self) -> CqlParseResult<Token> {
        let (next, position) = self.lexer.next_token()?;
        self.position = position;
        Ok(std::mem::replace(&mut self.token, next))
    }

    /// Enters one more tree level.
    fn descend(&mut self) -> CqlParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CqlParseError::new("query too deeply nested", self.position));
        }
        Ok(())
    }

    fn unexpected(&self, expected: &str) -> CqlParseError {
        CqlParseError::new(
            format!("expected {}, got {}", expected, self.token),
            self.position,
        )
    }

    fn parse_sorted_query(&mut self) -> CqlParseResult<CqlNode> {
        if self.token == Token::Comparitor(">") {
            return self.parse_prefix(Self::parse_sorted_query);
        }
        let node = self.parse_scoped_clause()?;
        if !self.token.is_keyword("sortby") {
            return Ok(node);
        }
        self.advance()?;

        let mut keys = Vec::new();
        while matches!(self.token, Token::Word(_) | Token::Quoted(_)) {
            let base = self.match_symbol("sort index")?;
            let modifiers = self.parse_modifiers()?;
            keys.push(ModifierSet { base, modifiers });
        }
        if keys.is_empty() {
            return Err(self.unexpected("sort index"));
        }
        Ok(CqlNode::Sort(CqlSortNode {
            subtree: Box::new(node),
            keys,
        }))
    }

    fn parse_query(&mut self) -> CqlParseResult<CqlNode> {
        if self.token == Token::Comparitor(">") {
            return self.parse_prefix(Self::parse_query);
        }
        self.parse_scoped_clause()
    }

    /// Parses `>name="uri"` or `>"uri"`, then the scoped query via `rest`.
    fn parse_prefix(
        &mut self,
        rest: fn(&mut Self) -> CqlParseResult<CqlNode>,
    ) -> CqlParseResult<CqlNode> {
        self.descend()?;
        self.advance()?;
        let first = self.match_symbol("prefix name or uri")?;
        let (name, uri) = if self.token == Token::Comparitor("=") {
            self.advance()?;
            (Some(first), self.match_symbol("prefix uri")?)
        } else {
            (None, first)
        };
        let subtree = rest(self)?;
        self.depth -= 1;
        Ok(CqlNode::Prefix(CqlPrefixNode {
            name,
            uri,
            subtree: Box::new(subtree),
        }))
    }

    /// Every boolean in the chain deepens the left spine, so the depth is
    /// only restored once the whole chain is read.
    fn parse_scoped_clause(&mut self) -> CqlParseResult<CqlNode> {
        let depth = self.depth;
        let mut left = self.parse_search_clause()?;
        loop {
            let op = match &self.token {
                Token::Word(w) => BooleanOp::parse(w),
                _ => None,
            };
            let Some(op) = op else {
                self.depth = depth;
                return Ok(left);
            };
            self.descend()?;
            self.advance()?;
            let modifiers = self.parse_modifiers()?;
            let right = self.parse_search_clause()?;
            left = CqlNode::Boolean(CqlBooleanNode {
                op,
                modifiers,
                left: Box::new(left),
                right: Box::new(right),
            });
        }
    }

    fn parse_search_clause(&mut self) -> CqlParseResult<CqlNode> {
        match self.token {
            Token::LParen => {
                self.descend()?;
                self.advance()?;
                let node = self.parse_query()?;
                if self.token != Token::RParen {
                    return Err(self.unexpected("\")\""));
                }
                self.advance()?;
                self.depth -= 1;
                Ok(node)
            }
            Token::Word(_) | Token::Quoted(_) => {
                let first = self.match_symbol("index or term")?;
                let base = match &self.token {
                    Token::Comparitor(c) => Some(c.to_string()),
                    Token::Word(w) if !self.token.is_reserved() => Some(w.to_ascii_lowercase()),
                    _ => None,
                };
                let Some(base) = base else {
                    return Ok(CqlNode::Term(CqlTermNode::new(
                        SERVER_CHOICE,
                        CqlRelation::new("="),
                        first,
                    )));
                };
                self.advance()?;
                let modifiers = self.parse_modifiers()?;
                let term = self.parse_term()?;
                Ok(CqlNode::Term(CqlTermNode {
                    index: first,
                    relation: CqlRelation { base, modifiers },
                    term,
                }))
            }
            _ => Err(self.unexpected("index or term")),
        }
    }

    /// Parses a search term. Reserved words are allowed here; consecutive bare
    /// words are joined with single spaces.
    fn parse_term(&mut self) -> CqlParseResult<String> {
        match self.advance()? {
            Token::Quoted(s) => Ok(s),
            Token::Word(w) => {
                let mut term = w;
                while matches!(self.token, Token::Word(_)) && !self.token.is_reserved() {
                    if let Token::Word(next) = self.advance()? {
                        term.push(' ');
                        term.push_str(&next);
                    }
                }
                Ok(term)
            }
            other => Err(CqlParseError::new(
                format!("expected search term, got {}", other),
                self.position,
            )),
        }
    }

    fn parse_modifiers(&mut self) -> CqlParseResult<Vec<Modifier>> {
        let mut modifiers = Vec::new();
        while self.token == Token::Slash {
            self.advance()?;
            let name = self.match_symbol("modifier name")?;
            let modifier = if let Token::Comparitor(c) = self.token {
                self.advance()?;
                let value = self.match_symbol("modifier value")?;
                Modifier::with_value(name, c, value)
            } else {
                Modifier::new(name)
            };
            modifiers.push(modifier);
        }
        Ok(modifiers)
    }

    /// Consumes a word or quoted string.
    fn match_symbol(&mut self, expected: &str) -> CqlParseResult<String> {
        let symbol = match &self.token {
            Token::Word(s) | Token::Quoted(s) => s.clone(),
            _ => return Err(self.unexpected(expected)),
        };
        self.advance()?;
        Ok(symbol)
    }
}

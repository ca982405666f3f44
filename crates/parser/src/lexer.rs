//! Tokenizer for CQL query strings.

use std::fmt;

use crate::error::{CqlParseError, CqlParseResult};

/// Characters that terminate an unquoted word.
const WORD_BREAKS: &[char] = &['(', ')', '=', '<', '>', '"', '/'];

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `/`, introducing a modifier.
    Slash,
    /// One of `=`, `==`, `<>`, `<`, `>`, `<=`, `>=`.
    Comparitor(&'static str),
    /// Unquoted word. Keywords are words too; see [`Token::is_keyword`].
    Word(String),
    /// Contents of a double-quoted string, backslash escapes kept verbatim.
    Quoted(String),
    /// End of input.
    Eof,
}

impl Token {
    /// Returns true if this is the given keyword (case-insensitive).
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }

    /// Returns true for `and`, `or`, `not`, `prox` and `sortby`.
    pub fn is_reserved(&self) -> bool {
        matches!(self, Token::Word(w) if is_reserved_word(w))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "\"(\""),
            Token::RParen => write!(f, "\")\""),
            Token::Slash => write!(f, "\"/\""),
            Token::Comparitor(c) => write!(f, "\"{}\"", c),
            Token::Word(w) => write!(f, "\"{}\"", w),
            Token::Quoted(s) => write!(f, "quoted string \"{}\"", s),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

/// Returns true if `word` is a reserved CQL word.
pub fn is_reserved_word(word: &str) -> bool {
    ["and", "or", "not", "prox", "sortby"]
        .iter()
        .any(|k| word.eq_ignore_ascii_case(k))
}

/// Splits a query string into [`Token`]s.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Returns the next token together with its starting byte offset.
    pub fn next_token(&mut self) -> CqlParseResult<(Token, usize)> {
        self.skip_whitespace();
        let start = self.pos;
        let Some(c) = self.bump() else {
            return Ok((Token::Eof, start));
        };

        let token = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '/' => Token::Slash,
            '=' => {
                if self.peek() == Some('=') {
                    self.bump();
                    Token::Comparitor("==")
                } else {
                    Token::Comparitor("=")
                }
            }
            '<' => match self.peek() {
                Some('=') => {
                    self.bump();
                    Token::Comparitor("<=")
                }
                Some('>') => {
                    self.bump();
                    Token::Comparitor("<>")
                }
                _ => Token::Comparitor("<"),
            },
            '>' => {
                if self.peek() == Some('=') {
                    self.bump();
                    Token::Comparitor(">=")
                } else {
                    Token::Comparitor(">")
                }
            }
            '"' => Token::Quoted(self.quoted(start)?),
            _ => {
                while let Some(c) = self.peek() {
                    if c.is_whitespace() || WORD_BREAKS.contains(&c) {
                        break;
                    }
                    self.pos += c.len_utf8();
                }
                Token::Word(self.input[start..self.pos].to_string())
            }
        };
        Ok((token, start))
    }

    /// Reads the rest of a quoted string; the opening quote is already consumed.
    fn quoted(&mut self, start: usize) -> CqlParseResult<String> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(value),
                Some('\\') => {
                    value.push('\\');
                    match self.bump() {
                        Some(escaped) => value.push(escaped),
                        None => break,
                    }
                }
                Some(c) => value.push(c),
                None => break,
            }
        }
        Err(CqlParseError::new("unterminated quoted string", start))
    }
}

//! Markdown parser
//!
//! Recursive descent parser that converts a token stream into a Markdown AST.
//!
//! Inline content is parsed against a *bound set*: the token texts that end
//! the current construct. Each emphasis level parses its children with a
//! copy of the enclosing set extended by its own closers, so a nested run
//! never reads past the end of the construct around it.

use std::collections::BTreeSet;
use std::fmt;

use crate::ast::{Document, Node};
use crate::lexer::{Lexer, Token};
use thiserror::Error;

const NEWLINE: &str = "\n";
const FENCE: &str = "```";
const BACKTICK: &str = "`";
const ITALIC_MARKERS: [&str; 2] = ["*", "_"];
const BOLD_MARKERS: [&str; 2] = ["**", "__"];

/// Parser errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{line}:{column}: expected {expected}, got {found}")]
    UnexpectedToken {
        expected: String,
        found: Found,
        line: usize,
        column: usize,
    },

    #[error("{line}:{column}: expected {expected}, got end of input")]
    UnexpectedEof {
        expected: String,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. } | Self::UnexpectedEof { line, .. } => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            Self::UnexpectedToken { column, .. } | Self::UnexpectedEof { column, .. } => *column,
        }
    }
}

/// The offending token in a diagnostic
///
/// Special tokens are quoted verbatim, plain text is only reported as "text".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Found {
    Special(String),
    Text,
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Special(text) => write!(f, "`{}`", text),
            Self::Text => f.write_str("text"),
        }
    }
}

impl From<&Token> for Found {
    fn from(token: &Token) -> Self {
        if token.is_special() {
            Self::Special(token.text.clone())
        } else {
            Self::Text
        }
    }
}

/// Parse result type
pub type ParseResult<T> = Result<T, ParseError>;

/// Token texts that end an inline run
///
/// Extending a bound set returns a new one; the receiver is never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Bounds(BTreeSet<&'static str>);

impl Bounds {
    /// The outermost bound set: end of line
    pub fn line() -> Self {
        Self(BTreeSet::from([NEWLINE]))
    }

    /// A copy of this set with `extra` added
    pub fn with(&self, extra: &[&'static str]) -> Self {
        let mut set = self.0.clone();
        set.extend(extra.iter().copied());
        Self(set)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.0.contains(text)
    }
}

/// Markdown parser
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a parser over an already tokenized source
    ///
    /// The last token is treated as the end-of-input sentinel.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Create a parser from source text or bytes
    pub fn from_source(source: impl AsRef<[u8]>) -> Self {
        Self::new(Lexer::tokenize(source))
    }

    /// Parse the entire document
    pub fn parse(&mut self) -> ParseResult<Document> {
        let mut nodes = Vec::new();

        while !self.is_at_end() {
            if let Some(node) = self.parse_node()? {
                nodes.push(node);
            }
        }

        log::debug!(
            "parsed {} block nodes from {} tokens",
            nodes.len(),
            self.tokens.len()
        );
        Ok(Document { nodes })
    }

    /// Parse one top-level node; a blank line yields `None`
    fn parse_node(&mut self) -> ParseResult<Option<Node>> {
        if self.check("#") {
            self.parse_header().map(Some)
        } else if self.check(FENCE) {
            self.parse_verbatim(FENCE)
                .map(|text| Some(Node::CodeBlock { text }))
        } else if self.check("!") {
            self.parse_image().map(Some)
        } else if self.accept(NEWLINE).is_some() {
            Ok(None)
        } else {
            self.parse_paragraph().map(Some)
        }
    }

    /// Parse `#`... followed by a line of inline content
    fn parse_header(&mut self) -> ParseResult<Node> {
        self.expect("#")?;
        let mut level = 1;
        while self.accept("#").is_some() {
            level += 1;
        }
        let children = self.parse_inline(&Bounds::line())?;
        log::trace!("header level {} with {} children", level, children.len());
        Ok(Node::Header { level, children })
    }

    fn parse_paragraph(&mut self) -> ParseResult<Node> {
        let children = self.parse_inline(&Bounds::line())?;
        Ok(Node::Paragraph { children })
    }

    /// Parse `![alt](url)`
    fn parse_image(&mut self) -> ParseResult<Node> {
        self.expect("!")?;
        let (alt, url) = self.parse_bracketed_target()?;
        Ok(Node::Image { alt, url })
    }

    /// Parse `[text](url)`
    fn parse_link(&mut self) -> ParseResult<Node> {
        let (text, url) = self.parse_bracketed_target()?;
        Ok(Node::Link { text, url })
    }

    /// Parse `[label](target)`, where label and target are one token each
    fn parse_bracketed_target(&mut self) -> ParseResult<(String, String)> {
        self.expect("[")?;
        let label = self.take_text("link text")?;
        self.expect("]")?;
        self.expect("(")?;
        let target = self.take_text("link target")?;
        self.expect(")")?;
        Ok((label, target))
    }

    /// Parse raw tokens between two `delimiter` tokens, without formatting
    fn parse_verbatim(&mut self, delimiter: &str) -> ParseResult<String> {
        self.expect(delimiter)?;
        let mut text = String::new();
        while self.accept(delimiter).is_none() {
            // The sentinel is not source text, so running into it means
            // the span was never closed
            if self.is_at_end() {
                return Err(self.unexpected_eof(&quote(delimiter)));
            }
            text.push_str(&self.take_text(delimiter)?);
        }
        Ok(text)
    }

    /// Parse inline content until the next token is in `bounds`
    fn parse_inline(&mut self, bounds: &Bounds) -> ParseResult<Vec<Node>> {
        let mut nodes = Vec::new();

        loop {
            let Some(token) = self.peek() else {
                return Err(self.unexpected_eof(&quote(NEWLINE)));
            };
            if bounds.contains(&token.text) {
                break;
            }

            let node = if self.check_any(&ITALIC_MARKERS) {
                self.parse_italic(bounds)?
            } else if self.check_any(&BOLD_MARKERS) {
                self.parse_bold(bounds)?
            } else if self.check(BACKTICK) {
                Node::Code {
                    text: self.parse_verbatim(BACKTICK)?,
                }
            } else if self.check("[") {
                self.parse_link()?
            } else {
                Node::Text {
                    text: self.take_text("text")?,
                }
            };
            nodes.push(node);
        }

        Ok(nodes)
    }

    fn parse_italic(&mut self, bounds: &Bounds) -> ParseResult<Node> {
        self.advance();
        let children = self.parse_inline(&bounds.with(&ITALIC_MARKERS))?;
        self.expect_either(ITALIC_MARKERS)?;
        Ok(Node::Italic { children })
    }

    fn parse_bold(&mut self, bounds: &Bounds) -> ParseResult<Node> {
        self.advance();
        let children = self.parse_inline(&bounds.with(&BOLD_MARKERS))?;
        self.expect_either(BOLD_MARKERS)?;
        Ok(Node::Bold { children })
    }

    // Helper methods

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        if self.pos < self.tokens.len() {
            let token = &self.tokens[self.pos];
            self.pos += 1;
            Some(token)
        } else {
            None
        }
    }

    fn check(&self, text: &str) -> bool {
        self.peek().map(|t| t.text == text).unwrap_or(false)
    }

    fn check_any(&self, texts: &[&str]) -> bool {
        texts.iter().any(|text| self.check(text))
    }

    /// Whether only the sentinel (or nothing) is left
    fn is_at_end(&self) -> bool {
        self.pos + 1 >= self.tokens.len()
    }

    fn accept(&mut self, text: &str) -> Option<&Token> {
        if self.check(text) { self.advance() } else { None }
    }

    fn expect(&mut self, text: &str) -> ParseResult<()> {
        if self.accept(text).is_some() {
            Ok(())
        } else {
            Err(self.unexpected(quote(text)))
        }
    }

    /// Accept the first closer, or failing that the second
    fn expect_either(&mut self, [first, second]: [&str; 2]) -> ParseResult<()> {
        if self.accept(first).is_some() || self.accept(second).is_some() {
            Ok(())
        } else {
            Err(self.unexpected(format!("{} or {}", quote(first), quote(second))))
        }
    }

    /// Consume any single token and return its text
    fn take_text(&mut self, expected: &str) -> ParseResult<String> {
        match self.advance() {
            Some(token) => Ok(token.text.clone()),
            None => Err(self.unexpected_eof(expected)),
        }
    }

    fn unexpected(&self, expected: String) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken {
                expected,
                found: Found::from(token),
                line: token.line(),
                column: token.column(),
            },
            None => self.unexpected_eof(&expected),
        }
    }

    fn unexpected_eof(&self, expected: &str) -> ParseError {
        let (line, column) = self
            .tokens
            .last()
            .map(|t| (t.line(), t.column()))
            .unwrap_or((1, 1));
        ParseError::UnexpectedEof {
            expected: expected.to_string(),
            line,
            column,
        }
    }
}

fn quote(text: &str) -> String {
    if text == NEWLINE {
        "newline".to_string()
    } else if text.contains('`') {
        format!("`` {} ``", text)
    } else {
        format!("`{}`", text)
    }
}

/// Parse Markdown source into a document
pub fn parse(source: impl AsRef<[u8]>) -> ParseResult<Document> {
    Parser::from_source(source).parse()
}

/// Parse an already tokenized source into a document
pub fn parse_tokens(tokens: Vec<Token>) -> ParseResult<Document> {
    Parser::new(tokens).parse()
}

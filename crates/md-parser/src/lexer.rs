//! Markdown lexer
//!
//! Splits raw bytes into run-length tokens for the parser to consume.
//! Bytes are either "special" (`` _ * ` # [ ] ( ) ! ``) or plain, and a
//! token is a maximal run of one class, except that `#`, `[`, `(`,
//! newline and carriage return always start a new token. A run of
//! backticks is also split from any adjacent special byte, so `` `*x*` ``
//! lexes as `` ` ``, `*`, `x`, `*`, `` ` `` while ```` ``` ```` stays one
//! token. Segments holding a carriage return are dropped, and the stream
//! always ends with a synthetic newline so the parser has a terminator to
//! look at.

use serde::{Deserialize, Serialize};

/// A token in a Markdown source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub span: Span,
}

/// Classification of a token by its first byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Run of special characters (`**`, `[`, `` ``` ``, ...)
    Special,
    /// Run of plain text, whitespace included
    Text,
    /// Line feed (also used for the end-of-input sentinel)
    Newline,
}

/// Source location span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Starting byte offset
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
    /// Starting line (1-indexed)
    pub line: usize,
    /// Starting column (1-indexed, in bytes)
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

impl Token {
    fn new(text: String, span: Span) -> Self {
        let kind = match text.as_bytes().first() {
            Some(b'\n') => TokenKind::Newline,
            Some(&b) if is_special(b) => TokenKind::Special,
            _ => TokenKind::Text,
        };
        Self { text, kind, span }
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }

    pub fn is_special(&self) -> bool {
        self.kind == TokenKind::Special
    }
}

/// Whether a byte belongs to the special class
pub fn is_special(byte: u8) -> bool {
    matches!(
        byte,
        b'_' | b'*' | b'`' | b'#' | b'[' | b']' | b'(' | b')' | b'!'
    )
}

/// Whether a token boundary falls between `prev` and `cur`
fn is_boundary(prev: u8, cur: u8) -> bool {
    matches!(prev, b'\n' | b'\r')
        || matches!(cur, b'#' | b'[' | b'(' | b'\n' | b'\r')
        || is_special(prev) != is_special(cur)
        // Backtick runs never merge with other special bytes, so code
        // span delimiters stay separate from the `*` or `_` they enclose
        || (prev == b'`') != (cur == b'`')
}

/// Lexer for Markdown sources
pub struct Lexer<'a> {
    input: &'a [u8],
    /// Current byte position
    pos: usize,
    /// Current line (1-indexed)
    line: usize,
    /// Current column (1-indexed)
    column: usize,
    /// Whether the trailing sentinel has been produced
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Tokenize the entire input, sentinel included
    pub fn tokenize(input: impl AsRef<[u8]>) -> Vec<Token> {
        let tokens: Vec<Token> = Lexer::new(input.as_ref()).collect();
        log::debug!("tokenized {} bytes into {} tokens", input.as_ref().len(), tokens.len());
        tokens
    }

    /// Get the next token, or `None` once the sentinel has been returned
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            if self.pos >= self.input.len() {
                if self.finished {
                    return None;
                }
                self.finished = true;
                let span = Span::new(self.pos, self.pos, self.line, self.column);
                return Some(Token::new("\n".to_string(), span));
            }

            let start_pos = self.pos;
            let start_line = self.line;
            let start_col = self.column;

            self.advance();
            while let Some(&cur) = self.input.get(self.pos) {
                if is_boundary(self.input[self.pos - 1], cur) {
                    break;
                }
                self.advance();
            }

            let bytes = &self.input[start_pos..self.pos];
            if bytes.contains(&b'\r') {
                log::trace!("dropping carriage return at {}:{}", start_line, start_col);
                continue;
            }

            // Boundaries only fall on ASCII bytes, so valid UTF-8 input
            // never gets a multibyte character split across tokens
            let text = String::from_utf8_lossy(bytes).into_owned();
            return Some(Token::new(
                text,
                Span::new(start_pos, self.pos, start_line, start_col),
            ));
        }
    }

    /// Advance past one byte, tracking line and column
    fn advance(&mut self) {
        if self.input[self.pos] == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.pos += 1;
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

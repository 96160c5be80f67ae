//! md-parser: Parser for a small Markdown dialect
//!
//! This crate provides:
//! - Byte-oriented lexer (tokenizer) with line/column tracking
//! - Recursive descent parser with bounded inline parsing
//! - Markdown AST types that render themselves to HTML
//!
//! # Example
//!
//! ```
//! use md_parser::{parse, Node};
//!
//! let doc = parse("# Hello\n\nSome *emphasis* here.").unwrap();
//! assert_eq!(doc.nodes.len(), 2);
//! assert!(matches!(doc.nodes[0], Node::Header { level: 1, .. }));
//! assert_eq!(
//!     doc.render(),
//!     "<h1>Hello</h1>\n<p>Some <em>emphasis</em> here.</p>\n"
//! );
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;

// Re-export main types for convenient access
pub use ast::{Document, Node};
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::{Found, ParseError, ParseResult, Parser, parse, parse_tokens};

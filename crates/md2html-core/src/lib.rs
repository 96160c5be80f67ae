//! md2html-core: Core library for converting Markdown documents to HTML
//!
//! This crate provides:
//! - Markdown parsing (re-exported from `md-parser`)
//! - Document-level HTML output, either as bare fragments or as a
//!   standalone page
//!
//! ## Example
//!
//! ```rust
//! use md2html_core::{markdown_to_html, WriterOptions};
//!
//! let html = markdown_to_html("# Hello\n\n*World*", &WriterOptions::default()).unwrap();
//! assert_eq!(html, "<h1>Hello</h1>\n<p><em>World</em></p>\n");
//! ```

pub mod writer;

pub use md_parser::{Document, Node, ParseError, ParseResult, Token, parse};
pub use writer::{Standalone, WriterOptions, document_to_html};

/// Parse Markdown source and write it out as HTML
///
/// A syntax error anywhere in the source fails the whole conversion.
pub fn markdown_to_html(source: impl AsRef<[u8]>, options: &WriterOptions) -> ParseResult<String> {
    let doc = parse(source)?;
    Ok(document_to_html(&doc, options))
}

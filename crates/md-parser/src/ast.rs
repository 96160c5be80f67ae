//! Markdown AST types
//!
//! This module defines the abstract syntax tree produced by the parser and
//! the HTML rendering of every node. The node set is closed: four block
//! variants that only appear at the top level of a [`Document`], and five
//! inline variants that only appear inside a block or another inline node.

use serde::{Deserialize, Serialize};

/// A complete parsed document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Top-level block nodes, in source order
    pub nodes: Vec<Node>,
}

/// A node in the AST (block or inline)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Node {
    /// Header (`# ...`), level is the number of leading `#` tokens
    Header { level: usize, children: Vec<Node> },

    /// Paragraph: one line of inline content
    Paragraph { children: Vec<Node> },

    /// Fenced code block, content kept verbatim
    CodeBlock { text: String },

    /// Image (`![alt](url)`)
    Image { alt: String, url: String },

    /// Plain text
    Text { text: String },

    /// Emphasis (`*...*` or `_..._`)
    Italic { children: Vec<Node> },

    /// Strong emphasis (`**...**` or `__...__`)
    Bold { children: Vec<Node> },

    /// Inline code span, content kept verbatim
    Code { text: String },

    /// Hyperlink (`[text](url)`)
    Link { text: String, url: String },
}

impl Node {
    pub fn header(level: usize, children: Vec<Node>) -> Self {
        Self::Header { level, children }
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::Paragraph { children }
    }

    pub fn code_block(text: impl Into<String>) -> Self {
        Self::CodeBlock { text: text.into() }
    }

    pub fn image(alt: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Image {
            alt: alt.into(),
            url: url.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn italic(children: Vec<Node>) -> Self {
        Self::Italic { children }
    }

    pub fn bold(children: Vec<Node>) -> Self {
        Self::Bold { children }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self::Code { text: text.into() }
    }

    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Link {
            text: text.into(),
            url: url.into(),
        }
    }

    /// Whether this node is a block-level node
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Self::Header { .. } | Self::Paragraph { .. } | Self::CodeBlock { .. } | Self::Image { .. }
        )
    }

    /// Render this node to an HTML fragment
    ///
    /// Block fragments end in a newline, inline fragments do not.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Self::Header { level, children } => {
                // Only h1..h6 exist in HTML
                let tag = (*level).clamp(1, 6);
                out.push_str(&format!("<h{}>", tag));
                for (i, child) in children.iter().enumerate() {
                    if i == 0 {
                        out.push_str(child.render().trim_matches(' '));
                    } else {
                        child.render_into(out);
                    }
                }
                out.push_str(&format!("</h{}>\n", tag));
            }
            Self::Paragraph { children } => {
                out.push_str("<p>");
                render_children(children, out);
                out.push_str("</p>\n");
            }
            Self::CodeBlock { text } => {
                out.push_str("<pre><code>");
                out.push_str(text);
                out.push_str("</code></pre>\n");
            }
            Self::Image { alt, url } => {
                out.push_str(&format!(r#"<img src="{}" alt="{}" />"#, url, alt));
                out.push('\n');
            }
            Self::Text { text } => out.push_str(text),
            Self::Italic { children } => {
                out.push_str("<em>");
                render_children(children, out);
                out.push_str("</em>");
            }
            Self::Bold { children } => {
                out.push_str("<strong>");
                render_children(children, out);
                out.push_str("</strong>");
            }
            Self::Code { text } => {
                out.push_str("<code>");
                out.push_str(text);
                out.push_str("</code>");
            }
            Self::Link { text, url } => {
                out.push_str(&format!(r#"<a href="{}">{}</a>"#, url, text));
            }
        }
    }

    /// Plain text content of this node and its descendants, markup dropped
    pub fn plain_text(&self) -> String {
        match self {
            Self::Header { children, .. }
            | Self::Paragraph { children }
            | Self::Italic { children }
            | Self::Bold { children } => children.iter().map(Node::plain_text).collect(),
            Self::CodeBlock { text } | Self::Text { text } | Self::Code { text } => text.clone(),
            Self::Link { text, .. } => text.clone(),
            Self::Image { alt, .. } => alt.clone(),
        }
    }
}

fn render_children(children: &[Node], out: &mut String) {
    for child in children {
        child.render_into(out);
    }
}

impl Document {
    /// Create a new document from top-level nodes
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Render the whole document: the concatenation of every node's fragment
    pub fn render(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.render_into(&mut out);
        }
        out
    }

    /// Text of the first header, if any
    pub fn title(&self) -> Option<String> {
        self.nodes.iter().find_map(|node| match node {
            Node::Header { .. } => Some(node.plain_text().trim().to_string()),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(feature = "json")]
impl Document {
    /// Serialize the document to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize the document to a pretty-printed JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

//! Document to HTML writer
//!
//! Concatenates the rendered fragments of a document, optionally wrapped in
//! a standalone HTML page.

use md_parser::Document;

/// Options for the HTML writer
#[derive(Debug, Clone, Default)]
pub struct WriterOptions {
    /// Wrap the fragments in a complete HTML page
    pub standalone: Option<Standalone>,
}

/// Head content for a standalone page
#[derive(Debug, Clone, Default)]
pub struct Standalone {
    /// Page title; falls back to the document's first header
    pub title: Option<String>,
    /// Value of the `lang` attribute on `<html>`
    pub lang: Option<String>,
    /// Stylesheet URL linked from the head
    pub stylesheet: Option<String>,
}

/// Convert a parsed document to HTML
pub fn document_to_html(doc: &Document, options: &WriterOptions) -> String {
    let mut writer = Writer::new(options);
    writer.write_document(doc)
}

/// HTML writer state
struct Writer<'a> {
    options: &'a WriterOptions,
    output: String,
}

impl<'a> Writer<'a> {
    fn new(options: &'a WriterOptions) -> Self {
        Self {
            options,
            output: String::new(),
        }
    }

    fn write_document(&mut self, doc: &Document) -> String {
        match &self.options.standalone {
            Some(page) => {
                let title = page.title.clone().or_else(|| doc.title());
                self.write_head(page, title.as_deref());
                self.write_body(doc);
                self.output.push_str("</body>\n</html>\n");
            }
            None => self.write_body(doc),
        }
        log::debug!(
            "wrote {} bytes of HTML for {} nodes",
            self.output.len(),
            doc.nodes.len()
        );
        std::mem::take(&mut self.output)
    }

    fn write_head(&mut self, page: &Standalone, title: Option<&str>) {
        self.output.push_str("<!DOCTYPE html>\n");
        match &page.lang {
            Some(lang) => self
                .output
                .push_str(&format!("<html lang=\"{}\">\n", escape_html(lang))),
            None => self.output.push_str("<html>\n"),
        }
        self.output.push_str("<head>\n<meta charset=\"utf-8\" />\n");
        if let Some(title) = title {
            self.output
                .push_str(&format!("<title>{}</title>\n", escape_html(title)));
        }
        if let Some(href) = &page.stylesheet {
            self.output.push_str(&format!(
                "<link rel=\"stylesheet\" href=\"{}\" />\n",
                escape_html(href)
            ));
        }
        self.output.push_str("</head>\n<body>\n");
    }

    fn write_body(&mut self, doc: &Document) {
        for node in &doc.nodes {
            self.output.push_str(&node.render());
        }
    }
}

/// Escape text for use in HTML text content or a quoted attribute
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

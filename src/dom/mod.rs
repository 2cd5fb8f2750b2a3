//! HTML parsing into an arena DOM.
//!
//! ```
//! use nenaconv::dom::parse_html;
//!
//! let doc = parse_html(r#"<h2 class="gp-sectionheading-western">A 12 The Fox</h2>"#);
//! let h2 = doc.find_by_tag("h2").unwrap();
//! assert_eq!(doc.text_content(h2), "A 12 The Fox");
//! ```

mod arena;
mod inline_style;
mod tree_sink;

pub use arena::{Attribute, Children, Document, Node, NodeData, NodeId, html_name};
pub use inline_style::{InlineStyle, VerticalAlign};
pub use tree_sink::{DocumentSink, NodeHandle};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

/// Parse an HTML document into a [`Document`].
///
/// Parsing never fails: malformed markup is repaired the way browsers do.
pub fn parse_html(html: &str) -> Document {
    let sink = DocumentSink::new();
    parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_document()
}

//! Element classification.
//!
//! Every element is resolved once into an [`ElementKind`] and the walk
//! dispatches on that, instead of probing tags and attributes as it goes.

use crate::config::{Config, HeadingClass};
use crate::dom::{Document, InlineStyle, NodeData, NodeId, VerticalAlign};
use crate::style::StyleContext;
use crate::util::collapse_whitespace;

/// Elements whose content is never text.
const NON_CONTENT_TAGS: &[&str] = &["head", "script", "style", "title", "template", "noscript"];

/// Elements that start and end a paragraph.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "center",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

/// What an element means to the structuring engine.
#[derive(Debug)]
pub enum ElementKind<'c> {
    /// Neither visited nor descended into.
    Skipped,
    /// A classified heading with its visible text.
    Heading {
        class: &'c HeadingClass,
        text_start: bool,
        text: String,
    },
    LineBreak,
    /// Paragraph boundary; children are walked with the given style.
    Block(StyleContext),
    /// Inline span; children are walked with the given style.
    Inline(StyleContext),
}

/// Classify an element. `inherited` is the style in effect at its parent.
pub fn classify<'c>(
    doc: &Document,
    id: NodeId,
    config: &'c Config,
    inherited: StyleContext,
) -> ElementKind<'c> {
    let Some(tag) = doc.tag(id) else {
        return ElementKind::Skipped;
    };
    let inline = doc.attr(id, "style").map(InlineStyle::parse).unwrap_or_default();
    if is_skipped(doc, id, config, tag, &inline) {
        return ElementKind::Skipped;
    }

    if (config.is_heading)(doc, id)
        && let Some(class) = config.class_of(doc, id)
    {
        let text = heading_text(doc, id, config);
        if !text.is_empty() {
            return ElementKind::Heading {
                class,
                text_start: (config.text_start)(doc, id),
                text,
            };
        }
    }

    if tag == "br" {
        return ElementKind::LineBreak;
    }

    let style = apply_style(tag, &inline, inherited);
    if BLOCK_TAGS.contains(&tag) {
        ElementKind::Block(style)
    } else {
        ElementKind::Inline(style)
    }
}

fn is_skipped(doc: &Document, id: NodeId, config: &Config, tag: &str, inline: &InlineStyle) -> bool {
    (config.element_filter)(doc, id) || NON_CONTENT_TAGS.contains(&tag) || inline.hidden
}

/// Style in effect inside an element: tag semantics first, then its inline
/// `style` attribute.
pub fn apply_style(tag: &str, inline: &InlineStyle, inherited: StyleContext) -> StyleContext {
    let mut style = inherited;
    match tag {
        "i" | "em" | "cite" | "var" | "dfn" => style.italic = true,
        "b" | "strong" => style.bold = true,
        "sup" => style.superscript = true,
        "sub" => style.superscript = false,
        _ => {}
    }
    if let Some(italic) = inline.italic {
        style.italic = italic;
    }
    if let Some(bold) = inline.bold {
        style.bold = bold;
    }
    if let Some(align) = inline.vertical_align {
        style.superscript = align == VerticalAlign::Super;
    }
    style
}

/// Text of an element without skipped descendants, whitespace collapsed
/// and trimmed. Line breaks count as spaces.
pub fn heading_text(doc: &Document, id: NodeId, config: &Config) -> String {
    let mut raw = String::new();
    collect_visible(doc, id, config, &mut raw);
    let mut pending_space = true;
    let collapsed = collapse_whitespace(&raw, &mut pending_space);
    config.normalizer.normalize(collapsed.trim()).trim().to_string()
}

fn collect_visible(doc: &Document, id: NodeId, config: &Config, out: &mut String) {
    for child in doc.children(id) {
        match doc.get(child).map(|n| &n.data) {
            Some(NodeData::Text(text)) => out.push_str(text),
            Some(NodeData::Element { .. }) => {
                let Some(tag) = doc.tag(child) else { continue };
                let inline = doc
                    .attr(child, "style")
                    .map(InlineStyle::parse)
                    .unwrap_or_default();
                if is_skipped(doc, child, config, tag, &inline) {
                    continue;
                }
                if tag == "br" {
                    out.push(' ');
                }
                collect_visible(doc, child, config, out);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::bar_texts;
    use crate::dom::parse_html;

    fn first(doc: &Document, tag: &str) -> NodeId {
        doc.find_by_tag(tag).unwrap()
    }

    #[test]
    fn test_heading_classification() {
        let config = bar_texts().unwrap();
        let doc = parse_html(r#"<h2 class="gp-sectionheading-western">A 1 Fox</h2>"#);
        match classify(&doc, first(&doc, "h2"), &config, StyleContext::default()) {
            ElementKind::Heading {
                class,
                text_start,
                text,
            } => {
                assert_eq!(class.level, 0);
                assert!(text_start);
                assert_eq!(text, "A 1 Fox");
            }
            other => panic!("expected heading, got {other:?}"),
        }
    }

    #[test]
    fn test_unclassed_heading_is_block() {
        let config = bar_texts().unwrap();
        let doc = parse_html("<h2>A 1 Fox</h2>");
        assert!(matches!(
            classify(&doc, first(&doc, "h2"), &config, StyleContext::default()),
            ElementKind::Block(_)
        ));
    }

    #[test]
    fn test_heading_with_only_filtered_text_is_not_a_heading() {
        let config = bar_texts().unwrap();
        let doc = parse_html(
            r#"<h2 class="gp-sectionheading-western"><sdfield>12</sdfield></h2>"#,
        );
        assert!(matches!(
            classify(&doc, first(&doc, "h2"), &config, StyleContext::default()),
            ElementKind::Block(_)
        ));
    }

    #[test]
    fn test_filtered_and_hidden_elements_skipped() {
        let config = bar_texts().unwrap();
        let doc = parse_html(
            r#"<p><sdfield>1</sdfield><span style="display:none">x</span><script>y</script></p>"#,
        );
        for tag in ["sdfield", "span", "script"] {
            assert!(matches!(
                classify(&doc, first(&doc, tag), &config, StyleContext::default()),
                ElementKind::Skipped
            ));
        }
    }

    #[test]
    fn test_inline_style_overrides_tag() {
        let config = bar_texts().unwrap();
        let doc = parse_html(r#"<p><i style="font-style: normal">a</i><span style="vertical-align: 33%">b</span></p>"#);
        let italic = StyleContext {
            italic: true,
            ..Default::default()
        };
        match classify(&doc, first(&doc, "i"), &config, italic) {
            ElementKind::Inline(style) => assert!(!style.italic),
            other => panic!("expected inline, got {other:?}"),
        }
        match classify(&doc, first(&doc, "span"), &config, StyleContext::default()) {
            ElementKind::Inline(style) => assert!(style.superscript),
            other => panic!("expected inline, got {other:?}"),
        }
    }

    #[test]
    fn test_line_break() {
        let config = bar_texts().unwrap();
        let doc = parse_html("<p>a<br>b</p>");
        assert!(matches!(
            classify(&doc, first(&doc, "br"), &config, StyleContext::default()),
            ElementKind::LineBreak
        ));
    }

    #[test]
    fn test_heading_text_skips_filtered_and_normalizes() {
        let config = bar_texts().unwrap();
        let doc = parse_html(
            "<h2>  A 1 <sdfield>9</sdfield>\n Ca\u{1dd}t<br>Dog </h2>",
        );
        assert_eq!(heading_text(&doc, first(&doc, "h2"), &config), "A 1 Caət Dog");
    }
}

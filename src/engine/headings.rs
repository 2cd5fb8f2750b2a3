//! Heading text → metadata frame.

use crate::config::HeadingClass;

use super::metadata::Frame;

/// Try the class's patterns in order against the trimmed heading text. The
/// first match fills one field per capture group; groups that did not take
/// part in the match are left out.
pub fn match_heading(class: &HeadingClass, text: &str) -> Option<Frame> {
    let text = text.trim();
    class.patterns.iter().find_map(|rule| {
        let captures = rule.regex().captures(text)?;
        let mut frame = Frame::default();
        for (field, group) in rule.fields().iter().zip(captures.iter().skip(1)) {
            if let Some(group) = group {
                frame.insert(field, group.as_str());
            }
        }
        Some(frame)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SECTION_HEADING, SUBSECTION_HEADING, bar_texts, cu_vol4_texts};

    #[test]
    fn test_section_heading_fields() {
        let config = bar_texts().unwrap();
        let class = config.class(SECTION_HEADING).unwrap();
        let frame = match_heading(class, "A 12 The Fox and the Crow").unwrap();
        assert_eq!(
            frame.iter().collect::<Vec<_>>(),
            vec![("text_id", "A 12"), ("title", "The Fox and the Crow")]
        );
    }

    #[test]
    fn test_text_is_trimmed() {
        let config = bar_texts().unwrap();
        let class = config.class(SUBSECTION_HEADING).unwrap();
        let frame = match_heading(class, "  Informant: Yosip (Dure)  ").unwrap();
        assert_eq!(frame.get("informant"), Some("Yosip"));
        assert_eq!(frame.get("place"), Some("Dure"));
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let config = cu_vol4_texts().unwrap();
        let class = config.class(SUBSECTION_HEADING).unwrap();

        let full = match_heading(class, "The Wolf (Yulia Yohannan, Urmi)").unwrap();
        assert_eq!(full.keys().collect::<Vec<_>>(), vec!["title", "informant", "place"]);
        assert_eq!(full.get("place"), Some("Urmi"));

        let fallback = match_heading(class, "The Wolf").unwrap();
        assert_eq!(fallback.keys().collect::<Vec<_>>(), vec!["title"]);
        assert_eq!(fallback.get("title"), Some("The Wolf"));
    }

    #[test]
    fn test_prefix_match_only() {
        let config = bar_texts().unwrap();
        let class = config.class(SECTION_HEADING).unwrap();
        assert!(match_heading(class, "Story A 12 Fox").is_none());
    }

    #[test]
    fn test_miss() {
        let config = bar_texts().unwrap();
        let class = config.class(SECTION_HEADING).unwrap();
        assert!(match_heading(class, "Introduction").is_none());
    }
}

//! Heading metadata frames and the per-level stack.

/// Fields extracted from one heading, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Frame {
    fields: Vec<(String, String)>,
}

impl Frame {
    /// Set a field. An existing field keeps its position.
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.fields.push((key.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `"{text_id} {title}"`, or whichever of the two is present.
    pub fn title(&self) -> Option<String> {
        let non_empty = |key: &str| self.get(key).filter(|v| !v.trim().is_empty());
        match (non_empty("text_id"), non_empty("title")) {
            (Some(id), Some(title)) => Some(format!("{id} {title}")),
            (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
            (None, None) => None,
        }
    }
}

/// The most recent frame at each heading level still in scope.
#[derive(Debug, Clone)]
pub struct MetadataStack {
    levels: Vec<Option<Frame>>,
}

impl MetadataStack {
    pub fn new(levels: usize) -> Self {
        Self {
            levels: vec![None; levels],
        }
    }

    /// Record a heading's frame. Every deeper level goes out of scope.
    pub fn set(&mut self, level: usize, frame: Frame) {
        if level >= self.levels.len() {
            self.levels.resize(level + 1, None);
        }
        self.levels[level] = Some(frame);
        for deeper in &mut self.levels[level + 1..] {
            *deeper = None;
        }
    }

    pub fn frame(&self, level: usize) -> Option<&Frame> {
        self.levels.get(level).and_then(Option::as_ref)
    }

    /// Union of the frames in scope. Shallow levels come first; a deeper
    /// level overrides a field of the same name.
    pub fn active(&self) -> Frame {
        let mut active = Frame::default();
        for frame in self.levels.iter().flatten() {
            for (key, value) in frame.iter() {
                active.insert(key, value);
            }
        }
        active
    }

    /// Title of the frames in scope; see [`Frame::title`].
    pub fn title(&self) -> Option<String> {
        self.active().title()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn frame(pairs: &[(&str, &str)]) -> Frame {
        let mut f = Frame::default();
        for (k, v) in pairs {
            f.insert(k, v);
        }
        f
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut f = frame(&[("a", "1"), ("b", "2")]);
        f.insert("a", "3");
        assert_eq!(f.iter().collect::<Vec<_>>(), vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_section_clears_subsection() {
        let mut stack = MetadataStack::new(3);
        stack.set(0, frame(&[("text_id", "A 1")]));
        stack.set(1, frame(&[("title", "Fox"), ("informant", "X")]));
        stack.set(2, frame(&[("version", "Version 1")]));
        assert_eq!(stack.active().len(), 4);

        stack.set(0, frame(&[("text_id", "A 2")]));
        assert!(stack.frame(1).is_none());
        assert!(stack.frame(2).is_none());
        assert_eq!(stack.active().get("informant"), None);
    }

    #[test]
    fn test_subsection_keeps_section() {
        let mut stack = MetadataStack::new(3);
        stack.set(0, frame(&[("text_id", "A 1")]));
        stack.set(2, frame(&[("version", "Version 1")]));
        stack.set(1, frame(&[("title", "Crow")]));
        assert_eq!(stack.frame(0).unwrap().get("text_id"), Some("A 1"));
        assert!(stack.frame(2).is_none());
    }

    #[test]
    fn test_deeper_level_overrides_same_field() {
        let mut stack = MetadataStack::new(3);
        stack.set(0, frame(&[("informant", "A"), ("place", "P")]));
        stack.set(2, frame(&[("informant", "B")]));
        let active = stack.active();
        assert_eq!(active.get("informant"), Some("B"));
        assert_eq!(active.keys().collect::<Vec<_>>(), vec!["informant", "place"]);
    }

    #[test]
    fn test_title() {
        let mut stack = MetadataStack::new(2);
        assert_eq!(stack.title(), None);
        stack.set(0, frame(&[("text_id", "A 12")]));
        assert_eq!(stack.title().as_deref(), Some("A 12"));
        stack.set(1, frame(&[("title", "The Fox")]));
        assert_eq!(stack.title().as_deref(), Some("A 12 The Fox"));
        stack.set(0, frame(&[("title", "Crow"), ("text_id", "")]));
        assert_eq!(stack.title().as_deref(), Some("Crow"));
    }

    proptest! {
        #[test]
        fn prop_setting_a_level_clears_every_deeper_level(
            sets in prop::collection::vec((0usize..3, "[a-z]{1,4}"), 1..20)
        ) {
            let mut stack = MetadataStack::new(3);
            for (level, value) in &sets {
                stack.set(*level, frame(&[("f", value.as_str())]));
                for deeper in level + 1..3 {
                    prop_assert!(stack.frame(deeper).is_none());
                }
                prop_assert_eq!(stack.frame(*level).and_then(|f| f.get("f")), Some(value.as_str()));
            }
        }
    }
}

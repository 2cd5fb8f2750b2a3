//! Style resolution: from source formatting to markup roles.
//!
//! A run of text carries a [`StyleContext`] (italic, bold, superscript) that
//! is inherited down the HTML tree. The [`StyleMap`] of a document type turns
//! that context into a [`RoleSet`]; [`RoleCharClasses`] then says which
//! characters may legitimately appear under each role.

use std::fmt;

use regex::Regex;

use crate::error::Result;

/// A markup category applied to a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Role {
    Strong,
    Emphasis,
    Superscript,
}

impl Role {
    /// All roles in canonical order. Roles opened together nest in this
    /// order, outermost first.
    pub const ALL: [Role; 3] = [Role::Strong, Role::Emphasis, Role::Superscript];

    /// Opening and closing delimiters in the output markup.
    pub fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            Role::Strong => ("**", "**"),
            Role::Emphasis => ("*", "*"),
            Role::Superscript => ("<", ">"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Strong => "strong",
            Role::Emphasis => "emphasis",
            Role::Superscript => "superscript",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Role::Strong => 1,
            Role::Emphasis => 2,
            Role::Superscript => 4,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of roles. Iterates in canonical order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const EMPTY: RoleSet = RoleSet(0);

    pub fn with(self, role: Role) -> Self {
        RoleSet(self.0 | role.bit())
    }

    pub fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn intersection(self, other: RoleSet) -> RoleSet {
        RoleSet(self.0 & other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        iter.into_iter().fold(RoleSet::EMPTY, RoleSet::with)
    }
}

/// Inline formatting in effect at a point of the source tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleContext {
    pub italic: bool,
    pub bold: bool,
    pub superscript: bool,
}

/// Maps a style context to roles.
///
/// Two axes resolve independently: italic/unstyled on the emphasis axis and
/// bold on the weight axis. `unstyled` applies when a run is neither italic
/// nor bold. Superscript is orthogonal and always maps to
/// [`Role::Superscript`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StyleMap {
    pub italic: Option<Role>,
    pub bold: Option<Role>,
    pub unstyled: Option<Role>,
}

/// Unstyled text carries no role, so plain body text stays undelimited.
impl Default for StyleMap {
    fn default() -> Self {
        Self {
            italic: Some(Role::Emphasis),
            bold: Some(Role::Strong),
            unstyled: None,
        }
    }
}

impl StyleMap {
    /// Resolve the roles for a context.
    pub fn resolve(&self, ctx: StyleContext) -> RoleSet {
        let mut roles = RoleSet::EMPTY;
        if ctx.italic
            && let Some(role) = self.italic
        {
            roles = roles.with(role);
        }
        if ctx.bold
            && let Some(role) = self.bold
        {
            roles = roles.with(role);
        }
        if !ctx.italic
            && !ctx.bold
            && let Some(role) = self.unstyled
        {
            roles = roles.with(role);
        }
        if ctx.superscript {
            roles = roles.with(Role::Superscript);
        }
        roles
    }
}

/// Allowed-character classes per role.
#[derive(Debug, Clone)]
pub struct RoleCharClasses {
    classes: Vec<(Role, Regex)>,
}

impl RoleCharClasses {
    /// Compile `(role, class)` pairs. A class is a regex matching exactly one
    /// character, such as `[A-Za-z]`.
    pub fn new<'a, I>(classes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Role, &'a str)>,
    {
        let classes = classes
            .into_iter()
            .map(|(role, class)| Ok((role, Regex::new(&format!("^(?:{class})$"))?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { classes })
    }

    /// Check whether `c` may appear under `role`. Roles without a class allow
    /// anything.
    pub fn allows(&self, role: Role, c: char) -> bool {
        let mut buf = [0u8; 4];
        let s = c.encode_utf8(&mut buf);
        self.classes
            .iter()
            .filter(|(r, _)| *r == role)
            .all(|(_, re)| re.is_match(s))
    }

    /// Characters of `text` that fall outside `role`'s class, in order of
    /// first appearance. Whitespace is never reported.
    pub fn violations(&self, role: Role, text: &str) -> String {
        let mut out = String::new();
        for c in text.chars() {
            if !c.is_whitespace() && !out.contains(c) && !self.allows(role, c) {
                out.push(c);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_role_classes;

    #[test]
    fn test_role_set_iterates_in_canonical_order() {
        let set: RoleSet = [Role::Superscript, Role::Strong, Role::Emphasis]
            .into_iter()
            .collect();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Role::Strong, Role::Emphasis, Role::Superscript]
        );
    }

    #[test]
    fn test_default_map_axes() {
        let map = StyleMap::default();
        let italic = StyleContext {
            italic: true,
            ..Default::default()
        };
        let bold_italic = StyleContext {
            italic: true,
            bold: true,
            ..Default::default()
        };
        assert_eq!(map.resolve(italic), RoleSet::EMPTY.with(Role::Emphasis));
        assert_eq!(
            map.resolve(bold_italic),
            RoleSet::EMPTY.with(Role::Emphasis).with(Role::Strong)
        );
        assert_eq!(map.resolve(StyleContext::default()), RoleSet::EMPTY);
    }

    #[test]
    fn test_superscript_is_orthogonal() {
        let map = StyleMap::default();
        let sup = StyleContext {
            superscript: true,
            ..Default::default()
        };
        let italic_sup = StyleContext {
            italic: true,
            superscript: true,
            ..Default::default()
        };
        assert_eq!(map.resolve(sup), RoleSet::EMPTY.with(Role::Superscript));
        assert!(map.resolve(italic_sup).contains(Role::Superscript));
        assert!(map.resolve(italic_sup).contains(Role::Emphasis));
    }

    #[test]
    fn test_unstyled_role() {
        let map = StyleMap {
            italic: None,
            bold: Some(Role::Strong),
            unstyled: Some(Role::Emphasis),
        };
        let italic = StyleContext {
            italic: true,
            ..Default::default()
        };
        assert_eq!(map.resolve(StyleContext::default()), RoleSet::EMPTY.with(Role::Emphasis));
        assert_eq!(map.resolve(italic), RoleSet::EMPTY);
    }

    #[test]
    fn test_allowed_characters() {
        let classes = RoleCharClasses::new(default_role_classes()).unwrap();
        assert!(classes.allows(Role::Emphasis, 'ə'));
        assert!(classes.allows(Role::Emphasis, '\u{301}'));
        assert!(classes.allows(Role::Emphasis, '⁺'));
        assert!(!classes.allows(Role::Emphasis, '3'));
        assert!(!classes.allows(Role::Emphasis, '_'));
        assert!(classes.allows(Role::Superscript, 'P'));
        assert!(!classes.allows(Role::Superscript, 'ʾ'));
    }

    #[test]
    fn test_violations_skip_whitespace_and_dedupe() {
        let classes = RoleCharClasses::new(default_role_classes()).unwrap();
        assert_eq!(classes.violations(Role::Emphasis, "ka ta"), "");
        assert_eq!(classes.violations(Role::Emphasis, "k1a1,"), "1,");
        assert_eq!(classes.violations(Role::Superscript, "Pʾ"), "ʾ");
    }
}

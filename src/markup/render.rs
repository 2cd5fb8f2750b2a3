//! Run → markup rendering.
//!
//! Delimiters nest the way the styled spans did. When the role set changes
//! between two pieces of text, the open delimiters stay open from the
//! outermost down to the first one whose role has ended; that one and
//! everything inside it is closed innermost first. Roles not open yet are
//! then opened in the order of [`Role::ALL`]. Whitespace at the edge of a
//! styled run takes only the roles shared by both of its neighbours, so it
//! never sits just inside a delimiter.

use crate::style::{Role, RoleSet};

use super::Run;
use super::escape::escape_markup;

/// Render one line of runs. Line breaks inside run text are not expected.
pub fn render_line(runs: &[Run]) -> String {
    let mut output = String::new();
    let mut open: Vec<Role> = Vec::new();

    for (text, roles) in resolve_pieces(runs) {
        let keep = open.iter().take_while(|role| roles.contains(**role)).count();

        for role in open.drain(keep..).rev() {
            output.push_str(role.delimiters().1);
        }
        for role in roles.iter() {
            if !open.contains(&role) {
                output.push_str(role.delimiters().0);
                open.push(role);
            }
        }
        output.push_str(&escape_markup(&text));
    }

    for role in open.iter().rev() {
        output.push_str(role.delimiters().1);
    }
    output
}

/// Split runs into styled cores and neutral edge whitespace, give the
/// whitespace its roles, and merge neighbours with equal roles.
fn resolve_pieces(runs: &[Run]) -> Vec<(String, RoleSet)> {
    let mut pieces: Vec<(&str, Option<RoleSet>)> = Vec::new();
    for run in runs.iter().filter(|r| !r.text.is_empty()) {
        if run.roles.is_empty() {
            pieces.push((&run.text, Some(run.roles)));
            continue;
        }
        let core = run.text.trim();
        if core.is_empty() {
            pieces.push((&run.text, None));
            continue;
        }
        let lead = run.text.len() - run.text.trim_start().len();
        let tail = lead + core.len();
        if lead > 0 {
            pieces.push((&run.text[..lead], None));
        }
        pieces.push((core, Some(run.roles)));
        if tail < run.text.len() {
            pieces.push((&run.text[tail..], None));
        }
    }

    let mut before = vec![None; pieces.len()];
    let mut last = None;
    for (i, (_, roles)) in pieces.iter().enumerate() {
        before[i] = last;
        if roles.is_some() {
            last = *roles;
        }
    }

    let mut after = vec![None; pieces.len()];
    let mut next = None;
    for (i, (_, roles)) in pieces.iter().enumerate().rev() {
        after[i] = next;
        if roles.is_some() {
            next = *roles;
        }
    }

    let mut resolved: Vec<(String, RoleSet)> = Vec::with_capacity(pieces.len());
    for (i, (text, roles)) in pieces.into_iter().enumerate() {
        let roles = roles.unwrap_or_else(|| match (before[i], after[i]) {
            (Some(a), Some(b)) => a.intersection(b),
            _ => RoleSet::EMPTY,
        });
        match resolved.last_mut() {
            Some((prev, prev_roles)) if *prev_roles == roles => prev.push_str(text),
            _ => resolved.push((text.to_string(), roles)),
        }
    }
    resolved
}

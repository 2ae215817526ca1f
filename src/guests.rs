//! Guest-list parsing and name de-duplication.
//!
//! Guest lists arrive as pasted free text, often copied from a numbered list.
//! [`parse_guests`] strips the numbering and blank lines; [`dedupe_names`]
//! makes every name unique so names can serve as guest identity.

#[cfg(test)]
#[path = "guests_test.rs"]
mod guests_test;

use std::collections::{HashMap, HashSet};

/// Split raw text into trimmed, non-empty guest names with list markers removed.
#[must_use]
pub fn parse_guests(raw: &str) -> Vec<String> {
    raw.split(['\n', '\r'])
        .map(|line| strip_list_marker(line).trim())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse and de-duplicate in one step.
#[must_use]
pub fn parse_guest_list(raw: &str) -> Vec<String> {
    dedupe_names(&parse_guests(raw))
}

/// Make names unique in a single forward pass.
///
/// The first occurrence of a name is kept as-is; each later occurrence gets
/// `" (n)"` with `n` counting repeats of that name from 1. A generated name
/// that is already taken advances the counter again.
#[must_use]
pub fn dedupe_names(names: &[String]) -> Vec<String> {
    let mut emitted: HashSet<String> = HashSet::with_capacity(names.len());
    let mut repeats: HashMap<&str, usize> = HashMap::new();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        if emitted.insert(name.clone()) {
            out.push(name.clone());
            continue;
        }
        let counter = repeats.entry(name.as_str()).or_insert(0);
        let unique = loop {
            *counter += 1;
            let candidate = format!("{name} ({counter})");
            if !emitted.contains(&candidate) {
                break candidate;
            }
        };
        emitted.insert(unique.clone());
        out.push(unique);
    }
    out
}

/// Remove a leading `"12. "`, `"3) "`, `"4 - "` style marker.
///
/// A marker is optional whitespace, at least one ASCII digit, then at least
/// one of `.`, `)`, `-`, `:` or whitespace. Lines without that shape are
/// returned unchanged, so a bare number stays a name.
fn strip_list_marker(line: &str) -> &str {
    let rest = line.trim_start();
    let after_digits = rest.trim_start_matches(|c: char| c.is_ascii_digit());
    if after_digits.len() == rest.len() {
        return line;
    }
    let after_marker = after_digits.trim_start_matches(|c: char| matches!(c, '.' | ')' | '-' | ':') || c.is_whitespace());
    if after_marker.len() == after_digits.len() {
        return line;
    }
    after_marker
}

//! Canonical textual form of a template.
//!
//! The output re-parses to an equal template. For inputs already in
//! canonical form it reproduces the input exactly.

use std::fmt;

use itertools::Itertools;

use super::model::{HardenedMarker, IndexRange, Section, Template};

impl Template {
    /// Canonical rendering, same as `to_string()`.
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_partial() {
            f.write_str("m/")?;
        }
        // Only reachable through direct construction without a marker.
        let marker = self.hardened_marker().unwrap_or(HardenedMarker::Apostrophe);
        let body = self
            .sections()
            .iter()
            .map(|s| format_section(s, marker))
            .join("/");
        f.write_str(&body)
    }
}

fn format_section(section: &Section, marker: HardenedMarker) -> String {
    let ranges = section.ranges();
    // A lone dash range still needs brackets.
    let bracketed = ranges.len() > 1 || ranges.iter().any(is_dash_range);
    let body = ranges.iter().map(format_range).join(",");

    let mut out = String::with_capacity(body.len() + 3);
    if bracketed {
        out.push('[');
    }
    out.push_str(&body);
    if bracketed {
        out.push(']');
    }
    if section.is_hardened() {
        out.push(marker.as_char());
    }
    out
}

fn is_dash_range(range: &IndexRange) -> bool {
    !range.is_single() && !range.is_wildcard()
}

fn format_range(range: &IndexRange) -> String {
    let r = range.unhardened();
    if r.is_single() {
        r.start.to_string()
    } else if r.is_wildcard() {
        "*".to_string()
    } else {
        format!("{}-{}", r.start, r.end)
    }
}

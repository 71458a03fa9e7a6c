//! Value types for derivation path templates.
//!
//! A template is a list of sections. Each section is an ordered list of
//! disjoint inclusive ranges over raw child indices, where hardened indices
//! already carry the `0x8000_0000` offset.

use std::fmt;

use itertools::Itertools;
use log::debug;

use crate::error::{ErrorKind, TemplateError};

/// First raw index of the hardened half of the index space.
pub const HARDENED_INDEX_START: u32 = 0x8000_0000;
/// Largest index that can be written in a template.
pub const MAX_INDEX: u32 = HARDENED_INDEX_START - 1;
/// Mask that strips the hardened bit from a raw index.
pub const HARDENED_INDEX_MASK: u32 = MAX_INDEX;

/// An inclusive range of raw child indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexRange {
    pub start: u32,
    pub end: u32,
}

impl IndexRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// A range holding exactly one index.
    pub fn single(index: u32) -> Self {
        Self::new(index, index)
    }

    /// The full unhardened half-space, written `*` in a template.
    pub fn wildcard() -> Self {
        Self::new(0, MAX_INDEX)
    }

    pub fn contains(&self, raw: u32) -> bool {
        self.start <= raw && raw <= self.end
    }

    pub fn is_hardened(&self) -> bool {
        self.start >= HARDENED_INDEX_START
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// True if the range spans a whole half of the index space.
    pub fn is_wildcard(&self) -> bool {
        self.unhardened() == Self::wildcard()
    }

    /// The same range with the hardened bit cleared from both bounds.
    pub fn unhardened(&self) -> Self {
        Self::new(
            self.start & HARDENED_INDEX_MASK,
            self.end & HARDENED_INDEX_MASK,
        )
    }

    /// Move an unhardened range into the hardened half.
    pub(crate) fn hardened(&self) -> Self {
        Self::new(
            self.start | HARDENED_INDEX_START,
            self.end | HARDENED_INDEX_START,
        )
    }
}

impl From<(u32, u32)> for IndexRange {
    fn from((start, end): (u32, u32)) -> Self {
        Self::new(start, end)
    }
}

/// Glyph used to mark a hardened section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardenedMarker {
    /// `h`
    H,
    /// `'`
    Apostrophe,
}

impl HardenedMarker {
    pub fn as_char(self) -> char {
        match self {
            Self::H => 'h',
            Self::Apostrophe => '\'',
        }
    }
}

impl TryFrom<char> for HardenedMarker {
    type Error = ErrorKind;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'h' => Ok(Self::H),
            '\'' => Ok(Self::Apostrophe),
            _ => Err(ErrorKind::UnexpectedHardenedMarker),
        }
    }
}

impl From<HardenedMarker> for char {
    fn from(marker: HardenedMarker) -> Self {
        marker.as_char()
    }
}

impl fmt::Display for HardenedMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One path position: sorted, disjoint, non-adjacent ranges that are all
/// hardened or all unhardened.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Section {
    ranges: Vec<IndexRange>,
}

impl Section {
    pub fn ranges(&self) -> &[IndexRange] {
        &self.ranges
    }

    pub fn is_hardened(&self) -> bool {
        self.ranges.first().is_some_and(IndexRange::is_hardened)
    }

    /// True if `raw` falls inside any range of the section.
    pub fn contains(&self, raw: u32) -> bool {
        self.ranges.iter().any(|r| r.contains(raw))
    }

    /// The only index of the section, if it has exactly one.
    pub fn as_single(&self) -> Option<u32> {
        match self.ranges.as_slice() {
            [r] if r.is_single() => Some(r.start),
            _ => None,
        }
    }
}

/// A validated, immutable derivation path template.
///
/// Equality ignores the hardened marker glyph: `m/0h` and `m/0'` are equal.
#[derive(Debug, Clone)]
pub struct Template {
    sections: Vec<Section>,
    is_partial: bool,
    hardened_marker: Option<HardenedMarker>,
}

impl Template {
    /// Build a template from already delimited ranges.
    ///
    /// The ranges are not normalized: they must already be sorted, disjoint
    /// and non-adjacent. `hardened_marker` must be `h` or `'` if given, and is
    /// dropped when no section is hardened.
    pub fn new<I, S, R>(
        sections: I,
        is_partial: bool,
        hardened_marker: Option<char>,
    ) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = R>,
        R: Into<IndexRange>,
    {
        let sections = sections
            .into_iter()
            .map(|s| s.into_iter().map(Into::into).collect_vec())
            .collect_vec();
        // An unused glyph is dropped before it is checked.
        let any_hardened = sections.iter().flatten().any(IndexRange::is_hardened);
        let marker = hardened_marker
            .filter(|_| any_hardened)
            .map(HardenedMarker::try_from)
            .transpose()?;
        Self::build(sections, is_partial, marker)
    }

    /// Build a fully concrete template with one single-index section per
    /// raw path component.
    pub fn from_path(
        path: &[u32],
        is_partial: bool,
        hardened_marker: Option<char>,
    ) -> Result<Self, TemplateError> {
        Self::new(
            path.iter().map(|&index| [IndexRange::single(index)]),
            is_partial,
            hardened_marker,
        )
    }

    pub(crate) fn build(
        sections: Vec<Vec<IndexRange>>,
        is_partial: bool,
        hardened_marker: Option<HardenedMarker>,
    ) -> Result<Self, TemplateError> {
        if let Err(kind) = validate_sections(&sections) {
            debug!("rejected template sections {sections:?}: {kind}");
            return Err(TemplateError::Construct(kind));
        }
        let sections = sections
            .into_iter()
            .map(|ranges| Section { ranges })
            .collect_vec();
        let any_hardened = sections.iter().any(Section::is_hardened);
        Ok(Self {
            sections,
            is_partial,
            hardened_marker: hardened_marker.filter(|_| any_hardened),
        })
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// True if the template has no `m/` root and may start anywhere.
    pub fn is_partial(&self) -> bool {
        self.is_partial
    }

    pub fn hardened_marker(&self) -> Option<HardenedMarker> {
        self.hardened_marker
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.is_partial == other.is_partial && self.sections == other.sections
    }
}

impl Eq for Template {}

fn validate_sections(sections: &[Vec<IndexRange>]) -> Result<(), ErrorKind> {
    if sections.is_empty() {
        return Err(ErrorKind::PathEmpty);
    }

    let mut got_unhardened = false;
    for section in sections {
        if section.is_empty() {
            return Err(ErrorKind::SectionEmpty);
        }
        let mut prev: Option<&IndexRange> = None;
        for range in section {
            if range.start > range.end {
                return Err(ErrorKind::RangeOrderBad);
            }
            // Touching ranges count as intersecting: they must be merged.
            if let Some(prev) = prev
                && u64::from(prev.end) + 1 >= u64::from(range.start)
            {
                return Err(ErrorKind::RangesIntersect);
            }
            if range.is_hardened() {
                if got_unhardened {
                    return Err(ErrorKind::GotHardenedAfterUnhardened);
                }
            } else {
                if range.end >= HARDENED_INDEX_START {
                    return Err(ErrorKind::InconsistentRange);
                }
                got_unhardened = true;
            }
            prev = Some(range);
        }
    }
    Ok(())
}

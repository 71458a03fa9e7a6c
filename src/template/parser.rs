//! Single-pass state machine parser for template strings.
//!
//! Every character (and the end of input) is consumed exactly once and drives
//! exactly one transition. There is no lookahead and no backtracking, so
//! every error is reported at the position where it was detected.

use std::str::FromStr;

use log::{debug, trace};

use crate::error::{ErrorKind, TemplateError};

use super::char_class::unexpected;
use super::model::{HardenedMarker, IndexRange, MAX_INDEX, Template};

/// Limits and format switches for [`Template::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_sections: usize,
    pub max_ranges_per_section: usize,
    /// Reject `*` and `[...]`, accepting only concrete paths.
    pub is_format_onlypath: bool,
    /// Reject ranges that start right after the previous range ends.
    pub is_format_unambiguous: bool,
    /// Glyphs accepted as the hardened suffix. Once one is used, it is the
    /// only one accepted for the rest of the template.
    pub hardened_markers: [HardenedMarker; 2],
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_sections: 16,
            max_ranges_per_section: 8,
            is_format_onlypath: false,
            is_format_unambiguous: false,
            hardened_markers: [HardenedMarker::H, HardenedMarker::Apostrophe],
        }
    }
}

impl ParseOptions {
    pub fn with_max_sections(mut self, max_sections: usize) -> Self {
        self.max_sections = max_sections;
        self
    }

    pub fn with_max_ranges_per_section(mut self, max_ranges: usize) -> Self {
        self.max_ranges_per_section = max_ranges;
        self
    }

    pub fn with_format_onlypath(mut self, onlypath: bool) -> Self {
        self.is_format_onlypath = onlypath;
        self
    }

    pub fn with_format_unambiguous(mut self, unambiguous: bool) -> Self {
        self.is_format_unambiguous = unambiguous;
        self
    }

    pub fn with_hardened_markers(mut self, markers: [HardenedMarker; 2]) -> Self {
        self.hardened_markers = markers;
        self
    }

    fn is_hardened_marker(&self, c: char) -> bool {
        self.hardened_markers.iter().any(|m| m.as_char() == c)
    }
}

impl Template {
    /// Parse a template string.
    pub fn parse(input: &str, options: &ParseOptions) -> Result<Self, TemplateError> {
        Self::parse_chars(input.chars(), options)
    }

    /// Parse a template from a stream of characters.
    pub fn parse_chars<I>(input: I, options: &ParseOptions) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = char>,
    {
        Parser::new(options).run(input.into_iter())
    }
}

impl FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, &ParseOptions::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SectionStart,
    NextSection,
    RangeWithinSection,
    SectionEnd,
    /// Accumulating digits; resumes the given state on the first non-digit.
    Value(Resume),
}

/// States a digit run can hand control back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resume {
    RangeWithinSection,
    SectionEnd,
}

impl From<Resume> for State {
    fn from(resume: Resume) -> Self {
        match resume {
            Resume::RangeWithinSection => State::RangeWithinSection,
            Resume::SectionEnd => State::SectionEnd,
        }
    }
}

enum Step {
    Next(State),
    Done,
}

struct Parser<'o> {
    options: &'o ParseOptions,
    state: State,
    /// 1-based offset of the character being processed.
    position: usize,
    is_partial: bool,
    // Structure for 0/[3-6,8]/2:
    // [ [ (0,0) ], [ (3,6), (8,8) ], [ (2,2) ] ]
    sections: Vec<Vec<IndexRange>>,
    /// Set when a section slot opens, cleared once its first range lands.
    section_started: bool,
    index_value: Option<u32>,
    range_start: Option<u32>,
    range_end: Option<u32>,
    locked_marker: Option<HardenedMarker>,
}

impl<'o> Parser<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            state: State::SectionStart,
            position: 0,
            is_partial: true,
            sections: Vec::new(),
            section_started: true,
            index_value: None,
            range_start: None,
            range_end: None,
            locked_marker: None,
        }
    }

    fn run(mut self, mut chars: impl Iterator<Item = char>) -> Result<Template, TemplateError> {
        loop {
            let c = chars.next();
            self.position += 1;

            // Root prefix: `m` must be first and followed by `/`.
            if self.position == 1 && c == Some('m') {
                self.is_partial = false;
                continue;
            }
            if self.position == 2 && !self.is_partial {
                if c == Some('/') {
                    continue;
                }
                return self.fail(unexpected(c));
            }

            if let State::Value(resume) = self.state
                && !c.is_some_and(|c| c.is_ascii_digit())
            {
                self.state = resume.into();
            }

            trace!("{:?} at {} on {:?}", self.state, self.position, c);
            match self.step(c)? {
                Step::Done => break,
                Step::Next(state) => {
                    debug_assert!(c.is_some(), "only success may follow end of input");
                    self.state = state;
                }
            }
        }

        debug!(
            "parsed {} template with {} sections",
            if self.is_partial { "partial" } else { "rooted" },
            self.sections.len()
        );
        Template::build(self.sections, self.is_partial, self.locked_marker)
    }

    fn step(&mut self, c: Option<char>) -> Result<Step, TemplateError> {
        match self.state {
            State::SectionStart => self.section_start(c),
            State::NextSection => self.next_section(c),
            State::RangeWithinSection => self.range_within_section(c),
            State::SectionEnd => self.section_end(c),
            State::Value(resume) => self.value(c, resume),
        }
    }

    fn section_start(&mut self, c: Option<char>) -> Result<Step, TemplateError> {
        self.section_started = true;

        let Some(c) = c else {
            return self.fail(if self.sections.is_empty() {
                ErrorKind::PathEmpty
            } else {
                ErrorKind::UnexpectedSlash
            });
        };

        let at_limit = self.sections.len() == self.options.max_sections;
        if !self.options.is_format_onlypath {
            match c {
                '[' | '*' if at_limit => return self.fail(ErrorKind::PathTooLong),
                '[' => {
                    self.index_value = None;
                    return Ok(Step::Next(State::Value(Resume::RangeWithinSection)));
                }
                '*' => {
                    self.range_start = Some(0);
                    self.index_value = Some(MAX_INDEX);
                    return Ok(Step::Next(State::SectionEnd));
                }
                _ => {}
            }
        }

        match c {
            '/' => self.fail(ErrorKind::UnexpectedSlash),
            c if c.is_ascii_digit() => {
                // Digit errors take precedence over the length limit.
                self.index_value = Some(self.push_digit(Some(c))?);
                if at_limit {
                    return self.fail(ErrorKind::PathTooLong);
                }
                Ok(Step::Next(State::Value(Resume::SectionEnd)))
            }
            c => self.fail(unexpected(Some(c))),
        }
    }

    fn next_section(&mut self, c: Option<char>) -> Result<Step, TemplateError> {
        match c {
            None if self.sections.len() > self.options.max_sections => {
                self.fail(ErrorKind::PathTooLong)
            }
            None => Ok(Step::Done),
            Some('/') => Ok(Step::Next(State::SectionStart)),
            c => self.fail(unexpected(c)),
        }
    }

    fn range_within_section(&mut self, c: Option<char>) -> Result<Step, TemplateError> {
        let Some(c) = c else {
            return self.fail(ErrorKind::UnexpectedFinish);
        };
        let Some(index) = self.index_value else {
            return self.fail(if c == ' ' {
                ErrorKind::UnexpectedSpace
            } else {
                ErrorKind::DigitExpected
            });
        };

        match c {
            '-' => {
                if self.range_start.is_some() {
                    return self.fail(unexpected(Some(c)));
                }
                self.range_start = Some(index);
                self.index_value = None;
                Ok(Step::Next(State::Value(Resume::RangeWithinSection)))
            }
            ',' => {
                if self.ranges_in_last_section() + 1 == self.options.max_ranges_per_section {
                    return self.fail(ErrorKind::PathSectionTooLong);
                }
                let (range, was_open) = self.finalize_range(index);
                self.check_range(range, was_open, false)?;
                self.apply_range(range);
                self.index_value = None;
                Ok(Step::Next(State::Value(Resume::RangeWithinSection)))
            }
            ']' => {
                let (range, was_open) = self.finalize_range(index);
                self.check_range(range, was_open, true)?;
                Ok(Step::Next(State::SectionEnd))
            }
            c => self.fail(unexpected(Some(c))),
        }
    }

    fn section_end(&mut self, c: Option<char>) -> Result<Step, TemplateError> {
        // The section limit was checked when this section opened.
        let Some(index) = self.index_value else {
            return self.fail(unexpected(c));
        };

        let c = match c {
            None | Some('/') => {
                let (range, _) = self.finalize_range(index);
                self.apply_range(range);
                self.index_value = None;
                return Ok(match c {
                    None => Step::Done,
                    Some(_) => Step::Next(State::SectionStart),
                });
            }
            Some(c) => c,
        };

        if let Some(marker) = self.accepted_marker(c) {
            self.locked_marker = Some(marker);
            let (range, _) = self.finalize_range(index);
            self.apply_range(range);

            let prev_unhardened = self
                .sections
                .iter()
                .rev()
                .nth(1)
                .and_then(|s| s.first())
                .is_some_and(|r| !r.is_hardened());
            if prev_unhardened {
                return self.fail(ErrorKind::GotHardenedAfterUnhardened);
            }

            self.harden_last_section();
            self.index_value = None;
            return Ok(Step::Next(State::NextSection));
        }

        if self.options.is_hardened_marker(c) {
            return self.fail(ErrorKind::UnexpectedHardenedMarker);
        }
        self.fail(unexpected(Some(c)))
    }

    fn value(&mut self, c: Option<char>, resume: Resume) -> Result<Step, TemplateError> {
        self.index_value = Some(self.push_digit(c)?);
        Ok(Step::Next(State::Value(resume)))
    }

    /// Extend the current index with one decimal digit.
    fn push_digit(&self, c: Option<char>) -> Result<u32, TemplateError> {
        if self.index_value == Some(0) {
            return Err(self.error(ErrorKind::IndexHasLeadingZero));
        }
        let digit = c
            .and_then(|c| c.to_digit(10))
            .ok_or_else(|| self.error(unexpected(c)))?;
        let value = match self.index_value {
            Some(v) => u64::from(v) * 10 + u64::from(digit),
            None => u64::from(digit),
        };
        u32::try_from(value)
            .ok()
            .filter(|v| *v <= MAX_INDEX)
            .ok_or_else(|| self.error(ErrorKind::IndexTooBig))
    }

    /// Close the pending range with `index`, returning it and whether it was
    /// opened with `-`.
    ///
    /// A bracketed range is finalized at `]` and again at section end; the
    /// second call returns the stored range unchanged.
    fn finalize_range(&mut self, index: u32) -> (IndexRange, bool) {
        let (start, end, was_open) = match (self.range_start, self.range_end) {
            (Some(start), Some(end)) => (start, end, false),
            (Some(start), None) => (start, index, true),
            (None, _) => (index, index, false),
        };
        self.range_start = Some(start);
        self.range_end = Some(end);
        (IndexRange::new(start, end), was_open)
    }

    fn check_range(
        &self,
        range: IndexRange,
        was_open: bool,
        is_last: bool,
    ) -> Result<(), TemplateError> {
        if range == IndexRange::wildcard() {
            return self.fail(ErrorKind::RangeEqualsWildcard);
        }

        let num_ranges = self.ranges_in_last_section();
        if range.is_single() {
            if is_last && num_ranges == 0 {
                return self.fail(ErrorKind::SingleIndexAsRange);
            }
            if was_open {
                return self.fail(ErrorKind::RangeStartEqualsEnd);
            }
        }
        if range.start > range.end {
            return self.fail(ErrorKind::RangeOrderBad);
        }

        if let Some(prev) = self.last_range() {
            if self.options.is_format_unambiguous && prev.end + 1 == range.start {
                return self.fail(ErrorKind::RangeStartNextToPrevious);
            }
            if prev.start > range.start {
                return self.fail(ErrorKind::RangeOrderBad);
            }
            if prev.end >= range.start {
                return self.fail(ErrorKind::RangesIntersect);
            }
        }
        Ok(())
    }

    /// Store a finalized range, merging it into the previous one if they touch.
    fn apply_range(&mut self, range: IndexRange) {
        if self.section_started {
            self.sections.push(vec![range]);
            self.section_started = false;
        } else if let Some(section) = self.sections.last_mut() {
            match section.last_mut() {
                Some(prev) if prev.end + 1 == range.start => prev.end = range.end,
                _ => section.push(range),
            }
        }
        self.range_start = None;
        self.range_end = None;
    }

    fn harden_last_section(&mut self) {
        if let Some(section) = self.sections.last_mut() {
            for range in section.iter_mut() {
                *range = range.hardened();
            }
        }
    }

    fn accepted_marker(&self, c: char) -> Option<HardenedMarker> {
        match self.locked_marker {
            Some(marker) => (marker.as_char() == c).then_some(marker),
            None => self
                .options
                .hardened_markers
                .iter()
                .copied()
                .find(|m| m.as_char() == c),
        }
    }

    fn ranges_in_last_section(&self) -> usize {
        if self.section_started {
            return 0;
        }
        self.sections.last().map_or(0, Vec::len)
    }

    fn last_range(&self) -> Option<IndexRange> {
        if self.section_started {
            return None;
        }
        self.sections.last().and_then(|s| s.last()).copied()
    }

    fn error(&self, kind: ErrorKind) -> TemplateError {
        TemplateError::Parse {
            kind,
            position: self.position,
        }
    }

    fn fail<T>(&self, kind: ErrorKind) -> Result<T, TemplateError> {
        Err(self.error(kind))
    }
}

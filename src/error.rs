//! Error types for template construction and parsing.

use thiserror::Error;

/// The specific grammar or semantic rule a template violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    #[error("unexpected hardened marker")]
    UnexpectedHardenedMarker,
    #[error("unexpected space")]
    UnexpectedSpace,
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("template string finished unexpectedly")]
    UnexpectedFinish,
    #[error("unexpected slash character")]
    UnexpectedSlash,
    #[error("invalid character")]
    InvalidCharacter,
    #[error("specified index too big")]
    IndexTooBig,
    #[error("specified index has leading zero")]
    IndexHasLeadingZero,
    #[error("template path is empty")]
    PathEmpty,
    #[error("template path section is empty")]
    SectionEmpty,
    #[error("template path is too long")]
    PathTooLong,
    #[error("template path section is too long")]
    PathSectionTooLong,
    #[error("ranges intersect")]
    RangesIntersect,
    #[error("order of ranges is incorrect")]
    RangeOrderBad,
    #[error("specified range equals wildcard, should be specified as wildcard")]
    RangeEqualsWildcard,
    #[error("range contains just a single index, should not be a range")]
    SingleIndexAsRange,
    #[error("range start equals range end, should not be a range")]
    RangeStartEqualsEnd,
    #[error("range start is next to previous range end, must be a single range")]
    RangeStartNextToPrevious,
    #[error("hardened derivation specified after unhardened")]
    GotHardenedAfterUnhardened,
    #[error("digit expected")]
    DigitExpected,
    #[error("inconsistent range encountered (both hardened and unhardened indexes in one range)")]
    InconsistentRange,
}

/// A failed parse or direct construction.
///
/// Parse errors carry the 1-based character offset at which the problem was
/// detected. End of input counts as one position past the last character.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("{kind} at position {position}")]
    Parse { kind: ErrorKind, position: usize },
    #[error("{0}")]
    Construct(ErrorKind),
}

impl TemplateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse { kind, .. } | Self::Construct(kind) => *kind,
        }
    }

    /// Character offset of a parse error, `None` for construction errors.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Parse { position, .. } => Some(*position),
            Self::Construct(_) => None,
        }
    }
}

impl From<ErrorKind> for TemplateError {
    fn from(kind: ErrorKind) -> Self {
        Self::Construct(kind)
    }
}

//! Character classification used to pick an error for rejected input.

use phf::{Set, phf_set};

use crate::error::ErrorKind;

/// Characters with a meaning somewhere in the template grammar.
static GRAMMAR_CHARS: Set<char> = phf_set! {
    'm', '/', '[', ']', '-', ',', '*', 'h', '\'',
};

/// Error for a character (or end of input) that no rule accepts where it
/// appears.
pub fn unexpected(c: Option<char>) -> ErrorKind {
    match c {
        None => ErrorKind::UnexpectedFinish,
        Some(' ' | '\t') => ErrorKind::UnexpectedSpace,
        Some(c) if c.is_ascii_digit() || GRAMMAR_CHARS.contains(&c) => {
            ErrorKind::UnexpectedCharacter
        }
        Some(_) => ErrorKind::InvalidCharacter,
    }
}

//! Parsing, matching and canonical formatting of BIP32 derivation path
//! templates.
//!
//! # Example
//!
//! ```rust
//! use bip32_template::{HARDENED_INDEX_START, ParseOptions, Template};
//!
//! let tpl = Template::parse("m/44'/0'/[0-5]'/0/*", &ParseOptions::default()).unwrap();
//!
//! assert!(!tpl.is_partial());
//! assert_eq!(tpl.sections().len(), 5);
//!
//! let h = HARDENED_INDEX_START;
//! assert!(tpl.matches(&[h + 44, h, h + 3, 0, 17]));
//! assert!(!tpl.matches(&[h + 44, h, h + 6, 0, 17]));
//!
//! assert_eq!(tpl.to_string(), "m/44'/0'/[0-5]'/0/*");
//! assert_eq!(tpl.to_path(), None);
//! ```

mod error;
pub mod template;

pub use error::{ErrorKind, TemplateError};
pub use template::{
    HARDENED_INDEX_MASK, HARDENED_INDEX_START, HardenedMarker, IndexRange, MAX_INDEX, ParseOptions,
    Section, Template,
};

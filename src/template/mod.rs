//! BIP32 derivation path templates.
//!
//! A template describes a set of derivation paths, one section per path
//! position. `m/44'/0'/[0-5]'/0/*` matches every path whose first three
//! components are hardened `44`, `0` and `0..=5`, followed by an unhardened
//! `0` and any unhardened index.
//!
//! # Template syntax
//!
//! | Token          | Meaning                                          |
//! |----------------|--------------------------------------------------|
//! | `m/`           | Path starts at the master node (not partial)     |
//! | `n`            | A single index, `0` to `2147483647`              |
//! | `*`            | Any index in the section's half of the space     |
//! | `[a-b,c,...]`  | Union of inclusive ranges and single indices     |
//! | `h` or `'`     | Suffix marking the whole section hardened        |
//! | `/`            | Section separator                                |
//!
//! Indices have no leading zeros. Ranges in brackets must be increasing and
//! must not intersect; ranges that touch are merged. A single index is never
//! bracketed and the full span is always written `*`. Only one hardened
//! marker glyph may be used within a template, and no hardened section may
//! follow an unhardened one.

mod char_class;
mod format;
mod matcher;
mod model;
mod parser;

#[cfg(test)]
mod tests;

pub use model::{
    HARDENED_INDEX_MASK, HARDENED_INDEX_START, HardenedMarker, IndexRange, MAX_INDEX, Section,
    Template,
};
pub use parser::ParseOptions;

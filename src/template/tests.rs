use pretty_assertions::assert_eq;

use super::*;
use crate::error::{ErrorKind, TemplateError};

const MAX_SECTIONS: usize = 3;
const MAX_RANGES: usize = 4;

/// Canonical templates that parse under the limits above.
const CANONICAL: &[&str] = &[
    "0",
    "m/0",
    "*",
    "*'",
    "m/*h/*",
    "2147483647",
    "m/2147483647'",
    "m/44'/0'/0",
    "m/44h/0h/[0-5]",
    "[1,3-5,8]",
    "0/[3-6,8]/2",
    "[0-9]'/[10-19]/*",
    "[0,2147483647]",
    "[5-2147483647]h",
    "[0-2147483646]",
    "m/[1,3,5,7]'/[0-1,3-4,6-7,9-10]",
];

/// Inputs that parse but are not in canonical form.
const NON_CANONICAL: &[(&str, &str)] = &[
    ("[0-2,3-5]", "[0-5]"),
    ("[1,2]", "[1-2]"),
    ("[1,2,3,5]", "[1-3,5]"),
    ("m/[0-2,3]h/[7,8-9]", "m/[0-3]h/[7-9]"),
    ("[0-2147483646,2147483647]'", "*'"),
];

fn options() -> ParseOptions {
    ParseOptions::default()
        .with_max_sections(MAX_SECTIONS)
        .with_max_ranges_per_section(MAX_RANGES)
}

fn parse(s: &str) -> Template {
    Template::parse(s, &options())
        .unwrap_or_else(|e| panic!("{s:?} should parse: {e}"))
}

fn all_inputs() -> impl Iterator<Item = &'static str> {
    CANONICAL
        .iter()
        .copied()
        .chain(NON_CANONICAL.iter().map(|&(input, _)| input))
}

/// A path that matches `t`, using the start of the last range of each
/// section.
fn matching_path(t: &Template) -> Vec<u32> {
    t.sections()
        .iter()
        .map(|s| s.ranges().last().map_or(0, |r| r.start))
        .collect()
}

/// A path that does not match `t`: one component is moved just outside the
/// ranges of its section. If every section is a wildcard, the hardening of
/// one component is flipped instead.
fn non_matching_path(t: &Template) -> Vec<u32> {
    let mut path = matching_path(t);
    for (i, section) in t.sections().iter().enumerate() {
        for range in section.ranges() {
            if range.start & HARDENED_INDEX_MASK != 0 && !section.contains(range.start - 1) {
                path[i] = range.start - 1;
                return path;
            }
            if range.end | HARDENED_INDEX_START != u32::MAX && !section.contains(range.end + 1) {
                path[i] = range.end + 1;
                return path;
            }
        }
    }
    path[0] ^= HARDENED_INDEX_START;
    path
}

#[test]
fn reconstruct_from_sections() {
    for input in all_inputs() {
        let t = parse(input);
        let ranges: Vec<Vec<IndexRange>> =
            t.sections().iter().map(|s| s.ranges().to_vec()).collect();
        let rebuilt = Template::new(ranges, t.is_partial(), None).unwrap();
        assert_eq!(rebuilt, t, "input {input:?}");
    }
}

#[test]
fn serialize_round_trip() {
    for input in all_inputs() {
        let t = parse(input);
        assert_eq!(parse(&t.serialize()), t, "input {input:?}");
    }
}

#[test]
fn canonical_inputs_serialize_unchanged() {
    let unambiguous = options().with_format_unambiguous(true);
    for &input in CANONICAL {
        let t = Template::parse(input, &unambiguous).unwrap();
        assert_eq!(t.serialize(), input);
    }
}

#[test]
fn non_canonical_inputs_serialize_merged() {
    for &(input, expected) in NON_CANONICAL {
        assert_eq!(parse(input).serialize(), expected);
    }
}

#[test]
fn non_canonical_inputs_rejected_when_unambiguous() {
    let unambiguous = options().with_format_unambiguous(true);
    for &(input, _) in NON_CANONICAL {
        let err = Template::parse(input, &unambiguous).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::RangeStartNextToPrevious,
            "input {input:?}"
        );
    }
}

#[test]
fn match_correctness() {
    for input in all_inputs() {
        let t = parse(input);
        assert!(t.matches(&matching_path(&t)), "input {input:?}");
        assert!(!t.matches(&non_matching_path(&t)), "input {input:?}");
    }
}

#[test]
fn path_round_trip() {
    let onlypath = options().with_format_onlypath(true);
    for input in all_inputs() {
        match Template::parse(input, &onlypath) {
            Ok(t) => {
                let path = t.to_path().expect("only-path templates are concrete");
                assert!(t.matches(&path));
                assert_eq!(parse(&t.serialize()).to_path(), Some(path.clone()));
                let marker = t.hardened_marker().map(char::from);
                assert_eq!(
                    Template::from_path(&path, t.is_partial(), marker).unwrap(),
                    t
                );
            }
            Err(_) => assert_eq!(parse(input).to_path(), None, "input {input:?}"),
        }
    }
}

#[test]
fn wildcard_equivalence() {
    let explicit = Template::new(vec![vec![(0, MAX_INDEX)]], true, None).unwrap();
    assert_eq!(parse("*"), explicit);
    assert_eq!(
        Template::parse("[0-2147483647]", &options()).unwrap_err(),
        TemplateError::Parse {
            kind: ErrorKind::RangeEqualsWildcard,
            position: 14,
        }
    );
}

#[test]
fn boundary_example_round_trips() {
    let input = "m/44'/0'/[0-5]'/0/*";
    let t = Template::parse(input, &ParseOptions::default()).unwrap();
    assert!(!t.is_partial());
    assert_eq!(t.sections().len(), 5);
    assert_eq!(t.to_string(), input);
}

#[test]
fn marker_glyph_follows_input() {
    assert_eq!(parse("m/1h/2h").to_string(), "m/1h/2h");
    assert_eq!(parse("m/1'/2'").to_string(), "m/1'/2'");
    assert_eq!(parse("m/1h/2h"), parse("m/1'/2'"));
}

#[test]
fn hardening_is_a_prefix() {
    for input in ["0/1'", "*/*'", "m/0'/1/[2,4]'"] {
        let err = Template::parse(input, &options()).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::GotHardenedAfterUnhardened,
            "input {input:?}"
        );
        assert_eq!(
            err.position(),
            Some(input.chars().count()),
            "input {input:?}"
        );
    }
}

//! Matching concrete paths against a template.

use super::model::{Section, Template};

impl Template {
    /// True if `path` has one component per section and every component lies
    /// in its section's ranges. Components are raw indices: hardened values
    /// include the `0x8000_0000` offset.
    pub fn matches(&self, path: &[u32]) -> bool {
        self.sections().len() == path.len()
            && self
                .sections()
                .iter()
                .zip(path)
                .all(|(section, &index)| section.contains(index))
    }

    /// The single path this template denotes, if every section is one index.
    pub fn to_path(&self) -> Option<Vec<u32>> {
        self.sections().iter().map(Section::as_single).collect()
    }

    /// Same as `to_path().is_some()`, without building the path.
    pub fn is_concrete(&self) -> bool {
        self.sections().iter().all(|s| s.as_single().is_some())
    }
}

#[cfg(test)]
mod tests {
    use crate::template::model::HARDENED_INDEX_START as H;
    use crate::template::{MAX_INDEX, Template};

    fn tpl(s: &str) -> Template {
        s.parse().unwrap()
    }

    #[test]
    fn matches_fixed_indices() {
        let t = tpl("m/44'/0'/0'/0/7");
        assert!(t.matches(&[H + 44, H, H, 0, 7]));
        assert!(!t.matches(&[44, H, H, 0, 7]));
        assert!(!t.matches(&[H + 44, H, H, 0, 8]));
    }

    #[test]
    fn length_must_agree() {
        let t = tpl("0/*");
        assert!(t.matches(&[0, 5]));
        assert!(!t.matches(&[0]));
        assert!(!t.matches(&[0, 5, 5]));
        assert!(!t.matches(&[]));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let t = tpl("[1-3,7,10-12]");
        for index in [1, 2, 3, 7, 10, 11, 12] {
            assert!(t.matches(&[index]), "expected match for {index}");
        }
        for index in [0, 4, 6, 8, 9, 13] {
            assert!(!t.matches(&[index]), "expected no match for {index}");
        }
    }

    #[test]
    fn wildcard_covers_one_half_only() {
        let t = tpl("*");
        assert!(t.matches(&[0]));
        assert!(t.matches(&[MAX_INDEX]));
        assert!(!t.matches(&[H]));

        let t = tpl("*'");
        assert!(t.matches(&[H]));
        assert!(t.matches(&[u32::MAX]));
        assert!(!t.matches(&[MAX_INDEX]));
    }

    #[test]
    fn to_path_of_concrete_template() {
        assert_eq!(tpl("m/0h/1/2").to_path(), Some(vec![H, 1, 2]));
        assert!(tpl("m/0h/1/2").is_concrete());
    }

    #[test]
    fn to_path_of_pattern_is_none() {
        assert_eq!(tpl("0/*").to_path(), None);
        assert_eq!(tpl("0/[1,3]").to_path(), None);
        assert_eq!(tpl("[1-2]").to_path(), None);
        assert!(!tpl("[1-2]").is_concrete());
    }
}

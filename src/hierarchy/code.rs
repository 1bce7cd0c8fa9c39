//! Section-code helpers
//!
//! Codes are dot-separated runs of positive integers ("4.2.3"). Source
//! data sometimes carries one trailing dot; everything downstream works
//! on the cleaned form.

use std::cmp::Ordering;

/// Strip one trailing dot, if present. `"4.2."` becomes `"4.2"`.
pub fn clean_code(code: &str) -> &str {
    code.strip_suffix('.').unwrap_or(code)
}

/// Number of dot-separated segments in a cleaned code. Empty codes have
/// depth 0; depth 1 marks a root section.
pub fn depth(code: &str) -> usize {
    if code.is_empty() {
        0
    } else {
        code.split('.').count()
    }
}

/// Parent code derived by dropping the last segment. `None` for depth-1
/// and empty codes.
pub fn derived_parent(code: &str) -> Option<&str> {
    code.rfind('.').map(|ix| &code[..ix])
}

/// Prefix chain of ancestor codes, shortest first, ending with `code`
/// itself. `"7.3.1"` yields `["7", "7.3", "7.3.1"]`.
pub fn prefix_chain(code: &str) -> Vec<&str> {
    let mut chain = Vec::new();
    for (ix, ch) in code.char_indices() {
        if ch == '.' {
            chain.push(&code[..ix]);
        }
    }
    chain.push(code);
    chain
}

/// Numeric comparison of two codes: corresponding segments compared as
/// integers, a missing segment treated as 0, first unequal segment
/// decides. `"10"` sorts after `"2"`, never before.
pub fn numeric_cmp(a: &str, b: &str) -> Ordering {
    let left: Vec<u64> = a.split('.').map(parse_segment).collect();
    let right: Vec<u64> = b.split('.').map(parse_segment).collect();
    let len = left.len().max(right.len());

    for ix in 0..len {
        let l = left.get(ix).copied().unwrap_or(0);
        let r = right.get(ix).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }
    Ordering::Equal
}

fn parse_segment(segment: &str) -> u64 {
    segment.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_code_strips_one_trailing_dot() {
        assert_eq!(clean_code("4.2."), "4.2");
        assert_eq!(clean_code("4.2"), "4.2");
        // Only one dot is stripped; a doubled dot is upstream garbage we
        // leave visible rather than silently repair.
        assert_eq!(clean_code("4.2.."), "4.2.");
    }

    #[test]
    fn test_depth() {
        assert_eq!(depth(""), 0);
        assert_eq!(depth("7"), 1);
        assert_eq!(depth("7.3.1"), 3);
    }

    #[test]
    fn test_derived_parent() {
        assert_eq!(derived_parent("7.3.1"), Some("7.3"));
        assert_eq!(derived_parent("7"), None);
        assert_eq!(derived_parent(""), None);
    }

    #[test]
    fn test_prefix_chain() {
        assert_eq!(prefix_chain("7.3.1"), vec!["7", "7.3", "7.3.1"]);
        assert_eq!(prefix_chain("5"), vec!["5"]);
    }

    #[test]
    fn test_numeric_cmp_is_not_lexicographic() {
        let mut codes = vec!["10", "2", "1"];
        codes.sort_by(|a, b| numeric_cmp(a, b));
        assert_eq!(codes, vec!["1", "2", "10"]);
    }

    #[test]
    fn test_numeric_cmp_missing_segment_is_zero() {
        assert_eq!(numeric_cmp("2", "2.0"), Ordering::Equal);
        assert_eq!(numeric_cmp("2", "2.1"), Ordering::Less);
        assert_eq!(numeric_cmp("2.1", "2"), Ordering::Greater);
    }
}

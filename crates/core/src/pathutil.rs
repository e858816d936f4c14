//! Path utilities — the sole mechanism by which directory structure is
//! parsed back out of flat store keys.

/// Returns the substring of `key` strictly between `base.len() + 1` and
/// the next `/` after that position, or the empty string if there is no
/// further `/`. Assumes `key` begins with `base` followed by `/`.
pub fn next_segment(base: &str, key: &str) -> &str {
    let rest = match key.strip_prefix(base) {
        Some(r) => r.strip_prefix('/').unwrap_or(r),
        None => return "",
    };
    match rest.find('/') {
        Some(idx) => &rest[..idx],
        None => "",
    }
}

/// `next_segment` interpreted as a non-negative decimal integer, or
/// `-1` if empty or non-numeric.
pub fn revision_of(base: &str, key: &str) -> i64 {
    let seg = next_segment(base, key);
    if seg.is_empty() {
        return -1;
    }
    seg.parse::<i64>().unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_segment_two_levels_deep() {
        assert_eq!(next_segment("zlib/1.2.11/_/_", "zlib/1.2.11/_/_/x/y"), "x");
    }

    #[test]
    fn next_segment_one_level_deep_is_empty() {
        assert_eq!(next_segment("zlib/1.2.11/_/_", "zlib/1.2.11/_/_/x"), "");
    }

    #[test]
    fn next_segment_unrelated_key_is_empty() {
        assert_eq!(next_segment("a/b", "c/d/e"), "");
    }

    #[test]
    fn revision_of_numeric() {
        assert_eq!(revision_of("pkg", "pkg/7/export/conanfile.py"), 7);
    }

    #[test]
    fn revision_of_non_numeric_is_minus_one() {
        assert_eq!(revision_of("pkg", "pkg/export/conanfile.py"), -1);
    }

    #[test]
    fn revision_of_empty_segment_is_minus_one() {
        assert_eq!(revision_of("pkg", "pkg"), -1);
    }
}

//! Secondary-strength string comparison.
//!
//! Two strings compare equal at secondary strength when they differ only in
//! letter case or diacritics: `"Crème"`, `"creme"` and `"CREME"` all fold to
//! the same key.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Folds `value` into a key that ignores case and accents.
///
/// Compatibility decomposition also folds ligatures and full-width forms, and
/// `ß` folds to `ss` the way full case folding does.
pub fn secondary_key(value: &str) -> String {
    value
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .replace('ß', "ss")
}

/// Case- and accent-insensitive equality.
pub fn eq_secondary(left: &str, right: &str) -> bool {
    secondary_key(left) == secondary_key(right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_case() {
        assert!(eq_secondary("Dairy", "dAIRY"));
    }

    #[test]
    fn ignores_accents() {
        assert!(eq_secondary("Crème brûlée", "creme brulee"));
        assert_eq!(secondary_key("Éclair"), "eclair");
    }

    #[test]
    fn folds_compatibility_forms_and_sharp_s() {
        assert!(eq_secondary("Straße", "STRASSE"));
        assert!(eq_secondary("ẞ", "ss"));
        assert!(eq_secondary("\u{FB01}ne", "fine"));
        assert!(eq_secondary("ＭＩＬＫ", "milk"));
    }

    #[test]
    fn keeps_distinct_letters_apart() {
        assert!(!eq_secondary("Dairy", "Diary"));
    }
}

//! Title normalization.
//!
//! Every fuzzy comparison of human-entered or provider-supplied titles goes
//! through [`normalize`]: two titles name the same place iff their normalized
//! forms are equal (exact tier) or one contains the other (loose tier).

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalize a title for comparison.
///
/// The transformation is total, deterministic and idempotent:
/// - Cyrillic "ё"/"Ё" becomes "е"/"Е" (the provider is inconsistent about it)
/// - diacritics are folded away (NFD, combining marks stripped)
/// - Unicode lowercase
/// - leading/trailing whitespace trimmed, internal runs collapsed to one space
pub fn normalize(s: &str) -> String {
    let deyo: String = s
        .chars()
        .map(|c| match c {
            'ё' => 'е',
            'Ё' => 'Е',
            c => c,
        })
        .collect();

    let folded: String = deyo
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case/diacritic-insensitive equality under [`normalize`].
pub fn titles_equal(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yo_folds_to_ye() {
        assert_eq!(normalize("Ёлки"), normalize("елки"));
        assert_eq!(normalize("Орёл"), "орел");
    }

    #[test]
    fn case_folded() {
        assert_eq!(normalize("МОСКВА"), "москва");
        assert_eq!(normalize("Moscow"), "moscow");
    }

    #[test]
    fn diacritics_folded() {
        assert_eq!(normalize("Zürich"), "zurich");
        assert_eq!(normalize("Orléans"), "orleans");
    }

    #[test]
    fn whitespace_collapsed() {
        assert_eq!(normalize("  Нижний   Новгород "), "нижнии новгород");
        assert_eq!(normalize("a\t b\n c"), "a b c");
    }

    #[test]
    fn empty_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn titles_equal_is_symmetric() {
        assert!(titles_equal("Ёлки", "елки"));
        assert!(titles_equal("ZÜRICH", "zurich"));
        assert!(!titles_equal("Москва", "Тверь"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// normalize(normalize(s)) == normalize(s) for all strings.
        #[test]
        fn idempotent(s in "\\PC*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        /// The output never contains leading, trailing or doubled spaces.
        #[test]
        fn whitespace_canonical(s in "\\PC*") {
            let out = normalize(&s);
            prop_assert!(!out.starts_with(' '));
            prop_assert!(!out.ends_with(' '));
            prop_assert!(!out.contains("  "));
        }

        /// The output never contains "ё" in either case.
        #[test]
        fn no_yo_survives(s in "\\PC*") {
            let out = normalize(&s);
            prop_assert!(!out.contains('ё'));
            prop_assert!(!out.contains('Ё'));
        }
    }
}

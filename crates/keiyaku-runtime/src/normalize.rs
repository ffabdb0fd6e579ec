//! Text canonicalization
//!
//! Every sentence pattern matches against canonicalized text: NFKC
//! compatibility normalization (full-width digits, letters, and punctuation
//! fold to their ASCII forms), the ideographic space U+3000 becomes an
//! ordinary space, runs of spaces collapse to one, and leading/trailing
//! whitespace is trimmed.

use unicode_normalization::UnicodeNormalization;

/// Canonicalize a line (or a whole text) for pattern matching.
///
/// Pure and idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let folded: String = text.nfkc().collect();
    let folded = folded.replace('\u{3000}', " ");

    let mut out = String::with_capacity(folded.len());
    let mut last_was_space = false;
    for ch in folded.trim().chars() {
        if ch == ' ' {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_fullwidth_space_becomes_ascii_space() {
        assert_eq!(normalize("A\u{3000}は\u{3000}2"), "A は 2");
    }

    #[test]
    fn test_space_runs_collapse() {
        assert_eq!(normalize("A   は  2"), "A は 2");
        assert_eq!(normalize("A \u{3000} は 2"), "A は 2");
    }

    #[test]
    fn test_trims_edges() {
        assert_eq!(normalize("  A は 2 とする。  "), "A は 2 とする。");
    }

    #[test]
    fn test_nfkc_folds_fullwidth_forms() {
        // Full-width digits, letters, and parentheses fold to ASCII.
        assert_eq!(normalize("２"), "2");
        assert_eq!(normalize("Ａ（ｂ）"), "A(b)");
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \u{3000}  "), "");
    }

    #[test]
    fn test_idempotent_examples() {
        for s in ["A\u{3000}は  ２ とする。", "  もし Ｘ が 0 なら、以下を行う。"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(s in "\\PC*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_no_double_spaces(s in "\\PC*") {
            prop_assert!(!normalize(&s).contains("  "));
        }
    }
}

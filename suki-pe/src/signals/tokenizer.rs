//! Transcript tokenization
//!
//! Literal token matching only: lowercase, replace punctuation and newlines
//! with spaces, split on whitespace. No stemming, no language detection.

use std::collections::HashSet;

/// Tokenize transcript text into a normalized token set
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(String::from)
        .collect()
}

/// Normalize a single rule term the same way tokens are normalized, so term
/// matching is insensitive to case and stray punctuation in rule records.
pub fn normalize_term(term: &str) -> String {
    term.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_strips_punctuation() {
        let tokens = tokenize("Pabili po ng SCHOOL notebook, salamat!");
        assert!(tokens.contains("pabili"));
        assert!(tokens.contains("school"));
        assert!(tokens.contains("notebook"));
        assert!(tokens.contains("salamat"));
        assert!(!tokens.contains("notebook,"));
    }

    #[test]
    fn test_tokenize_handles_newlines_and_pipes() {
        let tokens = tokenize("magkano po?|meron pa\nsa likod");
        assert!(tokens.contains("magkano"));
        assert!(tokens.contains("meron"));
        assert!(tokens.contains("likod"));
    }

    #[test]
    fn test_tokenize_empty_and_punctuation_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("?!... |;").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_numerals() {
        let tokens = tokenize("dalawang piso 2pcs");
        assert!(tokens.contains("2pcs"));
    }

    #[test]
    fn test_tokenize_dedupes() {
        let tokens = tokenize("load load load");
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_normalize_term() {
        assert_eq!(normalize_term("  School "), "school");
        assert_eq!(normalize_term("E-Load"), "e load");
    }
}

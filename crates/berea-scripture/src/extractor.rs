use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// Optional 1-3 book numeral, capitalized book token, chapter:verse,
// optional verse range. Syntactic shape only; no canon validation.
static CITATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[1-3]\s+)?[A-Z][a-z]+\s+\d+:\d+(?:-\d+)?")
        .expect("citation pattern is valid")
});

/// Scan `text` for scripture-reference-shaped substrings.
///
/// Matches are returned in first-occurrence order with exact-string
/// duplicates dropped. `"See John 3:16 and Romans 8:28-30, also John
/// 3:16"` yields `["John 3:16", "Romans 8:28-30"]`.
pub fn extract_citations(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut citations = Vec::new();
    for m in CITATION.find_iter(text) {
        let reference = m.as_str();
        if seen.insert(reference.to_string()) {
            citations.push(reference.to_string());
        }
    }
    citations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_reference() {
        assert_eq!(
            extract_citations("Grace is unmerited favor. John 3:16."),
            vec!["John 3:16"]
        );
    }

    #[test]
    fn test_dedup_preserves_first_occurrence_order() {
        assert_eq!(
            extract_citations("See John 3:16 and Romans 8:28-30, also John 3:16"),
            vec!["John 3:16", "Romans 8:28-30"]
        );
    }

    #[test]
    fn test_numbered_book() {
        assert_eq!(
            extract_citations("Love is patient (1 Corinthians 13:4-7), see also 2 Timothy 1:7."),
            vec!["1 Corinthians 13:4-7", "2 Timothy 1:7"]
        );
    }

    #[test]
    fn test_verse_range() {
        assert_eq!(extract_citations("Romans 8:28-30"), vec!["Romans 8:28-30"]);
    }

    #[test]
    fn test_no_matches() {
        assert!(extract_citations("No references here, just 3:16 pm and john 3:16.").is_empty());
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_citations("").is_empty());
    }

    #[test]
    fn test_extraction_is_syntactic_not_semantic() {
        // Any capitalized token before chapter:verse is reference-shaped;
        // canon validation is deliberately out of scope.
        assert_eq!(extract_citations("a Display 3:2 panel"), vec!["Display 3:2"]);
    }
}

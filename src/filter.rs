//! Banned phrase filter
//!
//! Pure substring scanner over the configured banned-phrase set.
//! Used to validate registration names and to screen outgoing chat content.

/// Case-sensitive banned-phrase scanner
///
/// The phrase set is fixed at server start. Phrases keep their
/// configuration order so scan results are deterministic.
#[derive(Debug)]
pub struct PhraseFilter {
    phrases: Vec<String>,
}

impl PhraseFilter {
    /// Build a filter from the configured phrases.
    ///
    /// An empty phrase would match every line; it is dropped along
    /// with duplicates.
    pub fn new<I>(phrases: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut kept: Vec<String> = Vec::new();
        for phrase in phrases {
            if phrase.is_empty() || kept.contains(&phrase) {
                continue;
            }
            kept.push(phrase);
        }
        Self { phrases: kept }
    }

    /// Scan a text for banned phrases.
    ///
    /// Returns every phrase contained in `text`, in the filter's phrase
    /// order, not just the first match. Matching is case-sensitive
    /// substring containment. No side effects.
    pub fn scan(&self, text: &str) -> Vec<&str> {
        self.phrases
            .iter()
            .filter(|phrase| text.contains(phrase.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// The full phrase list, in configuration order.
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(phrases: &[&str]) -> PhraseFilter {
        PhraseFilter::new(phrases.iter().map(|p| p.to_string()))
    }

    #[test]
    fn test_scan_reports_every_match_in_order() {
        let f = filter(&["wine", "spam", "beer"]);
        assert_eq!(f.scan("spam and wine for all"), vec!["wine", "spam"]);
    }

    #[test]
    fn test_scan_clean_text() {
        let f = filter(&["wine", "spam"]);
        assert!(f.scan("water is fine").is_empty());
    }

    #[test]
    fn test_scan_is_case_sensitive() {
        let f = filter(&["spam"]);
        assert!(f.scan("SPAM").is_empty());
        assert_eq!(f.scan("spam"), vec!["spam"]);
    }

    #[test]
    fn test_scan_matches_substrings() {
        let f = filter(&["spam"]);
        assert_eq!(f.scan("spammer"), vec!["spam"]);
    }

    #[test]
    fn test_empty_and_duplicate_phrases_dropped() {
        let f = filter(&["", "spam", "spam", "wine"]);
        assert_eq!(f.phrases(), &["spam".to_string(), "wine".to_string()]);
        assert_eq!(f.scan("spam spam"), vec!["spam"]);
    }
}

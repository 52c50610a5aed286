/// How rule phrases are compared against the user's query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Unanchored containment on the lower-cased text. `"hi"` matches inside `"this"`.
    #[default]
    Substring,
    /// Phrase must occur as a run of whole words.
    Word,
}

impl MatchMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "substring" => Some(MatchMode::Substring),
            "word" | "words" | "token" => Some(MatchMode::Word),
            _ => None,
        }
    }
}

/// A query prepared once per turn for repeated phrase tests.
#[derive(Debug, Clone)]
pub struct NormalizedQuery {
    lower: String,
    words: Vec<String>,
    mode: MatchMode,
}

impl NormalizedQuery {
    pub fn new(query: &str, mode: MatchMode) -> Self {
        let lower = query.to_lowercase();
        let words = match mode {
            MatchMode::Substring => Vec::new(),
            MatchMode::Word => tokenize(&lower),
        };
        Self { lower, words, mode }
    }

    pub fn matches(&self, phrase: &str) -> bool {
        match self.mode {
            MatchMode::Substring => self.lower.contains(&phrase.to_lowercase()),
            MatchMode::Word => {
                let needle = tokenize(&phrase.to_lowercase());
                !needle.is_empty()
                    && self
                        .words
                        .windows(needle.len())
                        .any(|window| window == needle.as_slice())
            }
        }
    }

    pub fn matches_any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|phrase| self.matches(phrase))
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.replace('\u{2019}', "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|word| word.trim_matches('\''))
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(MatchMode::parse("substring"), Some(MatchMode::Substring));
        assert_eq!(MatchMode::parse(" Word "), Some(MatchMode::Word));
        assert_eq!(MatchMode::parse("fuzzy"), None);
        assert_eq!(MatchMode::default(), MatchMode::Substring);
    }

    #[test]
    fn test_substring_is_unanchored() {
        let q = NormalizedQuery::new("Is THIS thing on?", MatchMode::Substring);
        assert!(q.matches("hi"));
        assert!(q.matches("This Thing"));
        assert!(!q.matches("hello"));
    }

    #[test]
    fn test_word_mode_needs_whole_words() {
        let q = NormalizedQuery::new("Is THIS thing on?", MatchMode::Word);
        assert!(!q.matches("hi"));
        assert!(q.matches("this thing"));
        assert!(!q.matches("thing is"));
    }

    #[test]
    fn test_word_mode_ignores_punctuation_and_keeps_apostrophes() {
        let q = NormalizedQuery::new("So, what\u{2019}s your company?!", MatchMode::Word);
        assert!(q.matches("what's your company"));
        assert!(!q.matches("what is your company"));
        assert!(q.matches_any(&["nope", "your company?"]));
    }

    #[test]
    fn test_empty_phrase_never_matches_in_word_mode() {
        let q = NormalizedQuery::new("anything", MatchMode::Word);
        assert!(!q.matches("?!"));
        assert!(!q.matches(""));
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("'quoted' don't-stop 42x"),
            vec!["quoted", "don't", "stop", "42x"]
        );
    }
}

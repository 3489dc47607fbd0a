use std::borrow::Cow;

/// Text tokenizer for record fields
///
/// Splits on whitespace, trims ASCII punctuation from both ends of each word,
/// drops words that end up empty and case-folds the rest. Inner punctuation
/// is kept, so `"AC/DC"` yields the single term `ac/dc`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize text into a vector of terms, in order of appearance
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|word| word.trim_matches(|c: char| c.is_ascii_punctuation()))
            .filter(|token| !token.is_empty())
            .map(|token| token.to_lowercase())
            .collect()
    }

    /// Normalize a query the way terms are normalized, unless the caller asked
    /// for case-sensitive matching
    ///
    /// Queries are not split or trimmed: a multi-word query is matched as one
    /// string against single terms.
    pub fn normalize<'a>(&self, query: &'a str, case_sensitive: bool) -> Cow<'a, str> {
        if case_sensitive {
            Cow::Borrowed(query)
        } else {
            Cow::Owned(query.to_lowercase())
        }
    }
}

use regex::{Regex, RegexBuilder};

use super::scoring;
use crate::error::Result;
use crate::models::{SearchMode, SearchOptions};
use crate::tokenizer::Tokenizer;

/// A search query compiled for one mode
///
/// `relevance` returns the multiplier applied to a posting's field weight,
/// or `None` when the term does not match.
#[derive(Clone, Debug)]
pub enum TermMatcher {
    Exact(String),
    Prefix(String),
    Substring(String),
    /// Always case-folded, regardless of the case-sensitivity option;
    /// indexed terms are already folded by the tokenizer
    Fuzzy(String),
    Pattern(Regex),
}

impl TermMatcher {
    pub fn compile(query: &str, options: &SearchOptions, tokenizer: &Tokenizer) -> Result<Self> {
        let normalized = || tokenizer.normalize(query, options.case_sensitive).into_owned();

        let matcher = match options.mode {
            SearchMode::Exact => TermMatcher::Exact(normalized()),
            SearchMode::Prefix => TermMatcher::Prefix(normalized()),
            SearchMode::Substring => TermMatcher::Substring(normalized()),
            SearchMode::Fuzzy => TermMatcher::Fuzzy(query.to_lowercase()),
            SearchMode::Regex => TermMatcher::Pattern(
                RegexBuilder::new(query)
                    .case_insensitive(!options.case_sensitive)
                    .build()?,
            ),
        };
        Ok(matcher)
    }

    pub fn mode(&self) -> SearchMode {
        match self {
            TermMatcher::Exact(_) => SearchMode::Exact,
            TermMatcher::Prefix(_) => SearchMode::Prefix,
            TermMatcher::Substring(_) => SearchMode::Substring,
            TermMatcher::Fuzzy(_) => SearchMode::Fuzzy,
            TermMatcher::Pattern(_) => SearchMode::Regex,
        }
    }

    /// The single term this matcher can hit, if it can only hit one
    pub fn exact_term(&self) -> Option<&str> {
        match self {
            TermMatcher::Exact(term) => Some(term),
            _ => None,
        }
    }

    pub fn relevance(&self, term: &str) -> Option<f64> {
        match self {
            TermMatcher::Exact(query) => (term == query).then_some(1.0),
            TermMatcher::Prefix(query) => scoring::prefix_relevance(query, term),
            TermMatcher::Substring(query) => scoring::substring_relevance(query, term),
            TermMatcher::Fuzzy(query) => {
                let relevance = scoring::fuzzy_relevance(query, term);
                (relevance > 0.0).then_some(relevance)
            }
            TermMatcher::Pattern(regex) => regex.is_match(term).then_some(1.0),
        }
    }
}

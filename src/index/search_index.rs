use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use ordered_float::OrderedFloat;

use super::inverted::{InvertedIndex, Posting};
use super::matcher::TermMatcher;
use super::trie::PrefixTrie;
use crate::error::Result;
use crate::models::{Field, IndexStatistics, Record, SearchHit, SearchOptions};
use crate::tokenizer::Tokenizer;

/// Full-text index over the catalog's record slots
///
/// Holds no lock; the owning catalog serializes writers.
#[derive(Clone, Debug, Default)]
pub struct SearchIndex {
    tokenizer: Tokenizer,
    inverted: InvertedIndex,
    trie: PrefixTrie,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every searchable field of `record` under `slot`
    pub fn index(&mut self, slot: usize, record: &Record) {
        self.index_field(slot, Field::Title, record.title());
        self.index_field(slot, Field::Artist, record.artist());
        if !record.album().is_empty() {
            self.index_field(slot, Field::Album, record.album());
        }
        if !record.genre().is_empty() {
            self.index_field(slot, Field::Genre, record.genre());
        }
    }

    fn index_field(&mut self, slot: usize, field: Field, text: &str) {
        for token in self.tokenizer.tokenize(text) {
            self.trie.insert(&token);
            self.inverted.add(token, Posting::new(slot, field));
        }
    }

    /// Drop all postings for `slot`. Suggestions are left in place.
    pub fn remove(&mut self, slot: usize) {
        let removed = self.inverted.remove_slot(slot);
        tracing::trace!(slot, removed, "removed postings");
    }

    pub fn clear(&mut self) {
        self.inverted.clear();
        self.trie.clear();
    }

    /// Clear and re-index, assigning each record its position as slot
    pub fn rebuild<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a Record>,
    {
        self.clear();
        for (slot, record) in records.into_iter().enumerate() {
            self.index(slot, record);
        }
    }

    /// Ranked hits for `query`; fails only when a regex pattern does not compile
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let matcher = TermMatcher::compile(query, options, &self.tokenizer)?;
        let scores = self.accumulate(&matcher, options);
        let hits = collect_top_hits(scores, options.min_relevance, options.max_results);

        tracing::trace!(
            mode = matcher.mode().name(),
            hits = hits.len(),
            "search completed"
        );
        Ok(hits)
    }

    fn accumulate(&self, matcher: &TermMatcher, options: &SearchOptions) -> HashMap<usize, f64> {
        let mut scores: HashMap<usize, f64> = HashMap::new();
        let mut add = |postings: &[Posting], relevance: f64| {
            for posting in postings.iter().filter(|p| options.includes(p.field)) {
                *scores.entry(posting.slot).or_insert(0.0) += posting.weight * relevance;
            }
        };

        if let Some(term) = matcher.exact_term() {
            if let Some(postings) = self.inverted.get(term) {
                add(postings, 1.0);
            }
        } else {
            for (term, postings) in self.inverted.iter() {
                if let Some(relevance) = matcher.relevance(term) {
                    add(postings, relevance);
                }
            }
        }

        scores
    }

    /// Autocomplete words starting with `prefix`, case-folded
    pub fn get_suggestions(&self, prefix: &str, max: usize) -> Vec<String> {
        if prefix.is_empty() || max == 0 {
            return Vec::new();
        }
        self.trie.suggestions(&prefix.to_lowercase(), max)
    }

    /// Distinct terms with at least one posting
    pub fn indexed_terms_count(&self) -> usize {
        self.inverted.term_count()
    }

    /// Distinct slots with at least one posting
    pub fn indexed_slots_count(&self) -> usize {
        self.inverted.slot_count()
    }

    pub fn statistics(&self) -> IndexStatistics {
        IndexStatistics {
            indexed_terms: self.indexed_terms_count(),
            indexed_slots: self.indexed_slots_count(),
            suggestion_words: self.trie.len(),
        }
    }

    /// Postings for an exact term
    pub fn postings(&self, term: &str) -> &[Posting] {
        self.inverted.get(term).unwrap_or_default()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &[Posting])> {
        self.inverted.iter()
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HitEntry {
    score: OrderedFloat<f64>,
    slot: usize,
}

// Higher score ranks first; on ties the lower slot does
impl Ord for HitEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.slot.cmp(&self.slot))
    }
}

impl PartialOrd for HitEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Keep the `max_results` best hits scoring at least `min_relevance`
fn collect_top_hits(
    scores: HashMap<usize, f64>,
    min_relevance: f64,
    max_results: usize,
) -> Vec<SearchHit> {
    if max_results == 0 || scores.is_empty() {
        return Vec::new();
    }

    let mut heap: BinaryHeap<Reverse<HitEntry>> = BinaryHeap::new();
    for (slot, score) in scores {
        if score < min_relevance {
            continue;
        }
        let entry = HitEntry {
            score: OrderedFloat(score),
            slot,
        };
        if heap.len() < max_results {
            heap.push(Reverse(entry));
        } else if let Some(min) = heap.peek() {
            if entry > min.0 {
                heap.pop();
                heap.push(Reverse(entry));
            }
        }
    }

    let mut entries: Vec<HitEntry> = heap.into_iter().map(|Reverse(entry)| entry).collect();
    entries.sort_by(|a, b| b.cmp(a));
    entries
        .into_iter()
        .map(|entry| SearchHit::new(entry.slot, entry.score.into_inner()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AudexError;
    use crate::models::SearchMode;

    fn index_of(records: &[Record]) -> SearchIndex {
        let mut index = SearchIndex::new();
        index.rebuild(records);
        index
    }

    fn score_of(hits: &[SearchHit], slot: usize) -> f64 {
        hits.iter()
            .find(|hit| hit.slot == slot)
            .map(|hit| hit.score)
            .unwrap_or(0.0)
    }

    #[test]
    fn test_exact_artist_match() {
        let index = index_of(&[Record::new("Imagine", "John Lennon", 183)]);

        let hits = index.search("lennon", &SearchOptions::new(SearchMode::Exact)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slot, 0);
        assert!((hits[0].score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_scores_accumulate_across_fields() {
        let index = index_of(&[
            Record::new("Imagine", "John Lennon", 183).with_album("Imagine"),
            Record::new("Imagine Dragons Live", "Someone", 200),
        ]);

        let hits = index.search("imagine", &SearchOptions::new(SearchMode::Exact)).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].slot, 0);
        assert!((hits[0].score - 1.6).abs() < 1e-9);
        assert!((hits[1].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_field_selection() {
        let index = index_of(&[Record::new("Rock Song", "Band", 100).with_genre("Rock")]);

        let title_only = SearchOptions::new(SearchMode::Exact).only_fields(&[Field::Title]);
        let hits = index.search("rock", &title_only).unwrap();
        assert!((score_of(&hits, 0) - 1.0).abs() < 1e-9);

        let album_only = SearchOptions::new(SearchMode::Exact).only_fields(&[Field::Album]);
        assert!(index.search("rock", &album_only).unwrap().is_empty());
    }

    #[test]
    fn test_prefix_and_substring_scores() {
        let index = index_of(&[
            Record::new("Paradise", "Coldplay", 278),
            Record::new("Spare Parts", "Nobody", 100),
        ]);

        let hits = index.search("par", &SearchOptions::new(SearchMode::Prefix)).unwrap();
        assert!((score_of(&hits, 0) - 0.8).abs() < 1e-9);
        // "parts" starts with "par", "spare" does not
        assert!((score_of(&hits, 1) - 0.8).abs() < 1e-9);

        let hits = index.search("par", &SearchOptions::new(SearchMode::Substring)).unwrap();
        assert!((score_of(&hits, 0) - 0.8).abs() < 1e-9);
        assert!((score_of(&hits, 1) - 1.4).abs() < 1e-9);
        assert_eq!(hits[0].slot, 1);
    }

    #[test]
    fn test_fuzzy_scores_below_exact() {
        let index = index_of(&[Record::new("Bohemian Rhapsody", "Queen", 354)]);

        let fuzzy = index.search("quene", &SearchOptions::new(SearchMode::Fuzzy)).unwrap();
        let exact = index.search("queen", &SearchOptions::new(SearchMode::Exact)).unwrap();

        let fuzzy_score = score_of(&fuzzy, 0);
        let exact_score = score_of(&exact, 0);
        assert!(fuzzy_score > 0.0);
        assert!(fuzzy_score < exact_score);
    }

    #[test]
    fn test_fuzzy_identical_outranks_neighbour() {
        let index = index_of(&[
            Record::new("Queer", "Someone", 100),
            Record::new("Queen", "Someone Else", 100),
        ]);

        let hits = index.search("queen", &SearchOptions::new(SearchMode::Fuzzy)).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].slot, 1);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_regex_search() {
        let index = index_of(&[
            Record::new("Imagine", "John Lennon", 183),
            Record::new("Yesterday", "The Beatles", 125),
        ]);

        let hits = index.search("^len+on$", &SearchOptions::new(SearchMode::Regex)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slot, 0);

        let sensitive = SearchOptions::new(SearchMode::Regex).case_sensitive(true);
        assert!(index.search("LENNON", &sensitive).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        let index = index_of(&[Record::new("Imagine", "John Lennon", 183)]);
        let options = SearchOptions::new(SearchMode::Regex);

        let err = index.search("[invalid", &options).unwrap_err();
        assert!(matches!(err, AudexError::InvalidPattern(_)));
    }

    #[test]
    fn test_empty_query() {
        let index = index_of(&[Record::new("Imagine", "John Lennon", 183)]);
        for mode in SearchMode::ALL {
            assert!(index.search("", &SearchOptions::new(mode)).unwrap().is_empty());
        }
    }

    #[test]
    fn test_case_insensitive_by_default() {
        let index = index_of(&[Record::new("Imagine", "John Lennon", 183)]);
        let hits = index.search("LENNON", &SearchOptions::new(SearchMode::Exact)).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_ties_break_by_slot() {
        let index = index_of(&[
            Record::new("Song", "Alpha", 100),
            Record::new("Song", "Beta", 100),
            Record::new("Song", "Gamma", 100),
        ]);

        let hits = index.search("song", &SearchOptions::new(SearchMode::Exact)).unwrap();
        let slots: Vec<usize> = hits.iter().map(|hit| hit.slot).collect();
        assert_eq!(slots, vec![0, 1, 2]);
    }

    #[test]
    fn test_max_results_and_min_relevance() {
        let index = index_of(&[
            Record::new("Love Song", "Alpha", 100),
            Record::new("Other", "Love Band", 100),
            Record::new("Another", "Someone", 100).with_genre("Love"),
        ]);
        let options = SearchOptions::new(SearchMode::Exact);

        let hits = index.search("love", &options.clone().with_max_results(2)).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].slot, 0);
        assert_eq!(hits[1].slot, 1);

        let hits = index.search("love", &options.clone().with_min_relevance(0.5)).unwrap();
        assert_eq!(hits.len(), 2);

        assert!(index.search("love", &options.with_max_results(0)).unwrap().is_empty());
    }

    #[test]
    fn test_suggestions() {
        let index = index_of(&[
            Record::new("Paradise City", "Guns N' Roses", 346),
            Record::new("Paradise", "Coldplay", 278),
            Record::new("Paranoid", "Black Sabbath", 172),
        ]);

        let suggestions = index.get_suggestions("PARA", 10);
        assert_eq!(suggestions, vec!["paradise", "paranoid"]);
        assert_eq!(index.get_suggestions("para", 1).len(), 1);
        assert!(index.get_suggestions("", 10).is_empty());
        assert!(index.get_suggestions("para", 0).is_empty());
    }

    #[test]
    fn test_remove_keeps_suggestions() {
        let mut index = index_of(&[
            Record::new("Paradise", "Coldplay", 278),
            Record::new("Yellow", "Coldplay", 266),
        ]);

        index.remove(0);
        assert!(index
            .search("paradise", &SearchOptions::new(SearchMode::Exact)).unwrap()
            .is_empty());
        assert_eq!(index.postings("coldplay").len(), 1);
        assert_eq!(index.get_suggestions("para", 10), vec!["paradise"]);
        assert_eq!(index.indexed_slots_count(), 1);
    }

    #[test]
    fn test_statistics() {
        let mut index = SearchIndex::new();
        assert_eq!(index.indexed_terms_count(), 0);
        assert_eq!(index.indexed_slots_count(), 0);

        index.rebuild(&[
            Record::new("Song One", "Artist One", 180),
            Record::new("Song Two", "Artist Two", 240),
        ]);
        let stats = index.statistics();
        assert_eq!(stats.indexed_terms, 4);
        assert_eq!(stats.indexed_slots, 2);
        assert_eq!(stats.suggestion_words, 4);

        index.clear();
        assert_eq!(index.statistics(), IndexStatistics::default());
    }
}

use std::collections::{HashMap, HashSet};

use crate::models::Field;

/// One occurrence of a term in a record field
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Posting {
    pub slot: usize,
    pub field: Field,
    pub weight: f64,
}

impl Posting {
    pub fn new(slot: usize, field: Field) -> Self {
        Self {
            slot,
            field,
            weight: field.weight(),
        }
    }
}

/// Term -> postings map
///
/// A term never maps to an empty posting list: removal drops terms whose
/// last posting goes away.
#[derive(Clone, Debug, Default)]
pub struct InvertedIndex {
    terms: HashMap<String, Vec<Posting>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a posting for `term`
    pub fn add(&mut self, term: String, posting: Posting) {
        self.terms.entry(term).or_default().push(posting);
    }

    /// Remove every posting for `slot`, returning how many were removed
    pub fn remove_slot(&mut self, slot: usize) -> usize {
        let mut removed = 0;
        self.terms.retain(|_, postings| {
            let before = postings.len();
            postings.retain(|p| p.slot != slot);
            removed += before - postings.len();
            !postings.is_empty()
        });
        removed
    }

    /// Postings for an exact term
    pub fn get(&self, term: &str) -> Option<&[Posting]> {
        self.terms.get(term).map(Vec::as_slice)
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// Iterate over all terms and their postings, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Posting])> {
        self.terms
            .iter()
            .map(|(term, postings)| (term.as_str(), postings.as_slice()))
    }

    /// Number of distinct terms
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Number of distinct slots with at least one posting
    pub fn slot_count(&self) -> usize {
        self.terms
            .values()
            .flatten()
            .map(|p| p.slot)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn posting_count(&self) -> usize {
        self.terms.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }
}

//! Invariant checking framework for catalog consistency

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::{field_value, ConsistencyView};
use crate::models::Field;

/// A violation of an invariant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub invariant: String,
    pub description: String,
    pub violating_slots: Vec<usize>,
    pub context: BTreeMap<String, String>,
}

impl Violation {
    fn new(invariant: &str, description: impl Into<String>, violating_slots: Vec<usize>) -> Self {
        Self {
            invariant: invariant.to_string(),
            description: description.into(),
            violating_slots,
            context: BTreeMap::new(),
        }
    }

    fn with_context(mut self, key: &str, value: impl ToString) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "INVARIANT VIOLATION: {}", self.invariant)?;
        writeln!(f, "  Description: {}", self.description)?;
        writeln!(f, "  Violating slots: {:?}", self.violating_slots)?;
        if !self.context.is_empty() {
            writeln!(f, "  Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "    {}: {}", key, value)?;
            }
        }
        Ok(())
    }
}

/// Trait for invariant checkers
pub trait Invariant: Send + Sync {
    fn name(&self) -> &str;

    /// Check the invariant against a captured view
    fn check(&self, view: &ConsistencyView) -> Result<(), Violation>;

    fn description(&self) -> &str {
        "No description provided"
    }
}

/// Check all invariants and return violations
pub fn check_all_invariants(
    view: &ConsistencyView,
    invariants: &[Box<dyn Invariant>],
) -> Vec<Violation> {
    invariants
        .iter()
        .filter_map(|invariant| invariant.check(view).err())
        .collect()
}

/// Every invariant in this module
pub fn default_invariants() -> Vec<Box<dyn Invariant>> {
    vec![
        Box::new(UniqueRecordKeys),
        Box::new(SlotsInBounds),
        Box::new(SecondaryIndexesCoverRecords),
        Box::new(SearchIndexCoversRecords),
    ]
}

/// No two records share a title and artist
pub struct UniqueRecordKeys;

impl Invariant for UniqueRecordKeys {
    fn name(&self) -> &str {
        "UniqueRecordKeys"
    }

    fn description(&self) -> &str {
        "No two records share the same (title, artist) pair"
    }

    fn check(&self, view: &ConsistencyView) -> Result<(), Violation> {
        let mut seen = HashSet::new();
        let duplicates: Vec<usize> = view
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| !seen.insert(record.key()))
            .map(|(slot, _)| slot)
            .collect();

        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(Violation::new(
                self.name(),
                "duplicate (title, artist) pairs stored",
                duplicates,
            ))
        }
    }
}

/// Every slot referenced by an index names a stored record
pub struct SlotsInBounds;

impl Invariant for SlotsInBounds {
    fn name(&self) -> &str {
        "SlotsInBounds"
    }

    fn description(&self) -> &str {
        "Secondary indexes and postings only reference existing slots"
    }

    fn check(&self, view: &ConsistencyView) -> Result<(), Violation> {
        let len = view.records.len();

        let secondary = view
            .secondary
            .iter()
            .flat_map(|(_, index)| index.iter())
            .flat_map(|(_, slots)| slots.iter().copied());
        let postings = view
            .search_index
            .terms()
            .flat_map(|(_, postings)| postings.iter().map(|p| p.slot));

        let mut dangling: Vec<usize> = secondary.chain(postings).filter(|&s| s >= len).collect();
        dangling.sort_unstable();
        dangling.dedup();

        if dangling.is_empty() {
            Ok(())
        } else {
            Err(
                Violation::new(self.name(), "index references a missing slot", dangling)
                    .with_context("record_count", len),
            )
        }
    }
}

/// Secondary indexes agree exactly with the stored records
///
/// Every record is listed under its title and artist, and under its album
/// and genre when those are non-empty; every entry's key equals the field
/// value of the record it points at.
pub struct SecondaryIndexesCoverRecords;

impl Invariant for SecondaryIndexesCoverRecords {
    fn name(&self) -> &str {
        "SecondaryIndexesCoverRecords"
    }

    fn description(&self) -> &str {
        "Exact-match indexes list each record under its current field values only"
    }

    fn check(&self, view: &ConsistencyView) -> Result<(), Violation> {
        for (field, index) in &view.secondary {
            // Stale entries
            for (value, slots) in index.iter() {
                for &slot in slots {
                    let matches = view
                        .record(slot)
                        .is_some_and(|record| field_value(record, *field) == value);
                    if !matches {
                        return Err(Violation::new(
                            self.name(),
                            "index entry does not match the record at its slot",
                            vec![slot],
                        )
                        .with_context("field", field.name())
                        .with_context("value", value));
                    }
                }
            }

            // Missing entries
            for (slot, record) in view.records.iter().enumerate() {
                let value = field_value(record, *field);
                if value.is_empty() && matches!(field, Field::Album | Field::Genre) {
                    continue;
                }
                let listed = index.get(value).iter().filter(|&&s| s == slot).count();
                if listed != 1 {
                    return Err(Violation::new(
                        self.name(),
                        format!("record listed {} times under its value", listed),
                        vec![slot],
                    )
                    .with_context("field", field.name())
                    .with_context("value", value));
                }
            }
        }
        Ok(())
    }
}

/// The search index holds a posting for every token of every record, and
/// no posting for a token the record no longer has
pub struct SearchIndexCoversRecords;

impl Invariant for SearchIndexCoversRecords {
    fn name(&self) -> &str {
        "SearchIndexCoversRecords"
    }

    fn description(&self) -> &str {
        "Postings match the tokenized fields of the records at their slots"
    }

    fn check(&self, view: &ConsistencyView) -> Result<(), Violation> {
        let tokenizer = view.search_index.tokenizer();

        for (slot, record) in view.records.iter().enumerate() {
            for field in Field::ALL {
                for term in tokenizer.tokenize(field_value(record, field)) {
                    let indexed = view
                        .search_index
                        .postings(&term)
                        .iter()
                        .any(|p| p.slot == slot && p.field == field);
                    if !indexed {
                        return Err(Violation::new(
                            self.name(),
                            "record token has no posting",
                            vec![slot],
                        )
                        .with_context("field", field.name())
                        .with_context("term", term));
                    }
                }
            }
        }

        for (term, postings) in view.search_index.terms() {
            for posting in postings {
                let Some(record) = view.record(posting.slot) else {
                    continue;
                };
                let present = tokenizer
                    .tokenize(field_value(record, posting.field))
                    .iter()
                    .any(|t| t == term);
                if !present {
                    return Err(Violation::new(
                        self.name(),
                        "posting for a token the record does not contain",
                        vec![posting.slot],
                    )
                    .with_context("field", posting.field.name())
                    .with_context("term", term));
                }
            }
        }
        Ok(())
    }
}

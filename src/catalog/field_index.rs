use std::collections::HashMap;

/// Exact field value -> slots holding that value
///
/// Keys are stored as given, so lookups are case-sensitive.
#[derive(Clone, Debug, Default)]
pub struct FieldIndex {
    entries: HashMap<String, Vec<usize>>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: &str, slot: usize) {
        self.entries.entry(value.to_string()).or_default().push(slot);
    }

    /// Slots for `value`, in insertion order
    pub fn get(&self, value: &str) -> &[usize] {
        self.entries.get(value).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.entries
            .iter()
            .map(|(value, slots)| (value.as_str(), slots.as_slice()))
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

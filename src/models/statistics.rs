use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Aggregate figures over the whole catalog
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStatistics {
    pub total_tracks: usize,
    pub total_artists: usize,
    pub total_albums: usize,
    pub total_duration: Duration,
    /// Mean over rated records only (rating > 0); 0.0 when nothing is rated
    pub average_rating: f64,
    pub total_play_count: u64,
}

/// Size figures of the search index
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStatistics {
    /// Distinct terms with at least one live posting
    pub indexed_terms: usize,
    /// Distinct slots with at least one posting
    pub indexed_slots: usize,
    /// Words reachable through autocomplete, including stale ones
    pub suggestion_words: usize,
}

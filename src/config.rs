use serde::{Deserialize, Serialize};

use crate::models::{SearchMode, SearchOptions};

/// Catalog configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Options applied by `Catalog::search` and `Catalog::search_advanced`
    pub search_defaults: SearchOptions,
    /// Default `limit` for the most-played and top-rated views
    pub top_tracks_limit: usize,
    /// Default cap on autocomplete suggestions
    pub suggestion_limit: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            search_defaults: SearchOptions::default(),
            top_tracks_limit: 10,
            suggestion_limit: 10,
        }
    }
}

impl CatalogSettings {
    /// Replace the default search options
    pub fn with_search_defaults(mut self, options: SearchOptions) -> Self {
        self.search_defaults = options;
        self
    }

    /// Change only the default search mode
    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search_defaults.mode = mode;
        self
    }

    pub fn with_top_tracks_limit(mut self, limit: usize) -> Self {
        self.top_tracks_limit = limit;
        self
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }
}

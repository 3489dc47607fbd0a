use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::record::Record;

/// A searchable text field of a record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Artist,
    Album,
    Genre,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Artist, Field::Album, Field::Genre];

    /// Ranking weight applied to every posting indexed from this field
    pub fn weight(self) -> f64 {
        match self {
            Field::Title => 1.0,
            Field::Artist => 0.8,
            Field::Album => 0.6,
            Field::Genre => 0.4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Artist => "artist",
            Field::Album => "album",
            Field::Genre => "genre",
        }
    }
}

/// Term matching strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Query must equal an indexed term
    Exact,
    /// Indexed term starts with the query
    Prefix,
    /// Indexed term contains the query
    #[default]
    Substring,
    /// Edit-distance similarity
    Fuzzy,
    /// Query is a regular expression matched against terms
    Regex,
}

impl SearchMode {
    pub const ALL: [SearchMode; 5] = [
        SearchMode::Exact,
        SearchMode::Prefix,
        SearchMode::Substring,
        SearchMode::Fuzzy,
        SearchMode::Regex,
    ];

    /// Get a short name for this mode (for logging and metric labels)
    pub fn name(&self) -> &'static str {
        match self {
            SearchMode::Exact => "exact",
            SearchMode::Prefix => "prefix",
            SearchMode::Substring => "substring",
            SearchMode::Fuzzy => "fuzzy",
            SearchMode::Regex => "regex",
        }
    }
}

/// Options controlling a single search call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub mode: SearchMode,
    pub case_sensitive: bool,
    pub search_title: bool,
    pub search_artist: bool,
    pub search_album: bool,
    pub search_genre: bool,
    pub max_results: usize,
    pub min_relevance: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            mode: SearchMode::Substring,
            case_sensitive: false,
            search_title: true,
            search_artist: true,
            search_album: true,
            search_genre: true,
            max_results: 100,
            min_relevance: 0.0,
        }
    }
}

impl SearchOptions {
    /// Default options with the given mode
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Restrict matching to the listed fields
    pub fn only_fields(mut self, fields: &[Field]) -> Self {
        self.search_title = fields.contains(&Field::Title);
        self.search_artist = fields.contains(&Field::Artist);
        self.search_album = fields.contains(&Field::Album);
        self.search_genre = fields.contains(&Field::Genre);
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_min_relevance(mut self, min_relevance: f64) -> Self {
        self.min_relevance = min_relevance;
        self
    }

    /// Check whether postings from `field` may contribute to the score
    pub fn includes(&self, field: Field) -> bool {
        match field {
            Field::Title => self.search_title,
            Field::Artist => self.search_artist,
            Field::Album => self.search_album,
            Field::Genre => self.search_genre,
        }
    }
}

/// Slot-level search hit produced by the index
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub slot: usize,
    pub score: f64,
}

impl SearchHit {
    pub fn new(slot: usize, score: f64) -> Self {
        Self { slot, score }
    }
}

/// Search hit resolved against the catalog
#[derive(Clone, Debug)]
pub struct ScoredRecord {
    pub record: Arc<Record>,
    pub score: f64,
}

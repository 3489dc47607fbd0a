use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use super::field_index::FieldIndex;
use crate::config::CatalogSettings;
use crate::error::{AudexError, Result};
use crate::index::SearchIndex;
use crate::metrics::CatalogMetrics;
use crate::models::*;
use crate::testing::ConsistencyView;

/// Everything the catalog lock guards. Slots are positions in `records`.
#[derive(Default)]
struct CatalogState {
    records: Vec<Arc<Record>>,
    titles: FieldIndex,
    artists: FieldIndex,
    albums: FieldIndex,
    genres: FieldIndex,
    search_index: SearchIndex,
}

impl CatalogState {
    fn find_slot(&self, title: &str, artist: &str) -> Option<usize> {
        self.titles.get(title).iter().copied().find(|&slot| {
            self.records
                .get(slot)
                .is_some_and(|record| record.artist() == artist)
        })
    }

    fn insert(&mut self, record: Record) -> Result<usize> {
        if self.find_slot(record.title(), record.artist()).is_some() {
            tracing::debug!(
                title = record.title(),
                artist = record.artist(),
                "rejected duplicate record"
            );
            return Err(AudexError::duplicate(record.title(), record.artist()));
        }

        let slot = self.records.len();
        self.records.push(Arc::new(record));
        self.index_slot(slot);

        tracing::debug!(slot, "record added");
        Ok(slot)
    }

    fn index_slot(&mut self, slot: usize) {
        let Some(record) = self.records.get(slot) else {
            return;
        };

        self.titles.insert(record.title(), slot);
        self.artists.insert(record.artist(), slot);
        if !record.album().is_empty() {
            self.albums.insert(record.album(), slot);
        }
        if !record.genre().is_empty() {
            self.genres.insert(record.genre(), slot);
        }
        self.search_index.index(slot, record);
    }

    /// Drop every record matching `predicate`; rebuilds when anything went
    fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&Record) -> bool,
    {
        let before = self.records.len();
        self.records.retain(|record| !predicate(record));
        let removed = before - self.records.len();

        if removed > 0 {
            self.rebuild();
        }
        removed
    }

    /// Re-derive every index from `records`, slot = position
    fn rebuild(&mut self) {
        self.titles.clear();
        self.artists.clear();
        self.albums.clear();
        self.genres.clear();
        self.search_index.clear();

        for slot in 0..self.records.len() {
            self.index_slot(slot);
        }
        tracing::debug!(records = self.records.len(), "indexes rebuilt");
    }

    fn clear(&mut self) -> usize {
        let removed = self.records.len();
        self.records.clear();
        self.titles.clear();
        self.artists.clear();
        self.albums.clear();
        self.genres.clear();
        self.search_index.clear();
        removed
    }

    fn resolve(&self, slots: &[usize]) -> Vec<Arc<Record>> {
        slots
            .iter()
            .filter_map(|&slot| self.records.get(slot).cloned())
            .collect()
    }

    fn resolve_hits(&self, hits: &[SearchHit]) -> Vec<ScoredRecord> {
        hits.iter()
            .filter_map(|hit| {
                self.records.get(hit.slot).map(|record| ScoredRecord {
                    record: Arc::clone(record),
                    score: hit.score,
                })
            })
            .collect()
    }
}

/// Thread-safe media catalog
///
/// Records, the four exact-match indexes and the search index sit behind a
/// single reader-writer lock, so readers always observe them in agreement.
/// Returned `Arc<Record>` snapshots are unaffected by later writes.
pub struct Catalog {
    state: RwLock<CatalogState>,
    settings: CatalogSettings,
    metrics: Option<Arc<CatalogMetrics>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::with_settings(CatalogSettings::default())
    }

    pub fn with_settings(settings: CatalogSettings) -> Self {
        Self {
            state: RwLock::new(CatalogState::default()),
            settings,
            metrics: None,
        }
    }

    /// Attach prometheus metrics
    pub fn with_metrics(mut self, metrics: Arc<CatalogMetrics>) -> Self {
        metrics.set_total_records(self.size());
        self.metrics = Some(metrics);
        self
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    pub fn metrics(&self) -> Option<&Arc<CatalogMetrics>> {
        self.metrics.as_ref()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Add a record; `false` if one with the same title and artist exists
    pub fn add(&self, record: Record) -> bool {
        self.try_add(record).is_ok()
    }

    /// Add a record, returning its slot or `DuplicateRecord`
    pub fn try_add(&self, record: Record) -> Result<usize> {
        let mut state = self.state.write();
        let result = state.insert(record);
        let total = state.records.len();
        drop(state);

        self.observe_insert(&result, total);
        result
    }

    /// Add every record, skipping duplicates. Returns how many were added.
    pub fn add_all<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = Record>,
    {
        let mut state = self.state.write();
        let mut added = 0;
        for record in records {
            let result = state.insert(record);
            self.observe_insert(&result, state.records.len());
            if result.is_ok() {
                added += 1;
            }
        }
        added
    }

    fn observe_insert(&self, result: &Result<usize>, total: usize) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        match result {
            Ok(_) => metrics.record_added(total),
            Err(_) => metrics.record_rejected(),
        }
    }

    /// Remove the record with this exact title and artist
    pub fn remove(&self, title: &str, artist: &str) -> bool {
        let removed =
            self.remove_where(|record| record.title() == title && record.artist() == artist);
        if removed == 0 {
            tracing::debug!(title, artist, "remove: no such record");
        }
        removed > 0
    }

    /// Remove every record with this exact title
    pub fn remove_by_title(&self, title: &str) -> usize {
        self.remove_where(|record| record.title() == title)
    }

    /// Remove every record with this exact artist
    pub fn remove_by_artist(&self, artist: &str) -> usize {
        self.remove_where(|record| record.artist() == artist)
    }

    fn remove_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Record) -> bool,
    {
        let mut state = self.state.write();
        let removed = state.remove_where(predicate);
        let total = state.records.len();
        drop(state);

        if removed > 0 {
            tracing::debug!(removed, remaining = total, "records removed");
            if let Some(metrics) = &self.metrics {
                metrics.record_removed(removed, total);
                metrics.record_rebuild();
            }
        }
        removed
    }

    pub fn clear(&self) {
        let removed = self.state.write().clear();
        tracing::debug!(removed, "catalog cleared");
        if let Some(metrics) = &self.metrics {
            metrics.record_removed(removed, 0);
        }
    }

    /// Increment the play count of a record
    pub fn record_play(&self, title: &str, artist: &str) -> bool {
        self.update(title, artist, Record::increment_play_count)
    }

    /// Set the rating of a record, clamped to [0.0, 5.0]
    pub fn set_rating(&self, title: &str, artist: &str, rating: f64) -> bool {
        self.update(title, artist, |record| record.set_rating(rating))
    }

    /// Copy-on-write update of a non-indexed field
    fn update<F>(&self, title: &str, artist: &str, apply: F) -> bool
    where
        F: FnOnce(&mut Record),
    {
        let mut state = self.state.write();
        let Some(slot) = state.find_slot(title, artist) else {
            return false;
        };
        apply(Arc::make_mut(&mut state.records[slot]));
        tracing::trace!(slot, "record updated");
        true
    }

    // ========================================================================
    // Lookups and search
    // ========================================================================

    /// The record with this exact title and artist
    pub fn get(&self, title: &str, artist: &str) -> Result<Arc<Record>> {
        let state = self.state.read();
        state
            .find_slot(title, artist)
            .and_then(|slot| state.records.get(slot).cloned())
            .ok_or_else(|| AudexError::not_found(title, artist))
    }

    /// Records whose title equals `title` exactly (case-sensitive)
    pub fn find_by_title(&self, title: &str) -> Vec<Arc<Record>> {
        let state = self.state.read();
        state.resolve(state.titles.get(title))
    }

    pub fn find_by_artist(&self, artist: &str) -> Vec<Arc<Record>> {
        let state = self.state.read();
        state.resolve(state.artists.get(artist))
    }

    pub fn find_by_album(&self, album: &str) -> Vec<Arc<Record>> {
        let state = self.state.read();
        state.resolve(state.albums.get(album))
    }

    pub fn find_by_genre(&self, genre: &str) -> Vec<Arc<Record>> {
        let state = self.state.read();
        state.resolve(state.genres.get(genre))
    }

    /// Free-text search with the configured default options
    pub fn search(&self, query: &str) -> Vec<Arc<Record>> {
        self.search_with(query, &self.settings.search_defaults)
            .into_iter()
            .map(|scored| scored.record)
            .collect()
    }

    /// Free-text search, best match first
    pub fn search_with(&self, query: &str, options: &SearchOptions) -> Vec<ScoredRecord> {
        let start = Instant::now();

        let state = self.state.read();
        let hits = match state.search_index.search(query, options) {
            Ok(hits) => hits,
            Err(e) => {
                tracing::debug!(query, error = %e, "search pattern rejected");
                if let Some(metrics) = &self.metrics {
                    metrics.record_invalid_pattern();
                }
                Vec::new()
            }
        };
        let results = state.resolve_hits(&hits);
        drop(state);

        if let Some(metrics) = &self.metrics {
            metrics.record_search(options.mode, start.elapsed().as_secs_f64());
        }
        results
    }

    /// Default search, keeping only records accepted by `predicate`
    pub fn search_advanced<F>(&self, query: &str, predicate: F) -> Vec<Arc<Record>>
    where
        F: Fn(&Record) -> bool,
    {
        self.search(query)
            .into_iter()
            .filter(|record| predicate(record))
            .collect()
    }

    /// Autocomplete words for `prefix`, at most `max`
    pub fn suggestions(&self, prefix: &str, max: usize) -> Vec<String> {
        self.state.read().search_index.get_suggestions(prefix, max)
    }

    /// Autocomplete with the configured suggestion limit
    pub fn autocomplete(&self, prefix: &str) -> Vec<String> {
        self.suggestions(prefix, self.settings.suggestion_limit)
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Snapshot of all records in slot order
    pub fn get_all_tracks(&self) -> Vec<Arc<Record>> {
        self.state.read().records.clone()
    }

    pub fn get_tracks_sorted<F>(&self, mut compare: F) -> Vec<Arc<Record>>
    where
        F: FnMut(&Record, &Record) -> Ordering,
    {
        let mut tracks = self.get_all_tracks();
        tracks.sort_by(|a, b| compare(a, b));
        tracks
    }

    /// Distinct artists, sorted
    pub fn get_all_artists(&self) -> Vec<String> {
        self.distinct(Record::artist)
    }

    /// Distinct non-empty albums, sorted
    pub fn get_all_albums(&self) -> Vec<String> {
        self.distinct(Record::album)
    }

    /// Distinct non-empty genres, sorted
    pub fn get_all_genres(&self) -> Vec<String> {
        self.distinct(Record::genre)
    }

    fn distinct<F>(&self, field: F) -> Vec<String>
    where
        F: Fn(&Record) -> &str,
    {
        let state = self.state.read();
        let values: BTreeSet<&str> = state
            .records
            .iter()
            .map(|record| field(record))
            .filter(|value| !value.is_empty())
            .collect();
        values.into_iter().map(str::to_string).collect()
    }

    pub fn filter_tracks<F>(&self, predicate: F) -> Vec<Arc<Record>>
    where
        F: Fn(&Record) -> bool,
    {
        self.state
            .read()
            .records
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    pub fn filter(&self, filter: &Filter) -> Vec<Arc<Record>> {
        self.filter_tracks(|record| filter.matches(record))
    }

    /// Records released in `start..=end`
    pub fn get_tracks_by_year_range(&self, start: i32, end: i32) -> Vec<Arc<Record>> {
        self.filter(&Filter::year_range(start, end))
    }

    /// Records rated in `min..=max`
    pub fn get_tracks_by_rating_range(&self, min: f64, max: f64) -> Vec<Arc<Record>> {
        self.filter(&Filter::rating_range(min, max))
    }

    /// Up to `limit` records by play count, highest first
    pub fn get_most_played_tracks(&self, limit: usize) -> Vec<Arc<Record>> {
        let mut tracks = self.get_all_tracks();
        tracks.sort_by(|a, b| b.play_count().cmp(&a.play_count()));
        tracks.truncate(limit);
        tracks
    }

    /// Up to `limit` rated records by rating, highest first
    pub fn get_top_rated_tracks(&self, limit: usize) -> Vec<Arc<Record>> {
        let mut tracks = self.filter_tracks(|record| record.rating() > 0.0);
        tracks.sort_by(|a, b| b.rating().total_cmp(&a.rating()));
        tracks.truncate(limit);
        tracks
    }

    pub fn most_played(&self) -> Vec<Arc<Record>> {
        self.get_most_played_tracks(self.settings.top_tracks_limit)
    }

    pub fn top_rated(&self) -> Vec<Arc<Record>> {
        self.get_top_rated_tracks(self.settings.top_tracks_limit)
    }

    /// Visit every record in slot order while holding the read lock
    pub fn for_each_track<F>(&self, mut f: F)
    where
        F: FnMut(&Record),
    {
        for record in self.state.read().records.iter() {
            f(record);
        }
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    pub fn size(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }

    pub fn get_statistics(&self) -> CatalogStatistics {
        let state = self.state.read();

        let mut artists = HashSet::new();
        let mut albums = HashSet::new();
        let mut total_duration = Duration::ZERO;
        let mut total_play_count = 0u64;
        let mut rating_sum = 0.0;
        let mut rated = 0usize;

        for record in &state.records {
            artists.insert(record.artist());
            if !record.album().is_empty() {
                albums.insert(record.album());
            }
            total_duration += record.duration();
            total_play_count = total_play_count.saturating_add(record.play_count());
            if record.rating() > 0.0 {
                rating_sum += record.rating();
                rated += 1;
            }
        }

        CatalogStatistics {
            total_tracks: state.records.len(),
            total_artists: artists.len(),
            total_albums: albums.len(),
            total_duration,
            average_rating: if rated > 0 {
                rating_sum / rated as f64
            } else {
                0.0
            },
            total_play_count,
        }
    }

    pub fn index_statistics(&self) -> IndexStatistics {
        self.state.read().search_index.statistics()
    }

    /// Copy of the internal indexes, for invariant checks
    pub fn consistency_view(&self) -> ConsistencyView {
        let state = self.state.read();
        ConsistencyView {
            records: state.records.clone(),
            secondary: vec![
                (Field::Title, state.titles.clone()),
                (Field::Artist, state.artists.clone()),
                (Field::Album, state.albums.clone()),
                (Field::Genre, state.genres.clone()),
            ],
            search_index: state.search_index.clone(),
        }
    }
}

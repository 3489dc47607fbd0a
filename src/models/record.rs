use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use super::codec::{escape_csv_field, format_rating, split_csv_line};
use crate::error::{AudexError, Result};

/// Longest accepted track duration (10 hours)
pub const MAX_DURATION_SECS: u32 = 36_000;
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;
pub const MAX_RATING: f64 = 5.0;

/// One catalog entry
///
/// Equality and hashing only consider `title` and `artist` (the dedup key);
/// use [`Record::listing_cmp`] for the default listing order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Record {
    title: String,
    artist: String,
    duration: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    album: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    genre: String,
    #[serde(default, skip_serializing_if = "is_zero_year")]
    year: i32,
    #[serde(default, skip_serializing_if = "is_zero_count")]
    play_count: u64,
    #[serde(
        default,
        skip_serializing_if = "is_unrated",
        deserialize_with = "deserialize_rating"
    )]
    rating: f64,
}

/// Borrowed dedup key of a record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordKey<'a> {
    pub title: &'a str,
    pub artist: &'a str,
}

fn is_zero_year(year: &i32) -> bool {
    *year == 0
}

fn is_zero_count(count: &u64) -> bool {
    *count == 0
}

fn is_unrated(rating: &f64) -> bool {
    *rating == 0.0
}

fn clamp_rating(rating: f64) -> f64 {
    if rating.is_nan() {
        0.0
    } else {
        rating.clamp(0.0, MAX_RATING)
    }
}

fn deserialize_rating<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_rating)
}

impl Record {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            duration: duration_secs,
            ..Default::default()
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn with_play_count(mut self, play_count: u64) -> Self {
        self.play_count = play_count;
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.set_rating(rating);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration))
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// Release year, 0 when unknown
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn play_count(&self) -> u64 {
        self.play_count
    }

    /// Rating in [0.0, 5.0], 0.0 meaning unrated
    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn set_album(&mut self, album: impl Into<String>) {
        self.album = album.into();
    }

    pub fn set_genre(&mut self, genre: impl Into<String>) {
        self.genre = genre.into();
    }

    pub fn set_year(&mut self, year: i32) {
        self.year = year;
    }

    /// Store a rating, clamped to [0.0, 5.0]
    pub fn set_rating(&mut self, rating: f64) {
        self.rating = clamp_rating(rating);
    }

    pub fn increment_play_count(&mut self) {
        self.play_count = self.play_count.saturating_add(1);
    }

    pub fn key(&self) -> RecordKey<'_> {
        RecordKey {
            title: &self.title,
            artist: &self.artist,
        }
    }

    /// Default listing order: artist, then title, then album
    pub fn listing_cmp(&self, other: &Self) -> Ordering {
        self.artist
            .cmp(&other.artist)
            .then_with(|| self.title.cmp(&other.title))
            .then_with(|| self.album.cmp(&other.album))
    }

    /// Render the duration as `H:MM:SS`, or `M:SS` below one hour
    pub fn format_duration(&self) -> String {
        let hours = self.duration / 3600;
        let minutes = (self.duration % 3600) / 60;
        let seconds = self.duration % 60;

        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{}:{:02}", minutes, seconds)
        }
    }

    /// Case-insensitive substring match over the text fields
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [&self.title, &self.artist, &self.album, &self.genre]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }

    /// Check the ingestion rules
    pub fn validate(&self) -> Result<()> {
        if self.title.is_empty() {
            return Err(AudexError::InvalidRecord("title is empty".to_string()));
        }
        if self.artist.is_empty() {
            return Err(AudexError::InvalidRecord("artist is empty".to_string()));
        }
        if self.duration == 0 || self.duration > MAX_DURATION_SECS {
            return Err(AudexError::InvalidRecord(format!(
                "duration {}s outside 1..={}",
                self.duration, MAX_DURATION_SECS
            )));
        }
        if self.year != 0 && !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return Err(AudexError::InvalidRecord(format!(
                "year {} outside {}..={}",
                self.year, MIN_YEAR, MAX_YEAR
            )));
        }
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(AudexError::InvalidRecord(format!(
                "rating {} outside 0.0..=5.0",
                self.rating
            )));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Canonical CSV line (no trailing newline), columns as in [`super::CSV_HEADER`]
    pub fn to_csv(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{}",
            escape_csv_field(&self.title),
            escape_csv_field(&self.artist),
            self.duration,
            escape_csv_field(&self.album),
            escape_csv_field(&self.genre),
            self.year,
            self.play_count,
            format_rating(self.rating)
        )
    }

    /// Parse a canonical CSV line; `None` if fewer than three fields or a
    /// numeric column does not parse
    pub fn from_csv_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let fields = split_csv_line(line);
        if fields.len() < 3 {
            return None;
        }

        let duration = fields[2].trim().parse::<u32>().ok()?;
        let mut record = Record::new(fields[0].as_str(), fields[1].as_str(), duration);

        let optional = |idx: usize| fields.get(idx).map(|f| f.as_str()).filter(|f| !f.is_empty());

        if let Some(album) = optional(3) {
            record.album = album.to_string();
        }
        if let Some(genre) = optional(4) {
            record.genre = genre.to_string();
        }
        if let Some(year) = optional(5) {
            record.year = year.trim().parse().ok()?;
        }
        if let Some(play_count) = optional(6) {
            record.play_count = play_count.trim().parse().ok()?;
        }
        if let Some(rating) = optional(7) {
            record.set_rating(rating.trim().parse().ok()?);
        }

        Some(record)
    }

    /// Canonical JSON object; unset optional fields are omitted
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse a JSON object; `None` on malformed input or missing
    /// title/artist/duration
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" by {} ({})",
            self.title,
            self.artist,
            self.format_duration()
        )?;
        if !self.album.is_empty() {
            write!(f, " from \"{}\"", self.album)?;
        }
        if self.year > 0 {
            write!(f, " [{}]", self.year)?;
        }
        if self.rating > 0.0 {
            write!(f, " Rating: {:.1}/5.0", self.rating)?;
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

use super::record::Record;

/// Record filter for catalog views and search refinement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// Exact artist match
    Artist(String),

    /// Exact album match
    Album(String),

    /// Exact genre match
    Genre(String),

    /// Release year range, inclusive on both ends
    YearRange { start: i32, end: i32 },

    /// Rating range, inclusive on both ends
    RatingRange { min: f64, max: f64 },

    /// At least this many plays
    MinPlayCount(u64),
}

impl Filter {
    pub fn artist(artist: impl Into<String>) -> Self {
        Filter::Artist(artist.into())
    }

    pub fn album(album: impl Into<String>) -> Self {
        Filter::Album(album.into())
    }

    pub fn genre(genre: impl Into<String>) -> Self {
        Filter::Genre(genre.into())
    }

    pub fn year_range(start: i32, end: i32) -> Self {
        Filter::YearRange { start, end }
    }

    pub fn rating_range(min: f64, max: f64) -> Self {
        Filter::RatingRange { min, max }
    }

    pub fn min_play_count(count: u64) -> Self {
        Filter::MinPlayCount(count)
    }

    /// Check whether a record passes this filter
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::Artist(artist) => record.artist() == artist,
            Filter::Album(album) => record.album() == album,
            Filter::Genre(genre) => record.genre() == genre,
            Filter::YearRange { start, end } => record.year() >= *start && record.year() <= *end,
            Filter::RatingRange { min, max } => {
                record.rating() >= *min && record.rating() <= *max
            }
            Filter::MinPlayCount(count) => record.play_count() >= *count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_constructors() {
        assert!(matches!(Filter::artist("Queen"), Filter::Artist(_)));
        assert!(matches!(Filter::year_range(1970, 1979), Filter::YearRange { .. }));
        assert!(matches!(Filter::rating_range(4.0, 5.0), Filter::RatingRange { .. }));
        assert!(matches!(Filter::min_play_count(3), Filter::MinPlayCount(3)));
    }

    #[test]
    fn test_filter_matches() {
        let record = Record::new("Bohemian Rhapsody", "Queen", 354)
            .with_album("A Night at the Opera")
            .with_genre("Rock")
            .with_year(1975)
            .with_rating(4.5)
            .with_play_count(12);

        assert!(Filter::artist("Queen").matches(&record));
        assert!(!Filter::artist("queen").matches(&record));
        assert!(Filter::album("A Night at the Opera").matches(&record));
        assert!(Filter::genre("Rock").matches(&record));
        assert!(Filter::year_range(1975, 1975).matches(&record));
        assert!(!Filter::year_range(1980, 1990).matches(&record));
        assert!(Filter::rating_range(4.5, 5.0).matches(&record));
        assert!(!Filter::rating_range(0.0, 4.0).matches(&record));
        assert!(Filter::min_play_count(12).matches(&record));
        assert!(!Filter::min_play_count(13).matches(&record));
    }
}

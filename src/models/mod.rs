pub mod codec;
pub mod filter;
pub mod record;
pub mod search;
pub mod statistics;

pub use codec::CSV_HEADER;
pub use filter::Filter;
pub use record::{Record, RecordKey, MAX_DURATION_SECS, MAX_RATING, MAX_YEAR, MIN_YEAR};
pub use search::{Field, ScoredRecord, SearchHit, SearchMode, SearchOptions};
pub use statistics::{CatalogStatistics, IndexStatistics};

pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod metrics;
pub mod models;
pub mod testing;
pub mod tokenizer;

pub use catalog::Catalog;
pub use config::CatalogSettings;
pub use error::{AudexError, Result};
pub use index::SearchIndex;
pub use metrics::CatalogMetrics;
pub use models::*;
pub use tokenizer::Tokenizer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Correctness checks over a catalog's internal indexes
//!
//! Capture a [`ConsistencyView`] with `Catalog::consistency_view` and run
//! invariants against it:
//!
//! ```rust
//! use audex::testing::prelude::*;
//! use audex::{Catalog, Record};
//!
//! let catalog = Catalog::new();
//! catalog.add(Record::new("Imagine", "John Lennon", 183));
//!
//! let view = catalog.consistency_view();
//! let violations = check_all_invariants(&view, &default_invariants());
//! assert!(violations.is_empty());
//! ```

use std::sync::Arc;

use crate::catalog::FieldIndex;
use crate::index::SearchIndex;
use crate::models::{Field, Record};

pub mod invariants;

pub use invariants::{
    check_all_invariants, default_invariants, Invariant, SearchIndexCoversRecords,
    SecondaryIndexesCoverRecords, SlotsInBounds, UniqueRecordKeys, Violation,
};

/// Point-in-time copy of a catalog's records and indexes
#[derive(Clone, Debug)]
pub struct ConsistencyView {
    pub records: Vec<Arc<Record>>,
    pub secondary: Vec<(Field, FieldIndex)>,
    pub search_index: SearchIndex,
}

impl ConsistencyView {
    pub fn record(&self, slot: usize) -> Option<&Record> {
        self.records.get(slot).map(Arc::as_ref)
    }
}

/// Field value as the secondary indexes key it
pub(crate) fn field_value(record: &Record, field: Field) -> &str {
    match field {
        Field::Title => record.title(),
        Field::Artist => record.artist(),
        Field::Album => record.album(),
        Field::Genre => record.genre(),
    }
}

/// Convenient imports for invariant tests
pub mod prelude {
    pub use super::invariants::{check_all_invariants, default_invariants, Invariant, Violation};
    pub use super::ConsistencyView;
}

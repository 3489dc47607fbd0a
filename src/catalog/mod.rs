pub mod field_index;
pub mod store;

pub use field_index::FieldIndex;
pub use store::Catalog;

pub mod inverted;
pub mod matcher;
pub mod scoring;
pub mod search_index;
pub mod trie;

pub use inverted::{InvertedIndex, Posting};
pub use matcher::TermMatcher;
pub use search_index::SearchIndex;
pub use trie::PrefixTrie;

// Re-export main components
pub mod error;
pub mod forward;
pub mod ingest;
pub mod snapshot;
pub mod store;
pub mod tokenizer;
pub mod trie;

// Re-export commonly used types
pub use error::{Error, Result};
pub use forward::ForwardIndex;
pub use snapshot::Snapshot;
pub use store::{DocumentInfo, DocumentStore, SearchResult, Stats};
pub use trie::Trie;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

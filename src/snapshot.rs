use crate::forward::ForwardIndex;
use crate::store::DocumentStore;
use crate::trie::Trie;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Durable state of a store: raw contents, the live-document counter, and
/// the forward index. The trie is never persisted; it is rebuilt on load by
/// replaying the forward index, which makes the forward index the single
/// source of truth for round-tripping.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub documents: HashMap<String, String>,
    pub total_documents: usize,
    pub forward_index: ForwardIndex,
}

impl DocumentStore {
    /// Capture the store's durable state.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            documents: self.documents.clone(),
            total_documents: self.total_documents,
            forward_index: self.forward.clone(),
        }
    }

    /// Reconstruct a store from a snapshot, replaying every
    /// (document, word, count) triple into a fresh trie.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut trie = Trie::new();
        for (doc_id, word_counts) in snapshot.forward_index.iter() {
            for (word, count) in word_counts {
                if !trie.search(word) {
                    trie.insert(word);
                }
                trie.add_document_to_word(word, doc_id, *count);
            }
        }

        DocumentStore {
            trie,
            forward: snapshot.forward_index,
            documents: snapshot.documents,
            total_documents: snapshot.total_documents,
        }
    }

    /// Write the snapshot to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.to_snapshot())?;
        std::fs::write(path, json).map_err(|e| Error::io(path, e))?;
        info!(path = %path.display(), docs = self.documents.len(), "saved snapshot");
        Ok(())
    }

    /// Load a store from a JSON snapshot file. Read failures surface as
    /// `Error::Io` with the offending path; a corrupt or schema-mismatched
    /// file aborts the load with `Error::Parse`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let snapshot: Snapshot = serde_json::from_str(&data)?;
        let store = Self::from_snapshot(snapshot);
        info!(path = %path.display(), docs = store.documents.len(), "loaded snapshot");
        Ok(store)
    }
}

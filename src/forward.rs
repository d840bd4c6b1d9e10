use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Forward index: document -> word-frequency vector plus total length.
/// Entries are independent snapshots; re-adding an existing ID replaces the
/// prior entry wholesale. Serialized as-is into the persisted snapshot,
/// where it is the single source of truth for rebuilding the trie.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForwardIndex {
    documents: HashMap<String, HashMap<String, usize>>,
    doc_lengths: HashMap<String, usize>,
}

impl ForwardIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of the word counts for a document; the document length
    /// is the sum of all counts.
    pub fn add_document(&mut self, doc_id: &str, word_counts: &HashMap<String, usize>) {
        let total_words: usize = word_counts.values().sum();
        self.documents.insert(doc_id.to_string(), word_counts.clone());
        self.doc_lengths.insert(doc_id.to_string(), total_words);
    }

    /// Occurrences of a word in a document; 0 for unknown documents.
    pub fn get_word_count(&self, doc_id: &str, word: &str) -> usize {
        self.documents
            .get(doc_id)
            .and_then(|counts| counts.get(&word.to_lowercase()))
            .copied()
            .unwrap_or(0)
    }

    /// Copy of a document's word counts; empty for unknown documents.
    pub fn get_document_words(&self, doc_id: &str) -> HashMap<String, usize> {
        self.documents.get(doc_id).cloned().unwrap_or_default()
    }

    /// Total number of words in a document; 0 for unknown documents.
    pub fn get_document_length(&self, doc_id: &str) -> usize {
        self.doc_lengths.get(doc_id).copied().unwrap_or(0)
    }

    /// Drop a document's entry; false if it was never stored.
    pub fn remove_document(&mut self, doc_id: &str) -> bool {
        if self.documents.remove(doc_id).is_some() {
            self.doc_lengths.remove(doc_id);
            true
        } else {
            false
        }
    }

    /// Term frequency: word count divided by document length. Returns 0.0
    /// for unknown or zero-length documents.
    pub fn get_tf(&self, doc_id: &str, word: &str) -> f64 {
        let doc_length = self.get_document_length(doc_id);
        if doc_length > 0 {
            self.get_word_count(doc_id, word) as f64 / doc_length as f64
        } else {
            0.0
        }
    }

    /// Iterate over every stored (document, word counts) entry. Used to
    /// replay postings into the trie after a snapshot load.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &HashMap<String, usize>)> {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, usize)]) -> HashMap<String, usize> {
        pairs
            .iter()
            .map(|(w, c)| (w.to_string(), *c))
            .collect()
    }

    #[test]
    fn test_add_and_read() {
        let mut index = ForwardIndex::new();
        index.add_document("doc1", &counts(&[("rust", 3), ("fast", 1)]));

        assert_eq!(index.get_word_count("doc1", "rust"), 3);
        assert_eq!(index.get_word_count("doc1", "RUST"), 3);
        assert_eq!(index.get_word_count("doc1", "missing"), 0);
        assert_eq!(index.get_document_length("doc1"), 4);
        assert_eq!(index.get_document_words("doc1").len(), 2);
    }

    #[test]
    fn test_unknown_document_reads_are_empty() {
        let index = ForwardIndex::new();
        assert_eq!(index.get_word_count("nope", "rust"), 0);
        assert_eq!(index.get_document_length("nope"), 0);
        assert!(index.get_document_words("nope").is_empty());
        assert_eq!(index.get_tf("nope", "rust"), 0.0);
    }

    #[test]
    fn test_readd_replaces_wholesale() {
        let mut index = ForwardIndex::new();
        index.add_document("doc1", &counts(&[("old", 5)]));
        index.add_document("doc1", &counts(&[("new", 2)]));

        assert_eq!(index.get_word_count("doc1", "old"), 0);
        assert_eq!(index.get_word_count("doc1", "new"), 2);
        assert_eq!(index.get_document_length("doc1"), 2);
    }

    #[test]
    fn test_remove_document() {
        let mut index = ForwardIndex::new();
        index.add_document("doc1", &counts(&[("rust", 1)]));

        assert!(index.remove_document("doc1"));
        assert!(!index.remove_document("doc1"));
        assert_eq!(index.get_document_length("doc1"), 0);
    }

    #[test]
    fn test_tf() {
        let mut index = ForwardIndex::new();
        index.add_document("doc1", &counts(&[("rust", 3), ("slow", 1)]));

        assert_eq!(index.get_tf("doc1", "rust"), 0.75);
        assert_eq!(index.get_tf("doc1", "slow"), 0.25);
        assert_eq!(index.get_tf("doc1", "missing"), 0.0);
    }

    #[test]
    fn test_document_words_is_a_copy() {
        let mut index = ForwardIndex::new();
        index.add_document("doc1", &counts(&[("rust", 1)]));

        let mut copy = index.get_document_words("doc1");
        copy.insert("injected".to_string(), 99);

        assert_eq!(index.get_word_count("doc1", "injected"), 0);
    }
}

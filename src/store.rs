use crate::forward::ForwardIndex;
use crate::tokenizer;
use crate::trie::Trie;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// Maximum preview length in bytes.
const PREVIEW_MAX_LENGTH: usize = 200;

/// Stand-in for `\*` while checking the trailing-wildcard condition.
const ESCAPED_ASTERISK_PLACEHOLDER: &str = "___ESCAPED_ASTERISK___";

/// A single ranked search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub doc_id: String,
    pub score: f64,
    pub preview: String,
}

/// Store-wide counters. `total_documents_in_index` is maintained
/// independently of the content map and serves as a consistency
/// cross-check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub total_documents: usize,
    pub total_words: usize,
    pub total_documents_in_index: usize,
}

/// Per-document details exposed to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub doc_id: String,
    pub content: String,
    pub word_counts: HashMap<String, usize>,
    pub total_words: usize,
    pub unique_words: usize,
}

/// In-memory document store with TF-IDF search. Owns the trie, the forward
/// index, and the raw content map, and keeps their document-ID sets in
/// agreement across every mutation. Single-threaded; callers needing
/// concurrent access must serialize externally.
#[derive(Debug, Default)]
pub struct DocumentStore {
    pub(crate) trie: Trie,
    pub(crate) forward: ForwardIndex,
    pub(crate) documents: HashMap<String, String>,
    pub(crate) total_documents: usize,
}

fn generate_doc_id() -> String {
    format!("doc_{}", Uuid::new_v4())
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document. With no caller-supplied ID a process-unique one is
    /// generated; a caller-supplied ID that already exists is rejected
    /// before any structure is touched. Returns the final document ID.
    pub fn add_document(&mut self, content: &str, doc_id: Option<&str>) -> Result<String> {
        let doc_id = match doc_id {
            Some(id) if !id.is_empty() => {
                if self.documents.contains_key(id) {
                    return Err(Error::DuplicateId {
                        doc_id: id.to_string(),
                    });
                }
                id.to_string()
            }
            _ => generate_doc_id(),
        };

        let word_counts = tokenizer::token_counts(content);
        self.documents.insert(doc_id.clone(), content.to_string());
        self.forward.add_document(&doc_id, &word_counts);

        // Words must be inserted before postings attach; the trie drops
        // postings for words it has never seen.
        for (word, count) in &word_counts {
            if !self.trie.search(word) {
                self.trie.insert(word);
            }
            self.trie.add_document_to_word(word, &doc_id, *count);
        }

        self.total_documents += 1;
        debug!(doc_id = %doc_id, words = word_counts.len(), "added document");
        Ok(doc_id)
    }

    /// Remove a document from all structures. Returns false (a no-op) for
    /// unknown IDs.
    pub fn remove_document(&mut self, doc_id: &str) -> bool {
        if !self.documents.contains_key(doc_id) {
            return false;
        }

        let word_counts = self.forward.get_document_words(doc_id);
        self.forward.remove_document(doc_id);

        for word in word_counts.keys() {
            self.trie.remove_document_from_word(word, doc_id);
        }

        self.documents.remove(doc_id);
        self.trie.cleanup_empty_words();
        self.total_documents = self.total_documents.saturating_sub(1);
        debug!(doc_id = %doc_id, "removed document");
        true
    }

    /// Exact-term TF-IDF search. Per-term scores are summed per document;
    /// results are sorted by descending score and truncated to `top_k`.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<SearchResult> {
        let query_words = tokenizer::tokenize(query);
        if query_words.is_empty() {
            return Vec::new();
        }

        let mut doc_scores: HashMap<String, f64> = HashMap::new();
        for word in &query_words {
            for doc_id in self.trie.get_documents_for_word(word).keys() {
                let tf_idf = self.tf_idf(doc_id, word);
                *doc_scores.entry(doc_id.clone()).or_insert(0.0) += tf_idf;
            }
        }

        self.build_results(doc_scores, &query_words, top_k)
    }

    /// Prefix-mode search. The score is a raw relative-frequency ratio
    /// (summed matched occurrences over document length), deliberately not
    /// IDF-weighted: this ranks by how much of a document is built around
    /// the stem, not by term importance.
    pub fn search_by_prefix(&self, prefix: &str, top_k: usize) -> Vec<SearchResult> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Vec::new();
        }

        let docs_with_prefix = self.trie.get_documents_for_prefix(prefix);
        if docs_with_prefix.is_empty() {
            return Vec::new();
        }

        let mut doc_scores: HashMap<String, f64> = HashMap::new();
        for (doc_id, total_count) in docs_with_prefix {
            let doc_length = self.forward.get_document_length(&doc_id);
            if doc_length > 0 {
                doc_scores.insert(doc_id, total_count as f64 / doc_length as f64);
            }
        }

        let query_words = vec![prefix.to_lowercase()];
        self.build_results(doc_scores, &query_words, top_k)
    }

    /// Dispatch between exact and prefix search. A trailing bare `*`
    /// switches to prefix mode on the trimmed stem; `\*` anywhere is a
    /// literal asterisk and never triggers the wildcard.
    pub fn smart_search(&self, query: &str, top_k: usize) -> Vec<SearchResult> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let query = query.replace("\\*", ESCAPED_ASTERISK_PLACEHOLDER);

        if let Some(stem) = query.strip_suffix('*') {
            let prefix = stem.trim();
            if prefix.is_empty() {
                return Vec::new();
            }
            return self.search_by_prefix(prefix, top_k);
        }

        let query = query.replace(ESCAPED_ASTERISK_PLACEHOLDER, "*");
        self.search(&query, top_k)
    }

    /// All indexed words starting with the given prefix.
    pub fn prefix_search(&self, prefix: &str) -> Vec<String> {
        self.trie.starts_with(prefix)
    }

    /// Details for a stored document; None for unknown IDs.
    pub fn document_info(&self, doc_id: &str) -> Option<DocumentInfo> {
        let content = self.documents.get(doc_id)?;
        let word_counts = self.forward.get_document_words(doc_id);
        let total_words = self.forward.get_document_length(doc_id);

        Some(DocumentInfo {
            doc_id: doc_id.to_string(),
            content: content.clone(),
            unique_words: word_counts.len(),
            word_counts,
            total_words,
        })
    }

    /// All document IDs currently stored. Unordered.
    pub fn document_ids(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total_documents: self.documents.len(),
            total_words: self.trie.get_all_words().len(),
            total_documents_in_index: self.total_documents,
        }
    }

    fn tf_idf(&self, doc_id: &str, word: &str) -> f64 {
        let doc_freq = self.trie.get_document_frequency(word);
        if doc_freq == 0 {
            return 0.0;
        }
        let tf = self.forward.get_tf(doc_id, word);
        let idf =
            ((self.total_documents as f64 + 1.0) / (doc_freq as f64 + 1.0)).log2() + 1.0;
        tf * idf
    }

    fn build_results(
        &self,
        doc_scores: HashMap<String, f64>,
        query_words: &[String],
        top_k: usize,
    ) -> Vec<SearchResult> {
        let mut sorted: Vec<(String, f64)> = doc_scores.into_iter().collect();
        sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        sorted.truncate(top_k);

        sorted
            .into_iter()
            .map(|(doc_id, score)| {
                let content = self.documents.get(&doc_id).map(String::as_str).unwrap_or("");
                let preview = content_preview(content, query_words, PREVIEW_MAX_LENGTH);
                SearchResult {
                    doc_id,
                    score,
                    preview,
                }
            })
            .collect()
    }
}

/// Bounded excerpt around the earliest case-insensitive query-word match.
/// Position arithmetic is byte-based; offsets are clamped to char
/// boundaries so slicing stays valid on multi-byte text.
fn content_preview(content: &str, query_words: &[String], max_length: usize) -> String {
    if content.len() <= max_length {
        return content.to_string();
    }

    let content_lower = content.to_lowercase();
    let mut first_pos = content.len();
    for word in query_words {
        if let Some(pos) = content_lower.find(&word.to_lowercase()) {
            if pos < first_pos {
                first_pos = pos;
            }
        }
    }

    let start = if first_pos < content.len() {
        first_pos.saturating_sub(50)
    } else {
        0
    };
    let start = floor_char_boundary(content, start);
    let end = floor_char_boundary(content, (start + max_length).min(content.len()));

    let mut preview = String::new();
    if start > 0 {
        preview.push_str("...");
    }
    preview.push_str(&content[start..end]);
    if end < content.len() {
        preview.push_str("...");
    }
    preview
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_document_with_explicit_id() {
        let mut store = DocumentStore::new();
        let id = store
            .add_document("Rust is a systems language", Some("doc1"))
            .unwrap();
        assert_eq!(id, "doc1");
        assert_eq!(store.stats().total_documents, 1);
    }

    #[test]
    fn test_add_document_generates_id() {
        let mut store = DocumentStore::new();
        let id = store.add_document("auto id content", None).unwrap();
        assert!(id.starts_with("doc_"));
        assert!(store.document_info(&id).is_some());

        let other = store.add_document("more content", Some("")).unwrap();
        assert!(other.starts_with("doc_"));
        assert_ne!(id, other);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut store = DocumentStore::new();
        store.add_document("first", Some("doc1")).unwrap();

        let err = store.add_document("second", Some("doc1")).unwrap_err();
        assert!(matches!(err, Error::DuplicateId { .. }));

        // The rejected insert must not have touched anything.
        assert_eq!(store.stats().total_documents, 1);
        assert_eq!(store.document_info("doc1").unwrap().content, "first");
    }

    #[test]
    fn test_remove_document() {
        let mut store = DocumentStore::new();
        store.add_document("python programming", Some("doc1")).unwrap();
        store.add_document("java programming", Some("doc2")).unwrap();

        assert!(store.remove_document("doc1"));
        assert!(!store.remove_document("doc1"));
        assert!(!store.remove_document("never-existed"));

        // doc1's words are gone from every structure; doc2 is untouched.
        assert!(store.search("python", 5).is_empty());
        let results = store.search("java", 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].doc_id, "doc2");

        let stats = store.stats();
        assert_eq!(stats.total_documents, 1);
        assert_eq!(stats.total_documents_in_index, 1);
    }

    #[test]
    fn test_remove_leaves_unrelated_postings_untouched() {
        let mut store = DocumentStore::new();
        store.add_document("rust ownership model", Some("keep")).unwrap();
        store.add_document("python scripting", Some("drop")).unwrap();

        let postings_before = store.trie.get_documents_for_word("ownership");
        let tf_before = store.forward.get_tf("keep", "ownership");
        store.remove_document("drop");

        assert_eq!(store.trie.get_documents_for_word("ownership"), postings_before);
        assert_eq!(store.forward.get_tf("keep", "ownership"), tf_before);

        let results = store.search("ownership", 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].doc_id, "keep");
    }

    #[test]
    fn test_search_empty_store() {
        let store = DocumentStore::new();
        assert!(store.search("anything", 5).is_empty());
        assert!(store.search_by_prefix("x", 5).is_empty());
        assert!(store.prefix_search("x").is_empty());

        let stats = store.stats();
        assert_eq!(stats.total_documents, 0);
        assert_eq!(stats.total_words, 0);
        assert_eq!(stats.total_documents_in_index, 0);
    }

    #[test]
    fn test_search_blank_query() {
        let mut store = DocumentStore::new();
        store.add_document("some content", Some("doc1")).unwrap();
        assert!(store.search("", 5).is_empty());
        assert!(store.search("! 1 2 ?", 5).is_empty());
    }

    #[test]
    fn test_tf_idf_ranking() {
        let mut store = DocumentStore::new();
        store.add_document("python python python", Some("doc1")).unwrap();
        store.add_document("python java", Some("doc2")).unwrap();

        let results = store.search("python", 5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].doc_id, "doc1");
        assert_eq!(results[1].doc_id, "doc2");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_tf_idf_monotonicity_for_equal_lengths() {
        let mut store = DocumentStore::new();
        // Equal lengths, the query term occurs more often in doc1.
        store.add_document("cache cache cache miss", Some("doc1")).unwrap();
        store.add_document("cache hit ratio report", Some("doc2")).unwrap();

        let results = store.search("cache", 5);
        assert_eq!(results[0].doc_id, "doc1");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_multi_term_scores_are_summed() {
        let mut store = DocumentStore::new();
        store.add_document("rust compiler", Some("doc1")).unwrap();
        store.add_document("rust runtime and compiler design", Some("doc2")).unwrap();

        let single = store.search("rust", 5);
        let combined = store.search("rust compiler", 5);
        let doc1_single = single.iter().find(|r| r.doc_id == "doc1").unwrap();
        let doc1_combined = combined.iter().find(|r| r.doc_id == "doc1").unwrap();
        assert!(doc1_combined.score > doc1_single.score);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut store = DocumentStore::new();
        store.add_document("Rust Programming", Some("doc1")).unwrap();
        assert_eq!(store.search("RUST", 5).len(), 1);
        assert_eq!(store.search("rust", 5).len(), 1);
    }

    #[test]
    fn test_top_k_truncation() {
        let mut store = DocumentStore::new();
        for i in 0..5 {
            store
                .add_document("shared term document", Some(&format!("doc{i}")))
                .unwrap();
        }

        assert_eq!(store.search("shared", 3).len(), 3);
        assert_eq!(store.search("shared", 10).len(), 5);
        assert!(store.search("shared", 0).is_empty());
    }

    #[test]
    fn test_search_by_prefix_scoring() {
        let mut store = DocumentStore::new();
        // doc1: 2 of 3 words match "prog"; doc2: 1 of 5.
        store.add_document("program programming guide", Some("doc1")).unwrap();
        store.add_document("one program among other words", Some("doc2")).unwrap();

        let results = store.search_by_prefix("prog", 5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].doc_id, "doc1");
        assert!((results[0].score - 2.0 / 3.0).abs() < 1e-9);

        assert!(store.search_by_prefix("  ", 5).is_empty());
        assert!(store.search_by_prefix("zzz", 5).is_empty());
    }

    #[test]
    fn test_smart_search_dispatch() {
        let mut store = DocumentStore::new();
        store.add_document("Python programming language", Some("doc1")).unwrap();

        let exact = store.smart_search("programming", 5);
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].doc_id, "doc1");

        let wildcard = store.smart_search("prog*", 5);
        assert_eq!(wildcard.len(), 1);
        assert_eq!(wildcard[0].doc_id, "doc1");

        assert!(store.smart_search("", 5).is_empty());
        assert!(store.smart_search("   ", 5).is_empty());
        // A bare wildcard has no stem to search.
        assert!(store.smart_search("*", 5).is_empty());
    }

    #[test]
    fn test_smart_search_escaped_asterisk_is_literal() {
        let mut store = DocumentStore::new();
        store.add_document("footnote marked with * symbol", Some("doc1")).unwrap();

        // An escaped trailing asterisk is a literal character, so this is
        // an exact search for "*", which tokenizes to nothing.
        assert!(store.smart_search("\\*", 5).is_empty());

        // An escaped asterisk mid-query must not disturb the real terms.
        let results = store.smart_search("footnote \\*", 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].doc_id, "doc1");
    }

    #[test]
    fn test_prefix_search_words() {
        let mut store = DocumentStore::new();
        store.add_document("program programming programmer", Some("doc1")).unwrap();

        let mut words = store.prefix_search("prog");
        words.sort();
        assert_eq!(words, vec!["program", "programmer", "programming"]);
    }

    #[test]
    fn test_document_info() {
        let mut store = DocumentStore::new();
        store.add_document("alpha beta alpha", Some("doc1")).unwrap();

        let info = store.document_info("doc1").unwrap();
        assert_eq!(info.doc_id, "doc1");
        assert_eq!(info.content, "alpha beta alpha");
        assert_eq!(info.total_words, 3);
        assert_eq!(info.unique_words, 2);
        assert_eq!(info.word_counts.get("alpha"), Some(&2));

        assert!(store.document_info("missing").is_none());
    }

    #[test]
    fn test_preview_short_content_unmodified() {
        let preview = content_preview("short text", &["short".to_string()], 200);
        assert_eq!(preview, "short text");
    }

    #[test]
    fn test_preview_windows_around_first_match() {
        let padding = "x".repeat(300);
        let content = format!("{padding} needle {padding}");
        let preview = content_preview(&content, &["needle".to_string()], 200);

        assert!(preview.starts_with("..."));
        assert!(preview.ends_with("..."));
        assert!(preview.contains("needle"));
        // 200-byte window plus both ellipses.
        assert_eq!(preview.len(), 206);
    }

    #[test]
    fn test_preview_without_match_starts_at_beginning() {
        let content = "y".repeat(300);
        let preview = content_preview(&content, &["absent".to_string()], 200);
        assert!(!preview.starts_with("..."));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.len(), 203);
    }

    #[test]
    fn test_preview_clamps_to_char_boundaries() {
        // Multi-byte content longer than the window must not panic.
        let content = "é".repeat(300);
        let preview = content_preview(&content, &["é".to_string()], 200);
        assert!(!preview.is_empty());
    }

    #[test]
    fn test_stores_are_isolated() {
        let mut a = DocumentStore::new();
        let mut b = DocumentStore::new();
        a.add_document("only in a", Some("doc1")).unwrap();
        b.add_document("only in b", Some("doc1")).unwrap();

        assert_eq!(a.document_info("doc1").unwrap().content, "only in a");
        assert_eq!(b.document_info("doc1").unwrap().content, "only in b");
    }
}

use std::collections::HashMap;

/// A single trie node. Children are exclusively owned by their parent, so
/// the whole tree is acyclic and drops without any back-pointer bookkeeping.
#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<char, TrieNode>,
    is_end_of_word: bool,
    /// Canonical lowercase word, set only when `is_end_of_word` is true.
    word: String,
    /// Per-document occurrence counts. Non-empty only at end-of-word nodes;
    /// this map is the sole authority for word -> document lookups.
    postings: HashMap<String, usize>,
}

impl TrieNode {
    fn new() -> Self {
        Self::default()
    }
}

/// Prefix tree over lowercase words with per-word document postings.
#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
}

impl Trie {
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
        }
    }

    /// Add a word to the trie. Re-inserting an existing word is a no-op
    /// beyond reassigning the terminal marker.
    pub fn insert(&mut self, word: &str) {
        let word = word.to_lowercase();
        let mut node = &mut self.root;

        for ch in word.chars() {
            node = node.children.entry(ch).or_insert_with(TrieNode::new);
        }

        node.is_end_of_word = true;
        node.word = word;
    }

    /// Attach or overwrite a document posting on a word's terminal node.
    /// Does nothing if the word was never inserted; callers must `insert`
    /// before attaching postings.
    pub fn add_document_to_word(&mut self, word: &str, doc_id: &str, count: usize) {
        let word = word.to_lowercase();
        if let Some(node) = self.find_node_mut(&word) {
            if node.is_end_of_word {
                node.postings.insert(doc_id.to_string(), count);
            }
        }
    }

    /// Remove one document posting from a word; returns whether a posting
    /// existed.
    pub fn remove_document_from_word(&mut self, word: &str, doc_id: &str) -> bool {
        let word = word.to_lowercase();
        if let Some(node) = self.find_node_mut(&word) {
            if node.is_end_of_word {
                return node.postings.remove(doc_id).is_some();
            }
        }
        false
    }

    /// All documents containing a word, with their occurrence counts.
    /// Always a copy, never a live view into the node.
    pub fn get_documents_for_word(&self, word: &str) -> HashMap<String, usize> {
        let word = word.to_lowercase();
        match self.find_node(&word) {
            Some(node) if node.is_end_of_word => node.postings.clone(),
            _ => HashMap::new(),
        }
    }

    /// Number of documents containing a word (document frequency for IDF).
    pub fn get_document_frequency(&self, word: &str) -> usize {
        let word = word.to_lowercase();
        match self.find_node(&word) {
            Some(node) if node.is_end_of_word => node.postings.len(),
            _ => 0,
        }
    }

    /// Exact-word lookup.
    pub fn search(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.find_node(&word)
            .map_or(false, |node| node.is_end_of_word)
    }

    /// All complete words starting with the given prefix. Order is
    /// unspecified; callers needing determinism must sort.
    pub fn starts_with(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        let mut words = Vec::new();
        if let Some(node) = self.find_node(&prefix) {
            collect_words(node, &mut words);
        }
        words
    }

    /// Per-document sum of occurrence counts over every complete word in
    /// the prefix subtree. A document is counted once per matching word it
    /// contains.
    pub fn get_documents_for_prefix(&self, prefix: &str) -> HashMap<String, usize> {
        let prefix = prefix.to_lowercase();
        let mut doc_counts = HashMap::new();
        if let Some(node) = self.find_node(&prefix) {
            collect_documents(node, &mut doc_counts);
        }
        doc_counts
    }

    /// Remove a word from the trie, but only if it has no postings left.
    /// Nodes left childless and unmarked are pruned, cascading upward.
    pub fn remove(&mut self, word: &str) -> bool {
        let word = word.to_lowercase();
        match self.find_node(&word) {
            Some(node) if node.is_end_of_word && node.postings.is_empty() => {}
            _ => return false,
        }

        if let Some(node) = self.find_node_mut(&word) {
            node.is_end_of_word = false;
            node.word.clear();
        }

        let chars: Vec<char> = word.chars().collect();
        if chars.is_empty() {
            return true;
        }

        // Find the deepest ancestor that must survive: a node marking
        // another word, or one branching to siblings, keeps everything up
        // to itself. The edge below it is where pruning starts.
        let mut cut = 0;
        {
            let mut node = &self.root;
            for (i, ch) in chars.iter().enumerate() {
                if i > 0 && (node.is_end_of_word || node.children.len() > 1) {
                    cut = i;
                }
                node = match node.children.get(ch) {
                    Some(child) => child,
                    None => return false,
                };
            }
            // Terminal still anchors longer words; nothing to prune.
            if !node.children.is_empty() {
                return true;
            }
        }

        let mut node = &mut self.root;
        for ch in &chars[..cut] {
            node = match node.children.get_mut(ch) {
                Some(child) => child,
                None => return true,
            };
        }
        node.children.remove(&chars[cut]);
        true
    }

    /// All words currently stored in the trie.
    pub fn get_all_words(&self) -> Vec<String> {
        let mut words = Vec::new();
        collect_words(&self.root, &mut words);
        words
    }

    /// Remove every word whose posting set is empty. Run after a document
    /// removal; cost scales with the total distinct word count.
    pub fn cleanup_empty_words(&mut self) {
        let mut words_to_remove = Vec::new();
        for word in self.get_all_words() {
            if let Some(node) = self.find_node(&word) {
                if node.postings.is_empty() {
                    words_to_remove.push(word);
                }
            }
        }

        for word in words_to_remove {
            self.remove(&word);
        }
    }

    fn find_node(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for ch in prefix.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }

    fn find_node_mut(&mut self, prefix: &str) -> Option<&mut TrieNode> {
        let mut node = &mut self.root;
        for ch in prefix.chars() {
            node = node.children.get_mut(&ch)?;
        }
        Some(node)
    }
}

/// Collect every complete word at or below `node`, with an explicit stack
/// so pathological word lengths cannot overflow the call stack.
fn collect_words(node: &TrieNode, words: &mut Vec<String>) {
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        if node.is_end_of_word && !node.word.is_empty() {
            words.push(node.word.clone());
        }
        stack.extend(node.children.values());
    }
}

fn collect_documents(node: &TrieNode, doc_counts: &mut HashMap<String, usize>) {
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        if node.is_end_of_word {
            for (doc_id, count) in &node.postings {
                *doc_counts.entry(doc_id.clone()).or_insert(0) += count;
            }
        }
        stack.extend(node.children.values());
    }
}

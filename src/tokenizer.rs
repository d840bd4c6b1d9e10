use std::collections::HashMap;

/// Splits text into maximal runs of ASCII letters, lowercased. Tokens of
/// length <= 1 are discarded. The same rules apply to documents and
/// queries so that query terms always line up with indexed words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.chars()
        .fold(vec![String::new()], |mut tokens, c| {
            if c.is_ascii_alphabetic() {
                if let Some(last) = tokens.last_mut() {
                    last.push(c.to_ascii_lowercase());
                }
            } else if tokens.last().map_or(false, |s| !s.is_empty()) {
                tokens.push(String::new());
            }
            tokens
        })
        .into_iter()
        .filter(|s| s.len() > 1)
        .collect()
}

/// Tokenizes text and aggregates duplicate tokens into occurrence counts.
pub fn token_counts(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

use docsearch::DocumentStore;

fn main() -> anyhow::Result<()> {
    println!("=== docsearch Basic Usage Example ===\n");

    let mut store = DocumentStore::new();

    // Insert some documents
    println!("Inserting documents...");

    store.add_document(
        "Rust is a systems programming language that runs blazingly fast, prevents segfaults, and guarantees thread safety.",
        Some("rust"),
    )?;
    store.add_document(
        "Go is an open source programming language that makes it easy to build simple, reliable, and efficient software.",
        Some("go"),
    )?;
    store.add_document(
        "Python is a programming language that lets you work quickly and integrate systems more effectively.",
        Some("python"),
    )?;

    println!("✓ Inserted 3 documents\n");

    // Example 1: TF-IDF search
    println!("--- Example 1: Search for 'programming language' ---");
    let results = store.search("programming language", 10);
    println!("Found {} documents", results.len());
    for (i, result) in results.iter().enumerate() {
        println!("\n{}. [Score: {:.4}] {}", i + 1, result.score, result.doc_id);
        println!("   Preview: {}", result.preview);
    }

    // Example 2: Prefix search with a trailing wildcard
    println!("\n\n--- Example 2: Smart search for 'prog*' ---");
    let results = store.smart_search("prog*", 10);
    println!("Found {} documents via prefix", results.len());
    for (i, result) in results.iter().enumerate() {
        println!("  {}. [Score: {:.4}] {}", i + 1, result.score, result.doc_id);
    }

    // Example 3: Word completion
    println!("\n\n--- Example 3: Words starting with 'pro' ---");
    let mut words = store.prefix_search("pro");
    words.sort();
    println!("{}", words.join(", "));

    // Example 4: Delete a document
    println!("\n\n--- Example 4: Delete a document ---");
    store.remove_document("go");
    println!("✓ Deleted document 'go'");
    let results = store.search("programming language", 10);
    println!("After deletion, found {} documents", results.len());

    // Example 5: Snapshot round-trip
    println!("\n\n--- Example 5: Save and reload ---");
    let dir = std::env::temp_dir();
    let path = dir.join("docsearch_demo.json");
    store.save(&path)?;
    let reloaded = DocumentStore::load(&path)?;
    println!(
        "Reloaded {} documents from {}",
        reloaded.stats().total_documents,
        path.display()
    );
    std::fs::remove_file(&path).ok();

    // Example 6: Statistics
    println!("\n\n--- Example 6: Store Statistics ---");
    let stats = store.stats();
    println!("Total documents: {}", stats.total_documents);
    println!("Distinct words: {}", stats.total_words);
    println!("Indexed documents: {}", stats.total_documents_in_index);

    println!("\n=== Example Complete ===");

    Ok(())
}

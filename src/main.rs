use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docsearch::{ingest, DocumentStore, Error, SearchResult};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Document store with TF-IDF and prefix search", long_about = None)]
struct Args {
    /// Snapshot file: loaded before the command, saved after mutations
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a document from a file, or every text file in a directory
    Add {
        path: PathBuf,

        /// Explicit document ID (single files only)
        #[arg(long)]
        doc_id: Option<String>,
    },
    /// Remove a document by ID
    Remove { doc_id: String },
    /// Search: exact terms, or prefix mode with a trailing `*`
    Search {
        query: String,

        #[arg(long, default_value_t = 10)]
        top_k: usize,
    },
    /// List indexed words starting with a prefix
    Prefix { prefix: String },
    /// Show store statistics
    Stats,
    /// Start an interactive session
    Repl,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut store = open_store(args.store.as_deref())?;

    match args.command {
        Command::Add { path, doc_id } => {
            if let Some(doc_id) = doc_id {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let id = store.add_document(&content, Some(&doc_id))?;
                println!("Document added with ID: {id}");
            } else {
                let ids = ingest::add_path(&mut store, &path)?;
                println!("Added {} document(s)", ids.len());
                for id in &ids {
                    println!("  - {id}");
                }
            }
            persist(&store, args.store.as_deref())?;
        }
        Command::Remove { doc_id } => {
            if !store.remove_document(&doc_id) {
                return Err(Error::NotFound { doc_id }.into());
            }
            println!("Document removed");
            persist(&store, args.store.as_deref())?;
        }
        Command::Search { query, top_k } => {
            print_results(&store.smart_search(&query, top_k));
        }
        Command::Prefix { prefix } => {
            let mut words = store.prefix_search(&prefix);
            words.sort();
            for word in &words {
                println!("{word}");
            }
        }
        Command::Stats => print_stats(&store),
        Command::Repl => run_repl(&mut store, args.store.as_deref())?,
    }

    Ok(())
}

/// Load the snapshot if one was named and exists; otherwise start empty.
fn open_store(path: Option<&Path>) -> Result<DocumentStore> {
    match path {
        Some(path) if path.exists() => Ok(DocumentStore::load(path)?),
        _ => Ok(DocumentStore::new()),
    }
}

fn persist(store: &DocumentStore, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        store.save(path)?;
    }
    Ok(())
}

fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("No results");
        return;
    }
    for (i, result) in results.iter().enumerate() {
        println!("{}. {} (score: {:.4})", i + 1, result.doc_id, result.score);
        println!("   {}", result.preview);
    }
}

fn print_stats(store: &DocumentStore) {
    let stats = store.stats();
    println!("Documents: {}", stats.total_documents);
    println!("Distinct words: {}", stats.total_words);
    println!("Indexed documents: {}", stats.total_documents_in_index);
}

fn run_repl(store: &mut DocumentStore, store_path: Option<&Path>) -> Result<()> {
    let mut lines = io::stdin().lock().lines();

    println!("docsearch REPL - type 'help' for commands. Data is in-memory unless saved.");

    loop {
        print!("docsearch> ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let rest: Vec<&str> = parts.collect();

        match command {
            "exit" | "quit" | "q" => break,

            "help" | "h" | "?" => print_repl_help(),

            "add" => match rest.first() {
                Some(&path) => match ingest::add_path(store, path) {
                    Ok(ids) => {
                        println!("Added {} document(s)", ids.len());
                        for id in &ids {
                            println!("  - {id}");
                        }
                    }
                    Err(err) => println!("Error: {err}"),
                },
                None => println!("Usage: add <path>"),
            },

            "addtext" => {
                println!("Paste text, end with a blank line:");
                let mut content = String::new();
                for text_line in lines.by_ref() {
                    let text_line = text_line?;
                    if text_line.trim().is_empty() {
                        break;
                    }
                    content.push_str(&text_line);
                    content.push('\n');
                }
                if content.trim().is_empty() {
                    println!("No text entered");
                } else {
                    match store.add_document(&content, None) {
                        Ok(id) => println!("Document added with ID: {id}"),
                        Err(err) => println!("Error: {err}"),
                    }
                }
            }

            "delete" => match rest.first() {
                Some(&doc_id) => {
                    if store.remove_document(doc_id) {
                        println!("Document removed");
                    } else {
                        println!("No document with ID {doc_id}");
                    }
                }
                None => println!("Usage: delete <doc_id>"),
            },

            "search" => {
                if rest.is_empty() {
                    println!("Usage: search <query>");
                } else {
                    let query = rest.join(" ");
                    print_results(&store.smart_search(&query, 10));
                }
            }

            "prefix" => match rest.first() {
                Some(&prefix) => {
                    let mut words = store.prefix_search(prefix);
                    words.sort();
                    if words.is_empty() {
                        println!("No words with prefix {prefix}");
                    }
                    for word in &words {
                        println!("{word}");
                    }
                }
                None => println!("Usage: prefix <prefix>"),
            },

            "stats" => print_stats(store),

            "list" => {
                let mut ids = store.document_ids();
                ids.sort();
                for id in &ids {
                    println!("{id}");
                }
            }

            "save" => match rest.first().map(|s| Path::new(*s)).or(store_path) {
                Some(path) => match store.save(path) {
                    Ok(()) => println!("Saved to {}", path.display()),
                    Err(err) => println!("Error: {err}"),
                },
                None => println!("Usage: save <path>"),
            },

            _ => println!("Unknown command. Type 'help' for a list of commands."),
        }
    }

    println!("Exiting REPL.");
    Ok(())
}

fn print_repl_help() {
    println!(
        "
Commands:
  add <path>        Add a document from a file or all text files from a directory
  addtext           Add a document by pasting text (end with a blank line)
  delete <doc_id>   Delete a document by ID
  search <query>    Smart search (exact terms, trailing * for prefix)
  prefix <prefix>   List words starting with prefix
  stats             Show store statistics
  list              List all document IDs
  save [path]       Save a snapshot
  help              Show this help message
  exit/quit/q       Exit the REPL"
    );
}

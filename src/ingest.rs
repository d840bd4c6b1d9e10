use crate::store::DocumentStore;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Extensions accepted when ingesting a directory. Files outside this list
/// are silently ignored.
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "py", "js", "html", "css", "json", "xml", "csv", "tsv", "log", "rst",
    "tex", "adoc", "org", "rs",
];

/// Ingest a single file, or every indexable file under a directory. File
/// documents use their path as document ID. Returns the IDs that were
/// added. Inside a directory batch a single file's failure is logged and
/// skipped; files already committed stay committed.
pub fn add_path(store: &mut DocumentStore, path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path).map_err(|e| Error::io(path, e))?;

    if metadata.is_dir() {
        add_directory(store, path)
    } else {
        let doc_id = add_single_file(store, path)?;
        Ok(vec![doc_id])
    }
}

fn add_single_file(store: &mut DocumentStore, path: &Path) -> Result<String> {
    let content = read_file_content(path)?;
    let doc_id = path.to_string_lossy();
    store.add_document(&content, Some(&doc_id))
}

/// Read a file as UTF-8, replacing invalid sequences rather than failing.
fn read_file_content(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn is_indexable(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| TEXT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn add_directory(store: &mut DocumentStore, dir: &Path) -> Result<Vec<String>> {
    let mut added = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries: Vec<PathBuf> = std::fs::read_dir(&dir)
            .map_err(|e| Error::io(&dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        entries.sort();

        for entry in entries {
            if entry.is_dir() {
                pending.push(entry);
            } else if is_indexable(&entry) {
                match add_single_file(store, &entry) {
                    Ok(doc_id) => added.push(doc_id),
                    Err(err) => warn!(path = %entry.display(), error = %err, "skipping file"),
                }
            }
        }
    }

    Ok(added)
}

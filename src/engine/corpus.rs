use std::{
    fs, io,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::{
    config::DEFAULT_CORPUS_EXTENSION,
    error::{Error, Result},
};

/// Supplies the raw corpus: document id -> text.
pub trait CorpusSource {
    fn load_corpus(&self) -> Result<IndexMap<String, String>>;
}

impl CorpusSource for IndexMap<String, String> {
    fn load_corpus(&self) -> Result<IndexMap<String, String>> {
        Ok(self.clone())
    }
}

/// Text files under a directory tree, identified by file name.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    root: PathBuf,
    extension: String,
}

impl DirectoryCorpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_CORPUS_EXTENSION.to_string(),
        }
    }

    /// Only files with this extension (no dot, case-insensitive) are read.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// document id -> path, walking the tree in sorted path order.
    /// When two files share a name the first one wins.
    pub fn document_paths(&self) -> Result<IndexMap<String, PathBuf>> {
        if !self.root.is_dir() {
            return Err(Error::CorpusNotFound { path: self.root.clone() });
        }
        let mut files = Vec::new();
        collect_files(&self.root, &self.extension, &mut files)
            .map_err(|e| Error::io(&self.root, e))?;

        let mut paths: IndexMap<String, PathBuf> = IndexMap::with_capacity(files.len());
        for path in files {
            let Some(id) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if let Some(first) = paths.get(&id) {
                warn!(
                    id = %id,
                    kept = %first.display(),
                    ignored = %path.display(),
                    "duplicate document name in corpus"
                );
                continue;
            }
            paths.insert(id, path);
        }
        Ok(paths)
    }

    /// Path of the document called `id`, if it is in the corpus.
    pub fn locate(&self, id: &str) -> Option<PathBuf> {
        self.document_paths().ok()?.shift_remove(id)
    }
}

impl CorpusSource for DirectoryCorpus {
    /// Unreadable files are skipped with a warning.
    fn load_corpus(&self) -> Result<IndexMap<String, String>> {
        let paths = self.document_paths()?;
        let mut docs = IndexMap::with_capacity(paths.len());
        for (id, path) in paths {
            match fs::read_to_string(&path) {
                Ok(text) => {
                    docs.insert(id, text);
                }
                Err(err) => warn!(path = %path.display(), %err, "could not read corpus file"),
            }
        }
        debug!(root = %self.root.display(), documents = docs.len(), "loaded corpus");
        Ok(docs)
    }
}

fn collect_files(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();
    for path in entries {
        if path.is_dir() {
            if let Err(err) = collect_files(&path, extension, out) {
                warn!(path = %path.display(), %err, "could not read corpus directory");
            }
        } else if path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Leading `max_chars` characters of a file, with `...` appended when cut.
pub fn preview(path: &Path, max_chars: usize) -> io::Result<String> {
    let text = fs::read_to_string(path)?;
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Ok(format!("{}...", &text[..cut])),
        None => Ok(text),
    }
}

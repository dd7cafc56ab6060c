use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, trace, warn};

use crate::document;
use crate::error::{TmulError, TmulResult};
use crate::node::Node;
use crate::parser::decode_file;

/// File name of the document shown first.
pub const ENTRY_DOCUMENT: &str = "index.xml";

/// Renderable documents of one directory, keyed by file name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSet {
    documents: BTreeMap<String, Node>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, root: Node) {
        self.documents.insert(name.into(), root);
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.documents.get(name)
    }

    /// File names of the loaded documents, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The `index.xml` document.
    pub fn entry(&self) -> TmulResult<&Node> {
        self.get(ENTRY_DOCUMENT)
            .ok_or_else(|| TmulError::MissingEntryDocument {
                name: ENTRY_DOCUMENT.to_string(),
            })
    }
}

/// Load every renderable document in `dir`.
///
/// Subdirectories are skipped. Files that fail to decode are logged and
/// skipped, as are documents without the `tmul-1.0v` type marker. Only a
/// failure to read the directory itself is an error.
pub fn load_dir(dir: impl AsRef<Path>) -> TmulResult<DocumentSet> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut set = DocumentSet::new();
    for path in paths {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!(path = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };

        let root = match decode_file(&path) {
            Ok(root) => root,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to decode document");
                continue;
            }
        };

        if let Err(err) = document::validate(&root) {
            debug!(file = name, reason = %err, "skipping document");
            continue;
        }

        debug!(file = name, "loaded document");
        trace!(file = name, "\n{}", root);
        set.insert(name, root);
    }

    Ok(set)
}

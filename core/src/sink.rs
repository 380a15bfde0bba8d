//! Document sinks: where exported documents are written

use crate::errors::{SinkError, SinkResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Identity of an exported document; fully determines its location in the tree
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentPath {
    Type(String),
    List(String),
    View(String),
    Field(String),
    Entity { type_id: String, subject_id: String },
}

/// Directory and file naming for the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLayout {
    /// Directory under the collection root holding type/list/view/field documents
    pub metadata_dir: String,
    /// File extension of every document
    pub extension: String,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            metadata_dir: "_collection".to_string(),
            extension: "jsonld".to_string(),
        }
    }
}

impl TreeLayout {
    /// Path of `document` relative to the collection root
    pub fn relative_path(&self, document: &DocumentPath) -> SinkResult<PathBuf> {
        let (dirs, file): (Vec<&str>, &str) = match document {
            DocumentPath::Type(id) => (vec![self.metadata_dir.as_str(), "types", id.as_str()], "type_meta"),
            DocumentPath::List(id) => (vec![self.metadata_dir.as_str(), "lists", id.as_str()], "list_meta"),
            DocumentPath::View(id) => (vec![self.metadata_dir.as_str(), "views", id.as_str()], "view_meta"),
            DocumentPath::Field(id) => (vec![self.metadata_dir.as_str(), "fields", id.as_str()], "field_meta"),
            DocumentPath::Entity {
                type_id,
                subject_id,
            } => (vec!["d", type_id.as_str(), subject_id.as_str()], "entity-data"),
        };
        let mut path = PathBuf::new();
        for segment in dirs {
            check_segment(segment)?;
            path.push(segment);
        }
        path.push(format!("{}.{}", file, self.extension));
        Ok(path)
    }
}

fn check_segment(segment: &str) -> SinkResult<()> {
    let invalid = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', '\0']);
    if invalid {
        return Err(SinkError::InvalidSegment(segment.to_string()));
    }
    Ok(())
}

/// Serialized form of a document: two-space indented JSON with a trailing newline
pub fn render_document(document: &Value) -> SinkResult<String> {
    let mut text = serde_json::to_string_pretty(document)
        .map_err(|e| SinkError::Serialization(e.to_string()))?;
    text.push('\n');
    Ok(text)
}

/// Destination for exported documents
pub trait DocumentSink {
    /// Write `document` at `path`, replacing any existing document there
    fn write(&mut self, path: &DocumentPath, document: &Value) -> SinkResult<()>;
}

/// Writes documents below a collection root directory
#[derive(Debug, Clone)]
pub struct FsDocumentSink {
    root: PathBuf,
    layout: TreeLayout,
}

impl FsDocumentSink {
    pub fn new(root: impl Into<PathBuf>, layout: TreeLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    /// Absolute location of `document`
    pub fn resolve(&self, document: &DocumentPath) -> SinkResult<PathBuf> {
        Ok(self.root.join(self.layout.relative_path(document)?))
    }
}

/// Create `dir` and any missing ancestors; succeeds if it already exists
pub fn ensure_dir(dir: &Path) -> SinkResult<()> {
    fs::create_dir_all(dir).map_err(|e| io_error(dir, e))
}

fn io_error(path: &Path, e: std::io::Error) -> SinkError {
    SinkError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

fn write_staged(staging: &Path, target: &Path, data: &[u8]) -> SinkResult<()> {
    let mut file = fs::File::create(staging).map_err(|e| io_error(staging, e))?;
    file.write_all(data).map_err(|e| io_error(staging, e))?;
    file.sync_all().map_err(|e| io_error(staging, e))?;
    fs::rename(staging, target).map_err(|e| io_error(target, e))
}

impl DocumentSink for FsDocumentSink {
    fn write(&mut self, path: &DocumentPath, document: &Value) -> SinkResult<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }
        let text = render_document(document)?;

        // Readers never see a half-written document under the final name
        let staging = target.with_extension("tmp");
        if let Err(e) = write_staged(&staging, &target, text.as_bytes()) {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }

        debug!("Wrote {}", target.display());
        Ok(())
    }
}

/// Keeps rendered documents in memory, keyed by relative path
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    layout: TreeLayout,
    documents: BTreeMap<PathBuf, String>,
    writes: usize,
}

impl MemorySink {
    pub fn new(layout: TreeLayout) -> Self {
        Self {
            layout,
            documents: BTreeMap::new(),
            writes: 0,
        }
    }

    /// Rendered documents by relative path, in path order
    pub fn documents(&self) -> &BTreeMap<PathBuf, String> {
        &self.documents
    }

    /// Rendered document at `path`, if written
    pub fn get(&self, path: &DocumentPath) -> Option<&str> {
        let relative = self.layout.relative_path(path).ok()?;
        self.documents.get(&relative).map(String::as_str)
    }

    /// Parsed document at `path`, if written
    pub fn get_json(&self, path: &DocumentPath) -> Option<Value> {
        self.get(path).and_then(|text| serde_json::from_str(text).ok())
    }

    /// Number of write calls, including overwrites
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl DocumentSink for MemorySink {
    fn write(&mut self, path: &DocumentPath, document: &Value) -> SinkResult<()> {
        let relative = self.layout.relative_path(path)?;
        let text = render_document(document)?;
        self.documents.insert(relative, text);
        self.writes += 1;
        Ok(())
    }
}

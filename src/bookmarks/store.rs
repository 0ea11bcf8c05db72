//! The host bookmark system: where trees come from and where deletes go.
//!
//! `JsonFileStore` keeps a WebExtension-shaped bookmark tree in a JSON file.
//! Writes go through a temp file in the same directory and are then persisted
//! over the original, so a crash never leaves a half-written store.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::bookmarks::tree::{BookmarkNode, NodeType};
use crate::error::{AppError, Result};

/// URL schemes `open_url` will hand to a browser.
pub const OPENABLE_SCHEMES: &[&str] = &["http", "https", "file", "ftp"];

/// Operations the triage core needs from the bookmark host.
#[async_trait]
pub trait BookmarkHost: Send + Sync {
    /// Fetch the full bookmark tree, root first.
    async fn get_bookmark_tree(&self) -> Result<BookmarkNode>;

    /// Delete the bookmark (or separator) with `id` from the host.
    async fn remove_bookmark(&self, id: &str) -> Result<()>;

    /// Show `url` to the user in a browser.
    async fn open_url(&self, url: &str) -> Result<()>;
}

/// On-disk layout: a single root node, or the array `getTree()` returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum StoreDocument {
    Root(BookmarkNode),
    Forest(Vec<BookmarkNode>),
}

impl StoreDocument {
    fn root_mut(&mut self) -> Option<&mut BookmarkNode> {
        match self {
            StoreDocument::Root(root) => Some(root),
            StoreDocument::Forest(roots) => roots.first_mut(),
        }
    }

    fn into_root(self) -> Option<BookmarkNode> {
        match self {
            StoreDocument::Root(root) => Some(root),
            StoreDocument::Forest(roots) => roots.into_iter().next(),
        }
    }
}

/// Modification time of the store as last written by this process.
///
/// Shared with the watcher so it can tell our own writes from outside edits.
#[derive(Debug, Clone, Default)]
pub struct WriteStamp(Arc<Mutex<Option<SystemTime>>>);

impl WriteStamp {
    /// Remember the current modification time of `path`.
    pub fn record(&self, path: &Path) {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        if let Ok(mut stamp) = self.0.lock() {
            *stamp = modified;
        }
    }

    /// Whether `path` is still exactly as this process last wrote it.
    pub fn is_own_write(&self, path: &Path) -> bool {
        let current = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        match (self.0.lock(), current) {
            (Ok(stamp), Some(current)) => *stamp == Some(current),
            _ => false,
        }
    }
}

/// Bookmark host backed by a JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    stamp: WriteStamp,
}

impl JsonFileStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            stamp: WriteStamp::default(),
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Handle the watcher uses to skip change events caused by our writes.
    pub fn write_stamp(&self) -> WriteStamp {
        self.stamp.clone()
    }

    async fn read_document(&self) -> Result<StoreDocument> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_document(&self, document: &StoreDocument) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, document)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| AppError::Io(e.error))?;
        self.stamp.record(&self.path);
        Ok(())
    }
}

#[async_trait]
impl BookmarkHost for JsonFileStore {
    async fn get_bookmark_tree(&self) -> Result<BookmarkNode> {
        let root = self
            .read_document()
            .await?
            .into_root()
            .ok_or_else(|| AppError::InvalidPath(format!("{} has no bookmark tree", self.path.display())))?;
        tracing::debug!(path = %self.path.display(), "read bookmark tree");
        Ok(root)
    }

    async fn remove_bookmark(&self, id: &str) -> Result<()> {
        let mut document = self.read_document().await?;
        let root = document
            .root_mut()
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        match root.find(id).map(BookmarkNode::node_type) {
            None => return Err(AppError::NotFound(id.to_string())),
            Some(NodeType::Folder) => {
                return Err(AppError::InvalidPath(format!(
                    "refusing to remove folder {}",
                    id
                )))
            }
            Some(_) => {}
        }
        if root.remove_descendant(id).is_none() {
            // Only the root itself matched
            return Err(AppError::NotFound(id.to_string()));
        }

        self.write_document(&document)?;
        tracing::info!(id, path = %self.path.display(), "removed bookmark from store");
        Ok(())
    }

    async fn open_url(&self, url: &str) -> Result<()> {
        check_openable(url)?;
        webbrowser::open(url).map_err(|e| AppError::Browser(e.to_string()))?;
        tracing::info!(url, "opened in browser");
        Ok(())
    }
}

/// Reject URLs a browser should not be asked to open (`javascript:`, `place:`, ...).
pub fn check_openable(url: &str) -> Result<()> {
    let scheme = url
        .split_once(':')
        .map(|(scheme, _)| scheme.to_ascii_lowercase())
        .unwrap_or_default();
    if OPENABLE_SCHEMES.contains(&scheme.as_str()) {
        Ok(())
    } else {
        Err(AppError::Browser(format!("unsupported URL: {}", url)))
    }
}

/// In-memory host for tests; records removals and opened URLs.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryHost {
    pub tree: Mutex<Option<BookmarkNode>>,
    pub removed: Mutex<Vec<String>>,
    pub opened: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemoryHost {
    pub fn new(tree: BookmarkNode) -> Self {
        Self {
            tree: Mutex::new(Some(tree)),
            ..Default::default()
        }
    }
}

#[cfg(test)]
#[async_trait]
impl BookmarkHost for MemoryHost {
    async fn get_bookmark_tree(&self) -> Result<BookmarkNode> {
        self.tree
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::InvalidPath("no tree".into()))
    }

    async fn remove_bookmark(&self, id: &str) -> Result<()> {
        let mut tree = self.tree.lock().unwrap();
        let root = tree.as_mut().ok_or_else(|| AppError::NotFound(id.into()))?;
        root.remove_descendant(id)
            .ok_or_else(|| AppError::NotFound(id.into()))?;
        self.removed.lock().unwrap().push(id.to_string());
        Ok(())
    }

    async fn open_url(&self, url: &str) -> Result<()> {
        check_openable(url)?;
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};

/// Type of bookmark tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Bookmark,
    Folder,
    Separator,
}

/// A node in the host's bookmark tree, in the shape `bookmarks.getTree()` returns.
///
/// Fields this crate does not interpret (`dateAdded`, `parentId`, `index`, ...)
/// are carried in `extra` so a rewritten store keeps them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkNode {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Accept both `"42"` and `42` as identifiers; Firefox backups use numbers.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

impl BookmarkNode {
    /// The node's type, inferred from `url` when the host omits `type`.
    pub fn node_type(&self) -> NodeType {
        match self.kind {
            Some(kind) => kind,
            None if self.url.is_some() => NodeType::Bookmark,
            None => NodeType::Folder,
        }
    }

    /// Title, or the empty string for untitled nodes.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Child nodes in order; empty for leaves.
    pub fn children(&self) -> &[BookmarkNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// A node with no children (or an empty child list) is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Remove the descendant with `id`, returning it.
    ///
    /// The node itself is never removed, only its descendants.
    pub fn remove_descendant(&mut self, id: &str) -> Option<BookmarkNode> {
        let children = self.children.as_mut()?;
        if let Some(pos) = children.iter().position(|c| c.id == id) {
            return Some(children.remove(pos));
        }
        children
            .iter_mut()
            .find_map(|child| child.remove_descendant(id))
    }

    /// Find a node by identifier anywhere in this subtree.
    pub fn find(&self, id: &str) -> Option<&BookmarkNode> {
        if self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }
}

#[cfg(test)]
impl BookmarkNode {
    pub fn folder(id: &str, title: &str, children: Vec<BookmarkNode>) -> Self {
        Self {
            id: id.to_string(),
            title: Some(title.to_string()),
            kind: Some(NodeType::Folder),
            url: None,
            children: Some(children),
            extra: serde_json::Map::new(),
        }
    }

    pub fn bookmark(id: &str, title: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            title: Some(title.to_string()),
            kind: Some(NodeType::Bookmark),
            url: Some(url.to_string()),
            children: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn separator(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: None,
            kind: Some(NodeType::Separator),
            url: None,
            children: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Folder path of every leaf, keyed by identifier.
///
/// A path lists ancestor titles from just below the root down to, but not
/// including, the leaf itself. Untitled folders contribute nothing.
pub type PathIndex = HashMap<String, Vec<String>>;

/// A flattened, display-ready bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatBookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    pub path: Vec<String>,
}

/// Build the path index for every leaf under `root`.
pub fn build_path_index(root: &BookmarkNode) -> PathIndex {
    let mut index = PathIndex::new();
    let mut path = Vec::new();
    index_node(root, &mut path, &mut index, true);
    index
}

fn index_node(node: &BookmarkNode, path: &mut Vec<String>, index: &mut PathIndex, is_root: bool) {
    let pushed = !is_root && !node.title().is_empty();
    if pushed {
        path.push(node.title().to_string());
    }

    if node.is_leaf() {
        let ancestors = if pushed {
            &path[..path.len() - 1]
        } else {
            &path[..]
        };
        // First occurrence wins, matching what collect_all emits
        index
            .entry(node.id.clone())
            .or_insert_with(|| ancestors.to_vec());
    } else {
        for child in node.children() {
            index_node(child, path, index, false);
        }
    }

    if pushed {
        path.pop();
    }
}

/// Flatten `root` into its bookmarks in depth-first order, with folder paths.
///
/// Folders and separators are never emitted. A repeated identifier keeps its
/// first occurrence only.
pub fn collect_all(root: &BookmarkNode) -> (Vec<FlatBookmark>, PathIndex) {
    let index = build_path_index(root);
    let mut items = Vec::new();
    let mut seen = HashSet::new();
    emit_bookmarks(root, &index, &mut seen, &mut items);
    (items, index)
}

fn emit_bookmarks(
    node: &BookmarkNode,
    index: &PathIndex,
    seen: &mut HashSet<String>,
    items: &mut Vec<FlatBookmark>,
) {
    if node.node_type() == NodeType::Bookmark {
        if seen.insert(node.id.clone()) {
            items.push(FlatBookmark {
                id: node.id.clone(),
                title: node.title().to_string(),
                url: node.url.clone().unwrap_or_default(),
                path: index.get(&node.id).cloned().unwrap_or_default(),
            });
        } else {
            tracing::debug!(id = %node.id, "skipping duplicate bookmark id");
        }
    }
    for child in node.children() {
        emit_bookmarks(child, index, seen, items);
    }
}

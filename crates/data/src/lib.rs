mod error;
mod firefox;

pub use error::{BookmarkError, Result};

use islands_layout::{DirectedGraph, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A bookmark folder, an interior node of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: NodeId,
    /// Enclosing folder. The root folder is its own parent.
    pub parent: NodeId,
    pub title: String,
}

/// A bookmarked page, a leaf of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: NodeId,
    pub parent: NodeId,
    pub title: String,
    pub uri: String,
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Folder {} (parent: {})", self.title, self.parent)
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bookmark {}: {} (parent: {})",
            self.title, self.uri, self.parent
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Bookmark,
}

/// Folders and bookmarks indexed by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bookmarks {
    folders: BTreeMap<NodeId, Folder>,
    bookmarks: BTreeMap<NodeId, Bookmark>,
}

impl Bookmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a folder. Returns false, and keeps the known entry, if the id is taken.
    pub fn insert_folder(&mut self, folder: Folder) -> bool {
        if self.contains(folder.id) {
            return false;
        }
        self.folders.insert(folder.id, folder);
        true
    }

    /// Add a bookmark. Returns false, and keeps the known entry, if the id is taken.
    pub fn insert_bookmark(&mut self, bookmark: Bookmark) -> bool {
        if self.contains(bookmark.id) {
            return false;
        }
        self.bookmarks.insert(bookmark.id, bookmark);
        true
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.folders.contains_key(&id) || self.bookmarks.contains_key(&id)
    }

    pub fn folder(&self, id: NodeId) -> Option<&Folder> {
        self.folders.get(&id)
    }

    pub fn bookmark(&self, id: NodeId) -> Option<&Bookmark> {
        self.bookmarks.get(&id)
    }

    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.folders.values()
    }

    pub fn bookmarks(&self) -> impl Iterator<Item = &Bookmark> {
        self.bookmarks.values()
    }

    pub fn len(&self) -> usize {
        self.folders.len() + self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.bookmarks.is_empty()
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        if self.folders.contains_key(&id) {
            Some(NodeKind::Folder)
        } else if self.bookmarks.contains_key(&id) {
            Some(NodeKind::Bookmark)
        } else {
            None
        }
    }

    pub fn title(&self, id: NodeId) -> Option<&str> {
        self.folder(id)
            .map(|f| f.title.as_str())
            .or_else(|| self.bookmark(id).map(|b| b.title.as_str()))
    }

    /// `(node, parent)` pairs, folders first then bookmarks
    pub fn links(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.folders
            .values()
            .map(|f| (f.id, f.parent))
            .chain(self.bookmarks.values().map(|b| (b.id, b.parent)))
    }

    /// Add one `parent -> node` edge per entry to `graph`
    pub fn fill_graph(&self, graph: &mut DirectedGraph) {
        graph.extend(self.links().map(|(node, parent)| (parent, node)));
    }

    pub fn to_graph(&self) -> DirectedGraph {
        let mut graph = DirectedGraph::new();
        self.fill_graph(&mut graph);
        graph
    }

    /// URLs reached from `id`: the bookmark's own URL, or the URLs of every
    /// bookmark below a folder, in graph order.
    ///
    /// Each node is visited once, so cycles in `graph` are harmless.
    pub fn urls_under(&self, graph: &DirectedGraph, id: NodeId) -> Vec<&str> {
        let mut urls = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![id];

        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            let children = graph.neighbors(node);
            if children.is_empty() {
                if let Some(bookmark) = self.bookmark(node) {
                    urls.push(bookmark.uri.as_str());
                }
            } else {
                stack.extend(children.iter().rev());
            }
        }

        urls
    }
}

//! Firefox bookmark backups
//!
//! A backup is one JSON tree: containers carry `children`, pages carry a
//! `uri`, anything else (separators) is ignored.

use crate::{Bookmark, BookmarkError, Bookmarks, Folder, Result};
use islands_layout::NodeId;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, trace, warn};

const CONTAINER_TYPE: &str = "text/x-moz-place-container";

#[derive(Debug, Deserialize)]
struct Entry {
    id: NodeId,
    #[serde(default)]
    title: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    children: Option<Vec<Entry>>,
}

impl Entry {
    fn is_folder(&self) -> bool {
        self.children.is_some() || self.kind.as_deref() == Some(CONTAINER_TYPE)
    }
}

impl Bookmarks {
    /// Parse a Firefox JSON backup
    pub fn from_firefox_json(json: &str) -> Result<Self> {
        let root: Entry = serde_json::from_str(json)?;
        Ok(Self::from_entry(root))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let root: Entry = serde_json::from_reader(reader)?;
        Ok(Self::from_entry(root))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BookmarkError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loading bookmarks from {}", path.display());
        Self::from_reader(BufReader::new(file))
    }

    fn from_entry(root: Entry) -> Self {
        let mut bookmarks = Bookmarks::new();
        // The root is its own parent
        let mut pending = vec![(root.id, root)];

        while let Some((parent, entry)) = pending.pop() {
            let is_folder = entry.is_folder();
            let Entry {
                id,
                title,
                uri,
                children,
                ..
            } = entry;

            if is_folder {
                if !bookmarks.insert_folder(Folder { id, parent, title }) {
                    warn!(id, "Skipping a folder with a duplicate id");
                    continue;
                }
                let children = children.unwrap_or_default();
                pending.extend(children.into_iter().rev().map(|child| (id, child)));
            } else if let Some(uri) = uri {
                if !bookmarks.insert_bookmark(Bookmark {
                    id,
                    parent,
                    title,
                    uri,
                }) {
                    warn!(id, "Skipping a bookmark with a duplicate id");
                }
            } else {
                trace!(id, "Skipping an entry without children or uri");
            }
        }

        debug!(
            folders = bookmarks.folders.len(),
            bookmarks = bookmarks.bookmarks.len(),
            "Bookmarks loaded"
        );
        bookmarks
    }
}

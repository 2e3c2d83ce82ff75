use std::time::SystemTime;

use serde::Deserialize;

use super::model::BookmarkNode;
use crate::error::{AppError, Result};

/// Parent folder used when a bookmark is created without one (bookmarks bar).
pub const DEFAULT_PARENT_ID: &str = "1";

/// Fields for a bookmark about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookmark {
    pub parent_id: String,
    pub title: String,
    pub url: String,
}

/// One entry of the host's most-visited ranking.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TopSite {
    #[serde(default)]
    pub title: String,
    pub url: String,
}

/// The host-owned bookmark store.
///
/// Every mutation is reported back as a `Result`; the caller decides how to
/// surface the host's message and when to reload.
pub trait BookmarkHost {
    /// The full hierarchy. The first element is the synthetic root whose
    /// children are the permanent folders.
    fn get_tree(&self) -> Result<Vec<BookmarkNode>>;

    /// A single folder (or bookmark) and everything below it.
    fn get_sub_tree(&self, id: &str) -> Result<Vec<BookmarkNode>> {
        let tree = self.get_tree()?;
        tree.iter()
            .find_map(|root| root.find(id))
            .map(|node| vec![node.clone()])
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    fn create(&mut self, bookmark: NewBookmark) -> Result<BookmarkNode>;

    fn update(&mut self, id: &str, title: &str, url: &str) -> Result<()>;

    fn remove(&mut self, id: &str) -> Result<()>;

    /// Ranked most-visited sites.
    fn top_sites(&self) -> Result<Vec<TopSite>>;

    /// Opaque marker that changes whenever the backing store changes.
    /// `None` when the host can't tell.
    fn revision(&self) -> Option<SystemTime> {
        None
    }
}

/// Whether `id` names one of the permanent root folders the host refuses to
/// modify.
pub fn is_permanent(id: &str) -> bool {
    matches!(id, "0" | "1" | "2" | "3")
}

#[cfg(test)]
pub mod memory {
    //! In-memory host used by controller tests.

    use std::cell::Cell;

    use super::*;

    #[derive(Debug, Default)]
    pub struct MemoryHost {
        pub tree: Vec<BookmarkNode>,
        pub top: Vec<TopSite>,
        pub next_id: u64,
        pub fail_with: Option<String>,
        /// Makes `get_tree` fail, simulating an unreadable store.
        pub fail_tree: bool,
        /// Makes `get_sub_tree` fail while `get_tree` still works.
        pub fail_sub_tree: bool,
        pub tree_calls: Cell<usize>,
        pub mutation_calls: usize,
    }

    impl MemoryHost {
        pub fn new(tree: Vec<BookmarkNode>) -> Self {
            Self {
                tree,
                next_id: 1000,
                ..Default::default()
            }
        }

        fn check_failure(&mut self) -> Result<()> {
            self.mutation_calls += 1;
            match &self.fail_with {
                Some(message) => Err(AppError::Host(message.clone())),
                None => Ok(()),
            }
        }
    }

    fn find_mut<'a>(nodes: &'a mut [BookmarkNode], id: &str) -> Option<&'a mut BookmarkNode> {
        for node in nodes.iter_mut() {
            if node.id == id {
                return Some(node);
            }
            if let Some(children) = node.children.as_mut() {
                if let Some(found) = find_mut(children, id) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn remove_from(nodes: &mut Vec<BookmarkNode>, id: &str) -> bool {
        if let Some(pos) = nodes.iter().position(|n| n.id == id) {
            nodes.remove(pos);
            return true;
        }
        nodes
            .iter_mut()
            .filter_map(|n| n.children.as_mut())
            .any(|children| remove_from(children, id))
    }

    impl BookmarkHost for MemoryHost {
        fn get_tree(&self) -> Result<Vec<BookmarkNode>> {
            self.tree_calls.set(self.tree_calls.get() + 1);
            if self.fail_tree {
                return Err(AppError::Host("bookmark store unavailable".into()));
            }
            Ok(self.tree.clone())
        }

        fn get_sub_tree(&self, id: &str) -> Result<Vec<BookmarkNode>> {
            if self.fail_sub_tree {
                return Err(AppError::Host("folder unavailable".into()));
            }
            self.get_tree()?
                .iter()
                .find_map(|root| root.find(id))
                .map(|node| vec![node.clone()])
                .ok_or_else(|| AppError::NotFound(id.to_string()))
        }

        fn create(&mut self, bookmark: NewBookmark) -> Result<BookmarkNode> {
            self.check_failure()?;
            self.next_id += 1;
            let node = BookmarkNode::leaf(self.next_id.to_string(), bookmark.title, bookmark.url);
            let parent = find_mut(&mut self.tree, &bookmark.parent_id)
                .and_then(|p| p.children.as_mut())
                .ok_or_else(|| AppError::NotFound(bookmark.parent_id.clone()))?;
            parent.push(node.clone());
            Ok(node)
        }

        fn update(&mut self, id: &str, title: &str, url: &str) -> Result<()> {
            self.check_failure()?;
            let node = find_mut(&mut self.tree, id).ok_or_else(|| AppError::NotFound(id.to_string()))?;
            node.title = title.to_string();
            node.url = Some(url.to_string());
            Ok(())
        }

        fn remove(&mut self, id: &str) -> Result<()> {
            self.check_failure()?;
            if remove_from(&mut self.tree, id) {
                Ok(())
            } else {
                Err(AppError::NotFound(id.to_string()))
            }
        }

        fn top_sites(&self) -> Result<Vec<TopSite>> {
            Ok(self.top.clone())
        }
    }
}

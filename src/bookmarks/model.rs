use serde::{Deserialize, Serialize};

/// A node in the host bookmark tree.
///
/// A node is either a folder (`children` is `Some`, `url` is `None`) or a
/// leaf bookmark (`url` is `Some`, `children` is `None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
    /// Creation time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<i64>,
}

impl BookmarkNode {
    /// Create a folder node.
    pub fn folder(id: impl Into<String>, title: impl Into<String>, children: Vec<BookmarkNode>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: None,
            children: Some(children),
            date_added: None,
        }
    }

    /// Create a leaf bookmark node.
    pub fn leaf(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: Some(url.into()),
            children: None,
            date_added: None,
        }
    }

    /// Builder-style setter for the creation timestamp.
    pub fn added_at(mut self, date_added: i64) -> Self {
        self.date_added = Some(date_added);
        self
    }

    pub fn is_folder(&self) -> bool {
        self.children.is_some()
    }

    /// Immediate children that are folders themselves.
    pub fn subfolders(&self) -> Vec<&BookmarkNode> {
        self.children
            .iter()
            .flatten()
            .filter(|child| child.is_folder())
            .collect()
    }

    /// Depth-first search for a node by id (this node included).
    pub fn find(&self, id: &str) -> Option<&BookmarkNode> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .iter()
            .flatten()
            .find_map(|child| child.find(id))
    }
}

/// A leaf bookmark, as produced by flattening the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatBookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Creation time in epoch milliseconds.
    pub date_added: Option<i64>,
}

impl FlatBookmark {
    /// Case-insensitive substring match on title or url.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.url.to_lowercase().contains(needle)
    }
}

/// A folder choice for folder-selection inputs.
///
/// `title` is the display path: ancestor titles joined with `" / "`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub id: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_and_leaf_shapes() {
        let folder = BookmarkNode::folder("1", "Bar", vec![]);
        let leaf = BookmarkNode::leaf("2", "Rust", "https://rust-lang.org");
        assert!(folder.is_folder());
        assert!(folder.url.is_none());
        assert!(!leaf.is_folder());
        assert!(leaf.children.is_none());
    }

    #[test]
    fn find_descends_into_children() {
        let tree = BookmarkNode::folder(
            "0",
            "",
            vec![BookmarkNode::folder(
                "1",
                "Bar",
                vec![BookmarkNode::leaf("5", "Docs", "https://docs.rs")],
            )],
        );
        assert_eq!(tree.find("5").map(|n| n.title.as_str()), Some("Docs"));
        assert!(tree.find("9").is_none());
    }

    #[test]
    fn subfolders_skip_leaves() {
        let folder = BookmarkNode::folder(
            "1",
            "Bar",
            vec![
                BookmarkNode::leaf("2", "a", "https://a.com"),
                BookmarkNode::folder("3", "Work", vec![]),
            ],
        );
        let subs = folder.subfolders();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].id, "3");
    }

    #[test]
    fn matches_is_case_insensitive_on_title_and_url() {
        let bookmark = FlatBookmark {
            id: "1".into(),
            title: "GitHub".into(),
            url: "https://github.com".into(),
            date_added: None,
        };
        assert!(bookmark.matches("git"));
        assert!(bookmark.matches("hub.com"));
        assert!(!bookmark.matches("gitlab"));
    }
}

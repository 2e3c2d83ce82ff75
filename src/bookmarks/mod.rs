//! Bookmark data model, tree walks, host store access, and mutations.

pub mod chromium;
pub mod host;
pub mod model;
pub mod mutation;
pub mod tree;

pub use host::{BookmarkHost, TopSite};
pub use model::{BookmarkNode, FlatBookmark, FolderEntry};

//! Bookmark host backed by a Chromium profile `Bookmarks` file.
//!
//! The file is a JSON document with a `roots` object holding the permanent
//! folders (`bookmark_bar`, `other`, `synced`). Timestamps are microseconds
//! since 1601-01-01 encoded as decimal strings.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Map, Value};

use super::host::{is_permanent, BookmarkHost, NewBookmark, TopSite};
use super::model::BookmarkNode;
use crate::error::{AppError, Result};

/// Milliseconds between 1601-01-01 and 1970-01-01.
const WINDOWS_EPOCH_OFFSET_MS: i64 = 11_644_473_600_000;

/// Permanent roots in display order.
const ROOT_KEYS: &[&str] = &["bookmark_bar", "other", "synced"];

/// A `Bookmarks` file on disk plus an optional top-sites JSON list.
#[derive(Debug, Clone)]
pub struct ChromiumStore {
    path: PathBuf,
    top_sites_path: Option<PathBuf>,
}

impl ChromiumStore {
    pub fn new(path: &Path, top_sites_path: Option<&Path>) -> Self {
        Self {
            path: path.to_path_buf(),
            top_sites_path: top_sites_path.map(Path::to_path_buf),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Probe the usual profile locations for an existing `Bookmarks` file.
    pub fn detect() -> Option<PathBuf> {
        let config = dirs::config_dir()?;
        [
            "google-chrome/Default/Bookmarks",
            "chromium/Default/Bookmarks",
            "BraveSoftware/Brave-Browser/Default/Bookmarks",
            "Google/Chrome/Default/Bookmarks",
        ]
        .iter()
        .map(|rel| config.join(rel))
        .find(|p| p.is_file())
    }

    fn read_document(&self) -> Result<Value> {
        let content = fs::read_to_string(&self.path)?;
        let doc: Value = serde_json::from_str(&content)?;
        if !doc.get("roots").is_some_and(Value::is_object) {
            return Err(AppError::Host(format!(
                "{} has no bookmark roots",
                self.path.display()
            )));
        }
        Ok(doc)
    }

    /// Write through a sibling temp file so readers never see a torn file.
    fn write_document(&self, mut doc: Value) -> Result<()> {
        // Any stored checksum is stale after an edit.
        if let Some(obj) = doc.as_object_mut() {
            obj.remove("checksum");
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&doc)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn roots_mut(doc: &mut Value) -> Result<&mut Map<String, Value>> {
    doc.get_mut("roots")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| AppError::Host("bookmark roots missing".into()))
}

/// Convert a Chromium timestamp string to epoch milliseconds.
pub fn chromium_to_epoch_ms(raw: &str) -> Option<i64> {
    let micros: i64 = raw.parse().ok()?;
    if micros <= 0 {
        return None;
    }
    Some(micros / 1000 - WINDOWS_EPOCH_OFFSET_MS)
}

/// Convert epoch milliseconds to a Chromium timestamp string.
pub fn epoch_ms_to_chromium(ms: i64) -> String {
    ((ms + WINDOWS_EPOCH_OFFSET_MS) * 1000).to_string()
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn node_id(value: &Value) -> Option<&str> {
    value.get("id").and_then(Value::as_str)
}

fn to_node(value: &Value) -> Option<BookmarkNode> {
    let id = node_id(value)?.to_string();
    let title = value
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let date_added = value
        .get("date_added")
        .and_then(Value::as_str)
        .and_then(chromium_to_epoch_ms);

    if value.get("type").and_then(Value::as_str) == Some("url") {
        let url = value.get("url").and_then(Value::as_str).unwrap_or_default();
        return Some(BookmarkNode {
            id,
            title,
            url: Some(url.to_string()),
            children: None,
            date_added,
        });
    }

    let children = value
        .get("children")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(to_node).collect())
        .unwrap_or_default();
    Some(BookmarkNode {
        id,
        title,
        url: None,
        children: Some(children),
        date_added,
    })
}

fn find_value_mut<'a>(node: &'a mut Value, id: &str) -> Option<&'a mut Value> {
    if node_id(node) == Some(id) {
        return Some(node);
    }
    node.get_mut("children")?
        .as_array_mut()?
        .iter_mut()
        .find_map(|child| find_value_mut(child, id))
}

fn remove_value(node: &mut Value, id: &str) -> bool {
    let Some(children) = node.get_mut("children").and_then(Value::as_array_mut) else {
        return false;
    };
    if let Some(pos) = children.iter().position(|c| node_id(c) == Some(id)) {
        children.remove(pos);
        return true;
    }
    children.iter_mut().any(|child| remove_value(child, id))
}

fn max_id(node: &Value) -> u64 {
    let own = node_id(node).and_then(|s| s.parse().ok()).unwrap_or(0);
    node.get("children")
        .and_then(Value::as_array)
        .map(|children| children.iter().map(max_id).max().unwrap_or(0))
        .unwrap_or(0)
        .max(own)
}

impl BookmarkHost for ChromiumStore {
    fn get_tree(&self) -> Result<Vec<BookmarkNode>> {
        let doc = self.read_document()?;
        let roots = doc.get("roots").and_then(Value::as_object);
        let children = ROOT_KEYS
            .iter()
            .filter_map(|key| roots.and_then(|r| r.get(*key)))
            .filter_map(to_node)
            .collect();
        Ok(vec![BookmarkNode::folder("0", "", children)])
    }

    fn create(&mut self, bookmark: NewBookmark) -> Result<BookmarkNode> {
        let mut doc = self.read_document()?;
        let roots = roots_mut(&mut doc)?;
        let next_id = roots.values().map(max_id).max().unwrap_or(3).max(3) + 1;
        let added = now_ms();

        let parent = roots
            .values_mut()
            .find_map(|root| find_value_mut(root, &bookmark.parent_id))
            .ok_or_else(|| AppError::Host("Can't find parent bookmark for id.".into()))?;
        let children = parent
            .get_mut("children")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| AppError::Host("Parameter 'parentId' does not specify a folder.".into()))?;
        children.push(json!({
            "id": next_id.to_string(),
            "type": "url",
            "name": bookmark.title,
            "url": bookmark.url,
            "date_added": epoch_ms_to_chromium(added),
        }));
        self.write_document(doc)?;
        log::info!("created bookmark {} in folder {}", next_id, bookmark.parent_id);

        Ok(BookmarkNode::leaf(next_id.to_string(), bookmark.title, bookmark.url).added_at(added))
    }

    fn update(&mut self, id: &str, title: &str, url: &str) -> Result<()> {
        if is_permanent(id) {
            return Err(AppError::Host("Can't modify the root bookmark folders.".into()));
        }
        let mut doc = self.read_document()?;
        let node = roots_mut(&mut doc)?
            .values_mut()
            .find_map(|root| find_value_mut(root, id))
            .ok_or_else(|| AppError::Host("Can't find bookmark for id.".into()))?;
        let obj = node
            .as_object_mut()
            .ok_or_else(|| AppError::Host("Can't find bookmark for id.".into()))?;
        obj.insert("name".into(), Value::String(title.to_string()));
        if obj.get("type").and_then(Value::as_str) == Some("url") {
            obj.insert("url".into(), Value::String(url.to_string()));
        }
        self.write_document(doc)?;
        log::info!("updated bookmark {}", id);
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<()> {
        if is_permanent(id) {
            return Err(AppError::Host("Can't modify the root bookmark folders.".into()));
        }
        let mut doc = self.read_document()?;
        let removed = roots_mut(&mut doc)?
            .values_mut()
            .any(|root| remove_value(root, id));
        if !removed {
            return Err(AppError::Host("Can't find bookmark for id.".into()));
        }
        self.write_document(doc)?;
        log::info!("removed bookmark {}", id);
        Ok(())
    }

    fn top_sites(&self) -> Result<Vec<TopSite>> {
        let Some(path) = &self.top_sites_path else {
            return Ok(Vec::new());
        };
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn revision(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "checksum": "abc",
        "roots": {
            "bookmark_bar": {
                "id": "1", "type": "folder", "name": "Bookmarks bar", "date_added": "0",
                "children": [
                    { "id": "5", "type": "url", "name": "GitHub", "url": "https://github.com",
                      "date_added": "13350000000000000" },
                    { "id": "6", "type": "folder", "name": "Work", "children": [
                        { "id": "7", "type": "url", "name": "Jira", "url": "https://jira.example.com" }
                    ] }
                ]
            },
            "other": { "id": "2", "type": "folder", "name": "Other bookmarks", "children": [] },
            "synced": { "id": "3", "type": "folder", "name": "Mobile bookmarks", "children": [] }
        },
        "version": 1
    }"#;

    fn setup() -> (TempDir, ChromiumStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Bookmarks");
        fs::write(&path, SAMPLE).unwrap();
        let store = ChromiumStore::new(&path, None);
        (dir, store)
    }

    #[test]
    fn get_tree_wraps_roots_in_synthetic_root() {
        let (_dir, store) = setup();
        let tree = store.get_tree().unwrap();
        assert_eq!(tree.len(), 1);
        let roots = tree[0].children.as_ref().unwrap();
        let titles: Vec<&str> = roots.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Bookmarks bar", "Other bookmarks", "Mobile bookmarks"]);
        let bar = &roots[0];
        assert_eq!(bar.date_added, None);
        let github = &bar.children.as_ref().unwrap()[0];
        assert_eq!(github.url.as_deref(), Some("https://github.com"));
        assert!(github.date_added.is_some());
    }

    #[test]
    fn timestamp_conversion_round_trips() {
        let ms = 1_700_000_000_123;
        assert_eq!(chromium_to_epoch_ms(&epoch_ms_to_chromium(ms)), Some(ms));
        assert_eq!(chromium_to_epoch_ms("0"), None);
        assert_eq!(chromium_to_epoch_ms("garbage"), None);
    }

    #[test]
    fn create_appends_with_next_id() {
        let (_dir, mut store) = setup();
        let node = store
            .create(NewBookmark {
                parent_id: "6".into(),
                title: "Wiki".into(),
                url: "https://wiki.example.com".into(),
            })
            .unwrap();
        assert_eq!(node.id, "8");
        let sub = store.get_sub_tree("6").unwrap();
        let children = sub[0].children.as_ref().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].title, "Wiki");

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(!raw.contains("checksum"));
    }

    #[test]
    fn create_into_leaf_is_rejected() {
        let (_dir, mut store) = setup();
        let err = store
            .create(NewBookmark {
                parent_id: "5".into(),
                title: "x".into(),
                url: "https://x.com".into(),
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Host(_)));
    }

    #[test]
    fn update_changes_title_and_url() {
        let (_dir, mut store) = setup();
        store.update("7", "Tickets", "https://tickets.example.com").unwrap();
        let sub = store.get_sub_tree("7").unwrap();
        assert_eq!(sub[0].title, "Tickets");
        assert_eq!(sub[0].url.as_deref(), Some("https://tickets.example.com"));
    }

    #[test]
    fn remove_deletes_node() {
        let (_dir, mut store) = setup();
        store.remove("5").unwrap();
        assert!(store.get_sub_tree("5").is_err());
        assert!(store.remove("5").is_err());
    }

    #[test]
    fn permanent_roots_are_protected() {
        let (_dir, mut store) = setup();
        assert!(store.remove("1").is_err());
        assert!(store.update("2", "x", "").is_err());
    }

    #[test]
    fn revision_tracks_file_mtime() {
        let (_dir, store) = setup();
        assert!(store.revision().is_some());
        let gone = ChromiumStore::new(Path::new("/nonexistent/Bookmarks"), None);
        assert!(gone.revision().is_none());
    }

    #[test]
    fn missing_roots_is_a_host_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Bookmarks");
        fs::write(&path, "{}").unwrap();
        let store = ChromiumStore::new(&path, None);
        assert!(matches!(store.get_tree(), Err(AppError::Host(_))));
    }

    #[test]
    fn top_sites_from_file_or_empty() {
        let (dir, store) = setup();
        assert!(store.top_sites().unwrap().is_empty());

        let top_path = dir.path().join("top.json");
        fs::write(&top_path, r#"[{"title":"News","url":"https://news.example.com"}]"#).unwrap();
        let store = ChromiumStore::new(store.path(), Some(&top_path));
        let sites = store.top_sites().unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].title, "News");
    }
}

//! Tree walks over the host bookmark hierarchy.

use std::collections::HashSet;

use super::model::{BookmarkNode, FlatBookmark, FolderEntry};

/// Separator placed between ancestor titles in folder display paths.
pub const FOLDER_PATH_SEPARATOR: &str = " / ";

/// Flatten a bookmark tree into its leaf bookmarks, depth-first pre-order.
///
/// Folders are never emitted. Leaves with an empty url are skipped. A node id
/// is visited at most once, so malformed (cyclic or duplicated) input stays
/// bounded.
pub fn flatten(nodes: &[BookmarkNode]) -> Vec<FlatBookmark> {
    let mut out = Vec::new();
    let mut visited = HashSet::new();
    flatten_into(nodes, &mut out, &mut visited);
    out
}

fn flatten_into<'a>(
    nodes: &'a [BookmarkNode],
    out: &mut Vec<FlatBookmark>,
    visited: &mut HashSet<&'a str>,
) {
    for node in nodes {
        if !visited.insert(node.id.as_str()) {
            continue;
        }
        if let Some(children) = &node.children {
            flatten_into(children, out, visited);
        } else if let Some(url) = node.url.as_deref().filter(|u| !u.is_empty()) {
            out.push(FlatBookmark {
                id: node.id.clone(),
                title: node.title.clone(),
                url: url.to_string(),
                date_added: node.date_added,
            });
        }
    }
}

/// List every folder in the tree with its ancestor-prefixed display path.
pub fn list_folders(nodes: &[BookmarkNode], prefix: &str) -> Vec<FolderEntry> {
    let mut folders = Vec::new();
    let mut visited = HashSet::new();
    list_folders_into(nodes, prefix, &mut folders, &mut visited);
    folders
}

fn list_folders_into<'a>(
    nodes: &'a [BookmarkNode],
    prefix: &str,
    out: &mut Vec<FolderEntry>,
    visited: &mut HashSet<&'a str>,
) {
    for node in nodes {
        let Some(children) = &node.children else {
            continue;
        };
        if !visited.insert(node.id.as_str()) {
            continue;
        }
        let title = format!("{}{}", prefix, node.title);
        let child_prefix = format!("{}{}", title, FOLDER_PATH_SEPARATOR);
        out.push(FolderEntry {
            id: node.id.clone(),
            title,
        });
        list_folders_into(children, &child_prefix, out, visited);
    }
}

/// Root folders shown as primary tabs: folders directly under the first
/// root node that carry a title.
pub fn root_folders(tree: &[BookmarkNode]) -> Vec<&BookmarkNode> {
    tree.first()
        .and_then(|root| root.children.as_ref())
        .map(|children| {
            children
                .iter()
                .filter(|node| node.is_folder() && !node.title.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// The `limit` most recently added bookmarks, newest first.
///
/// Bookmarks without a creation time are left out.
pub fn recently_added(bookmarks: &[FlatBookmark], limit: usize) -> Vec<FlatBookmark> {
    let mut dated: Vec<FlatBookmark> = bookmarks
        .iter()
        .filter(|b| b.date_added.is_some())
        .cloned()
        .collect();
    dated.sort_by(|a, b| b.date_added.cmp(&a.date_added));
    dated.truncate(limit);
    dated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Vec<BookmarkNode> {
        vec![BookmarkNode::folder(
            "0",
            "",
            vec![
                BookmarkNode::folder(
                    "1",
                    "Bookmarks bar",
                    vec![
                        BookmarkNode::leaf("10", "GitHub", "https://github.com"),
                        BookmarkNode::folder(
                            "11",
                            "Work",
                            vec![
                                BookmarkNode::leaf("12", "Jira", "https://jira.example.com"),
                                BookmarkNode::folder(
                                    "13",
                                    "Deep",
                                    vec![BookmarkNode::leaf("14", "Wiki", "https://wiki.example.com")],
                                ),
                            ],
                        ),
                        BookmarkNode::leaf("15", "Rust", "https://rust-lang.org"),
                    ],
                ),
                BookmarkNode::folder("2", "Other bookmarks", vec![]),
                BookmarkNode::folder("3", "", vec![]),
            ],
        )]
    }

    fn ids(list: &[FlatBookmark]) -> Vec<&str> {
        list.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn flatten_is_preorder_leaves_only() {
        let flat = flatten(&sample_tree());
        assert_eq!(ids(&flat), vec!["10", "12", "14", "15"]);
    }

    #[test]
    fn flatten_empty_input() {
        assert!(flatten(&[]).is_empty());
    }

    #[test]
    fn flatten_skips_empty_urls() {
        let nodes = vec![
            BookmarkNode::leaf("1", "blank", ""),
            BookmarkNode::leaf("2", "ok", "https://ok.com"),
        ];
        assert_eq!(ids(&flatten(&nodes)), vec!["2"]);
    }

    #[test]
    fn flatten_of_flat_list_is_unchanged() {
        let nodes = vec![
            BookmarkNode::leaf("1", "a", "https://a.com").added_at(5),
            BookmarkNode::leaf("2", "b", "https://b.com"),
        ];
        let flat = flatten(&nodes);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].title, "a");
        assert_eq!(flat[0].url, "https://a.com");
        assert_eq!(flat[0].date_added, Some(5));
        assert_eq!(flat[1].id, "2");
    }

    #[test]
    fn flatten_visits_duplicate_ids_once() {
        let shared = BookmarkNode::folder("7", "dup", vec![BookmarkNode::leaf("8", "x", "https://x.com")]);
        let nodes = vec![shared.clone(), shared];
        assert_eq!(ids(&flatten(&nodes)), vec!["8"]);
    }

    #[test]
    fn list_folders_prefixes_ancestor_titles() {
        let tree = sample_tree();
        let roots = tree[0].children.as_deref().unwrap();
        let folders = list_folders(roots, "");
        let titles: Vec<&str> = folders.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Bookmarks bar",
                "Bookmarks bar / Work",
                "Bookmarks bar / Work / Deep",
                "Other bookmarks",
                "",
            ]
        );
        assert_eq!(folders[2].id, "13");
    }

    #[test]
    fn list_folders_keeps_separator_after_untitled_root() {
        let folders = list_folders(&sample_tree(), "");
        assert_eq!(folders[0].title, "");
        assert_eq!(folders[1].title, " / Bookmarks bar");
        assert_eq!(folders[1].id, "1");
    }

    #[test]
    fn list_folders_honors_prefix_and_skips_leaves() {
        let nodes = vec![
            BookmarkNode::leaf("1", "leaf", "https://a.com"),
            BookmarkNode::folder("2", "Music", vec![]),
        ];
        let folders = list_folders(&nodes, "Root / ");
        assert_eq!(
            folders,
            vec![FolderEntry {
                id: "2".into(),
                title: "Root / Music".into()
            }]
        );
    }

    #[test]
    fn root_folders_need_a_title() {
        let tree = sample_tree();
        let roots: Vec<&str> = root_folders(&tree).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(roots, vec!["1", "2"]);
        assert!(root_folders(&[]).is_empty());
    }

    #[test]
    fn recently_added_sorts_newest_first_and_limits() {
        let flat = vec![
            FlatBookmark { id: "a".into(), title: "a".into(), url: "https://a".into(), date_added: Some(10) },
            FlatBookmark { id: "b".into(), title: "b".into(), url: "https://b".into(), date_added: None },
            FlatBookmark { id: "c".into(), title: "c".into(), url: "https://c".into(), date_added: Some(30) },
            FlatBookmark { id: "d".into(), title: "d".into(), url: "https://d".into(), date_added: Some(20) },
        ];
        assert_eq!(ids(&recently_added(&flat, 2)), vec!["c", "d"]);
        assert_eq!(ids(&recently_added(&flat, 12)), vec!["c", "d", "a"]);
    }
}

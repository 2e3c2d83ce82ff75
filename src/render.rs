//! View renderer: turns a bookmark list into display cards.
//!
//! This is a pure transformation; drawing the cards into the terminal is the
//! job of `components::grid`.

use url::Url;

use crate::bookmarks::FlatBookmark;
use crate::i18n::Localizer;

/// Placeholder shown when a favicon can't be loaded.
pub const FALLBACK_FAVICON: &str = "▤";

/// How a list is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Cards with title, host and open/edit/delete actions.
    Grid,
    /// Compact link tiles (most-visited strip).
    Icon,
}

/// Actions offered on a grid card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    /// Open in a new tab.
    Open,
    Edit,
    Delete,
}

/// Result of deriving a display hostname from a stored url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLabel {
    /// Best-effort hostname, used to key the favicon request.
    pub host: String,
    /// `true` when neither parse attempt succeeded.
    pub fallback: bool,
}

/// Derive the hostname for display.
///
/// Tries the url as-is, then with `https://` prefixed. If both fail, strips
/// any `http(s)://` prefix, takes everything up to the first `/`, and flags
/// the result as a fallback.
pub fn derive_host(url: &str, unknown_label: &str) -> HostLabel {
    if let Ok(parsed) = Url::parse(url) {
        return HostLabel {
            host: parsed.host_str().unwrap_or_default().to_string(),
            fallback: false,
        };
    }
    if let Ok(parsed) = Url::parse(&format!("https://{}", url)) {
        return HostLabel {
            host: parsed.host_str().unwrap_or_default().to_string(),
            fallback: false,
        };
    }
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let head = stripped.split('/').next().unwrap_or_default();
    HostLabel {
        host: if head.is_empty() {
            unknown_label.to_string()
        } else {
            head.to_string()
        },
        fallback: true,
    }
}

/// Favicon request for one card.
///
/// `on_error` swaps in the placeholder exactly once; later failures are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favicon {
    pub request_url: String,
    pub src: String,
    pub fallback_applied: bool,
}

impl Favicon {
    pub fn for_host(host: &str) -> Self {
        let request_url = favicon_url(host);
        Self {
            src: request_url.clone(),
            request_url,
            fallback_applied: false,
        }
    }

    pub fn on_error(&mut self) {
        if self.fallback_applied {
            return;
        }
        self.fallback_applied = true;
        self.src = FALLBACK_FAVICON.to_string();
    }
}

/// Favicon service URL for a hostname.
pub fn favicon_url(host: &str) -> String {
    format!("https://www.google.com/s2/favicons?domain={}&sz=32", host)
}

/// One rendered bookmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    /// Title, or the localized "Untitled" label.
    pub title: String,
    /// The stored url, untouched.
    pub url: String,
    pub host: String,
    /// Label shown under the title: the host, or "unknown" on fallback.
    pub host_label: String,
    pub fallback_host: bool,
    pub favicon: Favicon,
    pub actions: Vec<CardAction>,
    pub date_added: Option<i64>,
}

/// Rendered output for a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedList {
    /// Nothing to show: carries the localized placeholder text.
    Empty { message: String },
    Cards(Vec<Card>),
}

impl RenderedList {
    pub fn cards(&self) -> &[Card] {
        match self {
            RenderedList::Cards(cards) => cards,
            RenderedList::Empty { .. } => &[],
        }
    }

    pub fn cards_mut(&mut self) -> &mut [Card] {
        match self {
            RenderedList::Cards(cards) => cards,
            RenderedList::Empty { .. } => &mut [],
        }
    }

    pub fn len(&self) -> usize {
        self.cards().len()
    }
}

/// Render `bookmarks` for `mode` with localized labels.
pub fn render(bookmarks: &[FlatBookmark], mode: DisplayMode, loc: &Localizer) -> RenderedList {
    if bookmarks.is_empty() {
        return RenderedList::Empty {
            message: loc.t("empty.noBookmarks"),
        };
    }
    let unknown = loc.t("bookmark.unknownHost");
    let cards = bookmarks
        .iter()
        .filter(|b| !b.url.is_empty())
        .map(|b| {
            let HostLabel { host, fallback } = derive_host(&b.url, &unknown);
            let title = if b.title.is_empty() {
                loc.t("bookmark.untitled")
            } else {
                b.title.clone()
            };
            let actions = match mode {
                DisplayMode::Grid => vec![CardAction::Open, CardAction::Edit, CardAction::Delete],
                DisplayMode::Icon => Vec::new(),
            };
            Card {
                id: b.id.clone(),
                title,
                url: b.url.clone(),
                favicon: Favicon::for_host(&host),
                host_label: if fallback { unknown.clone() } else { host.clone() },
                host,
                fallback_host: fallback,
                actions,
                date_added: b.date_added,
            }
        })
        .collect();
    RenderedList::Cards(cards)
}

/// Visually move `dragged` onto `target`: after it when moving forward,
/// before it when moving backward. Nothing is persisted.
///
/// Returns `false` when the move is a no-op.
pub fn reorder<T>(items: &mut Vec<T>, dragged: usize, target: usize) -> bool {
    if dragged == target || dragged >= items.len() || target >= items.len() {
        return false;
    }
    let item = items.remove(dragged);
    // After removal, "after target" (forward) and "before target" (backward)
    // both land on index `target`.
    items.insert(target, item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;

    fn flat(id: &str, title: &str, url: &str) -> FlatBookmark {
        FlatBookmark {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            date_added: None,
        }
    }

    #[test]
    fn host_from_full_url() {
        assert_eq!(
            derive_host("https://example.com/page", "unknown"),
            HostLabel {
                host: "example.com".into(),
                fallback: false
            }
        );
    }

    #[test]
    fn host_from_schemeless_url_via_https_retry() {
        assert_eq!(
            derive_host("example.com/page", "unknown"),
            HostLabel {
                host: "example.com".into(),
                fallback: false
            }
        );
    }

    #[test]
    fn host_fallback_on_garbage() {
        let label = derive_host("not a url!!", "unknown");
        assert!(label.fallback);
        assert_eq!(label.host, "not a url!!");
    }

    #[test]
    fn render_empty_list_is_placeholder() {
        let loc = Localizer::new(Language::English);
        assert_eq!(
            render(&[], DisplayMode::Grid, &loc),
            RenderedList::Empty {
                message: "No bookmarks found.".into()
            }
        );
    }

    #[test]
    fn render_grid_cards_have_actions_and_labels() {
        let loc = Localizer::new(Language::English);
        let list = render(
            &[
                flat("1", "GitHub", "https://github.com/rust-lang"),
                flat("2", "", "not a url!!"),
            ],
            DisplayMode::Grid,
            &loc,
        );
        let cards = list.cards();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].host_label, "github.com");
        assert_eq!(cards[0].actions, vec![CardAction::Open, CardAction::Edit, CardAction::Delete]);
        assert_eq!(
            cards[0].favicon.request_url,
            "https://www.google.com/s2/favicons?domain=github.com&sz=32"
        );
        assert_eq!(cards[1].title, "Untitled");
        assert_eq!(cards[1].host_label, "unknown");
        assert!(cards[1].fallback_host);
        assert_eq!(cards[1].url, "not a url!!");
    }

    #[test]
    fn render_icon_mode_has_no_actions() {
        let loc = Localizer::new(Language::English);
        let list = render(&[flat("1", "a", "https://a.com")], DisplayMode::Icon, &loc);
        assert!(list.cards()[0].actions.is_empty());
    }

    #[test]
    fn render_localizes_labels() {
        let loc = Localizer::new(Language::Arabic);
        let list = render(&[flat("1", "", "https://a.com")], DisplayMode::Grid, &loc);
        assert_eq!(list.cards()[0].title, "بدون عنوان");
    }

    #[test]
    fn favicon_fallback_applies_once() {
        let mut icon = Favicon::for_host("example.com");
        icon.on_error();
        assert!(icon.fallback_applied);
        assert_eq!(icon.src, FALLBACK_FAVICON);
        icon.src = "changed".into();
        icon.on_error();
        assert_eq!(icon.src, "changed");
    }

    #[test]
    fn reorder_moves_forward_after_and_backward_before() {
        let mut items = vec!["a", "b", "c", "d"];
        assert!(reorder(&mut items, 0, 2));
        assert_eq!(items, vec!["b", "c", "a", "d"]);
        assert!(reorder(&mut items, 3, 1));
        assert_eq!(items, vec!["b", "d", "c", "a"]);
        assert!(!reorder(&mut items, 1, 1));
        assert!(!reorder(&mut items, 0, 9));
    }
}

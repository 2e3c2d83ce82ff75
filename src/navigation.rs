//! Navigation state machine: quick views, folder tabs, breadcrumbs, search.
//!
//! All transitions go through named methods on `NavigationState`. Methods
//! that need a folder's contents fetch the subtree from the host, the same
//! way the tabs do when clicked.

use std::cmp::Ordering;

use crate::bookmarks::tree::{flatten, recently_added, root_folders};
use crate::bookmarks::{BookmarkHost, BookmarkNode, FlatBookmark, TopSite};
use crate::error::Result;
use crate::i18n::Localizer;
use crate::render::DisplayMode;

/// How many entries the most-visited and recently-added views keep.
pub const QUICK_VIEW_LIMIT: usize = 12;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// The three top-level views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuickView {
    #[default]
    Bookmarks,
    MostVisited,
    RecentlyAdded,
}

impl QuickView {
    pub const ALL: [QuickView; 3] = [
        QuickView::Bookmarks,
        QuickView::MostVisited,
        QuickView::RecentlyAdded,
    ];

    pub fn label_key(self) -> &'static str {
        match self {
            QuickView::Bookmarks => "tabs.bookmarks",
            QuickView::MostVisited => "tabs.mostVisited",
            QuickView::RecentlyAdded => "tabs.recentlyAdded",
        }
    }

    /// Most-visited sites are plain link tiles; the others are full cards.
    pub fn display_mode(self) -> DisplayMode {
        match self {
            QuickView::MostVisited => DisplayMode::Icon,
            _ => DisplayMode::Grid,
        }
    }
}

/// Identifies a folder tab. `All` is synthesized, never a host folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabId {
    All,
    Folder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderTab {
    pub id: TabId,
    /// Folder title; empty for `All` (labelled by translation).
    pub title: String,
}

impl FolderTab {
    fn from_node(node: &BookmarkNode) -> Self {
        Self {
            id: TabId::Folder(node.id.clone()),
            title: node.title.clone(),
        }
    }

    pub fn label(&self, loc: &Localizer) -> String {
        match self.id {
            TabId::All => loc.t("tabs.all"),
            TabId::Folder(_) => self.title.clone(),
        }
    }
}

/// One segment of the breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreadcrumbItem {
    Root,
    All,
    Folder { id: String, title: String },
    Search { term: String },
}

impl BreadcrumbItem {
    pub fn label(&self, loc: &Localizer) -> String {
        match self {
            BreadcrumbItem::Root => loc.t("breadcrumbs.home"),
            BreadcrumbItem::All => loc.t("breadcrumbs.all"),
            BreadcrumbItem::Folder { title, .. } => title.clone(),
            BreadcrumbItem::Search { term } => loc.translate("breadcrumbs.search", &[("term", term)]),
        }
    }
}

/// Whether folder browsing or search results are on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Browsing,
    Searching,
}

/// Sort criterion for the active view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Source order.
    #[default]
    Default,
    Name,
    Date,
    Url,
}

impl SortOrder {
    pub fn next(self) -> Self {
        match self {
            SortOrder::Default => SortOrder::Name,
            SortOrder::Name => SortOrder::Date,
            SortOrder::Date => SortOrder::Url,
            SortOrder::Url => SortOrder::Default,
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            SortOrder::Default => "sort.default",
            SortOrder::Name => "sort.name",
            SortOrder::Date => "sort.date",
            SortOrder::Url => "sort.url",
        }
    }

    fn compare(self, a: &FlatBookmark, b: &FlatBookmark) -> Ordering {
        match self {
            SortOrder::Default => Ordering::Equal,
            SortOrder::Name => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortOrder::Date => b.date_added.unwrap_or(0).cmp(&a.date_added.unwrap_or(0)),
            SortOrder::Url => a.url.cmp(&b.url),
        }
    }
}

/// Time window filter on `date_added`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeFilter {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl TimeFilter {
    pub fn next(self) -> Self {
        match self {
            TimeFilter::All => TimeFilter::Today,
            TimeFilter::Today => TimeFilter::Week,
            TimeFilter::Week => TimeFilter::Month,
            TimeFilter::Month => TimeFilter::All,
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            TimeFilter::All => "filter.all",
            TimeFilter::Today => "filter.today",
            TimeFilter::Week => "filter.week",
            TimeFilter::Month => "filter.month",
        }
    }

    fn window_ms(self) -> Option<i64> {
        match self {
            TimeFilter::All => None,
            TimeFilter::Today => Some(DAY_MS),
            TimeFilter::Week => Some(7 * DAY_MS),
            TimeFilter::Month => Some(30 * DAY_MS),
        }
    }

    /// Bookmarks without a creation time only pass `All`.
    pub fn accepts(self, bookmark: &FlatBookmark, now_ms: i64) -> bool {
        match self.window_ms() {
            None => true,
            Some(window) => bookmark
                .date_added
                .is_some_and(|added| now_ms - added < window),
        }
    }
}

/// Case-insensitive title/url substring search.
pub fn search_bookmarks(bookmarks: &[FlatBookmark], term: &str) -> Vec<FlatBookmark> {
    let needle = term.to_lowercase();
    bookmarks
        .iter()
        .filter(|b| b.matches(&needle))
        .cloned()
        .collect()
}

fn top_sites_to_flat(sites: &[TopSite]) -> Vec<FlatBookmark> {
    sites
        .iter()
        .take(QUICK_VIEW_LIMIT)
        .enumerate()
        .map(|(i, site)| FlatBookmark {
            id: format!("top-{}", i),
            title: site.title.clone(),
            url: site.url.clone(),
            date_added: None,
        })
        .collect()
}

/// Process-wide navigation state.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    pub current_view: QuickView,
    pub current_folder: Option<BookmarkNode>,
    pub breadcrumb: Vec<BreadcrumbItem>,
    pub search_term: String,
    pub mode: Mode,
    pub primary_tabs: Vec<FolderTab>,
    pub sub_tabs: Vec<FolderTab>,
    /// Last active primary tab; kept while searching so it can be restored.
    pub active_primary: Option<TabId>,
    /// Last active sub tab; kept while searching so it can be restored.
    pub active_sub: Option<String>,
    pub sort: SortOrder,
    pub filter: TimeFilter,

    pub all_bookmarks: Vec<FlatBookmark>,
    pub most_visited: Vec<FlatBookmark>,
    pub recently_added: Vec<FlatBookmark>,

    shown_bookmarks: Vec<FlatBookmark>,
    shown_most_visited: Vec<FlatBookmark>,
    shown_recently_added: Vec<FlatBookmark>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self {
            breadcrumb: vec![BreadcrumbItem::Root],
            ..Default::default()
        }
    }

    /// The list on screen for the current quick view.
    pub fn displayed(&self) -> &[FlatBookmark] {
        match self.current_view {
            QuickView::Bookmarks => &self.shown_bookmarks,
            QuickView::MostVisited => &self.shown_most_visited,
            QuickView::RecentlyAdded => &self.shown_recently_added,
        }
    }

    /// Mutable access to the list on screen, for visual reordering.
    pub fn displayed_mut(&mut self) -> &mut Vec<FlatBookmark> {
        match self.current_view {
            QuickView::Bookmarks => &mut self.shown_bookmarks,
            QuickView::MostVisited => &mut self.shown_most_visited,
            QuickView::RecentlyAdded => &mut self.shown_recently_added,
        }
    }

    /// Whether the given primary tab should be drawn highlighted.
    pub fn is_primary_highlighted(&self, id: &TabId) -> bool {
        self.mode == Mode::Browsing && self.active_primary.as_ref() == Some(id)
    }

    /// Whether the given sub tab should be drawn highlighted.
    pub fn is_sub_highlighted(&self, id: &str) -> bool {
        self.mode == Mode::Browsing && self.active_sub.as_deref() == Some(id)
    }

    fn set_path(&mut self, path: Vec<BreadcrumbItem>) {
        self.breadcrumb = if path.is_empty() {
            vec![BreadcrumbItem::Root]
        } else {
            path
        };
    }

    /// Replace the cached data after a full tree reload.
    ///
    /// The previously active tabs (or search) are re-applied when they still
    /// exist; otherwise the first primary tab is selected. On error the state
    /// is left exactly as it was.
    pub fn load(
        &mut self,
        host: &dyn BookmarkHost,
        tree: &[BookmarkNode],
        top_sites: &[TopSite],
    ) -> Result<()> {
        let mut next = self.clone();
        next.rebuild(host, tree, top_sites)?;
        *self = next;
        Ok(())
    }

    fn rebuild(
        &mut self,
        host: &dyn BookmarkHost,
        tree: &[BookmarkNode],
        top_sites: &[TopSite],
    ) -> Result<()> {
        self.all_bookmarks = flatten(tree);
        self.most_visited = top_sites_to_flat(top_sites);
        self.recently_added = recently_added(&self.all_bookmarks, QUICK_VIEW_LIMIT);
        self.reset_ordering();

        self.primary_tabs = std::iter::once(FolderTab {
            id: TabId::All,
            title: String::new(),
        })
        .chain(root_folders(tree).into_iter().map(FolderTab::from_node))
        .collect();

        let previous_primary = self
            .active_primary
            .clone()
            .filter(|id| self.primary_tabs.iter().any(|t| &t.id == id));
        let previous_sub = self.active_sub.clone();
        let search = (self.mode == Mode::Searching).then(|| self.search_term.clone());

        match previous_primary {
            Some(primary) => {
                self.select_primary(host, &primary)?;
                if let Some(sub) = previous_sub {
                    if self.sub_tabs.iter().any(|t| t.id == TabId::Folder(sub.clone())) {
                        self.select_sub(host, &sub)?;
                    }
                }
            }
            None => self.select_first_primary(host)?,
        }

        if let Some(term) = search {
            self.search(host, &term)?;
        }
        Ok(())
    }

    /// Activate the first primary tab (`All`).
    pub fn select_first_primary(&mut self, host: &dyn BookmarkHost) -> Result<()> {
        let first = self
            .primary_tabs
            .first()
            .map(|t| t.id.clone())
            .unwrap_or(TabId::All);
        self.select_primary(host, &first)
    }

    /// Activate a primary folder tab.
    pub fn select_primary(&mut self, host: &dyn BookmarkHost, tab: &TabId) -> Result<()> {
        let folder_id = match tab {
            TabId::All => {
                self.clear_search_text();
                self.active_primary = Some(TabId::All);
                self.active_sub = None;
                self.sub_tabs.clear();
                self.current_folder = None;
                self.reset_ordering();
                self.shown_bookmarks = self.all_bookmarks.clone();
                self.set_path(vec![BreadcrumbItem::All]);
                return Ok(());
            }
            TabId::Folder(id) => id.clone(),
        };

        let subtree = host.get_sub_tree(&folder_id)?;
        let Some(folder) = subtree.into_iter().next() else {
            return Ok(());
        };
        self.clear_search_text();
        self.active_primary = Some(tab.clone());
        self.active_sub = None;

        self.sub_tabs = folder
            .subfolders()
            .into_iter()
            .map(FolderTab::from_node)
            .collect();
        let first_sub = self.sub_tabs.first().and_then(|t| match &t.id {
            TabId::Folder(id) => Some(id.clone()),
            TabId::All => None,
        });
        self.current_folder = Some(folder);

        match first_sub {
            Some(sub) => self.select_sub(host, &sub),
            None => {
                self.reset_ordering();
                if let Some(folder) = &self.current_folder {
                    self.shown_bookmarks = flatten(std::slice::from_ref(folder));
                    let crumb = BreadcrumbItem::Folder {
                        id: folder.id.clone(),
                        title: folder.title.clone(),
                    };
                    self.set_path(vec![crumb]);
                }
                Ok(())
            }
        }
    }

    /// Activate a subfolder tab of the current primary folder.
    pub fn select_sub(&mut self, host: &dyn BookmarkHost, id: &str) -> Result<()> {
        let subtree = host.get_sub_tree(id)?;
        let Some(sub) = subtree.first() else {
            return Ok(());
        };
        self.clear_search_text();
        self.active_sub = Some(id.to_string());
        self.reset_ordering();
        self.shown_bookmarks = flatten(&subtree);

        let parent = match &self.current_folder {
            Some(folder) => BreadcrumbItem::Folder {
                id: folder.id.clone(),
                title: folder.title.clone(),
            },
            None => BreadcrumbItem::Root,
        };
        let crumb = BreadcrumbItem::Folder {
            id: sub.id.clone(),
            title: sub.title.clone(),
        };
        self.set_path(vec![parent, crumb]);
        Ok(())
    }

    /// Apply the bookmark search box text.
    ///
    /// Non-empty text searches the full loaded list; empty text restores the
    /// view that was active before searching.
    pub fn search(&mut self, host: &dyn BookmarkHost, term: &str) -> Result<()> {
        if term.is_empty() {
            return self.restore_previous_view(host);
        }
        self.search_term = term.to_string();
        self.mode = Mode::Searching;
        self.reset_ordering();
        self.shown_bookmarks = search_bookmarks(&self.all_bookmarks, term);
        self.set_path(vec![BreadcrumbItem::Search {
            term: term.to_string(),
        }]);
        Ok(())
    }

    fn restore_previous_view(&mut self, host: &dyn BookmarkHost) -> Result<()> {
        self.mode = Mode::Browsing;
        self.search_term.clear();
        if let Some(sub) = self.active_sub.clone() {
            return self.select_sub(host, &sub);
        }
        let primary = self.active_primary.clone().unwrap_or(TabId::All);
        self.select_primary(host, &primary)
    }

    /// Drop any sort or filter; quick view lists go back to source order.
    /// Callers rebuild the bookmarks list themselves.
    fn reset_ordering(&mut self) {
        self.sort = SortOrder::Default;
        self.filter = TimeFilter::All;
        self.shown_most_visited = self.most_visited.clone();
        self.shown_recently_added = self.recently_added.clone();
    }

    fn clear_search_text(&mut self) {
        self.search_term.clear();
        self.mode = Mode::Browsing;
    }

    /// Handle a click on breadcrumb segment `index`.
    ///
    /// A folder crumb shows that folder's bookmarks but leaves the trail
    /// itself untouched.
    pub fn click_breadcrumb(&mut self, host: &dyn BookmarkHost, index: usize) -> Result<()> {
        let Some(item) = self.breadcrumb.get(index).cloned() else {
            return Ok(());
        };
        match item {
            BreadcrumbItem::Root => self.select_first_primary(host),
            BreadcrumbItem::All => self.select_primary(host, &TabId::All),
            BreadcrumbItem::Folder { id, .. } => {
                let subtree = host.get_sub_tree(&id)?;
                self.reset_ordering();
                self.shown_bookmarks = flatten(&subtree);
                Ok(())
            }
            BreadcrumbItem::Search { .. } => Ok(()),
        }
    }

    /// Switch quick view. Any search text is cleared and the pre-search
    /// browsing view comes back.
    pub fn select_quick_view(&mut self, host: &dyn BookmarkHost, view: QuickView) -> Result<()> {
        let ordered = self.sort != SortOrder::Default || self.filter != TimeFilter::All;
        if ordered && self.current_view == QuickView::Bookmarks && self.mode == Mode::Browsing {
            // The sorted list replaced the folder view; bring it back.
            self.restore_previous_view(host)?;
        }
        self.reset_ordering();
        self.current_view = view;
        if self.mode == Mode::Searching {
            self.restore_previous_view(host)?;
        }
        self.search_term.clear();
        Ok(())
    }

    /// The authoritative list backing the current view.
    fn source(&self) -> &[FlatBookmark] {
        match self.current_view {
            QuickView::Bookmarks => &self.all_bookmarks,
            QuickView::MostVisited => &self.most_visited,
            QuickView::RecentlyAdded => &self.recently_added,
        }
    }

    fn refresh_sorted_filtered(&mut self, now_ms: i64) {
        let (sort, filter) = (self.sort, self.filter);
        let mut list: Vec<FlatBookmark> = self
            .source()
            .iter()
            .filter(|b| filter.accepts(b, now_ms))
            .cloned()
            .collect();
        if sort != SortOrder::Default {
            list.sort_by(|a, b| sort.compare(a, b));
        }
        *self.displayed_mut() = list;
    }

    /// Re-sort the current view's source list.
    pub fn apply_sort(&mut self, sort: SortOrder, now_ms: i64) {
        self.sort = sort;
        self.refresh_sorted_filtered(now_ms);
    }

    /// Re-filter the current view's source list.
    pub fn apply_filter(&mut self, filter: TimeFilter, now_ms: i64) {
        self.filter = filter;
        self.refresh_sorted_filtered(now_ms);
    }

    /// Index of the active primary tab.
    pub fn primary_index(&self) -> Option<usize> {
        let active = self.active_primary.as_ref()?;
        self.primary_tabs.iter().position(|t| &t.id == active)
    }

    /// Index of the active sub tab.
    pub fn sub_index(&self) -> Option<usize> {
        let active = self.active_sub.as_deref()?;
        self.sub_tabs
            .iter()
            .position(|t| matches!(&t.id, TabId::Folder(id) if id == active))
    }

    /// Move to the neighbouring primary tab (`delta` of -1 or +1), wrapping.
    pub fn cycle_primary(&mut self, host: &dyn BookmarkHost, delta: isize) -> Result<()> {
        let len = self.primary_tabs.len();
        if len == 0 {
            return Ok(());
        }
        let current = self.primary_index().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        let id = self.primary_tabs[next].id.clone();
        self.select_primary(host, &id)
    }

    /// Move to the neighbouring sub tab, wrapping.
    pub fn cycle_sub(&mut self, host: &dyn BookmarkHost, delta: isize) -> Result<()> {
        let len = self.sub_tabs.len();
        if len == 0 {
            return Ok(());
        }
        let next = match self.sub_index() {
            Some(current) => (current as isize + delta).rem_euclid(len as isize) as usize,
            None => 0,
        };
        match self.sub_tabs[next].id.clone() {
            TabId::Folder(id) => self.select_sub(host, &id),
            TabId::All => Ok(()),
        }
    }
}

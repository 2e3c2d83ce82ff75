use std::collections::HashMap;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::layout::Rect;

use crate::bookmarks::mutation::{self, MutationError, MutationKind};
use crate::bookmarks::tree::list_folders;
use crate::bookmarks::{BookmarkHost, FolderEntry};
use crate::config::{AppConfig, ThemeColorsConfig};
use crate::i18n::Localizer;
use crate::input::TextInput;
use crate::navigation::{NavigationState, QuickView, TabId};
use crate::navigator::{Navigator, OpenTarget};
use crate::render::{self, RenderedList};
use crate::schedule::{Debouncer, Throttler};
use crate::settings::{GridSize, Settings, SettingsPatch, SettingsStore};
use crate::theme::{resolve_theme, ThemeColors};
use crate::websearch::resolve_query;

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(3);
/// Rate limit for back-to-top hint updates.
pub const BACK_TO_TOP_THROTTLE: Duration = Duration::from_millis(120);
/// Scrolled rows after which the back-to-top hint shows.
pub const BACK_TO_TOP_ROWS: usize = 2;

// ── Modes and focus ──────────────────────────────────────────────────────────

/// The kind of dialog being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    AddBookmark,
    EditBookmark { id: String },
    /// `from_edit` is set when opened from the edit dialog, which is restored
    /// on cancel.
    DeleteConfirm {
        id: String,
        title: String,
        from_edit: bool,
    },
    Settings,
    Help,
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    Dialog(DialogKind),
}

/// Where typed text goes outside of dialogs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Grid,
    WebSearch,
    BookmarkSearch,
}

/// Card arrangement.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    #[default]
    Grid,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created: Instant,
}

// ── Dialog state ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Title,
    Url,
    Folder,
}

/// Add/edit bookmark form. The folder field is a fuzzy picker over the
/// folder index.
#[derive(Debug, Default)]
pub struct BookmarkForm {
    pub title: TextInput,
    pub url: TextInput,
    pub folder_query: TextInput,
    pub folder_matches: Vec<FolderEntry>,
    /// Highlighted folder match; `None` means the default parent.
    pub folder_selected: Option<usize>,
    pub field: FormField,
    /// Edit forms have no folder field.
    pub has_folder: bool,
}

impl BookmarkForm {
    fn for_add(folders: &[FolderEntry]) -> Self {
        Self {
            folder_matches: folders.to_vec(),
            has_folder: true,
            ..Default::default()
        }
    }

    fn for_edit(title: &str, url: &str) -> Self {
        Self {
            title: TextInput::with_value(title),
            url: TextInput::with_value(url),
            ..Default::default()
        }
    }

    pub fn active_input_mut(&mut self) -> &mut TextInput {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::Url => &mut self.url,
            FormField::Folder => &mut self.folder_query,
        }
    }

    fn fields(&self) -> &'static [FormField] {
        if self.has_folder {
            &[FormField::Title, FormField::Url, FormField::Folder]
        } else {
            &[FormField::Title, FormField::Url]
        }
    }

    fn cycle_field(&mut self, delta: isize) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.field).unwrap_or(0) as isize;
        self.field = fields[(idx + delta).rem_euclid(fields.len() as isize) as usize];
    }

    /// Re-rank folders against the picker query.
    fn refilter(&mut self, folders: &[FolderEntry]) {
        let query = self.folder_query.as_str().trim();
        if query.is_empty() {
            self.folder_matches = folders.to_vec();
            self.folder_selected = None;
            return;
        }
        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, &FolderEntry)> = folders
            .iter()
            .filter_map(|f| matcher.fuzzy_match(&f.title, query).map(|score| (score, f)))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        self.folder_matches = scored.into_iter().map(|(_, f)| f.clone()).collect();
        self.folder_selected = if self.folder_matches.is_empty() {
            None
        } else {
            Some(0)
        };
    }

    fn move_folder(&mut self, delta: isize) {
        let len = self.folder_matches.len();
        if len == 0 {
            self.folder_selected = None;
            return;
        }
        self.folder_selected = match (self.folder_selected, delta < 0) {
            (None, true) => None,
            (None, false) => Some(0),
            (Some(0), true) => None,
            (Some(i), true) => Some(i - 1),
            (Some(i), false) => Some((i + 1).min(len - 1)),
        };
    }

    pub fn chosen_folder(&self) -> Option<&FolderEntry> {
        self.folder_selected.and_then(|i| self.folder_matches.get(i))
    }
}

/// Rows of the settings dialog, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    GridSize,
    SearchEngine,
    ShowMostVisited,
    ShowRecentlyAdded,
    Animations,
    Language,
    Save,
    Reset,
}

impl SettingsRow {
    pub const ALL: [SettingsRow; 8] = [
        SettingsRow::GridSize,
        SettingsRow::SearchEngine,
        SettingsRow::ShowMostVisited,
        SettingsRow::ShowRecentlyAdded,
        SettingsRow::Animations,
        SettingsRow::Language,
        SettingsRow::Save,
        SettingsRow::Reset,
    ];
}

/// Settings dialog draft; nothing is persisted until Save.
#[derive(Debug, Default)]
pub struct SettingsForm {
    pub draft: Settings,
    pub row: usize,
}

impl SettingsForm {
    pub fn current_row(&self) -> SettingsRow {
        SettingsRow::ALL[self.row.min(SettingsRow::ALL.len() - 1)]
    }

    fn move_row(&mut self, delta: isize) {
        let len = SettingsRow::ALL.len() as isize;
        self.row = (self.row as isize + delta).rem_euclid(len) as usize;
    }

    /// Step the value on the current row.
    fn adjust(&mut self, delta: isize) {
        let row = self.current_row();
        let d = &mut self.draft;
        match row {
            SettingsRow::GridSize => {
                let all = GridSize::ALL;
                let idx = all.iter().position(|g| *g == d.grid_size).unwrap_or(1) as isize;
                d.grid_size = all[(idx + delta).rem_euclid(all.len() as isize) as usize];
            }
            SettingsRow::SearchEngine => {
                d.default_search_engine = d.default_search_engine.cycle(delta);
            }
            SettingsRow::ShowMostVisited => d.show_most_visited = !d.show_most_visited,
            SettingsRow::ShowRecentlyAdded => d.show_recently_added = !d.show_recently_added,
            SettingsRow::Animations => d.animations_enabled = !d.animations_enabled,
            SettingsRow::Language => d.language = d.language.next(),
            SettingsRow::Save | SettingsRow::Reset => {}
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────────────────

/// Edits to whichever text input has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEdit {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// Everything the user can do. Keys and mouse clicks are translated into
/// commands by `handler`; `App::dispatch` applies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    FocusWebSearch,
    FocusBookmarkSearch,
    /// Close the dialog, or leave the focused input.
    Escape,
    Input(InputEdit),
    /// Enter in a search input.
    Submit,
    SuggestionMove(isize),
    /// Click on suggestion `n` of the dropdown.
    PickSuggestion(usize),
    SelectQuickView(QuickView),
    SelectPrimary(TabId),
    SelectSub(String),
    CyclePrimary(isize),
    CycleSub(isize),
    ClickBreadcrumb(usize),
    BreadcrumbParent,
    Move { dx: isize, dy: isize },
    OpenCard { index: usize, target: OpenTarget },
    OpenSelected(OpenTarget),
    EditCard(usize),
    EditSelected,
    DeleteCard(usize),
    DeleteSelected,
    /// Visually move the selected card by `delta` positions.
    MoveCard(isize),
    CycleSort,
    CycleFilter,
    ToggleLayout,
    ToggleDarkMode,
    CycleLanguage,
    OpenAddBookmark,
    OpenSettings,
    OpenHelp,
    BackToTop,
    FormNextField,
    FormPrevField,
    FormUp,
    FormDown,
    /// Enter/confirm in the current dialog.
    ConfirmDialog,
    /// Delete button of the edit dialog.
    DeleteFromEdit,
    SettingsAdjust(isize),
    /// Click on settings row `n`: steps a value, or runs Save/Reset.
    SettingsClick(usize),
}

/// Network work the main loop should spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Suggestions(String),
    Favicon { host: String, url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FaviconState {
    Pending,
    Loaded,
    Failed,
}

/// Runtime options taken from the config file and CLI.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub fetch_favicons: bool,
    pub suggestions: bool,
    pub bookmark_debounce: Duration,
    pub suggest_debounce: Duration,
    pub custom_colors: Option<ThemeColorsConfig>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl AppOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fetch_favicons: config.fetch_favicons(),
            suggestions: config.suggestions_enabled(),
            bookmark_debounce: Duration::from_millis(config.bookmark_debounce_ms()),
            suggest_debounce: Duration::from_millis(config.suggest_debounce_ms()),
            custom_colors: config.theme.custom.clone(),
        }
    }
}

fn epoch_now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

// ── App ──────────────────────────────────────────────────────────────────────

/// Main application state.
pub struct App<H, N> {
    pub host: H,
    pub navigator: N,
    pub nav: NavigationState,
    pub settings_store: SettingsStore,
    pub loc: Localizer,
    pub theme: ThemeColors,
    pub options: AppOptions,

    /// Cards for the current view.
    pub cards: RenderedList,
    pub selected: usize,
    pub scroll_row: usize,
    /// Columns in the last drawn grid.
    pub grid_columns: usize,
    pub layout: Layout,
    pub focus: Focus,

    pub web_input: TextInput,
    pub suggestions: Vec<String>,
    pub suggestion_selected: Option<usize>,
    pub bookmark_input: TextInput,

    pub mode: AppMode,
    pub form: BookmarkForm,
    pub settings_form: SettingsForm,
    /// Folder index for the add dialog.
    pub folders: Vec<FolderEntry>,

    pub toasts: Vec<Toast>,
    pub loading: bool,
    pub back_to_top_visible: bool,
    pub spinner_frame: usize,
    pub should_quit: bool,
    /// Clickable regions from the last frame.
    pub hit_map: Vec<(Rect, Command)>,

    bookmark_debounce: Debouncer<String>,
    suggest_debounce: Debouncer<String>,
    back_to_top: Throttler<bool>,
    favicons: HashMap<String, FaviconState>,
    pending_fetches: Vec<Fetch>,
    store_revision: Option<SystemTime>,
}

impl<H: BookmarkHost, N: Navigator> App<H, N> {
    pub fn new(host: H, navigator: N, settings_store: SettingsStore, options: AppOptions) -> Self {
        let settings = settings_store.settings().clone();
        Self {
            host,
            navigator,
            nav: NavigationState::new(),
            loc: Localizer::new(settings.language),
            theme: resolve_theme(settings.dark_mode, options.custom_colors.as_ref()),
            settings_store,
            cards: RenderedList::Cards(Vec::new()),
            selected: 0,
            scroll_row: 0,
            grid_columns: 1,
            layout: Layout::Grid,
            focus: Focus::Grid,
            web_input: TextInput::default(),
            suggestions: Vec::new(),
            suggestion_selected: None,
            bookmark_input: TextInput::default(),
            mode: AppMode::Normal,
            form: BookmarkForm::default(),
            settings_form: SettingsForm::default(),
            folders: Vec::new(),
            toasts: Vec::new(),
            loading: true,
            back_to_top_visible: false,
            spinner_frame: 0,
            should_quit: false,
            hit_map: Vec::new(),
            bookmark_debounce: Debouncer::new(options.bookmark_debounce),
            suggest_debounce: Debouncer::new(options.suggest_debounce),
            back_to_top: Throttler::new(BACK_TO_TOP_THROTTLE),
            favicons: HashMap::new(),
            pending_fetches: Vec::new(),
            store_revision: None,
            options,
        }
    }

    pub fn settings(&self) -> &Settings {
        self.settings_store.settings()
    }

    /// Web search hint naming the engine a submit will go to.
    pub fn web_search_placeholder(&self) -> String {
        let engine = self.settings().default_search_engine.name();
        self.loc.translate("search.placeholder", &[("engine", engine)])
    }

    // ── Loading ─────────────────────────────────────────────────────────────

    /// Fetch the whole tree and rebuild every derived list. On failure the
    /// last good state stays on screen and `false` is returned.
    pub fn reload(&mut self) -> bool {
        self.loading = true;
        let loaded = match self.load_tree() {
            Ok(()) => {
                log::info!(
                    "loaded {} bookmarks, {} folders",
                    self.nav.all_bookmarks.len(),
                    self.folders.len()
                );
                self.ensure_visible_quick_view();
                self.refresh_view();
                true
            }
            Err(e) => {
                log::error!("loading bookmarks failed: {}", e);
                self.toast(ToastKind::Error, self.loc.t("toast.errorLoadingBookmarks"));
                false
            }
        };
        self.loading = false;
        loaded
    }

    /// Nothing is replaced unless the navigation state rebuilt cleanly.
    fn load_tree(&mut self) -> crate::error::Result<()> {
        let tree = self.host.get_tree()?;
        let top_sites = self.host.top_sites().unwrap_or_else(|e| {
            log::warn!("top sites unavailable: {}", e);
            Vec::new()
        });
        self.nav.load(&self.host, &tree, &top_sites)?;
        let roots = tree
            .first()
            .and_then(|root| root.children.as_deref())
            .unwrap_or_default();
        self.folders = list_folders(roots, "")
            .into_iter()
            .filter(|f| !f.title.is_empty())
            .collect();
        self.store_revision = self.host.revision();
        Ok(())
    }

    /// The bookmark file changed on disk. Our own writes are recognized by
    /// their revision and skipped.
    pub fn on_store_changed(&mut self) {
        let revision = self.host.revision();
        if revision.is_some() && revision == self.store_revision {
            return;
        }
        log::info!("bookmark store changed externally, reloading");
        if self.reload() {
            self.toast(ToastKind::Info, self.loc.t("toast.bookmarksRefreshed"));
        }
    }

    /// Re-render cards for the current view.
    pub fn refresh_view(&mut self) {
        let mode = self.nav.current_view.display_mode();
        self.cards = render::render(self.nav.displayed(), mode, &self.loc);
        for card in self.cards.cards_mut() {
            match self.favicons.get(&card.host) {
                Some(FaviconState::Failed) => card.favicon.on_error(),
                Some(_) => {}
                None if self.options.fetch_favicons && !card.fallback_host && !card.host.is_empty() => {
                    self.favicons.insert(card.host.clone(), FaviconState::Pending);
                    self.pending_fetches.push(Fetch::Favicon {
                        host: card.host.clone(),
                        url: card.favicon.request_url.clone(),
                    });
                }
                None => {}
            }
        }
        let len = self.cards.len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Quick views currently enabled in settings.
    pub fn visible_quick_views(&self) -> Vec<QuickView> {
        let s = self.settings();
        QuickView::ALL
            .into_iter()
            .filter(|v| match v {
                QuickView::Bookmarks => true,
                QuickView::MostVisited => s.show_most_visited,
                QuickView::RecentlyAdded => s.show_recently_added,
            })
            .collect()
    }

    fn ensure_visible_quick_view(&mut self) {
        if !self.visible_quick_views().contains(&self.nav.current_view) {
            self.run_nav(|nav, host| nav.select_quick_view(host, QuickView::Bookmarks));
        }
    }

    /// Run a navigation transition against the host, toasting on failure.
    fn run_nav<F>(&mut self, f: F)
    where
        F: FnOnce(&mut NavigationState, &dyn BookmarkHost) -> crate::error::Result<()>,
    {
        if let Err(e) = f(&mut self.nav, &self.host) {
            log::error!("navigation failed: {}", e);
            self.toast(ToastKind::Error, self.loc.t("toast.errorLoadingBookmarks"));
        }
        self.selected = 0;
        self.scroll_row = 0;
        self.refresh_view();
    }

    // ── Toasts ──────────────────────────────────────────────────────────────

    pub fn toast(&mut self, kind: ToastKind, message: String) {
        self.toasts.push(Toast {
            message,
            kind,
            created: Instant::now(),
        });
    }

    /// Drop toasts older than `TOAST_TTL`.
    pub fn clear_expired_toasts(&mut self, now: Instant) {
        self.toasts
            .retain(|t| now.saturating_duration_since(t.created) < TOAST_TTL);
    }

    // ── Timers and background work ──────────────────────────────────────────

    /// Advance timers: toasts, debounced searches, the back-to-top throttle.
    pub fn on_tick(&mut self, now: Instant) {
        self.clear_expired_toasts(now);

        if let Some(term) = self.bookmark_debounce.poll(now) {
            self.run_nav(|nav, host| nav.search(host, &term));
        }

        if let Some(query) = self.suggest_debounce.poll(now) {
            let query = query.trim().to_string();
            if query.is_empty() || !self.options.suggestions {
                self.suggestions.clear();
                self.suggestion_selected = None;
            } else {
                self.pending_fetches.push(Fetch::Suggestions(query));
            }
        }

        if let Some(visible) = self.back_to_top.poll(now) {
            self.back_to_top_visible = visible;
        }

        if self.settings().animations_enabled {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    /// Network requests queued since the last call.
    pub fn take_fetches(&mut self) -> Vec<Fetch> {
        std::mem::take(&mut self.pending_fetches)
    }

    /// Suggestions arrived. Results for a query the user has since changed
    /// are dropped.
    pub fn on_suggestions(&mut self, query: &str, suggestions: Vec<String>) {
        if self.web_input.as_str().trim() != query || self.focus != Focus::WebSearch {
            return;
        }
        self.suggestions = suggestions;
        self.suggestion_selected = None;
    }

    pub fn on_favicon(&mut self, host: &str, ok: bool) {
        let state = if ok {
            FaviconState::Loaded
        } else {
            FaviconState::Failed
        };
        self.favicons.insert(host.to_string(), state);
        if !ok {
            log::debug!("favicon for {} failed", host);
            for card in self.cards.cards_mut().iter_mut().filter(|c| c.host == host) {
                card.favicon.on_error();
            }
        }
    }

    /// Record the grid's scroll position; drives the back-to-top hint.
    pub fn set_scroll_row(&mut self, row: usize, now: Instant) {
        if row == self.scroll_row {
            return;
        }
        self.scroll_row = row;
        if let Some(visible) = self.back_to_top.call(row > BACK_TO_TOP_ROWS, now) {
            self.back_to_top_visible = visible;
        }
    }

    // ── Command reducer ─────────────────────────────────────────────────────

    pub fn dispatch(&mut self, cmd: Command) {
        self.dispatch_at(cmd, Instant::now());
    }

    pub fn dispatch_at(&mut self, cmd: Command, now: Instant) {
        match cmd {
            Command::Quit => self.should_quit = true,
            Command::FocusWebSearch => {
                self.mode = AppMode::Normal;
                self.focus = Focus::WebSearch;
            }
            Command::FocusBookmarkSearch => {
                self.mode = AppMode::Normal;
                self.focus = Focus::BookmarkSearch;
            }
            Command::Escape => self.escape(),
            Command::Input(edit) => self.edit_input(edit, now),
            Command::Submit => self.submit_search(),
            Command::SuggestionMove(delta) => self.move_suggestion(delta),
            Command::PickSuggestion(index) => {
                if index < self.suggestions.len() {
                    self.focus = Focus::WebSearch;
                    self.suggestion_selected = Some(index);
                    self.submit_search();
                }
            }
            Command::SelectQuickView(view) => {
                if self.visible_quick_views().contains(&view) {
                    self.clear_bookmark_search();
                    self.run_nav(|nav, host| nav.select_quick_view(host, view));
                }
            }
            Command::SelectPrimary(tab) => {
                self.clear_bookmark_search();
                self.run_nav(|nav, host| nav.select_primary(host, &tab));
            }
            Command::SelectSub(id) => {
                self.clear_bookmark_search();
                self.run_nav(|nav, host| nav.select_sub(host, &id));
            }
            Command::CyclePrimary(delta) => {
                self.clear_bookmark_search();
                self.run_nav(|nav, host| nav.cycle_primary(host, delta));
            }
            Command::CycleSub(delta) => {
                self.clear_bookmark_search();
                self.run_nav(|nav, host| nav.cycle_sub(host, delta));
            }
            Command::ClickBreadcrumb(index) => {
                self.run_nav(|nav, host| nav.click_breadcrumb(host, index));
            }
            Command::BreadcrumbParent => {
                let len = self.nav.breadcrumb.len();
                if len >= 2 {
                    self.run_nav(|nav, host| nav.click_breadcrumb(host, len - 2));
                }
            }
            Command::Move { dx, dy } => self.move_selection(dx, dy),
            Command::OpenCard { index, target } => self.open_card(index, target),
            Command::OpenSelected(target) => self.open_card(self.selected, target),
            Command::EditCard(index) => self.open_edit(index),
            Command::EditSelected => self.open_edit(self.selected),
            Command::DeleteCard(index) => self.open_delete(index, false),
            Command::DeleteSelected => self.open_delete(self.selected, false),
            Command::MoveCard(delta) => self.move_card(delta),
            Command::CycleSort => {
                let sort = self.nav.sort.next();
                self.nav.apply_sort(sort, epoch_now_ms());
                self.refresh_view();
            }
            Command::CycleFilter => {
                let filter = self.nav.filter.next();
                self.nav.apply_filter(filter, epoch_now_ms());
                self.refresh_view();
            }
            Command::ToggleLayout => {
                self.layout = match self.layout {
                    Layout::Grid => Layout::List,
                    Layout::List => Layout::Grid,
                }
            }
            Command::ToggleDarkMode => self.toggle_dark_mode(),
            Command::CycleLanguage => {
                let next = self.settings().language.next();
                match self.settings_store.set_language(next).map(|_| ()) {
                    Ok(()) => self.apply_settings(),
                    Err(e) => self.persist_failed(e),
                }
            }
            Command::OpenAddBookmark => {
                self.form = BookmarkForm::for_add(&self.folders);
                self.mode = AppMode::Dialog(DialogKind::AddBookmark);
            }
            Command::OpenSettings => {
                self.settings_form = SettingsForm {
                    draft: self.settings().clone(),
                    row: 0,
                };
                self.mode = AppMode::Dialog(DialogKind::Settings);
            }
            Command::OpenHelp => self.mode = AppMode::Dialog(DialogKind::Help),
            Command::BackToTop => {
                self.selected = 0;
                self.set_scroll_row(0, now);
            }
            Command::FormNextField => self.form.cycle_field(1),
            Command::FormPrevField => self.form.cycle_field(-1),
            Command::FormUp => self.form_vertical(-1),
            Command::FormDown => self.form_vertical(1),
            Command::ConfirmDialog => self.confirm_dialog(),
            Command::DeleteFromEdit => {
                if let AppMode::Dialog(DialogKind::EditBookmark { id }) = self.mode.clone() {
                    self.mode = AppMode::Dialog(DialogKind::DeleteConfirm {
                        id,
                        title: self.form.title.as_str().to_string(),
                        from_edit: true,
                    });
                }
            }
            Command::SettingsAdjust(delta) => self.settings_form.adjust(delta),
            Command::SettingsClick(row) => {
                if row < SettingsRow::ALL.len() {
                    self.settings_form.row = row;
                    match SettingsRow::ALL[row] {
                        SettingsRow::Save | SettingsRow::Reset => self.confirm_dialog(),
                        _ => self.settings_form.adjust(1),
                    }
                }
            }
        }
    }

    fn escape(&mut self) {
        match self.mode.clone() {
            AppMode::Dialog(DialogKind::DeleteConfirm {
                id,
                from_edit: true,
                ..
            }) => {
                self.mode = AppMode::Dialog(DialogKind::EditBookmark { id });
            }
            AppMode::Dialog(_) => self.close_dialog(),
            AppMode::Normal => {
                self.focus = Focus::Grid;
                self.suggestions.clear();
                self.suggestion_selected = None;
            }
        }
    }

    pub fn close_dialog(&mut self) {
        self.mode = AppMode::Normal;
        self.form = BookmarkForm::default();
    }

    fn edit_input(&mut self, edit: InputEdit, now: Instant) {
        let apply = |input: &mut TextInput| match edit {
            InputEdit::Char(c) => input.insert_char(c),
            InputEdit::Backspace => input.delete_char(),
            InputEdit::Delete => input.delete_forward(),
            InputEdit::Left => input.move_left(),
            InputEdit::Right => input.move_right(),
            InputEdit::Home => input.home(),
            InputEdit::End => input.end(),
        };
        let changes_text = matches!(
            edit,
            InputEdit::Char(_) | InputEdit::Backspace | InputEdit::Delete
        );

        match &self.mode {
            AppMode::Dialog(DialogKind::AddBookmark | DialogKind::EditBookmark { .. }) => {
                apply(self.form.active_input_mut());
                if changes_text && self.form.field == FormField::Folder {
                    self.form.refilter(&self.folders);
                }
            }
            AppMode::Dialog(_) => {}
            AppMode::Normal => match self.focus {
                Focus::WebSearch => {
                    apply(&mut self.web_input);
                    if changes_text {
                        self.suggestion_selected = None;
                        self.suggest_debounce
                            .call(self.web_input.as_str().to_string(), now);
                    }
                }
                Focus::BookmarkSearch => {
                    apply(&mut self.bookmark_input);
                    if changes_text {
                        self.bookmark_debounce
                            .call(self.bookmark_input.as_str().to_string(), now);
                    }
                }
                Focus::Grid => {}
            },
        }
    }

    fn clear_bookmark_search(&mut self) {
        self.bookmark_input.clear();
        self.bookmark_debounce.cancel();
    }

    fn move_suggestion(&mut self, delta: isize) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        self.suggestion_selected = match (self.suggestion_selected, delta < 0) {
            (None, false) => Some(0),
            (None, true) => Some(len - 1),
            (Some(0), true) => None,
            (Some(i), true) => Some(i - 1),
            (Some(i), false) if i + 1 >= len => None,
            (Some(i), false) => Some(i + 1),
        };
    }

    fn submit_search(&mut self) {
        match self.focus {
            Focus::WebSearch => {
                let query = match self.suggestion_selected.and_then(|i| self.suggestions.get(i)) {
                    Some(s) => s.clone(),
                    None => self.web_input.as_str().to_string(),
                };
                self.suggest_debounce.cancel();
                let engine = self.settings().default_search_engine;
                if let Some(url) = resolve_query(&query, engine) {
                    self.open_url(&url, OpenTarget::CurrentTab);
                }
            }
            Focus::BookmarkSearch => {
                // Enter applies the pending search right away.
                self.bookmark_debounce.cancel();
                let term = self.bookmark_input.as_str().to_string();
                self.run_nav(|nav, host| nav.search(host, &term));
                self.focus = Focus::Grid;
            }
            Focus::Grid => self.open_card(self.selected, OpenTarget::CurrentTab),
        }
    }

    fn move_selection(&mut self, dx: isize, dy: isize) {
        let len = self.cards.len();
        if len == 0 {
            return;
        }
        let columns = match self.layout {
            Layout::Grid => self.grid_columns.max(1),
            Layout::List => 1,
        };
        let step = dx + dy * columns as isize;
        let next = (self.selected as isize + step).clamp(0, len as isize - 1);
        self.selected = next as usize;
    }

    fn open_url(&mut self, url: &str, target: OpenTarget) {
        match self.navigator.open(url, target) {
            Ok(()) => {
                if target == OpenTarget::CurrentTab {
                    self.should_quit = true;
                }
            }
            Err(e) => {
                log::error!("open failed: {}", e);
                let msg = self.loc.translate("toast.openFailed", &[("url", url)]);
                self.toast(ToastKind::Error, msg);
            }
        }
    }

    fn open_card(&mut self, index: usize, target: OpenTarget) {
        if let Some(url) = self.cards.cards().get(index).map(|c| c.url.clone()) {
            self.selected = index;
            self.open_url(&url, target);
        }
    }

    /// Cards that can be edited or deleted: grid-mode cards only.
    fn actionable_card(&self, index: usize) -> Option<(String, String, String)> {
        let card = self.cards.cards().get(index)?;
        if card.actions.is_empty() {
            return None;
        }
        let title = self
            .nav
            .displayed()
            .iter()
            .find(|b| b.id == card.id)
            .map(|b| b.title.clone())
            .unwrap_or_default();
        Some((card.id.clone(), title, card.url.clone()))
    }

    fn open_edit(&mut self, index: usize) {
        if let Some((id, title, url)) = self.actionable_card(index) {
            self.selected = index;
            self.form = BookmarkForm::for_edit(&title, &url);
            self.mode = AppMode::Dialog(DialogKind::EditBookmark { id });
        }
    }

    fn open_delete(&mut self, index: usize, from_edit: bool) {
        if let Some((id, title, _)) = self.actionable_card(index) {
            self.selected = index;
            self.mode = AppMode::Dialog(DialogKind::DeleteConfirm {
                id,
                title,
                from_edit,
            });
        }
    }

    fn move_card(&mut self, delta: isize) {
        let len = self.cards.len();
        let target = self.selected as isize + delta;
        if target < 0 || target as usize >= len {
            return;
        }
        let target = target as usize;
        let dragged_id = match self.cards.cards().get(self.selected) {
            Some(card) => card.id.clone(),
            None => return,
        };
        let target_id = self.cards.cards()[target].id.clone();
        let list = self.nav.displayed_mut();
        let from = list.iter().position(|b| b.id == dragged_id);
        let to = list.iter().position(|b| b.id == target_id);
        if let (Some(from), Some(to)) = (from, to) {
            if render::reorder(list, from, to) {
                self.refresh_view();
                self.selected = target;
                self.toast(ToastKind::Success, self.loc.t("toast.bookmarkReordered"));
            }
        }
    }

    fn form_vertical(&mut self, delta: isize) {
        match self.mode {
            AppMode::Dialog(DialogKind::Settings) => self.settings_form.move_row(delta),
            AppMode::Dialog(_) if self.form.field == FormField::Folder => {
                self.form.move_folder(delta)
            }
            AppMode::Dialog(_) => self.form.cycle_field(delta),
            AppMode::Normal => {}
        }
    }

    // ── Dialog confirmation and mutations ───────────────────────────────────

    fn confirm_dialog(&mut self) {
        let AppMode::Dialog(kind) = self.mode.clone() else {
            return;
        };
        match kind {
            DialogKind::AddBookmark => {
                let folder = self.form.chosen_folder().map(|f| f.id.clone());
                let result = mutation::create(
                    &mut self.host,
                    self.form.title.as_str(),
                    self.form.url.as_str(),
                    folder.as_deref(),
                );
                self.finish_mutation(result, false);
            }
            DialogKind::EditBookmark { id } => {
                let result = mutation::update(
                    &mut self.host,
                    &id,
                    self.form.title.as_str(),
                    self.form.url.as_str(),
                );
                self.finish_mutation(result, false);
            }
            DialogKind::DeleteConfirm { id, from_edit, .. } => {
                let result = mutation::remove(&mut self.host, &id);
                self.finish_mutation(result, !from_edit);
            }
            DialogKind::Settings => self.confirm_settings(),
            DialogKind::Help => self.close_dialog(),
        }
    }

    /// Success: toast, close, reload once. Failure: toast, keep the dialog.
    fn finish_mutation(
        &mut self,
        result: Result<MutationKind, MutationError>,
        generic_delete_error: bool,
    ) {
        match result {
            Ok(kind) => {
                log::info!("{:?} succeeded", kind);
                self.toast(ToastKind::Success, self.loc.t(kind.success_key()));
                self.close_dialog();
                self.reload();
            }
            Err(err) => {
                log::warn!("mutation rejected: {}", err);
                let message = match &err {
                    MutationError::Host {
                        kind: MutationKind::Remove,
                        ..
                    } if generic_delete_error => {
                        self.close_dialog();
                        self.loc.t("toast.bookmarkDeleteGenericError")
                    }
                    _ => err.toast_message(&self.loc),
                };
                self.toast(ToastKind::Error, message);
            }
        }
    }

    fn confirm_settings(&mut self) {
        let result = match self.settings_form.current_row() {
            SettingsRow::Reset => self.settings_store.reset().map(|_| ()),
            _ => {
                let patch = SettingsPatch::from_settings(&self.settings_form.draft);
                self.settings_store.save(&patch).map(|_| ())
            }
        };
        match result {
            Ok(()) => {
                self.apply_settings();
                self.toast(ToastKind::Success, self.loc.t("toast.settingsSaved"));
                self.close_dialog();
            }
            Err(e) => self.persist_failed(e),
        }
    }

    fn persist_failed(&mut self, err: crate::error::AppError) {
        log::error!("persisting settings failed: {}", err);
        self.toast(ToastKind::Error, err.to_string());
    }

    /// Re-apply theme, language and quick-view visibility from settings.
    pub fn apply_settings(&mut self) {
        let settings = self.settings().clone();
        self.loc = Localizer::new(settings.language);
        self.theme = resolve_theme(settings.dark_mode, self.options.custom_colors.as_ref());
        self.ensure_visible_quick_view();
        self.refresh_view();
    }

    fn toggle_dark_mode(&mut self) {
        let on = !self.settings().dark_mode;
        match self.settings_store.set_dark_mode(on) {
            Ok(()) => {
                self.theme = resolve_theme(on, self.options.custom_colors.as_ref());
            }
            Err(e) => self.persist_failed(e),
        }
    }
}

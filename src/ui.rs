use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout as RatatuiLayout, Rect},
    style::Style,
    widgets::{Block, Widget},
    Frame,
};

use crate::app::{App, AppMode, Command, DialogKind, Focus, Layout};
use crate::bookmarks::BookmarkHost;
use crate::components::dialog::DialogWidget;
use crate::components::grid::{self, CardGridWidget, ICON_CARD_WIDTH};
use crate::components::help::HelpOverlay;
use crate::components::search_bar::{SearchBarWidget, SuggestionsWidget};
use crate::components::status_bar::StatusBarWidget;
use crate::components::tabs::{StripItem, TabStripWidget};
use crate::navigation::{QuickView, TabId};
use crate::navigator::Navigator;
use crate::render::DisplayMode;

/// Vertical slots of the main screen.
struct Areas {
    header: Rect,
    quick: Rect,
    primary: Rect,
    sub: Rect,
    breadcrumb: Rect,
    search: Rect,
    grid: Rect,
    status: Rect,
}

fn split(area: Rect, has_sub_tabs: bool) -> Areas {
    let chunks = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(if has_sub_tabs { 1 } else { 0 }),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);
    Areas {
        header: chunks[0],
        quick: chunks[1],
        primary: chunks[2],
        sub: chunks[3],
        breadcrumb: chunks[4],
        search: chunks[5],
        grid: chunks[6],
        status: chunks[7],
    }
}

fn card_width<H: BookmarkHost, N: Navigator>(app: &App<H, N>) -> u16 {
    match app.nav.current_view.display_mode() {
        DisplayMode::Icon => ICON_CARD_WIDTH,
        DisplayMode::Grid => app.settings().grid_size.card_width(),
    }
}

/// Render the application UI and record the clickable regions of this frame.
pub fn render<H: BookmarkHost, N: Navigator>(app: &mut App<H, N>, frame: &mut Frame) {
    let area = frame.area();
    let areas = split(area, !app.nav.sub_tabs.is_empty());

    // Keep the selected card on screen before anything borrows the app.
    let (columns, row_height) = grid::geometry(areas.grid.width, card_width(app), app.layout);
    let visible_rows = (areas.grid.height / row_height.max(1)).max(1) as usize;
    app.grid_columns = columns;
    let scroll = grid::scroll_for_selection(app.selected, columns, visible_rows, app.scroll_row);
    app.set_scroll_row(scroll, Instant::now());

    app.hit_map = draw(app, frame);
}

/// Draw every widget; returns the clickable regions, topmost last.
fn draw<H: BookmarkHost, N: Navigator>(app: &App<H, N>, frame: &mut Frame) -> Vec<(Rect, Command)> {
    let area = frame.area();
    let areas = split(area, !app.nav.sub_tabs.is_empty());
    let theme = &app.theme;
    let loc = &app.loc;
    let rtl = loc.language().is_rtl();
    let mut hits: Vec<(Rect, Command)> = Vec::new();

    Block::default()
        .style(Style::default().bg(theme.bg).fg(theme.fg))
        .render(area, frame.buffer_mut());

    // ── Header ──────────────────────────────────────────────────────────────
    let header_title = loc.t("header.title");
    let web_placeholder = app.web_search_placeholder();
    frame.render_widget(
        SearchBarWidget::new(&app.web_input, &web_placeholder, theme, Command::FocusWebSearch)
            .title(&header_title)
            .focused(app.focus == Focus::WebSearch && app.mode == AppMode::Normal)
            .hits(&mut hits),
        areas.header,
    );

    // ── Tabs ────────────────────────────────────────────────────────────────
    let quick_items: Vec<StripItem> = app
        .visible_quick_views()
        .into_iter()
        .map(|view| StripItem {
            label: loc.t(view.label_key()),
            active: view == app.nav.current_view,
            command: Command::SelectQuickView(view),
        })
        .collect();
    frame.render_widget(
        TabStripWidget::new(&quick_items, theme)
            .separator(" │ ")
            .rtl(rtl)
            .hits(&mut hits),
        areas.quick,
    );

    if app.nav.current_view == QuickView::Bookmarks {
        let primary_items: Vec<StripItem> = app
            .nav
            .primary_tabs
            .iter()
            .map(|tab| StripItem {
                label: tab.label(loc),
                active: app.nav.is_primary_highlighted(&tab.id),
                command: Command::SelectPrimary(tab.id.clone()),
            })
            .collect();
        frame.render_widget(
            TabStripWidget::new(&primary_items, theme)
                .rtl(rtl)
                .hits(&mut hits),
            areas.primary,
        );

        let sub_items: Vec<StripItem> = app
            .nav
            .sub_tabs
            .iter()
            .filter_map(|tab| match &tab.id {
                TabId::Folder(id) => Some(StripItem {
                    label: tab.label(loc),
                    active: app.nav.is_sub_highlighted(id),
                    command: Command::SelectSub(id.clone()),
                }),
                TabId::All => None,
            })
            .collect();
        frame.render_widget(
            TabStripWidget::new(&sub_items, theme)
                .prefix("  ")
                .rtl(rtl)
                .hits(&mut hits),
            areas.sub,
        );
    }

    // ── Breadcrumbs ─────────────────────────────────────────────────────────
    let crumb_count = app.nav.breadcrumb.len();
    let crumb_items: Vec<StripItem> = app
        .nav
        .breadcrumb
        .iter()
        .enumerate()
        .map(|(i, item)| StripItem {
            label: item.label(loc),
            active: i + 1 == crumb_count,
            command: Command::ClickBreadcrumb(i),
        })
        .collect();
    frame.render_widget(
        TabStripWidget::new(&crumb_items, theme)
            .separator(if rtl { " ‹ " } else { " › " })
            .inactive_fg(theme.crumb_fg)
            .rtl(rtl)
            .hits(&mut hits),
        areas.breadcrumb,
    );

    // ── Bookmark search ─────────────────────────────────────────────────────
    let search_placeholder = loc.t("bookmarkSearch.placeholder");
    let layout_label = match app.layout {
        Layout::Grid => loc.t("view.gridTooltip"),
        Layout::List => loc.t("view.listTooltip"),
    };
    frame.render_widget(
        SearchBarWidget::new(
            &app.bookmark_input,
            &search_placeholder,
            theme,
            Command::FocusBookmarkSearch,
        )
        .focused(app.focus == Focus::BookmarkSearch && app.mode == AppMode::Normal)
        .indicators(vec![
            (loc.t(app.nav.sort.label_key()), Command::CycleSort),
            (loc.t(app.nav.filter.label_key()), Command::CycleFilter),
            (layout_label, Command::ToggleLayout),
        ])
        .hits(&mut hits),
        areas.search,
    );

    // ── Cards ───────────────────────────────────────────────────────────────
    let loading_message = loc.t("loading.message");
    let mut grid_widget = CardGridWidget::new(&app.cards, theme)
        .selected((app.focus == Focus::Grid).then_some(app.selected))
        .scroll_row(app.scroll_row)
        .card_width(card_width(app))
        .layout(app.layout);
    if app.loading {
        grid_widget = grid_widget.loading(&loading_message, app.spinner_frame);
    }
    frame.render_widget(grid_widget.hits(&mut hits), areas.grid);

    // ── Status bar ──────────────────────────────────────────────────────────
    let summary = loc.translate(
        "status.count",
        &[("count", &app.nav.displayed().len().to_string())],
    );
    let back_to_top = loc.t("backToTop.tooltip");
    let mut status = StatusBarWidget::new(&summary, theme).toast(app.toasts.last());
    if app.back_to_top_visible {
        status = status.back_to_top(&back_to_top);
    }
    frame.render_widget(status.hits(&mut hits), areas.status);

    // ── Overlays ────────────────────────────────────────────────────────────
    if app.focus == Focus::WebSearch && app.mode == AppMode::Normal && !app.suggestions.is_empty()
    {
        let dropdown = SuggestionsWidget::new(&app.suggestions, app.suggestion_selected, theme);
        let below = areas.header.y + areas.header.height;
        let height = dropdown
            .height()
            .min(area.height.saturating_sub(below));
        let rect = Rect::new(areas.header.x + 1, below, areas.header.width.saturating_sub(2), height);
        frame.render_widget(dropdown.hits(&mut hits), rect);
    }

    match &app.mode {
        AppMode::Normal => {}
        AppMode::Dialog(DialogKind::Help) => {
            hits.clear();
            frame.render_widget(HelpOverlay::new(loc, theme), area);
        }
        AppMode::Dialog(_) => {
            // Only the dialog is clickable while it is open.
            hits.clear();
            frame.render_widget(
                DialogWidget::new(&app.mode, &app.form, &app.settings_form, loc, theme)
                    .hits(&mut hits),
                area,
            );
        }
    }

    hits
}

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Widget},
};

use crate::app::{Command, Layout};
use crate::navigator::OpenTarget;
use crate::render::{Card, CardAction, RenderedList, FALLBACK_FAVICON};
use crate::theme::ThemeColors;

/// Rows taken by one card in grid layout.
pub const CARD_HEIGHT: u16 = 4;
/// Card width for icon-mode lists (most visited).
pub const ICON_CARD_WIDTH: u16 = 20;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Columns and row height for `layout` in an area `width` wide.
pub fn geometry(width: u16, card_width: u16, layout: Layout) -> (usize, u16) {
    match layout {
        Layout::Grid => ((width / card_width.max(1)).max(1) as usize, CARD_HEIGHT),
        Layout::List => (1, 1),
    }
}

/// Scroll offset (in rows) that keeps `selected` on screen.
pub fn scroll_for_selection(
    selected: usize,
    columns: usize,
    visible_rows: usize,
    current: usize,
) -> usize {
    let row = selected / columns.max(1);
    let visible_rows = visible_rows.max(1);
    if row < current {
        row
    } else if row >= current + visible_rows {
        row + 1 - visible_rows
    } else {
        current
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn favicon_glyph(card: &Card) -> String {
    if card.favicon.fallback_applied || card.fallback_host {
        return FALLBACK_FAVICON.to_string();
    }
    card.host
        .trim_start_matches("www.")
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| FALLBACK_FAVICON.to_string())
}

fn action_glyph(action: CardAction) -> &'static str {
    match action {
        CardAction::Open => "↗",
        CardAction::Edit => "✎",
        CardAction::Delete => "✕",
    }
}

fn action_command(action: CardAction, index: usize) -> Command {
    match action {
        CardAction::Open => Command::OpenCard {
            index,
            target: OpenTarget::NewTab,
        },
        CardAction::Edit => Command::EditCard(index),
        CardAction::Delete => Command::DeleteCard(index),
    }
}

/// Bookmark cards in a grid or a one-per-line list.
pub struct CardGridWidget<'a> {
    list: &'a RenderedList,
    selected: Option<usize>,
    scroll_row: usize,
    card_width: u16,
    layout: Layout,
    theme: &'a ThemeColors,
    loading: Option<(&'a str, usize)>,
    hits: Option<&'a mut Vec<(Rect, Command)>>,
}

impl<'a> CardGridWidget<'a> {
    pub fn new(list: &'a RenderedList, theme: &'a ThemeColors) -> Self {
        Self {
            list,
            selected: None,
            scroll_row: 0,
            card_width: 32,
            layout: Layout::Grid,
            theme,
            loading: None,
            hits: None,
        }
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn scroll_row(mut self, row: usize) -> Self {
        self.scroll_row = row;
        self
    }

    pub fn card_width(mut self, width: u16) -> Self {
        self.card_width = width;
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Show a spinner with `message` instead of the empty placeholder.
    pub fn loading(mut self, message: &'a str, frame: usize) -> Self {
        self.loading = Some((message, frame));
        self
    }

    pub fn hits(mut self, hits: &'a mut Vec<(Rect, Command)>) -> Self {
        self.hits = Some(hits);
        self
    }

    fn render_placeholder(&self, text: String, area: Rect, buf: &mut Buffer) {
        let span = Span::styled(
            text,
            Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::ITALIC),
        );
        let width = (span.width() as u16).min(area.width);
        let x = area.x + (area.width - width) / 2;
        let y = area.y + area.height / 2;
        buf.set_span(x, y, &span, width);
    }

    fn render_card(
        &self,
        index: usize,
        card: &Card,
        rect: Rect,
        buf: &mut Buffer,
        regions: &mut Vec<(Rect, Command)>,
    ) {
        let selected = self.selected == Some(index);
        let (bg, border_fg) = if selected {
            (self.theme.card_selected_bg, self.theme.tab_active_fg)
        } else {
            (self.theme.card_bg, self.theme.border_fg)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_fg))
            .style(Style::default().bg(bg));
        let inner = block.inner(rect);
        block.render(rect, buf);
        regions.push((
            rect,
            Command::OpenCard {
                index,
                target: OpenTarget::CurrentTab,
            },
        ));
        if inner.width < 3 || inner.height == 0 {
            return;
        }

        let width = inner.width as usize;
        let title = Line::from(vec![
            Span::styled(
                format!("{} ", favicon_glyph(card)),
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                truncate(&card.title, width.saturating_sub(2)),
                Style::default()
                    .fg(self.theme.card_title_fg)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        buf.set_line(inner.x, inner.y, &title, inner.width);

        if inner.height < 2 {
            return;
        }
        let actions_width = (card.actions.len() * 2) as u16;
        let host_width = width.saturating_sub(actions_width as usize + 1);
        let host = Span::styled(
            truncate(&card.host_label, host_width),
            Style::default().fg(self.theme.host_fg),
        );
        buf.set_span(inner.x, inner.y + 1, &host, host_width as u16);

        let mut x = inner.x + inner.width.saturating_sub(actions_width);
        for action in &card.actions {
            let span = Span::styled(action_glyph(*action), Style::default().fg(self.theme.info_fg));
            buf.set_span(x, inner.y + 1, &span, 1);
            regions.push((Rect::new(x, inner.y + 1, 1, 1), action_command(*action, index)));
            x += 2;
        }
    }

    fn render_row(
        &self,
        index: usize,
        card: &Card,
        rect: Rect,
        buf: &mut Buffer,
        regions: &mut Vec<(Rect, Command)>,
    ) {
        let selected = self.selected == Some(index);
        let bg = if selected {
            self.theme.card_selected_bg
        } else {
            self.theme.bg
        };
        buf.set_style(rect, Style::default().bg(bg));
        regions.push((
            rect,
            Command::OpenCard {
                index,
                target: OpenTarget::CurrentTab,
            },
        ));

        let actions_width = (card.actions.len() * 2) as u16;
        let text_width = rect.width.saturating_sub(actions_width + 1) as usize;
        let title = truncate(&card.title, text_width.saturating_sub(4) * 2 / 3);
        let host_budget = text_width.saturating_sub(title.chars().count() + 7);
        let line = Line::from(vec![
            Span::styled(
                format!(" {}  ", favicon_glyph(card)),
                Style::default().fg(self.theme.accent_fg),
            ),
            Span::styled(
                title,
                Style::default()
                    .fg(self.theme.card_title_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", truncate(&card.host_label, host_budget)),
                Style::default().fg(self.theme.host_fg),
            ),
        ]);
        buf.set_line(rect.x, rect.y, &line, text_width as u16);

        let mut x = rect.x + rect.width.saturating_sub(actions_width);
        for action in &card.actions {
            let span = Span::styled(action_glyph(*action), Style::default().fg(self.theme.info_fg));
            buf.set_span(x, rect.y, &span, 1);
            regions.push((Rect::new(x, rect.y, 1, 1), action_command(*action, index)));
            x += 2;
        }
    }
}

impl<'a> Widget for CardGridWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let cards = match self.list {
            RenderedList::Empty { message } => {
                let text = match self.loading {
                    Some((loading, frame)) => {
                        format!("{} {}", SPINNER[frame % SPINNER.len()], loading)
                    }
                    None => message.clone(),
                };
                self.render_placeholder(text, area, buf);
                return;
            }
            RenderedList::Cards(cards) => cards,
        };

        let (columns, row_height) = geometry(area.width, self.card_width, self.layout);
        let card_width = match self.layout {
            Layout::Grid => area.width / columns as u16,
            Layout::List => area.width,
        };
        let visible_rows = (area.height / row_height).max(1) as usize;

        let mut regions = Vec::new();
        let first = self.scroll_row * columns;
        for (offset, card) in cards
            .iter()
            .enumerate()
            .skip(first)
            .take(visible_rows * columns)
        {
            let slot = offset - first;
            let (row, col) = (slot / columns, slot % columns);
            let rect = Rect::new(
                area.x + col as u16 * card_width,
                area.y + row as u16 * row_height,
                card_width,
                row_height,
            )
            .intersection(area);
            match self.layout {
                Layout::Grid => self.render_card(offset, card, rect, buf, &mut regions),
                Layout::List => self.render_row(offset, card, rect, buf, &mut regions),
            }
        }

        if let Some(hits) = self.hits {
            hits.extend(regions);
        }
    }
}

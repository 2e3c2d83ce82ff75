use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::Command;
use crate::input::TextInput;
use crate::theme::ThemeColors;

/// Text of an input field: placeholder when empty and unfocused, a block
/// cursor when focused. Text left of the cursor is dropped to keep it in
/// `width`.
pub fn input_line<'a>(
    input: &'a TextInput,
    focused: bool,
    placeholder: &'a str,
    width: usize,
    theme: &ThemeColors,
) -> Line<'a> {
    if input.is_empty() && !focused {
        return Line::from(Span::styled(
            placeholder,
            Style::default()
                .fg(theme.dim_fg)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    let input_style = Style::default().fg(theme.fg);
    if !focused {
        return Line::from(Span::styled(input.as_str(), input_style));
    }
    let (before, cursor, after) = input.split_at_cursor();
    let skip = Span::raw(before).width().saturating_sub(width.saturating_sub(2));
    let before: String = before.chars().skip(skip).collect();
    Line::from(vec![
        Span::styled(before, input_style),
        Span::styled(
            cursor,
            Style::default()
                .bg(theme.fg)
                .fg(theme.card_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(after, input_style),
    ])
}

/// Bordered single-line input with placeholder and right-aligned indicators.
pub struct SearchBarWidget<'a> {
    input: &'a TextInput,
    placeholder: &'a str,
    title: Option<&'a str>,
    focused: bool,
    theme: &'a ThemeColors,
    indicators: Vec<(String, Command)>,
    focus_command: Command,
    hits: Option<&'a mut Vec<(Rect, Command)>>,
}

impl<'a> SearchBarWidget<'a> {
    pub fn new(
        input: &'a TextInput,
        placeholder: &'a str,
        theme: &'a ThemeColors,
        focus_command: Command,
    ) -> Self {
        Self {
            input,
            placeholder,
            title: None,
            focused: false,
            theme,
            indicators: Vec::new(),
            focus_command,
            hits: None,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Clickable labels drawn at the right edge, e.g. sort and filter state.
    pub fn indicators(mut self, indicators: Vec<(String, Command)>) -> Self {
        self.indicators = indicators;
        self
    }

    pub fn hits(mut self, hits: &'a mut Vec<(Rect, Command)>) -> Self {
        self.hits = Some(hits);
        self
    }
}

impl<'a> Widget for SearchBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_fg = if self.focused {
            self.theme.border_focused_fg
        } else {
            self.theme.border_fg
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_fg))
            .padding(Padding::horizontal(1));
        if let Some(title) = self.title {
            block = block.title(Span::styled(
                format!(" {} ", title),
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut regions = Vec::new();

        // Indicators, laid out from the right edge.
        let mut right = inner.x + inner.width;
        let indicator_style = Style::default().fg(self.theme.info_fg);
        for (label, cmd) in self.indicators.iter().rev() {
            let span = Span::styled(format!("[{}]", label), indicator_style);
            let width = span.width() as u16;
            if right < inner.x + width + 1 {
                break;
            }
            right -= width;
            buf.set_span(right, inner.y, &span, width);
            regions.push((Rect::new(right, inner.y, width, 1), cmd.clone()));
            right -= 1;
        }
        let text_width = right.saturating_sub(inner.x).saturating_sub(1);
        let text_area = Rect::new(inner.x, inner.y, text_width, 1);
        regions.insert(0, (text_area, self.focus_command.clone()));

        let line = input_line(
            self.input,
            self.focused,
            self.placeholder,
            text_width as usize,
            self.theme,
        );
        buf.set_line(text_area.x, text_area.y, &line, text_area.width);

        if let Some(hits) = self.hits {
            hits.extend(regions);
        }
    }
}

/// Dropdown list of web search suggestions.
pub struct SuggestionsWidget<'a> {
    items: &'a [String],
    selected: Option<usize>,
    theme: &'a ThemeColors,
    hits: Option<&'a mut Vec<(Rect, Command)>>,
}

impl<'a> SuggestionsWidget<'a> {
    pub fn new(items: &'a [String], selected: Option<usize>, theme: &'a ThemeColors) -> Self {
        Self {
            items,
            selected,
            theme,
            hits: None,
        }
    }

    pub fn hits(mut self, hits: &'a mut Vec<(Rect, Command)>) -> Self {
        self.hits = Some(hits);
        self
    }

    /// Rows needed including borders.
    pub fn height(&self) -> u16 {
        self.items.len() as u16 + 2
    }
}

impl<'a> Widget for SuggestionsWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.items.is_empty() || area.height < 3 {
            return;
        }
        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused_fg))
            .style(Style::default().bg(self.theme.dialog_bg));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut regions = Vec::new();
        for (i, item) in self.items.iter().take(inner.height as usize).enumerate() {
            let style = if self.selected == Some(i) {
                Style::default()
                    .bg(self.theme.card_selected_bg)
                    .fg(self.theme.tab_active_fg)
            } else {
                Style::default().fg(self.theme.fg)
            };
            let row = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
            buf.set_style(row, style);
            buf.set_line(
                row.x,
                row.y,
                &Line::from(Span::styled(format!(" {}", item), style)),
                row.width,
            );
            regions.push((row, Command::PickSuggestion(i)));
        }

        if let Some(hits) = self.hits {
            hits.extend(regions);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::dark_theme;

    fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }

    #[test]
    fn placeholder_shown_when_empty_and_unfocused() {
        let theme = dark_theme();
        let input = TextInput::default();
        let area = Rect::new(0, 0, 50, 3);
        let mut buf = Buffer::empty(area);
        SearchBarWidget::new(&input, "Search your bookmarks...", &theme, Command::FocusBookmarkSearch)
            .render(area, &mut buf);
        assert!(buffer_to_string(&buf, area).contains("Search your bookmarks..."));
    }

    #[test]
    fn indicators_are_clickable() {
        let theme = dark_theme();
        let input = TextInput::with_value("rust");
        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        let mut hits = Vec::new();
        SearchBarWidget::new(&input, "", &theme, Command::FocusBookmarkSearch)
            .focused(true)
            .indicators(vec![
                ("Sort by Name".into(), Command::CycleSort),
                ("Grid".into(), Command::ToggleLayout),
            ])
            .hits(&mut hits)
            .render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("rust"));
        assert!(content.contains("[Sort by Name] [Grid]"));
        assert_eq!(hits[0].1, Command::FocusBookmarkSearch);
        assert!(hits.iter().any(|(_, c)| *c == Command::CycleSort));
        assert!(hits.iter().any(|(_, c)| *c == Command::ToggleLayout));
    }

    #[test]
    fn suggestions_rows_pick_by_index() {
        let theme = dark_theme();
        let items = vec!["rust lang".to_string(), "rust book".to_string()];
        let widget = SuggestionsWidget::new(&items, Some(1), &theme);
        assert_eq!(widget.height(), 4);
        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);
        let mut hits = Vec::new();
        widget.hits(&mut hits).render(area, &mut buf);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1], (Rect::new(1, 2, 28, 1), Command::PickSuggestion(1)));
        assert!(buffer_to_string(&buf, area).contains("rust book"));
    }
}

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

use crate::app::Command;
use crate::theme::ThemeColors;

/// One clickable label in a strip.
#[derive(Debug, Clone)]
pub struct StripItem {
    pub label: String,
    pub active: bool,
    pub command: Command,
}

/// A single-row strip of clickable labels: quick views, folder tabs and
/// breadcrumbs all use it.
pub struct TabStripWidget<'a> {
    items: &'a [StripItem],
    theme: &'a ThemeColors,
    separator: &'a str,
    rtl: bool,
    prefix: Option<&'a str>,
    inactive_fg: Color,
    hits: Option<&'a mut Vec<(Rect, Command)>>,
}

impl<'a> TabStripWidget<'a> {
    pub fn new(items: &'a [StripItem], theme: &'a ThemeColors) -> Self {
        Self {
            items,
            theme,
            separator: "  ",
            rtl: false,
            prefix: None,
            inactive_fg: theme.tab_fg,
            hits: None,
        }
    }

    pub fn separator(mut self, separator: &'a str) -> Self {
        self.separator = separator;
        self
    }

    /// Right-align the strip and lay items out right to left.
    pub fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    /// Dim label drawn before the first item.
    pub fn prefix(mut self, prefix: &'a str) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Colour of the items that aren't active.
    pub fn inactive_fg(mut self, color: Color) -> Self {
        self.inactive_fg = color;
        self
    }

    pub fn hits(mut self, hits: &'a mut Vec<(Rect, Command)>) -> Self {
        self.hits = Some(hits);
        self
    }

    fn label_text(item: &StripItem) -> String {
        format!(" {} ", item.label)
    }

    /// Screen rect for every item, in item order. Items that don't fit are
    /// left out.
    pub fn item_rects(&self, area: Rect) -> Vec<Rect> {
        let sep = Span::raw(self.separator).width() as u16;
        let mut rects = Vec::with_capacity(self.items.len());
        let prefix_width = self.prefix.map(|p| Span::raw(p).width() as u16).unwrap_or(0);
        let mut used = prefix_width;
        for (i, item) in self.items.iter().enumerate() {
            let width = Span::raw(Self::label_text(item)).width() as u16;
            let gap = if i == 0 { 0 } else { sep };
            if used + gap + width > area.width {
                break;
            }
            used += gap;
            let x = if self.rtl {
                area.x + area.width - used - width
            } else {
                area.x + used
            };
            rects.push(Rect::new(x, area.y, width, 1));
            used += width;
        }
        rects
    }
}

impl<'a> Widget for TabStripWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        if let Some(prefix) = self.prefix {
            let span = Span::styled(prefix, Style::default().fg(self.theme.dim_fg));
            let width = span.width() as u16;
            let x = if self.rtl {
                area.x + area.width.saturating_sub(width)
            } else {
                area.x
            };
            buf.set_span(x, area.y, &span, width.min(area.width));
        }

        let rects = self.item_rects(area);
        let sep_style = Style::default().fg(self.theme.dim_fg);
        for (i, (item, rect)) in self.items.iter().zip(rects.iter()).enumerate() {
            let style = if item.active {
                Style::default()
                    .fg(self.theme.tab_active_fg)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(self.inactive_fg)
            };
            let span = Span::styled(Self::label_text(item), style);
            buf.set_span(rect.x, rect.y, &span, rect.width);

            if i > 0 {
                let sep = Span::styled(self.separator, sep_style);
                let sep_width = sep.width() as u16;
                let x = if self.rtl {
                    rect.x + rect.width
                } else {
                    rect.x.saturating_sub(sep_width)
                };
                buf.set_span(x, rect.y, &sep, sep_width);
            }
        }

        if let Some(hits) = self.hits {
            hits.extend(
                self.items
                    .iter()
                    .zip(rects)
                    .map(|(item, rect)| (rect, item.command.clone())),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::dark_theme;

    fn items() -> Vec<StripItem> {
        ["All", "Bar", "Other"]
            .iter()
            .enumerate()
            .map(|(i, label)| StripItem {
                label: label.to_string(),
                active: i == 1,
                command: Command::ClickBreadcrumb(i),
            })
            .collect()
    }

    fn row_text(buf: &Buffer, area: Rect) -> String {
        (area.x..area.x + area.width)
            .map(|x| buf.cell((x, area.y)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn renders_labels_and_records_hits() {
        let theme = dark_theme();
        let items = items();
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        let mut hits = Vec::new();
        TabStripWidget::new(&items, &theme)
            .hits(&mut hits)
            .render(area, &mut buf);

        assert_eq!(row_text(&buf, area).trim_end(), " All    Bar    Other");
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[1], (Rect::new(7, 0, 5, 1), Command::ClickBreadcrumb(1)));
    }

    #[test]
    fn inactive_items_take_override_colour() {
        let theme = dark_theme();
        let items = items();
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        TabStripWidget::new(&items, &theme)
            .inactive_fg(theme.crumb_fg)
            .render(area, &mut buf);

        assert_eq!(buf.cell((1, 0)).unwrap().fg, theme.crumb_fg);
        assert_eq!(buf.cell((8, 0)).unwrap().fg, theme.tab_active_fg);
    }

    #[test]
    fn rtl_lays_out_from_the_right() {
        let theme = dark_theme();
        let items = items();
        let area = Rect::new(0, 0, 30, 1);
        let widget = TabStripWidget::new(&items, &theme).rtl(true);
        let rects = widget.item_rects(area);
        assert_eq!(rects[0], Rect::new(25, 0, 5, 1));
        assert!(rects[1].x < rects[0].x);
    }

    #[test]
    fn items_that_do_not_fit_are_dropped() {
        let theme = dark_theme();
        let items = items();
        let widget = TabStripWidget::new(&items, &theme);
        assert_eq!(widget.item_rects(Rect::new(0, 0, 12, 1)).len(), 2);
    }
}

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::i18n::Localizer;
use crate::theme::ThemeColors;

/// A single keybinding entry for display.
struct KeyEntry {
    key: &'static str,
    description_key: &'static str,
}

/// A category of keybindings.
struct KeyCategory {
    name_key: &'static str,
    entries: &'static [KeyEntry],
}

const BROWSE_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "←↓↑→ / hjkl",
        description_key: "help.moveCards",
    },
    KeyEntry {
        key: "1 / 2 / 3",
        description_key: "help.quickViews",
    },
    KeyEntry {
        key: "[ / ]",
        description_key: "help.folderTabs",
    },
    KeyEntry {
        key: "{ / }",
        description_key: "help.subfolderTabs",
    },
    KeyEntry {
        key: "Backspace",
        description_key: "help.breadcrumbUp",
    },
    KeyEntry {
        key: "H",
        description_key: "help.breadcrumbHome",
    },
    KeyEntry {
        key: "g / Home",
        description_key: "help.backToTop",
    },
];

const BOOKMARK_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "Enter",
        description_key: "help.openHere",
    },
    KeyEntry {
        key: "o / middle click",
        description_key: "help.openNewTab",
    },
    KeyEntry {
        key: "a / Ctrl+D",
        description_key: "help.add",
    },
    KeyEntry {
        key: "e",
        description_key: "help.edit",
    },
    KeyEntry {
        key: "d / Delete",
        description_key: "help.delete",
    },
    KeyEntry {
        key: "J / K",
        description_key: "help.reorder",
    },
];

const SEARCH_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "Ctrl+K",
        description_key: "help.webSearch",
    },
    KeyEntry {
        key: "/ / Ctrl+B",
        description_key: "help.bookmarkSearch",
    },
    KeyEntry {
        key: "↑ / ↓",
        description_key: "help.suggestion",
    },
    KeyEntry {
        key: "s",
        description_key: "help.sort",
    },
    KeyEntry {
        key: "f",
        description_key: "help.filter",
    },
    KeyEntry {
        key: "v",
        description_key: "help.layout",
    },
];

const GENERAL_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "t",
        description_key: "help.darkMode",
    },
    KeyEntry {
        key: "L",
        description_key: "help.language",
    },
    KeyEntry {
        key: ",",
        description_key: "help.settings",
    },
    KeyEntry {
        key: "?",
        description_key: "help.toggleHelp",
    },
    KeyEntry {
        key: "Esc",
        description_key: "help.escape",
    },
    KeyEntry {
        key: "q / Ctrl+C",
        description_key: "help.quit",
    },
];

const CATEGORIES: &[KeyCategory] = &[
    KeyCategory {
        name_key: "help.category.browse",
        entries: BROWSE_KEYS,
    },
    KeyCategory {
        name_key: "help.category.bookmarks",
        entries: BOOKMARK_KEYS,
    },
    KeyCategory {
        name_key: "help.category.search",
        entries: SEARCH_KEYS,
    },
    KeyCategory {
        name_key: "help.category.general",
        entries: GENERAL_KEYS,
    },
];

/// Help overlay widget showing all keybindings.
pub struct HelpOverlay<'a> {
    loc: &'a Localizer,
    theme: &'a ThemeColors,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(loc: &'a Localizer, theme: &'a ThemeColors) -> Self {
        Self { loc, theme }
    }

    /// Build all the lines for the help content.
    fn build_content_lines(&self) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();

        for category in CATEGORIES {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("── {} ", self.loc.t(category.name_key)),
                    Style::default()
                        .fg(self.theme.accent_fg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("─".repeat(40), Style::default().fg(self.theme.dim_fg)),
            ]));

            for entry in category.entries {
                let key_padded = format!("  {:<20}", entry.key);
                lines.push(Line::from(vec![
                    Span::styled(
                        key_padded,
                        Style::default()
                            .fg(self.theme.tab_active_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        self.loc.t(entry.description_key),
                        Style::default().fg(self.theme.fg),
                    ),
                ]));
            }

            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![Span::styled(
            format!(" {} ", self.loc.t("help.closeHint")),
            Style::default().fg(self.theme.dim_fg),
        )]));

        lines
    }

    /// Get total number of content lines.
    pub fn total_lines() -> usize {
        CATEGORIES
            .iter()
            .map(|category| category.entries.len() + 2)
            .sum::<usize>()
            + 1
    }
}

impl<'a> Widget for HelpOverlay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let overlay_width = (area.width as f32 * 0.70).clamp(40.0, 80.0) as u16;
        let overlay_height = (Self::total_lines() as u16 + 2).min(area.height);
        let overlay_area =
            crate::components::dialog::centered_rect(overlay_width, overlay_height, area);

        Clear.render(overlay_area, buf);

        let block = Block::default()
            .title(format!(" {} ", self.loc.t("help.title")))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused_fg))
            .style(Style::default().bg(self.theme.dialog_bg));

        let inner = block.inner(overlay_area);
        block.render(overlay_area, buf);

        for (i, line) in self
            .build_content_lines()
            .iter()
            .take(inner.height as usize)
            .enumerate()
        {
            buf.set_line(
                inner.x + 1,
                inner.y + i as u16,
                line,
                inner.width.saturating_sub(2),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;

    fn screen_text(loc: &Localizer) -> String {
        let theme = crate::theme::dark_theme();
        let area = Rect::new(0, 0, 100, 50);
        let mut buf = Buffer::empty(area);
        HelpOverlay::new(loc, &theme).render(area, &mut buf);
        (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn all_categories_have_entries() {
        for cat in CATEGORIES {
            assert!(
                !cat.entries.is_empty(),
                "Category '{}' has no entries",
                cat.name_key
            );
        }
    }

    #[test]
    fn every_label_is_translated() {
        let loc = Localizer::new(Language::Arabic);
        let keys = CATEGORIES
            .iter()
            .flat_map(|c| std::iter::once(c.name_key).chain(c.entries.iter().map(|e| e.description_key)))
            .chain(["help.title", "help.closeHint"]);
        for key in keys {
            assert_ne!(loc.t(key), key, "untranslated help key {}", key);
        }
    }

    #[test]
    fn content_lines_match_total() {
        let theme = crate::theme::dark_theme();
        let loc = Localizer::new(Language::English);
        let overlay = HelpOverlay::new(&loc, &theme);
        let lines = overlay.build_content_lines();
        assert_eq!(lines.len(), HelpOverlay::total_lines());
    }

    #[test]
    fn renders_title_and_bindings() {
        let content = screen_text(&Localizer::new(Language::English));
        assert!(content.contains("Keyboard Shortcuts"));
        assert!(content.contains("Search bookmarks"));
        assert!(content.contains("Toggle dark mode"));
        assert!(content.contains("Press ? or Esc to close"));
    }

    #[test]
    fn follows_ui_language() {
        let content = screen_text(&Localizer::new(Language::Arabic));
        assert!(!content.contains("Search bookmarks"));
        assert!(content.contains("Ctrl+K"));
    }
}

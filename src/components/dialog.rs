use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::{AppMode, BookmarkForm, Command, DialogKind, FormField, SettingsForm, SettingsRow};
use crate::components::search_bar::input_line;
use crate::i18n::{Language, Localizer};
use crate::theme::ThemeColors;

/// Folder rows shown under the picker query, including "Select folder...".
const FOLDER_ROWS: usize = 5;

/// Calculate a centered rectangle within the given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(x, y, w, h)
}

fn language_key(lang: Language) -> &'static str {
    match lang {
        Language::English => "language.english",
        Language::Arabic => "language.arabic",
    }
}

fn checkbox(on: bool) -> &'static str {
    if on {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Dialog widget that renders the modal for the current `AppMode`.
pub struct DialogWidget<'a> {
    mode: &'a AppMode,
    form: &'a BookmarkForm,
    settings: &'a SettingsForm,
    loc: &'a Localizer,
    theme: &'a ThemeColors,
    hits: Option<&'a mut Vec<(Rect, Command)>>,
}

impl<'a> DialogWidget<'a> {
    pub fn new(
        mode: &'a AppMode,
        form: &'a BookmarkForm,
        settings: &'a SettingsForm,
        loc: &'a Localizer,
        theme: &'a ThemeColors,
    ) -> Self {
        Self {
            mode,
            form,
            settings,
            loc,
            theme,
            hits: None,
        }
    }

    pub fn hits(mut self, hits: &'a mut Vec<(Rect, Command)>) -> Self {
        self.hits = Some(hits);
        self
    }

    fn frame(&self, title: &str, width: u16, height: u16, area: Rect, buf: &mut Buffer) -> Rect {
        let rect = centered_rect(width.min(area.width.saturating_sub(4)), height, area);
        Clear.render(rect, buf);
        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));
        let inner = block.inner(rect);
        block.render(rect, buf);
        inner
    }

    fn hint(&self, text: &str, inner: Rect, buf: &mut Buffer) {
        if inner.height == 0 {
            return;
        }
        let hint_style = Style::default()
            .fg(self.theme.dim_fg)
            .add_modifier(Modifier::DIM);
        let line = Line::from(Span::styled(text.to_string(), hint_style));
        buf.set_line(inner.x, inner.y + inner.height - 1, &line, inner.width);
    }

    /// Draw `[ label ]` buttons left to right on row `y`.
    fn buttons(
        &self,
        buttons: &[(String, Command, bool)],
        inner: Rect,
        y: u16,
        buf: &mut Buffer,
        regions: &mut Vec<(Rect, Command)>,
    ) {
        let mut x = inner.x;
        for (label, cmd, danger) in buttons {
            let fg = if *danger {
                self.theme.error_fg
            } else {
                self.theme.tab_active_fg
            };
            let span = Span::styled(
                format!("[ {} ]", label),
                Style::default().fg(fg).add_modifier(Modifier::BOLD),
            );
            let width = span.width() as u16;
            if x + width > inner.x + inner.width {
                break;
            }
            buf.set_span(x, y, &span, width);
            regions.push((Rect::new(x, y, width, 1), cmd.clone()));
            x += width + 2;
        }
    }

    fn field_label(&self, key: &str, active: bool, x: u16, y: u16, width: u16, buf: &mut Buffer) {
        let style = if active {
            Style::default()
                .fg(self.theme.accent_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.fg)
        };
        buf.set_line(x, y, &Line::from(Span::styled(self.loc.t(key), style)), width);
    }

    fn render_bookmark_form(
        &self,
        edit: bool,
        area: Rect,
        buf: &mut Buffer,
        regions: &mut Vec<(Rect, Command)>,
    ) {
        let form = self.form;
        let (title_key, height) = if edit {
            ("modal.editBookmark.title", 11)
        } else {
            ("modal.addBookmark.title", 13 + FOLDER_ROWS as u16)
        };
        let inner = self.frame(&self.loc.t(title_key), 60, height, area, buf);
        if inner.height < 4 || inner.width == 0 {
            return;
        }

        let width = inner.width;
        let field_bg = Style::default().bg(self.theme.card_bg);
        let mut y = inner.y;
        let fields = [
            (FormField::Title, "modal.fields.title", &form.title, "modal.placeholders.title"),
            (FormField::Url, "modal.fields.url", &form.url, "modal.placeholders.url"),
        ];
        for (field, label_key, input, placeholder_key) in fields {
            let active = form.field == field;
            self.field_label(label_key, active, inner.x, y, width, buf);
            let row = Rect::new(inner.x, y + 1, width, 1);
            buf.set_style(row, field_bg);
            let placeholder = self.loc.t(placeholder_key);
            let line = input_line(input, active, &placeholder, width as usize, self.theme);
            buf.set_line(row.x, row.y, &line, row.width);
            y += 3;
        }

        if form.has_folder {
            let active = form.field == FormField::Folder;
            self.field_label("modal.fields.folder", active, inner.x, y, width, buf);
            let row = Rect::new(inner.x, y + 1, width, 1);
            buf.set_style(row, field_bg);
            let select = self.loc.t("modal.fields.selectFolder");
            let line = input_line(&form.folder_query, active, &select, width as usize, self.theme);
            buf.set_line(row.x, row.y, &line, row.width);

            let options = std::iter::once((None, select.clone())).chain(
                form.folder_matches
                    .iter()
                    .enumerate()
                    .map(|(i, f)| (Some(i), f.title.clone())),
            );
            // Keep the highlighted match in view.
            let skip = form
                .folder_selected
                .map(|i| (i + 1).saturating_sub(FOLDER_ROWS - 1))
                .unwrap_or(0);
            for (row_idx, (idx, title)) in options.skip(skip).take(FOLDER_ROWS).enumerate() {
                let chosen = idx == form.folder_selected;
                let style = if chosen {
                    Style::default()
                        .fg(self.theme.tab_active_fg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.dim_fg)
                };
                let marker = if chosen { "» " } else { "  " };
                buf.set_line(
                    inner.x,
                    y + 2 + row_idx as u16,
                    &Line::from(Span::styled(format!("{}{}", marker, title), style)),
                    width,
                );
            }
            y += 3 + FOLDER_ROWS as u16;
        }

        let mut buttons = Vec::new();
        if edit {
            buttons.push((self.loc.t("modal.editBookmark.update"), Command::ConfirmDialog, false));
            buttons.push((self.loc.t("modal.editBookmark.delete"), Command::DeleteFromEdit, true));
        } else {
            buttons.push((self.loc.t("modal.addBookmark.save"), Command::ConfirmDialog, false));
        }
        buttons.push((self.loc.t("common.cancel"), Command::Escape, false));
        if y < inner.y + inner.height - 1 {
            self.buttons(&buttons, inner, y, buf, regions);
        }

        let hint = if edit {
            "[Tab] Next field  [Enter] Confirm  [Ctrl+D] Delete  [Esc] Cancel"
        } else {
            "[Tab] Next field  [↑↓] Folder  [Enter] Confirm  [Esc] Cancel"
        };
        self.hint(hint, inner, buf);
    }

    fn render_confirm(
        &self,
        title: &str,
        area: Rect,
        buf: &mut Buffer,
        regions: &mut Vec<(Rect, Command)>,
    ) {
        let message = self.loc.t("confirm.deleteBookmark");
        let width = (Span::raw(message.as_str()).width() as u16 + 6).max(40);
        let inner = self.frame(&self.loc.t("modal.editBookmark.delete"), width, 8, area, buf);
        if inner.height < 4 || inner.width == 0 {
            return;
        }

        let header = Line::from(Span::styled(
            message,
            Style::default()
                .fg(self.theme.error_fg)
                .add_modifier(Modifier::BOLD),
        ));
        buf.set_line(inner.x, inner.y, &header, inner.width);
        let name = Line::from(Span::styled(
            format!("  • {}", title),
            Style::default().fg(self.theme.fg),
        ));
        buf.set_line(inner.x, inner.y + 1, &name, inner.width);

        let buttons = [
            (self.loc.t("modal.editBookmark.delete"), Command::ConfirmDialog, true),
            (self.loc.t("common.cancel"), Command::Escape, false),
        ];
        self.buttons(&buttons, inner, inner.y + 3, buf, regions);
        self.hint("[y] Yes  [n/Esc] Cancel", inner, buf);
    }

    fn settings_value(&self, row: SettingsRow) -> Option<String> {
        let d = &self.settings.draft;
        let value = match row {
            SettingsRow::GridSize => format!("◀ {} ▶", self.loc.t(d.grid_size.label_key())),
            SettingsRow::SearchEngine => {
                format!("◀ {} ▶", self.loc.t(d.default_search_engine.label_key()))
            }
            SettingsRow::ShowMostVisited => checkbox(d.show_most_visited).to_string(),
            SettingsRow::ShowRecentlyAdded => checkbox(d.show_recently_added).to_string(),
            SettingsRow::Animations => checkbox(d.animations_enabled).to_string(),
            SettingsRow::Language => format!("◀ {} ▶", self.loc.t(language_key(d.language))),
            SettingsRow::Save | SettingsRow::Reset => return None,
        };
        Some(value)
    }

    fn settings_label_key(row: SettingsRow) -> &'static str {
        match row {
            SettingsRow::GridSize => "settings.gridSize",
            SettingsRow::SearchEngine => "settings.defaultEngine",
            SettingsRow::ShowMostVisited => "settings.showMostVisited",
            SettingsRow::ShowRecentlyAdded => "settings.showRecentlyAdded",
            SettingsRow::Animations => "settings.animationsEnabled",
            SettingsRow::Language => "settings.language",
            SettingsRow::Save => "settings.save",
            SettingsRow::Reset => "settings.reset",
        }
    }

    fn render_settings(&self, area: Rect, buf: &mut Buffer, regions: &mut Vec<(Rect, Command)>) {
        let height = SettingsRow::ALL.len() as u16 + 5;
        let inner = self.frame(&self.loc.t("modal.settings.title"), 56, height, area, buf);
        if inner.height < 2 || inner.width == 0 {
            return;
        }

        let current = self.settings.current_row();
        let mut y = inner.y;
        for (i, row) in SettingsRow::ALL.iter().enumerate() {
            if matches!(row, SettingsRow::Save) {
                y += 1;
            }
            if y >= inner.y + inner.height - 1 {
                break;
            }
            let selected = *row == current;
            let rect = Rect::new(inner.x, y, inner.width, 1);
            if selected {
                buf.set_style(rect, Style::default().bg(self.theme.card_selected_bg));
            }
            let label = self.loc.t(Self::settings_label_key(*row));
            let line = match self.settings_value(*row) {
                Some(value) => {
                    let pad = (inner.width as usize)
                        .saturating_sub(Span::raw(label.as_str()).width() + Span::raw(value.as_str()).width());
                    Line::from(vec![
                        Span::styled(label, Style::default().fg(self.theme.fg)),
                        Span::raw(" ".repeat(pad)),
                        Span::styled(value, Style::default().fg(self.theme.tab_active_fg)),
                    ])
                }
                None => {
                    let fg = if *row == SettingsRow::Reset {
                        self.theme.error_fg
                    } else {
                        self.theme.success_fg
                    };
                    Line::from(Span::styled(
                        format!("[ {} ]", label),
                        Style::default().fg(fg).add_modifier(Modifier::BOLD),
                    ))
                }
            };
            buf.set_line(rect.x, rect.y, &line, rect.width);
            regions.push((rect, Command::SettingsClick(i)));
            y += 1;
        }

        self.hint("[↑↓] Select  [←→] Change  [Enter] Save  [Esc] Cancel", inner, buf);
    }
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let kind = match &self.mode {
            AppMode::Dialog(kind) => kind,
            _ => return,
        };

        let mut regions = Vec::new();
        match kind {
            DialogKind::AddBookmark => self.render_bookmark_form(false, area, buf, &mut regions),
            DialogKind::EditBookmark { .. } => {
                self.render_bookmark_form(true, area, buf, &mut regions)
            }
            DialogKind::DeleteConfirm { title, .. } => {
                self.render_confirm(title, area, buf, &mut regions)
            }
            DialogKind::Settings => self.render_settings(area, buf, &mut regions),
            DialogKind::Help => {}
        }

        if let Some(hits) = self.hits {
            hits.extend(regions);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmarks::FolderEntry;
    use crate::input::TextInput;
    use crate::settings::Settings;

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

    fn draw(mode: &AppMode, form: &BookmarkForm, settings: &SettingsForm) -> (String, Vec<(Rect, Command)>) {
        let loc = Localizer::new(Language::English);
        let theme = crate::theme::dark_theme();
        let area = Rect::new(0, 0, 80, 30);
        let mut buf = Buffer::empty(area);
        let mut hits = Vec::new();
        DialogWidget::new(mode, form, settings, &loc, &theme)
            .hits(&mut hits)
            .render(area, &mut buf);
        (buffer_to_string(&buf, area), hits)
    }

    #[test]
    fn test_add_dialog_renders_fields_and_folders() {
        let mode = AppMode::Dialog(DialogKind::AddBookmark);
        let form = BookmarkForm {
            title: TextInput::with_value("Rust"),
            folder_matches: vec![FolderEntry {
                id: "1".into(),
                title: "Bookmarks bar".into(),
            }],
            has_folder: true,
            ..Default::default()
        };
        let (content, hits) = draw(&mode, &form, &SettingsForm::default());
        assert!(content.contains("Add Bookmark"));
        assert!(content.contains("Rust"));
        assert!(content.contains("https://example.com"));
        assert!(content.contains("» Select folder..."));
        assert!(content.contains("Bookmarks bar"));
        assert!(content.contains("Save Bookmark"));
        assert!(hits.iter().any(|(_, c)| *c == Command::ConfirmDialog));
        assert!(hits.iter().any(|(_, c)| *c == Command::Escape));
        assert!(!hits.iter().any(|(_, c)| *c == Command::DeleteFromEdit));
    }

    #[test]
    fn test_edit_dialog_has_delete_button() {
        let mode = AppMode::Dialog(DialogKind::EditBookmark { id: "5".into() });
        let form = BookmarkForm {
            title: TextInput::with_value("Docs"),
            url: TextInput::with_value("https://docs.rs"),
            ..Default::default()
        };
        let (content, hits) = draw(&mode, &form, &SettingsForm::default());
        assert!(content.contains("Edit Bookmark"));
        assert!(content.contains("https://docs.rs"));
        assert!(!content.contains("Folder:"));
        assert!(hits.iter().any(|(_, c)| *c == Command::DeleteFromEdit));
    }

    #[test]
    fn test_confirm_dialog_names_bookmark() {
        let mode = AppMode::Dialog(DialogKind::DeleteConfirm {
            id: "5".into(),
            title: "Docs".into(),
            from_edit: false,
        });
        let (content, _) = draw(&mode, &BookmarkForm::default(), &SettingsForm::default());
        assert!(content.contains("Are you sure you want to delete this bookmark?"));
        assert!(content.contains("Docs"));
    }

    #[test]
    fn test_settings_dialog_shows_draft_values() {
        let mode = AppMode::Dialog(DialogKind::Settings);
        let settings = SettingsForm {
            draft: Settings {
                show_most_visited: false,
                ..Settings::default()
            },
            row: 0,
        };
        let (content, hits) = draw(&mode, &BookmarkForm::default(), &settings);
        assert!(content.contains("Grid Size:"));
        assert!(content.contains("◀ Medium ▶"));
        assert!(content.contains("[ ]"));
        assert!(content.contains("◀ English ▶"));
        assert!(content.contains("[ Reset to Default ]"));
        assert_eq!(
            hits.iter()
                .filter(|(_, c)| matches!(c, Command::SettingsClick(_)))
                .count(),
            SettingsRow::ALL.len()
        );
    }

    #[test]
    fn test_no_dialog_mode_noop() {
        let (content, hits) = draw(&AppMode::Normal, &BookmarkForm::default(), &SettingsForm::default());
        assert!(content.trim().is_empty());
        assert!(hits.is_empty());
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_rect(40, 10, area), Rect::new(20, 7, 40, 10));
        assert_eq!(centered_rect(100, 30, area), Rect::new(0, 0, 80, 24));
    }
}

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use crate::app::{App, AppMode, Command, DialogKind, Focus, InputEdit};
use crate::bookmarks::BookmarkHost;
use crate::navigation::QuickView;
use crate::navigator::{Navigator, OpenTarget};

/// Handle a key event.
pub fn handle_key_event<H: BookmarkHost, N: Navigator>(app: &mut App<H, N>, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    if let Some(cmd) = key_command(&app.mode, app.focus, key) {
        app.dispatch(cmd);
    }
}

/// Handle a mouse event against the clickable regions of the last frame.
pub fn handle_mouse_event<H: BookmarkHost, N: Navigator>(app: &mut App<H, N>, mouse: MouseEvent) {
    if let Some(cmd) = mouse_command(app, mouse) {
        app.dispatch(cmd);
    }
}

fn mouse_command<H, N>(app: &App<H, N>, mouse: MouseEvent) -> Option<Command> {
    let pos = Position::new(mouse.column, mouse.row);
    // Later regions are drawn on top (dialogs, dropdowns).
    let hit = || {
        app.hit_map
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, cmd)| cmd.clone())
    };
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => hit(),
        MouseEventKind::Down(MouseButton::Middle) => match hit()? {
            Command::OpenCard { index, .. } => Some(Command::OpenCard {
                index,
                target: OpenTarget::NewTab,
            }),
            _ => None,
        },
        MouseEventKind::ScrollDown if app.mode == AppMode::Normal => {
            Some(Command::Move { dx: 0, dy: 1 })
        }
        MouseEventKind::ScrollUp if app.mode == AppMode::Normal => {
            Some(Command::Move { dx: 0, dy: -1 })
        }
        _ => None,
    }
}

fn text_edit(key: KeyEvent) -> Option<InputEdit> {
    let edit = match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => InputEdit::Char(c),
        KeyCode::Backspace => InputEdit::Backspace,
        KeyCode::Delete => InputEdit::Delete,
        KeyCode::Left => InputEdit::Left,
        KeyCode::Right => InputEdit::Right,
        KeyCode::Home => InputEdit::Home,
        KeyCode::End => InputEdit::End,
        _ => return None,
    };
    Some(edit)
}

/// Translate a key press into a command for the current mode and focus.
pub fn key_command(mode: &AppMode, focus: Focus, key: KeyEvent) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    match mode {
        AppMode::Dialog(kind) => dialog_key(kind, key),
        AppMode::Normal => match focus {
            Focus::WebSearch | Focus::BookmarkSearch => input_key(focus, key),
            Focus::Grid => grid_key(key),
        },
    }
}

fn dialog_key(kind: &DialogKind, key: KeyEvent) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match kind {
        DialogKind::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter => {
                Some(Command::Escape)
            }
            _ => None,
        },
        DialogKind::DeleteConfirm { .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => Some(Command::ConfirmDialog),
            KeyCode::Char('n') | KeyCode::Esc => Some(Command::Escape),
            _ => None,
        },
        DialogKind::Settings => match key.code {
            KeyCode::Esc => Some(Command::Escape),
            KeyCode::Enter => Some(Command::ConfirmDialog),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => Some(Command::FormUp),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => Some(Command::FormDown),
            KeyCode::Left | KeyCode::Char('h') => Some(Command::SettingsAdjust(-1)),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                Some(Command::SettingsAdjust(1))
            }
            _ => None,
        },
        DialogKind::AddBookmark | DialogKind::EditBookmark { .. } => match key.code {
            KeyCode::Esc => Some(Command::Escape),
            KeyCode::Enter => Some(Command::ConfirmDialog),
            KeyCode::Tab => Some(Command::FormNextField),
            KeyCode::BackTab => Some(Command::FormPrevField),
            KeyCode::Up => Some(Command::FormUp),
            KeyCode::Down => Some(Command::FormDown),
            KeyCode::Char('d') if ctrl => Some(Command::DeleteFromEdit),
            _ => text_edit(key).map(Command::Input),
        },
    }
}

fn input_key(focus: Focus, key: KeyEvent) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => Some(Command::Escape),
        KeyCode::Enter => Some(Command::Submit),
        KeyCode::Char('k') if ctrl => Some(Command::FocusWebSearch),
        KeyCode::Char('b') if ctrl => Some(Command::FocusBookmarkSearch),
        KeyCode::Up if focus == Focus::WebSearch => Some(Command::SuggestionMove(-1)),
        KeyCode::Down if focus == Focus::WebSearch => Some(Command::SuggestionMove(1)),
        _ => text_edit(key).map(Command::Input),
    }
}

fn grid_key(key: KeyEvent) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let cmd = match key.code {
        KeyCode::Char('k') if ctrl => Command::FocusWebSearch,
        KeyCode::Char('b') if ctrl => Command::FocusBookmarkSearch,
        KeyCode::Char('d') if ctrl => Command::OpenAddBookmark,
        _ if ctrl => return None,

        KeyCode::Char('q') => Command::Quit,
        KeyCode::Char('/') => Command::FocusBookmarkSearch,
        KeyCode::Char('a') => Command::OpenAddBookmark,
        KeyCode::Esc => Command::Escape,

        KeyCode::Char('1') => Command::SelectQuickView(QuickView::Bookmarks),
        KeyCode::Char('2') => Command::SelectQuickView(QuickView::MostVisited),
        KeyCode::Char('3') => Command::SelectQuickView(QuickView::RecentlyAdded),
        KeyCode::Char('[') => Command::CyclePrimary(-1),
        KeyCode::Char(']') => Command::CyclePrimary(1),
        KeyCode::Char('{') => Command::CycleSub(-1),
        KeyCode::Char('}') => Command::CycleSub(1),
        KeyCode::Backspace => Command::BreadcrumbParent,
        KeyCode::Char('H') => Command::ClickBreadcrumb(0),

        KeyCode::Left | KeyCode::Char('h') => Command::Move { dx: -1, dy: 0 },
        KeyCode::Right | KeyCode::Char('l') => Command::Move { dx: 1, dy: 0 },
        KeyCode::Up | KeyCode::Char('k') => Command::Move { dx: 0, dy: -1 },
        KeyCode::Down | KeyCode::Char('j') => Command::Move { dx: 0, dy: 1 },
        KeyCode::Char('J') => Command::MoveCard(1),
        KeyCode::Char('K') => Command::MoveCard(-1),

        KeyCode::Enter => Command::OpenSelected(OpenTarget::CurrentTab),
        KeyCode::Char('o') => Command::OpenSelected(OpenTarget::NewTab),
        KeyCode::Char('e') => Command::EditSelected,
        KeyCode::Char('d') | KeyCode::Delete => Command::DeleteSelected,

        KeyCode::Char('s') => Command::CycleSort,
        KeyCode::Char('f') => Command::CycleFilter,
        KeyCode::Char('v') => Command::ToggleLayout,
        KeyCode::Char('t') => Command::ToggleDarkMode,
        KeyCode::Char('L') => Command::CycleLanguage,
        KeyCode::Char(',') => Command::OpenSettings,
        KeyCode::Char('?') => Command::OpenHelp,
        KeyCode::Char('g') | KeyCode::Home => Command::BackToTop,
        _ => return None,
    };
    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppOptions;
    use crate::bookmarks::host::memory::MemoryHost;
    use crate::bookmarks::BookmarkNode;
    use crate::navigator::recording::RecordingNavigator;
    use crate::settings::SettingsStore;
    use ratatui::layout::Rect;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn click(column: u16, row: u16, button: MouseButton) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(button),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app() -> (TempDir, App<MemoryHost, RecordingNavigator>) {
        let dir = TempDir::new().unwrap();
        let host = MemoryHost::new(vec![BookmarkNode::folder(
            "0",
            "",
            vec![BookmarkNode::folder(
                "1",
                "Bar",
                vec![
                    BookmarkNode::leaf("5", "Docs", "https://docs.rs"),
                    BookmarkNode::leaf("6", "Crates", "https://crates.io"),
                ],
            )],
        )]);
        let mut app = App::new(
            host,
            RecordingNavigator::default(),
            SettingsStore::open(dir.path()),
            AppOptions::default(),
        );
        app.reload();
        (dir, app)
    }

    #[test]
    fn grid_keys() {
        let normal = AppMode::Normal;
        let grid = |code| key_command(&normal, Focus::Grid, key(code));
        assert_eq!(grid(KeyCode::Char('q')), Some(Command::Quit));
        assert_eq!(grid(KeyCode::Char('j')), Some(Command::Move { dx: 0, dy: 1 }));
        assert_eq!(grid(KeyCode::Char('J')), Some(Command::MoveCard(1)));
        assert_eq!(
            grid(KeyCode::Char('2')),
            Some(Command::SelectQuickView(QuickView::MostVisited))
        );
        assert_eq!(
            grid(KeyCode::Char('o')),
            Some(Command::OpenSelected(OpenTarget::NewTab))
        );
        assert_eq!(grid(KeyCode::Char('x')), None);
        assert_eq!(
            key_command(&normal, Focus::Grid, ctrl('d')),
            Some(Command::OpenAddBookmark)
        );
    }

    #[test]
    fn typing_in_search_inputs_is_text() {
        let normal = AppMode::Normal;
        assert_eq!(
            key_command(&normal, Focus::BookmarkSearch, key(KeyCode::Char('q'))),
            Some(Command::Input(InputEdit::Char('q')))
        );
        assert_eq!(
            key_command(&normal, Focus::WebSearch, key(KeyCode::Down)),
            Some(Command::SuggestionMove(1))
        );
        assert_eq!(
            key_command(&normal, Focus::BookmarkSearch, key(KeyCode::Down)),
            None
        );
        assert_eq!(
            key_command(&normal, Focus::WebSearch, ctrl('c')),
            Some(Command::Quit)
        );
    }

    #[test]
    fn dialog_keys() {
        let confirm = AppMode::Dialog(DialogKind::DeleteConfirm {
            id: "5".into(),
            title: "Docs".into(),
            from_edit: false,
        });
        assert_eq!(
            key_command(&confirm, Focus::Grid, key(KeyCode::Char('y'))),
            Some(Command::ConfirmDialog)
        );
        assert_eq!(
            key_command(&confirm, Focus::Grid, key(KeyCode::Char('n'))),
            Some(Command::Escape)
        );

        let edit = AppMode::Dialog(DialogKind::EditBookmark { id: "5".into() });
        assert_eq!(
            key_command(&edit, Focus::Grid, ctrl('d')),
            Some(Command::DeleteFromEdit)
        );
        assert_eq!(
            key_command(&edit, Focus::Grid, key(KeyCode::Char('d'))),
            Some(Command::Input(InputEdit::Char('d')))
        );

        let settings = AppMode::Dialog(DialogKind::Settings);
        assert_eq!(
            key_command(&settings, Focus::Grid, key(KeyCode::Right)),
            Some(Command::SettingsAdjust(1))
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let (_dir, mut app) = app();
        let mut release = key(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        handle_key_event(&mut app, release);
        assert!(!app.should_quit);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn click_dispatches_topmost_region() {
        let (_dir, mut app) = app();
        app.hit_map = vec![
            (
                Rect::new(0, 0, 10, 3),
                Command::OpenCard {
                    index: 0,
                    target: OpenTarget::CurrentTab,
                },
            ),
            (Rect::new(5, 0, 5, 1), Command::EditCard(1)),
        ];
        handle_mouse_event(&mut app, click(6, 0, MouseButton::Left));
        assert!(matches!(
            app.mode,
            AppMode::Dialog(DialogKind::EditBookmark { ref id }) if id == "6"
        ));
    }

    #[test]
    fn middle_click_opens_in_new_tab() {
        let (_dir, mut app) = app();
        app.hit_map = vec![(
            Rect::new(0, 0, 10, 3),
            Command::OpenCard {
                index: 1,
                target: OpenTarget::CurrentTab,
            },
        )];
        handle_mouse_event(&mut app, click(2, 1, MouseButton::Middle));
        assert!(!app.should_quit);
        assert_eq!(
            app.navigator.opened,
            vec![("https://crates.io".to_string(), OpenTarget::NewTab)]
        );
    }

    #[test]
    fn click_outside_regions_does_nothing() {
        let (_dir, mut app) = app();
        app.hit_map = vec![(Rect::new(0, 0, 2, 1), Command::Quit)];
        handle_mouse_event(&mut app, click(40, 10, MouseButton::Left));
        assert!(!app.should_quit);
    }
}

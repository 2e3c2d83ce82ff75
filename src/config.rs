//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--top-sites`, `--no-watcher`, etc.)
//! 2. `$BOOKMARK_TUI_CONFIG` environment variable (path to config file)
//! 3. Project-local `.bookmark-tui.toml` in the current working directory
//! 4. Global `~/.config/bookmark-tui/config.toml`
//! 5. Built-in defaults
//!
//! User preferences edited from the settings modal (grid size, language,
//! dark mode, ...) are not part of this file; see `settings`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Chromium `Bookmarks` file (overridden by CLI positional arg).
    pub bookmarks_file: Option<String>,
    /// JSON array of `{title, url}` ranked most-visited sites.
    pub top_sites_file: Option<String>,
    /// Where settings and the log file live.
    pub data_dir: Option<String>,
    /// Enable mouse support.
    pub mouse: Option<bool>,
    /// Probe favicon URLs over the network.
    pub fetch_favicons: Option<bool>,
    /// Fetch web search suggestions while typing.
    pub suggestions: Option<bool>,
    /// Reload when the bookmarks file changes on disk.
    pub watch: Option<bool>,
}

/// Input timing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SearchConfig {
    pub bookmark_debounce_ms: Option<u64>,
    pub suggest_debounce_ms: Option<u64>,
}

/// Color overrides applied on top of the dark or light palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub fg: Option<String>,
    pub card_bg: Option<String>,
    pub card_selected_bg: Option<String>,
    pub card_title_fg: Option<String>,
    pub host_fg: Option<String>,
    pub tab_active_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
    pub dialog_bg: Option<String>,
    pub dialog_border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub search: SearchConfig,
    pub theme: ThemeConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default bookmark search debounce in milliseconds.
pub const DEFAULT_BOOKMARK_DEBOUNCE_MS: u64 = 150;
/// Default web suggestion debounce in milliseconds.
pub const DEFAULT_SUGGEST_DEBOUNCE_MS: u64 = 200;
/// Directory name under the platform config/data dirs.
pub const APP_DIR_NAME: &str = "bookmark-tui";

// ── Config file locator ──────────────────────────────────────────────────────

/// Candidate config file paths, highest priority first.
///
/// The CLI `--config` path is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("BOOKMARK_TUI_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".bookmark-tui.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_DIR_NAME).join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

fn expand_path(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(raw)),
        None => PathBuf::from(raw),
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                bookmarks_file: other
                    .general
                    .bookmarks_file
                    .clone()
                    .or(self.general.bookmarks_file),
                top_sites_file: other
                    .general
                    .top_sites_file
                    .clone()
                    .or(self.general.top_sites_file),
                data_dir: other.general.data_dir.clone().or(self.general.data_dir),
                mouse: other.general.mouse.or(self.general.mouse),
                fetch_favicons: other.general.fetch_favicons.or(self.general.fetch_favicons),
                suggestions: other.general.suggestions.or(self.general.suggestions),
                watch: other.general.watch.or(self.general.watch),
            },
            search: SearchConfig {
                bookmark_debounce_ms: other
                    .search
                    .bookmark_debounce_ms
                    .or(self.search.bookmark_debounce_ms),
                suggest_debounce_ms: other
                    .search
                    .suggest_debounce_ms
                    .or(self.search.suggest_debounce_ms),
            },
            theme: ThemeConfig {
                custom: match (&self.theme.custom, &other.theme.custom) {
                    (_, Some(o)) => Some(o.clone()),
                    (Some(s), None) => Some(s.clone()),
                    (None, None) => None,
                },
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Lowest priority first so higher ones overwrite.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Configured bookmarks file, if any. `None` means auto-detect.
    pub fn bookmarks_file(&self) -> Option<PathBuf> {
        self.general.bookmarks_file.as_deref().map(expand_path)
    }

    pub fn top_sites_file(&self) -> Option<PathBuf> {
        self.general.top_sites_file.as_deref().map(expand_path)
    }

    /// Data directory for settings and logs.
    pub fn data_dir(&self) -> PathBuf {
        match self.general.data_dir.as_deref() {
            Some(dir) => expand_path(dir),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME),
        }
    }

    /// Whether mouse support is enabled.
    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(true)
    }

    pub fn fetch_favicons(&self) -> bool {
        self.general.fetch_favicons.unwrap_or(false)
    }

    pub fn suggestions_enabled(&self) -> bool {
        self.general.suggestions.unwrap_or(true)
    }

    /// Whether the bookmarks file watcher is enabled.
    pub fn watch_enabled(&self) -> bool {
        self.general.watch.unwrap_or(true)
    }

    pub fn bookmark_debounce_ms(&self) -> u64 {
        self.search
            .bookmark_debounce_ms
            .unwrap_or(DEFAULT_BOOKMARK_DEBOUNCE_MS)
    }

    pub fn suggest_debounce_ms(&self) -> u64 {
        self.search
            .suggest_debounce_ms
            .unwrap_or(DEFAULT_SUGGEST_DEBOUNCE_MS)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert!(cfg.bookmarks_file().is_none());
        assert!(cfg.top_sites_file().is_none());
        assert!(cfg.mouse_enabled());
        assert!(!cfg.fetch_favicons());
        assert!(cfg.suggestions_enabled());
        assert!(cfg.watch_enabled());
        assert_eq!(cfg.bookmark_debounce_ms(), 150);
        assert_eq!(cfg.suggest_debounce_ms(), 200);
        assert!(cfg.data_dir().ends_with(APP_DIR_NAME));
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[general]
bookmarks_file = "/tmp/Bookmarks"
top_sites_file = "/tmp/top.json"
data_dir = "/tmp/bm-data"
mouse = false
fetch_favicons = true
suggestions = false
watch = false

[search]
bookmark_debounce_ms = 50
suggest_debounce_ms = 400
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.bookmarks_file(), Some(PathBuf::from("/tmp/Bookmarks")));
        assert_eq!(cfg.top_sites_file(), Some(PathBuf::from("/tmp/top.json")));
        assert_eq!(cfg.data_dir(), PathBuf::from("/tmp/bm-data"));
        assert!(!cfg.mouse_enabled());
        assert!(cfg.fetch_favicons());
        assert!(!cfg.suggestions_enabled());
        assert!(!cfg.watch_enabled());
        assert_eq!(cfg.bookmark_debounce_ms(), 50);
        assert_eq!(cfg.suggest_debounce_ms(), 400);
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[general]
mouse = false
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert!(!cfg.mouse_enabled());
        assert!(cfg.watch_enabled());
        assert_eq!(cfg.bookmark_debounce_ms(), 150);
    }

    #[test]
    fn test_toml_parsing_empty() {
        let cfg: AppConfig = toml::from_str("").expect("parse failed");
        assert!(cfg.mouse_enabled());
    }

    #[test]
    fn test_tilde_paths_expand_to_home() {
        let cfg = AppConfig {
            general: GeneralConfig {
                bookmarks_file: Some("~/Bookmarks".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(cfg.bookmarks_file(), Some(home.join("Bookmarks")));
        }
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            general: GeneralConfig {
                mouse: Some(false),
                watch: Some(true),
                ..Default::default()
            },
            search: SearchConfig {
                bookmark_debounce_ms: Some(10),
                suggest_debounce_ms: Some(20),
            },
            ..Default::default()
        };

        let over = AppConfig {
            general: GeneralConfig {
                mouse: Some(true),
                ..Default::default()
            },
            search: SearchConfig {
                bookmark_debounce_ms: Some(99),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert!(merged.mouse_enabled());
        assert!(merged.watch_enabled());
        assert_eq!(merged.bookmark_debounce_ms(), 99);
        assert_eq!(merged.suggest_debounce_ms(), 20);
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            general: GeneralConfig {
                watch: Some(false),
                top_sites_file: Some("/x.json".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let merged = base.merge(&AppConfig::default());
        assert!(!merged.watch_enabled());
        assert_eq!(merged.top_sites_file(), Some(PathBuf::from("/x.json")));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        let mut f = std::fs::File::create(&cfg_path).expect("create");
        writeln!(
            f,
            r#"
[general]
fetch_favicons = true

[search]
suggest_debounce_ms = 75
"#
        )
        .expect("write");

        let cfg = load_file(&cfg_path).expect("load");
        assert!(cfg.fetch_favicons());
        assert_eq!(cfg.suggest_debounce_ms(), 75);
        assert_eq!(cfg.bookmark_debounce_ms(), 150);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_file(Path::new("/nonexistent/config.toml")).is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[general]
bookmarks_file = "/from/file"
suggestions = false
"#,
        )
        .expect("write");

        let cli_overrides = AppConfig {
            general: GeneralConfig {
                bookmarks_file: Some("/from/cli".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        assert_eq!(cfg.bookmarks_file(), Some(PathBuf::from("/from/cli")));
        assert!(!cfg.suggestions_enabled());
    }

    #[test]
    fn test_theme_custom_colors() {
        let toml = r##"
[theme.custom]
card_bg = "#1a1b26"
border_fg = "#565f89"
"##;
        let cfg: AppConfig = toml::from_str(toml).expect("parse");
        let custom = cfg.theme.custom.as_ref().expect("custom present");
        assert_eq!(custom.card_bg.as_deref(), Some("#1a1b26"));
        assert_eq!(custom.border_fg.as_deref(), Some("#565f89"));
        assert!(custom.dialog_bg.is_none());
    }
}

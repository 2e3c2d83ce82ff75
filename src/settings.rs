//! Persisted user preferences.
//!
//! The settings object is stored as one JSON blob (`settings.json`) using the
//! camelCase keys of the original new-tab page. The dark-mode flag also lives
//! in its own file (`dark_mode`) and is toggled independently of the blob.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::i18n::Language;
use crate::websearch::SearchEngine;

const SETTINGS_FILE: &str = "settings.json";
const DARK_MODE_FILE: &str = "dark_mode";

/// Card size in the bookmark grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl GridSize {
    pub const ALL: [GridSize; 3] = [GridSize::Small, GridSize::Medium, GridSize::Large];

    /// Card width in terminal columns.
    pub fn card_width(self) -> u16 {
        match self {
            GridSize::Small => 24,
            GridSize::Medium => 32,
            GridSize::Large => 44,
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            GridSize::Small => "settings.gridSmall",
            GridSize::Medium => "settings.gridMedium",
            GridSize::Large => "settings.gridLarge",
        }
    }
}

/// User preferences with their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub grid_size: GridSize,
    pub default_search_engine: SearchEngine,
    pub show_most_visited: bool,
    pub show_recently_added: bool,
    pub animations_enabled: bool,
    pub dark_mode: bool,
    pub language: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: GridSize::Medium,
            default_search_engine: SearchEngine::Google,
            show_most_visited: true,
            show_recently_added: true,
            animations_enabled: true,
            dark_mode: false,
            language: Language::English,
        }
    }
}

/// A partial update; `Some` fields overwrite the current settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub grid_size: Option<GridSize>,
    pub default_search_engine: Option<SearchEngine>,
    pub show_most_visited: Option<bool>,
    pub show_recently_added: Option<bool>,
    pub animations_enabled: Option<bool>,
    pub dark_mode: Option<bool>,
    pub language: Option<Language>,
}

impl SettingsPatch {
    /// Patch that sets every field from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            grid_size: Some(settings.grid_size),
            default_search_engine: Some(settings.default_search_engine),
            show_most_visited: Some(settings.show_most_visited),
            show_recently_added: Some(settings.show_recently_added),
            animations_enabled: Some(settings.animations_enabled),
            dark_mode: Some(settings.dark_mode),
            language: Some(settings.language),
        }
    }

    /// Merge this patch on top of `base`.
    pub fn apply(&self, base: &Settings) -> Settings {
        Settings {
            grid_size: self.grid_size.unwrap_or(base.grid_size),
            default_search_engine: self
                .default_search_engine
                .unwrap_or(base.default_search_engine),
            show_most_visited: self.show_most_visited.unwrap_or(base.show_most_visited),
            show_recently_added: self.show_recently_added.unwrap_or(base.show_recently_added),
            animations_enabled: self.animations_enabled.unwrap_or(base.animations_enabled),
            dark_mode: self.dark_mode.unwrap_or(base.dark_mode),
            language: self.language.unwrap_or(base.language),
        }
    }
}

/// Merge persisted keys over the defaults one key at a time.
///
/// A key whose value doesn't deserialize (for example an unsupported
/// language) is dropped so the default survives.
fn merge_over_defaults(persisted: Map<String, Value>) -> Settings {
    let defaults = Settings::default();
    let mut merged = match serde_json::to_value(&defaults) {
        Ok(Value::Object(map)) => map,
        _ => return defaults,
    };
    for (key, value) in persisted {
        let mut candidate = merged.clone();
        candidate.insert(key.clone(), value);
        if serde_json::from_value::<Settings>(Value::Object(candidate.clone())).is_ok() {
            merged = candidate;
        } else {
            log::warn!("ignoring invalid persisted setting {:?}", key);
        }
    }
    serde_json::from_value(Value::Object(merged)).unwrap_or(defaults)
}

/// Loads and persists `Settings` under a data directory.
#[derive(Debug)]
pub struct SettingsStore {
    settings_path: PathBuf,
    dark_mode_path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Create a store rooted at `data_dir` and load whatever is persisted.
    pub fn open(data_dir: &Path) -> Self {
        let mut store = Self {
            settings_path: data_dir.join(SETTINGS_FILE),
            dark_mode_path: data_dir.join(DARK_MODE_FILE),
            settings: Settings::default(),
        };
        store.load();
        store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Re-read the persisted blob and dark-mode flag, merged over defaults.
    pub fn load(&mut self) -> &Settings {
        let mut settings = match fs::read_to_string(&self.settings_path) {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(Value::Object(map)) => merge_over_defaults(map),
                Ok(_) => Settings::default(),
                Err(e) => {
                    log::warn!("settings blob {} is not JSON: {}", self.settings_path.display(), e);
                    Settings::default()
                }
            },
            Err(_) => Settings::default(),
        };

        // The flag file is authoritative once it exists.
        if let Some(flag) = self.read_dark_mode_flag() {
            settings.dark_mode = flag;
        }
        self.settings = settings;
        &self.settings
    }

    fn read_dark_mode_flag(&self) -> Option<bool> {
        fs::read_to_string(&self.dark_mode_path)
            .ok()
            .map(|s| s.trim() == "true")
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.settings_path, serde_json::to_string(&self.settings)?)?;
        log::debug!("persisted settings to {}", self.settings_path.display());
        Ok(())
    }

    /// Merge `patch`, persist the full object, and return the new settings.
    pub fn save(&mut self, patch: &SettingsPatch) -> Result<&Settings> {
        self.settings = patch.apply(&self.settings);
        self.persist()?;
        Ok(&self.settings)
    }

    /// Restore defaults, keeping only the dark-mode flag, then save.
    pub fn reset(&mut self) -> Result<&Settings> {
        let dark_mode = self.settings.dark_mode;
        self.settings = Settings {
            dark_mode,
            ..Settings::default()
        };
        self.persist()?;
        Ok(&self.settings)
    }

    /// Switch the UI language and persist it.
    pub fn set_language(&mut self, language: Language) -> Result<&Settings> {
        self.save(&SettingsPatch {
            language: Some(language),
            ..Default::default()
        })
    }

    /// Persist only the independent dark-mode flag.
    pub fn set_dark_mode(&mut self, on: bool) -> Result<()> {
        self.settings.dark_mode = on;
        if let Some(parent) = self.dark_mode_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.dark_mode_path, if on { "true" } else { "false" })?;
        Ok(())
    }
}

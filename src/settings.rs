use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// The searchable field that the `keys` checkbox controls.
pub const URL_SEARCH_KEY: &str = "url";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FuzzySettings {
    pub enable_fuzzy_search: bool,
    /// Match strictness as a 0-1 fraction. 0 only accepts exact substrings.
    pub threshold: f64,
    /// Tab fields the search looks at ("title", "url").
    pub keys: Vec<String>,
    pub should_sort: bool,
    pub case_sensitive: bool,
}

impl Default for FuzzySettings {
    fn default() -> Self {
        Self {
            enable_fuzzy_search: true,
            threshold: 0.6,
            keys: vec!["title".to_string(), URL_SEARCH_KEY.to_string()],
            should_sort: true,
            case_sensitive: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    pub show_bookmarks: bool,
    pub show_history: bool,
    pub show_recently_closed: bool,
    pub search_all_windows: bool,
    pub show_last_query_on_popup: bool,
    pub recently_closed_limit: u32,
    pub history_limit: u32,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            show_bookmarks: false,
            show_history: false,
            show_recently_closed: true,
            search_all_windows: true,
            show_last_query_on_popup: false,
            recently_closed_limit: 5,
            history_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub fuzzy: FuzzySettings,
    pub general: GeneralSettings,
}

impl Settings {
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    log::warn!("[Settings] Failed to parse settings: {}, returning defaults", e);
                    Self::default()
                }),
                Err(e) => {
                    log::warn!("[Settings] Failed to read file: {}, returning defaults", e);
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp_path = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        // Write to tmp, then rename, so a crash never leaves a half-written file.
        fs::write(&tmp_path, json)?;
        fs::rename(tmp_path, path)?;

        Ok(())
    }

    /// The nested JSON form that dotted settings paths address.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Resolve a dotted path such as `fuzzy.enableFuzzySearch` against the
/// settings JSON.
pub fn find_setting<'a>(settings: &'a Value, location: &str) -> Result<&'a Value> {
    let unknown = || Error::UnknownSettingPath(location.to_string());

    if !location.contains('.') {
        return settings.get(location).ok_or_else(unknown);
    }

    location
        .split('.')
        .try_fold(settings, |node, key| node.get(key).ok_or_else(unknown))
}

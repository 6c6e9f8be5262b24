// Settings store: a pure reducer plus a snapshot holder with lock-free reads.
// Every mutation goes through `dispatch`; the UI never writes state directly.

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::settings::{FuzzySettings, GeneralSettings, Settings, URL_SEARCH_KEY};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    UpdateCheckbox { key: String, value: bool },
    UpdateNumber { key: String, value: i64 },
    /// Flips the named fuzzy-search flag.
    UpdateFuzzyCheckbox { key: String },
    /// Adds or removes "url" from the searchable fields.
    UpdateFuzzySearchKeys { enabled: bool },
    /// Range slider position, 0-10.
    UpdateFuzzyThresholdRange { value: i64 },
    ResetSettings,
}

pub trait Store {
    fn get_state(&self) -> Arc<Settings>;
    fn dispatch(&self, action: Action);
}

impl<S: Store + ?Sized> Store for &S {
    fn get_state(&self) -> Arc<Settings> {
        (**self).get_state()
    }

    fn dispatch(&self, action: Action) {
        (**self).dispatch(action)
    }
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn get_state(&self) -> Arc<Settings> {
        (**self).get_state()
    }

    fn dispatch(&self, action: Action) {
        (**self).dispatch(action)
    }
}

fn general_flag<'a>(general: &'a mut GeneralSettings, key: &str) -> Option<&'a mut bool> {
    match key {
        "showBookmarks" => Some(&mut general.show_bookmarks),
        "showHistory" => Some(&mut general.show_history),
        "showRecentlyClosed" => Some(&mut general.show_recently_closed),
        "searchAllWindows" => Some(&mut general.search_all_windows),
        "showLastQueryOnPopup" => Some(&mut general.show_last_query_on_popup),
        _ => None,
    }
}

fn general_number<'a>(general: &'a mut GeneralSettings, key: &str) -> Option<&'a mut u32> {
    match key {
        "recentlyClosedLimit" => Some(&mut general.recently_closed_limit),
        "historyLimit" => Some(&mut general.history_limit),
        _ => None,
    }
}

fn fuzzy_flag<'a>(fuzzy: &'a mut FuzzySettings, key: &str) -> Option<&'a mut bool> {
    match key {
        "enableFuzzySearch" => Some(&mut fuzzy.enable_fuzzy_search),
        "shouldSort" => Some(&mut fuzzy.should_sort),
        "caseSensitive" => Some(&mut fuzzy.case_sensitive),
        _ => None,
    }
}

/// Apply one action to a settings snapshot, returning the next snapshot.
/// Actions naming an unknown key leave the settings unchanged.
pub fn reduce(settings: &Settings, action: &Action) -> Settings {
    let mut next = settings.clone();

    match action {
        Action::UpdateCheckbox { key, value } => match general_flag(&mut next.general, key) {
            Some(flag) => *flag = *value,
            None => log::warn!("[Store] Ignoring checkbox update for unknown key '{}'", key),
        },
        Action::UpdateNumber { key, value } => match general_number(&mut next.general, key) {
            Some(number) => *number = (*value).clamp(0, i64::from(u32::MAX)) as u32,
            None => log::warn!("[Store] Ignoring number update for unknown key '{}'", key),
        },
        Action::UpdateFuzzyCheckbox { key } => match fuzzy_flag(&mut next.fuzzy, key) {
            Some(flag) => *flag = !*flag,
            None => log::warn!("[Store] Ignoring fuzzy toggle for unknown key '{}'", key),
        },
        Action::UpdateFuzzySearchKeys { enabled } => {
            let keys = &mut next.fuzzy.keys;
            if *enabled {
                if !keys.iter().any(|k| k == URL_SEARCH_KEY) {
                    keys.push(URL_SEARCH_KEY.to_string());
                }
            } else {
                keys.retain(|k| k != URL_SEARCH_KEY);
            }
        }
        Action::UpdateFuzzyThresholdRange { value } => {
            next.fuzzy.threshold = (*value as f64 / 10.0).clamp(0.0, 1.0);
        }
        Action::ResetSettings => next = Settings::default(),
    }

    next
}

pub struct SettingsStore {
    state: ArcSwap<Settings>,
    // None keeps the store in memory only
    path: Option<PathBuf>,
    // Held across reduce, swap and save so the file always matches the last snapshot
    write_lock: Mutex<()>,
}

impl SettingsStore {
    /// Load settings from `path` (defaults when missing or unreadable) and
    /// persist every dispatched change back to it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = Settings::load(&path);
        log::info!("[Store] Loaded settings from {:?}", path);

        Self {
            state: ArcSwap::from_pointee(settings),
            path: Some(path),
            write_lock: Mutex::new(()),
        }
    }

    pub fn in_memory(settings: Settings) -> Self {
        Self {
            state: ArcSwap::from_pointee(settings),
            path: None,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Store for SettingsStore {
    fn get_state(&self) -> Arc<Settings> {
        self.state.load_full()
    }

    fn dispatch(&self, action: Action) {
        log::debug!("[Store] Dispatching {:?}", action);
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let next = Arc::new(reduce(&self.state.load(), &action));
        self.state.store(Arc::clone(&next));

        if action == Action::ResetSettings {
            log::info!("[Store] Settings reset to defaults");
        }

        if let Some(path) = &self.path {
            if let Err(e) = next.save(path) {
                log::error!("[Store] Failed to persist settings to {:?}: {}", path, e);
            }
        }
    }
}

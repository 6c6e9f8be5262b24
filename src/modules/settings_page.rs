// Settings page controller.
//
// Paints the persisted settings into the page's form controls and turns
// form changes back into store actions. The page itself is behind
// `SettingsForm` so this module never touches a real DOM.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::modules::permissions::{Permission, PermissionRequester};
use crate::settings::{find_setting, URL_SEARCH_KEY};
use crate::store::{Action, Store};

/// The `type` attribute of an `<input>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Checkbox,
    Number,
    Range,
    Other,
}

impl From<&str> for InputKind {
    fn from(kind: &str) -> Self {
        match kind {
            "checkbox" => Self::Checkbox,
            "number" => Self::Number,
            "range" => Self::Range,
            _ => Self::Other,
        }
    }
}

/// The range part of the input's `ValidityState`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Validity {
    pub range_underflow: bool,
    pub range_overflow: bool,
}

impl Validity {
    pub fn in_range(&self) -> bool {
        !self.range_underflow && !self.range_overflow
    }
}

/// Input state read off the element when its `change` event fires.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSnapshot {
    pub id: String,
    pub kind: InputKind,
    pub value: String,
    pub checked: bool,
    pub validity: Validity,
}

pub trait SettingsForm {
    /// Every input on the page, bound or not.
    fn inputs(&self) -> Vec<(String, InputKind)>;
    fn set_checked(&mut self, id: &str, checked: bool);
    fn set_value(&mut self, id: &str, value: &str);
    /// Fire a synthetic `change` so dependent UI (labels, toggled sections)
    /// catches up with a programmatic update.
    fn notify_change(&mut self, id: &str);
    fn reload(&mut self);
}

/// Which settings path each input id edits, e.g. `fuzzyThreshold` ->
/// `fuzzy.threshold`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputBindings(BTreeMap<String, String>);

impl Default for InputBindings {
    fn default() -> Self {
        Self::from_pairs([
            ("enableFuzzySearch", "fuzzy.enableFuzzySearch"),
            ("shouldSort", "fuzzy.shouldSort"),
            ("caseSensitive", "fuzzy.caseSensitive"),
            ("searchUrls", "fuzzy.keys"),
            ("fuzzyThreshold", "fuzzy.threshold"),
            ("showBookmarks", "general.showBookmarks"),
            ("showHistory", "general.showHistory"),
            ("showRecentlyClosed", "general.showRecentlyClosed"),
            ("searchAllWindows", "general.searchAllWindows"),
            ("showLastQueryOnPopup", "general.showLastQueryOnPopup"),
            ("recentlyClosedLimit", "general.recentlyClosedLimit"),
            ("historyLimit", "general.historyLimit"),
        ])
    }
}

impl InputBindings {
    pub fn from_pairs<I, K, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(id, path)| (id.into(), path.into()))
                .collect(),
        )
    }

    pub fn path(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct BoundInput {
    id: String,
    kind: InputKind,
    path: String,
}

/// `parseInt` semantics: leading integer part, fractions truncated.
fn parse_integer(value: &str) -> Option<i64> {
    let value = value.trim();
    value.parse::<i64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.trunc() as i64)
    })
}

fn paint_input<F: SettingsForm + ?Sized>(form: &mut F, input: &BoundInput, value: &Value) {
    match (input.kind, value) {
        (InputKind::Checkbox, Value::Bool(checked)) => form.set_checked(&input.id, *checked),
        // Array-valued checkbox: the searchable fields list, which the page
        // only exposes as "also search URLs".
        (InputKind::Checkbox, Value::Array(items)) => {
            let checked = items.iter().any(|item| item.as_str() == Some(URL_SEARCH_KEY));
            form.set_checked(&input.id, checked);
        }
        (InputKind::Number, Value::Number(n)) => form.set_value(&input.id, &n.to_string()),
        // Stored as a 0-1 fraction, shown on a 0-10 slider
        (InputKind::Range, Value::Number(n)) => {
            if let Some(fraction) = n.as_f64() {
                let position = (fraction * 10.0).round() as i64;
                form.set_value(&input.id, &position.to_string());
            }
        }
        _ => log::debug!(
            "[Settings] Nothing to paint for '{}' ({:?}) from {}",
            input.id,
            input.kind,
            value
        ),
    }
}

pub struct SettingsPage<S, F, P> {
    store: S,
    form: F,
    permissions: P,
    bindings: InputBindings,
}

impl<S: Store, F: SettingsForm, P: PermissionRequester> SettingsPage<S, F, P> {
    pub fn new(store: S, form: F, permissions: P, bindings: InputBindings) -> Self {
        Self {
            store,
            form,
            permissions,
            bindings,
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn bound_inputs(&self) -> Vec<BoundInput> {
        self.form
            .inputs()
            .into_iter()
            .filter_map(|(id, kind)| {
                let path = self.bindings.path(&id)?.to_string();
                Some(BoundInput { id, kind, path })
            })
            .collect()
    }

    /// Fill the page from the current settings. Call once, before the host
    /// starts forwarding `change` events.
    pub fn mount(&mut self) -> Result<()> {
        let painted = self.paint()?;
        log::info!("[Settings] Mounted settings page with {} bound input(s)", painted);
        Ok(())
    }

    /// Write the current settings into every bound input. Returns how many
    /// inputs were painted.
    pub fn paint(&mut self) -> Result<usize> {
        let state = self.store.get_state().to_value()?;
        let inputs = self.bound_inputs();

        for input in &inputs {
            let value = find_setting(&state, &input.path)?;
            paint_input(&mut self.form, input, value);
            self.form.notify_change(&input.id);
        }

        Ok(inputs.len())
    }

    /// `change` handler for a bound input. Returns the action that was
    /// dispatched, if any.
    pub async fn handle_change(&mut self, input: &InputSnapshot) -> Result<Option<Action>> {
        let path = self
            .bindings
            .path(&input.id)
            .ok_or_else(|| Error::UnboundInput(input.id.clone()))?
            .to_string();
        let group = path.split('.').next().unwrap_or(&path);
        let key = path.rsplit('.').next().unwrap_or(&path).to_string();

        let action = match input.kind {
            InputKind::Range => parse_integer(&input.value)
                .map(|value| Action::UpdateFuzzyThresholdRange { value }),
            InputKind::Checkbox => {
                if let Some(permission) = Permission::for_setting(&key) {
                    log::debug!("[Settings] Requesting '{}' permission for '{}'", permission, key);
                    if self.permissions.request(permission).await {
                        Some(Action::UpdateCheckbox {
                            key,
                            value: input.checked,
                        })
                    } else {
                        log::info!(
                            "[Settings] '{}' permission declined, unchecking '{}'",
                            permission,
                            input.id
                        );
                        self.form.set_checked(&input.id, false);
                        None
                    }
                } else if group == "fuzzy" && key != "keys" {
                    Some(Action::UpdateFuzzyCheckbox { key })
                } else if key == "keys" {
                    Some(Action::UpdateFuzzySearchKeys {
                        enabled: input.checked,
                    })
                } else {
                    Some(Action::UpdateCheckbox {
                        key,
                        value: input.checked,
                    })
                }
            }
            InputKind::Number => {
                if !input.validity.in_range() {
                    log::debug!(
                        "[Settings] Dropping out-of-range value '{}' for '{}'",
                        input.value,
                        input.id
                    );
                    None
                } else {
                    parse_integer(&input.value).map(|value| Action::UpdateNumber { key, value })
                }
            }
            InputKind::Other => None,
        };

        if let Some(action) = &action {
            self.store.dispatch(action.clone());
        }
        Ok(action)
    }

    /// Reset button: back to defaults, then reload so the page repaints.
    pub fn reset(&mut self) {
        self.store.dispatch(Action::ResetSettings);
        self.form.reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::store::SettingsStore;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::future::{ready, Future};
    use std::sync::{Arc, Mutex};

    struct RecordingStore {
        inner: SettingsStore,
        actions: Mutex<Vec<Action>>,
    }

    impl RecordingStore {
        fn new(settings: Settings) -> Self {
            Self {
                inner: SettingsStore::in_memory(settings),
                actions: Mutex::new(Vec::new()),
            }
        }

        fn actions(&self) -> Vec<Action> {
            self.actions.lock().unwrap().clone()
        }
    }

    impl Store for RecordingStore {
        fn get_state(&self) -> Arc<Settings> {
            self.inner.get_state()
        }

        fn dispatch(&self, action: Action) {
            self.actions.lock().unwrap().push(action.clone());
            self.inner.dispatch(action);
        }
    }

    #[derive(Default)]
    struct FakeForm {
        inputs: Vec<(String, InputKind)>,
        checked: HashMap<String, bool>,
        values: HashMap<String, String>,
        notified: Vec<String>,
        reloads: usize,
    }

    impl FakeForm {
        fn with_default_inputs() -> Self {
            let inputs = [
                ("enableFuzzySearch", InputKind::Checkbox),
                ("shouldSort", InputKind::Checkbox),
                ("searchUrls", InputKind::Checkbox),
                ("fuzzyThreshold", InputKind::Range),
                ("showBookmarks", InputKind::Checkbox),
                ("showHistory", InputKind::Checkbox),
                ("showRecentlyClosed", InputKind::Checkbox),
                ("recentlyClosedLimit", InputKind::Number),
                // Not a setting, must be left alone
                ("keybindingFilter", InputKind::Other),
            ];
            Self {
                inputs: inputs
                    .iter()
                    .map(|(id, kind)| (id.to_string(), *kind))
                    .collect(),
                ..Self::default()
            }
        }
    }

    impl SettingsForm for FakeForm {
        fn inputs(&self) -> Vec<(String, InputKind)> {
            self.inputs.clone()
        }

        fn set_checked(&mut self, id: &str, checked: bool) {
            self.checked.insert(id.to_string(), checked);
        }

        fn set_value(&mut self, id: &str, value: &str) {
            self.values.insert(id.to_string(), value.to_string());
        }

        fn notify_change(&mut self, id: &str) {
            self.notified.push(id.to_string());
        }

        fn reload(&mut self) {
            self.reloads += 1;
        }
    }

    struct FixedPermission {
        granted: bool,
        requested: RefCell<Vec<Permission>>,
    }

    impl FixedPermission {
        fn new(granted: bool) -> Self {
            Self {
                granted,
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl PermissionRequester for FixedPermission {
        fn request(&self, permission: Permission) -> impl Future<Output = bool> {
            self.requested.borrow_mut().push(permission);
            ready(self.granted)
        }
    }

    type Page<'a> = SettingsPage<&'a RecordingStore, FakeForm, FixedPermission>;

    fn page(store: &RecordingStore, granted: bool) -> Page<'_> {
        SettingsPage::new(
            store,
            FakeForm::with_default_inputs(),
            FixedPermission::new(granted),
            InputBindings::default(),
        )
    }

    fn checkbox(id: &str, checked: bool) -> InputSnapshot {
        InputSnapshot {
            id: id.to_string(),
            kind: InputKind::Checkbox,
            value: "on".to_string(),
            checked,
            validity: Validity::default(),
        }
    }

    fn valued(id: &str, kind: InputKind, value: &str) -> InputSnapshot {
        InputSnapshot {
            id: id.to_string(),
            kind,
            value: value.to_string(),
            checked: false,
            validity: Validity::default(),
        }
    }

    #[test]
    fn test_mount_paints_defaults() {
        let store = RecordingStore::new(Settings::default());
        let mut page = page(&store, true);
        page.mount().unwrap();

        let form = page.form();
        assert!(form.checked["enableFuzzySearch"]);
        assert!(!form.checked["showBookmarks"]);
        assert!(form.checked["showRecentlyClosed"]);
        // keys = ["title", "url"]
        assert!(form.checked["searchUrls"]);
        // 0.6 -> 6
        assert_eq!(form.values["fuzzyThreshold"], "6");
        assert_eq!(form.values["recentlyClosedLimit"], "5");

        assert_eq!(form.notified.len(), 8);
        assert!(!form.notified.contains(&"keybindingFilter".to_string()));
        assert!(store.actions().is_empty());
    }

    #[test]
    fn test_url_checkbox_tracks_key_membership() {
        let mut settings = Settings::default();
        settings.fuzzy.keys = vec!["title".to_string()];
        let store = RecordingStore::new(settings);
        let mut page = page(&store, true);
        page.paint().unwrap();

        assert!(!page.form().checked["searchUrls"]);
    }

    #[tokio::test]
    async fn test_range_paint_and_change_are_asymmetric() {
        let mut settings = Settings::default();
        settings.fuzzy.threshold = 3.0;
        let store = RecordingStore::new(settings);
        let mut page = page(&store, true);

        page.paint().unwrap();
        assert_eq!(page.form().values["fuzzyThreshold"], "30");

        let action = page
            .handle_change(&valued("fuzzyThreshold", InputKind::Range, "7"))
            .await
            .unwrap();
        assert_eq!(action, Some(Action::UpdateFuzzyThresholdRange { value: 7 }));
        assert!((store.get_state().fuzzy.threshold - 0.7).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_denied_permission_unchecks_and_dispatches_nothing() {
        let store = RecordingStore::new(Settings::default());
        let mut page = page(&store, false);
        page.mount().unwrap();

        let action = page.handle_change(&checkbox("showBookmarks", true)).await.unwrap();

        assert_eq!(action, None);
        assert!(!page.form().checked["showBookmarks"]);
        assert!(store.actions().is_empty());
        assert!(!store.get_state().general.show_bookmarks);
        assert_eq!(
            *page.permissions.requested.borrow(),
            vec![Permission::Bookmarks]
        );
    }

    #[tokio::test]
    async fn test_granted_permission_dispatches_checkbox() {
        let store = RecordingStore::new(Settings::default());
        let mut page = page(&store, true);

        page.handle_change(&checkbox("showHistory", true)).await.unwrap();

        assert_eq!(
            store.actions(),
            vec![Action::UpdateCheckbox {
                key: "showHistory".to_string(),
                value: true
            }]
        );
        assert!(store.get_state().general.show_history);
        assert_eq!(*page.permissions.requested.borrow(), vec![Permission::History]);
    }

    #[rstest]
    #[case(
        checkbox("enableFuzzySearch", false),
        Action::UpdateFuzzyCheckbox { key: "enableFuzzySearch".to_string() }
    )]
    #[case(
        checkbox("searchUrls", false),
        Action::UpdateFuzzySearchKeys { enabled: false }
    )]
    #[case(
        checkbox("showRecentlyClosed", false),
        Action::UpdateCheckbox { key: "showRecentlyClosed".to_string(), value: false }
    )]
    #[case(
        valued("recentlyClosedLimit", InputKind::Number, "12"),
        Action::UpdateNumber { key: "recentlyClosedLimit".to_string(), value: 12 }
    )]
    #[tokio::test]
    async fn test_change_dispatches_one_action(
        #[case] input: InputSnapshot,
        #[case] expected: Action,
    ) {
        let store = RecordingStore::new(Settings::default());
        let mut page = page(&store, true);

        let action = page.handle_change(&input).await.unwrap();

        assert_eq!(action, Some(expected.clone()));
        assert_eq!(store.actions(), vec![expected]);
        assert!(page.permissions.requested.borrow().is_empty());
    }

    #[rstest]
    #[case(Validity { range_underflow: false, range_overflow: true }, "99")]
    #[case(Validity { range_underflow: true, range_overflow: false }, "-1")]
    #[case(Validity::default(), "lots")]
    #[tokio::test]
    async fn test_invalid_numbers_are_dropped(#[case] validity: Validity, #[case] value: &str) {
        let store = RecordingStore::new(Settings::default());
        let mut page = page(&store, true);

        let input = InputSnapshot {
            validity,
            ..valued("recentlyClosedLimit", InputKind::Number, value)
        };
        let action = page.handle_change(&input).await.unwrap();

        assert_eq!(action, None);
        assert!(store.actions().is_empty());
    }

    #[tokio::test]
    async fn test_unbound_input_is_an_error() {
        let store = RecordingStore::new(Settings::default());
        let mut page = page(&store, true);

        let result = page.handle_change(&checkbox("keybindingFilter", true)).await;
        assert!(matches!(result, Err(Error::UnboundInput(id)) if id == "keybindingFilter"));
    }

    #[test]
    fn test_bad_binding_path_fails_paint() {
        let store = RecordingStore::new(Settings::default());
        let mut page = SettingsPage::new(
            &store,
            FakeForm::with_default_inputs(),
            FixedPermission::new(true),
            InputBindings::from_pairs([("shouldSort", "fuzzy.sortResults")]),
        );

        assert!(matches!(
            page.paint(),
            Err(Error::UnknownSettingPath(path)) if path == "fuzzy.sortResults"
        ));
    }

    #[test]
    fn test_reset_dispatches_and_reloads() {
        let mut settings = Settings::default();
        settings.general.show_history = true;
        let store = RecordingStore::new(settings);
        let mut page = page(&store, true);

        page.reset();

        assert_eq!(store.actions(), vec![Action::ResetSettings]);
        assert_eq!(*store.get_state(), Settings::default());
        assert_eq!(page.form().reloads, 1);
    }

    #[test]
    fn test_bindings_from_json() {
        let bindings: InputBindings =
            serde_json::from_str(r#"{ "popupWidth": "popupWidth", "fuzzyThreshold": "fuzzy.threshold" }"#)
                .unwrap();

        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings.path("fuzzyThreshold"), Some("fuzzy.threshold"));
        assert_eq!(bindings.path("showHistory"), None);
    }

    #[rstest]
    #[case("7", Some(7))]
    #[case(" 12 ", Some(12))]
    #[case("7.9", Some(7))]
    #[case("-3", Some(-3))]
    #[case("", None)]
    #[case("seven", None)]
    fn test_parse_integer(#[case] value: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_integer(value), expected);
    }
}

// Tab Search Library Entry Point
// Settings page and popup controllers for a searchable list of open tabs.
// Hosts (a wasm or webview shell) implement the view traits and forward
// DOM events; everything here is testable without a browser.

pub mod error;
pub mod settings;
pub mod store;

// Shared tab records
pub mod state;

// Controllers and their collaborators
pub mod modules;

pub use error::{Error, Result};
pub use modules::popup::Popup;
pub use modules::settings_page::SettingsPage;
pub use settings::Settings;
pub use store::{Action, SettingsStore, Store};

// Module exports for the page controllers
pub mod deleted_tabs;        // Tabs hidden until the browser closes them
pub mod keybindings;         // Settings-page shortcut table
pub mod keys;                // Popup key vocabulary
pub mod permissions;         // Optional browser permissions
pub mod popup;               // Popup key/click/search glue
pub mod search;              // Fuzzy tab filtering
pub mod settings_page;       // Settings form <-> store sync

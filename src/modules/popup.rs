// Popup event glue: keyboard routing, tab clicks and search-box updates.
// The host owns the real DOM and forwards events here.

use crate::modules::keys::{Direction, Key, KeyPress};
use crate::modules::search::{FuzzyFilter, SearchSession, TabFilter};
use crate::state::{Tab, TabId};

/// Where keyboard focus currently sits in the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    SearchInput,
    /// A tab list entry; `None` when the element carries no tab id.
    Tab(Option<TabId>),
    Other,
}

impl Focus {
    pub fn tab_id(self) -> Option<TabId> {
        match self {
            Self::Tab(id) => id,
            _ => None,
        }
    }
}

pub trait PopupView {
    fn focus(&self) -> Focus;
    fn search_text(&self) -> String;
    fn clear_search(&mut self);
    fn focus_search(&mut self);
    fn focus_first_tab(&mut self);
    /// Tab id of the first entry in the rendered list, if it has one.
    fn first_tab_id(&self) -> Option<TabId>;
    fn set_clear_button_visible(&mut self, visible: bool);
    fn render_tabs(&mut self, tabs: &[Tab]);
    fn close_window(&mut self);
}

/// Browser-side effects the popup asks the host to carry out.
pub trait TabActions {
    fn switch_active_tab(&mut self, id: TabId);
    /// `confirm` is set when the delete came from a ctrl+click.
    fn delete_tab(&mut self, id: TabId, confirm: bool);
    fn navigate_results(&mut self, direction: Direction);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    pub prevent_default: bool,
}

impl KeyOutcome {
    const PREVENT: Self = Self {
        prevent_default: true,
    };
    const PASS: Self = Self {
        prevent_default: false,
    };
}

pub struct Popup<V, A, F = FuzzyFilter> {
    view: V,
    actions: A,
    search: SearchSession<F>,
}

impl<V: PopupView, A: TabActions, F: TabFilter> Popup<V, A, F> {
    pub fn new(view: V, actions: A, search: SearchSession<F>) -> Self {
        Self {
            view,
            actions,
            search,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn actions(&self) -> &A {
        &self.actions
    }

    pub fn search(&self) -> &SearchSession<F> {
        &self.search
    }

    /// Search box `input` handler.
    pub fn on_search_input(&mut self) -> Vec<Tab> {
        let text = self.view.search_text();
        self.search.update(&mut self.view, &text)
    }

    /// Empties the search box, restores the full list and moves focus to it.
    pub fn clear_input(&mut self) {
        self.view.clear_search();
        self.on_search_input();
        self.view.focus_first_tab();
    }

    pub fn handle_key_down(&mut self, press: &KeyPress) -> KeyOutcome {
        if let Some(direction) = press.key.direction() {
            self.actions.navigate_results(direction);
            // Tab and up/down would otherwise move focus or scroll the popup
            return if direction.is_vertical() {
                KeyOutcome::PREVENT
            } else {
                KeyOutcome::PASS
            };
        }

        match press.key {
            Key::Control => KeyOutcome::PASS,
            Key::Delete | Key::Backspace => {
                if press.ctrl {
                    if let Some(id) = self.view.focus().tab_id() {
                        self.delete(id, false);
                    }
                }
                KeyOutcome::PASS
            }
            Key::Enter => {
                let focus = self.view.focus();
                let target = match self.view.first_tab_id() {
                    Some(first) if focus != Focus::SearchInput => Some(first),
                    _ => focus.tab_id(),
                };

                match target {
                    Some(id) => self.actions.switch_active_tab(id),
                    None => log::debug!("[Popup] Enter with no tab to switch to"),
                }
                KeyOutcome::PREVENT
            }
            Key::Escape => {
                if self.view.search_text().is_empty() {
                    self.view.close_window();
                } else {
                    self.clear_input();
                }
                KeyOutcome::PASS
            }
            _ => {
                // Typing anywhere lands in the search box
                self.view.focus_search();
                KeyOutcome::PASS
            }
        }
    }

    pub fn handle_tab_click(&mut self, id: TabId, ctrl: bool) {
        if ctrl {
            self.delete(id, true);
        } else {
            self.actions.switch_active_tab(id);
        }
    }

    fn delete(&mut self, id: TabId, confirm: bool) {
        self.search.deleted().insert(id);
        log::debug!("[Popup] Deleting tab {}", id);
        self.actions.delete_tab(id, confirm);
    }
}

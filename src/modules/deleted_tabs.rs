use dashmap::DashSet;
use std::sync::Arc;

use crate::state::{Tab, TabId};

/// Tabs the user deleted from the popup that the browser has not finished
/// closing yet. Clones share the same set.
#[derive(Clone, Debug, Default)]
pub struct DeletedTabsCache {
    ids: Arc<DashSet<TabId>>,
}

impl DeletedTabsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a tab as deleted. Returns false if it already was.
    pub fn insert(&self, id: TabId) -> bool {
        let inserted = self.ids.insert(id);
        if inserted {
            log::debug!("[DeletedTabs] Marked tab {} as deleted", id);
        }
        inserted
    }

    /// Forgets a tab once the browser confirms removal.
    pub fn remove(&self, id: TabId) -> bool {
        self.ids.remove(&id).is_some()
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drops deleted tabs, keeping the order of the rest.
    pub fn retain_live(&self, tabs: &[Tab]) -> Vec<Tab> {
        tabs.iter()
            .filter(|tab| !self.contains(tab.id))
            .cloned()
            .collect()
    }
}

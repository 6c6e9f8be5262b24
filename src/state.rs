// Tab records shared by the popup controller, search and the deleted-tabs cache.

use serde::{Deserialize, Serialize};
use url::Url;

pub type TabId = i64;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    #[serde(default)]
    pub window_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub pinned: bool,
}

impl Tab {
    pub fn new(id: TabId, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            window_id: None,
            title: title.into(),
            url: url.into(),
            fav_icon_url: None,
            active: false,
            pinned: false,
        }
    }

    /// The URL as users type it: the raw text after `://`, minus the slash on
    /// a bare host. Paths keep their trailing slash and are not percent-encoded.
    /// Unparseable URLs are returned unchanged.
    pub fn schemeless_url(&self) -> String {
        let bare_host = match Url::parse(&self.url) {
            Ok(u) if u.has_host() => {
                u.path() == "/" && u.query().is_none() && u.fragment().is_none()
            }
            _ => return self.url.clone(),
        };

        let Some((_, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        if bare_host {
            rest.strip_suffix('/').unwrap_or(rest).to_string()
        } else {
            rest.to_string()
        }
    }
}

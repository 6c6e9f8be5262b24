use std::fmt;
use std::future::Future;

/// Optional browser permissions that gate settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Bookmarks,
    History,
}

impl Permission {
    /// The permission a settings checkbox needs before it may be enabled.
    pub fn for_setting(key: &str) -> Option<Self> {
        match key {
            "showBookmarks" => Some(Self::Bookmarks),
            "showHistory" => Some(Self::History),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bookmarks => "bookmarks",
            Self::History => "history",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host side of `permissions.request`. Resolves to whether the user granted it.
pub trait PermissionRequester {
    fn request(&self, permission: Permission) -> impl Future<Output = bool>;
}

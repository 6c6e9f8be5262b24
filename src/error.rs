use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A dotted settings path that does not point at an existing key.
    #[error("unknown settings path `{0}`")]
    UnknownSettingPath(String),

    #[error("input `{0}` is not bound to a setting")]
    UnboundInput(String),

    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

use thiserror::Error;

/// Errors that can occur during link graph operations.
///
/// Resolution itself never fails: missing and ambiguous targets are modelled
/// as placeholders. Only lookups that assume existence and the file-backed
/// helpers (config, snapshots) return errors.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("resource not found: {uri}")]
    NotFound { uri: String },

    #[error("invalid uri: {input}")]
    InvalidUri { input: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("snapshot error: {message} (path: {path})")]
    Snapshot { message: String, path: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `GraphError`.
pub type Result<T> = std::result::Result<T, GraphError>;

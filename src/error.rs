use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid timestamp '{value}', expected yyyy-MM-dd HH:mm:ss: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database connection is not initialized")]
    NotInitialized,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("input closed while waiting for '{0}'")]
    InputClosed(&'static str),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to resolve the application data directory")]
    NoDataDir,
}

pub type StoreResult<T> = Result<T, StoreError>;

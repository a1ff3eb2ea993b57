use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not defined in the environment")]
    Missing(&'static str),
    #[error("{0} must not be blank")]
    Blank(&'static str),
}

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Failed to connect to the database: {0}")]
    Connection(#[source] mongodb::error::Error),
    #[error("Database client is not connected. Call connect() first.")]
    NotConnected,
    #[error("Todo item {0} not found")]
    NotFound(i64),
    #[error("Todo item {0} already exists")]
    DuplicateId(i64),
    #[error("Invalid todo id {0}")]
    InvalidId(i64),
    #[error("Identifier counter for collection {0} is unavailable")]
    CounterUnavailable(String),
    #[error("Database error: {0}")]
    Store(#[from] mongodb::error::Error),
}

impl TodoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TodoError::NotFound(_))
    }

    pub fn is_not_connected(&self) -> bool {
        matches!(self, TodoError::NotConnected)
    }
}

pub type Result<T, E = TodoError> = std::result::Result<T, E>;

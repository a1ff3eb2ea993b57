//! # Store configuration
//!
//! ## Environment Variables
//!
//! - `DB_URI` or `MONGODB_URL`: MongoDB connection string
//! - `DATABASE_NAME`: database holding the todo collection
//!
//! A `.env` file in the working directory is loaded first when present.

use std::{env, fmt};

use crate::errors::ConfigError;

pub const URI_VARS: [&str; 2] = ["DB_URI", "MONGODB_URL"];
pub const DATABASE_NAME_VAR: &str = "DATABASE_NAME";

/// Validated connection parameters for the todo store.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    uri: String,
    database_name: String,
}

impl StoreConfig {
    pub fn new(
        uri: impl Into<String>,
        database_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let uri = uri.into();
        let database_name = database_name.into();

        if uri.trim().is_empty() {
            return Err(ConfigError::Blank(URI_VARS[0]));
        }
        if database_name.trim().is_empty() {
            return Err(ConfigError::Blank(DATABASE_NAME_VAR));
        }

        Ok(Self { uri, database_name })
    }

    /// Reads the configuration from the process environment, after loading `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_database(None)
    }

    /// Like [`from_env`](Self::from_env), but a given `database_name` wins over
    /// `DATABASE_NAME`.
    pub fn from_env_with_database(database_name: Option<&str>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| match database_name {
            Some(name) if key == DATABASE_NAME_VAR => Some(name.to_string()),
            _ => env::var(key).ok(),
        })
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = URI_VARS
            .iter()
            .find_map(|key| lookup(key))
            .ok_or(ConfigError::Missing(URI_VARS[0]))?;
        let database_name =
            lookup(DATABASE_NAME_VAR).ok_or(ConfigError::Missing(DATABASE_NAME_VAR))?;

        Self::new(uri, database_name)
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("uri", &"<redacted>")
            .field("database_name", &self.database_name)
            .finish()
    }
}

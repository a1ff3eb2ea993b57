//! # Database connection module
//!
//! [`ConnectionManager`] owns the single MongoDB client used by the crate and
//! enforces the connection lifecycle:
//!
//! ```text
//! Disconnected --connect()--> Connected --disconnect()--> Disconnected
//! ```
//!
//! Connecting while connected and disconnecting while disconnected are no-ops.
//! Every store access goes through [`ConnectionManager::store`], which fails
//! with [`TodoError::NotConnected`] unless the manager is connected.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tododactyl::{config::StoreConfig, db::ConnectionManager};
//!
//! # async fn run() -> tododactyl::errors::Result<()> {
//! let manager = ConnectionManager::new(StoreConfig::from_env()?);
//! manager.connect().await?;
//! let db = manager.store().await?;
//! println!("using {}", db.name());
//! manager.disconnect().await?;
//! # Ok(())
//! # }
//! ```

use mongodb::{
    Client, Database,
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{
    config::StoreConfig,
    errors::{Result, TodoError},
};

/// Observable lifecycle state of a [`ConnectionManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

// The client only exists while connected.
enum Connection {
    Disconnected,
    Connected(Client),
}

impl Connection {
    fn state(&self) -> ConnectionState {
        match self {
            Connection::Disconnected => ConnectionState::Disconnected,
            Connection::Connected(_) => ConnectionState::Connected,
        }
    }
}

pub struct ConnectionManager {
    config: StoreConfig,
    connection: RwLock<Connection>,
}

impl ConnectionManager {
    /// Creates a disconnected manager. No I/O happens until [`connect`](Self::connect).
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            connection: RwLock::new(Connection::Disconnected),
        }
    }

    /// Shorthand for [`StoreConfig::from_env`] followed by [`ConnectionManager::new`].
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(StoreConfig::from_env()?))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn database_name(&self) -> &str {
        self.config.database_name()
    }

    pub async fn state(&self) -> ConnectionState {
        self.connection.read().await.state()
    }

    pub async fn is_connected(&self) -> bool {
        self.state().await == ConnectionState::Connected
    }

    /// Opens the connection and verifies it with a `ping`.
    ///
    /// Does nothing when already connected. On failure the manager stays
    /// disconnected and the driver error is returned as [`TodoError::Connection`].
    pub async fn connect(&self) -> Result<()> {
        let mut connection = self.connection.write().await;
        if let Connection::Connected(_) = *connection {
            debug!("connect() called while already connected");
            return Ok(());
        }

        let mut options = ClientOptions::parse(self.config.uri())
            .await
            .map_err(TodoError::Connection)?;
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());

        let client = Client::with_options(options).map_err(TodoError::Connection)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(TodoError::Connection)?;

        *connection = Connection::Connected(client);
        info!(database = %self.config.database_name(), "Connected to the database");

        Ok(())
    }

    /// Closes the connection. Does nothing when already disconnected.
    pub async fn disconnect(&self) -> Result<()> {
        let mut connection = self.connection.write().await;
        match std::mem::replace(&mut *connection, Connection::Disconnected) {
            Connection::Connected(client) => {
                client.shutdown().await;
                info!("Closed database connection");
            }
            Connection::Disconnected => debug!("disconnect() called while already disconnected"),
        }

        Ok(())
    }

    /// Returns the live handle for the configured database.
    ///
    /// # Errors
    ///
    /// [`TodoError::NotConnected`] if [`connect`](Self::connect) has not
    /// succeeded or the manager has since been disconnected.
    pub async fn store(&self) -> Result<Database> {
        match &*self.connection.read().await {
            Connection::Connected(client) => Ok(client.database(self.config.database_name())),
            Connection::Disconnected => Err(TodoError::NotConnected),
        }
    }
}

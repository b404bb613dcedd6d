//! MongoDB connection handling for the bookshelf service.
//!
//! A [`Database`] is created once at startup, handed to whatever needs typed
//! collections, and shut down explicitly after the HTTP server has stopped.

use bookshelf_kernel::settings::DatabaseSettings;
use mongodb::{bson::doc, options::ClientOptions, Client, Collection};
use thiserror::Error;

/// Errors raised while establishing or tearing down the store connection
#[derive(Error, Debug)]
pub enum DbError {
    #[error("invalid connection string: {0}")]
    InvalidUri(#[source] mongodb::error::Error),

    #[error("failed to reach database '{database}': {source}")]
    Unreachable {
        database: String,
        #[source]
        source: mongodb::error::Error,
    },
}

pub type DbResult<T> = Result<T, DbError>;

/// Handle to a single MongoDB database
#[derive(Clone, Debug)]
pub struct Database {
    client: Client,
    name: String,
}

impl Database {
    /// Connect to the configured server and verify it answers a ping.
    pub async fn connect(settings: &DatabaseSettings) -> DbResult<Self> {
        let mut options = ClientOptions::parse(&settings.uri)
            .await
            .map_err(DbError::InvalidUri)?;
        options
            .app_name
            .get_or_insert_with(|| "bookshelf".to_string());

        let client = Client::with_options(options).map_err(DbError::InvalidUri)?;
        let database = Self {
            client,
            name: settings.name.clone(),
        };

        database.ping().await?;
        tracing::info!(target: "bookshelf-db", database = %database.name, "connected to MongoDB");

        Ok(database)
    }

    /// Round-trip a `ping` command against the database.
    pub async fn ping(&self) -> DbResult<()> {
        self.client
            .database(&self.name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| DbError::Unreachable {
                database: self.name.clone(),
                source,
            })?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Typed handle to a collection in this database
    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client.database(&self.name).collection(name)
    }

    /// Close the client, waiting for outstanding operations to finish.
    pub async fn shutdown(self) {
        tracing::info!(target: "bookshelf-db", database = %self.name, "closing MongoDB client");
        self.client.shutdown().await;
    }
}

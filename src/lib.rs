//! Bookshelf application library
//!
//! Service modules and the store bootstrap shared by the binary and the
//! integration tests.

pub mod modules;

pub use modules::*;

use std::sync::Arc;

use anyhow::Context;
use bookshelf_db::Database;
use bookshelf_kernel::settings::{DatabaseBackend, DatabaseSettings};

use modules::books::repository::{BookRepository, InMemoryBookRepository, MongoBookRepository};

/// The configured book store, plus the database handle to shut down on exit
pub struct Store {
    pub repository: Arc<dyn BookRepository>,
    pub database: Option<Database>,
}

impl Store {
    pub async fn open(settings: &DatabaseSettings) -> anyhow::Result<Self> {
        match settings.backend {
            DatabaseBackend::Mongo => {
                let database = Database::connect(settings)
                    .await
                    .with_context(|| format!("failed to connect to MongoDB at {}", settings.uri))?;
                tracing::info!(database = database.name(), "using the MongoDB book store");
                Ok(Self {
                    repository: Arc::new(MongoBookRepository::new(&database)),
                    database: Some(database),
                })
            }
            DatabaseBackend::Memory => {
                tracing::warn!("using the in-memory book store; data is lost on exit");
                Ok(Self {
                    repository: Arc::new(InMemoryBookRepository::new()),
                    database: None,
                })
            }
        }
    }

    pub async fn close(self) {
        if let Some(database) = self.database {
            database.shutdown().await;
        }
    }
}

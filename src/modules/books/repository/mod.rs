//! Store access for books.
//!
//! Handlers only see [`BookRepository`]; the MongoDB implementation serves
//! production traffic and the in-memory one backs tests and local runs.

mod memory;
mod mongo;

pub use memory::InMemoryBookRepository;
pub use mongo::MongoBookRepository;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use super::{
    models::{Book, BookFilter, BookPatch, NewBook},
    pagination::Pagination,
};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("invalid book id '{0}': expected a 24 character hex ObjectId")]
    InvalidId(String),

    #[error(transparent)]
    Store(#[from] mongodb::error::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// One page of matching books plus the total match count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookListing {
    pub books: Vec<Book>,
    pub total: u64,
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Books matching `filter`, ordered by id, restricted to `pagination`
    async fn list(&self, filter: &BookFilter, pagination: Pagination)
        -> RepositoryResult<BookListing>;

    /// `None` when no book has this id
    async fn get(&self, id: &str) -> RepositoryResult<Option<Book>>;

    /// Persist a new book and return it with its assigned id
    async fn create(&self, book: NewBook) -> RepositoryResult<Book>;

    /// Apply `patch` and return the updated book, `None` when absent
    async fn update(&self, id: &str, patch: &BookPatch) -> RepositoryResult<Option<Book>>;

    /// Returns whether a book was removed
    async fn delete(&self, id: &str) -> RepositoryResult<bool>;
}

fn parse_id(id: &str) -> RepositoryResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| RepositoryError::InvalidId(id.to_string()))
}

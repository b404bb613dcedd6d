use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{parse_id, BookListing, BookRepository, RepositoryResult};
use crate::modules::books::{
    models::{Book, BookFilter, BookPatch, NewBook},
    pagination::Pagination,
};

/// Process-local book store.
///
/// Ids are generated the same way MongoDB generates them and keyed by their
/// hex form, which sorts in creation order. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookRepository {
    books: Arc<RwLock<BTreeMap<String, Book>>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list(
        &self,
        filter: &BookFilter,
        pagination: Pagination,
    ) -> RepositoryResult<BookListing> {
        let books = self.books.read().await;
        let matching = books.values().filter(|book| filter.matches(book));

        let total = matching.clone().count() as u64;
        let skip = usize::try_from(pagination.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);
        let page = matching.skip(skip).take(limit).cloned().collect();

        Ok(BookListing { books: page, total })
    }

    async fn get(&self, id: &str) -> RepositoryResult<Option<Book>> {
        let id = parse_id(id)?;
        Ok(self.books.read().await.get(&id.to_hex()).cloned())
    }

    async fn create(&self, book: NewBook) -> RepositoryResult<Book> {
        let book = book.into_book(ObjectId::new().to_hex());
        self.books
            .write()
            .await
            .insert(book.id.clone(), book.clone());
        Ok(book)
    }

    async fn update(&self, id: &str, patch: &BookPatch) -> RepositoryResult<Option<Book>> {
        let id = parse_id(id)?;
        let mut books = self.books.write().await;
        Ok(books.get_mut(&id.to_hex()).map(|book| {
            patch.apply(book);
            book.clone()
        }))
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let id = parse_id(id)?;
        Ok(self.books.write().await.remove(&id.to_hex()).is_some())
    }
}

use async_trait::async_trait;
use bookshelf_db::Database;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::ReturnDocument,
    Collection,
};
use serde::{Deserialize, Serialize};

use super::{parse_id, BookListing, BookRepository, RepositoryResult};
use crate::modules::books::{
    models::{Book, BookFilter, BookPatch, NewBook},
    pagination::Pagination,
};

/// Shape of a book inside the `books` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    author: String,
    published_year: i32,
    genre: String,
    #[serde(default = "default_available")]
    available: bool,
}

fn default_available() -> bool {
    true
}

impl From<BookDocument> for Book {
    fn from(document: BookDocument) -> Self {
        Book {
            id: document.id.to_hex(),
            title: document.title,
            author: document.author,
            published_year: document.published_year,
            genre: document.genre,
            available: document.available,
        }
    }
}

/// Books stored in MongoDB.
#[derive(Debug, Clone)]
pub struct MongoBookRepository {
    collection: Collection<BookDocument>,
}

impl MongoBookRepository {
    pub const COLLECTION: &'static str = "books";

    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(Self::COLLECTION),
        }
    }
}

fn filter_document(filter: &BookFilter) -> Document {
    let mut query = Document::new();
    if let Some(author) = &filter.author {
        query.insert("author", author.as_str());
    }
    if let Some(genre) = &filter.genre {
        query.insert("genre", genre.as_str());
    }
    if let Some(available) = filter.available {
        query.insert("available", available);
    }
    query
}

fn set_document(patch: &BookPatch) -> Document {
    let mut fields = Document::new();
    if let Some(title) = &patch.title {
        fields.insert("title", title.as_str());
    }
    if let Some(author) = &patch.author {
        fields.insert("author", author.as_str());
    }
    if let Some(published_year) = patch.published_year {
        fields.insert("publishedYear", published_year);
    }
    if let Some(genre) = &patch.genre {
        fields.insert("genre", genre.as_str());
    }
    if let Some(available) = patch.available {
        fields.insert("available", available);
    }
    fields
}

#[async_trait]
impl BookRepository for MongoBookRepository {
    async fn list(
        &self,
        filter: &BookFilter,
        pagination: Pagination,
    ) -> RepositoryResult<BookListing> {
        let query = filter_document(filter);
        // The server rejects skip values above i64::MAX.
        let skip = pagination.skip().min(i64::MAX as u64);
        let limit = i64::try_from(pagination.limit()).unwrap_or(i64::MAX);

        let find = async {
            self.collection
                .find(query.clone())
                .sort(doc! { "_id": 1 })
                .skip(skip)
                .limit(limit)
                .await?
                .try_collect::<Vec<BookDocument>>()
                .await
        };
        let count = async { self.collection.count_documents(query.clone()).await };

        let (documents, total) = futures::try_join!(find, count)?;
        tracing::debug!(
            matched = total,
            returned = documents.len(),
            skip,
            limit,
            "listed books"
        );

        Ok(BookListing {
            books: documents.into_iter().map(Book::from).collect(),
            total,
        })
    }

    async fn get(&self, id: &str) -> RepositoryResult<Option<Book>> {
        let id = parse_id(id)?;
        let document = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(document.map(Book::from))
    }

    async fn create(&self, book: NewBook) -> RepositoryResult<Book> {
        let document = BookDocument {
            id: ObjectId::new(),
            title: book.title,
            author: book.author,
            published_year: book.published_year,
            genre: book.genre,
            available: book.available,
        };
        self.collection.insert_one(&document).await?;
        Ok(document.into())
    }

    async fn update(&self, id: &str, patch: &BookPatch) -> RepositoryResult<Option<Book>> {
        let object_id = parse_id(id)?;
        // `$set` with no fields is a server error; nothing to change anyway.
        if patch.is_empty() {
            return self.get(id).await;
        }

        let document = self
            .collection
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": set_document(patch) },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(document.map(Book::from))
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let id = parse_id(id)?;
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::repository::RepositoryError;

    #[test]
    fn empty_filter_matches_everything() {
        assert!(filter_document(&BookFilter::default()).is_empty());
    }

    #[test]
    fn filter_maps_to_field_equality() {
        let filter = BookFilter {
            author: Some("Ursula K. Le Guin".to_string()),
            genre: None,
            available: Some(false),
        };
        assert_eq!(
            filter_document(&filter),
            doc! { "author": "Ursula K. Le Guin", "available": false }
        );
    }

    #[test]
    fn patch_sets_only_supplied_fields() {
        let patch = BookPatch {
            published_year: Some(1969),
            available: Some(true),
            ..BookPatch::default()
        };
        assert_eq!(
            set_document(&patch),
            doc! { "publishedYear": 1969, "available": true }
        );
    }

    #[test]
    fn stored_document_round_trips_to_book() {
        let id = ObjectId::new();
        let stored = doc! {
            "_id": id,
            "title": "The Dispossessed",
            "author": "Ursula K. Le Guin",
            "publishedYear": 1974,
            "genre": "Science Fiction",
            "__v": 0,
        };

        let document: BookDocument = mongodb::bson::from_document(stored).unwrap();
        let book = Book::from(document);
        assert_eq!(book.id, id.to_hex());
        assert_eq!(book.published_year, 1974);
        assert!(book.available);
    }

    #[test]
    fn malformed_id_is_rejected() {
        assert!(matches!(
            parse_id("not-an-object-id"),
            Err(RepositoryError::InvalidId(id)) if id == "not-an-object-id"
        ));
    }
}

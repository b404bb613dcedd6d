use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_http::error::AppError;
use bookshelf_kernel::settings::BooksSettings;

use super::{
    models::{Book, BookPage, BookPatch, CreateBook, FieldError, MessageResponse},
    pagination::ListQuery,
    repository::{BookRepository, RepositoryError},
};

const NOT_FOUND: &str = "Book not found";

/// Shared state handed to every books handler
#[derive(Clone)]
pub struct BooksState {
    pub repository: Arc<dyn BookRepository>,
    pub settings: BooksSettings,
}

/// Routes relative to the module mount point (`/books`)
pub fn router(state: BooksState) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(state)
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::internal(err)
    }
}

fn field_details(errors: Vec<FieldError>) -> Vec<serde_json::Value> {
    errors
        .into_iter()
        .map(|error| serde_json::json!(error))
        .collect()
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

// An id that cannot be decoded is treated like any other malformed id.
fn book_id(id: Result<Path<String>, PathRejection>) -> Result<String, AppError> {
    id.map(|Path(id)| id)
        .map_err(|rejection| AppError::Internal(anyhow::anyhow!(rejection.body_text())))
}

fn list_query(pairs: Result<Query<Vec<(String, String)>>, QueryRejection>) -> ListQuery {
    match pairs {
        Ok(Query(pairs)) => ListQuery::from_pairs(pairs),
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "unreadable list query; using defaults");
            ListQuery::default()
        }
    }
}

async fn list_books(
    State(state): State<BooksState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<BookPage>, AppError> {
    let query = list_query(pairs);
    let filter = query.filter();
    let pagination = query.pagination(&state.settings);

    let listing = state.repository.list(&filter, pagination).await?;

    Ok(Json(BookPage {
        total_pages: pagination.total_pages(listing.total),
        current_page: pagination.page(),
        total_books: listing.total,
        books: listing.books,
    }))
}

async fn get_book(
    State(state): State<BooksState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(id)?;
    state
        .repository
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND))
}

async fn create_book(
    State(state): State<BooksState>,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let new_book = json_body(payload)?
        .validate()
        .map_err(|errors| AppError::validation(field_details(errors), "Missing required fields"))?;

    let book = state.repository.create(new_book).await?;
    tracing::info!(book_id = %book.id, title = %book.title, "book created");

    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(state): State<BooksState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<BookPatch>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(id)?;
    let patch = json_body(payload)?;
    patch
        .validate()
        .map_err(|errors| AppError::validation(field_details(errors), "Invalid book fields"))?;

    let book = state
        .repository
        .update(&id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
    tracing::info!(book_id = %book.id, "book updated");

    Ok(Json(book))
}

async fn delete_book(
    State(state): State<BooksState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = book_id(id)?;
    if !state.repository.delete(&id).await? {
        return Err(AppError::not_found(NOT_FOUND));
    }
    tracing::info!(book_id = %id, "book deleted");

    Ok(Json(MessageResponse {
        message: "Book deleted successfully".to_string(),
    }))
}

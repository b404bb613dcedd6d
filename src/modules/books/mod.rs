pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{settings::BooksSettings, InitCtx, Module};
use serde_json::json;

use repository::BookRepository;
use routes::BooksState;

/// Catalog of books: list, fetch, create, update and delete over `/books`
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(repository: Arc<dyn BookRepository>, settings: BooksSettings) -> Self {
        Self {
            state: BooksState {
                repository,
                settings,
            },
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            backend = ?ctx.settings.database.backend,
            default_page_limit = self.state.settings.default_page_limit,
            max_page_limit = self.state.settings.max_page_limit,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn json_response(description: &str, schema: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{}", schema) }
            }
        }
    })
}

fn json_request(schema: &str) -> serde_json::Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{}", schema) }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let id_param = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" },
        "description": "Book identifier (24 character hex ObjectId)"
    });
    let query_param = |name: &str, schema: serde_json::Value, description: &str| {
        json!({
            "name": name,
            "in": "query",
            "required": false,
            "schema": schema,
            "description": description
        })
    };

    let book_fields = json!({
        "title": { "type": "string", "minLength": 1 },
        "author": { "type": "string", "minLength": 1 },
        "publishedYear": { "type": "integer", "format": "int32" },
        "genre": { "type": "string", "minLength": 1 },
        "available": { "type": "boolean" }
    });
    let mut book_properties = book_fields.clone();
    book_properties["id"] = json!({ "type": "string", "description": "Store-assigned identifier" });

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "parameters": [
                        query_param("author", json!({ "type": "string" }), "Exact author match"),
                        query_param("genre", json!({ "type": "string" }), "Exact genre match"),
                        query_param("available", json!({ "type": "string" }), "\"true\" for available books, anything else for unavailable"),
                        query_param("page", json!({ "type": "integer", "default": 1 }), "1-based page number"),
                        query_param("limit", json!({ "type": "integer", "default": 10 }), "Page size, capped by configuration")
                    ],
                    "responses": {
                        "200": json_response("One page of books", "BookPage"),
                        "500": error_response("Internal server error")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": json_request("CreateBook"),
                    "responses": {
                        "201": json_response("Created book", "Book"),
                        "400": error_response("Missing or malformed fields"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "responses": {
                        "200": json_response("The book", "Book"),
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
                    }
                },
                "put": {
                    "summary": "Update a book",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "requestBody": json_request("UpdateBook"),
                    "responses": {
                        "200": json_response("Updated book", "Book"),
                        "400": error_response("Blank or malformed fields"),
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_param],
                    "responses": {
                        "200": json_response("Deletion confirmation", "MessageResponse"),
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": book_properties,
                    "required": ["id", "title", "author", "publishedYear", "genre", "available"]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": book_fields.clone(),
                    "required": ["title", "author", "publishedYear", "genre"]
                },
                "UpdateBook": {
                    "type": "object",
                    "properties": book_fields
                },
                "BookPage": {
                    "type": "object",
                    "properties": {
                        "books": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Book" }
                        },
                        "totalPages": { "type": "integer" },
                        "currentPage": { "type": "integer" },
                        "totalBooks": { "type": "integer" }
                    },
                    "required": ["books", "totalPages", "currentPage", "totalBooks"]
                },
                "MessageResponse": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" }
                    },
                    "required": ["message"]
                }
            }
        }
    })
}

/// Create a new instance of the books module
pub fn create_module(
    repository: Arc<dyn BookRepository>,
    settings: BooksSettings,
) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(repository, settings))
}

use serde::{Deserialize, Serialize};

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Store-assigned identifier, immutable after creation
    pub id: String,
    pub title: String,
    pub author: String,
    pub published_year: i32,
    pub genre: String,
    pub available: bool,
}

/// A validated book that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub published_year: i32,
    pub genre: String,
    pub available: bool,
}

impl NewBook {
    pub fn into_book(self, id: String) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            published_year: self.published_year,
            genre: self.genre,
            available: self.available,
        }
    }
}

/// A rejected field, reported back in the error `details`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub error: &'static str,
}

impl FieldError {
    const fn required(field: &'static str) -> Self {
        Self {
            field,
            error: "required",
        }
    }

    const fn empty(field: &'static str) -> Self {
        Self {
            field,
            error: "must not be empty",
        }
    }
}

/// Request body for `POST /books`.
///
/// Every field is optional at the serde level so that missing fields are
/// reported together by [`CreateBook::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_year: Option<i32>,
    pub genre: Option<String>,
    /// Defaults to `true`
    pub available: Option<bool>,
}

impl CreateBook {
    pub fn validate(self) -> Result<NewBook, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = required_text("title", self.title, &mut errors);
        let author = required_text("author", self.author, &mut errors);
        let genre = required_text("genre", self.genre, &mut errors);
        if self.published_year.is_none() {
            errors.push(FieldError::required("publishedYear"));
        }

        match (title, author, self.published_year, genre) {
            (Some(title), Some(author), Some(published_year), Some(genre)) if errors.is_empty() => {
                Ok(NewBook {
                    title,
                    author,
                    published_year,
                    genre,
                    available: self.available.unwrap_or(true),
                })
            }
            _ => Err(errors),
        }
    }
}

fn required_text(
    field: &'static str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Some(text),
        _ => {
            errors.push(FieldError::required(field));
            None
        }
    }
}

/// Request body for `PUT /books/{id}`: fields left out (or null) are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_year: Option<i32>,
    pub genre: Option<String>,
    pub available: Option<bool>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.published_year.is_none()
            && self.genre.is_none()
            && self.available.is_none()
    }

    /// Supplied text fields must stay non-empty.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let errors: Vec<FieldError> = [
            ("title", &self.title),
            ("author", &self.author),
            ("genre", &self.genre),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|text| text.trim().is_empty()))
        .map(|(field, _)| FieldError::empty(field))
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn apply(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title.clone_from(title);
        }
        if let Some(author) = &self.author {
            book.author.clone_from(author);
        }
        if let Some(published_year) = self.published_year {
            book.published_year = published_year;
        }
        if let Some(genre) = &self.genre {
            book.genre.clone_from(genre);
        }
        if let Some(available) = self.available {
            book.available = available;
        }
    }
}

/// Equality filters for the listing; `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub author: Option<String>,
    pub genre: Option<String>,
    pub available: Option<bool>,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        self.author.as_ref().map_or(true, |author| &book.author == author)
            && self.genre.as_ref().map_or(true, |genre| &book.genre == genre)
            && self.available.map_or(true, |available| book.available == available)
    }
}

/// One page of the listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPage {
    pub books: Vec<Book>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total_books: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateBook {
        CreateBook {
            title: Some("Dune".to_string()),
            author: Some("Frank Herbert".to_string()),
            published_year: Some(1965),
            genre: Some("Science Fiction".to_string()),
            available: None,
        }
    }

    fn book() -> Book {
        payload().validate().unwrap().into_book("65f0c0ffee0000000000000a".to_string())
    }

    #[test]
    fn create_defaults_available_to_true() {
        let new_book = payload().validate().unwrap();
        assert!(new_book.available);
        assert_eq!(new_book.published_year, 1965);
    }

    #[test]
    fn create_keeps_explicit_availability() {
        let new_book = CreateBook {
            available: Some(false),
            ..payload()
        }
        .validate()
        .unwrap();
        assert!(!new_book.available);
    }

    #[test]
    fn create_reports_every_missing_field() {
        let errors = CreateBook {
            title: Some("   ".to_string()),
            author: None,
            published_year: None,
            genre: Some(String::new()),
            available: Some(true),
        }
        .validate()
        .unwrap_err();

        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "author", "genre", "publishedYear"]);
    }

    #[test]
    fn published_year_zero_counts_as_present() {
        let new_book = CreateBook {
            published_year: Some(0),
            ..payload()
        }
        .validate()
        .unwrap();
        assert_eq!(new_book.published_year, 0);
    }

    #[test]
    fn create_body_uses_camel_case() {
        let body: CreateBook = serde_json::from_str(
            r#"{"title":"Emma","author":"Jane Austen","publishedYear":1815,"genre":"Novel"}"#,
        )
        .unwrap();
        assert_eq!(body.published_year, Some(1815));
        assert_eq!(body.available, None);
    }

    #[test]
    fn book_serializes_camel_case() {
        let json = serde_json::to_value(book()).unwrap();
        assert_eq!(json["publishedYear"], 1965);
        assert_eq!(json["id"], "65f0c0ffee0000000000000a");
        assert!(json.get("published_year").is_none());
    }

    #[test]
    fn patch_applies_only_supplied_fields() {
        let mut target = book();
        let patch = BookPatch {
            available: Some(false),
            ..BookPatch::default()
        };
        patch.apply(&mut target);

        assert!(!target.available);
        assert_eq!(target.title, "Dune");
        assert_eq!(target.published_year, 1965);
    }

    #[test]
    fn patch_treats_null_as_absent_and_ignores_id() {
        let patch: BookPatch =
            serde_json::from_str(r#"{"id":"other","title":null,"genre":"Epic"}"#).unwrap();
        assert_eq!(patch.title, None);
        assert_eq!(patch.genre.as_deref(), Some("Epic"));
        assert!(!patch.is_empty());
        assert!(BookPatch::default().is_empty());
    }

    #[test]
    fn patch_rejects_blank_text() {
        let patch = BookPatch {
            author: Some(" ".to_string()),
            ..BookPatch::default()
        };
        let errors = patch.validate().unwrap_err();
        assert_eq!(errors, vec![FieldError::empty("author")]);
    }

    #[test]
    fn filter_is_exact_and_case_sensitive() {
        let target = book();
        let exact = BookFilter {
            author: Some("Frank Herbert".to_string()),
            ..BookFilter::default()
        };
        let lowercase = BookFilter {
            author: Some("frank herbert".to_string()),
            ..BookFilter::default()
        };
        let partial = BookFilter {
            author: Some("Frank".to_string()),
            ..BookFilter::default()
        };

        assert!(BookFilter::default().matches(&target));
        assert!(exact.matches(&target));
        assert!(!lowercase.matches(&target));
        assert!(!partial.matches(&target));
    }

    #[test]
    fn filter_combines_fields() {
        let target = book();
        let filter = BookFilter {
            author: Some("Frank Herbert".to_string()),
            genre: Some("Science Fiction".to_string()),
            available: Some(false),
        };
        assert!(!filter.matches(&target));
    }
}

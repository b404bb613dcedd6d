//! Query-string parsing and page arithmetic for `GET /books`.

use bookshelf_kernel::settings::BooksSettings;

use super::models::BookFilter;

/// Raw listing query. Everything is kept as text so malformed numbers fall
/// back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub author: Option<String>,
    pub genre: Option<String>,
    pub available: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    /// Collect decoded query pairs. A repeated key keeps its last value and
    /// unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "author" => &mut query.author,
                "genre" => &mut query.genre,
                "available" => &mut query.available,
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            *slot = Some(value);
        }
        query
    }

    /// Empty `author`/`genre` values are ignored; any `available` value other
    /// than `"true"` filters for unavailable books.
    pub fn filter(&self) -> BookFilter {
        BookFilter {
            author: non_empty(&self.author),
            genre: non_empty(&self.genre),
            available: self.available.as_deref().map(|value| value == "true"),
        }
    }

    pub fn pagination(&self, settings: &BooksSettings) -> Pagination {
        let page = parse_positive(self.page.as_deref()).unwrap_or(1);
        let limit = parse_positive(self.limit.as_deref())
            .unwrap_or(settings.default_page_limit)
            .min(settings.max_page_limit);

        Pagination::new(page, limit)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|text| !text.is_empty()).cloned()
}

// Integers below 1 clamp to 1; anything unparsable is treated as absent.
fn parse_positive(raw: Option<&str>) -> Option<u64> {
    let value = raw?.trim().parse::<i64>().ok()?;
    Some(value.max(1) as u64)
}

/// A 1-based page of `limit` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Records to skip before this page starts
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> ListQuery {
        ListQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
            ..ListQuery::default()
        }
    }

    #[test]
    fn defaults_to_first_page_of_ten() {
        let pagination = ListQuery::default().pagination(&BooksSettings::default());
        assert_eq!(pagination, Pagination::new(1, 10));
        assert_eq!(pagination.skip(), 0);
    }

    #[test]
    fn skip_is_previous_pages_times_limit() {
        let pagination = query(Some("3"), Some("7")).pagination(&BooksSettings::default());
        assert_eq!(pagination.page(), 3);
        assert_eq!(pagination.limit(), 7);
        assert_eq!(pagination.skip(), 14);
    }

    #[test]
    fn total_pages_rounds_up() {
        let pagination = Pagination::new(1, 10);
        assert_eq!(pagination.total_pages(0), 0);
        assert_eq!(pagination.total_pages(10), 1);
        assert_eq!(pagination.total_pages(25), 3);
    }

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        let pagination = query(Some("two"), Some("")).pagination(&BooksSettings::default());
        assert_eq!(pagination, Pagination::new(1, 10));
    }

    #[test]
    fn non_positive_numbers_clamp_to_one() {
        let pagination = query(Some("0"), Some("-4")).pagination(&BooksSettings::default());
        assert_eq!(pagination, Pagination::new(1, 1));
    }

    #[test]
    fn limit_is_capped() {
        let settings = BooksSettings {
            default_page_limit: 10,
            max_page_limit: 50,
        };
        let pagination = query(None, Some("1000")).pagination(&settings);
        assert_eq!(pagination.limit(), 50);
    }

    #[test]
    fn huge_page_does_not_overflow_skip() {
        let pagination = Pagination::new(u64::MAX, 100);
        assert_eq!(pagination.skip(), u64::MAX);
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn repeated_keys_keep_the_last_value() {
        let list = ListQuery::from_pairs(pairs(&[
            ("author", "X"),
            ("page", "1"),
            ("author", "Y"),
            ("page", "2"),
            ("sort", "title"),
        ]));
        assert_eq!(list.author.as_deref(), Some("Y"));
        assert_eq!(list.page.as_deref(), Some("2"));
        assert_eq!(list.genre, None);

        assert_eq!(ListQuery::from_pairs(Vec::new()), ListQuery::default());
    }

    #[test]
    fn filter_parses_availability_and_drops_empty_text() {
        let list = ListQuery {
            author: Some(String::new()),
            genre: Some("Poetry".to_string()),
            available: Some("yes".to_string()),
            ..ListQuery::default()
        };
        let filter = list.filter();
        assert_eq!(filter.author, None);
        assert_eq!(filter.genre.as_deref(), Some("Poetry"));
        assert_eq!(filter.available, Some(false));

        let list = ListQuery {
            available: Some("true".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(list.filter().available, Some(true));
        assert_eq!(ListQuery::default().filter(), BookFilter::default());
    }
}

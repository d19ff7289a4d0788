//! Request validation for inbound HTTP adapters.
//!
//! Query strings are decoded with `url::form_urlencoded` so repeated keys
//! such as `l` survive. Every field failure is collected before responding,
//! so one 422 carries all of them.

use std::collections::BTreeSet;

use pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, PageRequest, PageRequestError};

use crate::domain::{CodeSampleId, CodeSampleSearch, Error, FieldError, LanguageId};

const INVALID_VALUE: &str = "invalidValue";

fn invalid_page() -> FieldError {
    FieldError::new(INVALID_VALUE, "Invalid page", ["query", "page"])
}

fn invalid_page_size() -> FieldError {
    FieldError::new(INVALID_VALUE, "Invalid pageSize", ["query", "pageSize"])
}

fn parse_number(raw: Option<String>, default: u32, error: fn() -> FieldError) -> Result<u32, FieldError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| error()),
    }
}

/// Decode `GET /api/code` query parameters into a validated search.
///
/// Recognised keys: `q` (text query, empty when absent), `l` (repeatable
/// language id), `page` (default 1) and `pageSize` (default 20, at most 50).
///
/// # Examples
/// ```
/// use codelibrary::inbound::http::validation::parse_code_sample_search;
///
/// let search = parse_code_sample_search("q=lifetimes&l=rust&l=go&pageSize=5").unwrap();
/// assert_eq!(search.languages().len(), 2);
/// assert_eq!(search.page().page_size(), 5);
///
/// let error = parse_code_sample_search("page=0&pageSize=0").unwrap_err();
/// assert_eq!(error.details().len(), 2);
/// ```
pub fn parse_code_sample_search(query_string: &str) -> Result<CodeSampleSearch, Error> {
    let mut query = String::new();
    let mut languages = BTreeSet::new();
    let mut page = None;
    let mut page_size = None;
    let mut errors = Vec::new();

    for (key, value) in url::form_urlencoded::parse(query_string.as_bytes()) {
        match key.as_ref() {
            "q" => query = value.into_owned(),
            "l" => match LanguageId::new(value.as_ref()) {
                Ok(id) => {
                    languages.insert(id);
                }
                Err(_) => errors.push(FieldError::new(
                    INVALID_VALUE,
                    "Invalid language",
                    ["query", "l"],
                )),
            },
            "page" => page = Some(value.into_owned()),
            "pageSize" => page_size = Some(value.into_owned()),
            _ => {}
        }
    }

    let page = parse_number(page, DEFAULT_PAGE, invalid_page).unwrap_or_else(|error| {
        errors.push(error);
        DEFAULT_PAGE
    });
    let page_size =
        parse_number(page_size, DEFAULT_PAGE_SIZE, invalid_page_size).unwrap_or_else(|error| {
            errors.push(error);
            DEFAULT_PAGE_SIZE
        });

    let request = match PageRequest::new(page, page_size) {
        Ok(request) => Some(request),
        Err(range_errors) => {
            errors.extend(range_errors.into_iter().map(|error| match error {
                PageRequestError::PageOutOfRange { .. } => invalid_page(),
                PageRequestError::PageSizeOutOfRange { .. } => invalid_page_size(),
            }));
            None
        }
    };

    match request {
        Some(request) if errors.is_empty() => Ok(CodeSampleSearch::new(query, languages, request)),
        _ => Err(Error::validation(errors)),
    }
}

/// Parse the `{id}` path segment; `invalid_identifier` at `["params", "id"]`.
pub fn parse_code_sample_id(raw: &str) -> Result<CodeSampleId, Error> {
    CodeSampleId::parse(raw).map_err(|_| Error::invalid_identifier(["params", "id"]))
}

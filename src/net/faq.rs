//! Public FAQ endpoints under `/api/faq`.

#[cfg(test)]
#[path = "faq_test.rs"]
mod faq_test;

use serde::Serialize;

use super::error::ApiError;
use super::http::ApiClient;
use super::types::{Faq, Page, PageRequest};

#[derive(Serialize)]
struct SearchQuery<'a> {
    query: &'a str,
    #[serde(flatten)]
    page: Option<PageRequest>,
}

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn list(api: &ApiClient) -> Result<Vec<Faq>, ApiError> {
    api.get("/faq").await
}

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn list_page(api: &ApiClient, page: PageRequest) -> Result<Page<Faq>, ApiError> {
    api.get_query("/faq/paginado", &page).await
}

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn by_category(api: &ApiClient, category: &str) -> Result<Vec<Faq>, ApiError> {
    api.get(&format!("/faq/categoria/{}", urlencoding::encode(category))).await
}

/// Free-text search over questions, answers and tags.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn search(api: &ApiClient, query: &str) -> Result<Vec<Faq>, ApiError> {
    api.get_query("/faq/search", &SearchQuery { query, page: None }).await
}

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn search_page(api: &ApiClient, query: &str, page: PageRequest) -> Result<Page<Faq>, ApiError> {
    api.get_query("/faq/search/paginado", &SearchQuery { query, page: Some(page) }).await
}

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn categories(api: &ApiClient) -> Result<Vec<String>, ApiError> {
    api.get("/faq/categorias").await
}

//! Event catalog endpoints under `/api/eventos`.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use super::error::ApiError;
use super::http::ApiClient;
use super::types::{Event, EventDraft, EventFilter, Page, PageRequest};

/// Filtered, paginated catalog from `GET /api/eventos`.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn list(api: &ApiClient, filter: &EventFilter) -> Result<Page<Event>, ApiError> {
    api.get_query("/eventos", filter).await
}

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn by_id(api: &ApiClient, id: i64) -> Result<Event, ApiError> {
    api.get(&format!("/eventos/{id}")).await
}

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn categories(api: &ApiClient) -> Result<Vec<String>, ApiError> {
    api.get("/eventos/categorias").await
}

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn cities(api: &ApiClient) -> Result<Vec<String>, ApiError> {
    api.get("/eventos/cidades").await
}

/// Events that have not started yet, soonest first.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn upcoming(api: &ApiClient) -> Result<Vec<Event>, ApiError> {
    api.get("/eventos/proximos").await
}

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn upcoming_page(api: &ApiClient, page: PageRequest) -> Result<Page<Event>, ApiError> {
    api.get_query("/eventos/proximos/paginado", &page).await
}

/// Upcoming events that still have tickets left.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn available(api: &ApiClient) -> Result<Vec<Event>, ApiError> {
    api.get("/eventos/disponiveis").await
}

// =============================================================================
// ADMIN
// =============================================================================

/// Every event, inactive ones included. Admin only.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn admin_list(api: &ApiClient, page: PageRequest) -> Result<Page<Event>, ApiError> {
    api.get_query("/eventos/admin", &page).await
}

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn create(api: &ApiClient, draft: &EventDraft) -> Result<Event, ApiError> {
    api.post("/eventos/admin", draft).await
}

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn update(api: &ApiClient, id: i64, draft: &EventDraft) -> Result<Event, ApiError> {
    api.put(&format!("/eventos/admin/{id}"), draft).await
}

/// Soft-delete an event. Returns the server's confirmation text.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn delete(api: &ApiClient, id: i64) -> Result<String, ApiError> {
    api.delete_text(&format!("/eventos/admin/{id}")).await
}

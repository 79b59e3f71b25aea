//! Ticket purchase and lookup endpoints under `/api/ingressos`.

#[cfg(test)]
#[path = "tickets_test.rs"]
mod tickets_test;

use serde::Serialize;

use super::error::ApiError;
use super::http::ApiClient;
use super::types::{Page, PageRequest, PurchaseRequest, Ticket};

/// Buy tickets via `POST /api/ingressos`.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure. Stock and event-state
/// problems come back as `Application` errors with the server's message.
pub async fn purchase(api: &ApiClient, request: &PurchaseRequest) -> Result<Ticket, ApiError> {
    api.post("/ingressos", request).await
}

/// All tickets of the authenticated user.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn mine(api: &ApiClient) -> Result<Vec<Ticket>, ApiError> {
    api.get("/ingressos/me").await
}

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn mine_page(api: &ApiClient, page: PageRequest) -> Result<Page<Ticket>, ApiError> {
    api.get_query("/ingressos/me/paginado", &page).await
}

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn mine_active(api: &ApiClient) -> Result<Vec<Ticket>, ApiError> {
    api.get("/ingressos/me/ativos").await
}

/// Look a ticket up by its printed code.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn by_code(api: &ApiClient, code: &str) -> Result<Ticket, ApiError> {
    api.get(&format!("/ingressos/codigo/{}", urlencoding::encode(code))).await
}

#[derive(Serialize)]
struct CancelQuery<'a> {
    #[serde(rename = "motivo", skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

/// Cancel a ticket. Without a reason the server records its default one.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn cancel(api: &ApiClient, id: i64, reason: Option<&str>) -> Result<String, ApiError> {
    api.post_query_text(&format!("/ingressos/{id}/cancel"), &CancelQuery { reason }).await
}

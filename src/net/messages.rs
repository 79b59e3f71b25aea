//! Contact messages under `/api/mensagens`.
//!
//! Anyone may post a message; listing and replying are admin only and the
//! server answers 403 otherwise, which the interceptor reports.

#[cfg(test)]
#[path = "messages_test.rs"]
mod messages_test;

use super::error::ApiError;
use super::http::ApiClient;
use super::types::{ContactMessage, NewMessage, Page, PageRequest};

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn create(api: &ApiClient, message: &NewMessage) -> Result<ContactMessage, ApiError> {
    api.post("/mensagens", message).await
}

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn list(api: &ApiClient) -> Result<Vec<ContactMessage>, ApiError> {
    api.get("/mensagens").await
}

/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn list_page(api: &ApiClient, page: PageRequest) -> Result<Page<ContactMessage>, ApiError> {
    api.get_query("/mensagens/paginado", &page).await
}

/// Messages still waiting for a reply.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn open(api: &ApiClient) -> Result<Vec<ContactMessage>, ApiError> {
    api.get("/mensagens/abertas").await
}

/// Reply to a message. The reply travels as the raw request body.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn reply(api: &ApiClient, id: i64, reply: &str) -> Result<ContactMessage, ApiError> {
    api.post_plain(&format!("/mensagens/{id}/responder"), reply.to_owned()).await
}

//! Current-user endpoints under `/api/users/me`.

use super::error::ApiError;
use super::http::ApiClient;
use super::types::{ChangePasswordRequest, User, UserPatch};

/// Fetch the authenticated user from `GET /api/users/me`.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn me(api: &ApiClient) -> Result<User, ApiError> {
    api.get("/users/me").await
}

/// Update profile fields via `PUT /api/users/me`. Unset fields are left
/// untouched server-side.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn update_me(api: &ApiClient, patch: &UserPatch) -> Result<User, ApiError> {
    api.put("/users/me", patch).await
}

/// Change the password via `PUT /api/users/me/password`.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn change_password(api: &ApiClient, request: &ChangePasswordRequest) -> Result<String, ApiError> {
    api.put_text("/users/me/password", request).await
}

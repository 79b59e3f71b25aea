//! Authentication endpoints under `/api/auth`.
//!
//! Raw calls only. Session bookkeeping and notifications live in
//! `state::auth`.

use super::error::ApiError;
use super::http::ApiClient;
use super::types::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest, User,
};

/// Exchange credentials for a bearer token via `POST /api/auth/login`.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn login(api: &ApiClient, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
    api.post("/auth/login", request).await
}

/// Create an account via `POST /api/auth/register`. The reply is not a
/// session; the caller still has to log in.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn register(api: &ApiClient, request: &RegisterRequest) -> Result<User, ApiError> {
    api.post("/auth/register", request).await
}

/// Ask for a reset token by email via `POST /api/auth/forgot-password`.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn forgot_password(api: &ApiClient, request: &ForgotPasswordRequest) -> Result<String, ApiError> {
    api.post_text("/auth/forgot-password", request).await
}

/// Set a new password with a reset token via `POST /api/auth/reset-password`.
///
/// # Errors
///
/// Returns the intercepted `ApiError` on any failure.
pub async fn reset_password(api: &ApiClient, request: &ResetPasswordRequest) -> Result<String, ApiError> {
    api.post_text("/auth/reset-password", request).await
}

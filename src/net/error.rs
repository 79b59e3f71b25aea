//! Typed API errors produced once at the HTTP boundary.
//!
//! ERROR HANDLING
//! ==============
//! Every failure that can reach a caller is an `ApiError` with an explicit
//! `ErrorKind` and a human-readable message. Server-provided messages win;
//! otherwise a generic fallback is used. Transport and decoding details are
//! logged, never surfaced.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::collections::BTreeMap;

use reqwest::StatusCode;

/// Field name → message for field-scoped errors.
pub type FieldErrors = BTreeMap<String, String>;

pub const MSG_UNKNOWN: &str = "Erro desconhecido. Tente novamente.";
pub const MSG_SESSION_EXPIRED: &str = "Sessão expirada. Faça login novamente.";
pub const MSG_FORBIDDEN: &str = "Acesso negado. Você não tem permissão para esta ação.";
pub const MSG_SERVER: &str = "Erro interno do servidor. Tente novamente mais tarde.";
pub const MSG_NETWORK: &str = "Erro de conexão. Verifique sua internet.";
pub const MSG_BAD_RESPONSE: &str = "Resposta inesperada do servidor.";
pub const MSG_VALIDATION: &str = "Verifique os campos destacados.";

/// Error taxonomy, one variant per handling policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client-side, field-scoped; never reached the network.
    Validation,
    /// 401: the session is no longer valid.
    Auth,
    /// 403: authenticated but not allowed.
    Permission,
    /// 5xx.
    Server,
    /// No response (connect failure, timeout, DNS).
    Network,
    /// Any other 4xx, or a reply the client could not understand.
    Application,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    /// HTTP status when a response arrived.
    pub status: Option<u16>,
    pub message: String,
    /// True when `message` came from the server's error body.
    pub server_provided: bool,
    /// Per-field messages; filled for validation errors and by form mappers.
    pub fields: FieldErrors,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, status: None, message: message.into(), server_provided: false, fields: FieldErrors::new() }
    }

    /// Client-side validation failure.
    #[must_use]
    pub fn validation(fields: FieldErrors) -> Self {
        let message = fields.values().next().cloned().unwrap_or_else(|| MSG_VALIDATION.to_owned());
        Self { kind: ErrorKind::Validation, status: None, message, server_provided: false, fields }
    }

    #[must_use]
    pub fn network() -> Self {
        Self::new(ErrorKind::Network, MSG_NETWORK)
    }

    /// Build from an HTTP failure status and the raw response body.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let kind = classify(status);
        let provided = server_message(body);
        let server_provided = provided.is_some();
        let message = provided.unwrap_or_else(|| default_message(kind).to_owned());
        Self { kind, status: Some(status.as_u16()), message, server_provided, fields: FieldErrors::new() }
    }

    /// The server-provided message when there was one, else `fallback`.
    ///
    /// Auth flows use this to replace the generic fallbacks with
    /// operation-specific ones like `Erro ao fazer login`.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        if self.kind == ErrorKind::Validation || self.server_provided {
            self.message.clone()
        } else {
            fallback.to_owned()
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: &str, message: impl Into<String>) -> Self {
        self.fields.insert(field.to_owned(), message.into());
        self
    }

    #[must_use]
    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_auth(&self) -> bool {
        self.kind == ErrorKind::Auth
    }
}

/// Map a failure status to its error kind.
#[must_use]
pub fn classify(status: StatusCode) -> ErrorKind {
    match status.as_u16() {
        401 => ErrorKind::Auth,
        403 => ErrorKind::Permission,
        500..=599 => ErrorKind::Server,
        _ => ErrorKind::Application,
    }
}

fn default_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Auth => MSG_SESSION_EXPIRED,
        ErrorKind::Permission => MSG_FORBIDDEN,
        ErrorKind::Server => MSG_SERVER,
        ErrorKind::Network => MSG_NETWORK,
        ErrorKind::Validation => MSG_VALIDATION,
        ErrorKind::Application => MSG_UNKNOWN,
    }
}

/// Pull `message`, then `error`, out of a JSON error body.
#[must_use]
pub fn server_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_owned)
}

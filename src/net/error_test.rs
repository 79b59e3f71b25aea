use super::*;

// =============================================================
// classify
// =============================================================

#[test]
fn classify_status_classes() {
    assert_eq!(classify(StatusCode::UNAUTHORIZED), ErrorKind::Auth);
    assert_eq!(classify(StatusCode::FORBIDDEN), ErrorKind::Permission);
    assert_eq!(classify(StatusCode::INTERNAL_SERVER_ERROR), ErrorKind::Server);
    assert_eq!(classify(StatusCode::BAD_GATEWAY), ErrorKind::Server);
    assert_eq!(classify(StatusCode::BAD_REQUEST), ErrorKind::Application);
    assert_eq!(classify(StatusCode::NOT_FOUND), ErrorKind::Application);
    assert_eq!(classify(StatusCode::CONFLICT), ErrorKind::Application);
}

// =============================================================
// server_message
// =============================================================

#[test]
fn server_message_prefers_message_over_error() {
    let body = r#"{"message":"Email já está em uso","error":"Bad Request"}"#;
    assert_eq!(server_message(body).as_deref(), Some("Email já está em uso"));
}

#[test]
fn server_message_falls_back_to_error_field() {
    assert_eq!(server_message(r#"{"error":"Not Found"}"#).as_deref(), Some("Not Found"));
}

#[test]
fn server_message_ignores_blank_and_non_json() {
    assert!(server_message(r#"{"message":"  "}"#).is_none());
    assert!(server_message("Internal failure at line 3").is_none());
    assert!(server_message("").is_none());
}

// =============================================================
// ApiError construction
// =============================================================

#[test]
fn from_response_uses_server_message() {
    let err = ApiError::from_response(StatusCode::BAD_REQUEST, r#"{"message":"Ingressos insuficientes"}"#);
    assert_eq!(err.kind, ErrorKind::Application);
    assert_eq!(err.status, Some(400));
    assert_eq!(err.message, "Ingressos insuficientes");
    assert!(err.server_provided);
}

#[test]
fn from_response_without_body_uses_kind_default() {
    let err = ApiError::from_response(StatusCode::FORBIDDEN, "");
    assert_eq!(err.kind, ErrorKind::Permission);
    assert_eq!(err.message, MSG_FORBIDDEN);
    assert!(!err.server_provided);
}

#[test]
fn message_or_prefers_server_text() {
    let err = ApiError::from_response(StatusCode::UNAUTHORIZED, r#"{"message":"credenciais inválidas"}"#);
    assert_eq!(err.message_or("Erro ao fazer login"), "credenciais inválidas");
}

#[test]
fn message_or_uses_fallback_without_server_text() {
    let err = ApiError::network();
    assert_eq!(err.message_or("Erro ao fazer login"), "Erro ao fazer login");
}

#[test]
fn validation_error_carries_fields() {
    let mut fields = FieldErrors::new();
    fields.insert("email".to_owned(), "Email é obrigatório".to_owned());
    let err = ApiError::validation(fields);
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.field("email"), Some("Email é obrigatório"));
    assert_eq!(err.to_string(), "Email é obrigatório");
}

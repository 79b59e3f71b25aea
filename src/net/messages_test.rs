use mockito::{Matcher, Server};

use super::*;
use crate::net::error::{ErrorKind, MSG_FORBIDDEN};
use crate::net::test_helpers::harness;
use crate::net::types::MessageStatus;

#[tokio::test]
async fn create_omits_unset_optional_fields() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/mensagens")
        .match_body(Matcher::Json(serde_json::json!({ "texto": "Olá" })))
        .with_status(201)
        .with_body(r#"{"id":5,"texto":"Olá","status":"OPEN"}"#)
        .create_async()
        .await;

    let h = harness(&server.url());
    let message = NewMessage { text: "Olá".to_owned(), ..NewMessage::default() };
    let created = create(&h.api, &message).await.unwrap();

    mock.assert_async().await;
    assert_eq!(created.status, MessageStatus::Open);
}

#[tokio::test]
async fn reply_sends_plain_text_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/mensagens/5/responder")
        .match_header("content-type", Matcher::Regex("^text/plain".into()))
        .match_body("Obrigado pelo contato")
        .with_status(200)
        .with_body(r#"{"id":5,"texto":"Olá","status":"RESPONDED","resposta":"Obrigado pelo contato"}"#)
        .create_async()
        .await;

    let h = harness(&server.url());
    let replied = reply(&h.api, 5, "Obrigado pelo contato").await.unwrap();

    mock.assert_async().await;
    assert_eq!(replied.reply.as_deref(), Some("Obrigado pelo contato"));
}

#[tokio::test]
async fn list_forbidden_for_non_admin() {
    let mut server = Server::new_async().await;
    server.mock("GET", "/api/mensagens").with_status(403).create_async().await;

    let h = harness(&server.url());
    let err = list(&h.api).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Permission);
    assert_eq!(h.notifier.count(MSG_FORBIDDEN), 1);
}

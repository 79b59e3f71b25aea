use mockito::{Matcher, Server};

use super::*;
use crate::net::error::ErrorKind;
use crate::net::test_helpers::harness;

const EVENT_JSON: &str = r#"{
    "id": 7,
    "titulo": "Hamlet",
    "categoria": "Drama",
    "cidade": "Recife",
    "dataHora": "2026-11-20T20:00:00",
    "preco": 45.5,
    "ticketsAvailable": 12,
    "espaco": { "id": 2, "nome": "Teatro Santa Isabel" }
}"#;

fn page_json(items: &str, number: u32, total_pages: u32) -> String {
    format!(
        r#"{{"content":[{items}],"totalElements":{total_pages},"totalPages":{total_pages},"size":1,"number":{number},"first":{},"last":{}}}"#,
        number == 0,
        number + 1 >= total_pages,
    )
}

#[tokio::test]
async fn list_sends_filters_as_portuguese_params() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/eventos")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("categoria".into(), "Drama".into()),
            Matcher::UrlEncoded("cidade".into(), "Recife".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("size".into(), "5".into()),
        ]))
        .with_status(200)
        .with_body(page_json(EVENT_JSON, 1, 3))
        .create_async()
        .await;

    let h = harness(&server.url());
    let filter = EventFilter {
        category: Some("Drama".to_owned()),
        city: Some("Recife".to_owned()),
        ..EventFilter::default()
    }
    .with_page(PageRequest { page: 1, size: 5 });
    let page = list(&h.api, &filter).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.number, 1);
    assert!(!page.first && !page.last);
    assert_eq!(page.content[0].title, "Hamlet");
}

#[tokio::test]
async fn list_without_filters_sends_no_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/eventos")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_body(page_json("", 0, 0))
        .create_async()
        .await;

    let h = harness(&server.url());
    let page = list(&h.api, &EventFilter::default()).await.unwrap();

    mock.assert_async().await;
    assert!(page.content.is_empty());
}

#[tokio::test]
async fn by_id_decodes_nested_venue() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/eventos/7")
        .with_status(200)
        .with_body(EVENT_JSON)
        .create_async()
        .await;

    let h = harness(&server.url());
    let event = by_id(&h.api, 7).await.unwrap();

    assert_eq!(event.venue.unwrap().name, "Teatro Santa Isabel");
    assert_eq!(event.tickets_available, Some(12));
    assert!((event.price - 45.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn by_id_missing_is_application_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/eventos/99")
        .with_status(404)
        .with_body(r#"{"message":"Evento não encontrado"}"#)
        .create_async()
        .await;

    let h = harness(&server.url());
    let err = by_id(&h.api, 99).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Application);
    assert_eq!(err.message, "Evento não encontrado");
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn upcoming_page_sends_page_params() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/eventos/proximos/paginado")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "0".into()),
            Matcher::UrlEncoded("size".into(), "10".into()),
        ]))
        .with_status(200)
        .with_body(page_json(EVENT_JSON, 0, 1))
        .create_async()
        .await;

    let h = harness(&server.url());
    let page = upcoming_page(&h.api, PageRequest::default()).await.unwrap();

    mock.assert_async().await;
    assert!(page.first && page.last);
}

#[tokio::test]
async fn delete_returns_confirmation_text() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/api/eventos/admin/7")
        .with_status(200)
        .with_body("Evento excluído com sucesso")
        .create_async()
        .await;

    let h = harness(&server.url());
    assert_eq!(delete(&h.api, 7).await.unwrap(), "Evento excluído com sucesso");
}

#[tokio::test]
async fn create_sends_draft_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/eventos/admin")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "titulo": "Hamlet",
            "dataHora": "2026-11-20T20:00:00",
            "preco": 45.5,
        })))
        .with_status(201)
        .with_body(EVENT_JSON)
        .create_async()
        .await;

    let h = harness(&server.url());
    let draft = EventDraft {
        title: "Hamlet".to_owned(),
        starts_at: "2026-11-20T20:00:00".to_owned(),
        price: 45.5,
        ..EventDraft::default()
    };
    let event = create(&h.api, &draft).await.unwrap();

    mock.assert_async().await;
    assert_eq!(event.id, 7);
}

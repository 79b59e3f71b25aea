use mockito::{Matcher, Server};

use super::*;
use crate::forms::{MSG_PASSWORD_RULE, MSG_PHONE_FORMAT};
use crate::net::test_helpers::{harness, sample_user, sign_in};

#[test]
fn profile_optional_fields_skip_validation_when_unset() {
    assert!(check(&ProfileForm::default()).is_ok());
}

#[test]
fn profile_rules() {
    let form = ProfileForm {
        email: Some("nope".to_owned()),
        phone: Some("12345".to_owned()),
        bio: Some("x".repeat(1001)),
        ..ProfileForm::default()
    };
    let err = check(&form).unwrap_err();
    assert_eq!(err.field("email"), Some("Email deve ter formato válido"));
    assert_eq!(err.field("phone"), Some(MSG_PHONE_FORMAT));
    assert_eq!(err.field("bio"), Some("Bio deve ter no máximo 1000 caracteres"));
    assert!(err.field("name").is_none());
}

#[test]
fn patch_drops_blank_inputs() {
    let form = ProfileForm { name: Some("  Ana  ".to_owned()), bio: Some("   ".to_owned()), ..ProfileForm::default() };
    let patch = form.patch();
    assert_eq!(patch.name.as_deref(), Some("Ana"));
    assert!(patch.bio.is_none());
}

#[test]
fn profile_phone_rejects_non_ascii_space() {
    let form = ProfileForm { phone: Some("(11)\u{00A0}91234-5678".to_owned()), ..ProfileForm::default() };
    let err = check(&form.normalized()).unwrap_err();
    assert_eq!(err.field("phone"), Some(MSG_PHONE_FORMAT));
}

#[test]
fn profile_cleared_fields_count_as_unset() {
    let form = ProfileForm { email: Some(String::new()), phone: Some("  ".to_owned()), ..ProfileForm::default() };
    let normalized = form.normalized();
    assert!(normalized.email.is_none());
    assert!(normalized.phone.is_none());
    assert!(check(&normalized).is_ok());
    assert_eq!(form.patch(), UserPatch::default());
}

#[tokio::test]
async fn profile_submit_skips_cleared_fields() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/api/users/me")
        .match_body(Matcher::Json(serde_json::json!({ "nome": "Ana Maria" })))
        .with_status(200)
        .with_body(r#"{"id":1,"nome":"Ana Maria","email":"a@b.com"}"#)
        .create_async()
        .await;

    let h = harness(&server.url());
    sign_in(&h.api, "T", sample_user(1, "Ana"));
    let form = ProfileForm {
        name: Some("Ana Maria".to_owned()),
        email: Some(String::new()),
        phone: Some("  ".to_owned()),
        ..ProfileForm::default()
    };
    form.submit(&Auth::new(h.api.clone())).await.unwrap();

    mock.assert_async().await;
}

#[test]
fn from_user_prefills() {
    let mut user = sample_user(1, "Ana");
    user.phone = Some("(81) 99999-0000".to_owned());
    let form = ProfileForm::from_user(&user);
    assert_eq!(form.name.as_deref(), Some("Ana"));
    assert!(check(&form).is_ok());
}

#[tokio::test]
async fn profile_submit_updates_session() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/api/users/me")
        .match_body(Matcher::Json(serde_json::json!({ "telefone": "(81) 99999-0000" })))
        .with_status(200)
        .with_body(r#"{"id":1,"nome":"Ana","email":"a@b.com","telefone":"(81) 99999-0000"}"#)
        .create_async()
        .await;

    let h = harness(&server.url());
    sign_in(&h.api, "T", sample_user(1, "Ana"));
    let auth = Auth::new(h.api.clone());
    let form = ProfileForm { phone: Some("(81) 99999-0000".to_owned()), ..ProfileForm::default() };
    form.submit(&auth).await.unwrap();

    mock.assert_async().await;
    assert_eq!(auth.state().user().unwrap().phone.as_deref(), Some("(81) 99999-0000"));
}

#[test]
fn change_password_rules() {
    let form = ChangePasswordForm {
        current_password: String::new(),
        new_password: "fracafraca".to_owned(),
        confirm_password: "fracafraca".to_owned(),
    };
    let err = check(&form).unwrap_err();
    assert_eq!(err.field("current_password"), Some(MSG_CURRENT_PASSWORD_REQUIRED));
    assert_eq!(err.field("new_password"), Some(MSG_PASSWORD_RULE));
    assert!(err.field("confirm_password").is_none());
}

#[tokio::test]
async fn change_password_wrong_current_flags_field() {
    let mut server = Server::new_async().await;
    server
        .mock("PUT", "/api/users/me/password")
        .with_status(400)
        .with_body(r#"{"message":"Senha atual incorreta"}"#)
        .create_async()
        .await;

    let h = harness(&server.url());
    sign_in(&h.api, "T", sample_user(1, "Ana"));
    let form = ChangePasswordForm {
        current_password: "errada".to_owned(),
        new_password: "segura#1".to_owned(),
        confirm_password: "segura#1".to_owned(),
    };
    let err = form.submit(&Auth::new(h.api.clone())).await.unwrap_err();

    assert_eq!(err.field("current_password"), Some("Senha atual incorreta"));
}

//! 顧客APIをHTTP越しに確認する

mod common;

use chrono::NaiveDate;
use meibo::domain::customer::{CustomerDraft, CustomerId};
use reqwest::StatusCode;
use serde_json::Value;

use common::TestApp;

fn alice() -> CustomerDraft {
    CustomerDraft {
        name: "Alice".to_owned(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1),
        member_number: Some(42),
        interests: Some("chess".to_owned()),
    }
}

#[tokio::test]
async fn test_create_list_delete_get() {
    let app = TestApp::spawn();
    let api = app.api();

    // 登録確認
    let created = api.create(&alice()).await.unwrap();
    let listed = api.list().await.unwrap();
    assert_eq!(listed, vec![created.clone()]);
    assert_eq!(listed[0].clone().into_draft(), alice());

    // 削除確認
    assert_eq!(api.delete(created.id).await.unwrap(), Some(created.clone()));
    assert_eq!(api.list().await.unwrap(), vec![]);
    assert_eq!(api.get(created.id).await.unwrap(), None);
}

#[tokio::test]
async fn test_create_assigns_unique_identities() {
    let app = TestApp::spawn();
    let api = app.api();

    let first = api.create(&alice()).await.unwrap();
    let second = api.create(&alice()).await.unwrap();
    assert_ne!(first.id, second.id);

    let listed = api.list().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed.iter().filter(|c| c.id == first.id).count(), 1);
}

#[tokio::test]
async fn test_update_then_get() {
    let app = TestApp::spawn();
    let api = app.api();

    let created = api.create(&alice()).await.unwrap();
    let mut changed = created.clone();
    changed.interests = Some("chess, hiking".to_owned());

    assert_eq!(api.update(&changed).await.unwrap(), Some(changed.clone()));
    let fetched = api.get(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.interests.as_deref(), Some("chess, hiking"));
    assert_eq!(fetched.name, created.name);
    assert_eq!(fetched.date_of_birth, created.date_of_birth);
    assert_eq!(fetched.member_number, created.member_number);
}

#[tokio::test]
async fn test_update_and_delete_unknown_identity() {
    let app = TestApp::spawn();
    let api = app.api();

    let created = api.create(&alice()).await.unwrap();
    let mut ghost = created.clone();
    ghost.id = CustomerId::from(*created.id + 1);
    ghost.name = "Ghost".to_owned();

    assert_eq!(api.update(&ghost).await.unwrap(), None);
    assert_eq!(api.delete(ghost.id).await.unwrap(), None);
    assert_eq!(api.list().await.unwrap(), vec![created]);
}

#[tokio::test]
async fn test_not_found_body_is_null() {
    let app = TestApp::spawn();

    let response = reqwest::get(app.url("/api/customer/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_wire_format() {
    let app = TestApp::spawn();
    let http = reqwest::Client::new();

    let response = http
        .post(app.url("/api/customer"))
        .json(&serde_json::json!({
            "name": "Alice",
            "dateOfBirth": "1990-01-01",
            "memberNumber": "42",
            "interests": "chess",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = response.json::<Value>().await.unwrap();
    assert!(created["_id"].is_string());
    assert_eq!(created["dateOfBirth"], "1990-01-01");
    assert_eq!(created["memberNumber"], 42);

    let listed = reqwest::get(app.url("/api/customer"))
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap();
    assert_eq!(listed, Value::Array(vec![created]));
}

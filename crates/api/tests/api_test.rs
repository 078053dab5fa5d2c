//! End-to-end tests of the HTTP surface over the in-memory store.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{
        Method, Request, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tally_api::{AppState, create_router};
use tally_core::MemoryStore;
use tally_shared::types::AccountId;
use tally_shared::{Claims, TokenConfig, TokenService};
use tower::ServiceExt;

fn token_service() -> TokenService {
    TokenService::new(TokenConfig {
        secret: "api-test-secret".to_string(),
        expire_hours: 24,
    })
}

fn app() -> Router {
    let store = Arc::new(MemoryStore::new());
    create_router(AppState::new(store.clone(), store, token_service()))
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(text) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(text)
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send_raw(app, method, uri, token, body.map(|v| v.to_string())).await
}

async fn register(app: &Router, email: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"name": "A", "email": email, "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

async fn signed_up(app: &Router, email: &str) -> String {
    register(app, email).await;
    login(app, email).await
}

#[tokio::test]
async fn test_register_login_record_and_balance() {
    let app = app();

    let registered = register(&app, "a@x.com").await;
    assert_eq!(registered["user"]["email"], "a@x.com");
    assert_eq!(registered["user"]["name"], "A");
    assert!(registered["user"].get("password_hash").is_none());

    let (status, login_body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "a@x.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login_body["token_type"], "Bearer");
    assert_eq!(login_body["expires_in"], 24 * 3600);
    let token = login_body["token"].as_str().unwrap();

    let (status, entry) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(token),
        Some(json!({"amount": 50, "type": "income", "category": "job"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{entry}");
    assert!(entry["id"].is_string());
    assert_eq!(entry["type"], "income");
    assert_eq!(entry["amount"], json!(50.0));
    let today = Utc::now().format("%Y-%m-%d").to_string();
    assert!(entry["date"].as_str().unwrap().starts_with(&today));

    let (status, balance) = send(
        &app,
        Method::GET,
        "/api/transactions/balance",
        Some(token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        balance,
        json!({
            "income_total": 50.0,
            "expense_total": 0.0,
            "balance": 50.0,
            "financial_zone": "positive"
        })
    );
}

#[tokio::test]
async fn test_balance_goes_negative() {
    let app = app();
    let token = signed_up(&app, "a@x.com").await;

    for (amount, kind) in [(100, "income"), (250, "expense")] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/transactions",
            Some(&token),
            Some(json!({"amount": amount, "type": kind, "category": "misc"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, balance) = send(
        &app,
        Method::GET,
        "/api/transactions/balance",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(balance["balance"], json!(-150.0));
    assert_eq!(balance["financial_zone"], "negative");
}

#[tokio::test]
async fn test_empty_account_balance_is_zero_positive() {
    let app = app();
    let token = signed_up(&app, "a@x.com").await;

    let (status, list) = send(&app, Method::GET, "/api/transactions", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));

    let (_, balance) = send(
        &app,
        Method::GET,
        "/api/transactions/balance",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(balance["income_total"], json!(0.0));
    assert_eq!(balance["expense_total"], json!(0.0));
    assert_eq!(balance["balance"], json!(0.0));
    assert_eq!(balance["financial_zone"], "positive");
}

#[tokio::test]
async fn test_me_echoes_account_id() {
    let app = app();
    let registered = register(&app, "a@x.com").await;
    let token = login(&app, "a@x.com").await;

    let (status, body) = send(&app, Method::GET, "/api/user/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "You are authenticated");
    assert_eq!(body["user_id"], registered["user"]["id"]);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = app();

    for uri in ["/api/user/me", "/api/transactions", "/api/transactions/balance"] {
        let (status, body) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], "UNAUTHORIZED");
    }

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/transactions",
        None,
        Some(json!({"amount": 5, "type": "income", "category": "job"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_and_foreign_tokens_rejected() {
    let app = app();

    let expired = token_service()
        .sign(&Claims::new(AccountId::new(), Utc::now() - Duration::hours(1)))
        .unwrap();
    let (status, _) = send(&app, Method::GET, "/api/user/me", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let foreign = TokenService::new(TokenConfig {
        secret: "someone-else".to_string(),
        expire_hours: 24,
    })
    .issue(AccountId::new())
    .unwrap();
    let (status, _) = send(&app, Method::GET, "/api/user/me", Some(&foreign), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/user/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_other_accounts_entries_are_invisible() {
    let app = app();
    let owner = signed_up(&app, "a@x.com").await;
    let intruder = signed_up(&app, "b@x.com").await;

    let (_, entry) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(&owner),
        Some(json!({"amount": 10, "type": "expense", "category": "food"})),
    )
    .await;
    let uri = format!("/api/transactions/{}", entry["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&intruder),
        Some(json!({"amount": 99, "type": "expense", "category": "food"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Transaction not found");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&app, Method::GET, "/api/transactions", Some(&intruder), None).await;
    assert_eq!(list, json!([]));

    let (_, list) = send(&app, Method::GET, "/api/transactions", Some(&owner), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["amount"], json!(10.0));
}

#[tokio::test]
async fn test_update_and_delete_own_entry() {
    let app = app();
    let token = signed_up(&app, "a@x.com").await;

    let (_, entry) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(&token),
        Some(json!({"amount": 10, "type": "expense", "category": "food"})),
    )
    .await;
    let uri = format!("/api/transactions/{}", entry["id"].as_str().unwrap());

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({
            "amount": 12.5,
            "type": "expense",
            "category": "groceries",
            "description": "weekly shop"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["id"], entry["id"]);
    assert_eq!(updated["amount"], json!(12.5));
    assert_eq!(updated["category"], "groceries");
    assert_eq!(updated["date"], entry["date"]);

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Transaction deleted");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = app();
    register(&app, "a@x.com").await;

    for email in ["a@x.com", "A@X.com"] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"name": "Other", "email": email, "password": "secret2"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "CONFLICT");
    }
}

#[tokio::test]
async fn test_login_failures_look_identical() {
    let app = app();
    register(&app, "a@x.com").await;

    let (wrong_status, wrong_body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "a@x.com", "password": "not-it"})),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "nobody@x.com", "password": "secret1"})),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_invalid_registration_reports_fields() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"name": "A", "email": "not-an-email", "password": "123"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["fields"]["email"].is_string());
    assert!(body["fields"]["password"].is_string());
}

#[tokio::test]
async fn test_invalid_entry_is_not_written() {
    let app = app();
    let token = signed_up(&app, "a@x.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(&token),
        Some(json!({"amount": 0, "type": "transfer", "category": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["fields"]["amount"].is_string());
    assert!(body["fields"]["category"].is_string());

    let (_, list) = send(&app, Method::GET, "/api/transactions", Some(&token), None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_amount_that_does_not_fit_the_column_is_400() {
    let app = app();
    let token = signed_up(&app, "a@x.com").await;

    for amount in ["1.23456", "0.00001", "10000000000000000"] {
        let (status, body) = send_raw(
            &app,
            Method::POST,
            "/api/transactions",
            Some(&token),
            Some(format!(
                r#"{{"amount": {amount}, "type": "income", "category": "job"}}"#
            )),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{amount}: {body}");
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["fields"]["amount"].is_string(), "{amount}: {body}");
    }

    let (_, list) = send(&app, Method::GET, "/api/transactions", Some(&token), None).await;
    assert_eq!(list, json!([]));

    let (status, _) = send_raw(
        &app,
        Method::POST,
        "/api/transactions",
        Some(&token),
        Some(r#"{"amount": 12.3456, "type": "income", "category": "job"}"#.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_requests_are_400() {
    let app = app();
    let token = signed_up(&app, "a@x.com").await;

    let (status, body) = send_raw(
        &app,
        Method::POST,
        "/api/transactions",
        Some(&token),
        Some("{not json".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MALFORMED_REQUEST");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(&token),
        Some(json!({"type": "income", "category": "job"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MALFORMED_REQUEST");

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/api/transactions/not-a-uuid",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MALFORMED_REQUEST");
}

#[tokio::test]
async fn test_health_is_public() {
    let (status, body) = send(&app(), Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
    assert_eq!(body.as_object().map(|o| o.len()), Some(2));
}

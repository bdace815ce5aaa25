//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use khata_core::db::Database;
use khata_core::models::{EntryType, NewEntry};
use tower::ServiceExt;

fn test_config(require_auth: bool) -> ServerConfig {
    ServerConfig {
        require_auth,
        allowed_origins: vec![],
        ..Default::default()
    }
}

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    create_router(db, test_config(false))
}

fn setup_test_app_with_db() -> (Router, Database) {
    let db = Database::in_memory().unwrap();
    (create_router(db.clone(), test_config(false)), db)
}

fn setup_auth_app() -> Router {
    let db = Database::in_memory().unwrap();
    create_router(db, test_config(true))
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn expense(amount: f64, category: &str) -> NewEntry {
    NewEntry {
        entry_type: EntryType::Expense,
        description: "test".to_string(),
        amount,
        category: category.to_string(),
        date: chrono::Utc::now(),
    }
}

// ========== Health & Auth Tests ==========

#[tokio::test]
async fn test_health_is_public() {
    let app = setup_auth_app();

    let response = app.oneshot(get_request("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = setup_test_app();

    let response = app.oneshot(get_request("/api/health")).await.unwrap();

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
    assert!(response.headers().contains_key("content-security-policy"));
}

#[tokio::test]
async fn test_protected_route_requires_session() {
    let app = setup_auth_app();

    let response = app.oneshot(get_request("/api/books")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "error");
}

#[tokio::test]
async fn test_me_without_auth_is_local_dev() {
    let app = setup_test_app();

    let response = app.oneshot(get_request("/api/me")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["user"], LOCAL_DEV_USER);
    assert_eq!(json["auth_method"], "none");
}

#[tokio::test]
async fn test_signup_login_logout_flow() {
    let app = setup_auth_app();
    let creds = serde_json::json!({"username": "Asha", "password": "pw"});

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/signup", creds.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(get_body_json(response).await["username"], "asha");

    // Same name again conflicts
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/signup", creds.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/login", creds))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("khata_session="));
    assert!(cookie.contains(&format!("Max-Age={}", session::SESSION_TTL.as_secs())));
    let token = get_body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    // Bearer token works
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["user"], "asha");
    assert_eq!(json["auth_method"], "session");

    // Cookie works too
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/books")
                .header("cookie", format!("khata_session={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/logout")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Session is gone
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = setup_auth_app();
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/signup",
            serde_json::json!({"username": "asha", "password": "pw"}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/login",
            serde_json::json!({"username": "asha", "password": "nope"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = get_body_json(response).await;
    assert_eq!(json["message"], "Invalid username or password");
}

// ========== Book API Tests ==========

#[tokio::test]
async fn test_create_and_list_books() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/books",
            serde_json::json!({"book_name": "Household"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(get_body_json(response).await["book_name"], "Household");

    let response = app.oneshot(get_request("/api/books")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json, serde_json::json!(["Household"]));
}

#[tokio::test]
async fn test_create_book_blank_name() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/books",
            serde_json::json!({"book_name": "  "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_book_detail_not_owned() {
    let (app, db) = setup_test_app_with_db();
    db.create_book("someone-else", "Private").unwrap();

    let response = app.oneshot(get_request("/api/books/Private")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_detail() {
    let (app, db) = setup_test_app_with_db();
    db.create_book(LOCAL_DEV_USER, "Home").unwrap();
    db.add_entry(LOCAL_DEV_USER, "Home", &expense(40.0, "🍱 Food"))
        .unwrap();

    let response = app.oneshot(get_request("/api/books/Home")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["book_name"], "Home");
    assert_eq!(json["expense"], 40.0);
    assert_eq!(json["total"], -40.0);
    assert_eq!(json["entries"][0]["type"], "Expense");
    assert!(json["entries"][0]["date_str"].as_str().is_some());
    assert_eq!(json["categories"].as_array().unwrap().len(), 11);
    assert!(json["insights"][0]
        .as_str()
        .unwrap()
        .starts_with("Total income: ₹0.00"));
}

// ========== Entry API Tests ==========

#[tokio::test]
async fn test_add_entry_with_custom_category() {
    let (app, db) = setup_test_app_with_db();
    let book = db.create_book(LOCAL_DEV_USER, "Home").unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/books/Home/entries",
            serde_json::json!({
                "type": "Expense",
                "amount": "120.50",
                "category": "__custom__",
                "custom_category": "🐶 Pets",
                "date": "2024-03-01"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let id = get_body_json(response).await["id"].as_i64().unwrap();

    let entry = db.get_entry(LOCAL_DEV_USER, "Home", id).unwrap().unwrap();
    assert_eq!(entry.raw.category.as_deref(), Some("🐶 Pets"));
    assert!(db
        .book_categories(book.id)
        .unwrap()
        .contains(&"🐶 Pets".to_string()));
}

#[tokio::test]
async fn test_add_entry_unknown_book() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/books/Nope/entries",
            serde_json::json!({"amount": 5}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_entry_keeps_date() {
    let (app, db) = setup_test_app_with_db();
    db.create_book(LOCAL_DEV_USER, "Home").unwrap();
    let id = db
        .add_entry(LOCAL_DEV_USER, "Home", &expense(10.0, "🍱 Food"))
        .unwrap();
    let before = db.get_entry(LOCAL_DEV_USER, "Home", id).unwrap().unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/books/Home/entries/{}", id),
            serde_json::json!({"type": "Income", "amount": 99, "category": "💰 Salary"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let after = db.get_entry(LOCAL_DEV_USER, "Home", id).unwrap().unwrap();
    assert_eq!(after.raw.entry_type.as_deref(), Some("Income"));
    assert_eq!(after.raw.date, before.raw.date);
}

#[tokio::test]
async fn test_update_missing_entry() {
    let (app, db) = setup_test_app_with_db();
    db.create_book(LOCAL_DEV_USER, "Home").unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/books/Home/entries/404",
            serde_json::json!({"amount": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_entry() {
    let (app, db) = setup_test_app_with_db();
    let id = db
        .add_entry(LOCAL_DEV_USER, "Home", &expense(10.0, "🍱 Food"))
        .unwrap();
    let uri = format!("/api/books/Home/entries/{}", id);

    let delete = |uri: &str| {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["status"], "success");

    let response = app.oneshot(delete(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        get_body_json(response).await,
        serde_json::json!({"status": "error", "message": "Not found"})
    );
}

#[tokio::test]
async fn test_non_numeric_entry_id_is_json_400() {
    let (app, db) = setup_test_app_with_db();
    db.create_book(LOCAL_DEV_USER, "Home").unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/books/Home/entries/abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        get_body_json(response).await,
        serde_json::json!({"status": "error", "message": "Invalid ID"})
    );

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/books/Home/entries/12x",
            serde_json::json!({"amount": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(get_body_json(response).await["message"], "Invalid ID");
}

// ========== Insights & Export Tests ==========

#[tokio::test]
async fn test_insights_empty_book() {
    let app = setup_test_app();

    let response = app.oneshot(get_request("/api/books/Empty/insights")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(
        json["insights"],
        serde_json::json!(["No transactions recorded yet."])
    );
}

#[tokio::test]
async fn test_insights_for_book() {
    let (app, db) = setup_test_app_with_db();
    for amount in [10.0, 20.0, 30.0] {
        db.add_entry(LOCAL_DEV_USER, "Home", &expense(amount, "Food"))
            .unwrap();
    }

    let response = app.oneshot(get_request("/api/books/Home/insights")).await.unwrap();

    let json = get_body_json(response).await;
    let insights = json["insights"].as_array().unwrap();
    assert!(insights.len() <= 8);
    assert!(insights
        .iter()
        .any(|i| i == "Top expense categories: Food (3 tx)."));
    assert!(insights
        .iter()
        .any(|i| i == "Average expense per transaction: ₹20.00."));
}

#[tokio::test]
async fn test_export_csv() {
    let (app, db) = setup_test_app_with_db();
    db.add_entry(LOCAL_DEV_USER, "Home", &expense(12.0, "🍱 Food"))
        .unwrap();

    let response = app.oneshot(get_request("/api/books/Home/export/csv")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"Home_transactions.csv\""
    );
    let body = get_body_text(response).await;
    assert!(body.starts_with("Type,Description,Amount,Category,Date\n"));
    assert!(body.contains("Expense,test,12.00,🍱 Food,"));
}

#[tokio::test]
async fn test_export_pdf() {
    let (app, db) = setup_test_app_with_db();
    db.add_entry(LOCAL_DEV_USER, "Home", &expense(12.0, "🍱 Food"))
        .unwrap();

    let response = app.oneshot(get_request("/api/books/Home/export/pdf")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "application/pdf");
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"Home_transactions.pdf\""
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_export_pdf_requires_session() {
    let app = setup_auth_app();

    let response = app.oneshot(get_request("/api/books/Home/export/pdf")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

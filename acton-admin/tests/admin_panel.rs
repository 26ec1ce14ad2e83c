//! End-to-end tests of the admin routes over an in-memory SQLite store

use acton_admin::config::{AdminConfig, DatabaseSettings};
use acton_admin::store::{connect_sqlite, SqliteStore};
use acton_admin::{Admin, AdminModel};
use axum_test::TestServer;
use chrono::NaiveDateTime;
use http::StatusCode;
use sqlx::SqlitePool;

#[allow(dead_code)]
#[derive(AdminModel)]
struct Base {
    #[admin(rename = "ID")]
    id: i64,
    created_at: NaiveDateTime,
    deleted_at: Option<NaiveDateTime>,
}

#[allow(dead_code)]
#[derive(AdminModel)]
struct User {
    #[admin(embed)]
    model: Base,
    name: String,
    is_admin: bool,
    score: f64,
    password: String,
}

#[allow(dead_code)]
#[derive(AdminModel)]
struct Tag {
    #[admin(rename = "ID")]
    id: i64,
    label: String,
}

#[allow(dead_code)]
#[derive(AdminModel)]
struct Item {
    #[admin(rename = "ID")]
    id: i64,
    name: String,
    stock: Option<i64>,
    note: Option<String>,
}

async fn store() -> SqliteStore {
    let store = connect_sqlite(&DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await
    .unwrap();

    for statement in [
        "CREATE TABLE users (id INTEGER PRIMARY KEY, created_at DATETIME NOT NULL, \
         deleted_at DATETIME, name TEXT NOT NULL, is_admin BOOLEAN NOT NULL, \
         score REAL NOT NULL, password TEXT NOT NULL)",
        "INSERT INTO users (id, created_at, name, is_admin, score, password) VALUES \
         (1, '2024-01-02 03:04:05', 'Ada', 1, 4.5, 'hunter2'), \
         (2, '2024-02-03 04:05:06', 'Linus', 0, 3.0, 'hunter3')",
        "CREATE TABLE tags (id INTEGER PRIMARY KEY, label TEXT NOT NULL)",
        "INSERT INTO tags (id, label) VALUES (1, 'rust'), (2, 'htmx')",
        "CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT NOT NULL, \
         stock INTEGER, note TEXT)",
        "INSERT INTO items (id, name) VALUES (1, 'Widget')",
    ] {
        sqlx::query(statement).execute(store.pool()).await.unwrap();
    }

    store
}

async fn server() -> (TestServer, SqlitePool) {
    let store = store().await;
    let pool = store.pool().clone();
    let app = Admin::new(store)
        .register::<User>()
        .register::<Tag>()
        .into_router::<()>();
    (TestServer::new(app).unwrap(), pool)
}

async fn user_name(pool: &SqlitePool, id: i64) -> String {
    sqlx::query_scalar("SELECT name FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_list_page() {
    let (server, _) = server().await;

    let response = server.get("/admin/manager/User").await;

    response.assert_status_ok();
    assert_eq!(
        response.header("cache-control"),
        "no-cache, no-store, must-revalidate"
    );
    let html = response.text();
    assert!(html.contains("Linus"));
    assert!(html.contains("02/01/2024 03:04:05"));
    assert!(html.contains(r#"href="/admin/manager/Tag""#));
    assert!(!html.contains("hunter2"));
}

#[tokio::test]
async fn test_unknown_collection() {
    let (server, _) = server().await;

    let response = server.get("/admin/manager/Invoice").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_persists_coerced_values() {
    let (server, pool) = server().await;

    let response = server
        .post("/admin/manager/User/edit/1")
        .form(&[
            ("Name", "Grace"),
            ("IsAdmin", "false"),
            ("Score", "9.25"),
            ("CreatedAt", "31/12/2023 23:59:00"),
        ])
        .await;

    response.assert_status_ok();
    assert!(response.header("hx-trigger").to_str().unwrap().contains("admin-row-updated"));

    let (name, is_admin, score, created_at): (String, bool, f64, NaiveDateTime) =
        sqlx::query_as("SELECT name, is_admin, score, created_at FROM users WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(name, "Grace");
    assert!(!is_admin);
    assert!((score - 9.25).abs() < f64::EPSILON);
    assert_eq!(created_at.to_string(), "2023-12-31 23:59:00");
}

#[tokio::test]
async fn test_edit_invalid_value_changes_nothing() {
    let (server, pool) = server().await;

    let response = server
        .post("/admin/manager/User/edit/2")
        .form(&[("Name", "Changed"), ("CreatedAt", "2024-01-01")])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text(),
        "We were expecting a date in the format: DD/MM/YYYY HH:MM:SS for the field: created_at"
    );
    assert_eq!(user_name(&pool, 2).await, "Linus");
}

#[tokio::test]
async fn test_delete_soft_and_hard() {
    let (server, pool) = server().await;

    server
        .delete("/admin/manager/User/delete/1")
        .await
        .assert_status_ok();
    let deleted_at: Option<NaiveDateTime> =
        sqlx::query_scalar("SELECT deleted_at FROM users WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(deleted_at.is_some());

    server
        .delete("/admin/manager/Tag/delete/1")
        .await
        .assert_status_ok();
    let tags: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(tags, 1);
}

#[tokio::test]
async fn test_config_hides_fields_and_requires_token() {
    let mut config = AdminConfig::default();
    config.admin.hidden_fields = vec!["Score".to_string()];
    config.admin.auth_token = Some("s3cret".to_string());

    let app = Admin::new(store().await)
        .with_config(&config)
        .register::<User>()
        .into_router::<()>();
    let server = TestServer::new(app).unwrap();

    server
        .get("/admin/manager/User")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .get("/admin/manager/User")
        .authorization_bearer("s3cret")
        .await;
    response.assert_status_ok();
    let html = response.text();
    assert!(!html.contains("4.5"));
    // Password is only hidden by the default list
    assert!(html.contains("hunter2"));
}

#[tokio::test]
async fn test_row_with_null_columns_round_trips() {
    let store = store().await;
    let pool = store.pool().clone();
    let server = TestServer::new(Admin::new(store).register::<Item>().into_router::<()>()).unwrap();

    let html = server.get("/admin/manager/Item").await.text();
    assert!(html.contains(r#"name="Stock" value="""#));
    assert!(html.contains(r#"name="Note" value="""#));

    // The page submits every visible input, empty ones included
    server
        .post("/admin/manager/Item/edit/1")
        .form(&[("Name", "Gadget"), ("Stock", ""), ("Note", "")])
        .await
        .assert_status_ok();

    let (name, stock, note): (String, Option<i64>, Option<String>) =
        sqlx::query_as("SELECT name, stock, note FROM items WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(name, "Gadget");
    assert_eq!(stock, None);
    assert_eq!(note, None);

    server
        .post("/admin/manager/Item/edit/1")
        .form(&[("Name", "Gadget"), ("Stock", "12"), ("Note", "")])
        .await
        .assert_status_ok();
    let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM items WHERE id = 1")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stock, Some(12));

    server
        .post("/admin/manager/Item/edit/1")
        .form(&[("Stock", "lots")])
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

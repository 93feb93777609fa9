use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::auth::ServerState;
use server::routes;
use service::{accounts::UserStore, catalog::ItemStore};

struct TestApp {
    base_url: String,
    users_path: PathBuf,
    items_path: PathBuf,
}

/// Spin up the router on an ephemeral port over the given collection files.
/// Called a second time on the same paths to simulate a process restart.
async fn serve_on(users_path: &PathBuf, items_path: &PathBuf) -> anyhow::Result<String> {
    let users = UserStore::new(users_path.clone()).await;
    let items = ItemStore::new(items_path.clone()).await;
    let state = ServerState { users, items };

    let app = routes::build_router(state, CorsLayer::very_permissive());
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(format!("http://{}:{}", addr.ip(), addr.port()))
}

/// Start a server over isolated temp files per test run.
async fn start_server() -> anyhow::Result<TestApp> {
    let dir = PathBuf::from(format!("target/test-data/{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(&dir).await?;
    let users_path = dir.join("users.json");
    let items_path = dir.join("items.json");
    let base_url = serve_on(&users_path, &items_path).await?;
    Ok(TestApp { base_url, users_path, items_path })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn register_then_duplicate_rejected() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .post(format!("{}/api/users", app.base_url))
        .json(&json!({"username": "alice", "email": "a@example.com"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "User created successfully");

    let res = c
        .post(format!("{}/api/users", app.base_url))
        .json(&json!({"username": "alice"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Username already exists");

    // exactly one user persisted
    let stored: serde_json::Value =
        serde_json::from_str(&tokio::fs::read_to_string(&app.users_path).await?)?;
    assert_eq!(stored.as_array().map(|a| a.len()), Some(1));
    Ok(())
}

#[tokio::test]
async fn missing_api_key_is_unauthorized_and_mutates_nothing() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    for req in [
        c.get(format!("{}/api/items", app.base_url)),
        c.post(format!("{}/api/items", app.base_url)).json(&json!({"name": "x"})),
        c.put(format!("{}/api/items/1", app.base_url)).json(&json!({"price": 1})),
        c.delete(format!("{}/api/items/1", app.base_url)),
    ] {
        let res = req.send().await?;
        assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["message"], "API key is missing");
    }

    let res = c
        .get(format!("{}/api/items", app.base_url))
        .header("x-api-key", "admin")
        .send()
        .await?;
    assert_eq!(res.json::<serde_json::Value>().await?, json!([]));
    Ok(())
}

#[tokio::test]
async fn non_admin_key_is_forbidden_on_mutations() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    for req in [
        c.post(format!("{}/api/items", app.base_url)).json(&json!({"name": "x"})),
        c.put(format!("{}/api/items/1", app.base_url)).json(&json!({"price": 1})),
        c.delete(format!("{}/api/items/1", app.base_url)),
    ] {
        let res = req.header("x-api-key", "some-user-key").send().await?;
        assert_eq!(res.status(), HttpStatusCode::FORBIDDEN);
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["message"], "Access forbidden");
    }

    // reads are allowed for any authenticated key
    let res = c
        .get(format!("{}/api/items", app.base_url))
        .header("x-api-key", "some-user-key")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>().await?, json!([]));
    Ok(())
}

#[tokio::test]
async fn admin_item_crud_flow() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let admin = |r: reqwest::RequestBuilder| r.header("x-api-key", "admin");

    let res = admin(c.post(format!("{}/api/items", app.base_url)))
        .json(&json!({"name": "widget", "price": 5}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<serde_json::Value>().await?;
    assert_eq!(created, json!({"id": 1, "name": "widget", "price": 5}));

    let res = admin(c.post(format!("{}/api/items", app.base_url)))
        .json(&json!({"name": "gadget", "price": 7}))
        .send()
        .await?;
    assert_eq!(res.json::<serde_json::Value>().await?["id"], 2);

    // merge update: unsupplied fields survive
    let res = admin(c.put(format!("{}/api/items/1", app.base_url)))
        .json(&json!({"price": 9}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(
        res.json::<serde_json::Value>().await?,
        json!({"id": 1, "name": "widget", "price": 9})
    );

    let res = admin(c.delete(format!("{}/api/items/2", app.base_url))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty());

    for (status, req) in [
        (HttpStatusCode::NOT_FOUND, admin(c.delete(format!("{}/api/items/2", app.base_url)))),
        (
            HttpStatusCode::NOT_FOUND,
            admin(c.put(format!("{}/api/items/99", app.base_url))).json(&json!({"price": 1})),
        ),
    ] {
        let res = req.send().await?;
        assert_eq!(res.status(), status);
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["message"], "Item not found");
    }
    Ok(())
}

#[tokio::test]
async fn deleted_tail_id_is_reissued() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let admin = |r: reqwest::RequestBuilder| r.header("x-api-key", "admin");

    for name in ["a", "b"] {
        admin(c.post(format!("{}/api/items", app.base_url)))
            .json(&json!({"name": name}))
            .send()
            .await?;
    }
    admin(c.delete(format!("{}/api/items/2", app.base_url))).send().await?;

    // next id comes from the surviving last element (1), not from a counter
    let res = admin(c.post(format!("{}/api/items", app.base_url)))
        .json(&json!({"name": "c"}))
        .send()
        .await?;
    assert_eq!(res.json::<serde_json::Value>().await?["id"], 2);
    Ok(())
}

#[tokio::test]
async fn user_role_sees_only_the_projection() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    c.post(format!("{}/api/items", app.base_url))
        .header("x-api-key", "admin")
        .json(&json!({"name": "widget", "price": 5, "cost": 2, "supplier": "acme"}))
        .send()
        .await?;

    let res = c
        .get(format!("{}/api/items", app.base_url))
        .header("x-api-key", "just-a-user")
        .send()
        .await?;
    assert_eq!(
        res.json::<serde_json::Value>().await?,
        json!([{"id": 1, "name": "widget", "price": 5}])
    );

    let res = c
        .get(format!("{}/api/items", app.base_url))
        .header("x-api-key", "admin")
        .send()
        .await?;
    assert_eq!(
        res.json::<serde_json::Value>().await?,
        json!([{"id": 1, "name": "widget", "price": 5, "cost": 2, "supplier": "acme"}])
    );
    Ok(())
}

#[tokio::test]
async fn restart_reproduces_persisted_state() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    c.post(format!("{}/api/users", app.base_url))
        .json(&json!({"username": "alice"}))
        .send()
        .await?;
    c.post(format!("{}/api/items", app.base_url))
        .header("x-api-key", "admin")
        .json(&json!({"name": "widget", "price": 5}))
        .send()
        .await?;

    // second server over the same files stands in for a process restart
    let restarted = serve_on(&app.users_path, &app.items_path).await?;

    let res = c
        .get(format!("{}/api/items", restarted))
        .header("x-api-key", "admin")
        .send()
        .await?;
    assert_eq!(
        res.json::<serde_json::Value>().await?,
        json!([{"id": 1, "name": "widget", "price": 5}])
    );

    let res = c
        .post(format!("{}/api/users", restarted))
        .json(&json!({"username": "alice"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

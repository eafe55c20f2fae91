use std::net::TcpListener;
use std::sync::Arc;

use admin_core::api::{AuthApi, CategoriesApi};
use admin_core::auth::{MemoryTokenStore, TokenStore};
use admin_core::domain::AuthTokens;
use admin_core::hierarchy::{resolve_drop, DropIntent};
use admin_core::http::ApiClient;
use admin_core::{ApiConfig, ApiError};
use httpmock::Method::{DELETE, GET, PATCH, POST};
use httpmock::MockServer;
use serde_json::json;

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn client_for(server: &MockServer, store: Arc<MemoryTokenStore>) -> ApiClient {
    let config = ApiConfig::new(&server.url("/api")).unwrap();
    ApiClient::with_reqwest(config, store)
}

fn signed_in(access: &str, refresh: &str) -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_tokens(AuthTokens {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    }))
}

fn category_tree() -> serde_json::Value {
    json!([
        {
            "_id": "phones",
            "name": "Phones",
            "slug": "phones",
            "order": 0,
            "isActive": true,
            "productsCount": 12,
            "children": [
                { "_id": "android", "name": "Android", "slug": "android", "parentId": "phones", "order": 0 },
                { "_id": "ios", "name": "iOS", "slug": "ios", "parentId": "phones", "order": 1 }
            ]
        },
        { "_id": "laptops", "name": "Laptops", "slug": "laptops", "order": 1 }
    ])
}

#[tokio::test]
async fn category_endpoints() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let client = client_for(&server, signed_in("access-1", "refresh-1"));
    let categories = CategoriesApi::new(&client);

    let tree_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/categories/tree")
            .header("authorization", "Bearer access-1");
        then.status(200).json_body(category_tree());
    });

    let create_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/categories")
            .json_body(json!({ "name": "Tablets", "parentId": "phones", "isActive": true }));
        then.status(201)
            .json_body(json!({ "_id": "tablets", "name": "Tablets", "slug": "tablets", "parentId": "phones" }));
    });

    let delete_mock = server.mock(|when, then| {
        when.method(DELETE).path("/api/categories/laptops");
        then.status(204);
    });

    let tree = categories.tree().await.unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].children.len(), 2);
    assert_eq!(tree[0].product_count(), 12);
    assert_eq!(tree[0].children[1].parent_id.as_deref(), Some("phones"));
    tree_mock.assert();

    let mut draft = admin_core::domain::CategoryDraft::child_of(Some("phones".to_string()));
    draft.name = "Tablets".to_string();
    let created = categories.create(&draft).await.unwrap();
    assert_eq!(created.id, "tablets");
    create_mock.assert();

    categories.delete("laptops").await.unwrap();
    delete_mock.assert();
}

#[tokio::test]
async fn drop_intents_hit_the_right_endpoints() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let client = client_for(&server, signed_in("access-1", "refresh-1"));
    let categories = CategoriesApi::new(&client);
    let tree: Vec<admin_core::domain::Category> = serde_json::from_value(category_tree()).unwrap();

    let reorder_mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/api/categories/reorder")
            .json_body(json!({ "items": [
                { "id": "ios", "order": 0 },
                { "id": "android", "order": 1 }
            ]}));
        then.status(200).json_body(json!({ "success": true }));
    });

    // Moving to the root sends no parentId at all
    let move_mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/api/categories/android")
            .json_body(json!({ "order": 1 }));
        then.status(200).json_body(json!({ "_id": "android", "name": "Android", "slug": "android", "order": 1 }));
    });

    let reorder = resolve_drop(&tree, "ios", "android").unwrap();
    assert!(matches!(reorder, DropIntent::Reorder(_)));
    categories.apply(&reorder).await.unwrap();
    reorder_mock.assert();

    let reparent = resolve_drop(&tree, "android", "laptops").unwrap();
    assert!(matches!(reparent, DropIntent::Move(_)));
    categories.apply(&reparent).await.unwrap();
    move_mock.assert();
}

#[tokio::test]
async fn expired_access_token_is_refreshed_over_http() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let store = signed_in("stale", "refresh-1");
    let client = client_for(&server, store.clone());

    let stale_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/categories/tree")
            .header("authorization", "Bearer stale");
        then.status(401)
            .json_body(json!({ "success": false, "error": { "code": "TOKEN_EXPIRED", "message": "jwt expired" } }));
    });

    let refresh_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/auth/refresh")
            .json_body(json!({ "refreshToken": "refresh-1" }));
        then.status(200)
            .json_body(json!({ "accessToken": "fresh", "refreshToken": "refresh-2" }));
    });

    let fresh_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/categories/tree")
            .header("authorization", "Bearer fresh");
        then.status(200).json_body(category_tree());
    });

    let tree = CategoriesApi::new(&client).tree().await.unwrap();
    assert_eq!(tree.len(), 2);

    stale_mock.assert();
    refresh_mock.assert();
    fresh_mock.assert();
    assert_eq!(store.access_token().as_deref(), Some("fresh"));
    assert_eq!(store.refresh_token().as_deref(), Some("refresh-2"));
}

#[tokio::test]
async fn rejected_refresh_clears_the_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let store = signed_in("stale", "revoked");
    let client = client_for(&server, store.clone());

    server.mock(|when, then| {
        when.method(GET).path("/api/auth/me");
        then.status(401);
    });
    let refresh_mock = server.mock(|when, then| {
        when.method(POST).path("/api/auth/refresh");
        then.status(401)
            .json_body(json!({ "success": false, "error": { "code": "INVALID_TOKEN", "message": "refresh token revoked" } }));
    });

    let err = AuthApi::new(&client).me().await.unwrap_err();
    assert!(err.is_session_lost());
    refresh_mock.assert_hits(1);
    assert!(!store.has_session());
}

#[tokio::test]
async fn login_and_logout() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let store = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, store.clone());
    let auth = AuthApi::new(&client);

    let login_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/auth/login")
            .json_body(json!({ "email": "admin@shop.test", "password": "hunter22" }));
        then.status(200).json_body(json!({
            "accessToken": "access-1",
            "refreshToken": "refresh-1",
            "user": {
                "_id": "u1",
                "email": "admin@shop.test",
                "firstName": "Ada",
                "lastName": "Admin",
                "role": "admin",
                "isEmailVerified": true
            }
        }));
    });

    // Server-side logout failing must not keep the local session alive
    let logout_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/auth/logout")
            .header("authorization", "Bearer access-1");
        then.status(500);
    });

    let user = auth.login("admin@shop.test", "hunter22").await.unwrap();
    assert_eq!(user.display_name(), "Ada Admin");
    assert_eq!(store.access_token().as_deref(), Some("access-1"));
    login_mock.assert();

    auth.logout().await;
    logout_mock.assert();
    assert!(!store.has_session());
}

#[tokio::test]
async fn error_envelope_is_decoded() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let client = client_for(&server, signed_in("access-1", "refresh-1"));

    server.mock(|when, then| {
        when.method(DELETE).path("/api/categories/phones");
        then.status(409).json_body(json!({
            "success": false,
            "error": { "code": "HAS_CHILDREN", "message": "Category has subcategories" }
        }));
    });

    let err = CategoriesApi::new(&client).delete("phones").await.unwrap_err();
    match err {
        ApiError::Status { status, code, message } => {
            assert_eq!(status, 409);
            assert_eq!(code.as_deref(), Some("HAS_CHILDREN"));
            assert_eq!(message, "Category has subcategories");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn truncated_body_is_a_transport_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    if !can_bind_localhost() {
        eprintln!("Skipping socket test: cannot bind to localhost");
        return;
    }

    // Promises 100 bytes, sends a handful, then hangs up
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n[{\"_id\":")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let config = ApiConfig::new(&format!("http://{addr}/api")).unwrap();
    let client = ApiClient::with_reqwest(config, signed_in("access-1", "refresh-1"));

    let err = CategoriesApi::new(&client).tree().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "unexpected error: {err:?}");
    server.await.unwrap();
}

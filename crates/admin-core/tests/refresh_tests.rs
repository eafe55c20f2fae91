//! Token refresh behavior of the API client against a scripted backend.

mod common;

use std::sync::Arc;

use admin_core::auth::{MemoryTokenStore, RefreshState, TokenStore};
use admin_core::http::{ApiClient, ApiRequest};
use admin_core::{ApiError, AuthError};
use common::{config, tokens, CountingListener, RefreshScript, ScriptedTransport};
use futures::future::join_all;

#[tokio::test]
async fn attaches_stored_token() {
    let transport = ScriptedTransport::new("t1", RefreshScript::Reject(401));
    let store = Arc::new(MemoryTokenStore::with_tokens(tokens("t1", "r1")));
    let client = ApiClient::new(config(), transport.clone(), store);

    let response = client.send(ApiRequest::get("/categories/tree")).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(transport.hits("/categories/tree", "t1"), 1);
    assert_eq!(transport.refresh_calls(), 0);
}

#[tokio::test]
async fn sends_unauthenticated_without_token() {
    let transport = ScriptedTransport::new("t1", RefreshScript::Reject(401));
    let client = ApiClient::new(config(), transport.clone(), MemoryTokenStore::new());

    let result = client.send(ApiRequest::get("/categories")).await;
    // No refresh token either, so the session ends without calling refresh
    assert!(matches!(result, Err(ApiError::Auth(AuthError::NoRefreshToken))));
    assert_eq!(transport.seen()[0].bearer, None);
    assert_eq!(transport.refresh_calls(), 0);
}

#[tokio::test]
async fn non_401_errors_pass_through() {
    struct Failing;

    #[async_trait::async_trait(?Send)]
    impl admin_core::http::HttpTransport for Failing {
        async fn execute(
            &self,
            _request: &admin_core::http::OutgoingRequest,
        ) -> admin_core::Result<admin_core::http::HttpResponse> {
            Ok(admin_core::http::HttpResponse::new(
                500,
                r#"{"success":false,"error":{"code":"INTERNAL","message":"boom"}}"#,
            ))
        }
    }

    let client = ApiClient::new(config(), Failing, MemoryTokenStore::with_tokens(tokens("t1", "r1")));
    let response = client.send(ApiRequest::get("/orders")).await.unwrap();
    assert_eq!(response.status, 500);

    let err = client
        .send_empty(ApiRequest::get("/orders"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, ref message, .. } if message == "boom"));
    assert_eq!(client.coordinator().state(), RefreshState::Idle);
}

#[tokio::test]
async fn expired_token_is_refreshed_and_request_replayed() {
    let transport = ScriptedTransport::new("t2", RefreshScript::Issue(tokens("t2", "r2")));
    let store = Arc::new(MemoryTokenStore::with_tokens(tokens("t1", "r1")));
    let client = ApiClient::new(config(), transport.clone(), store.clone());

    let response = client.send(ApiRequest::get("/orders")).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(transport.refresh_calls(), 1);
    assert_eq!(transport.hits("/orders", "t1"), 1);
    assert_eq!(transport.hits("/orders", "t2"), 1);
    assert_eq!(store.access_token().as_deref(), Some("t2"));
    assert_eq!(store.refresh_token().as_deref(), Some("r2"));
}

#[tokio::test]
async fn two_concurrent_401s_share_one_refresh() {
    let (transport, gate) = ScriptedTransport::gated("t2", RefreshScript::Issue(tokens("t2", "r2")));
    let store = Arc::new(MemoryTokenStore::with_tokens(tokens("t1", "r1")));
    let client = ApiClient::new(config(), transport.clone(), store);

    let release = async {
        while client.coordinator().waiting() < 1 {
            tokio::task::yield_now().await;
        }
        assert_eq!(client.coordinator().state(), RefreshState::Refreshing);
        gate.send(()).unwrap();
    };

    let (r1, r2, ()) = futures::join!(
        client.send(ApiRequest::get("/orders")),
        client.send(ApiRequest::get("/products")),
        release
    );

    assert_eq!(r1.unwrap().status, 200);
    assert_eq!(r2.unwrap().status, 200);
    assert_eq!(transport.refresh_calls(), 1);
    assert_eq!(transport.hits("/orders", "t2"), 1);
    assert_eq!(transport.hits("/products", "t2"), 1);
    assert_eq!(client.coordinator().waiting(), 0);
    assert_eq!(client.coordinator().state(), RefreshState::Idle);
}

#[tokio::test]
async fn many_concurrent_401s_all_succeed_with_one_refresh() {
    const N: usize = 8;
    let (transport, gate) = ScriptedTransport::gated("t2", RefreshScript::Issue(tokens("t2", "r2")));
    let client = ApiClient::new(
        config(),
        transport.clone(),
        MemoryTokenStore::with_tokens(tokens("t1", "r1")),
    );

    let requests = join_all((0..N).map(|i| client.send(ApiRequest::get(format!("/products/{i}")))));
    let release = async {
        while client.coordinator().waiting() < N - 1 {
            tokio::task::yield_now().await;
        }
        gate.send(()).unwrap();
    };

    let (results, ()) = futures::join!(requests, release);
    assert!(results.iter().all(|r| matches!(r, Ok(response) if response.status == 200)));
    assert_eq!(transport.refresh_calls(), 1);
    assert_eq!(
        transport.seen().iter().filter(|s| s.bearer.as_deref() == Some("t2")).count(),
        N
    );
}

#[tokio::test]
async fn failed_refresh_fails_everyone_and_ends_session() {
    let (transport, gate) = ScriptedTransport::gated("t2", RefreshScript::Reject(401));
    let store = Arc::new(MemoryTokenStore::with_tokens(tokens("t1", "r1")));
    let listener = CountingListener::default();
    let client = ApiClient::new(config(), transport.clone(), store.clone())
        .with_session_listener(listener.clone());

    let requests = join_all((0..3).map(|i| client.send(ApiRequest::get(format!("/orders/{i}")))));
    let release = async {
        while client.coordinator().waiting() < 2 {
            tokio::task::yield_now().await;
        }
        gate.send(()).unwrap();
    };

    let (results, ()) = futures::join!(requests, release);
    for result in &results {
        assert!(matches!(
            result,
            Err(ApiError::Auth(AuthError::RefreshRejected { status: 401 }))
        ));
    }
    assert_eq!(transport.refresh_calls(), 1);
    assert_eq!(listener.count(), 1);
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
    assert_eq!(client.coordinator().state(), RefreshState::Idle);
}

#[tokio::test]
async fn retried_request_is_not_retried_again() {
    let transport = ScriptedTransport::new("t2", RefreshScript::Issue(tokens("t2", "r2")));
    transport.reject_all();
    let listener = CountingListener::default();
    let client = ApiClient::new(
        config(),
        transport.clone(),
        MemoryTokenStore::with_tokens(tokens("t1", "r1")),
    )
    .with_session_listener(listener.clone());

    let result = client.send(ApiRequest::get("/orders")).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert_eq!(transport.refresh_calls(), 1);
    assert_eq!(transport.seen().iter().filter(|s| s.path.ends_with("/orders")).count(), 2);
    // The refresh itself worked, so the session stays
    assert_eq!(listener.count(), 0);
}

#[tokio::test]
async fn refresh_endpoint_401_is_never_retried() {
    let transport = ScriptedTransport::new("t1", RefreshScript::Reject(401));
    let client = ApiClient::new(
        config(),
        transport.clone(),
        MemoryTokenStore::with_tokens(tokens("t1", "r1")),
    );

    let request = ApiRequest::post("/auth/refresh")
        .json(&serde_json::json!({ "refreshToken": "r1" }))
        .unwrap();
    let result = client.send(request).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert_eq!(transport.refresh_calls(), 1);
}

#[tokio::test]
async fn relative_refresh_path_401_is_never_retried() {
    for path in ["auth/refresh", "auth/refresh/"] {
        let transport = ScriptedTransport::new("t1", RefreshScript::Reject(401));
        let client = ApiClient::new(
            config(),
            transport.clone(),
            MemoryTokenStore::with_tokens(tokens("t1", "r1")),
        );

        let result = client.send(ApiRequest::post(path)).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)), "{path}");
        assert_eq!(transport.refresh_calls(), 1, "{path}");
        assert_eq!(client.coordinator().state(), RefreshState::Idle);
    }
}

#[tokio::test]
async fn abandoned_leader_releases_waiters() {
    let (transport, _gate) = ScriptedTransport::gated("t2", RefreshScript::Issue(tokens("t2", "r2")));
    let client = ApiClient::new(
        config(),
        transport.clone(),
        MemoryTokenStore::with_tokens(tokens("t1", "r1")),
    );

    let mut leader = Box::pin(client.send(ApiRequest::get("/orders")));
    // Drive the leader until it parks on the closed refresh gate
    assert!(futures::poll!(leader.as_mut()).is_pending());
    assert_eq!(client.coordinator().state(), RefreshState::Refreshing);

    let follower = client.send(ApiRequest::get("/products"));
    let abandon = async {
        while client.coordinator().waiting() < 1 {
            tokio::task::yield_now().await;
        }
        drop(leader);
    };

    let (result, ()) = futures::join!(follower, abandon);
    assert!(matches!(result, Err(ApiError::Auth(AuthError::RefreshAbandoned))));
    assert_eq!(client.coordinator().state(), RefreshState::Idle);
}

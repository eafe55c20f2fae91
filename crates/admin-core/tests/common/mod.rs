#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use admin_core::auth::SessionListener;
use admin_core::domain::AuthTokens;
use admin_core::http::{HttpResponse, HttpTransport, OutgoingRequest};
use admin_core::{ApiConfig, Result};
use async_trait::async_trait;
use futures::channel::oneshot;

pub fn config() -> ApiConfig {
    ApiConfig::new("http://api.test/api").expect("valid test URL")
}

pub fn tokens(access: &str, refresh: &str) -> AuthTokens {
    AuthTokens {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    }
}

/// What `/auth/refresh` answers
#[derive(Clone)]
pub enum RefreshScript {
    Issue(AuthTokens),
    Reject(u16),
}

/// One request as seen on the wire
#[derive(Debug, Clone, PartialEq)]
pub struct Seen {
    pub path: String,
    pub bearer: Option<String>,
}

/// In-memory backend: resources accept exactly one access token, the refresh
/// endpoint follows its script and can be held closed until the test opens it.
pub struct ScriptedTransport {
    valid_token: Mutex<String>,
    refresh: Mutex<RefreshScript>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    reject_all: AtomicBool,
    refresh_calls: AtomicUsize,
    seen: Mutex<Vec<Seen>>,
}

impl ScriptedTransport {
    pub fn new(valid_token: &str, refresh: RefreshScript) -> Arc<Self> {
        Arc::new(Self {
            valid_token: Mutex::new(valid_token.to_string()),
            refresh: Mutex::new(refresh),
            gate: Mutex::new(None),
            reject_all: AtomicBool::new(false),
            refresh_calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Hold `/auth/refresh` until the returned sender fires
    pub fn gated(valid_token: &str, refresh: RefreshScript) -> (Arc<Self>, oneshot::Sender<()>) {
        let transport = Self::new(valid_token, refresh);
        let (tx, rx) = oneshot::channel();
        *transport.gate.lock().unwrap() = Some(rx);
        (transport, tx)
    }

    /// Make every resource answer 401 whatever the token
    pub fn reject_all(&self) {
        self.reject_all.store(true, Ordering::SeqCst);
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    /// Requests for `suffix` that carried `Bearer token`
    pub fn hits(&self, suffix: &str, token: &str) -> usize {
        self.seen()
            .iter()
            .filter(|s| s.path.ends_with(suffix) && s.bearer.as_deref() == Some(token))
            .count()
    }
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: &OutgoingRequest) -> Result<HttpResponse> {
        let path = request.url.path().to_string();
        self.seen.lock().unwrap().push(Seen {
            path: path.clone(),
            bearer: request.bearer.clone(),
        });

        if path.trim_end_matches('/').ends_with("/auth/refresh") {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }

            let script = self.refresh.lock().unwrap().clone();
            return Ok(match script {
                RefreshScript::Issue(tokens) => {
                    *self.valid_token.lock().unwrap() = tokens.access_token.clone();
                    HttpResponse::new(200, serde_json::to_string(&tokens).unwrap())
                }
                RefreshScript::Reject(status) => HttpResponse::new(status, ""),
            });
        }

        let accepted = !self.reject_all.load(Ordering::SeqCst)
            && request.bearer.as_deref() == Some(self.valid_token.lock().unwrap().as_str());
        if accepted {
            Ok(HttpResponse::new(200, serde_json::json!({ "path": path }).to_string()))
        } else {
            Ok(HttpResponse::new(401, ""))
        }
    }
}

/// Counts session teardowns
#[derive(Clone, Default)]
pub struct CountingListener {
    pub expired: Arc<AtomicUsize>,
}

impl CountingListener {
    pub fn count(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }
}

impl SessionListener for CountingListener {
    fn session_expired(&self) {
        self.expired.fetch_add(1, Ordering::SeqCst);
    }
}

//! Throwaway in-process backend for gateway tests.
//!
//! Every request is recorded, then answered from a fixed `(status, body)`
//! table keyed by method and path. Unknown routes get a 404.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use sharedvisions_db::{BackendClient, BackendConfig};
use tokio::net::TcpListener;

/// One request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    responses: Arc<Mutex<HashMap<(Method, String), (StatusCode, String)>>>,
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl MockBackend {
    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: serde_json::Value) {
        self.responses
            .lock()
            .unwrap()
            .insert((method, path.to_string()), (status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }

    /// Serve on an ephemeral port and return a client pointed at it.
    pub async fn spawn(&self) -> BackendClient {
        let router = Router::new().fallback(handle).with_state(self.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        BackendClient::new(&BackendConfig::new(format!("http://{addr}"), "anon-key")).unwrap()
    }
}

async fn handle(
    State(mock): State<MockBackend>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let path = uri.path().to_string();
    mock.log.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });
    mock.responses
        .lock()
        .unwrap()
        .get(&(method, path))
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, "{}".to_string()))
}

//! In-process HTTP backend for service tests.
//!
//! Responses are matched by method and path prefix; the most recently
//! registered match wins. Unmatched requests get a 404.

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::Router;
use sharedvisions_db::{BackendClient, BackendConfig};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct Hit {
    pub method: Method,
    pub path: String,
    pub query: String,
    pub body: String,
    pub raw: Vec<u8>,
}

type Route = (Method, String, StatusCode, Vec<u8>);

#[derive(Clone, Default)]
pub struct MockBackend {
    routes: Arc<Mutex<Vec<Route>>>,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl MockBackend {
    pub fn respond(&self, method: Method, prefix: &str, status: StatusCode, body: serde_json::Value) {
        self.respond_raw(method, prefix, status, body.to_string().into_bytes());
    }

    pub fn respond_raw(&self, method: Method, prefix: &str, status: StatusCode, body: Vec<u8>) {
        self.routes
            .lock()
            .unwrap()
            .push((method, prefix.to_string(), status, body));
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hits_to(&self, method: Method, prefix: &str) -> Vec<Hit> {
        self.hits()
            .into_iter()
            .filter(|h| h.method == method && h.path.starts_with(prefix))
            .collect()
    }

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
    body: Bytes,
) -> (StatusCode, Vec<u8>) {
    let path = uri.path().to_string();
    mock.hits.lock().unwrap().push(Hit {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().unwrap_or_default().to_string(),
        body: String::from_utf8_lossy(&body).into_owned(),
        raw: body.to_vec(),
    });
    mock.routes
        .lock()
        .unwrap()
        .iter()
        .rev()
        .find(|(m, prefix, _, _)| *m == method && path.starts_with(prefix.as_str()))
        .map(|(_, _, status, body)| (*status, body.clone()))
        .unwrap_or((StatusCode::NOT_FOUND, b"{}".to_vec()))
}

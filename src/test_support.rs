//! Local HTTP stubs for exercising the outbound clients

use axum::Router;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Serve `app` on an ephemeral localhost port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Last request seen by a stub: authorization header and JSON body.
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Option<(Option<String>, Value)>>>);

impl Captured {
    pub fn record(&self, authorization: Option<String>, body: Value) {
        *self.0.lock().unwrap() = Some((authorization, body));
    }

    pub fn authorization(&self) -> Option<String> {
        self.0.lock().unwrap().as_ref().and_then(|(auth, _)| auth.clone())
    }

    pub fn body(&self) -> Value {
        self.0
            .lock()
            .unwrap()
            .as_ref()
            .map(|(_, body)| body.clone())
            .unwrap_or(Value::Null)
    }
}

pub fn authorization(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{self, Body},
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use shopping_lists::{
    routes::{API_PREFIX, middleware::USER_ID_HEADER},
    state::AppState,
    test_helpers,
};

pub struct TestApp {
    pub state: Arc<AppState>,
    router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let state = test_helpers::sqlite_state()
            .await
            .expect("in-memory database should start");
        let router = test_helpers::app(Arc::clone(&state));
        Self { state, router }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        user_id: Option<i32>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("{API_PREFIX}{path}"));
        if let Some(user_id) = user_id {
            builder = builder.header(USER_ID_HEADER, user_id.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request should succeed");
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be json")
        };
        (status, value)
    }

    pub async fn get(&self, path: &str, user_id: i32) -> (StatusCode, Value) {
        self.request(Method::GET, path, Some(user_id), None).await
    }

    pub async fn post(&self, path: &str, user_id: i32, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(user_id), Some(body)).await
    }

    pub async fn put(&self, path: &str, user_id: i32, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, Some(user_id), Some(body)).await
    }

    pub async fn delete(&self, path: &str, user_id: i32) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, Some(user_id), None).await
    }

    /// Registers a user and returns its id.
    pub async fn user(&self, username: &str) -> i32 {
        let (status, body) = self
            .request(
                Method::POST,
                "/users",
                None,
                Some(json!({ "username": username, "email": format!("{username}@example.com") })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        id_of(&body["data"])
    }

    /// Creates a list owned by `user_id` and returns its id.
    pub async fn list(&self, user_id: i32, body: Value) -> i32 {
        let (status, body) = self.post("/lists", user_id, body).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        id_of(&body["data"])
    }
}

pub fn id_of(value: &Value) -> i32 {
    value["id"]
        .as_i64()
        .and_then(|id| i32::try_from(id).ok())
        .expect("payload should carry an id")
}

pub fn ids(values: &Value) -> Vec<i32> {
    values
        .as_array()
        .expect("value should be an array")
        .iter()
        .map(id_of)
        .collect()
}

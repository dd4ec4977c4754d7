use axum::{
    body::{Bytes, to_bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::response::JsonApiResponse;

const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;

/// Wraps plain-text error bodies (extractor rejections, unmatched routes) in
/// the JSON envelope, keeping the original status.
pub async fn json_error_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let status = response.status();

    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }
    if is_json_response(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let message = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => body_bytes_to_message(status, bytes),
        Err(_) => default_message(status),
    };

    let mut new_response = JsonApiResponse::from_status(status, message).into_response();
    copy_headers(&parts.headers, &mut new_response);
    new_response
}

fn is_json_response(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let value = value.to_ascii_lowercase();
            value.contains("application/json") || value.contains("+json")
        })
        .unwrap_or(false)
}

fn body_bytes_to_message(status: StatusCode, bytes: Bytes) -> String {
    let message = String::from_utf8_lossy(&bytes).trim().to_string();
    if message.is_empty() {
        return default_message(status);
    }
    message
}

fn default_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

fn copy_headers(src: &HeaderMap, dest: &mut Response) {
    for (name, value) in src {
        if name == header::CONTENT_TYPE || name == header::CONTENT_LENGTH {
            continue;
        }
        dest.headers_mut().insert(name.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{self, Body},
        http::{Request, StatusCode},
        middleware,
        routing::get,
    };
    use tower::ServiceExt;

    use super::json_error_middleware;

    #[tokio::test]
    async fn plain_text_errors_become_json_envelopes() {
        let app = Router::new()
            .route("/teapot", get(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }))
            .layer(middleware::from_fn(json_error_middleware));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/teapot")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let body: serde_json::Value =
            serde_json::from_slice(&bytes).expect("body should be json");
        assert_eq!(body["status"], 418);
        assert_eq!(body["message"], "short and stout");
    }

    #[tokio::test]
    async fn empty_not_found_uses_the_reason_phrase() {
        let app = Router::new().layer(middleware::from_fn(json_error_middleware));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nowhere")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let body: serde_json::Value =
            serde_json::from_slice(&bytes).expect("body should be json");
        assert_eq!(body["message"], "Not Found");
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{error::AppError, validation::FieldErrors};

pub type ApiResult<T> = Result<JsonApiResponse<T>, AppError>;

#[derive(Debug, Serialize)]
pub struct JsonApiResponse<T: Serialize> {
    pub status: u16,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T: Serialize> JsonApiResponse<T> {
    pub fn ok(data: T) -> ApiResult<T> {
        Self::with_status(StatusCode::OK, "ok", data)
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>, data: T) -> ApiResult<T> {
        Ok(Self {
            status: status.as_u16(),
            message: message.into(),
            data,
            errors: None,
        })
    }
}

impl JsonApiResponse<serde_json::Value> {
    pub(crate) fn from_error(err: &AppError) -> Self {
        Self {
            status: status_for(err).as_u16(),
            message: err.message().to_string(),
            data: serde_json::Value::Null,
            errors: err.field_errors().cloned(),
        }
    }

    /// Envelope for an error response produced outside the handlers.
    pub(crate) fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data: serde_json::Value::Null,
            errors: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        JsonApiResponse::from_error(&self).into_response()
    }
}

impl<T: Serialize> IntoResponse for JsonApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

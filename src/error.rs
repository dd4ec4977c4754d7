use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, errors: FieldErrors },
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(errors: FieldErrors) -> Self {
        Self::Validation {
            message: "Invalid request, check 'errors' property for more info".to_string(),
            errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Logs `source` and keeps only `message` for the client.
    pub fn internal_with_source(message: impl Into<String>, source: impl std::fmt::Display) -> Self {
        let message = message.into();
        tracing::error!(error = %source, "{message}");
        Self::Internal(message)
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::Internal(message) => message.as_str(),
            Self::Validation { message, .. } => message.as_str(),
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

impl From<crate::db::dao::DaoLayerError> for AppError {
    fn from(err: crate::db::dao::DaoLayerError) -> Self {
        match err {
            crate::db::dao::DaoLayerError::NotFound { .. } => AppError::not_found(err.to_string()),
            crate::db::dao::DaoLayerError::Db(db_err) => {
                AppError::internal_with_source("Database operation failed", db_err)
            }
        }
    }
}

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Error body returned to clients: a top-level message plus field-level
/// detail strings. The `errors` list is omitted when empty.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub errors: Vec<String>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            errors: Vec::new(),
        }
    }

    pub fn with_errors<E>(status: StatusCode, err: E, errors: Vec<String>) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            errors,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            message: self.error.to_string(),
            errors: self.errors,
        });

        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn constructors_set_expected_status() {
        assert_eq!(AppError::not_found(anyhow!("x")).status, StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict(anyhow!("x")).status, StatusCode::CONFLICT);
        assert_eq!(
            AppError::unprocessable(anyhow!("x")).status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::bad_request(anyhow!("x")).status, StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::internal(anyhow!("x")).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn body_omits_empty_error_list() {
        let body = ErrorBody {
            message: "Student not found".to_string(),
            errors: Vec::new(),
        };
        let serialized = serde_json::to_string(&body).unwrap();
        assert_eq!(serialized, r#"{"message":"Student not found"}"#);
    }

    #[test]
    fn body_keeps_sub_errors_when_present() {
        let body = ErrorBody {
            message: "Validation failed".to_string(),
            errors: vec!["name must not be blank".to_string()],
        };
        let serialized = serde_json::to_string(&body).unwrap();
        assert!(serialized.contains(r#""errors":["name must not be blank"]"#));
    }
}

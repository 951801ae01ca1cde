/// Error types for lenta
///
/// Every failure resolves to a normal HTTP response: unknown resources map
/// to 404, invalid form input to 400, and unauthenticated access to a
/// protected route to a redirect into the login flow.
use actix_web::{error::ResponseError, http::header, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for lenta operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Validation failed
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Duplicate resource
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unauthenticated caller on a protected route; `location` already
    /// carries the login path with the return-target query parameter.
    #[error("login required")]
    LoginRequired { location: String },
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::LoginRequired { .. } => StatusCode::FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::LoginRequired { location } = self {
            return HttpResponse::Found()
                .insert_header((header::LOCATION, location.as_str()))
                .finish();
        }

        let status = self.status_code();
        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::DatabaseError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn login_required_redirects_to_the_supplied_location() {
        let err = AppError::LoginRequired {
            location: "/auth/login/?next=%2Fnew%2F".into(),
        };
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/auth/login/?next=%2Fnew%2F"
        );
    }
}

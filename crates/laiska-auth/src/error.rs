use actix_web::HttpResponse;
use actix_web::ResponseError;
use actix_web::http::StatusCode;
use laiska_records::StoreError;

/// Every failure a request can end in. The message is the whole body.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or missing request fields.
    Validation(String),
    /// Bad credentials, secret, or token. Deliberately vague.
    Unauthorized(&'static str),
    /// Administrative lookups only; never used for credentials.
    NotFound(&'static str),
    Conflict(&'static str),
    Internal(&'static str),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(s) => write!(f, "{}", s),
            Self::Unauthorized(s) => write!(f, "{}", s),
            Self::NotFound(s) => write!(f, "{}", s),
            Self::Conflict(s) => write!(f, "{}", s),
            Self::Internal(s) => write!(f, "{}", s),
        }
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(what) => Self::Conflict(what),
            e => {
                log::error!("store failure: {}", e);
                Self::Internal("internal error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(ApiError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Internal("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn store_failures_are_generic() {
        assert!(matches!(
            ApiError::from(StoreError::Timeout),
            ApiError::Internal("internal error")
        ));
        assert!(matches!(
            ApiError::from(StoreError::Conflict("sensor already registered")),
            ApiError::Conflict("sensor already registered")
        ));
    }
}

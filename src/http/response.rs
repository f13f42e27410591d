//! Error responses.
//!
//! Every failure leaves the service as `{"error":{"code":..,"message":..}}`
//! with a status derived from the error kind.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::dispatch::HandlerError;
use crate::routing::ResolveError;

#[derive(Debug)]
pub enum ApiError {
    /// The request path could not be decoded.
    InvalidPath(String),
    Resolve(ResolveError),
    Handler(HandlerError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ApiError::Resolve(ResolveError::Unroutable { .. }) => StatusCode::NOT_FOUND,
            ApiError::Resolve(ResolveError::AmbiguousRoute { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Handler(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidPath(_) => "InvalidPath",
            ApiError::Resolve(e) => e.code(),
            ApiError::Handler(e) => e.code(),
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(e: ResolveError) -> Self {
        ApiError::Resolve(e)
    }
}

impl From<HandlerError> for ApiError {
    fn from(e: HandlerError) -> Self {
        ApiError::Handler(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::InvalidPath(reason) => reason.clone(),
            ApiError::Resolve(e) => e.to_string(),
            ApiError::Handler(e) => e.to_string(),
        };
        let body = json!({ "error": { "code": self.code(), "message": message } });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let unroutable = ApiError::from(ResolveError::Unroutable {
            path: "Unknowns(1)".into(),
            rejected: 0,
        });
        assert_eq!(unroutable.status(), StatusCode::NOT_FOUND);
        assert_eq!(unroutable.code(), "Unroutable");

        let ambiguous = ApiError::from(ResolveError::AmbiguousRoute {
            path: "x".into(),
            handlers: vec!["a".into(), "b".into()],
        });
        assert_eq!(ambiguous.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let rejected = ApiError::from(HandlerError::Rejected("no".into()));
        assert_eq!(rejected.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

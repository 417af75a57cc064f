use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// JSON body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody { pub message: String }

/// Handler failure rendered as `{"message": ...}` with the given status.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpError {
    pub fn not_found() -> Self { Self { status: StatusCode::NOT_FOUND, message: "Not found".into() } }

    pub fn internal<E: std::fmt::Display>(e: E) -> Self {
        tracing::error!(error = %e, "request failed");
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: e.to_string() }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response { (self.status, axum::Json(ErrorBody { message: self.message })).into_response() }
}

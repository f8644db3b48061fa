use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::Error;
use tracing::warn;

use super::responses::ErrorResponse;

/// Handler error carrying the engine error through to an HTTP status
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::AllSourcesUnavailable(_) | Error::StoreUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Error::Provider { .. } | Error::Timeout { .. } => StatusCode::BAD_GATEWAY,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("Request failed ({}): {}", status, self.0);
        (status, Json(ErrorResponse::new(self.0.to_string()))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

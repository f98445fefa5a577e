use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use profiles::FetchError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AppError {
    #[error("FID is required")]
    MissingFid,

    #[error("Invalid FID")]
    InvalidFid,

    #[error("User not found")]
    NotFound,

    #[error("Failed to fetch user data")]
    Upstream(FetchError),

    #[error("Malformed payload")]
    MalformedPayload,
}

impl From<FetchError> for AppError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::NotFound => AppError::NotFound,
            other => AppError::Upstream(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MissingFid | AppError::InvalidFid | AppError::MalformedPayload => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_mapping() {
        assert_eq!(AppError::from(FetchError::NotFound), AppError::NotFound);
        assert_eq!(
            AppError::from(FetchError::Malformed),
            AppError::Upstream(FetchError::Malformed)
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::MissingFid.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Upstream(FetchError::UpstreamUnavailable)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dsc_error::{ConnectorError, ErrorCode};

/// Wraps a [`ConnectorError`] so handlers can return it directly.
#[derive(Debug)]
pub struct ApiError(pub ConnectorError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        status_for(self.0.code)
    }
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ObjectNotFound | ErrorCode::TransferProcessNotFound => StatusCode::NOT_FOUND,
        ErrorCode::ObjectExists => StatusCode::CONFLICT,
        ErrorCode::InvalidRequest | ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::AuthenticationFailed => StatusCode::UNAUTHORIZED,
        ErrorCode::AuthorizationFailed | ErrorCode::InvalidToken | ErrorCode::TokenExpired => {
            StatusCode::FORBIDDEN
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ConnectorError> for ApiError {
    fn from(err: ConnectorError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(target: "errors", error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }
        (status, Json(self.0)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorCode::ObjectNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorCode::ObjectExists), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorCode::InvalidRequest), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(ErrorCode::AuthenticationFailed),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(ErrorCode::AuthorizationFailed),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(ErrorCode::StoreFailure),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_response_carries_error_body() {
        let response = ApiError::from(ConnectorError::not_found("ContractDefinition", "x"))
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

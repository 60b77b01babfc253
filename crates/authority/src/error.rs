use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Body the device answers with when it cannot sign a request.
pub const ERROR_BODY: &str = "ERR\n";

#[derive(Debug, thiserror::Error)]
pub enum AuthorityError {
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
    #[error("Invalid signing request: {0}")]
    BadRequest(String),
}

/// Trait implementation to convert this error into an axum http response
impl IntoResponse for AuthorityError {
    fn into_response(self) -> Response {
        match self {
            AuthorityError::BadRequest(_) => (StatusCode::BAD_REQUEST, ERROR_BODY).into_response(),
            AuthorityError::Unexpected(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something wrong happened.",
            )
                .into_response(),
        }
    }
}

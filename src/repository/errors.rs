use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Maps a non-success HTTP status and its body to a repository error.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 => RepositoryError::BadRequest(body),
            401 | 403 => RepositoryError::Unauthorized,
            404 => RepositoryError::NotFound,
            _ => RepositoryError::Http { status, body },
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::DecodeError(format!("Malformed JSON payload: {err}"))
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::DecodeError(format!("Malformed response: {err}"))
        } else if let Some(status) = err.status() {
            RepositoryError::from_status(status.as_u16(), err.to_string())
        } else if err.is_connect() || err.is_timeout() || err.is_request() {
            RepositoryError::ConnectionError(format!("Connection error: {err}"))
        } else {
            RepositoryError::Unexpected(format!("Unexpected HTTP client error: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_variants() {
        assert!(matches!(
            RepositoryError::from_status(400, "wrong".into()),
            RepositoryError::BadRequest(body) if body == "wrong"
        ));
        assert!(matches!(
            RepositoryError::from_status(401, String::new()),
            RepositoryError::Unauthorized
        ));
        assert!(matches!(
            RepositoryError::from_status(404, String::new()),
            RepositoryError::NotFound
        ));
        assert!(matches!(
            RepositoryError::from_status(502, "gateway".into()),
            RepositoryError::Http { status: 502, .. }
        ));
    }
}

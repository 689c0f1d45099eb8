use reqwest::StatusCode;

/// Message used when an error response carries no `error` field.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

pub type RequestResult<T> = Result<T, RequestError>;

/// Failure of a single backend request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Backend answered outside the 2xx range.
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    /// Request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// Response body was not the expected JSON shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
    /// Backend returned `success: false` inside a 2xx response.
    #[error("{0}")]
    Rejected(String),
}

impl RequestError {
    /// HTTP status when the backend answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Builds a status error from a raw error body.
    ///
    /// The message is the body's `error` field when present.
    pub fn from_body(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(|error| error.as_str())
                    .map(str::to_string)
            })
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
        Self::Status { status, message }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else {
            Self::Transport(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RequestError, GENERIC_ERROR_MESSAGE};
    use reqwest::StatusCode;

    #[test]
    fn message_comes_from_error_field() {
        let err = RequestError::from_body(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"db down"}"#);
        assert_eq!(err.to_string(), "db down");
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn falls_back_to_generic_message() {
        for body in ["", "<html>", r#"{"success":false}"#, r#"{"error":""}"#] {
            let err = RequestError::from_body(StatusCode::BAD_REQUEST, body);
            assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);
        }
    }
}

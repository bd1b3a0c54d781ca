use reqwest::StatusCode;

/// Why a fetch-and-render did not update the display.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to exporter failed: {0}")]
    Network(String),
    #[error("exporter returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("could not decode limit status: {0}")]
    Decode(String),
    #[error("could not write to display: {0}")]
    Display(#[from] std::io::Error),
}

impl FetchError {
    /// Stable short code, suitable for logs and scripts.
    pub fn code(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network_error",
            FetchError::Status { status, .. } => match *status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "unauthorized",
                StatusCode::NOT_FOUND => "not_found",
                StatusCode::TOO_MANY_REQUESTS => "rate_limited",
                s if s.is_server_error() => "upstream_error",
                _ => "bad_status",
            },
            FetchError::Decode(_) => "decode_error",
            FetchError::Display(_) => "display_error",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid exporter URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("watch interval must be at least one second")]
    InvalidInterval,
}

/// Failure to build a fetcher from configuration.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: StatusCode) -> FetchError {
        FetchError::Status {
            status: code,
            message: String::new(),
        }
    }

    #[test]
    fn error_code_matrix() {
        assert_eq!(status(StatusCode::UNAUTHORIZED).code(), "unauthorized");
        assert_eq!(status(StatusCode::FORBIDDEN).code(), "unauthorized");
        assert_eq!(status(StatusCode::NOT_FOUND).code(), "not_found");
        assert_eq!(status(StatusCode::TOO_MANY_REQUESTS).code(), "rate_limited");
        assert_eq!(status(StatusCode::INTERNAL_SERVER_ERROR).code(), "upstream_error");
        assert_eq!(status(StatusCode::BAD_GATEWAY).code(), "upstream_error");
        assert_eq!(status(StatusCode::BAD_REQUEST).code(), "bad_status");
        assert_eq!(FetchError::Network("x".into()).code(), "network_error");
        assert_eq!(FetchError::Decode("x".into()).code(), "decode_error");
    }

    #[test]
    fn status_error_message() {
        let e = FetchError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "token expired".into(),
        };
        assert_eq!(
            e.to_string(),
            "exporter returned 500 Internal Server Error: token expired"
        );
    }
}

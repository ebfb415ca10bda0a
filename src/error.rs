use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Gemini API error: {status}")]
    Upstream { status: u16 },

    #[error("AI service error: request timed out after {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error("AI service error: {0}")]
    Ai(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        Self::PayloadTooLarge(msg.into())
    }

    pub fn ai(msg: impl Into<String>) -> Self {
        Self::Ai(msg.into())
    }

    /// HTTP status a handler should answer with when this error reaches the surface.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for failures that originate from the upstream AI provider.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Upstream { .. } | Self::Timeout { .. } | Self::Ai(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = Error::validation("At least one image is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "At least one image is required");
    }

    #[test]
    fn test_payload_too_large_maps_to_413() {
        let err = Error::payload_too_large("Images too large (max 20MB total)");
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_upstream_carries_status_in_message() {
        let err = Error::Upstream { status: 503 };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Gemini API error: 503");
        assert!(err.is_upstream());
    }

    #[test]
    fn test_config_error_is_not_upstream() {
        assert!(!Error::config("missing key").is_upstream());
        assert!(Error::Timeout { attempts: 3 }.is_upstream());
    }
}

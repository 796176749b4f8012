use reqwest::StatusCode;
use thiserror::Error;
use zeronight_shared::shared_word_game::ErrorDetail;

/// Failure of a single request against the game server.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("server rejected request ({status})")]
    Rejected {
        status: StatusCode,
        detail: Option<ErrorDetail>,
    },
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            Self::Rejected { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }

    /// True for a rejection carrying exactly this status and `detail` message.
    pub fn is(&self, status: StatusCode, message: &str) -> bool {
        self.status() == Some(status) && self.detail().and_then(ErrorDetail::message) == Some(message)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to install logger: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

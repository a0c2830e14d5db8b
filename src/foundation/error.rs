pub type ScrollreelResult<T> = Result<T, ScrollreelError>;

#[derive(thiserror::Error, Debug)]
pub enum ScrollreelError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("measurement unavailable: {0}")]
    MeasurementUnavailable(String),

    #[error("missing anchor: {0}")]
    MissingAnchor(String),

    #[error("timeline error: {0}")]
    Timeline(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollreelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn measurement(msg: impl Into<String>) -> Self {
        Self::MeasurementUnavailable(msg.into())
    }

    pub fn missing_anchor(msg: impl Into<String>) -> Self {
        Self::MissingAnchor(msg.into())
    }

    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ScrollreelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

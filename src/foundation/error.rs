pub type SceneResult<T> = Result<T, SceneError>;

#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("export error: {0}")]
    Export(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SceneError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// `true` for failures caused by malformed persisted or loaded JSON.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

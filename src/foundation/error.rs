pub type WisdomResult<T> = Result<T, WisdomError>;

#[derive(thiserror::Error, Debug)]
pub enum WisdomError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("narration synthesis failed: {0}")]
    Synthesis(String),

    #[error("narration decode failed: {0}")]
    Decode(String),

    #[error("recording not supported: {0}")]
    UnsupportedFormat(String),

    #[error("rendering surface not ready: {0}")]
    SurfaceMissing(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WisdomError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    pub fn surface_missing(msg: impl Into<String>) -> Self {
        Self::SurfaceMissing(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Network, quota or malformed-reply failure of a remote call. Quote fetches retry on any
    /// error; this only tags the retry log.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

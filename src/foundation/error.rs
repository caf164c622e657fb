/// Convenience result type used across LumaBooth.
pub type BoothResult<T> = Result<T, BoothError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Capture-time errors abort the running session; composition-time errors
/// abort only that export call, leaving the session and its stills intact.
#[derive(thiserror::Error, Debug)]
pub enum BoothError {
    /// Invalid user-provided parameters or composition data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The camera/video source cannot serve frames.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// Compositor invoked with an empty image list.
    #[error("no photos to compose")]
    NoPhotos,

    /// A still image failed to load or decode.
    #[error("image load failure: {0}")]
    LoadFailure(String),

    /// Animated export requested where video recording is unavailable.
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Animated export requested for a session that was not a live capture.
    #[error("policy rejected: {0}")]
    PolicyRejected(String),

    /// Errors while encoding pixels to an output format.
    #[error("encode error: {0}")]
    Encode(String),

    /// Share-store rejections (oversized payload, unsupported media type).
    #[error("share error: {0}")]
    Share(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoothError {
    /// Build a [`BoothError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BoothError::SourceUnavailable`] value.
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }

    /// Build a [`BoothError::LoadFailure`] value.
    pub fn load_failure(msg: impl Into<String>) -> Self {
        Self::LoadFailure(msg.into())
    }

    /// Build a [`BoothError::UnsupportedPlatform`] value.
    pub fn unsupported_platform(msg: impl Into<String>) -> Self {
        Self::UnsupportedPlatform(msg.into())
    }

    /// Build a [`BoothError::PolicyRejected`] value.
    pub fn policy_rejected(msg: impl Into<String>) -> Self {
        Self::PolicyRejected(msg.into())
    }

    /// Build a [`BoothError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`BoothError::Share`] value.
    pub fn share(msg: impl Into<String>) -> Self {
        Self::Share(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FrameError>;

#[derive(Debug, Error)]
pub enum FrameError {
    /// A browser API call failed; the payload is the stringified JS error.
    #[error("platform call failed: {operation}: {detail}")]
    Platform {
        operation: &'static str,
        detail: String,
    },

    #[error("required element is missing: {what}")]
    MissingElement { what: &'static str },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FrameError {
    #[must_use]
    pub fn platform(operation: &'static str, detail: impl Into<String>) -> Self {
        Self::Platform {
            operation,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub const fn missing(what: &'static str) -> Self {
        Self::MissingElement { what }
    }
}

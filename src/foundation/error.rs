/// Convenience result type used across ripple.
pub type RippleResult<T> = Result<T, RippleError>;

/// Top-level error taxonomy used by the kernel, the sinks and the batch pipeline.
#[derive(thiserror::Error, Debug)]
pub enum RippleError {
    /// Zero width or height.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Pixel buffer length does not match `width * height * 4`.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        /// Length implied by the declared dimensions.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// Wave parameter that is not usable after scaling (NaN or infinite).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Source image could not be read or is in an unsupported format.
    #[error("decode error: {0}")]
    Decode(String),

    /// An external tool (`ffmpeg`) is missing or failed.
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Invalid user-provided options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal failures while producing frames.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RippleError {
    /// Build a [`RippleError::InvalidDimensions`] value.
    pub fn invalid_dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions(msg.into())
    }

    /// Build a [`RippleError::InvalidParameter`] value.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Build a [`RippleError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`RippleError::ExternalTool`] value.
    pub fn external_tool(msg: impl Into<String>) -> Self {
        Self::ExternalTool(msg.into())
    }

    /// Build a [`RippleError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RippleError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

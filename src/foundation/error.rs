/// Convenience result type used across engrave.
pub type EngraveResult<T> = Result<T, EngraveError>;

/// Top-level error taxonomy used by filter, layout and session APIs.
#[derive(thiserror::Error, Debug)]
pub enum EngraveError {
    /// A required setting (usually the font) is missing. Text operations report this and
    /// leave the buffer untouched.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Zero-sized or mismatched buffer dimensions.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// A parameter that cannot be clamped into a usable range (e.g. pixelate block size 0).
    #[error("parameter out of range: {0}")]
    ParameterOutOfRange(String),

    /// Malformed user-provided values (colors, kernels, row specs).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Decode/encode failures at the `image` crate boundary.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngraveError {
    /// Build a [`EngraveError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`EngraveError::InvalidDimension`] value.
    pub fn invalid_dimension(msg: impl Into<String>) -> Self {
        Self::InvalidDimension(msg.into())
    }

    /// Build a [`EngraveError::ParameterOutOfRange`] value.
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::ParameterOutOfRange(msg.into())
    }

    /// Build a [`EngraveError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`EngraveError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

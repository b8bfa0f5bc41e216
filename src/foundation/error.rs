/// Convenience result type used across Dotmorph.
pub type DotmorphResult<T> = Result<T, DotmorphError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is fatal to the operation that raised it: resource creation is never
/// retried, and shader rejection aborts renderer construction outright.
#[derive(thiserror::Error, Debug)]
pub enum DotmorphError {
    /// A GPU or raster resource (texture, buffer, mesh, drawing surface) could not be
    /// created or written.
    #[error("resource error: {0}")]
    Resource(String),

    /// Shader source was rejected at compile or link time. Carries the GPU's own
    /// diagnostic text.
    #[error("shader error: {0}")]
    Shader(String),

    /// A render or update operation was invoked before `initialize`, or after `free`.
    #[error("uninitialized: {0}")]
    Uninitialized(String),

    /// Invalid user-provided configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DotmorphError {
    /// Build a [`DotmorphError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`DotmorphError::Shader`] value.
    pub fn shader(msg: impl Into<String>) -> Self {
        Self::Shader(msg.into())
    }

    /// Build a [`DotmorphError::Uninitialized`] value.
    pub fn uninitialized(msg: impl Into<String>) -> Self {
        Self::Uninitialized(msg.into())
    }

    /// Build a [`DotmorphError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

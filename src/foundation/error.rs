/// Convenience result type used across medcorrupt.
pub type CorruptResult<T> = Result<T, CorruptError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum CorruptError {
    /// Malformed or empty schedule, or an inconsistent registry table.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Caller-provided argument outside its accepted domain (severity, arity, empty pool).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Lookup of an unknown dataset or corruption name.
    #[error("not found: {0}")]
    NotFound(String),

    /// Ink stencil bank missing or corrupt.
    #[error("asset load error: {0}")]
    AssetLoad(String),

    /// An operator produced data that violates the u8 output contract.
    #[error("numeric range violation: {0}")]
    NumericRange(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CorruptError {
    /// Build a [`CorruptError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`CorruptError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`CorruptError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`CorruptError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`CorruptError::NumericRange`] value.
    pub fn numeric_range(msg: impl Into<String>) -> Self {
        Self::NumericRange(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

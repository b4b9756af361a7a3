use crate::config::ConfigError;

/// Precondition failures that stop a filtering run before any mask is evaluated.
///
/// Individual masks never produce an error; they are rejected silently.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("invalid filter configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidImageSize { width: u32, height: u32 },
}

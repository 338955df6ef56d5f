//! Error types for the site layer.

use thiserror::Error;

/// Why a contact form submission was rejected before acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field is empty: {0}")]
    MissingField(&'static str),
    #[error("e-mail address is malformed")]
    MalformedEmail,
}

/// Host-supplied configuration could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),
}

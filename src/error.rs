use thiserror::Error;

pub type ProtectResult<T> = std::result::Result<T, ProtectError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtectError {
    #[error("invalid preset value: {0} (must be between -1 and 9)")]
    InvalidPreset(i32),

    #[error("{kind} not found: {identifier}")]
    NotFound {
        kind: &'static str,
        identifier: String,
    },

    /// Any non-2xx response, transport failure or undecodable body.
    #[error("{0}")]
    Remote(String),
}

impl ProtectError {
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }

    pub fn not_found(kind: &'static str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            identifier: identifier.into(),
        }
    }
}

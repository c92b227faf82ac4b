//! Transport abstraction for reaching the persistence service.

use crate::blob::BoxFuture;
use thiserror::Error;

/// Transport errors. A non-2xx reply is not one of them.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Failed to read response: {0}")]
    Body(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Raw reply from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Posts JSON bodies to the persistence service.
///
/// Implementations own the base URL; `path` is relative to it
/// (e.g. `/api/snapshots`).
pub trait Transport: Send + Sync {
    fn post_json(
        &self,
        path: &str,
        body: Vec<u8>,
    ) -> BoxFuture<'_, TransportResult<TransportResponse>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let response = |status| TransportResponse {
            status,
            body: Vec::new(),
        };
        assert!(response(200).is_success());
        assert!(response(201).is_success());
        assert!(!response(302).is_success());
        assert!(!response(413).is_success());
    }
}

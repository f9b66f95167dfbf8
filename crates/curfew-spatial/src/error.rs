//! Directory error type.

use thiserror::Error;

/// Recoverable query failures. Callers treat these as no-ops rather
/// than propagating a crash.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpatialError {
    /// `nearest_agent` was asked about an empty agent registry.
    #[error("no agents registered")]
    EmptyRegistry,
}

//! Error types for the ingestion boundary.

use thiserror::Error;

/// Errors raised when a sample cannot be applied.
///
/// The stores themselves never fail for well-formed operations on known
/// rigs; malformed input is rejected here, at the ingestion boundary,
/// before it reaches either store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// The sample referenced a rig outside the configured set.
    #[error("unknown rig id: {0}")]
    UnknownRig(String),
}

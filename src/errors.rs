/*!
 * Error Types
 * Queue error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Queue errors with serialization support
///
/// CAS failures never appear here: they are retried internally and are not
/// an observable outcome of any operation.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum QueueError {
    #[error("Queue is empty")]
    #[diagnostic(
        code(queue::empty),
        help("No element was available at the linearization point. Retry later or check size().")
    )]
    Empty,

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(queue::configuration),
        help("Valid strategies are lagging, scanning or auto. Limits must be unsigned integers.")
    )]
    Configuration(String),
}

impl QueueError {
    /// True for the dequeue-on-empty condition
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, QueueError::Empty)
    }
}

/// Result type for queue operations
pub type Result<T> = std::result::Result<T, QueueError>;

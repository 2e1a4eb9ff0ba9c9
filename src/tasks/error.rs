use thiserror::Error;

/// Rejection raised when a task cannot be created from the given input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task cannot be empty")]
    EmptyText,
}

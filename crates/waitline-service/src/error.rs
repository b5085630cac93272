//! Domain errors returned by the admission engine.

use thiserror::Error;

use waitline_core::error::{AppError, ErrorKind};

/// Failure of a request-path queue operation.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue name is empty or blank.
    #[error("Queue name must not be empty")]
    InvalidQueueName,

    /// The user id is not a positive integer.
    #[error("User id must be positive, got {0}")]
    InvalidUserId(i64),

    /// The admission count is negative.
    #[error("Admission count must not be negative, got {0}")]
    InvalidCount(i64),

    /// The user already holds a place in the queue.
    #[error("User {user_id} is already registered in queue '{queue}'")]
    AlreadyRegistered {
        /// Queue name.
        queue: String,
        /// User id.
        user_id: i64,
    },

    /// The queue has reached its configured capacity.
    #[error("Queue '{queue}' is full (capacity {limit})")]
    CapacityExceeded {
        /// Queue name.
        queue: String,
        /// Configured capacity.
        limit: u64,
    },

    /// The ordered-set store failed.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl QueueError {
    /// Stable error code for transport adapters.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered { .. } => "UQ-001",
            Self::InvalidQueueName => "UQ-002",
            Self::InvalidUserId(_) => "UQ-003",
            Self::InvalidCount(_) => "UQ-004",
            Self::CapacityExceeded { .. } => "UQ-005",
            Self::Store(_) => "UQ-500",
        }
    }

    /// Whether the caller supplied bad input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidQueueName | Self::InvalidUserId(_) | Self::InvalidCount(_)
        )
    }
}

impl From<QueueError> for AppError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Store(inner) => inner,
            QueueError::AlreadyRegistered { .. } => AppError::new(ErrorKind::Conflict, err.to_string()),
            QueueError::CapacityExceeded { .. } => {
                AppError::new(ErrorKind::CapacityExceeded, err.to_string())
            }
            QueueError::InvalidQueueName
            | QueueError::InvalidUserId(_)
            | QueueError::InvalidCount(_) => AppError::new(ErrorKind::Validation, err.to_string()),
        }
    }
}

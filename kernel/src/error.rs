use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    NotFound,
    InvalidInput,
    InsufficientInventory,
    AlreadyCancelled,
    Unauthorized,
    Forbidden,
    Concurrency,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound => write!(f, "Entity not found"),
            KernelError::InvalidInput => write!(f, "Invalid input"),
            KernelError::InsufficientInventory => write!(f, "Not enough seats available"),
            KernelError::AlreadyCancelled => write!(f, "Booking already cancelled"),
            KernelError::Unauthorized => write!(f, "Not authenticated"),
            KernelError::Forbidden => write!(f, "Operation not permitted"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl KernelError {
    /// Whether the same request may succeed when sent again unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, KernelError::Concurrency | KernelError::Timeout)
    }
}

impl Context for KernelError {}

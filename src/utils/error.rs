use thiserror::Error;

use crate::domain::sizing::LoadRejection;

#[derive(Error, Debug)]
pub enum CourierError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Courier provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Provider,
    Transport,
}

impl CourierError {
    pub fn configuration(message: impl Into<String>) -> Self {
        CourierError::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CourierError::Validation {
            message: message.into(),
        }
    }

    /// HTTP-style status attached to the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            CourierError::Configuration { .. } => Some(500),
            CourierError::Validation { .. } => Some(400),
            CourierError::Provider { status, .. } => Some(*status),
            CourierError::Transport { .. } => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CourierError::Configuration { .. } => ErrorCategory::Configuration,
            CourierError::Validation { .. } => ErrorCategory::Validation,
            CourierError::Provider { .. } => ErrorCategory::Provider,
            CourierError::Transport { .. } => ErrorCategory::Transport,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CourierError::Configuration { .. } => {
                "Check ROADIE_API_TOKEN and the courier configuration file"
            }
            CourierError::Validation { .. } => {
                "Adjust the number of bags/boxes or the pickup/delivery addresses"
            }
            CourierError::Provider { status, .. } if *status >= 500 => {
                "The courier network is having trouble, try again later"
            }
            CourierError::Provider { .. } => "Review the request sent to the courier network",
            CourierError::Transport { .. } => "Check network connectivity to the courier network",
        }
    }
}

impl From<LoadRejection> for CourierError {
    fn from(rejection: LoadRejection) -> Self {
        CourierError::Validation {
            message: rejection.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CourierError>;

/// Failures of the booking persistence layer. These never leave the courier
/// adapter; they are logged after a shipment has been created.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Booking API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Booking API rejected the update ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid booking id: {booking_id}")]
    InvalidKey { booking_id: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

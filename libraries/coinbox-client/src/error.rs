//! Error types for the device client

use thiserror::Error;

/// Result type for device client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the Coinbox device
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed (connection refused, timeout, ...)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Device returned a non-success status
    #[error("Device error ({status}): {message}")]
    DeviceError {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Slot index out of range
    #[error("Invalid slot index {0} (device has {max} slots)", max = crate::SLOT_COUNT)]
    InvalidSlot(u8),

    /// Invalid device address
    #[error("Invalid device address: {0}")]
    InvalidAddress(String),
}

//! Error types for picker operations.
//!
//! Every variant is recoverable: the operation that produced it changed no
//! state, and the host may ignore it or surface it as a status message.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PickerError {
    #[error("Invalid date text: {0}")]
    InvalidInputText(String),

    #[error("Date out of range: {0}")]
    OutOfBounds(NaiveDate),

    #[error("Navigation refused: {0}")]
    NavigationRefused(String),
}

pub type Result<T> = std::result::Result<T, PickerError>;

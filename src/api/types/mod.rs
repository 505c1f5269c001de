//! Shared API request and response types

pub mod error;
pub mod json;

pub use error::{panic_response, ApiError, ApiErrorResponse, ApiErrorType};
pub use json::{Json, JsonRejection};

//! REST API module.
//!
//! Contains the backend handlers for every operation in the contract table.

mod categories;
mod chat;
mod concerns;
mod contact;

pub use categories::*;
pub use chat::*;
pub use concerns::*;
pub use contact::*;

use crate::errors::AppError;

/// Handler result type; errors render as JSON bodies via `AppError`.
pub type ApiResult<T> = Result<T, AppError>;

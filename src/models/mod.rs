//! Data models for the Wellmind community application.
//!
//! These types are the single source of truth for wire shapes; the API
//! handlers and the client hooks both serialize against them.

mod chat;
mod concern;
mod user;

pub use chat::*;
pub use concern::*;
pub use user::*;

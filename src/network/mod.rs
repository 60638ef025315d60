//! Network module.
//!
//! Contains the Telegram Bot API wire types and the long-poll Gateway.

pub mod api;
mod gateway;

pub use gateway::{ApiError, Gateway};

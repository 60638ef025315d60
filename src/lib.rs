//! iskrad - Iskra anonymous chat daemon.
//!
//! Matches anonymous Telegram users into one-to-one relayed conversations:
//! declare a gender, enter a FIFO wait queue, get paired with the opposite
//! queue's head, and exchange text until either side sends /stop or /next.
//!
//! The concurrency-bearing core is [`state::Matchmaker`]; [`network::Gateway`]
//! is a thin long-poll transport around it.

pub mod config;
pub mod error;
pub mod handlers;
pub mod network;
pub mod replies;
pub mod state;

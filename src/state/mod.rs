//! State management module.
//!
//! Contains the Matchmaker (shared matchmaking state) and related entities.

mod matchmaker;
mod queue;
mod registry;
mod user;

pub use matchmaker::{Matchmaker, Outbound, Prompt};
pub use queue::WaitQueues;
pub use registry::Registry;
pub use user::{ChatId, Gender, Phase, UserState};

//! Unified error handling for iskrad.
//!
//! Session errors are soft and user-recoverable: each one maps to exactly
//! one corrective reply, emitted by the dispatch layer at the point of
//! detection. No session error ever reaches the transport as a failure.

use crate::replies;
use thiserror::Error;

/// Errors a session-controller operation can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no gender chosen")]
    NoGenderChosen,

    #[error("already in a session")]
    AlreadyInSession,

    #[error("not in a session")]
    NotInSession,
}

impl SessionError {
    /// Static error code for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoGenderChosen => "no_gender_chosen",
            Self::AlreadyInSession => "already_in_session",
            Self::NotInSession => "not_in_session",
        }
    }

    /// The corrective reply shown to the requesting user.
    ///
    /// `during_relay` picks the relay-specific wording for [`Self::NotInSession`];
    /// the stop/next wording is used otherwise.
    pub fn reply_text(&self, during_relay: bool) -> &'static str {
        match self {
            Self::NoGenderChosen => replies::NO_GENDER,
            Self::AlreadyInSession => replies::ALREADY_IN_CHAT,
            Self::NotInSession if during_relay => replies::NOT_IN_CHAT_RELAY,
            Self::NotInSession => replies::NOT_IN_CHAT,
        }
    }
}

//! Per-user state.

/// Telegram chat identifier (private chats: equal to the user id).
pub type ChatId = i64;

/// Declared gender of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// The opposite category, used by the matching engine.
    pub fn opposite(self) -> Self {
        match self {
            Self::Male => Self::Female,
            Self::Female => Self::Male,
        }
    }

    /// Human-readable label for user-facing replies.
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "мужской",
            Self::Female => "женский",
        }
    }
}

/// Mutable state for one known user.
///
/// Created on first observed interaction and kept for the process lifetime.
/// The zero state is: no gender declared, no partner, not waiting. All fields
/// are read and written only under the matchmaker lock.
#[derive(Debug, Default)]
pub struct UserState {
    /// Declared gender, `None` until the user picks one.
    pub gender: Option<Gender>,
    /// Current chat partner, `None` outside an active session.
    pub partner: Option<ChatId>,
    /// True while enqueued and unpaired. Never true together with `partner`.
    pub waiting: bool,
}

impl UserState {
    /// Derive the lifecycle phase from the state fields.
    pub fn phase(&self) -> Phase {
        if self.partner.is_some() {
            Phase::Paired
        } else if self.waiting {
            Phase::Waiting
        } else if self.gender.is_some() {
            Phase::Idle
        } else {
            Phase::Unset
        }
    }
}

/// Lifecycle phase of a user, derived from [`UserState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No gender declared yet.
    Unset,
    /// Gender declared, not searching, no partner.
    Idle,
    /// Enqueued, awaiting a match.
    Waiting,
    /// In an active session.
    Paired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_state_is_unset() {
        let state = UserState::default();
        assert_eq!(state.gender, None);
        assert_eq!(state.partner, None);
        assert!(!state.waiting);
        assert_eq!(state.phase(), Phase::Unset);
    }

    #[test]
    fn phase_follows_fields() {
        let mut state = UserState {
            gender: Some(Gender::Male),
            ..Default::default()
        };
        assert_eq!(state.phase(), Phase::Idle);

        state.waiting = true;
        assert_eq!(state.phase(), Phase::Waiting);

        state.waiting = false;
        state.partner = Some(42);
        assert_eq!(state.phase(), Phase::Paired);
    }

    #[test]
    fn opposite_is_involutive() {
        assert_eq!(Gender::Male.opposite(), Gender::Female);
        assert_eq!(Gender::Female.opposite().opposite(), Gender::Female);
    }
}

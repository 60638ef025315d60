//! User registry - identity to state table.

use super::user::{ChatId, UserState};
use std::collections::HashMap;

/// Table of every user the daemon has ever seen, keyed by chat id.
///
/// Entries are created lazily on first contact and never removed. The
/// registry has no lock of its own; the matchmaker guards it together with
/// the wait queues as one critical region.
#[derive(Debug, Default)]
pub struct Registry {
    users: HashMap<ChatId, UserState>,
}

impl Registry {
    /// Look up a user's state, inserting the zero state if absent.
    pub fn get_or_create(&mut self, chat: ChatId) -> &mut UserState {
        self.users.entry(chat).or_default()
    }

    /// Look up a user's state without creating it.
    pub fn get(&self, chat: ChatId) -> Option<&UserState> {
        self.users.get(&chat)
    }

    /// Number of known users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Iterate over all known users.
    pub fn iter(&self) -> impl Iterator<Item = (ChatId, &UserState)> {
        self.users.iter().map(|(id, state)| (*id, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::user::Phase;

    #[test]
    fn creates_zero_state_on_first_contact() {
        let mut registry = Registry::default();
        assert!(registry.get(7).is_none());

        let state = registry.get_or_create(7);
        assert_eq!(state.phase(), Phase::Unset);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn returns_existing_state() {
        let mut registry = Registry::default();
        registry.get_or_create(7).waiting = true;

        assert!(registry.get_or_create(7).waiting);
        assert_eq!(registry.len(), 1);
    }
}

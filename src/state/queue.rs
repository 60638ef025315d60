//! Wait queues - one FIFO list per gender.

use super::user::{ChatId, Gender};
use std::collections::VecDeque;

/// The two ordered wait-lists.
///
/// An identity appears in at most one queue at most once; queue membership
/// mirrors `UserState::waiting`. Guarded by the matchmaker lock.
#[derive(Debug, Default)]
pub struct WaitQueues {
    male: VecDeque<ChatId>,
    female: VecDeque<ChatId>,
}

impl WaitQueues {
    fn queue_mut(&mut self, gender: Gender) -> &mut VecDeque<ChatId> {
        match gender {
            Gender::Male => &mut self.male,
            Gender::Female => &mut self.female,
        }
    }

    fn queue(&self, gender: Gender) -> &VecDeque<ChatId> {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }

    /// Append an identity at the tail. Caller ensures it is not queued yet.
    pub fn enqueue(&mut self, gender: Gender, chat: ChatId) {
        self.queue_mut(gender).push_back(chat);
    }

    /// Remove and return the oldest identity, if any.
    pub fn pop_head(&mut self, gender: Gender) -> Option<ChatId> {
        self.queue_mut(gender).pop_front()
    }

    /// Put an identity back at the head, undoing a premature pop.
    pub fn push_front(&mut self, gender: Gender, chat: ChatId) {
        self.queue_mut(gender).push_front(chat);
    }

    /// Remove an identity from whichever queue holds it, preserving the
    /// relative order of the rest. No-op if absent.
    pub fn remove(&mut self, chat: ChatId) {
        for queue in [&mut self.male, &mut self.female] {
            if let Some(pos) = queue.iter().position(|&id| id == chat) {
                queue.remove(pos);
                return;
            }
        }
    }

    /// Whether an identity is queued anywhere.
    pub fn contains(&self, chat: ChatId) -> bool {
        self.male.contains(&chat) || self.female.contains(&chat)
    }

    /// Number of identities waiting in one queue.
    pub fn len(&self, gender: Gender) -> usize {
        self.queue(gender).len()
    }

    /// Snapshot of one queue, head first. Test introspection.
    pub fn snapshot(&self, gender: Gender) -> Vec<ChatId> {
        self.queue(gender).iter().copied().collect()
    }
}

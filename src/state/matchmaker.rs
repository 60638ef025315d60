//! The Matchmaker - session controller and matching engine.
//!
//! All registry and queue mutation happens inside one mutex-guarded critical
//! region per operation. Every operation returns the batch of outbound
//! notifications it decided on; the caller delivers them after the lock is
//! released, so no transport call ever runs under the lock.

use crate::error::SessionError;
use crate::replies;
use crate::state::queue::WaitQueues;
use crate::state::registry::Registry;
use crate::state::user::{ChatId, Gender, Phase};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// A notification to deliver to one user, computed under the lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub chat: ChatId,
    pub text: String,
    /// Inline keyboard to attach, if any.
    pub prompt: Option<Prompt>,
}

impl Outbound {
    pub fn plain(chat: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat,
            text: text.into(),
            prompt: None,
        }
    }

    pub fn with_prompt(chat: ChatId, text: impl Into<String>, prompt: Prompt) -> Self {
        Self {
            chat,
            text: text.into(),
            prompt: Some(prompt),
        }
    }
}

/// Transport-agnostic inline keyboard selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Two-button gender choice.
    ChooseGender,
    /// One-button "begin search".
    BeginSearch,
}

/// Shared mutable state: the registry plus both wait queues.
#[derive(Debug, Default)]
struct Shared {
    registry: Registry,
    queues: WaitQueues,
}

/// The matchmaking engine.
///
/// One instance per process, shared across all inbound events. A single
/// mutex covers the registry, both queues, and the pairing loop; all work
/// under the lock is non-blocking in-memory mutation.
#[derive(Debug, Default)]
pub struct Matchmaker {
    inner: Mutex<Shared>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a registry entry exists for this user. Called for every
    /// inbound event before dispatch.
    pub fn touch(&self, chat: ChatId) {
        self.inner.lock().registry.get_or_create(chat);
    }

    /// Declare the user's gender. Always succeeds; the reply prompts the
    /// user to begin searching.
    pub fn choose_gender(&self, chat: ChatId, gender: Gender) -> Vec<Outbound> {
        {
            let mut shared = self.inner.lock();
            shared.registry.get_or_create(chat).gender = Some(gender);
        }
        debug!(chat, ?gender, "gender declared");
        vec![Outbound::with_prompt(
            chat,
            replies::gender_chosen(gender),
            Prompt::BeginSearch,
        )]
    }

    /// Enter the wait queue and run the matching engine.
    ///
    /// An already-waiting caller keeps its queue position and just gets the
    /// searching reply again.
    pub fn start_search(&self, chat: ChatId) -> Result<Vec<Outbound>, SessionError> {
        let mut out = Vec::new();
        {
            let mut guard = self.inner.lock();
            let shared = &mut *guard;
            let state = shared.registry.get_or_create(chat);
            let gender = state.gender.ok_or(SessionError::NoGenderChosen)?;
            if state.partner.is_some() {
                return Err(SessionError::AlreadyInSession);
            }
            if !state.waiting {
                state.waiting = true;
                shared.queues.enqueue(gender, chat);
                debug!(chat, ?gender, "enqueued");
            }
            out.push(Outbound::plain(chat, replies::SEARCHING));
            Self::match_waiting(shared, &mut out);
        }
        Ok(out)
    }

    /// Terminate the caller's session, returning both sides to idle.
    ///
    /// The initiator and the partner get distinct wording.
    pub fn end_session(&self, chat: ChatId) -> Result<Vec<Outbound>, SessionError> {
        let partner = {
            let mut guard = self.inner.lock();
            let shared = &mut *guard;
            let state = shared.registry.get_or_create(chat);
            let partner = state.partner.take().ok_or(SessionError::NotInSession)?;
            shared.registry.get_or_create(partner).partner = None;
            // Consistency guard: paired users are never queued, but a stale
            // entry must not survive the session.
            shared.queues.remove(chat);
            shared.queues.remove(partner);
            partner
        };
        info!(chat, partner, "session ended");
        Ok(vec![
            Outbound::plain(chat, replies::STOP_INITIATOR),
            Outbound::plain(partner, replies::STOP_PARTNER),
        ])
    }

    /// Leave the current session, if any, then search again.
    ///
    /// The internal end-session error is swallowed: a never-paired caller
    /// gets no termination notice, only the searching flow.
    pub fn next_partner(&self, chat: ChatId) -> Result<Vec<Outbound>, SessionError> {
        let mut out = self.end_session(chat).unwrap_or_default();
        // end_session can only have succeeded for a paired user, and paired
        // users always have a gender, so start_search cannot fail after a
        // successful end: an Err here implies `out` is empty.
        out.extend(self.start_search(chat)?);
        Ok(out)
    }

    /// Forward a text message to the caller's partner, verbatim.
    pub fn relay(&self, chat: ChatId, text: &str) -> Result<Vec<Outbound>, SessionError> {
        let partner = self
            .inner
            .lock()
            .registry
            .get_or_create(chat)
            .partner
            .ok_or(SessionError::NotInSession)?;
        Ok(vec![Outbound::plain(partner, text)])
    }

    /// Pair opposite-gender queue heads until one queue runs dry.
    ///
    /// Safe to call after any enqueue; redundant calls are no-ops.
    fn match_waiting(shared: &mut Shared, out: &mut Vec<Outbound>) {
        loop {
            let Some(male) = Self::next_unpaired(shared, Gender::Male) else {
                break;
            };
            let Some(female) = Self::next_unpaired(shared, Gender::Female) else {
                shared.queues.push_front(Gender::Male, male);
                break;
            };
            Self::link_pair(shared, male, female, out);
        }
    }

    /// Pop queue heads until one that is not already paired turns up.
    /// A paired head is a broken invariant; it is dropped, not re-paired.
    fn next_unpaired(shared: &mut Shared, gender: Gender) -> Option<ChatId> {
        while let Some(chat) = shared.queues.pop_head(gender) {
            match shared.registry.get(chat) {
                Some(state) if state.partner.is_none() => return Some(chat),
                _ => warn!(chat, ?gender, "dropping already-paired queue head"),
            }
        }
        None
    }

    /// The single routine that writes both sides of the partner relation.
    fn link_pair(shared: &mut Shared, a: ChatId, b: ChatId, out: &mut Vec<Outbound>) {
        for (chat, partner) in [(a, b), (b, a)] {
            let state = shared.registry.get_or_create(chat);
            state.partner = Some(partner);
            state.waiting = false;
        }
        info!(user_a = a, user_b = b, "matched");
        out.push(Outbound::plain(a, replies::MATCHED));
        out.push(Outbound::plain(b, replies::MATCHED));
    }

    // ------------------------------------------------------------------
    // Introspection (tests, diagnostics)
    // ------------------------------------------------------------------

    /// Lifecycle phase of a user, or `None` if never seen.
    pub fn phase_of(&self, chat: ChatId) -> Option<Phase> {
        self.inner.lock().registry.get(chat).map(|s| s.phase())
    }

    /// Current partner of a user, if paired.
    pub fn partner_of(&self, chat: ChatId) -> Option<ChatId> {
        self.inner.lock().registry.get(chat).and_then(|s| s.partner)
    }

    /// Snapshot of one wait queue, head first.
    pub fn queue(&self, gender: Gender) -> Vec<ChatId> {
        self.inner.lock().queues.snapshot(gender)
    }

    /// Verify the cross-structure invariants for every known user.
    ///
    /// Waiting excludes paired, partner links are symmetric, and queue
    /// membership matches the waiting flag with no duplicates.
    pub fn invariants_hold(&self) -> bool {
        let shared = self.inner.lock();
        let mut queued: Vec<ChatId> = shared.queues.snapshot(Gender::Male);
        queued.extend(shared.queues.snapshot(Gender::Female));
        let unique = {
            let mut sorted = queued.clone();
            sorted.sort_unstable();
            sorted.dedup();
            sorted.len() == queued.len()
        };
        unique
            && shared.registry.iter().all(|(chat, state)| {
                let exclusive = !(state.waiting && state.partner.is_some());
                let symmetric = state.partner.is_none_or(|p| {
                    shared.registry.get(p).and_then(|s| s.partner) == Some(chat)
                });
                let queue_matches = queued.contains(&chat) == state.waiting;
                exclusive && symmetric && queue_matches
            })
    }
}

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::debug;

use crate::core::{AppError, Result};
use crate::modules::assistant::models::{ChatMessage, ConversationState, PendingEntry};

/// Transcript turns kept per session and sent as extraction context
pub const MAX_TRANSCRIPT_TURNS: usize = 40;

/// Everything the assistant remembers about one session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: ConversationState,
    pub transcript: Vec<ChatMessage>,
    pub pending_entries: Vec<PendingEntry>,
}

impl SessionSnapshot {
    pub fn push_turn(&mut self, message: ChatMessage) {
        self.transcript.push(message);
        if self.transcript.len() > MAX_TRANSCRIPT_TURNS {
            let excess = self.transcript.len() - MAX_TRANSCRIPT_TURNS;
            self.transcript.drain(..excess);
        }
    }

    /// Remove and return the pending entry with `id`
    pub fn take_pending(&mut self, id: &str) -> Option<PendingEntry> {
        let index = self.pending_entries.iter().position(|p| p.id == id)?;
        Some(self.pending_entries.remove(index))
    }
}

#[derive(Debug, Default)]
struct SessionSlot {
    snapshot: SessionSnapshot,
    busy: bool,
}

/// Per-session conversation slots shared by all workers
///
/// A session is checked out with `begin`, which hands back a
/// `SessionCheckout`. While it is out the session is busy and every other
/// `begin`, `abandon` or `remove` on it fails with `Conflict`. Finishing the
/// checkout writes the snapshot back; dropping it any other way (early
/// return, cancelled request, panic) gives the session back unchanged.
/// The lock is only held for the map operation itself, never across an
/// `.await`.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionSlot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, SessionSlot>> {
        // slots stay consistent even if a holder panicked
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check out a session, creating it on first use
    pub fn begin(&self, session_id: &str) -> Result<SessionCheckout<'_>> {
        let mut sessions = self.slots();
        let slot = sessions.entry(session_id.to_string()).or_default();
        if slot.busy {
            return Err(busy(session_id));
        }
        slot.busy = true;
        Ok(SessionCheckout {
            store: self,
            session_id: session_id.to_string(),
            snapshot: slot.snapshot.clone(),
            returned: false,
        })
    }

    fn check_in(&self, session_id: &str, snapshot: Option<SessionSnapshot>) {
        let mut sessions = self.slots();
        let slot = sessions.entry(session_id.to_string()).or_default();
        if let Some(snapshot) = snapshot {
            debug!(session_id = %session_id, state = snapshot.state.name(), "Session updated");
            slot.snapshot = snapshot;
        }
        slot.busy = false;
    }

    /// Drop any closing in progress and all pending entries
    pub fn abandon(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.slots();
        let Some(slot) = sessions.get_mut(session_id) else {
            return Ok(());
        };
        if slot.busy {
            return Err(busy(session_id));
        }
        slot.snapshot.state = ConversationState::Idle;
        slot.snapshot.pending_entries.clear();
        Ok(())
    }

    /// Forget the session entirely; returns false if it did not exist
    pub fn remove(&self, session_id: &str) -> Result<bool> {
        let mut sessions = self.slots();
        match sessions.get(session_id) {
            None => Ok(false),
            Some(slot) if slot.busy => Err(busy(session_id)),
            Some(_) => {
                sessions.remove(session_id);
                Ok(true)
            }
        }
    }

    /// Read-only copy of a session, if it exists
    pub fn view(&self, session_id: &str) -> Option<SessionSnapshot> {
        self.slots()
            .get(session_id)
            .map(|slot| slot.snapshot.clone())
    }
}

fn busy(session_id: &str) -> AppError {
    AppError::conflict(format!(
        "Session '{}' is still processing the previous message",
        session_id
    ))
}

/// A session checked out of the `SessionStore`
///
/// Derefs to the working copy of the snapshot.
#[derive(Debug)]
pub struct SessionCheckout<'a> {
    store: &'a SessionStore,
    session_id: String,
    snapshot: SessionSnapshot,
    returned: bool,
}

impl SessionCheckout<'_> {
    /// Write the working copy back, replacing what was stored
    pub fn finish(mut self) {
        let snapshot = std::mem::take(&mut self.snapshot);
        self.store.check_in(&self.session_id, Some(snapshot));
        self.returned = true;
    }

    /// Give the session back unchanged
    pub fn release(self) {}
}

impl Deref for SessionCheckout<'_> {
    type Target = SessionSnapshot;

    fn deref(&self) -> &SessionSnapshot {
        &self.snapshot
    }
}

impl DerefMut for SessionCheckout<'_> {
    fn deref_mut(&mut self) -> &mut SessionSnapshot {
        &mut self.snapshot
    }
}

impl Drop for SessionCheckout<'_> {
    fn drop(&mut self) {
        if !self.returned {
            debug!(session_id = %self.session_id, "Session released unchanged");
            self.store.check_in(&self.session_id, None);
        }
    }
}

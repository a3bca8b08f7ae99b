use crate::{RngState, Supply};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session '{0}' already exists")]
    DuplicateSession(String),
    #[error("unknown session '{0}'")]
    UnknownSession(String),
}

/// One shared supply plus its own randomness stream. Draws in one session
/// never disturb another session's sequence.
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub supply: Supply,
    pub rng: RngState,
}

/// Explicit registry of live sessions. Callers own the registry and its
/// lifetime; there is no ambient process-wide map behind it.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        id: impl Into<String>,
        supply: Supply,
        seed: u64,
    ) -> Result<&mut Session, SessionError> {
        match self.sessions.entry(id.into()) {
            Entry::Occupied(slot) => Err(SessionError::DuplicateSession(slot.key().clone())),
            Entry::Vacant(slot) => {
                let session = Session {
                    id: slot.key().clone(),
                    supply,
                    rng: RngState::from_seed(seed),
                };
                Ok(slot.insert(session))
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    /// Remove a session, returning it so the caller can tear down whatever
    /// hangs off it.
    pub fn dispose(&mut self, id: &str) -> Result<Session, SessionError> {
        self.sessions
            .remove(id)
            .ok_or_else(|| SessionError::UnknownSession(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sessions.keys().map(|id| id.as_str()).collect();
        ids.sort_unstable();
        ids
    }
}

use std::{collections::HashMap, sync::Mutex};

use crate::{
    session::{SessionStore, SessionStoreError, invalid_id},
    types::Session,
};

/// Map-backed store for tests and embedding; same contract as the file
/// store minus durability.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, prospect_id: &str) -> Option<Session> {
        let sessions = match self.sessions.lock() {
            Ok(sessions) => sessions,
            Err(_) => return None,
        };
        sessions.get(prospect_id).cloned()
    }

    fn save(&self, prospect_id: &str, session: &Session) -> Result<(), SessionStoreError> {
        if prospect_id.trim().is_empty() {
            return Err(invalid_id("prospect id cannot be empty"));
        }
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| crate::session::write_failure("session map mutex poisoned"))?;
        sessions.insert(prospect_id.to_string(), session.clone());
        Ok(())
    }
}

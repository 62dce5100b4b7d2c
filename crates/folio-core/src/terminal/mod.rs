//! Simulated terminal: session store, lifecycle and line submission.
//!
//! Sessions are independent; the only shared piece of state is the id
//! counter, which only moves forward so a closed session's id is never handed
//! out again.

pub mod command;
pub mod history;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use self::command::CommandOutcome;
use self::command::SessionEffect;
use self::command::SessionView;

pub const HOME_MARKER: &str = "~";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TerminalError {
    #[error("session limit reached ({max} terminals open)")]
    SessionLimit { max: usize },
}

/// User and host shown in prompts and reported by `whoami`/`pwd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptIdentity {
    pub user: String,
    pub host: String,
}

impl Default for PromptIdentity {
    fn default() -> Self {
        Self {
            user: "visitor".to_string(),
            host: "portfolio".to_string(),
        }
    }
}

impl PromptIdentity {
    pub fn prompt(&self, cwd: &str) -> String {
        format!("{}@{}:{}$ ", self.user, self.host, cwd)
    }

    pub fn marker(&self) -> String {
        format!("{}@", self.user)
    }

    pub fn root(&self) -> String {
        format!("/home/{}/portfolio", self.user)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    pub cwd: String,
    pub history: Vec<String>,
    pub pending_input: String,
}

impl Session {
    fn new(id: SessionId, identity: &PromptIdentity) -> Self {
        Self {
            id,
            name: format!("Terminal {}", id.0),
            cwd: HOME_MARKER.to_string(),
            history: vec![identity.prompt(HOME_MARKER)],
            pending_input: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TerminalState {
    sessions: Vec<Session>,
    active: Option<SessionId>,
    next_id: u64,
    max_sessions: Option<usize>,
    identity: PromptIdentity,
}

impl Default for TerminalState {
    fn default() -> Self {
        Self::new(PromptIdentity::default(), None)
    }
}

impl TerminalState {
    pub fn new(identity: PromptIdentity, max_sessions: Option<usize>) -> Self {
        Self {
            sessions: Vec::new(),
            active: None,
            next_id: 1,
            max_sessions,
            identity,
        }
    }

    /// Store holding one session whose history shows a finished site build.
    pub fn with_welcome_session(identity: PromptIdentity, max_sessions: Option<usize>) -> Self {
        let mut state = Self::new(identity, max_sessions);
        if let Ok(id) = state.create_session() {
            let prompt = state.identity.prompt(HOME_MARKER);
            if let Some(session) = state.session_mut(id) {
                session.history = vec![
                    format!("{prompt}npm run build"),
                    "> building site...".to_string(),
                    "> collecting portfolio data...".to_string(),
                    "> initializing assistant...".to_string(),
                    "DONE compiled successfully in 1240ms".to_string(),
                    prompt,
                ];
            }
        }
        state
    }

    pub fn identity(&self) -> &PromptIdentity {
        &self.identity
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.active
    }

    pub fn active(&self) -> Option<&Session> {
        self.active.and_then(|id| self.session(id))
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|session| session.id == id)
    }

    fn session_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|session| session.id == id)
    }

    fn active_mut(&mut self) -> Option<&mut Session> {
        let id = self.active?;
        self.session_mut(id)
    }

    /// The single creation path for sessions.
    pub fn create_session(&mut self) -> Result<SessionId, TerminalError> {
        if let Some(max) = self.max_sessions {
            if self.sessions.len() >= max {
                tracing::warn!(max, "terminal session limit reached");
                return Err(TerminalError::SessionLimit { max });
            }
        }
        let id = SessionId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.sessions.push(Session::new(id, &self.identity));
        self.active = Some(id);
        tracing::debug!(session = %id, "terminal session created");
        Ok(id)
    }

    /// Removes a session. Returns `false` when the id is unknown.
    pub fn close_session(&mut self, id: SessionId) -> bool {
        let Some(idx) = self.sessions.iter().position(|session| session.id == id) else {
            return false;
        };
        self.sessions.remove(idx);
        if self.active == Some(id) {
            self.active = self.sessions.first().map(|session| session.id);
        }
        tracing::debug!(session = %id, remaining = self.sessions.len(), "terminal session closed");
        true
    }

    pub fn close_active(&mut self) -> bool {
        match self.active {
            Some(id) => self.close_session(id),
            None => false,
        }
    }

    pub fn select_session(&mut self, id: SessionId) -> bool {
        if self.session(id).is_some() {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    pub fn next_session(&mut self) {
        self.cycle(1);
    }

    pub fn prev_session(&mut self) {
        self.cycle(-1);
    }

    fn cycle(&mut self, step: isize) {
        let len = self.sessions.len();
        if len == 0 {
            return;
        }
        let current = self
            .active
            .and_then(|id| self.sessions.iter().position(|session| session.id == id))
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(len as isize) as usize;
        self.active = Some(self.sessions[next].id);
    }

    pub fn push_input(&mut self, ch: char) {
        if let Some(session) = self.active_mut() {
            session.pending_input.push(ch);
        }
    }

    pub fn push_input_str(&mut self, text: &str) {
        if let Some(session) = self.active_mut() {
            session.pending_input.push_str(text);
        }
    }

    pub fn pop_input(&mut self) {
        if let Some(session) = self.active_mut() {
            session.pending_input.pop();
        }
    }

    /// Submits the active session's pending input.
    pub fn submit_active(&mut self) -> Option<CommandOutcome> {
        let id = self.active?;
        let line = self.session(id)?.pending_input.clone();
        let outcome = self.run_line(id, &line)?;
        if let Some(session) = self.session_mut(id) {
            session.pending_input.clear();
        }
        Some(outcome)
    }

    /// Runs one line in the given session and records it in its history.
    ///
    /// Blank lines return `None` and leave the session untouched.
    pub fn run_line(&mut self, id: SessionId, raw: &str) -> Option<CommandOutcome> {
        let identity = self.identity.clone();
        let session = self.session_mut(id)?;
        let outcome = command::execute(
            SessionView {
                cwd: &session.cwd,
                identity: &identity,
            },
            raw,
        )?;

        if outcome.effect == Some(SessionEffect::ClearHistory) {
            session.history = vec![identity.prompt(&session.cwd)];
            return Some(outcome);
        }

        let echoed = format!("{}{}", identity.prompt(&session.cwd), raw.trim());
        match session.history.last_mut() {
            Some(last) if last.starts_with(&identity.marker()) => *last = echoed,
            _ => session.history.push(echoed),
        }

        if let Some(SessionEffect::ChangeDirectory(next)) = &outcome.effect {
            session.cwd = next.clone();
        }
        if let Some(output) = &outcome.output {
            session.history.push(output.clone());
        }
        session.history.push(identity.prompt(&session.cwd));
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> TerminalState {
        TerminalState::default()
    }

    #[test]
    fn created_ids_strictly_increase() {
        let mut state = store();
        let ids: Vec<u64> = (0..5)
            .map(|_| state.create_session().expect("create").0)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(state.active_id(), Some(SessionId(5)));
    }

    #[test]
    fn ids_are_not_reused_after_close() {
        let mut state = store();
        let first = state.create_session().expect("create");
        let second = state.create_session().expect("create");
        assert!(state.close_session(first));
        let third = state.create_session().expect("create");
        assert_ne!(third, second);
        assert_eq!(third, SessionId(3));
        assert_eq!(state.session(third).map(|s| s.name.as_str()), Some("Terminal 3"));
    }

    #[test]
    fn closing_active_activates_first_remaining() {
        let mut state = store();
        let a = state.create_session().expect("create");
        let _b = state.create_session().expect("create");
        let c = state.create_session().expect("create");
        assert_eq!(state.active_id(), Some(c));
        assert!(state.close_session(c));
        assert_eq!(state.active_id(), Some(a));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn closing_inactive_keeps_selection() {
        let mut state = store();
        let a = state.create_session().expect("create");
        let b = state.create_session().expect("create");
        assert!(state.close_session(a));
        assert_eq!(state.active_id(), Some(b));
    }

    #[test]
    fn closing_last_session_leaves_empty_state() {
        let mut state = store();
        let a = state.create_session().expect("create");
        assert!(state.close_session(a));
        assert!(state.is_empty());
        assert_eq!(state.active_id(), None);
        assert!(state.active().is_none());
    }

    #[test]
    fn closing_unknown_id_is_a_no_op() {
        let mut state = store();
        let a = state.create_session().expect("create");
        assert!(!state.close_session(SessionId(99)));
        assert_eq!(state.active_id(), Some(a));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn session_limit_rejects_creation() {
        let mut state = TerminalState::new(PromptIdentity::default(), Some(2));
        state.create_session().expect("create");
        state.create_session().expect("create");
        assert_eq!(
            state.create_session(),
            Err(TerminalError::SessionLimit { max: 2 })
        );
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn new_session_history_is_a_single_prompt() {
        let mut state = store();
        let id = state.create_session().expect("create");
        let session = state.session(id).expect("session");
        assert_eq!(session.history, vec!["visitor@portfolio:~$ ".to_string()]);
        assert_eq!(session.cwd, "~");
    }

    #[test]
    fn submit_appends_echo_output_and_prompt() {
        let mut state = store();
        state.create_session().expect("create");
        state.push_input_str("echo hello world");
        state.submit_active().expect("outcome");

        let session = state.active().expect("active");
        assert_eq!(
            session.history,
            vec![
                "visitor@portfolio:~$ echo hello world".to_string(),
                "hello world".to_string(),
                "visitor@portfolio:~$ ".to_string(),
            ]
        );
        assert!(session.pending_input.is_empty());
    }

    #[test]
    fn blank_submit_changes_nothing() {
        let mut state = store();
        state.create_session().expect("create");
        state.push_input_str("   ");
        let before = state.active().cloned().expect("active");
        assert!(state.submit_active().is_none());
        let after = state.active().expect("active");
        assert_eq!(after.history, before.history);
        assert_eq!(after.cwd, before.cwd);
    }

    #[test]
    fn clear_collapses_history_to_one_line() {
        let mut state = store();
        let id = state.create_session().expect("create");
        state.run_line(id, "ls");
        state.run_line(id, "whoami");
        state.run_line(id, "clear");
        assert_eq!(state.session(id).map(|s| s.history.len()), Some(1));
    }

    #[test]
    fn cd_updates_cwd_and_prompt() {
        let mut state = store();
        let id = state.create_session().expect("create");
        state.run_line(id, "cd projects");
        let session = state.session(id).expect("session");
        assert_eq!(session.cwd, "projects");
        assert_eq!(
            session.history.last().map(String::as_str),
            Some("visitor@portfolio:projects$ ")
        );

        state.run_line(id, "cd ..");
        assert_eq!(state.session(id).map(|s| s.cwd.as_str()), Some("~"));
        state.run_line(id, "cd ..");
        assert_eq!(state.session(id).map(|s| s.cwd.as_str()), Some("~"));
    }

    #[test]
    fn sessions_are_isolated() {
        let mut state = store();
        let a = state.create_session().expect("create");
        let b = state.create_session().expect("create");
        state.run_line(a, "cd docs");
        assert_eq!(state.session(b).map(|s| s.cwd.as_str()), Some("~"));
        assert_eq!(state.session(b).map(|s| s.history.len()), Some(1));
    }

    #[test]
    fn cycling_wraps_around() {
        let mut state = store();
        let a = state.create_session().expect("create");
        let b = state.create_session().expect("create");
        state.next_session();
        assert_eq!(state.active_id(), Some(a));
        state.prev_session();
        assert_eq!(state.active_id(), Some(b));
    }

    #[test]
    fn welcome_session_ends_with_prompt() {
        let state = TerminalState::with_welcome_session(PromptIdentity::default(), None);
        let session = state.active().expect("active");
        assert_eq!(session.id, SessionId(1));
        assert_eq!(
            session.history.last().map(String::as_str),
            Some("visitor@portfolio:~$ ")
        );
    }
}

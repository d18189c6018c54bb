//! Per-session page state: Login, Landing, Analysis.
//!
//! The authenticated identity lives inside the stage, so a session can only be
//! on the landing or analysis page while someone is logged in.

use crate::types::Label;
use serde::Serialize;
use std::fmt;
use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Login,
    Landing,
    Analysis,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Page::Login => "login",
            Page::Landing => "landing",
            Page::Analysis => "analysis",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Login,
    Landing { user: String },
    Analysis { user: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Start,
    Record,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Login => "login",
            Action::Start => "start",
            Action::Record => "analyze",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[error("cannot {action} from the {from} page")]
pub struct TransitionError {
    pub from: Page,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    stage: Stage,
    /// Labels produced in this session only; never persisted.
    history: Vec<Label>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            stage: Stage::Login,
            history: Vec::new(),
        }
    }

    pub fn page(&self) -> Page {
        match self.stage {
            Stage::Login => Page::Login,
            Stage::Landing { .. } => Page::Landing,
            Stage::Analysis { .. } => Page::Analysis,
        }
    }

    pub fn logged_in(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn current_user(&self) -> Option<&str> {
        match &self.stage {
            Stage::Login => None,
            Stage::Landing { user } | Stage::Analysis { user } => Some(user),
        }
    }

    pub fn history(&self) -> &[Label] {
        &self.history
    }

    /// Login -> Landing. Call only after the credentials have been verified.
    pub fn authenticated(&mut self, username: impl Into<String>) -> Result<(), TransitionError> {
        match self.stage {
            Stage::Login => {
                self.stage = Stage::Landing {
                    user: username.into(),
                };
                Ok(())
            }
            _ => Err(self.reject(Action::Login)),
        }
    }

    /// Landing -> Analysis.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        match std::mem::replace(&mut self.stage, Stage::Login) {
            Stage::Landing { user } => {
                self.stage = Stage::Analysis { user };
                Ok(())
            }
            other => {
                self.stage = other;
                Err(self.reject(Action::Start))
            }
        }
    }

    /// Landing | Analysis -> Login, abandoning the session history.
    /// Already on the login page this changes nothing.
    pub fn logout(&mut self) {
        self.stage = Stage::Login;
        self.history.clear();
    }

    /// Append a label produced on the analysis page.
    pub fn record(&mut self, label: Label) -> Result<(), TransitionError> {
        match self.stage {
            Stage::Analysis { .. } => {
                self.history.push(label);
                Ok(())
            }
            _ => Err(self.reject(Action::Record)),
        }
    }

    /// The analysing user, if this session is on the analysis page.
    pub fn analyst(&self) -> Result<&str, TransitionError> {
        match &self.stage {
            Stage::Analysis { user } => Ok(user),
            _ => Err(self.reject(Action::Record)),
        }
    }

    fn reject(&self, action: Action) -> TransitionError {
        TransitionError {
            from: self.page(),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_logged_out_on_login() {
        let s = SessionState::new();
        assert_eq!(s.page(), Page::Login);
        assert!(!s.logged_in());
        assert_eq!(s.current_user(), None);
        assert!(s.history().is_empty());
    }

    #[test]
    fn analysis_is_reached_only_through_landing() {
        let mut s = SessionState::new();
        assert_eq!(
            s.start(),
            Err(TransitionError {
                from: Page::Login,
                action: Action::Start
            })
        );
        assert_eq!(s.page(), Page::Login);

        s.authenticated("Alice1").unwrap();
        assert_eq!(s.page(), Page::Landing);
        assert_eq!(s.current_user(), Some("Alice1"));

        s.start().unwrap();
        assert_eq!(s.page(), Page::Analysis);
        assert_eq!(s.current_user(), Some("Alice1"));
    }

    #[test]
    fn rejected_transitions_leave_state_unchanged() {
        let mut s = SessionState::new();
        s.authenticated("bob").unwrap();
        let before = s.clone();

        assert!(s.authenticated("mallory").is_err());
        assert!(s.record(Label::Positive).is_err());
        assert_eq!(s, before);

        s.start().unwrap();
        let before = s.clone();
        assert!(s.start().is_err());
        assert_eq!(s, before);
    }

    #[test]
    fn logout_clears_identity_and_history_from_any_post_login_page() {
        let mut s = SessionState::new();
        s.authenticated("bob").unwrap();
        s.logout();
        assert_eq!(s.page(), Page::Login);
        assert_eq!(s.current_user(), None);

        s.authenticated("bob").unwrap();
        s.start().unwrap();
        s.record(Label::Negative).unwrap();
        s.record(Label::Positive).unwrap();
        assert_eq!(s.history(), &[Label::Negative, Label::Positive]);

        s.logout();
        assert_eq!(s.page(), Page::Login);
        assert!(!s.logged_in());
        assert!(s.history().is_empty());

        s.logout();
        assert_eq!(s, SessionState::new());
    }

    #[test]
    fn analyst_requires_the_analysis_page() {
        let mut s = SessionState::new();
        assert!(s.analyst().is_err());
        s.authenticated("carol").unwrap();
        assert!(s.analyst().is_err());
        s.start().unwrap();
        assert_eq!(s.analyst(), Ok("carol"));
    }
}

//! Watches authentication and shuts edit mode down when a session ends.

use crate::edit_mode::EditModeState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Edit action attempted while signed out
    SignInRequired,
    /// Authentication dropped while editing
    SessionExpired,
}

/// User-facing message raised by the edit session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionNotice {
    pub kind: NoticeKind,
    pub message: String,
}

impl SessionNotice {
    pub fn sign_in_required() -> Self {
        Self {
            kind: NoticeKind::SignInRequired,
            message: "Sign in to edit this page.".to_string(),
        }
    }

    pub fn session_expired() -> Self {
        Self {
            kind: NoticeKind::SessionExpired,
            message: "Your session has expired. Edit mode has been turned off.".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct AuthSupervisor {
    was_authenticated: bool,
}

impl AuthSupervisor {
    pub fn new(authenticated: bool) -> Self {
        Self {
            was_authenticated: authenticated,
        }
    }

    /// Feed the latest authentication flag.
    ///
    /// On a true → false transition with edit mode on, disables it and
    /// returns the expiry notice. Repeated `false` observations do nothing.
    pub fn observe(&mut self, authenticated: bool, mode: &mut EditModeState) -> Option<SessionNotice> {
        let dropped = self.was_authenticated && !authenticated;
        self.was_authenticated = authenticated;
        mode.set_authenticated(authenticated);

        if dropped && mode.is_edit_mode() {
            tracing::warn!("authentication lost during edit mode, disabling");
            mode.disable();
            return Some(SessionNotice::session_expired());
        }
        None
    }
}

//! # Edit Mode
//!
//! Edit mode lives entirely in two query flags, `edit` and `panel`, so it
//! survives reloads and can be shared as a link. It is not private.
//!
//! `can_edit` holds exactly when the user is authenticated and `edit` is
//! set. `panel=true` implies `edit=true`.

use crate::errors::{EditorError, Result};
use url::Url;

pub const EDIT_FLAG: &str = "edit";
pub const PANEL_FLAG: &str = "panel";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationFlags {
    pub edit: bool,
    pub panel: bool,
}

impl NavigationFlags {
    pub fn from_url(url: &Url) -> Self {
        let mut flags = Self::default();
        for (key, value) in url.query_pairs() {
            match &*key {
                EDIT_FLAG => flags.edit = value == "true",
                PANEL_FLAG => flags.panel = value == "true",
                _ => {}
            }
        }
        if flags.panel {
            flags.edit = true;
        }
        flags
    }

    /// Copy of `url` carrying these flags; unrelated query pairs are kept
    pub fn apply_to(&self, url: &Url) -> Url {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != EDIT_FLAG && key != PANEL_FLAG)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut next = url.clone();
        next.set_query(None);
        if kept.is_empty() && !self.edit && !self.panel {
            return next;
        }

        {
            let mut pairs = next.query_pairs_mut();
            for (key, value) in &kept {
                pairs.append_pair(key, value);
            }
            if self.edit || self.panel {
                pairs.append_pair(EDIT_FLAG, "true");
            }
            if self.panel {
                pairs.append_pair(PANEL_FLAG, "true");
            }
        }
        next
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditModeState {
    flags: NavigationFlags,
    authenticated: bool,
}

impl EditModeState {
    pub fn new(flags: NavigationFlags, authenticated: bool) -> Self {
        Self {
            flags,
            authenticated,
        }
    }

    pub fn from_url(url: &Url, authenticated: bool) -> Self {
        Self::new(NavigationFlags::from_url(url), authenticated)
    }

    pub fn flags(&self) -> NavigationFlags {
        self.flags
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn is_edit_mode(&self) -> bool {
        self.flags.edit
    }

    pub fn is_panel_open(&self) -> bool {
        self.flags.panel
    }

    pub fn can_edit(&self) -> bool {
        self.authenticated && self.flags.edit
    }

    /// Requires authentication; otherwise nothing changes
    pub fn enable(&mut self) -> Result<()> {
        if !self.authenticated {
            tracing::info!("edit mode requested without authentication");
            return Err(EditorError::AuthenticationRequired);
        }
        self.flags.edit = true;
        Ok(())
    }

    /// Always succeeds, idempotent
    pub fn disable(&mut self) {
        self.flags = NavigationFlags::default();
    }

    /// Returns whether edit mode is on afterwards
    pub fn toggle(&mut self) -> Result<bool> {
        if self.flags.edit {
            self.disable();
        } else {
            self.enable()?;
        }
        Ok(self.flags.edit)
    }

    pub fn open_panel(&mut self) -> Result<()> {
        self.enable()?;
        self.flags.panel = true;
        Ok(())
    }

    pub fn close_panel(&mut self) {
        self.flags.panel = false;
    }

    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
    }

    pub fn to_url(&self, base: &Url) -> Url {
        self.flags.apply_to(base)
    }
}

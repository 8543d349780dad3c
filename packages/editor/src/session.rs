//! # Live Edit Session
//!
//! One page view's worth of live-edit state: the rendered tree, the element
//! registry, the single active editor, edit mode and the indicators raised
//! by in-flight writes.
//!
//! Nothing here is shared across sessions. Disabling edit mode or navigating
//! tears the local state down; writes already handed to the store keep
//! running and still report back through the indicator feed.

use crate::edit_mode::{EditModeState, NavigationFlags};
use crate::errors::Result;
use crate::indicator::{Indicator, IndicatorFeed};
use crate::lifecycle::{CommitOutcome, EditorLifecycle, EditorPhase, InlineEditor, Key};
use crate::marker::{MARKER_ATTR, MARKER_PAGE_ATTR, MARKER_TYPE_ATTR};
use crate::rescan::Rescan;
use crate::scanner::ElementRegistry;
use crate::supervisor::{AuthSupervisor, SessionNotice};
use campus_content::ContentStore;
use campus_dom::{DomTree, MutationObserver, NodeId, ObserveOptions};
use std::sync::Arc;
use url::Url;

pub const DEFAULT_PAGE: &str = "home";

/// Page name for a URL: the first path segment, `home` for the root
pub fn page_for_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.find(|s| !s.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_PAGE.to_string())
}

pub struct LiveEdit {
    dom: DomTree,
    registry: ElementRegistry,
    lifecycle: EditorLifecycle,
    mode: EditModeState,
    supervisor: AuthSupervisor,
    indicators: IndicatorFeed,
    notices: Vec<SessionNotice>,
    url: Url,
    page: String,
}

impl LiveEdit {
    pub fn new(dom: DomTree, store: Arc<dyn ContentStore>, url: Url, authenticated: bool) -> Self {
        let indicators = IndicatorFeed::new();
        let lifecycle = EditorLifecycle::new(store, indicators.sender());
        let mut session = Self {
            dom,
            registry: ElementRegistry::new(),
            lifecycle,
            mode: EditModeState::from_url(&url, authenticated),
            supervisor: AuthSupervisor::new(authenticated),
            indicators,
            notices: Vec::new(),
            page: page_for_url(&url),
            url,
        };
        session.rescan();
        session
    }

    // ------------------------------------------------------------------
    // Navigation and authentication
    // ------------------------------------------------------------------

    /// Follow a link. Local editor state is torn down; edit mode follows the
    /// new URL's flags.
    pub fn navigate(&mut self, url: Url) {
        self.teardown();
        self.mode = EditModeState::new(NavigationFlags::from_url(&url), self.mode.is_authenticated());
        self.page = page_for_url(&url);
        self.url = url;
        tracing::debug!(url = %self.url, page = %self.page, "navigated");
        self.rescan();
    }

    pub fn set_authenticated(&mut self, authenticated: bool) {
        if let Some(notice) = self.supervisor.observe(authenticated, &mut self.mode) {
            self.teardown();
            self.url = self.mode.to_url(&self.url);
            self.notices.push(notice);
            return;
        }
        self.rescan();
    }

    // ------------------------------------------------------------------
    // Edit mode
    // ------------------------------------------------------------------

    /// Returns the URL carrying the new state
    pub fn enable_edit_mode(&mut self) -> Result<Url> {
        if let Err(err) = self.mode.enable() {
            self.notices.push(SessionNotice::sign_in_required());
            return Err(err);
        }
        tracing::info!(page = %self.page, "edit mode enabled");
        self.rescan();
        Ok(self.sync_url())
    }

    pub fn disable_edit_mode(&mut self) -> Url {
        if self.mode.is_edit_mode() {
            tracing::info!(page = %self.page, "edit mode disabled");
        }
        self.mode.disable();
        self.teardown();
        self.sync_url()
    }

    pub fn toggle_edit_mode(&mut self) -> Result<Url> {
        if self.mode.is_edit_mode() {
            Ok(self.disable_edit_mode())
        } else {
            self.enable_edit_mode()
        }
    }

    pub fn open_panel(&mut self) -> Result<Url> {
        if let Err(err) = self.mode.open_panel() {
            self.notices.push(SessionNotice::sign_in_required());
            return Err(err);
        }
        self.rescan();
        Ok(self.sync_url())
    }

    pub fn close_panel(&mut self) -> Url {
        self.mode.close_panel();
        self.sync_url()
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Click on `node`. Returns whether an editor is now open for it; clicks
    /// outside edit mode or on plain content pass through.
    pub fn click(&mut self, node: NodeId) -> Result<bool> {
        if !self.mode.can_edit() {
            return Ok(false);
        }
        self.lifecycle
            .open(&mut self.dom, &mut self.registry, node, &self.page)
    }

    pub fn input(&mut self, value: impl Into<String>) -> bool {
        self.lifecycle.input(value)
    }

    pub fn key(&mut self, key: Key) -> Result<Option<CommitOutcome>> {
        self.lifecycle.key(&mut self.dom, &mut self.registry, key)
    }

    pub fn blur(&mut self) -> Result<Option<CommitOutcome>> {
        self.lifecycle.blur(&mut self.dom, &mut self.registry)
    }

    /// Observer for the records that can change what is editable
    pub fn observe_dom(&mut self) -> MutationObserver {
        self.dom.observe(
            ObserveOptions::child_list().with_attributes(&[MARKER_ATTR, MARKER_TYPE_ATTR, MARKER_PAGE_ATTR]),
        )
    }

    pub fn poll_indicators(&mut self) -> &[Indicator] {
        self.indicators.poll()
    }

    pub fn take_notices(&mut self) -> Vec<SessionNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Wait for in-flight writes
    pub async fn settle(&mut self) {
        self.lifecycle.settle().await;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn dom(&self) -> &DomTree {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut DomTree {
        &mut self.dom
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn mode(&self) -> &EditModeState {
        &self.mode
    }

    pub fn editor(&self) -> Option<&InlineEditor> {
        self.lifecycle.editor()
    }

    pub fn phase(&self) -> EditorPhase {
        self.lifecycle.phase()
    }

    pub fn writes_issued(&self) -> u64 {
        self.lifecycle.writes_issued()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    fn sync_url(&mut self) -> Url {
        self.url = self.mode.to_url(&self.url);
        self.url.clone()
    }

    fn teardown(&mut self) {
        self.lifecycle.discard();
        self.registry.clear();
    }
}

impl Rescan for LiveEdit {
    /// Scans only while the user can edit; otherwise the registry stays empty
    fn rescan(&mut self) -> usize {
        if self.mode.can_edit() {
            self.registry.scan(&self.dom)
        } else {
            self.registry.clear();
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_for_url() {
        let url = |s: &str| Url::parse(s).unwrap();
        assert_eq!(page_for_url(&url("https://school.example/")), "home");
        assert_eq!(page_for_url(&url("https://school.example/about?edit=true")), "about");
        assert_eq!(page_for_url(&url("https://school.example/admissions/apply")), "admissions");
    }
}

//! Session domain model.
//!
//! The session is an explicit owned value with one transition method per
//! event, so every transition is unit-testable without async machinery or a
//! rendering environment. All mutation goes through these methods; the
//! controller only decides when to call them.

use serde::{Deserialize, Serialize};

use crate::insight::Insight;
use crate::saved_search::SavedSearchTerm;

/// Load state of a single tab.
///
/// Transitions are monotonic: `Loading -> Ready | Failed`, never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabLoadState {
    Loading,
    Ready,
    Failed,
}

/// One independent, user-visible search session with its own
/// loading/result/error state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    /// Unique within the session; monotonic, never reused.
    pub id: u64,
    /// The term this tab was opened for.
    pub search_term: String,
    /// Ordered insights, possibly empty.
    pub insights: Vec<Insight>,
    pub load_state: TabLoadState,
    pub error_message: Option<String>,
}

impl Tab {
    fn loading(id: u64, search_term: String) -> Self {
        Self {
            id,
            search_term,
            insights: Vec::new(),
            load_state: TabLoadState::Loading,
            error_message: None,
        }
    }
}

/// The full in-memory client state for the current user.
///
/// Process-wide for the lifetime of the client; reset to empty on logout and
/// rehydrated (saved searches re-fetched) when authentication becomes true.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub is_authenticated: bool,
    /// Open tabs in insertion order.
    pub tabs: Vec<Tab>,
    pub active_tab_id: Option<u64>,
    /// Server-sourced saved terms; the in-memory copy is authoritative for
    /// display until the next full load.
    pub saved_searches: Vec<SavedSearchTerm>,
    pub is_loading_saved_searches: bool,
    pub is_saving_search: bool,
}

impl Session {
    /// Appends a new loading tab and makes it active.
    pub fn open_tab(&mut self, id: u64, search_term: impl Into<String>) {
        self.tabs.push(Tab::loading(id, search_term.into()));
        self.active_tab_id = Some(id);
    }

    /// Makes an existing tab active. Returns `false` if the tab is gone.
    pub fn activate_tab(&mut self, id: u64) -> bool {
        if self.tabs.iter().any(|tab| tab.id == id) {
            self.active_tab_id = Some(id);
            true
        } else {
            false
        }
    }

    /// Removes a tab.
    ///
    /// If it was the active tab, the most recently added survivor becomes
    /// active, or the active id is cleared when no tab remains. Returns
    /// `false` if the tab was already gone.
    pub fn close_tab(&mut self, id: u64) -> bool {
        let before = self.tabs.len();
        self.tabs.retain(|tab| tab.id != id);
        if self.tabs.len() == before {
            return false;
        }
        if self.active_tab_id == Some(id) {
            self.active_tab_id = self.tabs.last().map(|tab| tab.id);
        }
        true
    }

    pub fn find_tab(&self, id: u64) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    /// Finds "the" representative tab for a term, used to reuse an open tab
    /// instead of duplicating it when a saved term is activated.
    pub fn find_tab_by_term(&self, term: &str) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.search_term == term)
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_tab_id.and_then(|id| self.find_tab(id))
    }

    /// Applies a successful insight fetch to the tab with the given id.
    ///
    /// A no-op returning `false` when the tab has been closed in the
    /// meantime or has already left the loading state.
    pub fn resolve_tab_ready(&mut self, id: u64, insights: Vec<Insight>) -> bool {
        match self.tabs.iter_mut().find(|tab| tab.id == id) {
            Some(tab) if tab.load_state == TabLoadState::Loading => {
                tab.insights = insights;
                tab.load_state = TabLoadState::Ready;
                true
            }
            _ => false,
        }
    }

    /// Applies a failed insight fetch to the tab with the given id.
    ///
    /// Same no-op semantics as [`Session::resolve_tab_ready`].
    pub fn resolve_tab_failed(&mut self, id: u64, message: impl Into<String>) -> bool {
        match self.tabs.iter_mut().find(|tab| tab.id == id) {
            Some(tab) if tab.load_state == TabLoadState::Loading => {
                tab.load_state = TabLoadState::Failed;
                tab.error_message = Some(message.into());
                true
            }
            _ => false,
        }
    }

    /// Case-sensitive exact-match check against the saved list.
    pub fn contains_saved_term(&self, term: &str) -> bool {
        self.saved_searches.iter().any(|saved| saved.term == term)
    }

    /// Replaces the saved list wholesale (full load).
    pub fn replace_saved(&mut self, list: Vec<SavedSearchTerm>) {
        self.saved_searches = list;
    }

    /// Appends a server-confirmed saved term.
    pub fn append_saved(&mut self, saved: SavedSearchTerm) {
        self.saved_searches.push(saved);
    }

    /// Removes a saved term by identity. Returns `false` if already absent.
    pub fn remove_saved(&mut self, id: &str) -> bool {
        let before = self.saved_searches.len();
        self.saved_searches.retain(|saved| saved.id != id);
        self.saved_searches.len() != before
    }

    /// Clears everything back to the unauthenticated state.
    ///
    /// No partial retention: tabs, active tab and saved terms all go.
    pub fn reset(&mut self) {
        *self = Session::default();
    }
}

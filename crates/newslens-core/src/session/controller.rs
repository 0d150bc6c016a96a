//! The session controller: the client-side state machine coordinating
//! authentication, open tabs and the saved-search list.
//!
//! All state mutations are synchronous critical sections over the owned
//! [`Session`] value; the lock is never held across an await. Network calls
//! run on spawned tasks, and every resolution re-locates its target by id
//! rather than assuming the state captured at call time is still current. A
//! tab closed while its fetch is in flight therefore silently discards the
//! result: the lookup finds nothing and the update is a no-op. There is no
//! cancellation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use tokio::task::JoinHandle;

use crate::auth::{AuthBus, AuthSignal, CredentialHolder, Subscription};
use crate::error::Result;
use crate::insight::{DEFAULT_NUM_RESULTS, InsightService};
use crate::saved_search::SavedSearchGateway;
use crate::session::model::Session;

/// Owns the [`Session`] and drives every transition on it.
///
/// Construct with [`SessionController::new`], which subscribes the
/// controller to the auth bus; call [`SessionController::detach`] on
/// teardown to release those subscriptions. The controller holds its bus
/// listeners through a `Weak` self-reference, so dropping the last external
/// `Arc` never leaks the controller through the bus.
pub struct SessionController {
    weak: Weak<SessionController>,
    state: RwLock<Session>,
    credentials: Arc<CredentialHolder>,
    insights: Arc<dyn InsightService>,
    saved_searches: Arc<dyn SavedSearchGateway>,
    auth_bus: Arc<dyn AuthBus>,
    subscriptions: Mutex<Vec<Subscription>>,
    /// In-flight fetch/save tasks, awaited by [`SessionController::flush_pending`].
    pending: Mutex<Vec<JoinHandle<()>>>,
    next_tab_id: AtomicU64,
}

impl SessionController {
    /// Creates the controller and subscribes it to login/logout signals.
    pub fn new(
        credentials: Arc<CredentialHolder>,
        insights: Arc<dyn InsightService>,
        saved_searches: Arc<dyn SavedSearchGateway>,
        auth_bus: Arc<dyn AuthBus>,
    ) -> Arc<Self> {
        let controller = Arc::new_cyclic(|weak: &Weak<Self>| Self {
            weak: weak.clone(),
            state: RwLock::new(Session::default()),
            credentials,
            insights,
            saved_searches,
            auth_bus,
            subscriptions: Mutex::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
            next_tab_id: AtomicU64::new(1),
        });
        controller.attach();
        controller
    }

    fn attach(self: &Arc<Self>) {
        let login = {
            let weak = Arc::downgrade(self);
            self.auth_bus.subscribe(
                AuthSignal::Login,
                Box::new(move || {
                    if let Some(controller) = weak.upgrade() {
                        controller.handle_login_signal();
                    }
                }),
            )
        };
        let logout = {
            let weak = Arc::downgrade(self);
            self.auth_bus.subscribe(
                AuthSignal::Logout,
                Box::new(move || {
                    if let Some(controller) = weak.upgrade() {
                        controller.handle_logout_signal();
                    }
                }),
            )
        };

        let mut subscriptions = self
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscriptions.push(login);
        subscriptions.push(logout);
    }

    /// Releases the auth-bus subscriptions. Call on teardown.
    pub fn detach(&self) {
        let drained: Vec<Subscription> = {
            let mut subscriptions = self
                .subscriptions
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            subscriptions.drain(..).collect()
        };
        for subscription in drained {
            subscription.unsubscribe();
        }
    }

    /// Startup transition: a persisted credential found valid at startup
    /// enters the authenticated state and triggers the saved-search load.
    pub fn start(&self) {
        self.handle_login_signal();
    }

    /// Returns a copy of the current session state for rendering.
    pub fn snapshot(&self) -> Session {
        self.read_state().clone()
    }

    /// Submits a new search.
    ///
    /// The new loading tab is appended and activated synchronously, before
    /// any network call, so the caller observes it immediately. The insight
    /// fetch and (when applicable) the saved-term create then run
    /// independently of each other; only the fetch drives the tab's load
    /// state.
    ///
    /// Returns the new tab id, or `None` when the term is empty after
    /// trimming.
    pub fn submit_search(&self, raw: &str) -> Option<u64> {
        let term = raw.trim();
        if term.is_empty() {
            return None;
        }
        let term = term.to_string();

        let tab_id = self.next_tab_id.fetch_add(1, Ordering::Relaxed);
        let should_save = {
            let mut session = self.write_state();
            session.open_tab(tab_id, term.clone());

            // At most one save in flight per controller: a submission while
            // a save is running skips the save step rather than queueing it.
            let wants_save = session.is_authenticated
                && !session.contains_saved_term(&term)
                && !session.is_saving_search;
            if wants_save {
                session.is_saving_search = true;
            }
            wants_save
        };

        if should_save {
            self.spawn_save(term.clone());
        }
        self.spawn_fetch(tab_id, term);
        Some(tab_id)
    }

    /// Activates a saved term.
    ///
    /// When a tab for the same term is already open it is reused: activated
    /// without a new fetch and without a duplicate tab. Otherwise a new tab
    /// is opened and fetched like a submission, skipping the save step (the
    /// term is already saved).
    pub fn activate_saved(&self, term: &str) -> Option<u64> {
        if term.is_empty() {
            return None;
        }

        {
            let mut session = self.write_state();
            if let Some(id) = session.find_tab_by_term(term).map(|tab| tab.id) {
                session.activate_tab(id);
                return Some(id);
            }
        }

        let tab_id = self.next_tab_id.fetch_add(1, Ordering::Relaxed);
        self.write_state().open_tab(tab_id, term);
        self.spawn_fetch(tab_id, term.to_string());
        Some(tab_id)
    }

    /// Makes an open tab active. Returns `false` if the tab is gone.
    pub fn activate_tab(&self, id: u64) -> bool {
        self.write_state().activate_tab(id)
    }

    /// Closes a tab; never deletes its saved term.
    pub fn close_tab(&self, id: u64) -> bool {
        self.write_state().close_tab(id)
    }

    /// Removes a saved term: remote delete first, local removal only on
    /// success.
    ///
    /// # Errors
    ///
    /// On failure local state is untouched and the error surfaces to the
    /// caller; the local list never diverges optimistically ahead of the
    /// server for deletions.
    pub async fn remove_saved(&self, id: &str) -> Result<()> {
        self.saved_searches.delete(id).await?;

        let mut session = self.write_state();
        if !session.remove_saved(id) {
            tracing::debug!(id, "saved term already absent locally after delete");
        }
        Ok(())
    }

    /// Explicit user logout: synchronously clears the credential, emits the
    /// logout signal and clears all tab and saved-search state. Idempotent.
    pub fn log_out(&self) {
        self.credentials.clear();
        self.auth_bus.emit(AuthSignal::Logout);
        // Our own subscription already reset the state during emit; resetting
        // again keeps logout correct even after detach.
        self.write_state().reset();
    }

    /// Awaits all in-flight fetch/save tasks.
    ///
    /// The view calls this to render settled state; tests use it to make the
    /// spawned resolutions deterministic.
    pub async fn flush_pending(&self) {
        loop {
            let drained: Vec<JoinHandle<()>> = {
                let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
                std::mem::take(&mut *pending)
            };
            if drained.is_empty() {
                return;
            }
            for handle in drained {
                let _ = handle.await;
            }
        }
    }

    /// Signal handler: authentication re-derived from the credential holder
    /// (signals carry no payload). Entering the authenticated state triggers
    /// exactly one saved-search list load.
    fn handle_login_signal(&self) {
        let authenticated = self.credentials.is_authenticated();
        let entering = {
            let mut session = self.write_state();
            let entering = authenticated && !session.is_authenticated;
            session.is_authenticated = authenticated;
            if entering {
                session.is_loading_saved_searches = true;
            }
            entering
        };
        if entering {
            self.spawn_saved_search_load();
        }
    }

    /// Signal handler: any logout, ours or another component's, resets the
    /// whole session.
    fn handle_logout_signal(&self) {
        self.write_state().reset();
    }

    fn spawn_saved_search_load(&self) {
        let Some(this) = self.weak.upgrade() else {
            return;
        };
        let handle = tokio::spawn(async move {
            let result = this.saved_searches.list().await;
            let mut session = this.write_state();
            session.is_loading_saved_searches = false;
            match result {
                Ok(list) => session.replace_saved(list),
                // Keep the previous (possibly empty) list; loading the rest
                // of the UI must not block on this.
                Err(err) => tracing::warn!("failed to load saved searches: {err}"),
            }
        });
        self.track(handle);
    }

    fn spawn_save(&self, term: String) {
        let Some(this) = self.weak.upgrade() else {
            return;
        };
        let handle = tokio::spawn(async move {
            let result = this.saved_searches.create(&term).await;
            let mut session = this.write_state();
            session.is_saving_search = false;
            match result {
                Ok(saved) => session.append_saved(saved),
                Err(err) => tracing::warn!(term = %term, "failed to save search term: {err}"),
            }
        });
        self.track(handle);
    }

    fn spawn_fetch(&self, tab_id: u64, term: String) {
        let Some(this) = self.weak.upgrade() else {
            return;
        };
        let handle = tokio::spawn(async move {
            match this
                .insights
                .fetch_insights(&term, DEFAULT_NUM_RESULTS)
                .await
            {
                Ok(insights) => {
                    let mut session = this.write_state();
                    if !session.resolve_tab_ready(tab_id, insights) {
                        tracing::debug!(tab_id, "discarding insights for a closed tab");
                    }
                }
                Err(err) => {
                    let mut session = this.write_state();
                    session.resolve_tab_failed(tab_id, err.to_string());
                }
            }
        });
        self.track(handle);
    }

    fn track(&self, handle: JoinHandle<()>) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        // Subscriptions hold only weak references back to us, but release
        // them anyway so the bus does not accumulate dead listeners.
        let mut subscriptions = self
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for subscription in subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{CredentialStore, ProcessAuthBus};
    use crate::error::NewslensError;
    use crate::insight::Insight;
    use crate::saved_search::SavedSearchTerm;
    use crate::session::model::TabLoadState;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize};

    struct MemoryCredentialStore {
        token: Mutex<Option<String>>,
    }

    impl MemoryCredentialStore {
        fn new(token: Option<&str>) -> Self {
            Self {
                token: Mutex::new(token.map(str::to_string)),
            }
        }
    }

    impl CredentialStore for MemoryCredentialStore {
        fn load(&self) -> Result<Option<String>> {
            Ok(self.token.lock().unwrap().clone())
        }

        fn store(&self, token: &str) -> Result<()> {
            *self.token.lock().unwrap() = Some(token.to_string());
            Ok(())
        }

        fn clear(&self) -> Result<()> {
            *self.token.lock().unwrap() = None;
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockInsightService {
        /// Per-term canned results; unknown terms resolve to an empty list.
        results: Mutex<HashMap<String, std::result::Result<Vec<Insight>, NewslensError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockInsightService {
        fn with_insights(self, term: &str, count: usize) -> Self {
            let insights = (0..count)
                .map(|i| Insight {
                    text: format!("insight {i} for {term}"),
                    source_title: format!("source {i}"),
                    source_link: format!("https://example.com/{i}"),
                })
                .collect();
            self.results
                .lock()
                .unwrap()
                .insert(term.to_string(), Ok(insights));
            self
        }

        fn with_failure(self, term: &str, err: NewslensError) -> Self {
            self.results
                .lock()
                .unwrap()
                .insert(term.to_string(), Err(err));
            self
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl InsightService for MockInsightService {
        async fn fetch_insights(&self, term: &str, _num_results: u32) -> Result<Vec<Insight>> {
            self.calls.lock().unwrap().push(term.to_string());
            match self.results.lock().unwrap().get(term) {
                Some(result) => result.clone(),
                None => Ok(Vec::new()),
            }
        }
    }

    #[derive(Default)]
    struct MockGateway {
        terms: Mutex<Vec<SavedSearchTerm>>,
        next_id: AtomicU64,
        create_calls: AtomicUsize,
        fail_list: AtomicBool,
        fail_create: AtomicBool,
        fail_delete: AtomicBool,
    }

    impl MockGateway {
        fn seeded(terms: &[&str]) -> Self {
            let gateway = Self::default();
            {
                let mut stored = gateway.terms.lock().unwrap();
                for (i, term) in terms.iter().enumerate() {
                    stored.push(SavedSearchTerm {
                        id: format!("seed-{i}"),
                        term: term.to_string(),
                        user_id: "user-1".to_string(),
                        created_at: Utc::now(),
                    });
                }
            }
            gateway
        }

        fn create_count(&self) -> usize {
            self.create_calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl SavedSearchGateway for MockGateway {
        async fn list(&self) -> Result<Vec<SavedSearchTerm>> {
            if self.fail_list.load(Ordering::Relaxed) {
                return Err(NewslensError::request(500, "list failed"));
            }
            Ok(self.terms.lock().unwrap().clone())
        }

        async fn create(&self, term: &str) -> Result<SavedSearchTerm> {
            self.create_calls.fetch_add(1, Ordering::Relaxed);
            if self.fail_create.load(Ordering::Relaxed) {
                return Err(NewslensError::request(500, "create failed"));
            }
            let saved = SavedSearchTerm {
                id: format!("term-{}", self.next_id.fetch_add(1, Ordering::Relaxed)),
                term: term.to_string(),
                user_id: "user-1".to_string(),
                created_at: Utc::now(),
            };
            self.terms.lock().unwrap().push(saved.clone());
            Ok(saved)
        }

        async fn delete(&self, id: &str) -> Result<()> {
            if self.fail_delete.load(Ordering::Relaxed) {
                return Err(NewslensError::request(500, "delete failed"));
            }
            let mut terms = self.terms.lock().unwrap();
            let before = terms.len();
            terms.retain(|saved| saved.id != id);
            if terms.len() == before {
                return Err(NewslensError::not_found("search term", id));
            }
            Ok(())
        }
    }

    struct Fixture {
        controller: Arc<SessionController>,
        credentials: Arc<CredentialHolder>,
        insights: Arc<MockInsightService>,
        gateway: Arc<MockGateway>,
        bus: Arc<ProcessAuthBus>,
    }

    fn fixture(token: Option<&str>, insights: MockInsightService, gateway: MockGateway) -> Fixture {
        let credentials = Arc::new(CredentialHolder::new(Arc::new(
            MemoryCredentialStore::new(token),
        )));
        let insights = Arc::new(insights);
        let gateway = Arc::new(gateway);
        let bus = Arc::new(ProcessAuthBus::new());
        let controller = SessionController::new(
            credentials.clone(),
            insights.clone(),
            gateway.clone(),
            bus.clone(),
        );
        Fixture {
            controller,
            credentials,
            insights,
            gateway,
            bus,
        }
    }

    #[tokio::test]
    async fn submit_appends_loading_tab_synchronously() {
        let fx = fixture(None, MockInsightService::default(), MockGateway::default());

        let tab_id = fx.controller.submit_search("climate policy").unwrap();

        // Before any resolution: tab exists, is loading and active.
        let session = fx.controller.snapshot();
        assert_eq!(session.tabs.len(), 1);
        assert_eq!(session.active_tab_id, Some(tab_id));
        assert_eq!(session.tabs[0].load_state, TabLoadState::Loading);
        assert_eq!(session.tabs[0].search_term, "climate policy");

        fx.controller.flush_pending().await;
    }

    #[tokio::test]
    async fn blank_submit_is_ignored() {
        let fx = fixture(None, MockInsightService::default(), MockGateway::default());

        assert_eq!(fx.controller.submit_search("   "), None);
        assert!(fx.controller.snapshot().tabs.is_empty());
    }

    #[tokio::test]
    async fn authenticated_search_saves_term_and_loads_insights() {
        // Scenario A: authenticate, submit, three insights come back.
        let fx = fixture(
            Some("tok"),
            MockInsightService::default().with_insights("climate policy", 3),
            MockGateway::default(),
        );
        fx.controller.start();
        fx.controller.flush_pending().await;

        let tab_id = fx.controller.submit_search("climate policy").unwrap();
        fx.controller.flush_pending().await;

        let session = fx.controller.snapshot();
        let tab = session.find_tab(tab_id).unwrap();
        assert_eq!(tab.load_state, TabLoadState::Ready);
        assert_eq!(tab.insights.len(), 3);
        assert_eq!(session.active_tab_id, Some(tab_id));
        assert_eq!(session.saved_searches.len(), 1);
        assert_eq!(session.saved_searches[0].term, "climate policy");
        assert_eq!(fx.gateway.create_count(), 1);
    }

    #[tokio::test]
    async fn closing_tab_keeps_saved_term() {
        // Scenario B.
        let fx = fixture(
            Some("tok"),
            MockInsightService::default().with_insights("climate policy", 3),
            MockGateway::default(),
        );
        fx.controller.start();
        fx.controller.flush_pending().await;

        let tab_id = fx.controller.submit_search("climate policy").unwrap();
        fx.controller.flush_pending().await;

        assert!(fx.controller.close_tab(tab_id));

        let session = fx.controller.snapshot();
        assert!(session.tabs.is_empty());
        assert_eq!(session.active_tab_id, None);
        assert_eq!(session.saved_searches.len(), 1);
        assert_eq!(session.saved_searches[0].term, "climate policy");
    }

    #[tokio::test]
    async fn resubmitting_saved_term_skips_create_but_opens_second_tab() {
        // Scenario C: tabs are not deduplicated on submit, saves are.
        let fx = fixture(
            Some("tok"),
            MockInsightService::default().with_insights("climate policy", 2),
            MockGateway::default(),
        );
        fx.controller.start();
        fx.controller.flush_pending().await;

        fx.controller.submit_search("climate policy").unwrap();
        fx.controller.flush_pending().await;
        let fetches_after_first = fx.insights.call_count();

        fx.controller.submit_search("climate policy").unwrap();
        fx.controller.flush_pending().await;

        let session = fx.controller.snapshot();
        assert_eq!(session.tabs.len(), 2);
        assert_eq!(fx.gateway.create_count(), 1);
        assert_eq!(fx.insights.call_count(), fetches_after_first + 1);
        assert_eq!(session.saved_searches.len(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_marks_tab_failed() {
        // Scenario D.
        let fx = fixture(
            Some("tok"),
            MockInsightService::default()
                .with_failure("climate policy", NewslensError::request(404, "No insights found")),
            MockGateway::default(),
        );
        fx.controller.start();
        fx.controller.flush_pending().await;

        let tab_id = fx.controller.submit_search("climate policy").unwrap();
        fx.controller.flush_pending().await;

        let session = fx.controller.snapshot();
        let tab = session.find_tab(tab_id).unwrap();
        assert_eq!(tab.load_state, TabLoadState::Failed);
        assert!(tab.error_message.as_deref().unwrap().contains("404"));
        // The save step races independently and is unaffected.
        assert_eq!(session.saved_searches.len(), 1);
    }

    #[tokio::test]
    async fn startup_credential_triggers_single_saved_search_load() {
        let fx = fixture(
            Some("tok"),
            MockInsightService::default(),
            MockGateway::seeded(&["energy", "housing"]),
        );
        fx.controller.start();

        assert!(fx.controller.snapshot().is_loading_saved_searches);
        fx.controller.flush_pending().await;

        let session = fx.controller.snapshot();
        assert!(session.is_authenticated);
        assert!(!session.is_loading_saved_searches);
        assert_eq!(session.saved_searches.len(), 2);
    }

    #[tokio::test]
    async fn failed_saved_search_load_keeps_previous_list() {
        let fx = fixture(Some("tok"), MockInsightService::default(), MockGateway::default());
        fx.gateway.fail_list.store(true, Ordering::Relaxed);
        fx.controller.start();
        fx.controller.flush_pending().await;

        let session = fx.controller.snapshot();
        assert!(session.is_authenticated);
        assert!(!session.is_loading_saved_searches);
        assert!(session.saved_searches.is_empty());
    }

    #[tokio::test]
    async fn login_signal_rederives_authentication_from_credentials() {
        let fx = fixture(None, MockInsightService::default(), MockGateway::seeded(&["energy"]));
        fx.controller.start();
        assert!(!fx.controller.snapshot().is_authenticated);

        // The login screen stores the token, then emits; the controller
        // re-reads the holder because the signal carries no payload.
        fx.credentials.set("fresh-token");
        fx.bus.emit(AuthSignal::Login);
        fx.controller.flush_pending().await;

        let session = fx.controller.snapshot();
        assert!(session.is_authenticated);
        assert_eq!(session.saved_searches.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_login_signal_loads_saved_searches_once() {
        let fx = fixture(Some("tok"), MockInsightService::default(), MockGateway::default());
        fx.controller.start();
        fx.controller.flush_pending().await;

        fx.bus.emit(AuthSignal::Login);
        fx.controller.flush_pending().await;

        // Still exactly one load: the second signal found us already
        // authenticated and did not re-trigger it.
        assert!(!fx.controller.snapshot().is_loading_saved_searches);
    }

    #[tokio::test]
    async fn logout_clears_everything_and_is_idempotent() {
        let fx = fixture(
            Some("tok"),
            MockInsightService::default().with_insights("energy", 1),
            MockGateway::default(),
        );
        fx.controller.start();
        fx.controller.flush_pending().await;
        fx.controller.submit_search("energy").unwrap();
        fx.controller.flush_pending().await;

        fx.controller.log_out();

        let session = fx.controller.snapshot();
        assert!(!session.is_authenticated);
        assert!(session.tabs.is_empty());
        assert!(session.saved_searches.is_empty());
        assert_eq!(session.active_tab_id, None);
        assert!(!fx.credentials.is_authenticated());

        // Second logout is a no-op, not an error.
        fx.controller.log_out();
        assert_eq!(fx.controller.snapshot(), Session::default());
    }

    #[tokio::test]
    async fn activating_saved_term_reuses_open_tab() {
        let fx = fixture(
            Some("tok"),
            MockInsightService::default().with_insights("energy", 1),
            MockGateway::default(),
        );
        fx.controller.start();
        fx.controller.flush_pending().await;

        let first = fx.controller.submit_search("energy").unwrap();
        fx.controller.flush_pending().await;
        fx.controller.submit_search("other").unwrap();
        fx.controller.flush_pending().await;
        let fetches = fx.insights.call_count();

        let reused = fx.controller.activate_saved("energy").unwrap();
        fx.controller.flush_pending().await;

        assert_eq!(reused, first);
        let session = fx.controller.snapshot();
        assert_eq!(session.active_tab_id, Some(first));
        assert_eq!(session.tabs.len(), 2);
        // Reuse performs no new fetch.
        assert_eq!(fx.insights.call_count(), fetches);
    }

    #[tokio::test]
    async fn activating_saved_term_without_tab_fetches_but_never_saves() {
        let fx = fixture(
            Some("tok"),
            MockInsightService::default().with_insights("energy", 2),
            MockGateway::seeded(&["energy"]),
        );
        fx.controller.start();
        fx.controller.flush_pending().await;

        let tab_id = fx.controller.activate_saved("energy").unwrap();
        fx.controller.flush_pending().await;

        let session = fx.controller.snapshot();
        let tab = session.find_tab(tab_id).unwrap();
        assert_eq!(tab.load_state, TabLoadState::Ready);
        assert_eq!(tab.insights.len(), 2);
        assert_eq!(fx.gateway.create_count(), 0);
    }

    #[tokio::test]
    async fn only_one_save_in_flight_at_a_time() {
        let fx = fixture(Some("tok"), MockInsightService::default(), MockGateway::default());
        fx.controller.start();
        fx.controller.flush_pending().await;

        // Neither spawned save has run yet when the second submission
        // arrives, so the in-flight flag makes it skip its save entirely.
        fx.controller.submit_search("first").unwrap();
        fx.controller.submit_search("second").unwrap();
        fx.controller.flush_pending().await;

        assert_eq!(fx.gateway.create_count(), 1);
        let session = fx.controller.snapshot();
        assert_eq!(session.saved_searches.len(), 1);
        assert_eq!(session.saved_searches[0].term, "first");
        assert!(!session.is_saving_search);
    }

    #[tokio::test]
    async fn failed_save_leaves_saved_list_unchanged() {
        let fx = fixture(Some("tok"), MockInsightService::default(), MockGateway::default());
        fx.gateway.fail_create.store(true, Ordering::Relaxed);
        fx.controller.start();
        fx.controller.flush_pending().await;

        fx.controller.submit_search("energy").unwrap();
        fx.controller.flush_pending().await;

        let session = fx.controller.snapshot();
        assert!(session.saved_searches.is_empty());
        assert!(!session.is_saving_search);
        // The tab itself still resolved; the save step does not gate it.
        assert_eq!(session.tabs[0].load_state, TabLoadState::Ready);
    }

    #[tokio::test]
    async fn unauthenticated_search_fetches_without_saving() {
        let fx = fixture(None, MockInsightService::default().with_insights("energy", 1), MockGateway::default());
        fx.controller.start();

        let tab_id = fx.controller.submit_search("energy").unwrap();
        fx.controller.flush_pending().await;

        let session = fx.controller.snapshot();
        assert_eq!(session.find_tab(tab_id).unwrap().load_state, TabLoadState::Ready);
        assert_eq!(fx.gateway.create_count(), 0);
        assert!(session.saved_searches.is_empty());
    }

    #[tokio::test]
    async fn fetch_resolving_after_close_is_discarded() {
        let fx = fixture(None, MockInsightService::default().with_insights("energy", 1), MockGateway::default());

        let tab_id = fx.controller.submit_search("energy").unwrap();
        // Close before the spawned fetch has had a chance to run.
        assert!(fx.controller.close_tab(tab_id));
        fx.controller.flush_pending().await;

        let session = fx.controller.snapshot();
        assert!(session.tabs.is_empty());
        assert_eq!(session.active_tab_id, None);
    }

    #[tokio::test]
    async fn remove_saved_deletes_remotely_then_locally() {
        let fx = fixture(Some("tok"), MockInsightService::default(), MockGateway::seeded(&["energy"]));
        fx.controller.start();
        fx.controller.flush_pending().await;

        let id = fx.controller.snapshot().saved_searches[0].id.clone();
        fx.controller.remove_saved(&id).await.unwrap();

        assert!(fx.controller.snapshot().saved_searches.is_empty());
        assert!(fx.gateway.terms.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_remote_delete_leaves_local_list_untouched() {
        let fx = fixture(Some("tok"), MockInsightService::default(), MockGateway::seeded(&["energy"]));
        fx.controller.start();
        fx.controller.flush_pending().await;

        fx.gateway.fail_delete.store(true, Ordering::Relaxed);
        let id = fx.controller.snapshot().saved_searches[0].id.clone();
        let result = fx.controller.remove_saved(&id).await;

        assert!(result.is_err());
        assert_eq!(fx.controller.snapshot().saved_searches.len(), 1);
    }

    #[tokio::test]
    async fn detach_releases_bus_subscriptions() {
        let fx = fixture(None, MockInsightService::default(), MockGateway::seeded(&["energy"]));
        fx.controller.detach();

        fx.credentials.set("tok");
        fx.bus.emit(AuthSignal::Login);
        fx.controller.flush_pending().await;

        // The detached controller no longer reacts to signals.
        assert!(!fx.controller.snapshot().is_authenticated);
    }
}

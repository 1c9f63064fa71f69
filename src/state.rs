//! UI state owned by the coordinator
//!
//! All component state lives in one [`UiState`] behind a mutex. Handlers and
//! completed requests lock it briefly, mutate, and release; the lock is never
//! held across an `.await`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::api::EntityId;
use crate::forms::{GameForm, RequestForm};
use crate::navigation::DeepLink;
use crate::notify::{Notification, NotificationCenter};
use crate::refresh::CatalogSnapshot;
use crate::search::{ResultsPanel, SearchSession};
use crate::view_state::ViewState;

pub type SharedState = Arc<Mutex<UiState>>;

/// A control that is disabled while its request runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Control {
    AddGameSubmit,
    RequestSubmit,
    DeleteGame(EntityId),
    RequestStatus(EntityId),
    Download(EntityId),
}

#[derive(Debug)]
pub struct UiState {
    pub view: ViewState,
    pub notifications: NotificationCenter,
    pub search: SearchSession,
    pub results: ResultsPanel,
    pub add_game_form: GameForm,
    pub request_form: RequestForm,
    /// Latest server state fetched by a refresh
    pub catalog: Option<CatalogSnapshot>,
    pub refresh_count: u64,
    pub location_hash: Option<DeepLink>,
    busy: HashMap<Control, usize>,
}

impl UiState {
    pub fn new(view: ViewState, toast_lifetime: Duration) -> Self {
        Self {
            view,
            notifications: NotificationCenter::new(toast_lifetime),
            search: SearchSession::default(),
            results: ResultsPanel::default(),
            add_game_form: GameForm::default(),
            request_form: RequestForm::default(),
            catalog: None,
            refresh_count: 0,
            location_hash: None,
            busy: HashMap::new(),
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(Mutex::new(self))
    }

    pub fn is_busy(&self, control: Control) -> bool {
        self.busy.get(&control).is_some_and(|n| *n > 0)
    }

    fn mark_busy(&mut self, control: Control) {
        *self.busy.entry(control).or_insert(0) += 1;
    }

    fn release(&mut self, control: Control) {
        if let Some(count) = self.busy.get_mut(&control) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.busy.remove(&control);
            }
        }
    }

    /// Render-ready copy of the current state
    pub fn snapshot(&mut self) -> UiSnapshot {
        let mut busy: Vec<Control> = self.busy.keys().copied().collect();
        busy.sort();
        UiSnapshot {
            view: self.view.clone(),
            notifications: self.notifications.visible(),
            query_text: self.search.query_text().to_string(),
            results: self.results.clone(),
            add_game_form: self.add_game_form.clone(),
            request_form: self.request_form.clone(),
            catalog: self.catalog.clone(),
            refresh_count: self.refresh_count,
            location_hash: self.location_hash,
            busy,
        }
    }
}

/// Point-in-time view model handed to renderers
#[derive(Debug, Clone)]
pub struct UiSnapshot {
    pub view: ViewState,
    pub notifications: Vec<Notification>,
    pub query_text: String,
    pub results: ResultsPanel,
    pub add_game_form: GameForm,
    pub request_form: RequestForm,
    pub catalog: Option<CatalogSnapshot>,
    pub refresh_count: u64,
    pub location_hash: Option<DeepLink>,
    pub busy: Vec<Control>,
}

/// Marks a control busy until dropped.
///
/// Must not be dropped while the state lock is held by the same task.
pub struct BusyGuard {
    state: SharedState,
    control: Control,
}

impl BusyGuard {
    pub fn acquire(state: &SharedState, control: Control) -> Self {
        state.lock().mark_busy(control);
        Self {
            state: Arc::clone(state),
            control,
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.state.lock().release(self.control);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::DEFAULT_TOAST_LIFETIME;

    fn shared() -> SharedState {
        UiState::new(ViewState::admin_dashboard(), DEFAULT_TOAST_LIFETIME).shared()
    }

    #[test]
    fn test_busy_guard_releases_on_drop() {
        let state = shared();
        let control = Control::DeleteGame(EntityId(3));
        {
            let _guard = BusyGuard::acquire(&state, control);
            assert!(state.lock().is_busy(control));
        }
        assert!(!state.lock().is_busy(control));
    }

    #[test]
    fn test_overlapping_guards_on_same_control() {
        let state = shared();
        let first = BusyGuard::acquire(&state, Control::AddGameSubmit);
        let second = BusyGuard::acquire(&state, Control::AddGameSubmit);
        drop(first);
        assert!(state.lock().is_busy(Control::AddGameSubmit));
        drop(second);
        assert!(!state.lock().is_busy(Control::AddGameSubmit));
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_copies_visible_state() {
        let state = shared();
        state.lock().add_game_form.title = "Hades".to_string();
        state
            .lock()
            .notifications
            .notify("hi", crate::notify::Severity::Info);

        let snapshot = state.lock().snapshot();
        assert_eq!(snapshot.add_game_form.title, "Hades");
        assert_eq!(snapshot.notifications.len(), 1);
        assert_eq!(snapshot.refresh_count, 0);
        assert!(snapshot.busy.is_empty());
    }
}

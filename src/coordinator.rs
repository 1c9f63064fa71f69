//! Entry point that wires the UI components together
//!
//! The [`Coordinator`] owns the shared [`UiState`] and hands out the search
//! pipeline, the action gateway and the refresh scheduler. Every user event
//! (keystroke, click, key press, form submission) comes in through one of
//! its methods.

use std::sync::Arc;
use std::time::Duration;

use crate::api::{EntityId, Game, RequestStatus, endpoints};
use crate::error::Result;
use crate::forms::{GameForm, RequestForm};
use crate::gateway::{ActionGateway, ActionOutcome, ActionRequest, Confirm, RefreshDelays};
use crate::navigation::DeepLink;
use crate::notify::{DEFAULT_TOAST_LIFETIME, Severity};
use crate::refresh::{CatalogSnapshot, RefreshScheduler};
use crate::search::{ResultRow, SearchPipeline, SearchSettings};
use crate::state::{BusyGuard, Control, SharedState, UiSnapshot, UiState};
use crate::transport::{ApiRequest, Transport};
use crate::view_state::{ADD_GAME_MODAL, Key, ModalId, NavItemId, PointerTarget, TabId, ViewState};

pub const DOWNLOAD_STARTED_MESSAGE: &str = "Download started!";
pub const DOWNLOAD_ERROR_MESSAGE: &str = "Error retrieving download link";

/// Timing knobs for a coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorSettings {
    pub search: SearchSettings,
    pub refresh_delays: RefreshDelays,
    pub toast_lifetime: Duration,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            search: SearchSettings::default(),
            refresh_delays: RefreshDelays::default(),
            toast_lifetime: DEFAULT_TOAST_LIFETIME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The link to open
    Started(String),
    Failed,
}

pub struct Coordinator<T: Transport> {
    transport: Arc<T>,
    state: SharedState,
    search: SearchPipeline<T>,
    gateway: ActionGateway<T>,
    refresh: RefreshScheduler<T>,
}

impl<T: Transport> Coordinator<T> {
    pub fn new(transport: Arc<T>, view: ViewState, settings: CoordinatorSettings) -> Self {
        let state = UiState::new(view, settings.toast_lifetime).shared();
        let refresh = RefreshScheduler::new(Arc::clone(&transport), Arc::clone(&state));
        let search = SearchPipeline::new(
            Arc::clone(&transport),
            Arc::clone(&state),
            settings.search,
        );
        let gateway = ActionGateway::new(
            Arc::clone(&transport),
            Arc::clone(&state),
            refresh.clone(),
            settings.refresh_delays,
        );

        Self {
            transport,
            state,
            search,
            gateway,
            refresh,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn snapshot(&self) -> UiSnapshot {
        self.state.lock().snapshot()
    }

    // Search

    pub fn on_search_input(&self, text: impl Into<String>) {
        self.search.on_input(text);
    }

    pub async fn search_settled(&self) {
        self.search.settled().await;
    }

    /// Follow a result row's deep link
    pub fn select_result(&self, row: &ResultRow) {
        self.state.lock().location_hash = Some(row.link);
    }

    // View

    pub fn pointer_down(&self, target: &PointerTarget) {
        self.state.lock().view.pointer_down(target);
        self.search.pointer_down(target);
    }

    pub fn key_down(&self, key: Key) -> Vec<ModalId> {
        self.state.lock().view.key_down(key)
    }

    pub fn activate_tab(&self, tab: impl Into<TabId>, trigger: impl Into<NavItemId>) -> bool {
        self.state
            .lock()
            .view
            .activate_tab(&tab.into(), &trigger.into())
    }

    pub fn open_modal(&self, modal: impl Into<ModalId>) {
        self.state.lock().view.open_modal(&modal.into());
    }

    pub fn open_add_game_modal(&self) {
        self.open_modal(ADD_GAME_MODAL);
    }

    pub fn close_modal(&self, modal: impl Into<ModalId>) -> bool {
        self.state.lock().view.close_modal(&modal.into())
    }

    pub fn update_add_game_form(&self, edit: impl FnOnce(&mut GameForm)) {
        edit(&mut self.state.lock().add_game_form);
    }

    pub fn update_request_form(&self, edit: impl FnOnce(&mut RequestForm)) {
        edit(&mut self.state.lock().request_form);
    }

    pub fn go_to_game(&self, id: EntityId) -> DeepLink {
        let link = DeepLink::game(id);
        self.state.lock().location_hash = Some(link);
        link
    }

    // Actions

    /// Submit the add-game form as it currently stands
    pub async fn submit_add_game(&self) -> ActionOutcome {
        let form = self.state.lock().add_game_form.clone();
        self.gateway
            .submit(ActionRequest::add_game(&form), &no_confirmation)
            .await
    }

    pub async fn edit_game(&self, id: EntityId) -> ActionOutcome {
        self.gateway
            .submit(ActionRequest::edit_game(id), &no_confirmation)
            .await
    }

    pub async fn delete_game<C>(&self, id: EntityId, confirm: &C) -> ActionOutcome
    where
        C: Confirm + Sync + ?Sized,
    {
        self.gateway
            .submit(ActionRequest::delete_game(id), confirm)
            .await
    }

    pub async fn update_request_status(&self, id: EntityId, status: RequestStatus) -> ActionOutcome {
        self.gateway
            .submit(
                ActionRequest::update_request_status(id, status),
                &no_confirmation,
            )
            .await
    }

    /// Validate and submit the public request form. Validation failures are
    /// shown as an error notification and nothing is sent.
    pub async fn submit_catalog_request(&self) -> ActionOutcome {
        let form = self.state.lock().request_form.clone();
        match ActionRequest::submit_catalog_request(&form) {
            Ok(request) => self.gateway.submit(request, &no_confirmation).await,
            Err(e) => {
                let message = e.to_string();
                self.state
                    .lock()
                    .notifications
                    .notify(message.clone(), Severity::Error);
                ActionOutcome::Invalid(message)
            }
        }
    }

    /// Look up a game's download link
    pub async fn download_game(&self, id: EntityId) -> DownloadOutcome {
        let busy = BusyGuard::acquire(&self.state, Control::Download(id));
        let result = self
            .transport
            .send(ApiRequest::get(endpoints::game_detail(id)))
            .await;
        drop(busy);

        let link = match result {
            Ok(response) if response.is_success() => match response.parse::<Game>() {
                Ok(game) if !game.download_link.is_empty() => Some(game.download_link),
                Ok(_) => {
                    tracing::warn!("game {id} has no download link");
                    None
                }
                Err(e) => {
                    tracing::warn!("game {id}: {e}");
                    None
                }
            },
            Ok(response) => {
                tracing::warn!("game {id} lookup failed with status {}", response.status);
                None
            }
            Err(e) => {
                tracing::error!("game {id} lookup failed: {e}");
                None
            }
        };

        let mut state = self.state.lock();
        match link {
            Some(link) => {
                state
                    .notifications
                    .notify(DOWNLOAD_STARTED_MESSAGE, Severity::Success);
                DownloadOutcome::Started(link)
            }
            None => {
                state
                    .notifications
                    .notify(DOWNLOAD_ERROR_MESSAGE, Severity::Error);
                DownloadOutcome::Failed
            }
        }
    }

    // Refresh

    pub async fn refresh_now(&self) -> Result<CatalogSnapshot> {
        self.refresh.refresh_now().await
    }

    /// Wait for every refresh scheduled by a completed action
    pub async fn wait_for_refresh(&self) {
        self.refresh.wait_scheduled().await;
    }
}

fn no_confirmation(_: &str) -> bool {
    true
}

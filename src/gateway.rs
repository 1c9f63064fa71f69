//! Uniform request/feedback protocol for mutating actions
//!
//! Every create/update/delete goes through [`ActionGateway::submit`]:
//!
//! 1. destructive actions ask for confirmation first; a refusal ends the
//!    flow with no request and no notification
//! 2. exactly one request is sent
//! 3. the JSON body is read whatever the status, its `message` is shown
//! 4. on success: success notification, action-specific UI cleanup, then a
//!    refresh scheduled after a fixed delay
//! 5. on a server rejection: error notification with the server's message,
//!    nothing else changes so the user can retry
//! 6. on a transport failure: a generic error notification, nothing else
//!
//! Concurrent duplicate submissions are not deduplicated.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::api::{ActionReply, EntityId, RequestStatus, endpoints};
use crate::error::Result;
use crate::forms::{GameForm, RequestForm};
use crate::notify::Severity;
use crate::refresh::RefreshScheduler;
use crate::state::{BusyGuard, Control, SharedState};
use crate::transport::{ApiRequest, Method, Transport};
use crate::validation::{validate_optional_email, validate_request_title};
use crate::view_state::{ADD_GAME_MODAL, ModalId};

pub const ADD_REFRESH_DELAY: Duration = Duration::from_millis(1500);
pub const MUTATION_REFRESH_DELAY: Duration = Duration::from_millis(1000);

pub const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this game?";
pub const EDIT_STUB_MESSAGE: &str = "Edit feature coming soon";
const SUCCESS_FALLBACK_MESSAGE: &str = "Done";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Add,
    Edit,
    Delete,
    UpdateStatus,
    SubmitRequest,
}

impl ActionKind {
    pub fn is_destructive(self) -> bool {
        matches!(self, ActionKind::Delete)
    }
}

/// A mutating action captured at submission time. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    kind: ActionKind,
    target_id: Option<EntityId>,
    payload: Map<String, Value>,
}

impl ActionRequest {
    pub fn add_game(form: &GameForm) -> Self {
        Self {
            kind: ActionKind::Add,
            target_id: None,
            payload: form.to_payload(),
        }
    }

    pub fn edit_game(id: EntityId) -> Self {
        Self {
            kind: ActionKind::Edit,
            target_id: Some(id),
            payload: Map::new(),
        }
    }

    pub fn delete_game(id: EntityId) -> Self {
        Self {
            kind: ActionKind::Delete,
            target_id: Some(id),
            payload: Map::new(),
        }
    }

    pub fn update_request_status(id: EntityId, status: RequestStatus) -> Self {
        let mut payload = Map::new();
        payload.insert("status".into(), Value::from(status.to_string()));
        Self {
            kind: ActionKind::UpdateStatus,
            target_id: Some(id),
            payload,
        }
    }

    /// Validates the form; the title is trimmed and a blank email is sent
    /// as `null`.
    pub fn submit_catalog_request(form: &RequestForm) -> Result<Self> {
        let title = validate_request_title(&form.game_title)?;
        let email = validate_optional_email(&form.user_email)?;

        let mut payload = Map::new();
        payload.insert("game_title".into(), Value::from(title));
        payload.insert(
            "user_email".into(),
            email.map(Value::from).unwrap_or(Value::Null),
        );
        Ok(Self {
            kind: ActionKind::SubmitRequest,
            target_id: None,
            payload,
        })
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn target_id(&self) -> Option<EntityId> {
        self.target_id
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    fn control(&self) -> Option<Control> {
        match (self.kind, self.target_id) {
            (ActionKind::Add, _) => Some(Control::AddGameSubmit),
            (ActionKind::SubmitRequest, _) => Some(Control::RequestSubmit),
            (ActionKind::Delete, Some(id)) => Some(Control::DeleteGame(id)),
            (ActionKind::UpdateStatus, Some(id)) => Some(Control::RequestStatus(id)),
            _ => None,
        }
    }

    /// How this action talks to the backend. `None` for the edit stub.
    pub fn plan(&self, delays: &RefreshDelays) -> Option<ActionPlan> {
        let body = || Some(Value::Object(self.payload.clone()));
        let plan = match (self.kind, self.target_id) {
            (ActionKind::Add, _) => ActionPlan {
                method: Method::POST,
                endpoint: endpoints::ADD_GAME.to_string(),
                payload: body(),
                success_ui: SuccessUi::CloseAddGameModal,
                requires_success_flag: false,
                rejection_fallback: "Error adding game",
                transport_failure_message: "Error adding game",
                refresh_after: Some(delays.add),
            },
            (ActionKind::Delete, Some(id)) => ActionPlan {
                method: Method::DELETE,
                endpoint: endpoints::delete_game(id),
                payload: None,
                success_ui: SuccessUi::None,
                requires_success_flag: false,
                rejection_fallback: "Error deleting game",
                transport_failure_message: "Error deleting game",
                refresh_after: Some(delays.mutation),
            },
            (ActionKind::UpdateStatus, Some(id)) => ActionPlan {
                method: Method::PUT,
                endpoint: endpoints::update_request(id),
                payload: body(),
                success_ui: SuccessUi::None,
                requires_success_flag: false,
                rejection_fallback: "Error updating request",
                transport_failure_message: "Error updating request",
                refresh_after: Some(delays.mutation),
            },
            (ActionKind::SubmitRequest, _) => ActionPlan {
                method: Method::POST,
                endpoint: endpoints::REQUEST_GAME.to_string(),
                payload: body(),
                success_ui: SuccessUi::ResetRequestForm,
                requires_success_flag: true,
                rejection_fallback: "Error submitting request",
                transport_failure_message: "Error submitting request. Please try again.",
                refresh_after: None,
            },
            (ActionKind::Edit, _) | (ActionKind::Delete | ActionKind::UpdateStatus, None) => {
                return None;
            }
        };
        Some(plan)
    }
}

/// UI cleanup performed only after a successful action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessUi {
    None,
    /// Close the add-game dialog and clear its form
    CloseAddGameModal,
    ResetRequestForm,
}

#[derive(Debug, Clone)]
pub struct ActionPlan {
    pub method: Method,
    pub endpoint: String,
    pub payload: Option<Value>,
    pub success_ui: SuccessUi,
    /// Success also needs `"success": true` in the body
    pub requires_success_flag: bool,
    /// Shown when a rejection carries no `message`
    pub rejection_fallback: &'static str,
    pub transport_failure_message: &'static str,
    pub refresh_after: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshDelays {
    pub add: Duration,
    pub mutation: Duration,
}

impl Default for RefreshDelays {
    fn default() -> Self {
        Self {
            add: ADD_REFRESH_DELAY,
            mutation: MUTATION_REFRESH_DELAY,
        }
    }
}

/// Asks the user to confirm a destructive action
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The user refused the confirmation prompt
    Declined,
    /// Client-side validation failed; nothing was sent
    Invalid(String),
    /// The action is not implemented yet
    Stubbed,
    Succeeded {
        message: String,
        refresh_scheduled: bool,
    },
    /// The server answered with a failure
    Rejected { status: u16, message: String },
    /// No usable response reached the client
    TransportFailed(String),
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded { .. })
    }
}

pub struct ActionGateway<T: Transport> {
    transport: Arc<T>,
    state: SharedState,
    refresh: RefreshScheduler<T>,
    delays: RefreshDelays,
}

impl<T: Transport> ActionGateway<T> {
    pub fn new(
        transport: Arc<T>,
        state: SharedState,
        refresh: RefreshScheduler<T>,
        delays: RefreshDelays,
    ) -> Self {
        Self {
            transport,
            state,
            refresh,
            delays,
        }
    }

    /// Run one action through the protocol described in the module docs
    pub async fn submit<C>(&self, request: ActionRequest, confirm: &C) -> ActionOutcome
    where
        C: Confirm + Sync + ?Sized,
    {
        if request.kind().is_destructive() && !confirm.confirm(DELETE_CONFIRM_PROMPT) {
            tracing::debug!("{:?} declined by user", request.kind());
            return ActionOutcome::Declined;
        }

        let Some(plan) = request.plan(&self.delays) else {
            self.state
                .lock()
                .notifications
                .notify(EDIT_STUB_MESSAGE, Severity::Info);
            return ActionOutcome::Stubbed;
        };

        let busy = request
            .control()
            .map(|control| BusyGuard::acquire(&self.state, control));

        let mut api_request = ApiRequest::new(plan.method.clone(), plan.endpoint.clone());
        if let Some(payload) = &plan.payload {
            api_request = api_request.with_body(payload.clone());
        }

        let result = self.transport.send(api_request).await;
        drop(busy);

        match result {
            Ok(response) => {
                let reply: ActionReply = response.parse().unwrap_or_default();
                let accepted = response.is_success()
                    && (!plan.requires_success_flag || reply.success == Some(true));
                if accepted {
                    self.accept(&plan, reply.message)
                } else {
                    self.reject(&plan, response.status, reply.message)
                }
            }
            Err(e) => {
                tracing::error!("{} {} failed: {e}", plan.method, plan.endpoint);
                self.state
                    .lock()
                    .notifications
                    .notify(plan.transport_failure_message, Severity::Error);
                ActionOutcome::TransportFailed(e.to_string())
            }
        }
    }

    fn accept(&self, plan: &ActionPlan, message: Option<String>) -> ActionOutcome {
        let message = message.unwrap_or_else(|| SUCCESS_FALLBACK_MESSAGE.to_string());
        {
            let mut state = self.state.lock();
            state
                .notifications
                .notify(message.clone(), Severity::Success);
            match plan.success_ui {
                SuccessUi::None => {}
                SuccessUi::CloseAddGameModal => {
                    state.view.close_modal(&ModalId::from(ADD_GAME_MODAL));
                    state.add_game_form.reset();
                }
                SuccessUi::ResetRequestForm => state.request_form.reset(),
            }
        }

        // Scheduled after the notification, never immediate
        if let Some(delay) = plan.refresh_after {
            self.refresh.schedule(delay);
        }

        ActionOutcome::Succeeded {
            message,
            refresh_scheduled: plan.refresh_after.is_some(),
        }
    }

    fn reject(&self, plan: &ActionPlan, status: u16, message: Option<String>) -> ActionOutcome {
        let message = message.unwrap_or_else(|| plan.rejection_fallback.to_string());
        tracing::warn!("{} {} rejected ({status}): {message}", plan.method, plan.endpoint);
        self.state
            .lock()
            .notifications
            .notify(message.clone(), Severity::Error);
        ActionOutcome::Rejected { status, message }
    }
}

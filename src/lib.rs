pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod forms;
pub mod gateway;
pub mod logging;
pub mod navigation;
pub mod notify;
pub mod refresh;
pub mod search;
pub mod state;
pub mod transport;
pub mod validation;
pub mod view_state;

#[cfg(test)]
mod test_guards;

pub use api::{EntityId, RequestStatus, SearchHit};
pub use config::ClientConfig;
pub use coordinator::{Coordinator, CoordinatorSettings, DownloadOutcome};
pub use error::{ArcaloadError, Result};
pub use gateway::{ActionOutcome, ActionRequest, Confirm};
pub use notify::{Notification, Severity};
pub use state::{SharedState, UiSnapshot, UiState};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
pub use view_state::{Key, ModalId, NavItemId, PointerTarget, TabId, ViewState};

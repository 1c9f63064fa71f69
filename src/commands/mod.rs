mod actions;
mod catalog;
mod config;
mod search;

pub use actions::{cmd_add, cmd_delete, cmd_edit, cmd_request, cmd_status};
pub use catalog::{cmd_download, cmd_refresh};
pub use config::{cmd_config_path, cmd_config_show};
pub use search::cmd_search;

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::Value;

use crate::cli::GlobalArgs;
use crate::config::ClientConfig;
use crate::coordinator::Coordinator;
use crate::error::Result;
use crate::gateway::Confirm;
use crate::notify::{Notification, Severity};
use crate::transport::HttpTransport;
use crate::view_state::ViewState;

/// Result of a command: a JSON document plus an optional human rendering
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output_json: bool) -> Result<()> {
        match (output_json, self.text) {
            (false, Some(text)) => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One notification as a coloured terminal line
pub fn format_notification(notification: &Notification) -> String {
    match notification.severity {
        Severity::Success => format!("{} {}", "✓".green(), notification.message),
        Severity::Error => format!("{} {}", "✗".red(), notification.message.red()),
        Severity::Info => format!("{} {}", "i".blue(), notification.message),
    }
}

/// Load config, apply `--base-url`, and build a coordinator over HTTP
pub(crate) fn connect(global: &GlobalArgs) -> Result<(ClientConfig, Coordinator<HttpTransport>)> {
    let mut config = ClientConfig::load()?;
    if let Some(base_url) = &global.base_url {
        config.base_url = base_url.clone();
    }

    let transport = HttpTransport::new(&config.base_url, config.request_timeout())?;
    let coordinator = Coordinator::new(
        Arc::new(transport),
        ViewState::admin_dashboard(),
        config.coordinator_settings(),
    );
    Ok((config, coordinator))
}

/// Confirmation read from stdin, skipped with `--yes`. The prompt is only
/// printed when stdin is a terminal; empty input declines.
pub(crate) struct PromptConfirm {
    pub assume_yes: bool,
}

impl Confirm for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let stdin = io::stdin();
        if stdin.is_terminal() {
            print!("{prompt} [y/N] ");
            if io::stdout().flush().is_err() {
                return false;
            }
        }
        read_answer(&mut stdin.lock())
    }
}

fn read_answer(input: &mut impl BufRead) -> bool {
    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

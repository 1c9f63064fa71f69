//! Catalog mutations: add, edit, delete, request status, game requests

use serde_json::json;

use super::{CommandOutput, PromptConfirm, connect, format_notification};
use crate::api::{EntityId, RequestStatus};
use crate::cli::GlobalArgs;
use crate::coordinator::Coordinator;
use crate::error::{ArcaloadError, Result};
use crate::gateway::ActionOutcome;
use crate::notify::Severity;
use crate::transport::Transport;

pub async fn cmd_add(
    global: &GlobalArgs,
    title: &str,
    genre: &str,
    description: &str,
    cover: &str,
    link: &str,
) -> Result<()> {
    let (_, coordinator) = connect(global)?;
    coordinator.open_add_game_modal();
    coordinator.update_add_game_form(|form| {
        form.title = title.to_string();
        form.genre = genre.to_string();
        form.description = description.to_string();
        form.cover_image_url = cover.to_string();
        form.download_link = link.to_string();
    });

    let outcome = coordinator.submit_add_game().await;
    finish(&coordinator, "add", None, outcome, global.json).await
}

pub async fn cmd_edit(global: &GlobalArgs, id: EntityId) -> Result<()> {
    let (_, coordinator) = connect(global)?;
    let outcome = coordinator.edit_game(id).await;
    finish(&coordinator, "edit", Some(id), outcome, global.json).await
}

pub async fn cmd_delete(global: &GlobalArgs, id: EntityId, yes: bool) -> Result<()> {
    let (_, coordinator) = connect(global)?;
    let confirm = PromptConfirm { assume_yes: yes };
    let outcome = coordinator.delete_game(id, &confirm).await;
    finish(&coordinator, "delete", Some(id), outcome, global.json).await
}

pub async fn cmd_status(global: &GlobalArgs, id: EntityId, status: RequestStatus) -> Result<()> {
    let (_, coordinator) = connect(global)?;
    let outcome = coordinator.update_request_status(id, status).await;
    finish(&coordinator, "update_status", Some(id), outcome, global.json).await
}

pub async fn cmd_request(global: &GlobalArgs, title: &str, email: Option<&str>) -> Result<()> {
    let (_, coordinator) = connect(global)?;
    coordinator.update_request_form(|form| {
        form.game_title = title.to_string();
        form.user_email = email.unwrap_or_default().to_string();
    });

    let outcome = coordinator.submit_catalog_request().await;
    finish(&coordinator, "request", None, outcome, global.json).await
}

/// Wait for any scheduled refresh, then report the outcome. Failures become
/// the command's error so `main` prints them once.
async fn finish<T: Transport>(
    coordinator: &Coordinator<T>,
    action: &str,
    id: Option<EntityId>,
    outcome: ActionOutcome,
    output_json: bool,
) -> Result<()> {
    match outcome {
        ActionOutcome::Succeeded {
            message,
            refresh_scheduled,
        } => {
            if refresh_scheduled {
                coordinator.wait_for_refresh().await;
            }
            let snapshot = coordinator.snapshot();

            let mut lines: Vec<String> = snapshot
                .notifications
                .iter()
                .map(format_notification)
                .collect();
            if let Some(catalog) = &snapshot.catalog {
                lines.push(format!(
                    "Catalog: {} games, {} requests ({} pending)",
                    catalog.stats.total_games,
                    catalog.stats.total_requests,
                    catalog.stats.pending_requests
                ));
            }
            let refresh_failed = snapshot
                .notifications
                .iter()
                .any(|n| n.severity == Severity::Error);

            CommandOutput::new(json!({
                "action": action,
                "id": id,
                "success": true,
                "message": message,
                "refreshed": snapshot.refresh_count > 0,
                "refresh_failed": refresh_failed,
                "stats": snapshot.catalog.as_ref().map(|c| &c.stats),
            }))
            .with_text(lines.join("\n"))
            .print(output_json)
        }
        ActionOutcome::Declined => CommandOutput::new(json!({
            "action": action,
            "id": id,
            "success": false,
            "declined": true,
        }))
        .with_text("Cancelled")
        .print(output_json),
        ActionOutcome::Stubbed => {
            let snapshot = coordinator.snapshot();
            let message = snapshot
                .notifications
                .last()
                .map(|n| n.message.clone())
                .unwrap_or_default();
            CommandOutput::new(json!({
                "action": action,
                "id": id,
                "success": false,
                "message": message,
            }))
            .with_text(
                snapshot
                    .notifications
                    .iter()
                    .map(format_notification)
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
            .print(output_json)
        }
        ActionOutcome::Invalid(message) => Err(ArcaloadError::Validation(message)),
        ActionOutcome::Rejected { status, message } => {
            Err(ArcaloadError::Server { status, message })
        }
        ActionOutcome::TransportFailed(detail) => Err(ArcaloadError::Transport(detail)),
    }
}

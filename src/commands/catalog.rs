//! Read-only catalog commands: download links and full refreshes

use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{CommandOutput, connect};
use crate::api::EntityId;
use crate::cli::GlobalArgs;
use crate::coordinator::{DOWNLOAD_ERROR_MESSAGE, DownloadOutcome};
use crate::error::{ArcaloadError, Result};
use crate::refresh::CatalogSnapshot;

#[derive(Tabled)]
struct GameRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Genre")]
    genre: String,
    #[tabled(rename = "Downloads")]
    downloads: u64,
}

#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Requested title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Email")]
    email: String,
}

pub async fn cmd_download(global: &GlobalArgs, id: EntityId) -> Result<()> {
    let (_, coordinator) = connect(global)?;

    match coordinator.download_game(id).await {
        DownloadOutcome::Started(link) => CommandOutput::new(json!({
            "id": id,
            "download_link": link,
        }))
        .with_text(link)
        .print(global.json),
        DownloadOutcome::Failed => Err(ArcaloadError::Other(DOWNLOAD_ERROR_MESSAGE.to_string())),
    }
}

pub async fn cmd_refresh(global: &GlobalArgs) -> Result<()> {
    let (_, coordinator) = connect(global)?;
    let snapshot = coordinator.refresh_now().await?;

    CommandOutput::new(json!({
        "games": &snapshot.games,
        "requests": &snapshot.requests,
        "stats": &snapshot.stats,
        "fetched_at": snapshot.fetched_at.to_string(),
    }))
    .with_text(render_snapshot(&snapshot))
    .print(global.json)
}

fn render_snapshot(snapshot: &CatalogSnapshot) -> String {
    let stats = &snapshot.stats;
    let mut out = format!(
        "{} games, {} downloads, {} requests ({} pending)\n",
        stats.total_games, stats.total_downloads, stats.total_requests, stats.pending_requests
    );

    if snapshot.games.games.is_empty() {
        out.push_str("\nNo games in the catalog.\n");
    } else {
        let rows: Vec<GameRow> = snapshot
            .games
            .games
            .iter()
            .map(|game| GameRow {
                id: game.id.to_string(),
                title: game.title.clone(),
                genre: game.genre.clone(),
                downloads: game.downloads,
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        out.push_str(&format!("\n{table}\n"));
    }

    if !snapshot.requests.requests.is_empty() {
        let rows: Vec<RequestRow> = snapshot
            .requests
            .requests
            .iter()
            .map(|request| RequestRow {
                id: request.id.to_string(),
                title: request.game_title.clone(),
                status: request.status.to_string(),
                email: request.user_email.clone().unwrap_or_default(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        out.push_str(&format!("\n{table}\n"));
    }

    out.push_str(&format!("\nFetched at {}", snapshot.fetched_at));
    out
}

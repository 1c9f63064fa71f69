//! Catalog search command
//!
//! Feeds the text through the same debounced pipeline the interactive UI
//! uses, waits for it to settle, and prints whatever the results panel ends
//! up showing.

use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{CommandOutput, connect};
use crate::cli::GlobalArgs;
use crate::error::{ArcaloadError, Result};
use crate::notify::Severity;
use crate::search::PanelContent;

#[derive(Tabled)]
struct SearchResultRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Genre")]
    genre: String,
    #[tabled(rename = "Link")]
    link: String,
}

pub async fn cmd_search(global: &GlobalArgs, text: &str) -> Result<()> {
    let (config, coordinator) = connect(global)?;

    coordinator.on_search_input(text);
    coordinator.search_settled().await;
    let snapshot = coordinator.snapshot();

    if let Some(failure) = snapshot
        .notifications
        .iter()
        .find(|n| n.severity == Severity::Error)
    {
        return Err(ArcaloadError::Other(failure.message.clone()));
    }

    let results = &snapshot.results;
    if !results.is_visible() {
        return CommandOutput::new(json!({
            "query": text,
            "results": [],
            "searched": false,
        }))
        .with_text(format!(
            "Type at least {} characters to search.",
            config.min_query_len
        ))
        .print(global.json);
    }

    let rows = results.rows();
    let json_rows: Vec<_> = rows
        .iter()
        .map(|row| {
            json!({
                "id": row.id,
                "title": row.title,
                "genre": row.genre,
                "link": row.link.to_string(),
            })
        })
        .collect();

    let text_output = match results.content() {
        PanelContent::Rows(rows) => {
            let table_rows: Vec<SearchResultRow> = rows
                .iter()
                .map(|row| SearchResultRow {
                    id: row.id.to_string(),
                    title: row.title.clone(),
                    genre: row.genre.clone(),
                    link: row.link.to_string(),
                })
                .collect();
            let mut table = Table::new(table_rows);
            table.with(Style::rounded());
            table.to_string()
        }
        PanelContent::Empty(message) => message.clone(),
        PanelContent::Blank => String::new(),
    };

    CommandOutput::new(json!({
        "query": text,
        "results": json_rows,
        "searched": true,
    }))
    .with_text(text_output)
    .print(global.json)
}

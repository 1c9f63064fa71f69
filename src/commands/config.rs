use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::GlobalArgs;
use crate::config::ClientConfig;
use crate::error::Result;

/// Show the effective configuration (file, environment and `--base-url`)
pub fn cmd_config_show(global: &GlobalArgs) -> Result<()> {
    let mut config = ClientConfig::load()?;
    if let Some(base_url) = &global.base_url {
        config.base_url = base_url.clone();
    }
    let path = ClientConfig::config_path();

    let mut text = format!("{}\n", "Configuration:".bold());
    text.push_str(&format!(
        "  file: {}\n",
        path.as_ref()
            .filter(|p| p.exists())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "not found, using defaults".dimmed().to_string())
    ));
    for line in config.to_yaml()?.lines() {
        text.push_str(&format!("  {line}\n"));
    }

    CommandOutput::new(json!({
        "path": path.map(|p| p.display().to_string()),
        "config": config,
    }))
    .with_text(text.trim_end())
    .print(global.json)
}

pub fn cmd_config_path(global: &GlobalArgs) -> Result<()> {
    let path = ClientConfig::config_path();
    let text = path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "cannot determine config directory".to_string());

    CommandOutput::new(json!({ "path": path.map(|p| p.display().to_string()) }))
        .with_text(text)
        .print(global.json)
}

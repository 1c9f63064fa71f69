use clap::Parser;
use std::process::ExitCode;

use arcaload::cli::{Cli, Commands, ConfigAction};
use arcaload::commands::{
    cmd_add, cmd_config_path, cmd_config_show, cmd_delete, cmd_download, cmd_edit, cmd_refresh,
    cmd_request, cmd_search, cmd_status,
};
use arcaload::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);
    let global = &cli.global;

    let result = match cli.command {
        Commands::Search { text } => cmd_search(global, &text).await,
        Commands::Add {
            title,
            genre,
            description,
            cover,
            link,
        } => cmd_add(global, &title, &genre, &description, &cover, &link).await,
        Commands::Edit { id } => cmd_edit(global, id).await,
        Commands::Delete { id, yes } => cmd_delete(global, id, yes).await,
        Commands::Status { id, status } => cmd_status(global, id, status).await,
        Commands::Request { title, email } => cmd_request(global, &title, email.as_deref()).await,
        Commands::Download { id } => cmd_download(global, id).await,
        Commands::Refresh => cmd_refresh(global).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(global),
            ConfigAction::Path => cmd_config_path(global),
        },
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

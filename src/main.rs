use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use helpdesk::cli::{Cli, Commands, ConfigAction};
use helpdesk::commands::{
    CreateOptions, cmd_config_get, cmd_config_set, cmd_config_show, cmd_create, cmd_delete,
    cmd_ls, cmd_update,
};

const LOG_ENV: &str = "HELPDESK_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ls {
            page,
            filters,
            json,
        } => cmd_ls(page, filters.to_filters(), json).await,

        Commands::Update {
            id,
            properties,
            page,
            json,
        } => cmd_update(id, properties.to_properties(), page, json).await,

        Commands::Create {
            title,
            ticket_type,
            category,
            description,
            attach,
            json,
        } => {
            cmd_create(
                CreateOptions {
                    title,
                    ticket_type,
                    category,
                    description,
                    attach,
                },
                json,
            )
            .await
        }

        Commands::Delete { id, force, json } => cmd_delete(id, force, json).await,

        Commands::Config { action } => match action {
            ConfigAction::Show { json } => cmd_config_show(json),
            ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
            ConfigAction::Get { key, json } => cmd_config_get(&key, json),
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

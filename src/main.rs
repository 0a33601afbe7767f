mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, IssueCommands};
use commands::Session;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ghi::backend::github::GitHubBackend;
use ghi::config;
use ghi::criteria::ListFlags;
use ghi::types::{IssueState, NewIssue};

/// Diagnostics go to stderr; RUST_LOG overrides the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "ghi=debug" } else { "ghi=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Auth { access_token } => {
            commands::auth(&access_token)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Issues(command) => run(command, cli.token.as_deref()).await,
    }
}

async fn run(command: IssueCommands, token_flag: Option<&str>) -> Result<ExitCode> {
    let token = match config::load_token(token_flag) {
        Ok(token) => token,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let session = Session::new(GitHubBackend::new(&token)?, working_dir);

    match command {
        IssueCommands::List {
            all,
            repo,
            user,
            relation,
            state,
        } => {
            let flags = ListFlags {
                repo,
                user,
                relation,
                state,
                all,
            };
            commands::list(&session, flags).await
        }

        IssueCommands::View { issue } => commands::view(&session, &issue).await,

        IssueCommands::New {
            title,
            repo,
            body,
            assignees,
            labels,
        } => {
            let issue = NewIssue {
                title,
                body,
                assignees,
                labels,
            };
            commands::new(&session, repo.as_deref(), issue).await
        }

        IssueCommands::Close { issue, comment } => {
            commands::set_state(&session, &issue, IssueState::Closed, comment.as_deref()).await
        }

        IssueCommands::Open { issue, comment } => {
            commands::set_state(&session, &issue, IssueState::Open, comment.as_deref()).await
        }
    }
}

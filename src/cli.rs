use clap::{Parser, Subcommand};

use ghi::parser::{validate_reference, validate_repository};
use ghi::types::{Relation, StateFilter};

#[derive(Parser, Debug)]
#[command(name = "ghi", version)]
#[command(about = "A command line utility to manage GitHub Issues", long_about = None)]
pub struct Cli {
    /// GitHub personal access token (can be set via GITHUB_TOKEN env var)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a personal access token for later use
    Auth {
        /// GitHub personal access token
        #[arg(value_name = "TOKEN")]
        access_token: String,
    },

    #[command(flatten)]
    Issues(IssueCommands),
}

/// Commands that talk to GitHub and need a token
#[derive(Subcommand, Debug)]
pub enum IssueCommands {
    /// List GitHub issues
    List {
        /// Display all issues, regardless of user
        #[arg(long)]
        all: bool,

        /// Repository to limit the issues to (owner/repo). Defaults to the repository in the current folder
        #[arg(long, value_parser = validate_repository)]
        repo: Option<String>,

        /// User the issues are related to. Defaults to the authenticated user
        #[arg(long)]
        user: Option<String>,

        /// Relation of the issues to the user
        #[arg(short = 'R', long = "rel", value_enum, ignore_case = true, default_value_t = Relation::Assigned)]
        relation: Relation,

        /// State of the issues
        #[arg(long, value_enum, ignore_case = true, default_value_t = StateFilter::Open)]
        state: StateFilter,
    },

    /// View details of a specific issue
    View {
        /// Issue reference (owner/repo#123, or just 123 inside a repository)
        #[arg(value_parser = validate_reference)]
        issue: String,
    },

    /// Create a new issue
    New {
        /// Title of the issue
        title: String,

        /// Repository to create the issue in (owner/repo). Defaults to the repository in the current folder
        #[arg(long, value_parser = validate_repository)]
        repo: Option<String>,

        /// Body of the issue
        #[arg(long)]
        body: Option<String>,

        /// User(s) to assign to the issue
        #[arg(long = "assign")]
        assignees: Vec<String>,

        /// Label(s) to add to the issue
        #[arg(long = "label")]
        labels: Vec<String>,
    },

    /// Close an issue
    Close {
        /// Issue reference (owner/repo#123, or just 123 inside a repository)
        #[arg(value_parser = validate_reference)]
        issue: String,

        /// Comment to add when closing the issue
        #[arg(long)]
        comment: Option<String>,
    },

    /// Re-open a closed issue
    Open {
        /// Issue reference (owner/repo#123, or just 123 inside a repository)
        #[arg(value_parser = validate_reference)]
        issue: String,

        /// Comment to add when re-opening the issue
        #[arg(long)]
        comment: Option<String>,
    },
}

//! aad-facade - Azure AD directory reader
//!
//! Pulls users, groups, service principals and applications from Microsoft
//! Graph for security audits.

mod api;
mod auth;
mod commands;
mod config;
mod facade;
mod models;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::Query;
use config::Config;

#[derive(Parser)]
#[command(name = "aad-facade")]
#[command(about = "Azure AD directory reader for security audits", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Fail with an error instead of printing empty results
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Store tenant and app credentials
    Configure {
        /// Azure AD tenant ID or domain
        #[arg(long)]
        tenant: Option<String>,

        /// App registration client ID
        #[arg(long)]
        client_id: Option<String>,

        /// App registration client secret
        #[arg(long)]
        client_secret: Option<String>,

        /// Pre-issued Graph access token (overrides the client secret)
        #[arg(long)]
        access_token: Option<String>,

        /// Graph API root (default https://graph.microsoft.com)
        #[arg(long)]
        graph_endpoint: Option<String>,

        /// Azure AD authority root (default https://login.microsoftonline.com)
        #[arg(long)]
        login_endpoint: Option<String>,

        /// HTTP request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Show effective configuration
    Status,

    /// List guest users
    Users,

    /// Look up a single user by id
    User {
        /// User object id
        user_id: String,
    },

    /// List groups
    Groups,

    /// List the groups whose ids appear in the given argument
    UserGroups {
        /// Group object id(s)
        group_id: String,
    },

    /// List service principals
    ServicePrincipals,

    /// List app registrations
    Applications,

    /// Fetch users, groups, service principals and applications together
    Snapshot,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr, so stdout stays valid JSON)
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let query = match cli.command {
        Commands::Configure {
            tenant,
            client_id,
            client_secret,
            access_token,
            graph_endpoint,
            login_endpoint,
            timeout,
        } => {
            return commands::configure(Config {
                tenant_id: tenant,
                client_id,
                client_secret,
                access_token,
                graph_endpoint,
                login_endpoint,
                timeout_secs: timeout,
            });
        }
        Commands::Status => return commands::status(),
        Commands::Users => Query::Users,
        Commands::User { user_id } => Query::User(user_id),
        Commands::Groups => Query::Groups,
        Commands::UserGroups { group_id } => Query::UserGroups(group_id),
        Commands::ServicePrincipals => Query::ServicePrincipals,
        Commands::Applications => Query::Applications,
        Commands::Snapshot => Query::Snapshot,
    };

    commands::run(query, cli.strict).await
}

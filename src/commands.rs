//! CLI command implementations

use anyhow::{Context, Result};
use serde_json::Value;

use crate::api::{DirectoryQuery, GraphRequest};
use crate::auth::CredentialSource;
use crate::config::Config;
use crate::facade::{DirectoryError, DirectoryFacade, DirectoryResult, TracingReporter};

/// Which directory read to run.
#[derive(Debug, Clone)]
pub enum Query {
    Users,
    User(String),
    Groups,
    UserGroups(String),
    ServicePrincipals,
    Applications,
    Snapshot,
}

/// Build a facade from stored config and environment.
fn build_facade(config: &Config) -> Result<DirectoryFacade<GraphRequest<CredentialSource>>> {
    let credentials = CredentialSource::from_config(config)
        .context("No usable credentials. Run 'aad-facade configure' first.")?;
    tracing::debug!("Authenticating with {}", credentials.kind());

    let request = GraphRequest::new(credentials, config.graph_endpoint()?, config.timeout())
        .context("Failed to build HTTP client")?;
    Ok(DirectoryFacade::new(request))
}

/// Run a directory read and print the result as JSON.
///
/// Without `strict`, failures are logged and the empty fallback is printed.
pub async fn run(query: Query, strict: bool) -> Result<()> {
    let config = Config::load()?;
    let facade = build_facade(&config)?;

    tracing::info!("Querying {:?}...", query);
    let output = if strict {
        run_strict(&facade, query).await?
    } else {
        run_lenient(&facade, query).await?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_lenient<Q: DirectoryQuery>(
    facade: &DirectoryFacade<Q>,
    query: Query,
) -> serde_json::Result<Value> {
    let directory = facade.lenient(TracingReporter);
    match query {
        Query::Users => serde_json::to_value(directory.list_users().await),
        Query::User(id) => serde_json::to_value(directory.get_user(&id).await),
        Query::Groups => serde_json::to_value(directory.list_groups().await),
        Query::UserGroups(id) => serde_json::to_value(directory.get_user_groups(&id).await),
        Query::ServicePrincipals => {
            serde_json::to_value(directory.list_service_principals().await)
        }
        Query::Applications => serde_json::to_value(directory.list_applications().await),
        Query::Snapshot => serde_json::to_value(directory.snapshot().await),
    }
}

/// Likely cause for auth-related status codes
fn permission_hint(err: &DirectoryError) -> Option<&'static str> {
    let DirectoryError::Query(e) = err else {
        return None;
    };
    match e.status()? {
        401 => Some("Token was rejected; check the configured credentials"),
        403 => Some("Insufficient privileges; the app needs Directory.Read.All"),
        _ => None,
    }
}

fn surface<T>(outcome: DirectoryResult<T>) -> Result<T> {
    outcome.map_err(|e| {
        if let Some(hint) = permission_hint(&e) {
            tracing::warn!("{}", hint);
        }
        e.into()
    })
}

async fn run_strict<Q: DirectoryQuery>(facade: &DirectoryFacade<Q>, query: Query) -> Result<Value> {
    let value = match query {
        Query::Users => serde_json::to_value(surface(facade.list_users().await)?),
        Query::User(id) => serde_json::to_value(surface(facade.get_user(&id).await)?),
        Query::Groups => serde_json::to_value(surface(facade.list_groups().await)?),
        Query::UserGroups(id) => serde_json::to_value(surface(facade.get_user_groups(&id).await)?),
        Query::ServicePrincipals => {
            serde_json::to_value(surface(facade.list_service_principals().await)?)
        }
        Query::Applications => serde_json::to_value(surface(facade.list_applications().await)?),
        Query::Snapshot => serde_json::to_value(surface(facade.snapshot().await)?),
    };
    Ok(value?)
}

/// Merge the given values into the stored config
pub fn configure(update: Config) -> Result<()> {
    let mut config = Config::load_from(&Config::default_path()?)?;
    config.merge(update);
    config.graph_endpoint()?;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn mask(secret: Option<&str>) -> &'static str {
    match secret {
        Some(s) if !s.is_empty() => "(set)",
        _ => "(none)",
    }
}

/// Display effective configuration (secrets masked)
pub fn status() -> Result<()> {
    let config = Config::load()?;

    println!("Config file:    {}", Config::default_path()?.display());
    println!(
        "Tenant:         {}",
        config.tenant_id.as_deref().unwrap_or("(none)")
    );
    println!(
        "Client ID:      {}",
        config.client_id.as_deref().unwrap_or("(none)")
    );
    println!("Client secret:  {}", mask(config.client_secret.as_deref()));
    println!("Access token:   {}", mask(config.access_token.as_deref()));
    println!("Graph endpoint: {}", config.graph_endpoint()?);
    println!("Login endpoint: {}", config.login_endpoint());
    println!("Timeout:        {}s", config.timeout().as_secs());

    match CredentialSource::from_config(&config) {
        Ok(source) => println!("Credentials:    {}", source.kind()),
        Err(e) => println!("Credentials:    unusable ({})", e),
    }

    Ok(())
}

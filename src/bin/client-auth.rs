//! OAuth client authentication CLI.
//!
//! Loads the registered clients configured through the environment, builds
//! the repository, and runs client authentication attempts against it.
//!
//! ## Usage Examples
//!
//! ```bash
//! # List the configured clients
//! REGISTERED_CLIENTS_PATH=clients.json client-auth list
//!
//! # Authenticate a confidential client
//! client-auth authenticate --client-id messaging-client \
//!   --method client_secret_basic --secret secret \
//!   --param grant_type=client_credentials --param "scope=message.read"
//!
//! # Authenticate a public client with PKCE
//! client-auth authenticate --client-id public-client --method none \
//!   --authorizations authorizations.json \
//!   --param grant_type=authorization_code --param code=abc123 \
//!   --param code_verifier=dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk
//!
//! # Compute an S256 challenge
//! client-auth challenge --verifier dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk
//! ```
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error (configuration, parsing, server error)
//! - 3: Client authentication failed

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use oauth_client_auth::{
    config::{Config, default_registered_client, load_registered_clients},
    errors::OAuthError,
    oauth::{
        AuthorizationRecord, ClientAuthMethod, ClientAuthenticationRequest, ClientAuthenticator,
        MemoryAuthorizationStore, MemoryRegisteredClientRepository, pkce,
    },
};
use serde_json::json;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(
    name = "client-auth",
    about = "OAuth 2.0 client authentication tool",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered clients
    List,
    /// Authenticate a client
    Authenticate(AuthenticateArgs),
    /// Print the S256 code challenge for a verifier
    Challenge(ChallengeArgs),
}

#[derive(Args)]
struct AuthenticateArgs {
    /// Client identifier
    #[arg(long)]
    client_id: String,

    /// Client authentication method (client_secret_basic, client_secret_post, none)
    #[arg(long, default_value = "client_secret_basic")]
    method: ClientAuthMethod,

    /// Client secret
    #[arg(long, env = "CLIENT_SECRET")]
    secret: Option<String>,

    /// Token request parameter as name=value; may be repeated
    #[arg(long = "param", value_parser = parse_parameter)]
    params: Vec<(String, String)>,

    /// JSON file of authorization records to look authorization codes up in
    #[arg(long)]
    authorizations: Option<PathBuf>,
}

#[derive(Args)]
struct ChallengeArgs {
    /// PKCE code verifier
    #[arg(long)]
    verifier: String,
}

fn parse_parameter(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", value))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "oauth_client_auth=debug,info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List => list_clients().await,
        Commands::Authenticate(args) => authenticate(args).await,
        Commands::Challenge(args) => {
            println!("{}", pkce::compute_s256_challenge(&args.verifier));
            Ok(())
        }
    };

    if let Err(err) = result {
        let exit_code = match err.downcast_ref::<OAuthError>() {
            Some(OAuthError::InvalidClient) => 3,
            _ => 1,
        };
        eprintln!("Error: {:#}", err);
        process::exit(exit_code);
    }
}

async fn build_repository(config: &Config) -> Result<MemoryRegisteredClientRepository> {
    let clients = match config.registered_clients_path {
        Some(ref path) => load_registered_clients(path, config).await?,
        None => {
            tracing::warn!("REGISTERED_CLIENTS_PATH not set, using the built-in demo client");
            vec![default_registered_client(config)]
        }
    };
    Ok(MemoryRegisteredClientRepository::new(clients)?)
}

async fn list_clients() -> Result<()> {
    let config = Config::new()?;
    let repository = build_repository(&config).await?;

    let clients: Vec<_> = repository
        .iter()
        .map(|client| {
            let mut methods: Vec<_> = client
                .client_authentication_methods
                .iter()
                .map(|m| m.as_str())
                .collect();
            methods.sort();
            let mut grant_types: Vec<_> = client
                .authorization_grant_types
                .iter()
                .map(|g| g.as_str())
                .collect();
            grant_types.sort();
            let mut scopes: Vec<_> = client.scopes.iter().collect();
            scopes.sort();

            json!({
                "id": client.id,
                "client_id": client.client_id,
                "confidential": client.is_confidential(),
                "client_authentication_methods": methods,
                "authorization_grant_types": grant_types,
                "scopes": scopes,
                "require_proof_key": client.require_proof_key,
                "require_user_consent": client.require_user_consent,
                "access_token_ttl_seconds": client.access_token_ttl.num_seconds(),
                "refresh_token_ttl_seconds": client.refresh_token_ttl.num_seconds(),
                "reuse_refresh_tokens": client.reuse_refresh_tokens,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&clients)?);
    Ok(())
}

async fn authenticate(args: AuthenticateArgs) -> Result<()> {
    let config = Config::new()?;
    let repository = build_repository(&config).await?;

    let authorizations = MemoryAuthorizationStore::new();
    if let Some(ref path) = args.authorizations {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let records: Vec<AuthorizationRecord> = serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        for record in records {
            authorizations.store_authorization(record).await?;
        }
    }

    let authenticator = ClientAuthenticator::new(Arc::new(repository), Arc::new(authorizations));

    let mut request = ClientAuthenticationRequest::new(args.client_id, args.method);
    request.client_secret = args.secret;
    request.additional_parameters.extend(args.params);

    match authenticator.authenticate(&request).await {
        Ok(token) => {
            let output = json!({
                "client_id": token.client_id(),
                "registration_id": token.principal().id,
                "scope": token.scope_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err.to_error_response())?);
            Err(err.into())
        }
    }
}

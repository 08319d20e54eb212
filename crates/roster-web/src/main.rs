//! roster-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the admin UI over HTTP. Unless `backend_url`
//! points at a remote API, the REST API is served from the same process and
//! the UI talks to it without touching the network.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for a `[[users]]` entry:
//!
//! ```
//! cargo run -p roster-web --bin roster-server -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use roster_api::{ApiState, UserDirectory, api_router, auth::hash_password};
use roster_store_sqlite::SqliteStore;
use roster_web::{
  AppState, ServerConfig,
  backend::{HttpBackend, RouterBackend},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Roster admin server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let hash = hash_password(&password)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ROSTER"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let cache_ttl = Duration::from_secs(server_cfg.cache_ttl_secs);

  let app = if server_cfg.backend_url.is_empty() {
    let store_path = expand_tilde(&server_cfg.store_path);
    let store = SqliteStore::open(&store_path)
      .await
      .with_context(|| format!("failed to open store at {store_path:?}"))?;

    if server_cfg.users.is_empty() {
      tracing::warn!("no users configured; every request will be rejected");
    }
    let api = api_router(ApiState {
      store: Arc::new(store),
      users: Arc::new(UserDirectory::new(server_cfg.users.clone())),
    });

    tracing::info!(store = ?store_path, "serving API in-process");
    let backend = RouterBackend::new(api.clone());
    let ui = roster_web::router(AppState::new(backend, cache_ttl));
    ui.merge(api)
  } else {
    let backend = HttpBackend::new(server_cfg.backend_url.as_str())
      .context("failed to build HTTP client")?;
    tracing::info!(backend = %server_cfg.backend_url, "using remote API");
    roster_web::router(AppState::new(backend, cache_ttl))
  };

  let app: Router = app.layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_owned())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

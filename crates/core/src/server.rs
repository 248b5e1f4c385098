use axum::Router;
use log::*;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::config::AppConfig;
use crate::handlers;
use crate::pool::build_pool;

#[derive(Debug, Error)]
pub enum InitError {
  #[error("pool error: {0}")]
  Pool(#[from] deadpool_postgres::BuildError),
  #[error("config error: {0}")]
  Config(#[from] config::ConfigError),
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, Default)]
pub struct ServerOptions {
  pub config: AppConfig,
}

pub struct Server {
  state: AppState,
  router: Router,
}

impl Server {
  /// Builds the pool, the access gate and the router. The database is not
  /// contacted here; the first request (or `/_health`) will surface
  /// connectivity problems.
  pub fn init(options: ServerOptions) -> Result<Server, InitError> {
    let pool = build_pool(&options.config.database)?;
    let state = AppState::new(options.config, pool);

    let router = handlers::router()
      .layer(TraceLayer::new_for_http())
      .layer(CorsLayer::permissive())
      .with_state(state.clone());

    return Ok(Server { state, router });
  }

  /// The assembled router, for tests and embedding into a larger app.
  pub fn into_router(self) -> Router {
    return self.router;
  }

  pub async fn serve(self) -> Result<(), InitError> {
    let address = &self.state.config().server.address;
    let listener = TcpListener::bind(address).await?;

    info!(
      "pgrest listening on {} (database: {})",
      listener.local_addr()?,
      self.state.config().database.dbname
    );

    axum::serve(listener, self.router)
      .with_graceful_shutdown(shutdown_signal())
      .await?;

    return Ok(());
  }
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(err) = tokio::signal::ctrl_c().await {
      warn!("failed to install ctrl-c handler: {err}");
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut signal) => {
        signal.recv().await;
      }
      Err(err) => warn!("failed to install SIGTERM handler: {err}"),
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }

  info!("shutting down");
}

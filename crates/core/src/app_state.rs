use deadpool_postgres::Pool;
use std::sync::Arc;

use crate::access::AccessGate;
use crate::config::AppConfig;

struct InternalState {
  config: AppConfig,
  access: AccessGate,
  pool: Pool,
}

/// Cheap-to-clone per-request state: configuration and the access gate are
/// immutable after construction, the pool is internally synchronized.
#[derive(Clone)]
pub struct AppState {
  state: Arc<InternalState>,
}

impl AppState {
  pub fn new(config: AppConfig, pool: Pool) -> Self {
    let access = AccessGate::new(&config.access);

    return AppState {
      state: Arc::new(InternalState {
        config,
        access,
        pool,
      }),
    };
  }

  pub fn config(&self) -> &AppConfig {
    return &self.state.config;
  }

  pub fn access(&self) -> &AccessGate {
    return &self.state.access;
  }

  pub fn pool(&self) -> &Pool {
    return &self.state.pool;
  }
}

use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

use crate::config::DatabaseConfig;

/// Builds the shared connection pool. Acquisition is scoped to a single
/// statement execution; nothing in this crate holds a connection across
/// requests.
pub(crate) fn build_pool(config: &DatabaseConfig) -> Result<Pool, deadpool_postgres::BuildError> {
  let mut pg_config = tokio_postgres::Config::new();
  pg_config
    .host(&config.host)
    .port(config.port)
    .user(&config.user)
    .dbname(&config.dbname);

  if !config.password.is_empty() {
    pg_config.password(&config.password);
  }

  let manager = Manager::from_config(
    pg_config,
    NoTls,
    ManagerConfig {
      recycling_method: RecyclingMethod::Fast,
    },
  );

  return Pool::builder(manager).max_size(config.pool_size).build();
}

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
  #[serde(default)]
  pub server: ServerConfig,
  #[serde(default)]
  pub database: DatabaseConfig,
  #[serde(default)]
  pub access: AccessConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub address: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    return Self {
      address: "0.0.0.0:3000".to_string(),
    };
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
  pub host: String,
  pub port: u16,
  pub user: String,
  pub password: String,
  pub dbname: String,
  pub pool_size: usize,
}

impl Default for DatabaseConfig {
  fn default() -> Self {
    return Self {
      host: "localhost".to_string(),
      port: 5432,
      user: "postgres".to_string(),
      password: String::new(),
      dbname: "postgres".to_string(),
      pool_size: 10,
    };
  }
}

/// The access-rule table consumed by the gate. With `restrict` off every
/// rule is treated as permissive.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AccessConfig {
  #[serde(default)]
  pub restrict: bool,
  #[serde(default)]
  pub tables: Vec<TableAccess>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TableAccess {
  pub name: String,
  #[serde(default)]
  pub permissions: Vec<PermissionName>,
  pub fields: Option<Vec<String>>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PermissionName {
  Read,
  Write,
  Delete,
}

impl AppConfig {
  /// Loads the TOML file (when present) and applies `PGREST_`-prefixed
  /// environment overrides, e.g. `PGREST_DATABASE__HOST=db.internal`.
  pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
      builder = builder.add_source(File::from(path));
    }

    let config = builder
      .add_source(Environment::with_prefix("PGREST").separator("__"))
      .build()?;

    return config.try_deserialize();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.server.address, "0.0.0.0:3000");
    assert_eq!(config.database.port, 5432);
    assert_eq!(config.database.pool_size, 10);
    assert!(!config.access.restrict);
    assert!(config.access.tables.is_empty());
  }

  #[test]
  fn test_access_table_deserialization() {
    let config: AppConfig = Config::builder()
      .add_source(File::from_str(
        r#"
          [database]
          dbname = "prest"

          [access]
          restrict = true

          [[access.tables]]
          name = "test_readonly_access"
          permissions = ["read"]
          fields = ["id"]
        "#,
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert_eq!(config.database.dbname, "prest");
    assert!(config.access.restrict);

    let table = &config.access.tables[0];
    assert_eq!(table.name, "test_readonly_access");
    assert_eq!(table.permissions, vec![PermissionName::Read]);
    assert_eq!(table.fields, Some(vec!["id".to_string()]));
  }
}

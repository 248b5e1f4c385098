use std::collections::HashMap;

use crate::config::{AccessConfig, PermissionName};
use crate::error::ApiError;

/// Database-operation permissions a table rule can grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
  Read,
  Write,
  Delete,
}

#[derive(Clone, Debug, Default)]
struct TableRule {
  read: bool,
  write: bool,
  delete: bool,
  /// Column whitelist for reads; `None` means all columns.
  fields: Option<Vec<String>>,
}

/// The policy object enforcing per-operation and per-column admission.
/// Built once from configuration and shared immutably across requests.
#[derive(Clone, Debug, Default)]
pub struct AccessGate {
  restrict: bool,
  tables: HashMap<String, TableRule>,
}

impl AccessGate {
  pub fn new(config: &AccessConfig) -> Self {
    let tables = config
      .tables
      .iter()
      .map(|table| {
        let mut rule = TableRule {
          fields: table.fields.clone(),
          ..Default::default()
        };
        for permission in &table.permissions {
          match permission {
            PermissionName::Read => rule.read = true,
            PermissionName::Write => rule.write = true,
            PermissionName::Delete => rule.delete = true,
          }
        }
        return (table.name.clone(), rule);
      })
      .collect();

    return AccessGate {
      restrict: config.restrict,
      tables,
    };
  }

  /// True iff restrict mode is off or the table's rule grants the operation.
  /// A table without a rule grants nothing under restrict.
  pub fn table_allowed(&self, table: &str, permission: Permission) -> bool {
    if !self.restrict {
      return true;
    }

    let Some(rule) = self.tables.get(table) else {
      return false;
    };

    return match permission {
      Permission::Read => rule.read,
      Permission::Write => rule.write,
      Permission::Delete => rule.delete,
    };
  }

  pub fn check(&self, table: &str, permission: Permission) -> Result<(), ApiError> {
    if self.table_allowed(table, permission) {
      return Ok(());
    }

    return Err(ApiError::PermissionDenied);
  }

  /// Rewrites a requested projection against the table's `fields`
  /// whitelist. With restrict off the request passes through unchanged
  /// (wildcard included). An empty result signals "no permitted columns";
  /// there is no error channel here, callers reject upstream.
  pub fn filter_columns(&self, table: &str, requested: &[String]) -> Vec<String> {
    if !self.restrict {
      return requested.to_vec();
    }

    let Some(rule) = self.tables.get(table) else {
      return vec![];
    };

    let Some(ref fields) = rule.fields else {
      return requested.to_vec();
    };

    if requested.iter().any(|column| column == "*") {
      return fields.clone();
    }

    return requested
      .iter()
      .filter(|column| fields.contains(column))
      .cloned()
      .collect();
  }
}

use itertools::Itertools;

use crate::error::TranslateError;
use crate::ident::valid_identifier;

/// `_order=a,-b` becomes `ORDER BY a, b DESC`. A leading `-` marks a column
/// descending; ascending columns are emitted bare. Empty input yields an
/// empty fragment.
pub fn build_order(raw: &str) -> Result<String, TranslateError> {
  if raw.is_empty() {
    return Ok(String::new());
  }

  let columns = raw
    .split(',')
    .map(|token| {
      let token = token.trim();
      let (column, descending) = match token.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (token, false),
      };

      if !valid_identifier(column) {
        return Err(TranslateError::InvalidIdentifier(token.to_string()));
      }

      return Ok(if descending {
        format!("{column} DESC")
      } else {
        column.to_string()
      });
    })
    .collect::<Result<Vec<_>, _>>()?;

  return Ok(format!("ORDER BY {}", columns.iter().join(", ")));
}

/// `_groupby=a,b` becomes `GROUP BY a,b`.
pub fn build_group_by(raw: &str) -> Result<String, TranslateError> {
  if raw.is_empty() {
    return Ok(String::new());
  }

  let columns = raw
    .split(',')
    .map(|token| {
      let token = token.trim();
      if !valid_identifier(token) {
        return Err(TranslateError::InvalidIdentifier(token.to_string()));
      }
      return Ok(token);
    })
    .collect::<Result<Vec<_>, _>>()?;

  return Ok(format!("GROUP BY {}", columns.iter().join(",")));
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_order_empty() {
    assert_eq!(build_order("").unwrap(), "");
  }

  #[test]
  fn test_order_mixed_directions() {
    let clause = build_order("name,-number").unwrap();
    assert!(clause.starts_with("ORDER BY"));
    assert!(clause.contains("name"));
    assert!(clause.contains("number DESC"));
    assert_eq!(clause, "ORDER BY name, number DESC");
  }

  #[test]
  fn test_order_single_descending() {
    assert_eq!(build_order("-created_at").unwrap(), "ORDER BY created_at DESC");
  }

  #[test]
  fn test_order_invalid_column() {
    assert!(build_order("na;me").is_err());
    assert!(build_order("name,-num ber").is_err());
  }

  #[test]
  fn test_group_by() {
    assert_eq!(build_group_by("").unwrap(), "");
    assert_eq!(build_group_by("a,b").unwrap(), "GROUP BY a,b");
    assert!(build_group_by("a,b;c").is_err());
  }
}

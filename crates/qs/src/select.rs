use itertools::Itertools;

use crate::error::TranslateError;
use crate::ident::valid_identifier;

/// `_count` synthesis: empty input yields no fragment, `*` counts rows, any
/// other value counts a vetted column.
pub fn count_clause(raw: &str) -> Result<String, TranslateError> {
  return match raw {
    "" => Ok(String::new()),
    "*" => Ok("SELECT COUNT(*) FROM".to_string()),
    column => {
      if !valid_identifier(column) {
        return Err(TranslateError::InvalidIdentifier(column.to_string()));
      }
      Ok(format!("SELECT COUNT({column}) FROM"))
    }
  };
}

/// Splits `_select` into the requested column list; absent or empty input
/// defaults to the wildcard. Columns are vetted here, before the Access Gate
/// intersects the list with the per-table allow-list.
pub fn select_fields(raw: Option<&str>) -> Result<Vec<String>, TranslateError> {
  let raw = match raw {
    None | Some("") => return Ok(vec!["*".to_string()]),
    Some(raw) => raw,
  };

  return raw
    .split(',')
    .map(|token| {
      let token = token.trim();
      if token == "*" {
        return Ok(token.to_string());
      }
      if !valid_identifier(token) {
        return Err(TranslateError::InvalidIdentifier(token.to_string()));
      }
      return Ok(token.to_string());
    })
    .collect();
}

/// Renders the projection head. An empty list means every requested column
/// was filtered away, which is a client error rather than `SELECT FROM`.
pub fn select_clause(fields: &[String]) -> Result<String, TranslateError> {
  if fields.is_empty() {
    return Err(TranslateError::EmptyProjection);
  }

  return Ok(format!("SELECT {} FROM", fields.iter().join(",")));
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_count() {
    assert_eq!(count_clause("").unwrap(), "");
    assert_eq!(count_clause("*").unwrap(), "SELECT COUNT(*) FROM");
    assert_eq!(count_clause("id").unwrap(), "SELECT COUNT(id) FROM");
    assert_eq!(
      count_clause("i;d"),
      Err(TranslateError::InvalidIdentifier("i;d".to_string()))
    );
  }

  #[test]
  fn test_select_fields_default() {
    assert_eq!(select_fields(None).unwrap(), vec!["*".to_string()]);
    assert_eq!(select_fields(Some("")).unwrap(), vec!["*".to_string()]);
  }

  #[test]
  fn test_select_fields_list() {
    assert_eq!(
      select_fields(Some("id,name")).unwrap(),
      vec!["id".to_string(), "name".to_string()]
    );
    assert!(select_fields(Some("id,na'me")).is_err());
  }

  #[test]
  fn test_select_clause() {
    assert_eq!(
      select_clause(&["id".to_string(), "name".to_string()]).unwrap(),
      "SELECT id,name FROM"
    );
    assert_eq!(
      select_clause(&["*".to_string()]).unwrap(),
      "SELECT * FROM"
    );
    assert_eq!(select_clause(&[]), Err(TranslateError::EmptyProjection));
  }
}

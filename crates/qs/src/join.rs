use crate::error::TranslateError;
use crate::ident::valid_identifier;
use crate::operator::CompareOp;

/// Parses one `_join` value of the form `kind:table:lhs:op:rhs`, e.g.
/// `inner:test2:test2.name:$eq:test.name`, into a complete JOIN clause.
fn build_join(value: &str) -> Result<String, TranslateError> {
  let parts: Vec<&str> = value.split(':').collect();
  if parts.len() != 5 {
    return Err(TranslateError::MalformedJoin);
  }

  let kind = match parts[0].to_lowercase().as_str() {
    "inner" => "INNER",
    "left" => "LEFT",
    "right" => "RIGHT",
    "outer" => "OUTER",
    _ => return Err(TranslateError::MalformedJoin),
  };

  let (table, lhs, rhs) = (parts[1], parts[2], parts[4]);
  let op = CompareOp::resolve(parts[3])?;

  for ident in [table, lhs, rhs] {
    if !valid_identifier(ident) {
      return Err(TranslateError::InvalidIdentifier(ident.to_string()));
    }
  }

  return Ok(format!(
    "{kind} JOIN {table} ON {lhs} {op} {rhs}",
    op = op.as_sql()
  ));
}

/// One clause per `_join` value, in multi-map order.
pub fn build_joins(values: &[String]) -> Result<Vec<String>, TranslateError> {
  return values.iter().map(|v| build_join(v)).collect();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_inner_join() {
    assert_eq!(
      build_join("inner:test2:test2.name:$eq:test.name").unwrap(),
      "INNER JOIN test2 ON test2.name = test.name"
    );
  }

  #[test]
  fn test_kind_case_folding() {
    assert_eq!(
      build_join("LEFT:test2:test2.id:$gt:test.id").unwrap(),
      "LEFT JOIN test2 ON test2.id > test.id"
    );
    assert!(build_join("cross:test2:test2.id:$eq:test.id").is_err());
  }

  #[test]
  fn test_wrong_arity() {
    assert_eq!(
      build_join("inner:test2:test2.name:$eq"),
      Err(TranslateError::MalformedJoin)
    );
    assert_eq!(build_join("inner"), Err(TranslateError::MalformedJoin));
    assert_eq!(
      build_join("inner:test2:test2.name:$eq:test.name:extra"),
      Err(TranslateError::MalformedJoin)
    );
  }

  #[test]
  fn test_unknown_operator() {
    assert_eq!(
      build_join("inner:test2:test2.name:$bogus:test.name"),
      Err(TranslateError::UnknownOperator("$bogus".to_string()))
    );
    // Un-prefixed operator tokens are rejected.
    assert_eq!(
      build_join("inner:test2:test2.name:eq:test.name"),
      Err(TranslateError::UnknownOperator("eq".to_string()))
    );
  }

  #[test]
  fn test_identifier_validation() {
    assert_eq!(
      build_join("inner:te;st2:test2.name:$eq:test.name"),
      Err(TranslateError::InvalidIdentifier("te;st2".to_string()))
    );
    assert!(build_join("inner:test2:test2.na me:$eq:test.name").is_err());
  }

  #[test]
  fn test_multiple_values_keep_order() {
    let joins = build_joins(&[
      "inner:a:a.id:$eq:t.id".to_string(),
      "left:b:b.id:$eq:t.id".to_string(),
    ])
    .unwrap();
    assert_eq!(
      joins,
      vec![
        "INNER JOIN a ON a.id = t.id".to_string(),
        "LEFT JOIN b ON b.id = t.id".to_string(),
      ]
    );
  }
}

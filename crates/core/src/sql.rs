use serde_json::Value as JsonValue;

use pgrest_qs::valid_identifier;

use crate::error::ApiError;

fn empty_body() -> ApiError {
  return ApiError::ConstraintViolation("request body contains no columns".to_string());
}

/// Vets a path segment (database, schema, table, view) before it is
/// interpolated into a statement.
pub(crate) fn vet_identifier(token: &str) -> Result<&str, ApiError> {
  if !valid_identifier(token) {
    return Err(ApiError::InvalidIdentifier(token.to_string()));
  }
  return Ok(token);
}

/// `INSERT INTO schema.table (c1,c2) VALUES ($1,$2) RETURNING *`.
///
/// The body mapping supplies both columns and values; columns are vetted
/// individually, values go to the parameter vector in column order.
pub(crate) fn build_insert(
  schema: &str,
  table: &str,
  body: &serde_json::Map<String, JsonValue>,
) -> Result<(String, Vec<JsonValue>), ApiError> {
  if body.is_empty() {
    return Err(empty_body());
  }

  let mut columns = Vec::<&str>::with_capacity(body.len());
  let mut placeholders = Vec::<String>::with_capacity(body.len());
  let mut params = Vec::<JsonValue>::with_capacity(body.len());

  for (index, (column, value)) in body.iter().enumerate() {
    columns.push(vet_identifier(column)?);
    placeholders.push(format!("${}", index + 1));
    params.push(value.clone());
  }

  let sql = format!(
    "INSERT INTO {schema}.{table} ({columns}) VALUES ({placeholders}) RETURNING *",
    columns = columns.join(","),
    placeholders = placeholders.join(","),
  );

  return Ok((sql, params));
}

/// `UPDATE schema.table SET c1=$k,... WHERE <clause> RETURNING *`.
///
/// The WHERE clause arrives already parameterized; the SET list continues
/// numbering at `next_index` and the final parameter vector is the WHERE
/// vector followed by the SET values.
pub(crate) fn build_update(
  schema: &str,
  table: &str,
  where_clause: &str,
  where_params: Vec<JsonValue>,
  next_index: usize,
  body: &serde_json::Map<String, JsonValue>,
) -> Result<(String, Vec<JsonValue>), ApiError> {
  if body.is_empty() {
    return Err(empty_body());
  }

  let mut assignments = Vec::<String>::with_capacity(body.len());
  let mut params = where_params;
  let mut index = next_index;

  for (column, value) in body {
    assignments.push(format!("{}=${index}", vet_identifier(column)?));
    params.push(value.clone());
    index += 1;
  }

  let mut sql = format!(
    "UPDATE {schema}.{table} SET {assignments}",
    assignments = assignments.join(", "),
  );
  if !where_clause.is_empty() {
    sql.push_str(" WHERE ");
    sql.push_str(where_clause);
  }
  sql.push_str(" RETURNING *");

  return Ok((sql, params));
}

/// `DELETE FROM schema.table WHERE <clause> RETURNING *`. An empty clause
/// deletes every row, mirroring an unfiltered request.
pub(crate) fn build_delete(schema: &str, table: &str, where_clause: &str) -> String {
  let mut sql = format!("DELETE FROM {schema}.{table}");
  if !where_clause.is_empty() {
    sql.push_str(" WHERE ");
    sql.push_str(where_clause);
  }
  sql.push_str(" RETURNING *");
  return sql;
}

/// Composes a read statement from its fragments: projection head, target
/// relation, JOINs, WHERE, GROUP BY, ORDER BY, pagination, in that order.
pub(crate) fn build_select(
  head: &str,
  relation: &str,
  joins: &[String],
  where_clause: &str,
  group_by: &str,
  order: &str,
  pagination: &str,
) -> String {
  let mut sql = format!("{head} {relation}");

  for join in joins {
    sql.push(' ');
    sql.push_str(join);
  }
  if !where_clause.is_empty() {
    sql.push_str(" WHERE ");
    sql.push_str(where_clause);
  }
  for fragment in [group_by, order, pagination] {
    if !fragment.is_empty() {
      sql.push(' ');
      sql.push_str(fragment);
    }
  }

  return sql;
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn body(pairs: &[(&str, JsonValue)]) -> serde_json::Map<String, JsonValue> {
    return pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.clone()))
      .collect();
  }

  #[test]
  fn test_build_insert() {
    let (sql, params) = build_insert(
      "public",
      "test",
      &body(&[("age", json!(42)), ("name", json!("nuveo"))]),
    )
    .unwrap();

    assert_eq!(
      sql,
      "INSERT INTO public.test (age,name) VALUES ($1,$2) RETURNING *"
    );
    assert_eq!(params, vec![json!(42), json!("nuveo")]);
  }

  #[test]
  fn test_insert_rejects_bad_column() {
    let err = build_insert("public", "test", &body(&[("na;me", json!("x"))])).unwrap_err();
    assert!(matches!(err, ApiError::InvalidIdentifier(_)));
  }

  #[test]
  fn test_insert_rejects_empty_body() {
    let err = build_insert("public", "test", &body(&[])).unwrap_err();
    assert!(matches!(err, ApiError::ConstraintViolation(_)));
  }

  #[test]
  fn test_build_update_continues_numbering() {
    let (sql, params) = build_update(
      "public",
      "test",
      "name=$1",
      vec![json!("nuveo")],
      2,
      &body(&[("age", json!(43)), ("city", json!("rio"))]),
    )
    .unwrap();

    assert_eq!(
      sql,
      "UPDATE public.test SET age=$2, city=$3 WHERE name=$1 RETURNING *"
    );
    assert_eq!(params, vec![json!("nuveo"), json!(43), json!("rio")]);
  }

  #[test]
  fn test_build_update_without_filter() {
    let (sql, params) = build_update(
      "public",
      "test",
      "",
      vec![],
      1,
      &body(&[("age", json!(1))]),
    )
    .unwrap();

    assert_eq!(sql, "UPDATE public.test SET age=$1 RETURNING *");
    assert_eq!(params, vec![json!(1)]);
  }

  #[test]
  fn test_build_delete() {
    assert_eq!(
      build_delete("public", "test", "name=$1"),
      "DELETE FROM public.test WHERE name=$1 RETURNING *"
    );
    assert_eq!(
      build_delete("public", "test", ""),
      "DELETE FROM public.test RETURNING *"
    );
  }

  #[test]
  fn test_build_select_composition() {
    let sql = build_select(
      "SELECT name,age FROM",
      "public.test",
      &["INNER JOIN test2 ON test2.name = test.name".to_string()],
      "name=$1",
      "",
      "ORDER BY name DESC",
      "LIMIT 20 OFFSET(1 - 1) * 20",
    );

    assert_eq!(
      sql,
      "SELECT name,age FROM public.test \
       INNER JOIN test2 ON test2.name = test.name \
       WHERE name=$1 ORDER BY name DESC LIMIT 20 OFFSET(1 - 1) * 20"
    );
  }

  #[test]
  fn test_build_select_minimal() {
    assert_eq!(
      build_select("SELECT * FROM", "public.test", &[], "", "", "", ""),
      "SELECT * FROM public.test"
    );
  }

  #[test]
  fn test_vet_identifier() {
    assert!(vet_identifier("public").is_ok());
    assert!(vet_identifier("pub;lic").is_err());
  }
}

//! Fixed catalog statement templates backing the metadata endpoints. Each
//! template exposes one projection slot (the SELECT head: a field list or a
//! count expression) and composes with the same WHERE/ORDER/pagination path
//! as table reads.

/// Default projected column for `/databases`.
pub(crate) const DATABASES_FIELD: &str = "datname";

/// Default projected column for `/schemas`.
pub(crate) const SCHEMAS_FIELD: &str = "schema_name";

/// Default projection for listings of `/tables` and `/{db}/{schema}`.
pub(crate) const TABLES_FIELDS: &[&str] = &["table_schema", "table_name", "table_type"];

/// `head` is `SELECT <fields> FROM` or `SELECT COUNT(..) FROM`. The template
/// carries a built-in filter, so client clauses are appended with AND.
pub(crate) fn databases_statement(
  head: &str,
  where_clause: &str,
  order: &str,
  pagination: &str,
) -> String {
  let mut sql = format!("{head} pg_database WHERE NOT datistemplate");
  if !where_clause.is_empty() {
    sql.push_str(" AND ");
    sql.push_str(where_clause);
  }
  for fragment in [order, pagination] {
    if !fragment.is_empty() {
      sql.push(' ');
      sql.push_str(fragment);
    }
  }
  return sql;
}

pub(crate) fn schemas_statement(
  head: &str,
  where_clause: &str,
  order: &str,
  pagination: &str,
) -> String {
  let mut sql = format!("{head} information_schema.schemata");
  if !where_clause.is_empty() {
    sql.push_str(" WHERE ");
    sql.push_str(where_clause);
  }
  for fragment in [order, pagination] {
    if !fragment.is_empty() {
      sql.push(' ');
      sql.push_str(fragment);
    }
  }
  return sql;
}

/// Tables across all schemas, system catalogs excluded. Free-form WHERE on
/// the projected information_schema columns.
pub(crate) fn tables_statement(
  head: &str,
  where_clause: &str,
  order: &str,
  pagination: &str,
) -> String {
  let mut sql = format!(
    "{head} information_schema.tables \
     WHERE table_schema NOT IN ('pg_catalog','information_schema')"
  );
  if !where_clause.is_empty() {
    sql.push_str(" AND ");
    sql.push_str(where_clause);
  }
  for fragment in [order, pagination] {
    if !fragment.is_empty() {
      sql.push(' ');
      sql.push_str(fragment);
    }
  }
  return sql;
}

/// Tables of one schema; the schema arrives as `$1`, client filters continue
/// numbering from there.
pub(crate) fn schema_tables_statement(
  head: &str,
  where_clause: &str,
  order: &str,
  pagination: &str,
) -> String {
  let mut sql = format!("{head} information_schema.tables WHERE table_schema = $1");
  if !where_clause.is_empty() {
    sql.push_str(" AND ");
    sql.push_str(where_clause);
  }
  for fragment in [order, pagination] {
    if !fragment.is_empty() {
      sql.push(' ');
      sql.push_str(fragment);
    }
  }
  return sql;
}

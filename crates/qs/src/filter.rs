//! WHERE synthesis over the ordered filter pairs of a request.
//!
//! Supported key shapes:
//!
//! name=value                      <-- implicit equality
//! age:int4=value                  <-- explicit cast, rendered `age::int4`
//! data->>description:jsonb=value  <-- JSON arrow, rendered `data->>'description'`
use crate::error::TranslateError;
use crate::ident::valid_identifier;
use crate::value::Value;

/// A filter expression without the leading `WHERE` keyword, together with
/// its positional parameter vector and the next free placeholder index.
#[derive(Clone, Debug, PartialEq)]
pub struct WhereFragment {
  pub clause: String,
  pub params: Vec<Value>,
  pub next_index: usize,
}

impl WhereFragment {
  pub fn is_empty(&self) -> bool {
    return self.clause.is_empty();
  }
}

/// A vetted column expression ready for interpolation into SQL text.
#[derive(Clone, Debug, PartialEq)]
struct ColumnExpr {
  sql: String,
}

impl ColumnExpr {
  /// Parses `field[:cast]`, validating every identifier-shaped part. The
  /// `jsonb` cast triggers arrow rewriting instead of a `::jsonb` suffix:
  /// the rightmost `->>`/`->` segment becomes a single-quoted text label.
  fn parse(key: &str) -> Result<ColumnExpr, TranslateError> {
    let invalid = || TranslateError::InvalidIdentifier(key.to_string());

    let (field, cast) = match key.rsplit_once(':') {
      Some((field, cast)) => (field, Some(cast)),
      None => (key, None),
    };

    return match cast {
      Some("jsonb") => {
        let (lhs, arrow, label) = split_rightmost_arrow(field).ok_or_else(invalid)?;
        if !valid_identifier(lhs) || !valid_identifier(label) {
          return Err(invalid());
        }
        Ok(ColumnExpr {
          sql: format!("{lhs}{arrow}'{label}'"),
        })
      }
      Some(cast) => {
        if !valid_identifier(field) || !valid_identifier(cast) {
          return Err(invalid());
        }
        Ok(ColumnExpr {
          sql: format!("{field}::{cast}"),
        })
      }
      None => {
        if !valid_identifier(field) {
          return Err(invalid());
        }
        Ok(ColumnExpr {
          sql: field.to_string(),
        })
      }
    };
  }
}

fn split_rightmost_arrow(field: &str) -> Option<(&str, &'static str, &str)> {
  // `->>` starts with `->`, so probe the longer arrow first.
  if let Some(i) = field.rfind("->>") {
    return Some((&field[..i], "->>", &field[i + 3..]));
  }
  if let Some(i) = field.rfind("->") {
    return Some((&field[..i], "->", &field[i + 2..]));
  }
  return None;
}

/// Builds the WHERE fragment for the given filter pairs, emitting one `$n`
/// placeholder per pair starting at `start_index`. Clauses are joined by
/// ` AND ` in pair order; values go to the parameter vector, never into the
/// clause text.
pub fn build_where(
  pairs: &[(String, String)],
  start_index: usize,
) -> Result<WhereFragment, TranslateError> {
  let mut clauses = Vec::<String>::with_capacity(pairs.len());
  let mut params = Vec::<Value>::with_capacity(pairs.len());
  let mut index = start_index;

  for (key, value) in pairs {
    let column = ColumnExpr::parse(key)?;

    clauses.push(format!("{}=${index}", column.sql));
    params.push(Value::unparse(value.clone()));
    index += 1;
  }

  return Ok(WhereFragment {
    clause: clauses.join(" AND "),
    params,
    next_index: index,
  });
}

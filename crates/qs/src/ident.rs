/// Syntactic vetting of bare SQL identifiers. This is the only primitive
/// standing between user-supplied strings and identifier positions, so the
/// rule is conservative: no lookup of actual catalog objects, just shape.
///
/// A token is accepted iff it is non-empty, at most 63 bytes (the PostgreSQL
/// NAMEDATALEN limit), does not start with a digit, and contains only
/// letters, digits, underscores and periods. The period admits qualified
/// `schema.table` / `table.column` forms.
pub fn valid_identifier(token: &str) -> bool {
  if token.is_empty() || token.len() > 63 {
    return false;
  }

  let mut chars = token.chars();
  match chars.next() {
    Some(first) if first.is_ascii_digit() => return false,
    Some(first) if !ident_char(first) => return false,
    Some(_) => {}
    None => return false,
  }

  return chars.all(ident_char);
}

#[inline]
fn ident_char(c: char) -> bool {
  return c.is_alphanumeric() || c == '_' || c == '.';
}

/// Surface scan over a fully assembled statement. All statements built by
/// this crate are composed of vetted identifiers, fixed keywords and `$n`
/// placeholders, so anything outside this character set signals a bug in the
/// assembly path rather than a legitimate query.
pub fn statement_is_clean(sql: &str) -> bool {
  return sql.chars().all(|c| {
    return c.is_alphanumeric()
      || matches!(
        c,
        '_' | '$' | ',' | '.' | '(' | ')' | '*' | '=' | '<' | '>' | '!' | ':' | ' ' | '\'' | '"'
          | '-'
      );
  });
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_valid_identifiers() {
    assert!(valid_identifier("fildName"));
    assert!(valid_identifier("_9fildName"));
    assert!(valid_identifier("_fild.Name"));
    assert!(valid_identifier("test2.name"));
    assert!(valid_identifier("a"));
  }

  #[test]
  fn test_invalid_identifiers() {
    assert!(!valid_identifier(""));
    assert!(!valid_identifier("0fildName"));
    assert!(!valid_identifier("fild'Name"));
    assert!(!valid_identifier("fild\"Name"));
    assert!(!valid_identifier("fild;Name"));
    assert!(!valid_identifier("fild`Name"));
    assert!(!valid_identifier("fild Name"));
    assert!(!valid_identifier(&"a".repeat(65)));
  }

  #[test]
  fn test_length_limit_boundary() {
    assert!(valid_identifier(&"a".repeat(63)));
    assert!(!valid_identifier(&"a".repeat(64)));
  }

  #[test]
  fn test_statement_scan() {
    assert!(statement_is_clean(
      "SELECT name,age FROM public.test WHERE name=$1 AND age>$2 ORDER BY name DESC LIMIT 10"
    ));
    assert!(statement_is_clean(
      "INSERT INTO \"public\".\"test\" (name) VALUES ($1) RETURNING *"
    ));
    assert!(statement_is_clean("data->>'description'=$1"));
    assert!(!statement_is_clean("SELECT 1; DROP TABLE test"));
    assert!(!statement_is_clean("SELECT 1 -- comment\nFROM test"));
    assert!(!statement_is_clean("SELECT `name` FROM test"));
  }
}

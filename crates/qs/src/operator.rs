use crate::error::TranslateError;

/// Comparison tokens accepted in query strings. Closed set; the `$` prefix
/// is mandatory and lookup is case-sensitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CompareOp {
  Equal,
  GreaterThan,
  GreaterThanEqual,
  LessThan,
  LessThanEqual,
  In,
  NotIn,
}

impl CompareOp {
  pub fn from(token: &str) -> Option<Self> {
    return match token {
      "$eq" => Some(Self::Equal),
      "$gt" => Some(Self::GreaterThan),
      "$gte" => Some(Self::GreaterThanEqual),
      "$lt" => Some(Self::LessThan),
      "$lte" => Some(Self::LessThanEqual),
      "$in" => Some(Self::In),
      "$nin" => Some(Self::NotIn),
      _ => None,
    };
  }

  pub fn resolve(token: &str) -> Result<Self, TranslateError> {
    return Self::from(token).ok_or_else(|| TranslateError::UnknownOperator(token.to_string()));
  }

  #[inline]
  pub fn as_sql(&self) -> &'static str {
    return match self {
      Self::Equal => "=",
      Self::GreaterThan => ">",
      Self::GreaterThanEqual => ">=",
      Self::LessThan => "<",
      Self::LessThanEqual => "<=",
      Self::In => "IN",
      Self::NotIn => "NOT IN",
    };
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_operator_table() {
    assert_eq!(CompareOp::from("$eq").map(|o| o.as_sql()), Some("="));
    assert_eq!(CompareOp::from("$gt").map(|o| o.as_sql()), Some(">"));
    assert_eq!(CompareOp::from("$gte").map(|o| o.as_sql()), Some(">="));
    assert_eq!(CompareOp::from("$lt").map(|o| o.as_sql()), Some("<"));
    assert_eq!(CompareOp::from("$lte").map(|o| o.as_sql()), Some("<="));
    assert_eq!(CompareOp::from("$in").map(|o| o.as_sql()), Some("IN"));
    assert_eq!(CompareOp::from("$nin").map(|o| o.as_sql()), Some("NOT IN"));
  }

  #[test]
  fn test_unknown_tokens_rejected() {
    assert_eq!(CompareOp::from("$ne"), None);
    // Strict `$` prefix: bare tokens are not operators.
    assert_eq!(CompareOp::from("eq"), None);
    assert_eq!(CompareOp::from("$EQ"), None);
    assert_eq!(CompareOp::from(""), None);

    assert_eq!(
      CompareOp::resolve("$like"),
      Err(TranslateError::UnknownOperator("$like".to_string()))
    );
  }
}

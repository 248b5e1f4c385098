use crate::error::TranslateError;

/// Pagination requires both `_page` (1-based) and `_page_size`; with either
/// missing the fragment is empty. The OFFSET arithmetic is left to the
/// database.
pub fn build_pagination(
  page: Option<&str>,
  page_size: Option<&str>,
) -> Result<String, TranslateError> {
  let (Some(page), Some(page_size)) = (page, page_size) else {
    return Ok(String::new());
  };

  let page: i64 = page.trim().parse().map_err(|_| TranslateError::BadPagination)?;
  let page_size: i64 = page_size
    .trim()
    .parse()
    .map_err(|_| TranslateError::BadPagination)?;

  if page < 1 || page_size < 0 {
    return Err(TranslateError::BadPagination);
  }

  return Ok(format!("LIMIT {page_size} OFFSET({page} - 1) * {page_size}"));
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_first_page() {
    assert_eq!(
      build_pagination(Some("1"), Some("20")).unwrap(),
      "LIMIT 20 OFFSET(1 - 1) * 20"
    );
  }

  #[test]
  fn test_later_page() {
    assert_eq!(
      build_pagination(Some("3"), Some("10")).unwrap(),
      "LIMIT 10 OFFSET(3 - 1) * 10"
    );
  }

  #[test]
  fn test_missing_either_side() {
    assert_eq!(build_pagination(None, None).unwrap(), "");
    assert_eq!(build_pagination(Some("1"), None).unwrap(), "");
    assert_eq!(build_pagination(None, Some("20")).unwrap(), "");
  }

  #[test]
  fn test_non_integer() {
    assert_eq!(
      build_pagination(Some("one"), Some("20")),
      Err(TranslateError::BadPagination)
    );
    assert_eq!(
      build_pagination(Some("1"), Some("2.5")),
      Err(TranslateError::BadPagination)
    );
  }

  #[test]
  fn test_out_of_range() {
    assert_eq!(
      build_pagination(Some("0"), Some("20")),
      Err(TranslateError::BadPagination)
    );
    assert_eq!(
      build_pagination(Some("-1"), Some("20")),
      Err(TranslateError::BadPagination)
    );
  }
}

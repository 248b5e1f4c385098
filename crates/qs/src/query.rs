use crate::error::TranslateError;
use crate::filter::{WhereFragment, build_where};
use crate::join::build_joins;
use crate::order::{build_group_by, build_order};
use crate::page::build_pagination;
use crate::select::{count_clause, select_fields};
use crate::value::Value;

/// A parsed request query string. Keys beginning with `_` are reserved and
/// configure the translator; every other pair filters rows and is retained
/// in insertion order, duplicates included.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
  pub select: Option<String>,
  pub count: Option<String>,
  pub page: Option<String>,
  pub page_size: Option<String>,
  pub order: Option<String>,
  pub group_by: Option<String>,
  pub renderer: Option<String>,
  /// Raw `_join` values; a key repeated in the query string emits one JOIN
  /// clause per occurrence.
  pub joins: Vec<String>,
  /// Ordered non-reserved pairs feeding WHERE synthesis.
  pub filters: Vec<(String, String)>,
}

impl Query {
  pub fn parse(raw: &str) -> Query {
    let mut query = Query::default();

    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
      if !key.starts_with('_') {
        query.filters.push((key.into_owned(), value.into_owned()));
        continue;
      }

      let value = value.into_owned();
      match key.as_ref() {
        "_select" => query.select = Some(value),
        "_count" => query.count = Some(value),
        "_page" => query.page = Some(value),
        "_page_size" => query.page_size = Some(value),
        "_order" => query.order = Some(value),
        "_groupby" => query.group_by = Some(value),
        "_renderer" => query.renderer = Some(value),
        "_join" => query.joins.push(value),
        // The `_` prefix is a reserved namespace; unknown control keys are
        // ignored rather than treated as column filters.
        _ => {}
      }
    }

    return query;
  }

  pub fn where_clause(&self, start_index: usize) -> Result<WhereFragment, TranslateError> {
    return build_where(&self.filters, start_index);
  }

  pub fn join_clauses(&self) -> Result<Vec<String>, TranslateError> {
    return build_joins(&self.joins);
  }

  pub fn order_clause(&self) -> Result<String, TranslateError> {
    return build_order(self.order.as_deref().unwrap_or(""));
  }

  pub fn group_by_clause(&self) -> Result<String, TranslateError> {
    return build_group_by(self.group_by.as_deref().unwrap_or(""));
  }

  pub fn pagination_clause(&self) -> Result<String, TranslateError> {
    return build_pagination(self.page.as_deref(), self.page_size.as_deref());
  }

  pub fn count_clause(&self) -> Result<String, TranslateError> {
    return count_clause(self.count.as_deref().unwrap_or(""));
  }

  pub fn select_fields(&self) -> Result<Vec<String>, TranslateError> {
    return select_fields(self.select.as_deref());
  }

  /// Derives every SQL fragment in one pass. The projection in
  /// `select_fields` is the client's request; callers intersect it with the
  /// table's allow-list before rendering the SELECT head.
  pub fn fragments(&self, start_index: usize) -> Result<Fragments, TranslateError> {
    let where_fragment = self.where_clause(start_index)?;

    return Ok(Fragments {
      joins: self.join_clauses()?,
      order: self.order_clause()?,
      group_by: self.group_by_clause()?,
      pagination: self.pagination_clause()?,
      count: self.count_clause()?,
      select_fields: self.select_fields()?,
      where_clause: where_fragment.clause,
      params: where_fragment.params,
      next_index: where_fragment.next_index,
    });
  }
}

/// The per-request SQL fragment set; all text is built from vetted
/// identifiers and fixed keywords, all client values live in `params`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fragments {
  pub where_clause: String,
  pub params: Vec<Value>,
  pub next_index: usize,
  pub joins: Vec<String>,
  pub order: String,
  pub group_by: String,
  pub pagination: String,
  pub count: String,
  pub select_fields: Vec<String>,
}

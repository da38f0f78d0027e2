use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sort direction by creation time (loans) or timestamp (audit entries)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  Asc,
  #[default]
  Desc,
}

impl SortOrder {
  /// Parses an optional query value; anything other than `asc` sorts descending
  pub fn parse_lenient(value: Option<&str>) -> Self {
    value
      .and_then(|v| SortOrder::from_str(v).ok())
      .unwrap_or_default()
  }
}

impl FromStr for SortOrder {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "asc" => Ok(SortOrder::Asc),
      "desc" => Ok(SortOrder::Desc),
      _ => Err(()),
    }
  }
}

/// Page size bounds applied to caller-supplied limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
  pub default_limit: u64,
  pub max_limit: u64,
}

impl Default for PageLimits {
  fn default() -> Self {
    Self {
      default_limit: PageRequest::DEFAULT_LIMIT,
      max_limit: 100,
    }
  }
}

/// Limit/offset window into a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub limit: u64,
  pub offset: u64,
}

impl PageRequest {
  pub const DEFAULT_LIMIT: u64 = 10;

  /// Builds a request, falling back to the default limit for zero and capping at the maximum
  pub fn new(limit: Option<u64>, offset: Option<u64>, limits: PageLimits) -> Self {
    let max_limit = limits.max_limit.max(1);
    let limit = match limit {
      Some(0) | None => limits.default_limit.clamp(1, max_limit),
      Some(l) => l.min(max_limit),
    };
    Self {
      limit,
      offset: offset.unwrap_or(0),
    }
  }

  pub fn total_pages(&self, total: u64) -> u64 {
    total.div_ceil(self.limit)
  }
}

impl Default for PageRequest {
  fn default() -> Self {
    Self {
      limit: Self::DEFAULT_LIMIT,
      offset: 0,
    }
  }
}

/// One page of results plus the unpaginated total
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub total: u64,
}

impl<T> Page<T> {
  pub fn empty() -> Self {
    Self {
      items: Vec::new(),
      total: 0,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sort_order_defaults_to_desc() {
    assert_eq!(SortOrder::parse_lenient(None), SortOrder::Desc);
    assert_eq!(SortOrder::parse_lenient(Some("ASC")), SortOrder::Asc);
    assert_eq!(SortOrder::parse_lenient(Some("sideways")), SortOrder::Desc);
  }

  #[test]
  fn test_page_request_bounds() {
    let limits = PageLimits::default();
    assert_eq!(PageRequest::new(None, None, limits).limit, 10);
    assert_eq!(PageRequest::new(Some(0), Some(5), limits).limit, 10);
    assert_eq!(PageRequest::new(Some(500), None, limits).limit, 100);
    assert_eq!(PageRequest::new(Some(20), Some(40), limits).offset, 40);

    let custom = PageLimits {
      default_limit: 25,
      max_limit: 20,
    };
    assert_eq!(PageRequest::new(None, None, custom).limit, 20);
  }

  #[test]
  fn test_total_pages() {
    let page = PageRequest::new(Some(10), None, PageLimits::default());
    assert_eq!(page.total_pages(0), 0);
    assert_eq!(page.total_pages(10), 1);
    assert_eq!(page.total_pages(11), 2);
  }
}

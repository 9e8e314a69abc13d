//! Query parameters and pagination utilities
//!
//! Raw list parameters arrive as untyped path segments. [`QuerySpec::build`]
//! turns them into a validated filter + order + window before any store call
//! is made; a token that does not parse is rejected, never coerced.
//!
//! # Example
//! ```rust,ignore
//! // GET /bookings/0/2/roomNumber/1/hotel
//! let spec = QuerySpec::build::<Booking>(&ListParams {
//!     offset: "0".into(),
//!     limit: "2".into(),
//!     order: "roomNumber".into(),
//!     sort: "1".into(),
//!     keyword: Some("hotel".into()),
//! })?;
//! ```

use crate::core::entity::Resource;
use crate::core::error::{ApiError, ApiResult, ValidationError};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Raw pagination/sort/search parameters, exactly as received
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub offset: String,
    pub limit: String,
    pub order: String,
    pub sort: String,
    pub keyword: Option<String>,
}

impl ListParams {
    /// Collect the parameters from captured path segments
    ///
    /// The offset arrives under `id`: it shares its path position with the
    /// single-record routes, and the router allows one name per position.
    pub fn from_segments(mut segments: HashMap<String, String>) -> Self {
        let mut take = |name: &str| segments.remove(name).unwrap_or_default();
        Self {
            offset: take("id"),
            limit: take("limit"),
            order: take("order"),
            sort: take("sort"),
            keyword: segments.remove("keyword"),
        }
    }
}

/// Sort direction, encoded on the wire as `1` / `-1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse the `1` / `-1` token
    pub fn parse(raw: &str) -> ApiResult<Self> {
        match raw.trim() {
            "1" => Ok(SortDirection::Ascending),
            "-1" => Ok(SortDirection::Descending),
            other => Err(ApiError::invalid_field(
                "sort",
                format!("expected 1 or -1, got '{other}'"),
            )),
        }
    }
}

/// Single-field sort order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

impl SortOrder {
    /// Compare two records on the sort field
    ///
    /// Used with a stable sort, so ties keep the store's natural order.
    pub fn compare<T: Resource>(&self, a: &T, b: &T) -> Ordering {
        let left = a.field_value(&self.field);
        let right = b.field_value(&self.field);
        let ordering = match (left, right) {
            (Some(l), Some(r)) => l.total_cmp(&r),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Record filter shared by `count` and `find`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Matches every record
    All,
    /// Case-insensitive substring match, OR-ed across `fields`
    AnyFieldContains {
        fields: &'static [&'static str],
        needle: String,
    },
}

impl Filter {
    /// Build a keyword filter; an absent or empty keyword matches everything
    ///
    /// The keyword is matched as given, surrounding whitespace included.
    pub fn keyword(fields: &'static [&'static str], keyword: Option<&str>) -> Self {
        match keyword {
            Some(kw) if !kw.is_empty() => Filter::AnyFieldContains {
                fields,
                needle: kw.to_lowercase(),
            },
            _ => Filter::All,
        }
    }

    /// Whether `record` passes this filter
    pub fn matches<T: Resource>(&self, record: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::AnyFieldContains { fields, needle } => fields.iter().any(|field| {
                record
                    .field_value(field)
                    .is_some_and(|v| v.contains_ignore_case(needle))
            }),
        }
    }
}

/// Validated {filter, order, offset, limit} tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub filter: Filter,
    pub order: SortOrder,
    pub offset: usize,
    pub limit: usize,
}

impl QuerySpec {
    /// Validate raw parameters against the resource's descriptor
    pub fn build<T: Resource>(params: &ListParams) -> ApiResult<Self> {
        let offset = parse_count("offset", &params.offset)?;
        let limit = parse_count("limit", &params.limit)?;
        let direction = SortDirection::parse(&params.sort)?;

        let field = params.order.trim();
        if !T::sortable_fields().iter().any(|f| *f == field) {
            return Err(ApiError::Validation(ValidationError::UnknownSortField {
                resource: T::resource_name().to_string(),
                field: field.to_string(),
            }));
        }

        Ok(Self {
            filter: Filter::keyword(T::searchable_fields(), params.keyword.as_deref()),
            order: SortOrder {
                field: field.to_string(),
                direction,
            },
            offset,
            limit,
        })
    }
}

fn parse_count(name: &str, raw: &str) -> ApiResult<usize> {
    raw.trim().parse::<usize>().map_err(|_| {
        ApiError::invalid_field(name, format!("expected a non-negative integer, got '{raw}'"))
    })
}

/// `{count, items}` envelope for list endpoints
///
/// `count` is the size of the filtered set, independent of the page window.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: usize,
    pub items: Vec<T>,
}

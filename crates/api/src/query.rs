//! Query model.
//!
//! A [`Query`] is pure data: selected fields, an ordered filter list, required
//! fields, a keyword, sort specs and a result limit. Builder methods take and
//! return `self`, never fail, and perform no validation; the remote service is
//! the only authority on field names. Filter order is preserved end to end.

use bvbrc_error::{ApiError, ErrorCode, Result};
use std::fmt;

/// Filter operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// Equality (substring match for text fields, exact for numbers)
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Any of the listed values
    In,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Ne => "ne",
            FilterOp::Lt => "lt",
            FilterOp::Le => "le",
            FilterOp::Gt => "gt",
            FilterOp::Ge => "ge",
            FilterOp::In => "in",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single filter condition. `In` carries a list; every other operator one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Compare {
        op: FilterOp,
        field: String,
        value: String,
    },
    In {
        field: String,
        values: Vec<String>,
    },
}

impl Filter {
    pub fn op(&self) -> FilterOp {
        match self {
            Filter::Compare { op, .. } => *op,
            Filter::In { .. } => FilterOp::In,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Filter::Compare { field, .. } | Filter::In { field, .. } => field,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    select_fields: Vec<String>,
    filters: Vec<Filter>,
    required_fields: Vec<String>,
    keyword: Option<String>,
    sort_specs: Vec<SortSpec>,
    limit: usize,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append fields to return. An empty selection returns every field.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.compare(FilterOp::Eq, field, value)
    }

    pub fn ne(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.compare(FilterOp::Ne, field, value)
    }

    pub fn lt(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.compare(FilterOp::Lt, field, value)
    }

    pub fn le(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.compare(FilterOp::Le, field, value)
    }

    pub fn gt(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.compare(FilterOp::Gt, field, value)
    }

    pub fn ge(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.compare(FilterOp::Ge, field, value)
    }

    /// Match any of `values`, in the order given.
    pub fn any_of<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.push(Filter::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Require non-empty values for the given fields.
    pub fn required<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Full-text keyword searched across all fields. An empty keyword clears it.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        self.keyword = (!keyword.is_empty()).then_some(keyword);
        self
    }

    pub fn sort(mut self, field: impl Into<String>, descending: bool) -> Self {
        self.sort_specs.push(SortSpec {
            field: field.into(),
            descending,
        });
        self
    }

    /// Maximum number of records to return; 0 means unlimited.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = n;
        self
    }

    /// True iff the query constrains rows: filters, required fields or a keyword.
    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty() || !self.required_fields.is_empty() || self.keyword.is_some()
    }

    /// Encode as an RQL query string. See [`crate::rql::build`].
    pub fn build(&self) -> String {
        crate::rql::build(self)
    }

    pub fn select_fields(&self) -> &[String] {
        &self.select_fields
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn sort_specs(&self) -> &[SortSpec] {
        &self.sort_specs
    }

    pub fn limit_value(&self) -> usize {
        self.limit
    }

    /// `Some(n)` when a limit is set.
    pub(crate) fn limit_opt(&self) -> Option<usize> {
        (self.limit > 0).then_some(self.limit)
    }

    fn compare(mut self, op: FilterOp, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Compare {
            op,
            field: field.into(),
            value: value.into(),
        });
        self
    }
}

/// Parse a `field,value` specification. The value may itself contain commas.
pub fn parse_filter_spec(spec: &str) -> Result<(String, String)> {
    match spec.split_once(',') {
        Some((field, value)) if !field.is_empty() => Ok((field.to_string(), value.to_string())),
        _ => Err(ApiError::new(
            ErrorCode::InvalidFilterSpec,
            format!("invalid filter specification: {:?}", spec),
        )
        .with_hint("expected field,value")),
    }
}

/// Parse a `field,value1,value2,...` specification for an `in` filter.
pub fn parse_in_filter_spec(spec: &str) -> Result<(String, Vec<String>)> {
    let mut parts = spec.split(',');
    let field = parts.next().unwrap_or_default();
    let values: Vec<String> = parts.map(str::to_string).collect();
    if field.is_empty() || values.is_empty() {
        return Err(ApiError::new(
            ErrorCode::InvalidFilterSpec,
            format!("invalid in-filter specification: {:?}", spec),
        )
        .with_hint("expected field,value1,value2,..."));
    }
    Ok((field.to_string(), values))
}

//! RQL encoding.
//!
//! Clauses are emitted in a fixed order and joined with `&`:
//! `select(...)`, one clause per filter, `ne(field,)` per required field,
//! `keyword(...)`, `sort(...)`.
//!
//! There are two escapers and they are deliberately different:
//! - [`encode_value`] escapes filter values inside the query body. Values are
//!   form-urlencoded, then `+` becomes `%20`; the service rejects `+` for spaces.
//! - [`encode_path_segment`] escapes an identifier embedded in a request path,
//!   using the service's own substitution table.

use crate::query::{Filter, Query};
use url::form_urlencoded;

/// Serialize a query. An empty query encodes to the empty string.
pub fn build(query: &Query) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !query.select_fields().is_empty() {
        parts.push(format!("select({})", query.select_fields().join(",")));
    }

    for filter in query.filters() {
        parts.push(match filter {
            Filter::Compare { op, field, value } => {
                format!("{}({},{})", op, field, encode_value(value))
            }
            Filter::In { field, values } => {
                let encoded: Vec<String> = values.iter().map(|v| encode_value(v)).collect();
                format!("in({},({}))", field, encoded.join(","))
            }
        });
    }

    for field in query.required_fields() {
        parts.push(format!("ne({},)", field));
    }

    if let Some(keyword) = query.keyword() {
        parts.push(format!("keyword({})", encode_value(keyword)));
    }

    if !query.sort_specs().is_empty() {
        let fields: Vec<String> = query
            .sort_specs()
            .iter()
            .map(|s| format!("{}{}", if s.descending { '-' } else { '+' }, s.field))
            .collect();
        parts.push(format!("sort({})", fields.join(",")));
    }

    parts.join("&")
}

/// Escape a filter value for the query body.
pub fn encode_value(value: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
    // a literal '+' in the input is already %2B, so only spaces are affected
    encoded.replace('+', "%20")
}

/// Escape an identifier for use as a path segment (e.g. single-record lookup).
pub fn encode_path_segment(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for c in id.chars() {
        match c {
            '<' => out.push_str("%60"),
            '>' => out.push_str("%62"),
            '=' => out.push_str("%61"),
            '"' => out.push_str("%22"),
            '&' => out.push_str("%26"),
            '#' => out.push_str("%23"),
            ' ' => out.push_str("%20"),
            '\t' => out.push_str("%09"),
            other => out.push(other),
        }
    }
    out
}

/// Append the page window to an encoded query: `limit(n)` on the first page,
/// `limit(n,offset)` afterwards.
pub fn with_page(rql: &str, page_size: usize, offset: usize) -> String {
    let limit = if offset > 0 {
        format!("limit({},{})", page_size, offset)
    } else {
        format!("limit({})", page_size)
    };
    if rql.is_empty() {
        limit
    } else {
        format!("{}&{}", rql, limit)
    }
}

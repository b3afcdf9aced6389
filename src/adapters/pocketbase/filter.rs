//! Filter expressions and list query strings

use serde_json::Value;
use url::form_urlencoded::byte_serialize;

/// `perPage` value asking the backend for every record in one page
pub const UNBOUNDED_PER_PAGE: i64 = -1;

fn escape_text(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Builds an equality filter joined with `&&`
///
/// String values are single-quoted; other JSON values are written as-is.
/// Returns an empty string when there are no clauses.
///
/// # Examples
///
/// ```
/// use pbkit::adapters::pocketbase::filter::build_filter;
/// use serde_json::json;
///
/// let filter = build_filter(&[
///     ("name".to_string(), json!("O'Brien")),
///     ("age".to_string(), json!(42)),
/// ]);
/// assert_eq!(filter, r"(name='O\'Brien' && age=42)");
/// ```
pub fn build_filter(clauses: &[(String, Value)]) -> String {
    if clauses.is_empty() {
        return String::new();
    }

    let parts: Vec<String> = clauses
        .iter()
        .map(|(field, value)| match value {
            Value::String(text) => format!("{field}='{}'", escape_text(text)),
            other => format!("{field}={other}"),
        })
        .collect();

    format!("({})", parts.join(" && "))
}

/// Query parameters for a record listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Filter expression, see [`build_filter`]
    pub filter: Option<String>,

    /// Comma-separated relation fields to expand
    pub expand: Option<String>,

    /// Page size; [`UNBOUNDED_PER_PAGE`] for everything
    pub per_page: Option<i64>,
}

impl ListQuery {
    /// A query for the whole collection in one page
    pub fn all() -> Self {
        Self {
            per_page: Some(UNBOUNDED_PER_PAGE),
            ..Default::default()
        }
    }

    /// Sets the filter expression
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.filter = if filter.is_empty() { None } else { Some(filter) };
        self
    }

    /// Sets the relations to expand
    pub fn with_expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = Some(expand.into());
        self
    }

    /// Renders `?key=value&...`, URL-encoded, or an empty string
    pub fn to_query_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(ref filter) = self.filter {
            params.push(format!("filter={}", byte_serialize(filter.as_bytes()).collect::<String>()));
        }
        if let Some(ref expand) = self.expand {
            params.push(format!("expand={}", byte_serialize(expand.as_bytes()).collect::<String>()));
        }
        if let Some(per_page) = self.per_page {
            params.push(format!("perPage={per_page}"));
        }

        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

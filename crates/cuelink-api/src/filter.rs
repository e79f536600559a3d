// Filter model for CV-CUE list queries.
//
// The wireless manager accepts filters as URL-encoded JSON strings in a
// repeated `filter` query parameter, combined by a single `operator`
// parameter. `Filter` is one predicate; `FilterBuilder` is the ordered
// group that serializes to those two parameters.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::Error;

// ── Comparison operators ─────────────────────────────────────────────

/// Friendly comparison operator names accepted by [`Filter`].
///
/// Each maps to a fixed wire token; the friendly name is what appears in
/// user input (CLI `--filter` strings, builder calls).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessThanOrEquals,
    GreaterThanOrEquals,
    Contains,
    NotContains,
}

impl FilterOperator {
    /// All recognized friendly names, in documentation order.
    pub const NAMES: [&'static str; 8] = [
        "equals",
        "notEquals",
        "lessThan",
        "greaterThan",
        "lessThanOrEquals",
        "greaterThanOrEquals",
        "contains",
        "notContains",
    ];

    /// The token the API expects on the wire.
    pub fn api_token(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessThanOrEquals => "<=",
            Self::GreaterThanOrEquals => ">=",
            Self::Contains => "contains",
            Self::NotContains => "notcontains",
        }
    }

    /// The friendly name, as accepted by [`FilterOperator::from_str`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::LessThan => "lessThan",
            Self::GreaterThan => "greaterThan",
            Self::LessThanOrEquals => "lessThanOrEquals",
            Self::GreaterThanOrEquals => "greaterThanOrEquals",
            Self::Contains => "contains",
            Self::NotContains => "notContains",
        }
    }
}

impl FromStr for FilterOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "equals" => Ok(Self::Equals),
            "notEquals" => Ok(Self::NotEquals),
            "lessThan" => Ok(Self::LessThan),
            "greaterThan" => Ok(Self::GreaterThan),
            "lessThanOrEquals" => Ok(Self::LessThanOrEquals),
            "greaterThanOrEquals" => Ok(Self::GreaterThanOrEquals),
            "contains" => Ok(Self::Contains),
            "notContains" => Ok(Self::NotContains),
            other => Err(Error::InvalidOperator {
                operator: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Serializes as the wire token, so embedding a `Filter` in JSON
// produces exactly what the API expects.
impl Serialize for FilterOperator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.api_token())
    }
}

// ── Logical operators ────────────────────────────────────────────────

/// How a [`FilterBuilder`]'s predicates are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl FromStr for LogicalOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            other => Err(Error::InvalidOperator {
                operator: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::And => "AND",
            Self::Or => "OR",
        })
    }
}

// ── Filter ───────────────────────────────────────────────────────────

/// A single (property, operator, value-list) predicate.
///
/// The value is always held as a list: a scalar constructor argument is
/// wrapped in a one-element list, a JSON array is kept as-is. Immutable
/// after construction.
///
/// `Display` renders the canonical wire form, a JSON object with keys in
/// the order `property`, `operator`, `value` and the operator replaced by
/// its API token:
///
/// ```
/// use cuelink_api::{Filter, FilterOperator};
///
/// let f = Filter::new("name", FilterOperator::Contains, "Arista");
/// assert_eq!(
///     f.to_string(),
///     r#"{"property":"name","operator":"contains","value":["Arista"]}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    property: String,
    operator: FilterOperator,
    value: Vec<Value>,
}

impl Filter {
    /// Create a filter. Scalar values are normalized to a one-element list.
    pub fn new(
        property: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<Value>,
    ) -> Self {
        let value = match value.into() {
            Value::Array(items) => items,
            scalar => vec![scalar],
        };
        Self {
            property: property.into(),
            operator,
            value,
        }
    }

    /// Create a filter from a friendly operator name.
    ///
    /// Fails with [`Error::InvalidOperator`] for any name outside the
    /// eight recognized ones.
    pub fn parse(
        property: impl Into<String>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Self, Error> {
        Ok(Self::new(property, operator.parse()?, value))
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn operator(&self) -> FilterOperator {
        self.operator
    }

    pub fn value(&self) -> &[Value] {
        &self.value
    }
}

// Field order matters: the canonical string encoding is defined as
// property, operator, value.
impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Filter", 3)?;
        s.serialize_field("property", &self.property)?;
        s.serialize_field("operator", &self.operator)?;
        s.serialize_field("value", &self.value)?;
        s.end()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

// ── FilterBuilder ────────────────────────────────────────────────────

/// Ordered group of [`Filter`]s combined with AND/OR.
///
/// Filters are appended through the fluent `add` / sugar methods and
/// serialized in insertion order — the API may present them positionally
/// even though logical combination is order-independent.
///
/// ```
/// use cuelink_api::{FilterBuilder, LogicalOperator};
///
/// let params = FilterBuilder::new(LogicalOperator::And)
///     .contains("name", "Arista")
///     .equals("active", true)
///     .to_query_params();
/// assert_eq!(params[0], ("operator".to_owned(), "AND".to_owned()));
/// assert_eq!(params.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterBuilder {
    operator: LogicalOperator,
    filters: Vec<Filter>,
}

impl FilterBuilder {
    pub fn new(operator: LogicalOperator) -> Self {
        Self {
            operator,
            filters: Vec::new(),
        }
    }

    /// Append a predicate, returning the builder for chaining.
    pub fn add(
        mut self,
        property: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<Value>,
    ) -> Self {
        self.filters.push(Filter::new(property, operator, value));
        self
    }

    /// Append an already-constructed [`Filter`].
    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    // Sugar for `add` with a fixed operator.

    pub fn contains(self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add(property, FilterOperator::Contains, value)
    }

    pub fn equals(self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add(property, FilterOperator::Equals, value)
    }

    pub fn not_contains(self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add(property, FilterOperator::NotContains, value)
    }

    pub fn not_equals(self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add(property, FilterOperator::NotEquals, value)
    }

    pub fn greater_than(self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add(property, FilterOperator::GreaterThan, value)
    }

    pub fn less_than(self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add(property, FilterOperator::LessThan, value)
    }

    pub fn greater_than_or_equals(
        self,
        property: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.add(property, FilterOperator::GreaterThanOrEquals, value)
    }

    pub fn less_than_or_equals(
        self,
        property: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.add(property, FilterOperator::LessThanOrEquals, value)
    }

    pub fn operator(&self) -> LogicalOperator {
        self.operator
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// The query parameters the API expects: nothing for an empty builder,
    /// otherwise one `operator` pair followed by a `filter` pair per
    /// predicate in insertion order.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        if self.filters.is_empty() {
            return Vec::new();
        }

        let mut params = Vec::with_capacity(self.filters.len() + 1);
        params.push(("operator".to_owned(), self.operator.to_string()));
        for filter in &self.filters {
            params.push(("filter".to_owned(), filter.to_string()));
        }
        params
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn scalar_value_is_wrapped_in_list() {
        let f = Filter::new("active", FilterOperator::Equals, true);
        assert_eq!(f.value(), &[json!(true)]);

        let f = Filter::new("boxid", FilterOperator::GreaterThan, 42);
        assert_eq!(f.value(), &[json!(42)]);
    }

    #[test]
    fn list_value_is_kept_as_is() {
        let f = Filter::new(
            "model",
            FilterOperator::Equals,
            vec!["AP-555", "AP-635"],
        );
        assert_eq!(f.value(), &[json!("AP-555"), json!("AP-635")]);
    }

    #[test]
    fn operator_names_map_to_fixed_tokens() {
        let cases = [
            ("equals", "="),
            ("lessThan", "<"),
            ("greaterThan", ">"),
            ("lessThanOrEquals", "<="),
            ("greaterThanOrEquals", ">="),
            ("notEquals", "!="),
            ("contains", "contains"),
            ("notContains", "notcontains"),
        ];
        for (name, token) in cases {
            let op: FilterOperator = name.parse().unwrap();
            assert_eq!(op.api_token(), token, "token for {name}");
            assert_eq!(op.name(), name);
        }
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let err = "in".parse::<FilterOperator>().unwrap_err();
        assert!(matches!(err, Error::InvalidOperator { ref operator } if operator == "in"));

        let err = Filter::parse("name", "matches", "x").unwrap_err();
        assert!(matches!(err, Error::InvalidOperator { .. }));
    }

    #[test]
    fn logical_operator_only_accepts_and_or() {
        assert_eq!("AND".parse::<LogicalOperator>().unwrap(), LogicalOperator::And);
        assert_eq!("OR".parse::<LogicalOperator>().unwrap(), LogicalOperator::Or);
        assert!(matches!(
            "XOR".parse::<LogicalOperator>(),
            Err(Error::InvalidOperator { .. })
        ));
        // Case matters: the API only understands the uppercase forms.
        assert!("and".parse::<LogicalOperator>().is_err());
    }

    #[test]
    fn canonical_string_has_stable_key_order() {
        let f = Filter::new("name", FilterOperator::Contains, "Arista");
        assert_eq!(
            f.to_string(),
            r#"{"property":"name","operator":"contains","value":["Arista"]}"#
        );

        let f = Filter::new("boxid", FilterOperator::LessThanOrEquals, 100);
        assert_eq!(
            f.to_string(),
            r#"{"property":"boxid","operator":"<=","value":[100]}"#
        );
    }

    #[test]
    fn serialized_string_round_trips() {
        let f = Filter::new(
            "macaddress",
            FilterOperator::NotEquals,
            vec!["aa:bb", "cc:dd"],
        );
        let parsed: Value = serde_json::from_str(&f.to_string()).unwrap();
        assert_eq!(
            parsed,
            json!({
                "property": "macaddress",
                "operator": "!=",
                "value": ["aa:bb", "cc:dd"],
            })
        );
    }

    #[test]
    fn empty_builder_yields_no_params() {
        let fb = FilterBuilder::new(LogicalOperator::And);
        assert!(fb.is_empty());
        assert!(fb.to_query_params().is_empty());
    }

    #[test]
    fn builder_preserves_insertion_order() {
        let fb = FilterBuilder::new(LogicalOperator::Or)
            .contains("name", "Arista")
            .equals("active", true)
            .greater_than("boxid", 10);

        let params = fb.to_query_params();
        assert_eq!(params.len(), 4);
        assert_eq!(params[0], ("operator".to_owned(), "OR".to_owned()));

        let filters: Vec<&str> = params[1..].iter().map(|(k, v)| {
            assert_eq!(k, "filter");
            v.as_str()
        }).collect();
        assert_eq!(
            filters,
            vec![
                r#"{"property":"name","operator":"contains","value":["Arista"]}"#,
                r#"{"property":"active","operator":"=","value":[true]}"#,
                r#"{"property":"boxid","operator":">","value":[10]}"#,
            ]
        );
    }

    #[test]
    fn push_appends_an_existing_filter() {
        let mut fb = FilterBuilder::new(LogicalOperator::And);
        fb.push(Filter::new("name", FilterOperator::Contains, "lab"));
        fb.push(Filter::parse("boxid", "lessThan", 9).unwrap());

        assert_eq!(fb.len(), 2);
        assert_eq!(
            fb,
            FilterBuilder::new(LogicalOperator::And)
                .contains("name", "lab")
                .less_than("boxid", 9)
        );
    }

    #[test]
    fn sugar_methods_match_add() {
        let sugared = FilterBuilder::new(LogicalOperator::And)
            .not_contains("name", "test")
            .less_than("boxid", 5)
            .greater_than_or_equals("channel", 36)
            .less_than_or_equals("channel", 165);
        let explicit = FilterBuilder::new(LogicalOperator::And)
            .add("name", FilterOperator::NotContains, "test")
            .add("boxid", FilterOperator::LessThan, 5)
            .add("channel", FilterOperator::GreaterThanOrEquals, 36)
            .add("channel", FilterOperator::LessThanOrEquals, 165);
        assert_eq!(sugared, explicit);
    }
}

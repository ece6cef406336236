//! Filter criteria for publisher queries.
//!
//! Criteria are read from query parameters of the form `field.operator=value`,
//! for example `name.contains=pen` or `id.in=1,2,3`. Each field declares the
//! operators it accepts:
//!
//! - `id` (long range filter): `equals`, `notEquals`, `in`, `notIn`,
//!   `specified`, `greaterThan`, `greaterThanOrEqual`, `lessThan`,
//!   `lessThanOrEqual`
//! - `name` (string filter): `equals`, `notEquals`, `in`, `notIn`,
//!   `specified`, `contains`, `doesNotContain`
//!
//! A [`PublisherCriteria`] is immutable once built. [`PublisherCriteria::to_specification`]
//! compiles it into a [`Specification`] that the store evaluates while scanning.
//! Every condition must hold for a record to match.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use super::field::{Field, FieldValue};
use super::publisher::Publisher;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("unsupported filter operator '{operator}' for field '{field}'")]
    UnsupportedOperator { field: Field, operator: String },

    #[error("invalid value '{value}' for filter '{field}.{operator}'")]
    InvalidValue {
        field: Field,
        operator: Operator,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Specified,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Contains,
    DoesNotContain,
}

impl Operator {
    const ALL: [Operator; 11] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::In,
        Operator::NotIn,
        Operator::Specified,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::Contains,
        Operator::DoesNotContain,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::In => "in",
            Operator::NotIn => "notIn",
            Operator::Specified => "specified",
            Operator::GreaterThan => "greaterThan",
            Operator::GreaterThanOrEqual => "greaterThanOrEqual",
            Operator::LessThan => "lessThan",
            Operator::LessThanOrEqual => "lessThanOrEqual",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "doesNotContain",
        }
    }

    fn takes_list(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared filter type of a field, deciding which operators it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterKind {
    LongRange,
    Text,
}

impl FilterKind {
    fn of(field: Field) -> Self {
        match field {
            Field::Id => FilterKind::LongRange,
            Field::Name => FilterKind::Text,
        }
    }

    fn supports(&self, operator: Operator) -> bool {
        use Operator::*;
        match operator {
            Equals | NotEquals | In | NotIn | Specified => true,
            GreaterThan | GreaterThanOrEqual | LessThan | LessThanOrEqual => {
                *self == FilterKind::LongRange
            }
            Contains | DoesNotContain => *self == FilterKind::Text,
        }
    }

    fn accepts(&self, operator: Operator, value: &FilterValue) -> bool {
        match (operator, value) {
            (Operator::Specified, FilterValue::Flag(_)) => true,
            (Operator::Specified, _) => false,
            (op, FilterValue::LongList(_)) => op.takes_list() && *self == FilterKind::LongRange,
            (op, FilterValue::TextList(_)) => op.takes_list() && *self == FilterKind::Text,
            (op, FilterValue::Long(_)) => !op.takes_list() && *self == FilterKind::LongRange,
            (op, FilterValue::Text(_)) => !op.takes_list() && *self == FilterKind::Text,
            (_, FilterValue::Flag(_)) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Long(u64),
    LongList(Vec<u64>),
    Text(String),
    TextList(Vec<String>),
    Flag(bool),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Long(value) => write!(f, "{value}"),
            FilterValue::Text(value) => f.write_str(value),
            FilterValue::Flag(value) => write!(f, "{value}"),
            FilterValue::LongList(values) => {
                let joined: Vec<String> = values.iter().map(u64::to_string).collect();
                write!(f, "[{}]", joined.join(", "))
            }
            FilterValue::TextList(values) => write!(f, "[{}]", values.join(", ")),
        }
    }
}

/// Immutable set of filter conditions over publisher fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublisherCriteria {
    filters: BTreeMap<(Field, Operator), FilterValue>,
}

impl PublisherCriteria {
    pub fn builder() -> CriteriaBuilder {
        CriteriaBuilder::default()
    }

    /// Builds criteria from raw query parameters.
    ///
    /// Parameters that do not name a publisher field (`page`, `sort`, ...)
    /// are ignored. A repeated scalar filter keeps its last value; list
    /// filters accumulate across repetitions and comma-separated values.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut builder = Self::builder();

        for (key, raw) in pairs {
            let Some((field_name, operator_name)) = key.split_once('.') else {
                continue;
            };
            let Some(field) = Field::parse(field_name) else {
                continue;
            };
            let operator = Operator::parse(operator_name)
                .filter(|op| FilterKind::of(field).supports(*op))
                .ok_or_else(|| CriteriaError::UnsupportedOperator {
                    field,
                    operator: operator_name.to_string(),
                })?;

            let value = parse_value(field, operator, raw)?;
            builder = builder.append(field, operator, value)?;
        }

        Ok(builder.build())
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn get(&self, field: Field, operator: Operator) -> Option<&FilterValue> {
        self.filters.get(&(field, operator))
    }

    pub fn to_specification(&self) -> Specification {
        let conditions = self
            .filters
            .iter()
            .map(|(&(field, operator), value)| Condition {
                field,
                operator,
                value: value.clone(),
            })
            .collect();
        Specification { conditions }
    }
}

impl fmt::Display for PublisherCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PublisherCriteria{")?;
        for (i, ((field, operator), value)) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}.{operator}={value}")?;
        }
        f.write_str("}")
    }
}

#[derive(Debug, Default)]
pub struct CriteriaBuilder {
    filters: BTreeMap<(Field, Operator), FilterValue>,
}

impl CriteriaBuilder {
    /// Sets the condition for `field.operator`, replacing any previous value.
    pub fn filter(
        mut self,
        field: Field,
        operator: Operator,
        value: FilterValue,
    ) -> Result<Self, CriteriaError> {
        check(field, operator, &value)?;
        self.filters.insert((field, operator), value);
        Ok(self)
    }

    /// Like [`CriteriaBuilder::filter`], but extends list values instead of replacing them.
    fn append(
        mut self,
        field: Field,
        operator: Operator,
        value: FilterValue,
    ) -> Result<Self, CriteriaError> {
        check(field, operator, &value)?;
        match (self.filters.get_mut(&(field, operator)), value) {
            (Some(FilterValue::LongList(existing)), FilterValue::LongList(more)) => {
                existing.extend(more)
            }
            (Some(FilterValue::TextList(existing)), FilterValue::TextList(more)) => {
                existing.extend(more)
            }
            (_, value) => {
                self.filters.insert((field, operator), value);
            }
        }
        Ok(self)
    }

    pub fn build(self) -> PublisherCriteria {
        PublisherCriteria {
            filters: self.filters,
        }
    }
}

fn check(field: Field, operator: Operator, value: &FilterValue) -> Result<(), CriteriaError> {
    let kind = FilterKind::of(field);
    if !kind.supports(operator) {
        return Err(CriteriaError::UnsupportedOperator {
            field,
            operator: operator.as_str().to_string(),
        });
    }
    if !kind.accepts(operator, value) {
        return Err(CriteriaError::InvalidValue {
            field,
            operator,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn parse_value(field: Field, operator: Operator, raw: &str) -> Result<FilterValue, CriteriaError> {
    let invalid = || CriteriaError::InvalidValue {
        field,
        operator,
        value: raw.to_string(),
    };

    if operator == Operator::Specified {
        return match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(FilterValue::Flag(true)),
            "false" => Ok(FilterValue::Flag(false)),
            _ => Err(invalid()),
        };
    }

    match (FilterKind::of(field), operator.takes_list()) {
        (FilterKind::LongRange, false) => {
            raw.trim().parse().map(FilterValue::Long).map_err(|_| invalid())
        }
        (FilterKind::LongRange, true) => raw
            .split(',')
            .map(|item| item.trim().parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map(FilterValue::LongList)
            .map_err(|_| invalid()),
        (FilterKind::Text, false) => Ok(FilterValue::Text(raw.to_string())),
        (FilterKind::Text, true) => Ok(FilterValue::TextList(
            raw.split(',').map(str::to_string).collect(),
        )),
    }
}

/// Compiled criteria, evaluated against each stored publisher.
#[derive(Debug, Clone, Default)]
pub struct Specification {
    conditions: Vec<Condition>,
}

impl Specification {
    /// A specification without conditions; matches everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, publisher: &Publisher) -> bool {
        self.conditions.iter().all(|condition| condition.matches(publisher))
    }
}

#[derive(Debug, Clone)]
struct Condition {
    field: Field,
    operator: Operator,
    value: FilterValue,
}

impl Condition {
    fn matches(&self, publisher: &Publisher) -> bool {
        let actual = self.field.read(publisher);
        // Unset values only satisfy `specified=false`, like SQL NULL.
        match (actual, &self.value) {
            (actual, FilterValue::Flag(expected)) => actual.is_present() == *expected,
            (FieldValue::Long(Some(actual)), value) => self.compare_long(actual, value),
            (FieldValue::Text(Some(actual)), value) => self.compare_text(actual, value),
            _ => false,
        }
    }

    fn compare_long(&self, actual: u64, value: &FilterValue) -> bool {
        match (self.operator, value) {
            (Operator::Equals, FilterValue::Long(expected)) => actual == *expected,
            (Operator::NotEquals, FilterValue::Long(expected)) => actual != *expected,
            (Operator::GreaterThan, FilterValue::Long(bound)) => actual > *bound,
            (Operator::GreaterThanOrEqual, FilterValue::Long(bound)) => actual >= *bound,
            (Operator::LessThan, FilterValue::Long(bound)) => actual < *bound,
            (Operator::LessThanOrEqual, FilterValue::Long(bound)) => actual <= *bound,
            (Operator::In, FilterValue::LongList(values)) => values.contains(&actual),
            (Operator::NotIn, FilterValue::LongList(values)) => !values.contains(&actual),
            _ => false,
        }
    }

    fn compare_text(&self, actual: &str, value: &FilterValue) -> bool {
        match (self.operator, value) {
            (Operator::Equals, FilterValue::Text(expected)) => actual == expected,
            (Operator::NotEquals, FilterValue::Text(expected)) => actual != expected,
            (Operator::Contains, FilterValue::Text(needle)) => contains_ignore_case(actual, needle),
            (Operator::DoesNotContain, FilterValue::Text(needle)) => {
                !contains_ignore_case(actual, needle)
            }
            (Operator::In, FilterValue::TextList(values)) => values.iter().any(|v| v == actual),
            (Operator::NotIn, FilterValue::TextList(values)) => !values.iter().any(|v| v == actual),
            _ => false,
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_uppercase().contains(&needle.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(query: &[(&str, &str)]) -> PublisherCriteria {
        PublisherCriteria::from_query_pairs(query.iter().copied()).unwrap()
    }

    fn publisher(id: u64, name: &str) -> Publisher {
        Publisher::new(name).with_id(id)
    }

    #[test]
    fn ignores_unrelated_parameters() {
        let parsed = criteria(&[("page", "1"), ("size", "5"), ("sort", "name,desc"), ("name", "x")]);
        assert!(parsed.is_empty());
        assert!(parsed.to_specification().is_unrestricted());
    }

    #[test]
    fn parses_typed_values() {
        let parsed = criteria(&[
            ("id.greaterThan", "3"),
            ("name.contains", "pen"),
            ("id.specified", "TRUE"),
        ]);

        assert_eq!(parsed.get(Field::Id, Operator::GreaterThan), Some(&FilterValue::Long(3)));
        assert_eq!(
            parsed.get(Field::Name, Operator::Contains),
            Some(&FilterValue::Text("pen".to_string()))
        );
        assert_eq!(parsed.get(Field::Id, Operator::Specified), Some(&FilterValue::Flag(true)));
    }

    #[test]
    fn list_filters_accumulate() {
        let parsed = criteria(&[("id.in", "1,2"), ("id.in", "5")]);
        assert_eq!(
            parsed.get(Field::Id, Operator::In),
            Some(&FilterValue::LongList(vec![1, 2, 5]))
        );
    }

    #[test]
    fn repeated_scalar_keeps_last_value() {
        let parsed = criteria(&[("name.equals", "A"), ("name.equals", "B")]);
        assert_eq!(
            parsed.get(Field::Name, Operator::Equals),
            Some(&FilterValue::Text("B".to_string()))
        );
    }

    #[test]
    fn rejects_operator_not_declared_for_field() {
        let err = PublisherCriteria::from_query_pairs([("name.greaterThan", "a")]).unwrap_err();
        assert!(matches!(err, CriteriaError::UnsupportedOperator { field: Field::Name, .. }));

        let err = PublisherCriteria::from_query_pairs([("id.contains", "1")]).unwrap_err();
        assert!(matches!(err, CriteriaError::UnsupportedOperator { field: Field::Id, .. }));

        let err = PublisherCriteria::from_query_pairs([("id.bogus", "1")]).unwrap_err();
        assert!(matches!(err, CriteriaError::UnsupportedOperator { .. }));
    }

    #[test]
    fn rejects_unparsable_values() {
        let err = PublisherCriteria::from_query_pairs([("id.equals", "abc")]).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidValue { operator: Operator::Equals, .. }));

        let err = PublisherCriteria::from_query_pairs([("id.in", "1,x")]).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidValue { operator: Operator::In, .. }));

        let err = PublisherCriteria::from_query_pairs([("name.specified", "maybe")]).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidValue { .. }));
    }

    #[test]
    fn builder_checks_value_shape() {
        let result = PublisherCriteria::builder().filter(
            Field::Id,
            Operator::Equals,
            FilterValue::Text("1".to_string()),
        );
        assert!(result.is_err());

        let result = PublisherCriteria::builder().filter(
            Field::Name,
            Operator::In,
            FilterValue::TextList(vec!["a".to_string()]),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn conditions_are_combined_with_and() {
        let spec = criteria(&[("id.greaterThanOrEqual", "2"), ("name.contains", "PEN")])
            .to_specification();

        assert!(spec.matches(&publisher(2, "Penguin")));
        assert!(spec.matches(&publisher(9, "Open Court")));
        assert!(!spec.matches(&publisher(1, "Penguin")));
        assert!(!spec.matches(&publisher(3, "Vintage")));
    }

    #[test]
    fn text_operators() {
        let penguin = publisher(1, "Penguin");

        assert!(criteria(&[("name.equals", "Penguin")]).to_specification().matches(&penguin));
        assert!(!criteria(&[("name.equals", "penguin")]).to_specification().matches(&penguin));
        assert!(criteria(&[("name.notEquals", "Vintage")]).to_specification().matches(&penguin));
        assert!(criteria(&[("name.in", "Vintage,Penguin")]).to_specification().matches(&penguin));
        assert!(!criteria(&[("name.notIn", "Penguin")]).to_specification().matches(&penguin));
        assert!(criteria(&[("name.doesNotContain", "XYZ")]).to_specification().matches(&penguin));
    }

    #[test]
    fn range_operators() {
        let five = publisher(5, "Five");

        assert!(criteria(&[("id.lessThan", "6")]).to_specification().matches(&five));
        assert!(!criteria(&[("id.lessThan", "5")]).to_specification().matches(&five));
        assert!(criteria(&[("id.lessThanOrEqual", "5")]).to_specification().matches(&five));
        assert!(!criteria(&[("id.greaterThan", "5")]).to_specification().matches(&five));
        assert!(criteria(&[("id.notIn", "1,2")]).to_specification().matches(&five));
        assert!(criteria(&[("id.notEquals", "4")]).to_specification().matches(&five));
    }

    #[test]
    fn unset_values_only_match_unspecified() {
        let unsaved = Publisher::new("Draft");

        assert!(criteria(&[("id.specified", "false")]).to_specification().matches(&unsaved));
        assert!(!criteria(&[("id.specified", "true")]).to_specification().matches(&unsaved));
        assert!(!criteria(&[("id.notEquals", "1")]).to_specification().matches(&unsaved));
    }

    #[test]
    fn display_lists_conditions() {
        let parsed = criteria(&[("name.contains", "pen"), ("id.in", "1,2")]);
        assert_eq!(parsed.to_string(), "PublisherCriteria{id.in=[1, 2], name.contains=pen}");
    }
}

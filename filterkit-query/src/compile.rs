//! Predicate compilation: caller criteria in, parameterized clause out.
//!
//! A [`Group`] compiles to its conditions joined with `AND`, in the order
//! the keys were supplied. A group list compiles to each group in
//! parentheses, joined with `OR`. Caller values never enter the clause
//! string; they travel in the [`ParamBag`] under the placeholder names
//! the clause uses.
//!
//! ```rust
//! use filterkit_query::compile::{Criteria, Group};
//! use filterkit_query::filter::FilterMap;
//!
//! let mut builder = FilterMap::builder("User");
//! builder.number("age")?.text("status")?;
//! let filters = builder.build();
//!
//! let criteria = Criteria::from(Group::new().with("age_gte", 18).with("status", "active"));
//! let compiled = filters.compile(&criteria)?;
//!
//! assert_eq!(compiled.clause(), "\"age\" >= ${age_gte} AND \"status\" = ${status}");
//! assert_eq!(compiled.params().len(), 2);
//! # Ok::<(), filterkit_query::QueryError>(())
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::adapter::Adapter;
use crate::error::{QueryError, QueryResult};
use crate::filter::{BindKind, FilterMap, FilterValue, PredicateTemplate, ValueTransform};

/// Bound values keyed by placeholder name.
pub type ParamBag = IndexMap<SmolStr, FilterValue>;

/// Conditions combined with `AND`, keyed by variant name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group(IndexMap<SmolStr, FilterValue>);

impl Group {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition, builder style.
    pub fn with(mut self, variant: impl Into<SmolStr>, value: impl Into<FilterValue>) -> Self {
        self.insert(variant, value);
        self
    }

    /// Add or replace a condition.
    pub fn insert(&mut self, variant: impl Into<SmolStr>, value: impl Into<FilterValue>) {
        self.0.insert(variant.into(), value.into());
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the group has no conditions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over conditions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<SmolStr>, V: Into<FilterValue>> FromIterator<(K, V)> for Group {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Runtime filter criteria.
///
/// Deserializes from JSON: an object is a single group, an array of
/// objects is a group list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Criteria {
    /// Conditions combined with `AND`.
    Group(Group),
    /// Groups combined with `OR`.
    GroupList(Vec<Group>),
}

impl Criteria {
    /// Criteria with no conditions.
    pub fn empty() -> Self {
        Self::Group(Group::new())
    }

    /// Whether compiling these criteria yields an empty clause.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Group(group) => group.is_empty(),
            Self::GroupList(groups) => groups.is_empty() || groups.iter().any(Group::is_empty),
        }
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Group> for Criteria {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

impl From<Vec<Group>> for Criteria {
    fn from(groups: Vec<Group>) -> Self {
        Self::GroupList(groups)
    }
}

/// A compiled predicate clause and the values its placeholders refer to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledPredicate {
    clause: String,
    params: ParamBag,
}

impl CompiledPredicate {
    /// The clause with named placeholders; empty when there is no condition.
    pub fn clause(&self) -> &str {
        &self.clause
    }

    /// Values keyed by placeholder name.
    pub fn params(&self) -> &ParamBag {
        &self.params
    }

    /// Whether the clause is empty.
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// `" WHERE <clause>"`, or an empty string when there is no condition.
    pub fn where_clause(&self) -> String {
        if self.clause.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clause)
        }
    }

    /// Hand the clause and its values to an adapter for substitution.
    pub fn resolve_with<A: Adapter + ?Sized>(&self, adapter: &A) -> QueryResult<A::Output> {
        adapter.resolve(&self.clause, &self.params)
    }

    /// Split into clause and parameter bag.
    pub fn into_parts(self) -> (String, ParamBag) {
        (self.clause, self.params)
    }
}

/// Compile criteria against a filter map.
///
/// Every key is resolved and every value checked before any output is
/// built, so a failure never yields a partial clause.
pub fn compile(criteria: &Criteria, filters: &FilterMap) -> QueryResult<CompiledPredicate> {
    let compiled = match criteria {
        Criteria::Group(group) => {
            let resolved = resolve_group(group, filters)?;
            let mut params = ParamBag::with_capacity(resolved.len());
            let clause = render_group(&resolved, None, &mut params);
            CompiledPredicate { clause, params }
        }
        Criteria::GroupList(groups) => {
            let resolved = groups
                .iter()
                .map(|group| resolve_group(group, filters))
                .collect::<QueryResult<Vec<_>>>()?;

            // An empty group matches everything, and so does the disjunction.
            if resolved.is_empty() || resolved.iter().any(Vec::is_empty) {
                CompiledPredicate::default()
            } else {
                let mut params = ParamBag::new();
                let clause = resolved
                    .iter()
                    .enumerate()
                    .map(|(index, group)| {
                        format!("({})", render_group(group, Some(index), &mut params))
                    })
                    .collect::<Vec<_>>()
                    .join(" OR ");
                CompiledPredicate { clause, params }
            }
        }
    };

    crate::filterkit_trace!(
        entity = filters.entity(),
        clause = %compiled.clause,
        params = compiled.params.len(),
        "Criteria compiled"
    );
    Ok(compiled)
}

type Resolved<'a> = Vec<(&'a PredicateTemplate, &'a FilterValue)>;

fn resolve_group<'a>(group: &'a Group, filters: &'a FilterMap) -> QueryResult<Resolved<'a>> {
    group
        .iter()
        .map(|(key, value)| {
            let template = filters
                .get(key)
                .ok_or_else(|| QueryError::unknown_filter_key(filters.entity(), key))?;
            check_value(template, value)?;
            Ok((template, value))
        })
        .collect()
}

fn render_group(
    resolved: &Resolved<'_>,
    group_index: Option<usize>,
    params: &mut ParamBag,
) -> String {
    resolved
        .iter()
        .map(|(template, value)| {
            let bind = match group_index {
                Some(index) => SmolStr::new(format!("g{}.{}", index, template.param_name())),
                None => SmolStr::new(template.param_name()),
            };
            let condition = template.render(&bind);
            params.insert(bind, (*value).clone());
            condition
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn check_value(template: &PredicateTemplate, value: &FilterValue) -> QueryResult<()> {
    let variant = template.variant();

    if let FilterValue::Json(_) = value {
        return Err(wrong_shape(variant, value, "a scalar value"));
    }

    match (template.bind_kind(), value) {
        (BindKind::Scalar, FilterValue::List(_)) => {
            return Err(
                wrong_shape(variant, value, "a single value").with_suggestion(format!(
                    "Use '{}_in' to match any of several values",
                    template.filter()
                )),
            );
        }
        (BindKind::Csv, FilterValue::List(items)) => {
            if items.is_empty() {
                return Err(QueryError::invalid_parameter(variant, "list must not be empty")
                    .with_suggestion("Omit the filter instead of passing an empty list"));
            }
            if let Some(item) = items
                .iter()
                .find(|item| item.is_list() || matches!(item, FilterValue::Json(_)))
            {
                return Err(wrong_shape(variant, item, "scalar list items"));
            }
        }
        _ => {}
    }

    if template.transform() == Some(ValueTransform::HexDecode) {
        let valid = value.as_str().is_some_and(|s| hex::decode(s).is_ok());
        if !valid {
            return Err(wrong_shape(variant, value, "a hex-encoded string"));
        }
    }

    Ok(())
}

fn wrong_shape(variant: &str, value: &FilterValue, expected: &str) -> QueryError {
    QueryError::invalid_parameter(variant, format!("expected {}, got {}", expected, value.kind()))
}

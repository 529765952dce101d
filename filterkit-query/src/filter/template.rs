//! Predicate templates: one comparison per filter variant, with named bind points.
//!
//! A template never contains a caller value. It names its bind point with
//! `${name}` (scalar) or `${name:csv}` (comma-separated list) and leaves
//! substitution to an [`Adapter`](crate::adapter::Adapter).

use serde::Serialize;
use smol_str::SmolStr;

use super::types::FilterType;
use crate::sql::DatabaseType;

/// Comparison performed by a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// `=`
    Eq,
    /// `<>`
    Neq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `IN (...)`
    In,
    /// `LIKE`
    Like,
}

impl Operator {
    /// How the bind point of this operator expects its value.
    pub fn bind_kind(&self) -> BindKind {
        match self {
            Self::In => BindKind::Csv,
            _ => BindKind::Scalar,
        }
    }

    /// SQL comparison token.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "<>",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::In => "IN",
            Self::Like => "LIKE",
        }
    }
}

/// Shape of a bind point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindKind {
    /// A single value: `${name}`.
    Scalar,
    /// A comma-separated list: `${name:csv}`.
    Csv,
}

impl BindKind {
    /// Modifier text following the name inside a placeholder.
    pub fn modifier(&self) -> Option<&'static str> {
        match self {
            Self::Scalar => None,
            Self::Csv => Some("csv"),
        }
    }
}

/// Transform applied to the bound value on the database side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTransform {
    /// Decode a hex string into bytes.
    HexDecode,
}

/// Render a named placeholder.
pub fn placeholder(name: &str, kind: BindKind) -> String {
    match kind.modifier() {
        Some(modifier) => format!("${{{}:{}}}", name, modifier),
        None => format!("${{{}}}", name),
    }
}

/// A compiled comparison for one filter variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredicateTemplate {
    variant: SmolStr,
    filter: SmolStr,
    filter_type: FilterType,
    column: String,
    operator: Operator,
    transform: Option<ValueTransform>,
    #[serde(skip)]
    dialect: DatabaseType,
    template: String,
}

impl PredicateTemplate {
    /// Build the template for `variant` comparing `column` with `operator`.
    pub(crate) fn new(
        variant: SmolStr,
        filter: SmolStr,
        filter_type: FilterType,
        column: &str,
        operator: Operator,
        dialect: DatabaseType,
    ) -> Self {
        let transform = filter_type.decodes_hex().then_some(ValueTransform::HexDecode);
        let mut template = Self {
            variant,
            filter,
            filter_type,
            column: column.to_string(),
            operator,
            transform,
            dialect,
            template: String::new(),
        };
        template.template = template.render(&template.variant);
        template
    }

    /// Variant name, also the bind-parameter name.
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Name of the declared filter this variant belongs to.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Value type of the declared filter.
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Real column compared on the left-hand side.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Comparison operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Shape of the bind point.
    pub fn bind_kind(&self) -> BindKind {
        self.operator.bind_kind()
    }

    /// Database-side value transform, if any.
    pub fn transform(&self) -> Option<ValueTransform> {
        self.transform
    }

    /// Name of the bound parameter in the canonical template.
    pub fn param_name(&self) -> &str {
        &self.variant
    }

    /// The canonical template, bound under the variant name.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Render the comparison with its bind point named `bind`.
    pub fn render(&self, bind: &str) -> String {
        let lhs = self.dialect.quote_identifier(&self.column);
        let mut rhs = placeholder(bind, self.bind_kind());
        if let Some(ValueTransform::HexDecode) = self.transform {
            rhs = self.dialect.hex_decode(&rhs);
        }
        match self.operator {
            Operator::In => format!("{} IN ({})", lhs, rhs),
            op => format!("{} {} {}", lhs, op.as_sql(), rhs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(filter_type: FilterType, column: &str, operator: Operator) -> PredicateTemplate {
        PredicateTemplate::new(
            "v".into(),
            "f".into(),
            filter_type,
            column,
            operator,
            DatabaseType::PostgreSQL,
        )
    }

    #[test]
    fn test_placeholder_syntax() {
        assert_eq!(placeholder("age_gt", BindKind::Scalar), "${age_gt}");
        assert_eq!(placeholder("status_in", BindKind::Csv), "${status_in:csv}");
    }

    #[test]
    fn test_render_comparisons() {
        assert_eq!(
            template(FilterType::Number, "age", Operator::Gte).as_str(),
            "\"age\" >= ${v}"
        );
        assert_eq!(
            template(FilterType::Text, "name", Operator::Neq).as_str(),
            "\"name\" <> ${v}"
        );
        assert_eq!(
            template(FilterType::Text, "name", Operator::Like).as_str(),
            "\"name\" LIKE ${v}"
        );
        assert_eq!(
            template(FilterType::Text, "status", Operator::In).as_str(),
            "\"status\" IN (${v:csv})"
        );
    }

    #[test]
    fn test_binary_wraps_bind_point() {
        let t = template(FilterType::Binary, "digest", Operator::Eq);
        assert_eq!(t.transform(), Some(ValueTransform::HexDecode));
        assert_eq!(t.as_str(), "\"digest\" = decode(${v}, 'hex')");
    }

    #[test]
    fn test_render_with_other_bind_name() {
        let t = template(FilterType::Number, "age", Operator::Lt);
        assert_eq!(t.render("g1.v"), "\"age\" < ${g1.v}");
    }
}

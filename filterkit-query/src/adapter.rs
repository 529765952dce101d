//! The adapter boundary: substituting bound values into compiled templates.
//!
//! The compiler only ever emits named placeholders. An [`Adapter`] owns
//! every decision about how values reach the database:
//!
//! - [`PositionalAdapter`] rewrites placeholders into the dialect's
//!   positional parameters (`$1` / `?`) and returns the values in bind
//!   order, ready for a driver.
//! - [`LiteralAdapter`] substitutes escaped SQL literals, for drivers or
//!   tools that only accept a finished statement.
//!
//! ```rust
//! use filterkit_query::adapter::{LiteralAdapter, PositionalAdapter};
//! use filterkit_query::compile::{Criteria, Group};
//! use filterkit_query::filter::FilterMap;
//!
//! let mut builder = FilterMap::builder("Ticket");
//! builder.text("status")?;
//! let filters = builder.build();
//!
//! let criteria = Criteria::from(Group::new().with("status_in", vec!["a", "b"]));
//! let compiled = filters.compile(&criteria)?;
//!
//! let literal = compiled.resolve_with(&LiteralAdapter::default())?;
//! assert_eq!(literal, "\"status\" IN ('a','b')");
//!
//! let bound = compiled.resolve_with(&PositionalAdapter::default())?;
//! assert_eq!(bound.sql(), "\"status\" IN ($1, $2)");
//! assert_eq!(bound.params().len(), 2);
//! # Ok::<(), filterkit_query::QueryError>(())
//! ```

use crate::compile::ParamBag;
use crate::error::{QueryError, QueryResult};
use crate::filter::{BindKind, FilterValue};
use crate::sql::{DatabaseType, quote_literal};

/// Substitutes parameter values into a template with named placeholders.
pub trait Adapter {
    /// What resolution produces.
    type Output;

    /// Resolve every placeholder in `template` from `values`.
    fn resolve(&self, template: &str, values: &ParamBag) -> QueryResult<Self::Output>;
}

/// A piece of a tokenized template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text copied through unchanged.
    Text(&'a str),
    /// A bind point.
    Placeholder {
        /// Parameter name.
        name: &'a str,
        /// Bind shape.
        kind: BindKind,
    },
}

/// Split a template into text and placeholders.
///
/// A `$` not followed by `{` is ordinary text.
pub fn tokenize(template: &str) -> QueryResult<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        if start > 0 {
            segments.push(Segment::Text(&rest[..start]));
        }
        let body_start = start + 2;
        let end = rest[body_start..]
            .find('}')
            .ok_or_else(|| {
                QueryError::template_syntax("unterminated placeholder", template)
            })?;
        let body = &rest[body_start..body_start + end];

        let (name, kind) = match body.split_once(':') {
            None => (body, BindKind::Scalar),
            Some((name, "csv")) => (name, BindKind::Csv),
            Some((_, modifier)) => {
                return Err(QueryError::template_syntax(
                    format!("unknown placeholder modifier '{}'", modifier),
                    template,
                ));
            }
        };
        if name.is_empty() {
            return Err(QueryError::template_syntax(
                "empty placeholder name",
                template,
            ));
        }

        segments.push(Segment::Placeholder { name, kind });
        rest = &rest[body_start + end + 1..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }
    Ok(segments)
}

fn lookup<'v>(values: &'v ParamBag, name: &str) -> QueryResult<&'v FilterValue> {
    values.get(name).ok_or_else(|| {
        QueryError::invalid_parameter(name, "no value supplied for placeholder")
            .with_help(
                "Every placeholder in the template needs a matching entry in the parameter bag",
            )
    })
}

/// A statement with positional placeholders and values in bind order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundQuery {
    sql: String,
    params: Vec<FilterValue>,
}

impl BoundQuery {
    /// The SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Values in bind order.
    pub fn params(&self) -> &[FilterValue] {
        &self.params
    }

    /// Split into SQL and values.
    pub fn into_parts(self) -> (String, Vec<FilterValue>) {
        (self.sql, self.params)
    }
}

/// Rewrites named placeholders into positional parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionalAdapter {
    dialect: DatabaseType,
    offset: usize,
}

impl PositionalAdapter {
    /// Adapter for the given dialect, numbering from `$1`.
    pub fn new(dialect: DatabaseType) -> Self {
        Self { dialect, offset: 0 }
    }

    /// Continue numbering after `offset` parameters already bound elsewhere.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    fn bind(&self, value: &FilterValue, params: &mut Vec<FilterValue>) -> String {
        params.push(value.clone());
        self.dialect.placeholder(self.offset + params.len())
    }
}

impl Adapter for PositionalAdapter {
    type Output = BoundQuery;

    fn resolve(&self, template: &str, values: &ParamBag) -> QueryResult<BoundQuery> {
        let mut sql = String::with_capacity(template.len());
        let mut params = Vec::new();

        for segment in tokenize(template)? {
            match segment {
                Segment::Text(text) => sql.push_str(text),
                Segment::Placeholder { name, kind } => {
                    let value = lookup(values, name)?;
                    match (kind, value) {
                        (BindKind::Csv, FilterValue::List(items)) => {
                            if items.is_empty() {
                                return Err(QueryError::invalid_parameter(
                                    name,
                                    "list must not be empty",
                                ));
                            }
                            let placeholders: Vec<_> = items
                                .iter()
                                .map(|item| self.bind(item, &mut params))
                                .collect();
                            sql.push_str(&placeholders.join(", "));
                        }
                        _ => sql.push_str(&self.bind(value, &mut params)),
                    }
                }
            }
        }

        crate::filterkit_debug!(
            dialect = self.dialect.name(),
            offset = self.offset,
            params = params.len(),
            "Placeholders bound"
        );
        Ok(BoundQuery { sql, params })
    }
}

/// Substitutes escaped SQL literals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiteralAdapter {
    dialect: DatabaseType,
}

impl LiteralAdapter {
    /// Adapter for the given dialect.
    pub fn new(dialect: DatabaseType) -> Self {
        Self { dialect }
    }

    fn quote(&self, text: &str) -> String {
        match self.dialect {
            DatabaseType::MySQL => quote_literal(&text.replace('\\', "\\\\")),
            DatabaseType::PostgreSQL | DatabaseType::SQLite => quote_literal(text),
        }
    }

    fn literal(&self, name: &str, value: &FilterValue) -> QueryResult<String> {
        Ok(match value {
            FilterValue::Null => "NULL".to_string(),
            FilterValue::Bool(b) => b.to_string(),
            FilterValue::Int(i) => i.to_string(),
            FilterValue::Float(f) if f.is_finite() => f.to_string(),
            FilterValue::Float(_) => {
                return Err(QueryError::invalid_parameter(name, "non-finite float"));
            }
            FilterValue::String(s) => self.quote(s),
            FilterValue::Json(json) => self.quote(&json.to_string()),
            FilterValue::List(items) => format!("ARRAY[{}]", self.csv(name, items)?),
        })
    }

    fn csv(&self, name: &str, items: &[FilterValue]) -> QueryResult<String> {
        let rendered = items
            .iter()
            .map(|item| self.literal(name, item))
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(rendered.join(","))
    }
}

impl Adapter for LiteralAdapter {
    type Output = String;

    fn resolve(&self, template: &str, values: &ParamBag) -> QueryResult<String> {
        let mut out = String::with_capacity(template.len());

        for segment in tokenize(template)? {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder { name, kind } => {
                    let value = lookup(values, name)?;
                    let rendered = match (kind, value) {
                        (BindKind::Csv, FilterValue::List(items)) => {
                            if items.is_empty() {
                                return Err(QueryError::invalid_parameter(
                                    name,
                                    "list must not be empty",
                                ));
                            }
                            self.csv(name, items)?
                        }
                        _ => self.literal(name, value)?,
                    };
                    out.push_str(&rendered);
                }
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;

    fn bag(entries: &[(&str, FilterValue)]) -> ParamBag {
        entries
            .iter()
            .map(|(k, v)| ((*k).into(), v.clone()))
            .collect()
    }

    #[test]
    fn test_tokenize() {
        let segments = tokenize("\"a\" = ${a} AND \"b\" IN (${b:csv})").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Text("\"a\" = "),
                Segment::Placeholder {
                    name: "a",
                    kind: BindKind::Scalar
                },
                Segment::Text(" AND \"b\" IN ("),
                Segment::Placeholder {
                    name: "b",
                    kind: BindKind::Csv
                },
                Segment::Text(")"),
            ]
        );
    }

    #[test]
    fn test_tokenize_plain_dollar() {
        assert_eq!(
            tokenize("cost = $5").unwrap(),
            vec![Segment::Text("cost = $5")]
        );
    }

    #[test]
    fn test_tokenize_errors() {
        assert_eq!(tokenize("x = ${a").unwrap_err().code, ErrorCode::SqlSyntax);
        assert_eq!(tokenize("x = ${a:json}").unwrap_err().code, ErrorCode::SqlSyntax);
        assert_eq!(tokenize("x = ${}").unwrap_err().code, ErrorCode::SqlSyntax);
    }

    #[test]
    fn test_literal_values() {
        let adapter = LiteralAdapter::default();
        let values = bag(&[
            ("s", "it's".into()),
            ("n", FilterValue::Int(-3)),
            ("f", FilterValue::Float(1.5)),
            ("b", FilterValue::Bool(true)),
            ("z", FilterValue::Null),
        ]);
        let out = adapter
            .resolve("${s} ${n} ${f} ${b} ${z}", &values)
            .unwrap();
        assert_eq!(out, "'it''s' -3 1.5 true NULL");
    }

    #[test]
    fn test_literal_lists() {
        let adapter = LiteralAdapter::default();
        let values = bag(&[("l", vec![1i64, 2].into()), ("one", "x".into())]);
        assert_eq!(adapter.resolve("(${l:csv})", &values).unwrap(), "(1,2)");
        assert_eq!(adapter.resolve("${l}", &values).unwrap(), "ARRAY[1,2]");
        assert_eq!(adapter.resolve("(${one:csv})", &values).unwrap(), "('x')");
    }

    #[test]
    fn test_literal_mysql_escapes_backslash() {
        let adapter = LiteralAdapter::new(DatabaseType::MySQL);
        let values = bag(&[("p", "a\\'b".into())]);
        assert_eq!(adapter.resolve("${p}", &values).unwrap(), "'a\\\\''b'");
    }

    #[test]
    fn test_missing_value() {
        let err = LiteralAdapter::default()
            .resolve("${missing}", &ParamBag::new())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameter);
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let values = bag(&[("f", FilterValue::Float(f64::NAN))]);
        assert!(LiteralAdapter::default().resolve("${f}", &values).is_err());
    }

    #[test]
    fn test_positional_postgres() {
        let values = bag(&[("a", 1i64.into()), ("b", vec!["x", "y"].into())]);
        let bound = PositionalAdapter::default()
            .resolve("\"a\" = ${a} AND \"b\" IN (${b:csv})", &values)
            .unwrap();
        assert_eq!(bound.sql(), "\"a\" = $1 AND \"b\" IN ($2, $3)");
        assert_eq!(
            bound.params(),
            &[FilterValue::Int(1), FilterValue::from("x"), FilterValue::from("y")]
        );
    }

    #[test]
    fn test_positional_offset_and_sqlite() {
        let values = bag(&[("a", 1i64.into())]);
        let bound = PositionalAdapter::new(DatabaseType::PostgreSQL)
            .with_offset(2)
            .resolve("a = ${a}", &values)
            .unwrap();
        assert_eq!(bound.sql(), "a = $3");

        let bound = PositionalAdapter::new(DatabaseType::SQLite)
            .resolve("a = ${a}", &values)
            .unwrap();
        assert_eq!(bound.sql(), "a = ?");
    }

    #[test]
    fn test_empty_csv_list_rejected() {
        let values = bag(&[("l", FilterValue::List(vec![]))]);
        assert!(
            PositionalAdapter::default()
                .resolve("(${l:csv})", &values)
                .is_err()
        );
        assert!(LiteralAdapter::default().resolve("(${l:csv})", &values).is_err());
    }
}

//! Supported filter value types and the operator variants each expands into.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::template::Operator;
use crate::error::{ErrorCode, QueryError};

/// Value type accepted by a declared filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterType {
    /// `true` / `false` columns.
    Boolean,
    /// Character columns.
    Text,
    /// Numeric columns.
    Number,
    /// Byte columns, compared against hex-encoded input.
    Binary,
}

/// One row of the expansion table: variant suffix and its comparison.
pub type VariantSpec = (&'static str, Operator);

const BOOLEAN_VARIANTS: &[VariantSpec] = &[
    ("", Operator::Eq),
    ("_eql", Operator::Eq),
    ("_neql", Operator::Neq),
];

const TEXT_VARIANTS: &[VariantSpec] = &[
    ("", Operator::Eq),
    ("_eql", Operator::Eq),
    ("_neql", Operator::Neq),
    ("_in", Operator::In),
    ("_like", Operator::Like),
];

const NUMBER_VARIANTS: &[VariantSpec] = &[
    ("", Operator::Eq),
    ("_eql", Operator::Eq),
    ("_neql", Operator::Neq),
    ("_gt", Operator::Gt),
    ("_gte", Operator::Gte),
    ("_lt", Operator::Lt),
    ("_lte", Operator::Lte),
    ("_in", Operator::In),
];

const BINARY_VARIANTS: &[VariantSpec] = &[
    ("", Operator::Eq),
    ("_eql", Operator::Eq),
    ("_neql", Operator::Neq),
];

impl FilterType {
    /// All supported types.
    pub const ALL: [FilterType; 4] = [Self::Boolean, Self::Text, Self::Number, Self::Binary];

    /// The ordered variant table for this type.
    pub fn variants(&self) -> &'static [VariantSpec] {
        match self {
            Self::Boolean => BOOLEAN_VARIANTS,
            Self::Text => TEXT_VARIANTS,
            Self::Number => NUMBER_VARIANTS,
            Self::Binary => BINARY_VARIANTS,
        }
    }

    /// Variant names generated for a filter called `name`.
    pub fn variant_names(&self, name: &str) -> Vec<String> {
        self.variants()
            .iter()
            .map(|(suffix, _)| format!("{}{}", name, suffix))
            .collect()
    }

    /// Whether bound values are hex-decoded before comparison.
    pub fn decodes_hex(&self) -> bool {
        matches!(self, Self::Binary)
    }

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Text => "TEXT",
            Self::Number => "NUMBER",
            Self::Binary => "BINARY",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BOOLEAN" => Ok(Self::Boolean),
            "TEXT" => Ok(Self::Text),
            "NUMBER" => Ok(Self::Number),
            "BINARY" => Ok(Self::Binary),
            _ => Err(QueryError::new(
                ErrorCode::NonSupportedFilterType,
                format!("Unsupported filter type '{}'", s),
            )
            .with_suggestion("Supported filter types are BOOLEAN, TEXT, NUMBER and BINARY")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_names() {
        assert_eq!(
            FilterType::Boolean.variant_names("active"),
            vec!["active", "active_eql", "active_neql"]
        );
        assert_eq!(
            FilterType::Text.variant_names("status"),
            vec!["status", "status_eql", "status_neql", "status_in", "status_like"]
        );
        assert_eq!(
            FilterType::Number.variant_names("age"),
            vec!["age", "age_eql", "age_neql", "age_gt", "age_gte", "age_lt", "age_lte", "age_in"]
        );
        assert_eq!(
            FilterType::Binary.variant_names("hash"),
            vec!["hash", "hash_eql", "hash_neql"]
        );
    }

    #[test]
    fn test_expansion_is_deterministic() {
        for ty in FilterType::ALL {
            assert_eq!(ty.variant_names("x"), ty.variant_names("x"));
        }
    }

    #[test]
    fn test_suffixes_unique_per_type() {
        for ty in FilterType::ALL {
            let mut suffixes: Vec<_> = ty.variants().iter().map(|(s, _)| *s).collect();
            suffixes.sort_unstable();
            suffixes.dedup();
            assert_eq!(suffixes.len(), ty.variants().len());
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("text".parse::<FilterType>().unwrap(), FilterType::Text);
        assert_eq!(" NUMBER ".parse::<FilterType>().unwrap(), FilterType::Number);
        let err = "DATE".parse::<FilterType>().unwrap_err();
        assert!(err.is_unsupported_filter_type());
    }

    #[test]
    fn test_only_binary_decodes_hex() {
        assert!(FilterType::Binary.decodes_hex());
        assert!(!FilterType::Text.decodes_hex());
    }
}

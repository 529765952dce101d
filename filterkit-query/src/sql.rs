//! SQL dialect details used when rendering predicate templates.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Target SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// PostgreSQL uses $1, $2, etc.
    #[default]
    #[serde(rename = "postgres", alias = "postgresql", alias = "pg")]
    PostgreSQL,
    /// MySQL uses ?, ?, etc.
    MySQL,
    /// SQLite uses ?, ?, etc.
    SQLite,
}

impl DatabaseType {
    /// Get the positional parameter placeholder for this database type.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::PostgreSQL => format!("${}", index),
            Self::MySQL | Self::SQLite => "?".to_string(),
        }
    }

    /// Quote an identifier, doubling any embedded quote character.
    pub fn quote_identifier(&self, name: &str) -> String {
        match self {
            Self::MySQL => format!("`{}`", name.replace('`', "``")),
            Self::PostgreSQL | Self::SQLite => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    /// Wrap a bind expression so the database decodes it from hex into bytes.
    pub fn hex_decode(&self, expr: &str) -> String {
        match self {
            Self::PostgreSQL => format!("decode({}, 'hex')", expr),
            Self::MySQL | Self::SQLite => format!("UNHEX({})", expr),
        }
    }

    /// Dialect name as used in configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PostgreSQL => "postgres",
            Self::MySQL => "mysql",
            Self::SQLite => "sqlite",
        }
    }
}

impl FromStr for DatabaseType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::PostgreSQL),
            "mysql" => Ok(Self::MySQL),
            "sqlite" => Ok(Self::SQLite),
            other => Err(QueryError::configuration(format!("unknown dialect '{}'", other))
                .with_suggestion("Use one of: postgres, mysql, sqlite")),
        }
    }
}

/// Quote a string as a SQL literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(DatabaseType::PostgreSQL.quote_identifier("user"), "\"user\"");
        assert_eq!(DatabaseType::SQLite.quote_identifier("has\"quote"), "\"has\"\"quote\"");
        assert_eq!(DatabaseType::MySQL.quote_identifier("order"), "`order`");
    }

    #[test]
    fn test_database_placeholder() {
        assert_eq!(DatabaseType::PostgreSQL.placeholder(1), "$1");
        assert_eq!(DatabaseType::PostgreSQL.placeholder(5), "$5");
        assert_eq!(DatabaseType::MySQL.placeholder(1), "?");
        assert_eq!(DatabaseType::SQLite.placeholder(3), "?");
    }

    #[test]
    fn test_hex_decode() {
        assert_eq!(DatabaseType::PostgreSQL.hex_decode("$1"), "decode($1, 'hex')");
        assert_eq!(DatabaseType::MySQL.hex_decode("?"), "UNHEX(?)");
    }

    #[test]
    fn test_parse_dialect() {
        assert_eq!("PostgreSQL".parse::<DatabaseType>().unwrap(), DatabaseType::PostgreSQL);
        assert_eq!("sqlite".parse::<DatabaseType>().unwrap(), DatabaseType::SQLite);
        assert!("oracle".parse::<DatabaseType>().is_err());
    }

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal("it's"), "'it''s'");
    }
}

//! Filter declaration and the per-entity map of expanded variants.
//!
//! Filters are declared on a [`FilterMapBuilder`] while an entity is
//! constructed. [`FilterMapBuilder::build`] freezes the result into a
//! [`FilterMap`], which has no mutating methods and can be shared freely
//! between threads.
//!
//! ```rust
//! use filterkit_query::filter::{DeclareOptions, FilterMap, FilterType};
//!
//! let mut builder = FilterMap::builder("User");
//! builder
//!     .declare("active", FilterType::Boolean, DeclareOptions::default())?
//!     .declare("age", FilterType::Number, DeclareOptions::column("user_age"))?;
//! let filters = builder.build();
//!
//! assert!(filters.contains("age_gte"));
//! assert_eq!(filters.get("age_gte").unwrap().as_str(), "\"user_age\" >= ${age_gte}");
//! # Ok::<(), filterkit_query::QueryError>(())
//! ```

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::{debug, warn};

use super::template::PredicateTemplate;
use super::types::FilterType;
use crate::compile::{CompiledPredicate, Criteria};
use crate::config::FilterConfig;
use crate::error::{ErrorCode, QueryError, QueryResult};
use crate::sql::DatabaseType;

/// Options for a filter declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclareOptions {
    /// Real column compared by every variant; defaults to the filter name.
    pub column: Option<String>,
}

impl DeclareOptions {
    /// Compare against `column` instead of the filter name.
    pub fn column(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
        }
    }
}

/// A declared filter, as recorded for introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Filter name.
    pub name: SmolStr,
    /// Value type.
    pub filter_type: FilterType,
    /// Real column.
    pub column: String,
}

/// Collects filter declarations for one entity.
#[derive(Debug, Clone)]
pub struct FilterMapBuilder {
    entity: SmolStr,
    config: FilterConfig,
    declarations: IndexMap<SmolStr, Declaration>,
    templates: IndexMap<SmolStr, PredicateTemplate>,
}

impl FilterMapBuilder {
    /// Start declaring filters for `entity` with default configuration.
    pub fn new(entity: impl Into<SmolStr>) -> Self {
        Self::with_config(entity, FilterConfig::default())
    }

    /// Start declaring filters for `entity` with explicit configuration.
    pub fn with_config(entity: impl Into<SmolStr>, config: FilterConfig) -> Self {
        Self {
            entity: entity.into(),
            config,
            declarations: IndexMap::new(),
            templates: IndexMap::new(),
        }
    }

    /// Declare a filter and expand it into its operator variants.
    ///
    /// Redeclaring a name replaces every variant of the earlier declaration.
    pub fn declare(
        &mut self,
        name: &str,
        filter_type: FilterType,
        options: DeclareOptions,
    ) -> QueryResult<&mut Self> {
        validate_name(name)?;
        let name = SmolStr::new(name);
        let column = options.column.unwrap_or_else(|| name.to_string());
        validate_column(&column).map_err(|e| {
            e.with_entity(self.entity.as_str())
                .with_filter(name.as_str())
        })?;

        let dialect = self.config.dialect;
        let expanded: Vec<PredicateTemplate> = filter_type
            .variants()
            .iter()
            .map(|(suffix, operator)| {
                PredicateTemplate::new(
                    SmolStr::new(format!("{}{}", name, suffix)),
                    name.clone(),
                    filter_type,
                    &column,
                    *operator,
                    dialect,
                )
            })
            .collect();

        // Variant keys owned by another filter are never overwritten.
        if let Some(owner) = expanded.iter().find_map(|template| {
            self.templates
                .get(template.variant())
                .filter(|existing| existing.filter() != name.as_str())
        }) {
            return Err(QueryError::new(
                ErrorCode::InvalidFilter,
                format!(
                    "Filter '{}' would replace variant '{}' of filter '{}'",
                    name,
                    owner.variant(),
                    owner.filter()
                ),
            )
            .with_entity(self.entity.as_str())
            .with_filter(name.as_str())
            .with_help("Rename the filter and point it at the column with DeclareOptions::column"));
        }

        if let Some(previous) = self.declarations.get(&name) {
            warn!(
                entity = %self.entity,
                filter = %name,
                previous = %previous.filter_type,
                replacement = %filter_type,
                "Filter redeclared, replacing earlier variants"
            );
            self.templates.retain(|_, t| t.filter() != name.as_str());
        }

        for template in expanded {
            self.templates.insert(SmolStr::new(template.variant()), template);
        }
        self.declarations.insert(
            name.clone(),
            Declaration {
                name: name.clone(),
                filter_type,
                column: column.clone(),
            },
        );

        debug!(
            entity = %self.entity,
            filter = %name,
            filter_type = %filter_type,
            column = %column,
            variants = filter_type.variants().len(),
            "Filter declared"
        );
        Ok(self)
    }

    /// Declare a filter whose type is given by name, e.g. from a schema file.
    ///
    /// An unknown type name fails before anything is registered.
    pub fn declare_named(
        &mut self,
        name: &str,
        type_name: &str,
        options: DeclareOptions,
    ) -> QueryResult<&mut Self> {
        let filter_type = type_name.parse::<FilterType>().map_err(|_| {
            QueryError::unsupported_filter_type(name, type_name).with_entity(self.entity.as_str())
        })?;
        self.declare(name, filter_type, options)
    }

    /// Declare a BOOLEAN filter on the column of the same name.
    pub fn boolean(&mut self, name: &str) -> QueryResult<&mut Self> {
        self.declare(name, FilterType::Boolean, DeclareOptions::default())
    }

    /// Declare a TEXT filter on the column of the same name.
    pub fn text(&mut self, name: &str) -> QueryResult<&mut Self> {
        self.declare(name, FilterType::Text, DeclareOptions::default())
    }

    /// Declare a NUMBER filter on the column of the same name.
    pub fn number(&mut self, name: &str) -> QueryResult<&mut Self> {
        self.declare(name, FilterType::Number, DeclareOptions::default())
    }

    /// Declare a BINARY filter on the column of the same name.
    pub fn binary(&mut self, name: &str) -> QueryResult<&mut Self> {
        self.declare(name, FilterType::Binary, DeclareOptions::default())
    }

    /// Variant names registered so far.
    pub fn list_filters(&self) -> Vec<&str> {
        self.templates.keys().map(SmolStr::as_str).collect()
    }

    /// Freeze the declarations into a read-only map.
    pub fn build(self) -> FilterMap {
        debug!(
            entity = %self.entity,
            filters = self.declarations.len(),
            variants = self.templates.len(),
            "FilterMap built"
        );
        FilterMap {
            entity: self.entity,
            dialect: self.config.dialect,
            declarations: self.declarations,
            templates: self.templates,
        }
    }
}

/// Filter names become bind-parameter names, so they are restricted to
/// ASCII identifiers.
fn validate_name(name: &str) -> QueryResult<()> {
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(QueryError::new(
            ErrorCode::InvalidFilter,
            format!("Invalid filter name '{}'", name),
        )
        .with_filter(name)
        .with_suggestion("Filter names may only contain ASCII letters, digits and '_'")
        .with_help("Use DeclareOptions::column to target a column with a different name"))
    }
}

/// Columns are quoted into every template, so they may not contain
/// placeholder syntax.
fn validate_column(column: &str) -> QueryResult<()> {
    if column.is_empty() {
        return Err(QueryError::new(ErrorCode::InvalidFilter, "Empty column name"));
    }
    if let Some(c) = column.chars().find(|&c| matches!(c, '$' | '{' | '}') || c.is_control()) {
        return Err(QueryError::new(
            ErrorCode::InvalidFilter,
            format!("Column '{}' contains forbidden character {:?}", column, c),
        ));
    }
    Ok(())
}

/// Read-only mapping from variant name to predicate template.
#[derive(Debug, Clone)]
pub struct FilterMap {
    entity: SmolStr,
    dialect: DatabaseType,
    declarations: IndexMap<SmolStr, Declaration>,
    templates: IndexMap<SmolStr, PredicateTemplate>,
}

impl FilterMap {
    /// Start declaring filters for `entity`.
    pub fn builder(entity: impl Into<SmolStr>) -> FilterMapBuilder {
        FilterMapBuilder::new(entity)
    }

    /// Start declaring filters for `entity` with explicit configuration.
    pub fn builder_with(entity: impl Into<SmolStr>, config: FilterConfig) -> FilterMapBuilder {
        FilterMapBuilder::with_config(entity, config)
    }

    /// Entity the filters belong to.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Dialect the templates were rendered for.
    pub fn dialect(&self) -> DatabaseType {
        self.dialect
    }

    /// Look up the template for a variant.
    pub fn get(&self, variant: &str) -> Option<&PredicateTemplate> {
        self.templates.get(variant)
    }

    /// Whether a variant is registered.
    pub fn contains(&self, variant: &str) -> bool {
        self.templates.contains_key(variant)
    }

    /// All registered variant names, in declaration order.
    pub fn list_filters(&self) -> Vec<&str> {
        self.templates.keys().map(SmolStr::as_str).collect()
    }

    /// Declared filters, in declaration order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }

    /// Iterate over all templates.
    pub fn iter(&self) -> impl Iterator<Item = &PredicateTemplate> {
        self.templates.values()
    }

    /// Number of registered variants.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no filters are declared.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Compile criteria against this map.
    pub fn compile(&self, criteria: &Criteria) -> QueryResult<CompiledPredicate> {
        crate::compile::compile(criteria, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::template::Operator;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_registers_five_variants() {
        let mut builder = FilterMap::builder("Ticket");
        builder.text("status").unwrap();
        let map = builder.build();

        assert_eq!(
            map.list_filters(),
            vec!["status", "status_eql", "status_neql", "status_in", "status_like"]
        );
    }

    #[test]
    fn test_real_column_used_on_every_variant() {
        let mut builder = FilterMap::builder("User");
        builder
            .declare("age", FilterType::Number, DeclareOptions::column("user_age"))
            .unwrap();
        let map = builder.build();

        assert_eq!(map.len(), 8);
        for template in map.iter() {
            assert_eq!(template.column(), "user_age");
            assert!(template.as_str().starts_with("\"user_age\" "));
        }
        assert_eq!(map.get("age_in").unwrap().as_str(), "\"user_age\" IN (${age_in:csv})");
        assert_eq!(map.get("age").unwrap().operator(), Operator::Eq);
    }

    #[test]
    fn test_unsupported_type_leaves_map_untouched() {
        let mut builder = FilterMap::builder("Event");
        builder.text("title").unwrap();
        let before = builder.list_filters().iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let err = builder
            .declare_named("starts", "DATE", DeclareOptions::default())
            .unwrap_err();

        assert!(err.is_unsupported_filter_type());
        assert_eq!(err.context.entity, Some("Event".to_string()));
        assert_eq!(builder.list_filters(), before);
    }

    #[test]
    fn test_declare_named_accepts_known_types() {
        let mut builder = FilterMap::builder("Event");
        builder
            .declare_named("public", "boolean", DeclareOptions::default())
            .unwrap();
        assert_eq!(builder.list_filters(), vec!["public", "public_eql", "public_neql"]);
    }

    #[test]
    fn test_redeclare_replaces_previous_variants() {
        let mut builder = FilterMap::builder("Item");
        builder.number("code").unwrap();
        builder.text("code").unwrap();
        let map = builder.build();

        assert!(!map.contains("code_gt"));
        assert!(map.contains("code_like"));
        assert_eq!(map.len(), 5);
        assert_eq!(map.get("code").unwrap().filter_type(), FilterType::Text);
        assert_eq!(map.declarations().count(), 1);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut builder = FilterMap::builder("Item");
        assert!(builder.text("").is_err());
        assert!(builder.text("bad}name").is_err());
        assert!(builder.text("g0.status").is_err());
        assert!(
            builder
                .declare("ok", FilterType::Text, DeclareOptions::column(""))
                .is_err()
        );
        assert!(builder.list_filters().is_empty());
    }

    #[test]
    fn test_column_with_placeholder_syntax_rejected() {
        let mut builder = FilterMap::builder("Item");
        for column in ["x${a}", "cost$", "a{b", "b}", "line\nbreak"] {
            let err = builder
                .declare("a", FilterType::Text, DeclareOptions::column(column))
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidFilter);
            assert_eq!(err.context.filter, Some("a".to_string()));
        }
        assert!(builder.list_filters().is_empty());

        builder
            .declare("a", FilterType::Text, DeclareOptions::column("user name"))
            .unwrap();
        assert_eq!(builder.build().get("a").unwrap().as_str(), "\"user name\" = ${a}");
    }

    #[test]
    fn test_variant_owned_by_other_filter_is_kept() {
        let mut builder = FilterMap::builder("Ticket");
        builder.text("status").unwrap();

        let err = builder.text("status_in").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFilter);
        assert_eq!(builder.list_filters().len(), 5);

        let mut reversed = FilterMap::builder("Ticket");
        reversed.number("age_gt").unwrap();
        assert!(reversed.number("age").is_err());

        let map = builder.build();
        assert_eq!(map.get("status_in").unwrap().operator(), Operator::In);
        assert_eq!(map.declarations().count(), 1);
    }

    #[test]
    fn test_mysql_quoting() {
        let config = FilterConfig::new(DatabaseType::MySQL);
        let mut builder = FilterMap::builder_with("File", config);
        builder.binary("digest").unwrap();
        let map = builder.build();

        assert_eq!(map.dialect(), DatabaseType::MySQL);
        assert_eq!(map.get("digest_neql").unwrap().as_str(), "`digest` <> UNHEX(${digest_neql})");
    }
}

//! # filterkit
//!
//! Declarative entity filters compiled into parameterized SQL predicates.
//!
//! filterkit provides:
//! - One-time filter declarations that expand into comparison variants
//! - AND-within-group, OR-across-groups criteria compilation
//! - Named placeholders only; values travel in a separate parameter bag
//! - Adapters that turn the result into positional binds or escaped literals
//!
//! ## Quick Start
//!
//! ```rust
//! use filterkit::prelude::*;
//!
//! let mut builder = FilterMap::builder("User");
//! builder.number("age")?.text("status")?;
//! let filters = builder.build();
//!
//! let compiled = filters.compile(&criteria! { "age_gte" => 18, "status_in" => vec!["a", "b"] })?;
//! let sql = compiled.resolve_with(&LiteralAdapter::default())?;
//! assert_eq!(sql, "\"age\" >= 18 AND \"status\" IN ('a','b')");
//! # Ok::<(), filterkit::QueryError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Filter declaration, compilation and binding.
pub mod query {
    pub use filterkit_query::*;
}

pub use filterkit_query::{
    Adapter, BoundQuery, CompiledPredicate, Criteria, DatabaseType, DeclareOptions, Entity,
    ErrorCode, FilterConfig, FilterMap, FilterMapBuilder, FilterType, FilterValue, Group,
    LiteralAdapter, Persistence, PositionalAdapter, QueryError, QueryResult, criteria, group,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use filterkit_query::prelude::*;
}

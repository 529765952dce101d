//! # filterkit-query
//!
//! Declarative filter registration and predicate compilation.
//!
//! An entity declares once which filters it supports and what value type
//! each accepts. Every declaration expands into a fixed family of
//! comparison variants. At query time caller criteria compile into a
//! parameterized predicate clause plus a bag of values; an adapter then
//! binds those values for the database.
//!
//! ## Declaring Filters
//!
//! ```rust
//! use filterkit_query::{DeclareOptions, FilterMap, FilterType};
//!
//! let mut builder = FilterMap::builder("Order");
//! builder
//!     .text("status")?
//!     .number("total")?
//!     .declare("paid", FilterType::Boolean, DeclareOptions::column("is_paid"))?;
//! let filters = builder.build();
//!
//! assert!(filters.contains("total_lte"));
//! assert!(filters.contains("status_like"));
//! # Ok::<(), filterkit_query::QueryError>(())
//! ```
//!
//! | Type    | Variants |
//! |---------|----------|
//! | BOOLEAN | `x`, `x_eql`, `x_neql` |
//! | TEXT    | `x`, `x_eql`, `x_neql`, `x_in`, `x_like` |
//! | NUMBER  | `x`, `x_eql`, `x_neql`, `x_gt`, `x_gte`, `x_lt`, `x_lte`, `x_in` |
//! | BINARY  | `x`, `x_eql`, `x_neql` (hex-decoded) |
//!
//! ## Compiling Criteria
//!
//! ```rust
//! use filterkit_query::{FilterMap, criteria};
//!
//! let mut builder = FilterMap::builder("Order");
//! builder.text("status")?.number("total")?;
//! let filters = builder.build();
//!
//! let compiled = filters.compile(&criteria!(or
//!     { "status" => "open", "total_gt" => 100 },
//!     { "status" => "refunded" },
//! ))?;
//!
//! assert_eq!(
//!     compiled.clause(),
//!     "(\"status\" = ${g0.status} AND \"total\" > ${g0.total_gt}) OR (\"status\" = ${g1.status})"
//! );
//! # Ok::<(), filterkit_query::QueryError>(())
//! ```
//!
//! ## Binding
//!
//! ```rust
//! use filterkit_query::{FilterMap, PositionalAdapter, criteria};
//!
//! let mut builder = FilterMap::builder("Order");
//! builder.number("total")?;
//! let filters = builder.build();
//!
//! let compiled = filters.compile(&criteria! { "total_in" => vec![1, 2, 3] })?;
//! let bound = compiled.resolve_with(&PositionalAdapter::default())?;
//! assert_eq!(bound.sql(), "\"total\" IN ($1, $2, $3)");
//! # Ok::<(), filterkit_query::QueryError>(())
//! ```

pub mod adapter;
pub mod compile;
pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod logging;
#[macro_use]
pub mod macros;
pub mod sql;

pub use adapter::{Adapter, BoundQuery, LiteralAdapter, PositionalAdapter};
pub use compile::{CompiledPredicate, Criteria, Group, ParamBag, compile};
pub use config::FilterConfig;
pub use entity::{Entity, FieldSet, Persistence};
pub use error::{ErrorCode, ErrorContext, QueryError, QueryResult, Suggestion};
pub use filter::{
    BindKind, DeclareOptions, Declaration, FilterMap, FilterMapBuilder, FilterType, FilterValue,
    Operator, PredicateTemplate, ValueTransform,
};
pub use sql::DatabaseType;

// Re-export logging utilities
pub use logging::{get_log_format, get_log_level, init as init_logging, is_debug_enabled};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::adapter::{Adapter, LiteralAdapter, PositionalAdapter};
    pub use crate::compile::{CompiledPredicate, Criteria, Group};
    pub use crate::entity::{Entity, FieldSet, Persistence};
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::filter::{DeclareOptions, FilterMap, FilterType, FilterValue};
    pub use crate::{criteria, group};
}

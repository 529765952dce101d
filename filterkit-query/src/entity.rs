//! Entity contracts.
//!
//! [`Entity`] is the filter capability: an entity owns a [`FilterMap`]
//! built during construction and compiles criteria against it.
//! [`Persistence`] lists the storage operations an entity must provide.
//! They are required trait methods, so a missing operation is a compile
//! error rather than a runtime surprise. Implementations that deliberately
//! stub an operation return
//! [`QueryError::implementation_pending`](crate::error::QueryError::implementation_pending), which
//! is distinct from every compilation error.

use async_trait::async_trait;
use smol_str::SmolStr;

use crate::compile::{CompiledPredicate, Criteria};
use crate::error::QueryResult;
use crate::filter::FilterMap;

/// A named set of columns an entity can project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    /// Set name, e.g. `"summary"`.
    pub name: SmolStr,
    /// Columns in the set.
    pub fields: Vec<SmolStr>,
}

impl FieldSet {
    /// Create a field set.
    pub fn new<I, S>(name: impl Into<SmolStr>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// An entity exposing declared filters.
pub trait Entity: Send + Sync {
    /// The entity's filters, declared at construction.
    fn filters(&self) -> &FilterMap;

    /// Entity name used in errors and logs.
    fn name(&self) -> &str {
        self.filters().entity()
    }

    /// All variant names accepted by [`compile`](Entity::compile).
    fn list_filters(&self) -> Vec<&str> {
        self.filters().list_filters()
    }

    /// Compile criteria into a predicate clause and parameter bag.
    fn compile(&self, criteria: &Criteria) -> QueryResult<CompiledPredicate> {
        self.filters().compile(criteria)
    }
}

/// Storage operations of an entity.
#[async_trait]
pub trait Persistence: Entity {
    /// A stored record.
    type Record: Send + Sync;
    /// A partial update.
    type Patch: Send + Sync;

    /// Fetch the first record matching the criteria.
    async fn fetch_one(&self, criteria: &Criteria) -> QueryResult<Option<Self::Record>>;

    /// Fetch every record matching the criteria.
    async fn fetch_all(&self, criteria: &Criteria) -> QueryResult<Vec<Self::Record>>;

    /// Count records matching the criteria.
    async fn count(&self, criteria: &Criteria) -> QueryResult<u64>;

    /// Insert a new record.
    async fn create(&self, record: Self::Record) -> QueryResult<Self::Record>;

    /// Apply a patch to every matching record, returning how many changed.
    async fn update(&self, criteria: &Criteria, patch: Self::Patch) -> QueryResult<u64>;

    /// Insert or replace a record.
    async fn persist(&self, record: Self::Record) -> QueryResult<Self::Record>;

    /// Whether any record matches the criteria.
    async fn exists(&self, criteria: &Criteria) -> QueryResult<bool>;

    /// Column sets this entity can project.
    fn field_sets(&self) -> Vec<FieldSet>;
}

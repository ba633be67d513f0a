//! # Document Store Module
//!
//! Read-only access to the curated metadata collections (`clouder_weeks`,
//! `sp_playlists`). Records come back as opaque JSON objects; turning them
//! into domain types is the caller's job.
//!
//! The [`DataStore`] trait is the seam the orchestrator depends on.
//! [`JsonStore`] is the shipped implementation, backed by one JSON file per
//! collection.

mod json;

pub use json::JsonStore;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// A single stored record.
pub type Record = Map<String, Value>;

/// Field that identifies a record inside the store and is never returned.
pub const INTERNAL_ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Shape of a read against one collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Equality-only conjunction.
    pub filter: Vec<(String, Value)>,
    /// Projection; `None` keeps every field.
    pub fields: Option<Vec<String>>,
    pub sort: Vec<(String, SortOrder)>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.push((field.into(), value.into()));
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort.push((field.into(), order));
        self
    }

    /// Whether `record` satisfies every equality in the filter.
    pub fn matches(&self, record: &Record) -> bool {
        self.filter
            .iter()
            .all(|(field, expected)| record.get(field) == Some(expected))
    }

    /// Applies the projection and strips the internal id.
    pub fn project(&self, mut record: Record) -> Record {
        record.remove(INTERNAL_ID_FIELD);
        match &self.fields {
            Some(fields) => record
                .into_iter()
                .filter(|(key, _)| fields.iter().any(|f| f == key))
                .collect(),
            None => record,
        }
    }
}

/// Read access to collections of curated metadata.
///
/// Implementations are stateless per call and must return records in store
/// order (or sort order, when the query asks for one).
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Record>, StoreError>;
}

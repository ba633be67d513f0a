use std::{cmp::Ordering, io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use super::{DataStore, Query, Record, SortOrder};
use crate::error::StoreError;

/// Document store backed by `<root>/<collection>.json` files.
///
/// Each file holds a JSON array of objects. Files are read on every query;
/// a missing file is an empty collection.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.json"))
    }

    async fn load(&self, collection: &str) -> Result<Vec<Record>, StoreError> {
        let path = self.collection_path(collection);
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    collection: collection.to_string(),
                    source,
                });
            }
        };

        let documents: Vec<Value> =
            serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
                collection: collection.to_string(),
                reason: e.to_string(),
            })?;

        documents
            .into_iter()
            .enumerate()
            .map(|(index, document)| match document {
                Value::Object(record) => Ok(record),
                other => Err(StoreError::Malformed {
                    collection: collection.to_string(),
                    reason: format!("document {index} is not an object: {other}"),
                }),
            })
            .collect()
    }
}

#[async_trait]
impl DataStore for JsonStore {
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Record>, StoreError> {
        tracing::debug!(collection, filter = ?query.filter, "querying collection");

        let mut records: Vec<Record> = self
            .load(collection)
            .await?
            .into_iter()
            .filter(|record| query.matches(record))
            .collect();

        if !query.sort.is_empty() {
            records.sort_by(|a, b| compare_records(a, b, &query.sort));
        }

        Ok(records
            .into_iter()
            .map(|record| query.project(record))
            .collect())
    }
}

fn compare_records(a: &Record, b: &Record, sort: &[(String, SortOrder)]) -> Ordering {
    for (field, order) in sort {
        let ordering = compare_values(a.get(field), b.get(field));
        let ordering = match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

// Missing values sort first; mixed types fall back to their JSON text.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

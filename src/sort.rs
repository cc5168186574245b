//! Sort Engine
//!
//! Orders rows by a single column key with absent values first.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GridError, Result};
use crate::resolve::{TypeRegistry, Value};

// == Sort Direction ==
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("ascending"),
            SortDirection::Descending => f.write_str("descending"),
        }
    }
}

// == Column Sort Key ==
/// The one active sort of a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSortKey {
    /// Path expression of the sorted column
    pub path: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl ColumnSortKey {
    pub fn new(path: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            path: path.into(),
            direction,
        }
    }

    pub fn ascending(path: impl Into<String>) -> Self {
        Self::new(path, SortDirection::Ascending)
    }

    pub fn descending(path: impl Into<String>) -> Self {
        Self::new(path, SortDirection::Descending)
    }
}

// == Sort Engine ==
/// Stable single-key sort over resolved column values.
#[derive(Debug, Clone)]
pub struct SortEngine {
    registry: Arc<TypeRegistry>,
}

impl SortEngine {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    /// Returns `items` ordered by the value `value_of` yields for `key.path`.
    ///
    /// `value_of` runs once per item. Absent values (and `Null`) come first
    /// in both directions; the direction only orders present values among
    /// themselves. Equal keys keep their input order.
    ///
    /// Fails with `UnsortableColumn` when the present values have no common
    /// natural ordering, without producing any partial result.
    pub fn sort<T, F>(&self, items: &[T], key: &ColumnSortKey, mut value_of: F) -> Result<Vec<T>>
    where
        T: Clone,
        F: FnMut(&T, &str) -> Option<Value>,
    {
        let mut keyed: Vec<(Option<Value>, &T)> = items
            .iter()
            .map(|item| (value_of(item, key.path.as_str()).filter(|v| !v.is_null()), item))
            .collect();

        self.ensure_orderable(&keyed, &key.path)?;

        keyed.sort_by(|(a, _), (b, _)| match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => {
                let ordering = self.registry.compare(a, b).unwrap_or(Ordering::Equal);
                match key.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            }
        });

        debug!(path = %key.path, direction = %key.direction, rows = items.len(), "sorted rows");
        Ok(keyed.into_iter().map(|(_, item)| item.clone()).collect())
    }

    /// Every present value must compare with the first one, which puts them
    /// all in one ordering class.
    fn ensure_orderable<T>(&self, keyed: &[(Option<Value>, &T)], path: &str) -> Result<()> {
        let mut present = keyed.iter().filter_map(|(value, _)| value.as_ref());
        let Some(first) = present.next() else {
            return Ok(());
        };

        let orderable = self.registry.compare(first, first).is_some()
            && present.all(|value| self.registry.compare(first, value).is_some());
        if orderable {
            Ok(())
        } else {
            Err(GridError::UnsortableColumn(path.to_string()))
        }
    }
}

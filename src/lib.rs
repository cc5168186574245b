//! Gridcore - value resolution for data grids
//!
//! Resolves dotted member paths against row objects with bounded LRU
//! memoization, sorts rows by a resolved column and slices them into pages.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod grid;
pub mod models;
pub mod paging;
pub mod resolve;
pub mod sort;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::{BoundedCache, CacheStats};
pub use config::Config;
pub use error::{GridError, Result};
pub use grid::{rows_from_json, GridView};
pub use paging::{Page, Paginator};
pub use resolve::{ObjectRef, PathResolver, Record, TypeRegistry, Value, ValueType};
pub use sort::{ColumnSortKey, SortDirection, SortEngine};
pub use tasks::spawn_prefetch_task;

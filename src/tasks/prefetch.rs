//! Cell Prefetch Task
//!
//! Resolves the cells of rows that are about to scroll into view, so the
//! value cache is warm when they are rendered.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::resolve::{ObjectRef, PathResolver};

/// Resolves every `(row, column)` pair on the blocking pool.
///
/// Resolution is synchronous CPU work, so it runs on `spawn_blocking` and
/// never holds up the async workers. The handle yields the number of cells
/// resolved; dropping it detaches the task.
pub fn spawn_prefetch_task(
    resolver: Arc<PathResolver>,
    rows: Vec<ObjectRef>,
    columns: Vec<String>,
) -> JoinHandle<usize> {
    tokio::task::spawn_blocking(move || {
        let mut resolved = 0;
        for row in &rows {
            for column in &columns {
                resolver.resolve_value(Some(row), column);
                resolved += 1;
            }
        }
        debug!(rows = rows.len(), resolved, "prefetched cells");
        resolved
    })
}

//! API Handlers
//!
//! HTTP request handlers for each grid server endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::debug;

use crate::config::Config;
use crate::error::{GridError, Result};
use crate::grid::{rows_from_json, GridView};
use crate::models::{
    CacheSizeResponse, CellQuery, CellResponse, HealthResponse, PageNumberRequest,
    PageNumberResponse, PageQuery, PageResponse, PageSizeResponse, RowsResponse, SizeRequest,
    SortRequest, SortResponse, StatsResponse,
};
use crate::resolve::{ObjectRef, PathResolver, TypeRegistry, Value};
use crate::sort::ColumnSortKey;
use crate::tasks::spawn_prefetch_task;

/// Application state shared across all handlers.
///
/// The resolver is shared process-wide; the grid holds the rows, sort and
/// page of the single view the server exposes.
#[derive(Clone)]
pub struct AppState {
    pub grid: Arc<RwLock<GridView>>,
    pub resolver: Arc<PathResolver>,
}

impl AppState {
    /// Wraps a grid, sharing its resolver.
    pub fn new(grid: GridView) -> Self {
        let resolver = Arc::clone(grid.resolver());
        Self {
            grid: Arc::new(RwLock::new(grid)),
            resolver,
        }
    }

    /// Creates the resolver and an empty grid from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let resolver = PathResolver::new(Arc::new(TypeRegistry::new()), config.cache_size)?;
        let grid = GridView::new(Arc::new(resolver), config.page_size)?;
        Ok(Self::new(grid))
    }
}

/// Handler for PUT /rows
///
/// Replaces the grid rows with a JSON array of objects.
pub async fn put_rows_handler(
    State(state): State<AppState>,
    Json(rows): Json<Vec<serde_json::Value>>,
) -> Result<Json<RowsResponse>> {
    let rows = rows_from_json(rows)?;

    let mut grid = state.grid.write().await;
    grid.set_rows(rows);

    Ok(Json(RowsResponse {
        total_items: grid.len(),
        page_count: grid.page_count(),
        sort: grid.sort_key().cloned(),
    }))
}

/// Handler for GET /page
///
/// Returns the current page. With `columns`, each row is projected onto those
/// paths and the next page's cells are prefetched in the background.
pub async fn get_page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse>> {
    let columns = query.column_paths();
    let grid = state.grid.read().await;
    let page = grid.current_page();

    let rows = page
        .items
        .iter()
        .map(|row| render_row(&grid, row, &columns))
        .collect::<Result<Vec<_>>>()?;

    if !columns.is_empty() {
        if let Some(next) = grid.next_page() {
            debug!(page = next.number, "prefetching next page");
            spawn_prefetch_task(Arc::clone(&state.resolver), next.items, columns);
        }
    }

    Ok(Json(PageResponse {
        number: page.number,
        size: page.size,
        page_count: page.page_count,
        total_items: page.total_items,
        sort: grid.sort_key().cloned(),
        rows,
    }))
}

fn render_row(grid: &GridView, row: &ObjectRef, columns: &[String]) -> Result<serde_json::Value> {
    let rendered = if columns.is_empty() {
        serde_json::to_value(Value::Object(row.clone()))
    } else {
        let cells = columns
            .iter()
            .map(|path| -> serde_json::Result<(String, serde_json::Value)> {
                Ok((path.clone(), serde_json::to_value(grid.cell(row, path))?))
            })
            .collect::<serde_json::Result<serde_json::Map<_, _>>>();
        cells.map(serde_json::Value::Object)
    };
    rendered.map_err(|err| GridError::Internal(err.to_string()))
}

/// Handler for PUT /sort
///
/// Sets the sort column. Without a direction the column is toggled.
pub async fn put_sort_handler(
    State(state): State<AppState>,
    Json(req): Json<SortRequest>,
) -> Result<Json<SortResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(GridError::InvalidRequest(error_msg));
    }

    let path = req.path.trim();
    let mut grid = state.grid.write().await;
    let key = match req.direction {
        Some(direction) => {
            let key = ColumnSortKey::new(path, direction);
            grid.set_sort(Some(key.clone()))?;
            key
        }
        None => grid.toggle_sort(path)?,
    };

    Ok(Json(SortResponse { sort: Some(key) }))
}

/// Handler for DELETE /sort
///
/// Restores input order.
pub async fn delete_sort_handler(State(state): State<AppState>) -> Result<Json<SortResponse>> {
    let mut grid = state.grid.write().await;
    grid.set_sort(None)?;

    Ok(Json(SortResponse { sort: None }))
}

/// Handler for PUT /page-size
pub async fn put_page_size_handler(
    State(state): State<AppState>,
    Json(req): Json<SizeRequest>,
) -> Result<Json<PageSizeResponse>> {
    let mut grid = state.grid.write().await;
    grid.configure_page_size(req.as_usize())?;

    let paginator = grid.paginator();
    Ok(Json(PageSizeResponse {
        size: paginator.page_size(),
        number: paginator.page_number(),
        page_count: grid.page_count(),
        known_sizes: paginator.known_page_sizes(),
    }))
}

/// Handler for PUT /page
///
/// Moves to the requested page, clamped to the valid range.
pub async fn put_page_handler(
    State(state): State<AppState>,
    Json(req): Json<PageNumberRequest>,
) -> Json<PageNumberResponse> {
    let mut grid = state.grid.write().await;
    let number = grid.set_page_number(req.as_usize());

    Json(PageNumberResponse {
        number,
        page_count: grid.page_count(),
    })
}

/// Handler for PUT /cache-size
///
/// Replaces both resolver caches with empty ones of the new size.
pub async fn put_cache_size_handler(
    State(state): State<AppState>,
    Json(req): Json<SizeRequest>,
) -> Result<Json<CacheSizeResponse>> {
    state.resolver.set_cache_size(req.as_usize())?;

    Ok(Json(CacheSizeResponse {
        size: state.resolver.cache_size(),
    }))
}

/// Handler for GET /cell/:row
///
/// Resolves one cell; `row` is the 0-based index in display order.
pub async fn get_cell_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Query(query): Query<CellQuery>,
) -> Result<Json<CellResponse>> {
    let grid = state.grid.read().await;
    let row = grid
        .row(index)
        .ok_or_else(|| GridError::NotFound(format!("row {index}")))?;
    let value = grid.cell(row, &query.path);

    Ok(Json(CellResponse::new(index, query.path, value)))
}

/// Handler for GET /stats
///
/// Returns resolver cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let total_rows = state.grid.read().await.len();

    Json(StatsResponse {
        value_cache: state.resolver.value_cache_stats().into(),
        type_cache: state.resolver.type_cache_stats().into(),
        total_rows,
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortDirection;
    use serde_json::json;

    fn test_state(page_size: usize) -> AppState {
        let config = Config {
            cache_size: 100,
            page_size,
            ..Config::default()
        };
        AppState::from_config(&config).unwrap()
    }

    async fn load(state: &AppState, rows: Vec<serde_json::Value>) {
        put_rows_handler(State(state.clone()), Json(rows))
            .await
            .unwrap();
    }

    fn people() -> Vec<serde_json::Value> {
        vec![
            json!({"Name": "Cy", "Age": 41}),
            json!({"Name": "Ab", "Age": 29}),
            json!({"Name": "Bo"}),
        ]
    }

    #[tokio::test]
    async fn test_put_rows_and_page() {
        let state = test_state(2);
        let Json(resp) = put_rows_handler(State(state.clone()), Json(people()))
            .await
            .unwrap();
        assert_eq!(resp.total_items, 3);
        assert_eq!(resp.page_count, 2);

        let Json(page) = get_page_handler(State(state), Query(PageQuery::default()))
            .await
            .unwrap();
        assert_eq!(page.number, 1);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0], json!({"Name": "Cy", "Age": 41}));
    }

    #[tokio::test]
    async fn test_put_rows_rejects_non_objects() {
        let state = test_state(10);
        let result = put_rows_handler(State(state), Json(vec![json!({}), json!(3)])).await;
        assert!(matches!(result, Err(GridError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_page_projects_columns() {
        let state = test_state(10);
        load(&state, people()).await;

        let query = PageQuery {
            columns: Some("Name,Age".to_string()),
        };
        let Json(page) = get_page_handler(State(state), Query(query)).await.unwrap();
        assert_eq!(page.rows[2], json!({"Name": "Bo", "Age": null}));
    }

    #[tokio::test]
    async fn test_sort_toggle_and_explicit_direction() {
        let state = test_state(10);
        load(&state, people()).await;

        let req = SortRequest {
            path: "Age".to_string(),
            direction: None,
        };
        let Json(resp) = put_sort_handler(State(state.clone()), Json(req.clone()))
            .await
            .unwrap();
        assert_eq!(resp.sort, Some(ColumnSortKey::ascending("Age")));

        let Json(resp) = put_sort_handler(State(state.clone()), Json(req))
            .await
            .unwrap();
        assert_eq!(resp.sort, Some(ColumnSortKey::descending("Age")));

        let req = SortRequest {
            path: "Name".to_string(),
            direction: Some(SortDirection::Descending),
        };
        put_sort_handler(State(state.clone()), Json(req))
            .await
            .unwrap();

        let Json(cell) = get_cell_handler(
            State(state),
            Path(0),
            Query(CellQuery {
                path: "Name".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(cell.text, "Cy");
    }

    #[tokio::test]
    async fn test_sort_unsortable_column() {
        let state = test_state(10);
        load(&state, vec![json!({"V": 1}), json!({"V": "x"})]).await;

        let req = SortRequest {
            path: "V".to_string(),
            direction: None,
        };
        let result = put_sort_handler(State(state.clone()), Json(req)).await;
        assert!(matches!(result, Err(GridError::UnsortableColumn(_))));
        assert!(state.grid.read().await.sort_key().is_none());
    }

    #[tokio::test]
    async fn test_delete_sort_restores_input_order() {
        let state = test_state(10);
        load(&state, people()).await;
        state
            .grid
            .write()
            .await
            .set_sort(Some(ColumnSortKey::ascending("Name")))
            .unwrap();

        let Json(resp) = delete_sort_handler(State(state.clone())).await.unwrap();
        assert!(resp.sort.is_none());

        let grid = state.grid.read().await;
        let first = grid.row(0).unwrap();
        assert_eq!(grid.cell(first, "Name").unwrap().to_string(), "Cy");
    }

    #[tokio::test]
    async fn test_page_size_and_number() {
        let state = test_state(10);
        load(&state, people()).await;

        let Json(resp) = put_page_size_handler(State(state.clone()), Json(SizeRequest { size: 1 }))
            .await
            .unwrap();
        assert_eq!(resp.size, 1);
        assert_eq!(resp.page_count, 3);
        assert!(resp.known_sizes.contains(&1));

        let Json(resp) = put_page_handler(State(state.clone()), Json(PageNumberRequest { number: 9 })).await;
        assert_eq!(resp.number, 3);

        let result = put_page_size_handler(State(state), Json(SizeRequest { size: 0 })).await;
        assert!(matches!(result, Err(GridError::InvalidConfiguration(_))));
    }

    #[tokio::test]
    async fn test_cache_size_resets_stats() {
        let state = test_state(10);
        load(&state, people()).await;
        get_page_handler(
            State(state.clone()),
            Query(PageQuery {
                columns: Some("Name".to_string()),
            }),
        )
        .await
        .unwrap();
        assert!(state.resolver.value_cache_stats().total_entries > 0);

        let Json(resp) = put_cache_size_handler(State(state.clone()), Json(SizeRequest { size: 7 }))
            .await
            .unwrap();
        assert_eq!(resp.size, 7);

        let Json(stats) = stats_handler(State(state)).await;
        assert_eq!(stats.value_cache.stats.total_entries, 0);
        assert_eq!(stats.value_cache.stats.capacity, 7);
        assert_eq!(stats.total_rows, 3);
    }

    #[tokio::test]
    async fn test_cache_size_rejects_zero() {
        let state = test_state(10);
        let result = put_cache_size_handler(State(state.clone()), Json(SizeRequest { size: -1 })).await;
        assert!(matches!(result, Err(GridError::InvalidConfiguration(_))));
        assert_eq!(state.resolver.cache_size(), 100);
    }

    #[tokio::test]
    async fn test_cell_out_of_range() {
        let state = test_state(10);
        let result = get_cell_handler(
            State(state),
            Path(0),
            Query(CellQuery {
                path: "Name".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(GridError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let Json(resp) = health_handler().await;
        assert_eq!(resp.status, "healthy");
    }
}

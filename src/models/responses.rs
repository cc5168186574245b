//! Response DTOs for the grid server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::resolve::Value;
use crate::sort::ColumnSortKey;

/// Response body for PUT /rows
#[derive(Debug, Clone, Serialize)]
pub struct RowsResponse {
    pub total_items: usize,
    pub page_count: usize,
    /// Active sort after the rows were replaced; cleared if it no longer applies
    pub sort: Option<ColumnSortKey>,
}

/// Response body for GET /page
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub number: usize,
    pub size: usize,
    pub page_count: usize,
    pub total_items: usize,
    pub sort: Option<ColumnSortKey>,
    /// One entry per row: the whole row, or only the requested columns
    pub rows: Vec<serde_json::Value>,
}

/// Response body for PUT /sort and DELETE /sort
#[derive(Debug, Clone, Serialize)]
pub struct SortResponse {
    pub sort: Option<ColumnSortKey>,
}

/// Response body for PUT /page-size
#[derive(Debug, Clone, Serialize)]
pub struct PageSizeResponse {
    pub size: usize,
    pub number: usize,
    pub page_count: usize,
    pub known_sizes: Vec<usize>,
}

/// Response body for PUT /page
#[derive(Debug, Clone, Serialize)]
pub struct PageNumberResponse {
    pub number: usize,
    pub page_count: usize,
}

/// Response body for PUT /cache-size
#[derive(Debug, Clone, Serialize)]
pub struct CacheSizeResponse {
    pub size: usize,
}

/// Response body for GET /cell/:row
#[derive(Debug, Clone, Serialize)]
pub struct CellResponse {
    pub row: usize,
    pub path: String,
    /// Resolved value; null when absent
    pub value: Option<Value>,
    /// Display text; empty when absent
    pub text: String,
}

impl CellResponse {
    pub fn new(row: usize, path: impl Into<String>, value: Option<Value>) -> Self {
        let text = value.as_ref().map(ToString::to_string).unwrap_or_default();
        Self {
            row,
            path: path.into(),
            value,
            text,
        }
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub value_cache: CacheStatsView,
    pub type_cache: CacheStatsView,
    pub total_rows: usize,
}

/// Cache counters plus the derived hit rate
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsView {
    #[serde(flatten)]
    pub stats: CacheStats,
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheStatsView {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_response_absent() {
        let resp = CellResponse::new(2, "Address.City", None);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, json!({"row": 2, "path": "Address.City", "value": null, "text": ""}));
    }

    #[test]
    fn test_cell_response_present() {
        let resp = CellResponse::new(0, "Age", Some(Value::Integer(41)));
        assert_eq!(resp.text, "41");
    }

    #[test]
    fn test_stats_view_flattens_counters() {
        let mut stats = CacheStats::new(10);
        stats.record_hit();
        stats.record_miss();

        let json = serde_json::to_value(CacheStatsView::from(stats)).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["capacity"], 10);
        assert_eq!(json["hit_rate"], 0.5);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}

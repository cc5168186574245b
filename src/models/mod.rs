//! Request and Response models for the grid server API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CellQuery, PageNumberRequest, PageQuery, SizeRequest, SortRequest};
pub use responses::{
    CacheSizeResponse, CacheStatsView, CellResponse, HealthResponse, PageNumberResponse,
    PageResponse, PageSizeResponse, RowsResponse, SortResponse, StatsResponse,
};

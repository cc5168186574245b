//! API Module
//!
//! HTTP handlers and routing for the grid server REST API.
//!
//! # Endpoints
//! - `PUT /rows` - Replace the grid rows
//! - `GET /page` - Current page
//! - `PUT /sort`, `DELETE /sort` - Sort column
//! - `PUT /page-size`, `PUT /page` - Paging
//! - `PUT /cache-size` - Resolver cache capacity
//! - `GET /cell/:row` - Resolve one cell
//! - `GET /stats` - Resolver cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

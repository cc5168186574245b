//! Background tasks
//!
//! Work that runs beside request handling.

mod prefetch;

pub use prefetch::spawn_prefetch_task;

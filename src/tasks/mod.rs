//! Background Tasks Module
//!
//! Contains background tasks that run periodically while caches are alive.
//!
//! # Tasks
//! - Expiry sweep: removes expired cache entries at a configured interval

mod sweep;

pub use sweep::spawn_sweep_task;

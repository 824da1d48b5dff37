//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: Removes records whose TTL has elapsed at configured intervals

mod sweep;

pub use sweep::spawn_sweep_task;

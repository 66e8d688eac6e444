//! Crawler module for Fathom
//!
//! This module contains the concurrency core:
//! - the breadth-first driver walking depth layers
//! - per-host admission control
//! - the bounded download and extraction pools
//! - the layer rendezvous that keeps depth ordering strict

mod barrier;
mod coordinator;
mod pool;
mod throttle;

pub use barrier::WaitGroup;
pub use coordinator::{CrawlResult, Crawler};
pub use pool::{TaskGuard, WorkerPool};
pub use throttle::HostThrottle;

//! URL handling module for Fathom
//!
//! This module derives throttle keys (hosts) from raw URL strings and
//! checks URLs against exclude patterns.

mod host;
mod matcher;

pub use host::extract_host;
pub use matcher::matches_any;

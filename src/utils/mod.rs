//! Utility modules for the tree card viewer.

pub mod formatting;

pub use formatting::{describe_policy, format_count, format_memory_mb, get_current_memory_mb};

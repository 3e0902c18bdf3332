//! Sharded file cache and invalidation filters.

mod file_cache;
mod filter;

pub use file_cache::FileCache;
pub use filter::{AgeFilter, CacheFilter, PatternFilter};

//! Cache module for storing fetched roster pages on disk
//!
//! Entries are JSON files stamped with their write time. Reads only return
//! entries younger than the manager's TTL; older ones behave as if missing.

mod manager;

pub use manager::{CacheError, CacheManager, CachedData, DEFAULT_TTL_DAYS};

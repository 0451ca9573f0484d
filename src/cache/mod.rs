//! Blogstats cache layer
//!
//! Derived per-user views live in a key-value cache and are never
//! authoritative:
//!
//! - **Profile articles**: a user's most recent blog articles, filled on miss
//!   and expiring after a short TTL.
//! - **User stats**: the persisted stats record, invalidated whenever the
//!   count is recomputed.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! article_list_ttl_seconds = 60
//! article_list_limit = 5
//! ```

mod config;
mod keys;
mod lock;
mod store;

pub use config::{CacheConfig, MAX_ARTICLE_LIST_LIMIT};
pub use keys::CacheKey;
pub use store::{CacheError, KeyValueCache, MemoryCache, get_json, set_json};

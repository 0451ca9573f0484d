//! Cache key definitions.

use std::fmt;

use crate::domain::types::UserId;

/// Keys of the derived per-user views held in the key-value cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Recent blog articles shown on a user's profile.
    ProfileArticles(UserId),
    /// The user's persisted stats record.
    UserStats(UserId),
}

impl CacheKey {
    pub fn user_id(&self) -> UserId {
        match self {
            CacheKey::ProfileArticles(id) | CacheKey::UserStats(id) => *id,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::ProfileArticles(id) => write!(f, "user:profile:articles:{id}"),
            CacheKey::UserStats(id) => write!(f, "user:stats:{id}"),
        }
    }
}

//! Records read from or written to the platform store.

use serde::{Deserialize, Serialize};

use super::types::{Namespace, PageId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
}

/// The user performing an action. Anonymous editors have no account id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    Registered(UserRecord),
}

impl Actor {
    pub fn registered(id: i64, name: impl Into<String>) -> Self {
        Self::Registered(UserRecord {
            id: UserId(id),
            name: name.into(),
        })
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Actor::Anonymous)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Actor::Anonymous => None,
            Actor::Registered(user) => Some(user.name.as_str()),
        }
    }
}

/// One entry of a user's recent blog article list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogArticleSummary {
    pub page_id: PageId,
    pub title: String,
    pub namespace: Namespace,
}

/// Persisted per-user aggregate. `articles_created` is always an absolute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBlogStats {
    pub user_id: UserId,
    pub articles_created: u64,
}

impl UserBlogStats {
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            articles_created: 0,
        }
    }
}

/// Payload of the platform's content-saved event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSaved {
    /// `None` while the page has no persisted identity yet.
    pub page_id: Option<PageId>,
    pub author: Actor,
    pub title: String,
    pub namespace: Namespace,
}

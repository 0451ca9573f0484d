//! Shared domain identifiers aligned with the platform's persisted columns.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable numeric account id (`users.user_id`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable page id (`page.page_id`). Higher ids are more recent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct PageId(pub i64);

impl PageId {
    /// Pages still being created carry id 0 until the platform persists them.
    pub fn assigned(raw: i64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Platform namespace number (`page.page_namespace`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct Namespace(pub i32);

impl Namespace {
    pub const MAIN: Namespace = Namespace(0);
    pub const CATEGORY: Namespace = Namespace(14);
    pub const BLOG: Namespace = Namespace(500);
    pub const BLOG_TALK: Namespace = Namespace(501);

    pub fn is_blog(self) -> bool {
        self == Self::BLOG
    }

    pub fn canonical_name(self) -> Option<&'static str> {
        match self {
            Self::BLOG => Some("Blog"),
            Self::BLOG_TALK => Some("Blog_talk"),
            _ => None,
        }
    }
}

/// Add the Blog namespace pair to the platform's canonical namespace list.
pub fn register_canonical_namespaces(list: &mut BTreeMap<Namespace, &'static str>) {
    for namespace in [Namespace::BLOG, Namespace::BLOG_TALK] {
        if let Some(name) = namespace.canonical_name() {
            list.insert(namespace, name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unassigned_page_ids_are_rejected() {
        assert_eq!(PageId::assigned(0), None);
        assert_eq!(PageId::assigned(-3), None);
        assert_eq!(PageId::assigned(12), Some(PageId(12)));
    }

    #[test]
    fn only_the_subject_namespace_holds_posts() {
        assert!(Namespace::BLOG.is_blog());
        assert!(!Namespace::BLOG_TALK.is_blog());
        assert!(!Namespace::MAIN.is_blog());
    }

    #[test]
    fn registration_keeps_existing_entries() {
        let mut list = BTreeMap::new();
        list.insert(Namespace::MAIN, "");
        register_canonical_namespaces(&mut list);

        assert_eq!(list.get(&Namespace::BLOG), Some(&"Blog"));
        assert_eq!(list.get(&Namespace::BLOG_TALK), Some(&"Blog_talk"));
        assert_eq!(list.len(), 3);
    }
}

//! In-memory doubles for the platform store and the key-value cache.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::application::blog_articles::BlogArticleListService;
use crate::application::messages::{ContentLanguageMessages, Localizer, MessageKey};
use crate::application::opinions::OpinionCountService;
use crate::application::profile::ProfileArticlesService;
use crate::application::repos::{CategoryLinksRepo, RepoError, UserStatsRepo, UsersRepo};
use crate::application::save_events::SaveEventAdapter;
use crate::application::stats::StatsStore;
use crate::cache::{CacheConfig, CacheError, KeyValueCache, MemoryCache};
use crate::domain::category::{CategoryTemplate, to_db_key};
use crate::domain::entities::{BlogArticleSummary, UserBlogStats, UserRecord};
use crate::domain::types::{Namespace, PageId, UserId};

pub(crate) const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct PlatformState {
    users: Vec<UserRecord>,
    pages: BTreeMap<PageId, (String, Namespace)>,
    links: BTreeSet<(PageId, String)>,
    stats: HashMap<UserId, UserBlogStats>,
}

/// Page, category-link, user and stats tables behind one lock.
#[derive(Default)]
pub(crate) struct FakePlatform {
    state: Mutex<PlatformState>,
    pub list_recent_calls: AtomicUsize,
    pub count_calls: AtomicUsize,
    pub stats_writes: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FakePlatform {
    fn state(&self) -> std::sync::MutexGuard<'_, PlatformState> {
        self.state.lock().expect("platform state lock")
    }

    pub fn add_user(&self, id: i64, name: &str) {
        self.state().users.push(UserRecord {
            id: UserId(id),
            name: name.to_string(),
        });
    }

    pub fn add_page(&self, id: i64, title: &str, namespace: Namespace, categories: &[&str]) {
        let mut state = self.state();
        state
            .pages
            .insert(PageId(id), (title.to_string(), namespace));
        for category in categories {
            state.links.insert((PageId(id), to_db_key(category)));
        }
    }

    pub fn unlink(&self, page_id: i64, category: &str) {
        self.state()
            .links
            .remove(&(PageId(page_id), to_db_key(category)));
    }

    pub fn set_stats(&self, user_id: i64, articles_created: u64) {
        self.state().stats.insert(
            UserId(user_id),
            UserBlogStats {
                user_id: UserId(user_id),
                articles_created,
            },
        );
    }

    pub fn stats_of(&self, user_id: i64) -> Option<u64> {
        self.state()
            .stats
            .get(&UserId(user_id))
            .map(|stats| stats.articles_created)
    }

    fn check_reads(&self) -> Result<(), RepoError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("replica unavailable"));
        }
        Ok(())
    }

    fn members(&self, category: &str, namespace: Namespace) -> Vec<BlogArticleSummary> {
        let key = to_db_key(category);
        let state = self.state();
        let ids: BTreeSet<PageId> = state
            .links
            .iter()
            .filter(|(_, linked)| *linked == key)
            .map(|(page_id, _)| *page_id)
            .collect();

        ids.into_iter()
            .rev()
            .filter_map(|page_id| {
                let (title, page_namespace) = state.pages.get(&page_id)?;
                (*page_namespace == namespace).then(|| BlogArticleSummary {
                    page_id,
                    title: title.clone(),
                    namespace: *page_namespace,
                })
            })
            .collect()
    }
}

#[async_trait]
impl CategoryLinksRepo for FakePlatform {
    async fn list_categories(&self, page_id: PageId) -> Result<Vec<String>, RepoError> {
        self.check_reads()?;
        Ok(self
            .state()
            .links
            .iter()
            .filter(|(linked, _)| *linked == page_id)
            .map(|(_, category)| category.clone())
            .collect())
    }

    async fn count_pages_in_category(
        &self,
        category: &str,
        namespace: Namespace,
    ) -> Result<u64, RepoError> {
        self.check_reads()?;
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.members(category, namespace).len() as u64)
    }

    async fn list_recent_pages_in_category(
        &self,
        category: &str,
        namespace: Namespace,
        limit: u32,
    ) -> Result<Vec<BlogArticleSummary>, RepoError> {
        self.check_reads()?;
        self.list_recent_calls.fetch_add(1, Ordering::SeqCst);
        let mut members = self.members(category, namespace);
        members.truncate(limit as usize);
        Ok(members)
    }
}

#[async_trait]
impl UsersRepo for FakePlatform {
    async fn find_by_name(&self, name: &str) -> Result<Option<UserRecord>, RepoError> {
        self.check_reads()?;
        Ok(self
            .state()
            .users
            .iter()
            .find(|user| user.name == name)
            .cloned())
    }
}

#[async_trait]
impl UserStatsRepo for FakePlatform {
    async fn read_stats(&self, user_id: UserId) -> Result<Option<UserBlogStats>, RepoError> {
        self.check_reads()?;
        Ok(self.state().stats.get(&user_id).copied())
    }

    async fn write_stats(&self, stats: UserBlogStats) -> Result<(), RepoError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("primary unavailable"));
        }
        self.stats_writes.fetch_add(1, Ordering::SeqCst);
        self.state().stats.insert(stats.user_id, stats);
        Ok(())
    }
}

/// Memory cache with switchable failures.
pub(crate) struct FlakyCache {
    inner: MemoryCache,
    pub fail_get: AtomicBool,
    pub fail_set: AtomicBool,
    pub fail_delete: AtomicBool,
}

impl FlakyCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            inner: MemoryCache::new(config),
            fail_get: AtomicBool::new(false),
            fail_set: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl KeyValueCache for FlakyCache {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(CacheError::unavailable("get refused"));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(CacheError::unavailable("set refused"));
        }
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(CacheError::unavailable("delete refused"));
        }
        self.inner.delete(key).await
    }
}

/// All services wired against the doubles.
pub(crate) struct Harness {
    pub platform: Arc<FakePlatform>,
    pub cache: Arc<FlakyCache>,
    pub articles: Arc<BlogArticleListService>,
    pub stats: Arc<StatsStore>,
    pub opinions: Arc<OpinionCountService>,
    pub profile: ProfileArticlesService,
    pub adapter: SaveEventAdapter,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default(), true)
    }

    pub fn with_config(config: CacheConfig, show_articles: bool) -> Self {
        let platform = Arc::new(FakePlatform::default());
        let cache = Arc::new(FlakyCache::new(&config));
        let messages: Arc<dyn Localizer> = Arc::new(ContentLanguageMessages::new());
        let template = CategoryTemplate::parse(&messages.text(MessageKey::BlogByUserCategory))
            .expect("default template");

        let articles = Arc::new(BlogArticleListService::new(
            platform.clone(),
            cache.clone(),
            template.clone(),
            config.clone(),
            QUERY_TIMEOUT,
        ));
        let stats = Arc::new(StatsStore::new(
            platform.clone(),
            cache.clone(),
            config,
            QUERY_TIMEOUT,
        ));
        let opinions = Arc::new(OpinionCountService::new(
            platform.clone(),
            platform.clone(),
            stats.clone(),
            template.clone(),
            QUERY_TIMEOUT,
        ));
        let profile = ProfileArticlesService::new(
            articles.clone(),
            stats.clone(),
            messages,
            template,
            show_articles,
        );
        let adapter = SaveEventAdapter::new(opinions.clone());

        Self {
            platform,
            cache,
            articles,
            stats,
            opinions,
            profile,
            adapter,
        }
    }
}

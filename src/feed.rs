//! Paginated feed synchronizer.
//!
//! One generic synchronizer drives the public, following, and per-user
//! feeds through the [`PageSource`] trait. Pagination is a single time
//! cursor: each page request asks for posts strictly older than the
//! oldest post already held, so pages append in order and a refresh is a
//! wholesale replacement, never a merge.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

use crate::error::ApiError;
use crate::gateway::ContentClient;
use crate::models::Post;
use crate::notices::NoticeCenter;

/// A feed endpoint the synchronizer can page through.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Posts strictly older than `before`, newest first.
    async fn fetch_page(&self, before: DateTime<Utc>) -> Result<Vec<Post>, ApiError>;

    /// A single fully hydrated post, for splicing in new arrivals.
    async fn fetch_post(&self, post_id: i64) -> Result<Post, ApiError>;
}

/// The public timeline.
#[derive(Clone)]
pub struct PublicFeed {
    content: ContentClient,
}

impl PublicFeed {
    pub fn new(content: ContentClient) -> Self {
        Self { content }
    }
}

#[async_trait]
impl PageSource for PublicFeed {
    async fn fetch_page(&self, before: DateTime<Utc>) -> Result<Vec<Post>, ApiError> {
        self.content.public_feed(before).await
    }

    async fn fetch_post(&self, post_id: i64) -> Result<Post, ApiError> {
        self.content.retrieve_post(post_id).await
    }
}

/// The logged-in user's following timeline.
#[derive(Clone)]
pub struct PrivateFeed {
    content: ContentClient,
}

impl PrivateFeed {
    pub fn new(content: ContentClient) -> Self {
        Self { content }
    }
}

#[async_trait]
impl PageSource for PrivateFeed {
    async fn fetch_page(&self, before: DateTime<Utc>) -> Result<Vec<Post>, ApiError> {
        self.content.private_feed(before).await
    }

    async fn fetch_post(&self, post_id: i64) -> Result<Post, ApiError> {
        self.content.retrieve_post(post_id).await
    }
}

/// A single user's posts.
#[derive(Clone)]
pub struct UserFeed {
    content: ContentClient,
    username: String,
}

impl UserFeed {
    pub fn new(content: ContentClient, username: impl Into<String>) -> Self {
        Self {
            content,
            username: username.into(),
        }
    }
}

#[async_trait]
impl PageSource for UserFeed {
    async fn fetch_page(&self, before: DateTime<Utc>) -> Result<Vec<Post>, ApiError> {
        self.content.user_feed(before, &self.username).await
    }

    async fn fetch_post(&self, post_id: i64) -> Result<Post, ApiError> {
        self.content.retrieve_post(post_id).await
    }
}

/// What a page request accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Posts were added (or, for an initial load, replaced).
    Loaded(usize),
    /// The server returned an empty page; the feed is exhausted.
    End,
    /// A page request was already outstanding; nothing was issued.
    InFlight,
}

#[derive(Debug)]
pub enum FeedError {
    /// `load_next_page` without a successful initial load.
    NothingLoaded,
    Api(ApiError),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::NothingLoaded => {
                write!(f, "no posts loaded yet; load the first page first")
            }
            FeedError::Api(e) => write!(f, "feed request failed: {}", e),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::NothingLoaded => None,
            FeedError::Api(e) => Some(e),
        }
    }
}

impl From<ApiError> for FeedError {
    fn from(e: ApiError) -> Self {
        FeedError::Api(e)
    }
}

#[derive(Debug, Default)]
struct FeedState {
    posts: Vec<Post>,
    loading: bool,
    exhausted: bool,
}

/// Holds one feed's post list and drives its pagination.
///
/// Clones share the list and the in-flight guard, so concurrent page
/// requests from different handles still collapse into one.
#[derive(Clone)]
pub struct FeedSynchronizer<S> {
    source: S,
    notices: NoticeCenter,
    state: Arc<Mutex<FeedState>>,
}

impl FeedSynchronizer<PublicFeed> {
    pub fn public(content: ContentClient, notices: NoticeCenter) -> Self {
        Self::new(PublicFeed::new(content), notices)
    }
}

impl FeedSynchronizer<PrivateFeed> {
    pub fn private(content: ContentClient, notices: NoticeCenter) -> Self {
        Self::new(PrivateFeed::new(content), notices)
    }
}

impl FeedSynchronizer<UserFeed> {
    pub fn user(
        content: ContentClient,
        username: impl Into<String>,
        notices: NoticeCenter,
    ) -> Self {
        Self::new(UserFeed::new(content, username), notices)
    }
}

impl<S: PageSource> FeedSynchronizer<S> {
    pub fn new(source: S, notices: NoticeCenter) -> Self {
        Self {
            source,
            notices,
            state: Arc::new(Mutex::new(FeedState::default())),
        }
    }

    /// Load the newest page, replacing anything held. Resets the
    /// exhausted flag, so a refreshed feed pages again from the top.
    pub async fn load_initial(&self) -> Result<PageOutcome, FeedError> {
        {
            let mut state = self.state.lock().unwrap();
            if state.loading {
                return Ok(PageOutcome::InFlight);
            }
            state.loading = true;
        }

        let result = self.source.fetch_page(Utc::now()).await;

        let mut state = self.state.lock().unwrap();
        state.loading = false;
        match result {
            Ok(page) => {
                let count = page.len();
                state.exhausted = page.is_empty();
                state.posts = page;
                if count == 0 {
                    Ok(PageOutcome::End)
                } else {
                    Ok(PageOutcome::Loaded(count))
                }
            }
            Err(e) => {
                self.notices.error(e.user_message(), e.to_string());
                Err(e.into())
            }
        }
    }

    /// Load the page older than the oldest held post and append it.
    ///
    /// At most one page request is outstanding at a time; a call while
    /// one is in flight returns [`PageOutcome::InFlight`] without
    /// issuing a request. A failed request leaves the held posts
    /// untouched and records one notice.
    pub async fn load_next_page(&self) -> Result<PageOutcome, FeedError> {
        let cursor = {
            let mut state = self.state.lock().unwrap();
            if state.loading {
                return Ok(PageOutcome::InFlight);
            }
            if state.exhausted {
                return Ok(PageOutcome::End);
            }
            let last = state.posts.last().ok_or(FeedError::NothingLoaded)?;
            let cursor = last.created_at;
            state.loading = true;
            cursor
        };

        let result = self.source.fetch_page(cursor).await;

        let mut state = self.state.lock().unwrap();
        state.loading = false;
        match result {
            Ok(page) if page.is_empty() => {
                state.exhausted = true;
                Ok(PageOutcome::End)
            }
            Ok(mut page) => {
                let count = page.len();
                state.posts.append(&mut page);
                Ok(PageOutcome::Loaded(count))
            }
            Err(e) => {
                self.notices.error(e.user_message(), e.to_string());
                Err(e.into())
            }
        }
    }

    /// Splice in a freshly created post, announced by id only.
    ///
    /// The full post is re-fetched and prepended; the rest of the list
    /// keeps its order, so this is safe mid-pagination.
    pub async fn on_post_created(&self, post_id: i64) -> Result<(), FeedError> {
        match self.source.fetch_post(post_id).await {
            Ok(post) => {
                self.state.lock().unwrap().posts.insert(0, post);
                Ok(())
            }
            Err(e) => {
                self.notices.error(e.user_message(), e.to_string());
                Err(e.into())
            }
        }
    }

    /// Snapshot of the held posts, newest first.
    pub fn posts(&self) -> Vec<Post> {
        self.state.lock().unwrap().posts.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.lock().unwrap().exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Author;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn post(id: i64, hour: u32) -> Post {
        Post {
            id,
            content: format!("post {}", id),
            author: Author {
                id: 1,
                username: "ada".to_string(),
                display_name: None,
                profile_image_url: None,
            },
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap(),
            image_url: None,
            upvote_count: 0,
            downvote_count: 0,
            comment_count: 0,
            vote: None,
            commented: false,
        }
    }

    /// Pages keyed by cursor hour, plus a post lookup.
    #[derive(Clone, Default)]
    struct FakeSource {
        pages: Arc<Mutex<Vec<Vec<Post>>>>,
        posts: Arc<Mutex<HashMap<i64, Post>>>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn with_pages(pages: Vec<Vec<Post>>) -> Self {
            Self {
                pages: Arc::new(Mutex::new(pages)),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl PageSource for FakeSource {
        async fn fetch_page(&self, _before: DateTime<Utc>) -> Result<Vec<Post>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Yield so a concurrent caller can hit the in-flight guard.
            tokio::task::yield_now().await;
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                Ok(Vec::new())
            } else {
                Ok(pages.remove(0))
            }
        }

        async fn fetch_post(&self, post_id: i64) -> Result<Post, ApiError> {
            self.posts
                .lock()
                .unwrap()
                .get(&post_id)
                .cloned()
                .ok_or(ApiError::Domain(crate::error::DomainError::PostNotFound))
        }
    }

    #[tokio::test]
    async fn pages_append_in_order_without_resorting() {
        let source = FakeSource::with_pages(vec![
            vec![post(3, 12), post(2, 11)],
            vec![post(1, 10)],
        ]);
        let feed = FeedSynchronizer::new(source, NoticeCenter::new());

        assert_eq!(feed.load_initial().await.unwrap(), PageOutcome::Loaded(2));
        assert_eq!(feed.load_next_page().await.unwrap(), PageOutcome::Loaded(1));

        let ids: Vec<i64> = feed.posts().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn empty_page_sets_exhausted_and_keeps_posts() {
        let source = FakeSource::with_pages(vec![vec![post(1, 10)], vec![]]);
        let feed = FeedSynchronizer::new(source, NoticeCenter::new());

        feed.load_initial().await.unwrap();
        assert_eq!(feed.load_next_page().await.unwrap(), PageOutcome::End);
        assert!(feed.is_exhausted());
        assert_eq!(feed.posts().len(), 1);

        // Once exhausted, further calls do not issue requests.
        assert_eq!(feed.load_next_page().await.unwrap(), PageOutcome::End);
    }

    #[tokio::test]
    async fn next_page_before_initial_load_is_an_error() {
        let source = FakeSource::default();
        let feed = FeedSynchronizer::new(source, NoticeCenter::new());

        assert!(matches!(
            feed.load_next_page().await,
            Err(FeedError::NothingLoaded)
        ));
    }

    #[tokio::test]
    async fn concurrent_next_page_issues_one_request() {
        let source = FakeSource::with_pages(vec![
            vec![post(2, 11)],
            vec![post(1, 10)],
            vec![post(0, 9)],
        ]);
        let calls = source.calls.clone();
        let feed = FeedSynchronizer::new(source, NoticeCenter::new());
        feed.load_initial().await.unwrap();
        let calls_before = calls.load(Ordering::SeqCst);

        let a = feed.clone();
        let b = feed.clone();
        let (ra, rb) = tokio::join!(a.load_next_page(), b.load_next_page());

        let outcomes = [ra.unwrap(), rb.unwrap()];
        assert!(outcomes.contains(&PageOutcome::InFlight));
        assert!(outcomes
            .iter()
            .any(|o| matches!(o, PageOutcome::Loaded(_))));
        assert_eq!(calls.load(Ordering::SeqCst) - calls_before, 1);
    }

    #[tokio::test]
    async fn refresh_replaces_wholesale_and_clears_exhausted() {
        let source = FakeSource::with_pages(vec![
            vec![post(1, 10)],
            vec![],
            vec![post(3, 12), post(2, 11)],
        ]);
        let feed = FeedSynchronizer::new(source, NoticeCenter::new());

        feed.load_initial().await.unwrap();
        feed.load_next_page().await.unwrap();
        assert!(feed.is_exhausted());

        feed.load_initial().await.unwrap();
        assert!(!feed.is_exhausted());
        let ids: Vec<i64> = feed.posts().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn new_post_is_fetched_and_prepended() {
        let source = FakeSource::with_pages(vec![vec![post(2, 11), post(1, 10)]]);
        source.posts.lock().unwrap().insert(5, post(5, 13));
        let feed = FeedSynchronizer::new(source, NoticeCenter::new());
        feed.load_initial().await.unwrap();

        feed.on_post_created(5).await.unwrap();

        let ids: Vec<i64> = feed.posts().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 2, 1]);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_posts_and_records_one_notice() {
        #[derive(Clone)]
        struct FailingSource;

        #[async_trait]
        impl PageSource for FailingSource {
            async fn fetch_page(&self, _before: DateTime<Utc>) -> Result<Vec<Post>, ApiError> {
                Err(ApiError::Server {
                    status: 500,
                    message: "boom".to_string(),
                })
            }

            async fn fetch_post(&self, _post_id: i64) -> Result<Post, ApiError> {
                unreachable!()
            }
        }

        let notices = NoticeCenter::new();
        let feed = FeedSynchronizer::new(FailingSource, notices.clone());

        assert!(feed.load_initial().await.is_err());
        assert_eq!(notices.len(), 1);
        assert!(feed.posts().is_empty());
        assert!(!feed.is_loading());
    }
}

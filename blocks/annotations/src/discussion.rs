//! Comment thread for the asset or label currently on display.
//!
//! Requests are split into a ticket (issued synchronously while the thread
//! is borrowed) and the network call (awaited without holding the thread),
//! so a UI can switch scope while an older request is still in flight. Every
//! response is handed back with its ticket and dropped when the ticket is no
//! longer current.

use crate::client::{with_timeout, CommentClient};
use crate::error::{FetchError, ViewerError, ViewerResult};
use crate::{ApplyOutcome, DeliveryStatus};
use cosmoscope_atoms::comments::{Comment, CommentScope, NewComment};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscussionConfig {
    pub fetch_timeout: Duration,
}

impl Default for DiscussionConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ThreadStatus {
    /// No scope selected.
    Closed,
    Loading,
    Ready,
    Failed { message: String, retryable: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadEntry {
    pub local_id: u64,
    pub comment: Comment,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    generation: u64,
    scope: CommentScope,
}

impl FetchTicket {
    pub fn scope(&self) -> &CommentScope {
        &self.scope
    }

    pub async fn fetch<C: CommentClient + ?Sized>(&self, client: &C, limit: Duration) -> Result<Vec<Comment>, FetchError> {
        with_timeout(limit, client.fetch_comments(&self.scope)).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostTicket {
    local_id: u64,
    comment: NewComment,
}

impl PostTicket {
    pub fn local_id(&self) -> u64 {
        self.local_id
    }

    pub async fn send<C: CommentClient + ?Sized>(&self, client: &C, limit: Duration) -> Result<Comment, FetchError> {
        with_timeout(limit, client.post_comment(self.comment.clone())).await
    }
}

#[derive(Debug)]
pub struct DiscussionThread {
    config: DiscussionConfig,
    scope: Option<CommentScope>,
    generation: u64,
    status: ThreadStatus,
    entries: Vec<ThreadEntry>,
    next_local_id: u64,
}

impl DiscussionThread {
    pub fn new(config: DiscussionConfig) -> Self {
        Self {
            config,
            scope: None,
            generation: 0,
            status: ThreadStatus::Closed,
            entries: Vec::new(),
            next_local_id: 1,
        }
    }

    pub fn config(&self) -> &DiscussionConfig {
        &self.config
    }

    pub fn scope(&self) -> Option<&CommentScope> {
        self.scope.as_ref()
    }

    pub fn status(&self) -> &ThreadStatus {
        &self.status
    }

    pub fn entries(&self) -> &[ThreadEntry] {
        &self.entries
    }

    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.entries.iter().map(|e| &e.comment)
    }

    /// Switches to `scope`, dropping whatever was displayed.
    pub fn show(&mut self, scope: CommentScope) -> FetchTicket {
        tracing::debug!(%scope, "discussion scope changed");
        self.scope = Some(scope.clone());
        self.entries.clear();
        self.issue_fetch(scope)
    }

    pub fn close(&mut self) {
        self.generation += 1;
        self.scope = None;
        self.entries.clear();
        self.status = ThreadStatus::Closed;
    }

    /// Refetches the current scope, keeping unconfirmed local comments.
    pub fn retry(&mut self) -> ViewerResult<FetchTicket> {
        let scope = self.scope.clone().ok_or(ViewerError::NoScope)?;
        Ok(self.issue_fetch(scope))
    }

    fn issue_fetch(&mut self, scope: CommentScope) -> FetchTicket {
        self.generation += 1;
        self.status = ThreadStatus::Loading;
        FetchTicket {
            generation: self.generation,
            scope,
        }
    }

    pub fn apply(&mut self, ticket: &FetchTicket, result: Result<Vec<Comment>, FetchError>) -> ApplyOutcome {
        if ticket.generation != self.generation {
            tracing::warn!(scope = %ticket.scope, "discarding stale comment response");
            return ApplyOutcome::Stale;
        }

        match result {
            Ok(mut comments) => {
                comments.retain(|c| c.scope().as_ref() == Some(&ticket.scope));
                comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                self.merge_fetched(comments);
                self.status = ThreadStatus::Ready;
            }
            Err(FetchError::NotFound) => {
                self.merge_fetched(Vec::new());
                self.status = ThreadStatus::Ready;
            }
            Err(err) => {
                tracing::warn!(scope = %ticket.scope, error = %err, "comment fetch failed");
                self.status = ThreadStatus::Failed {
                    message: err.to_string(),
                    retryable: err.is_retryable(),
                };
            }
        }
        ApplyOutcome::Applied
    }

    fn merge_fetched(&mut self, fetched: Vec<Comment>) {
        let local: Vec<ThreadEntry> = self
            .entries
            .drain(..)
            .filter(|e| !fetched.iter().any(|c| c.id == e.comment.id))
            .filter(|e| e.status != DeliveryStatus::Confirmed)
            .collect();

        let mut entries = Vec::with_capacity(fetched.len() + local.len());
        for comment in fetched {
            let local_id = self.next_local_id();
            entries.push(ThreadEntry {
                local_id,
                comment,
                status: DeliveryStatus::Confirmed,
            });
        }
        entries.extend(local);
        self.entries = entries;
    }

    fn next_local_id(&mut self) -> u64 {
        let id = self.next_local_id;
        self.next_local_id += 1;
        id
    }

    /// Validates and appends a pending comment. Nothing is sent on validation failure.
    pub fn compose(&mut self, author: &str, content: &str) -> ViewerResult<PostTicket> {
        let scope = self.scope.clone().ok_or(ViewerError::NoScope)?;
        let new_comment = NewComment::new(scope, author, content)?;
        let local_id = self.next_local_id();

        self.entries.push(ThreadEntry {
            local_id,
            comment: Comment {
                id: format!("local-{}", local_id),
                asset_id: new_comment.scope.asset_id().map(str::to_string),
                label_id: new_comment.scope.label_id().map(str::to_string),
                username: new_comment.username.clone(),
                content: new_comment.content.clone(),
                created_at: cosmoscope_atoms::now_timestamp(),
            },
            status: DeliveryStatus::Pending,
        });

        Ok(PostTicket {
            local_id,
            comment: new_comment,
        })
    }

    /// Records the server's answer to a post. Stale when the entry is gone.
    pub fn confirm_post(&mut self, ticket: &PostTicket, result: Result<Comment, FetchError>) -> ApplyOutcome {
        let Some(index) = self.entries.iter().position(|e| e.local_id == ticket.local_id) else {
            return ApplyOutcome::Stale;
        };

        match result {
            Ok(comment) => {
                // A refetch that raced the post may already have delivered the server copy.
                let already_listed = self.entries.iter().any(|e| {
                    e.local_id != ticket.local_id
                        && e.status == DeliveryStatus::Confirmed
                        && e.comment.id == comment.id
                });
                if already_listed {
                    self.entries.remove(index);
                } else {
                    let entry = &mut self.entries[index];
                    entry.comment = comment;
                    entry.status = DeliveryStatus::Confirmed;
                }
            }
            Err(err) => {
                tracing::warn!(local_id = ticket.local_id, error = %err, "comment post failed");
                self.entries[index].status = DeliveryStatus::Failed;
            }
        }
        ApplyOutcome::Applied
    }

    /// Re-sends a failed comment.
    pub fn retry_post(&mut self, local_id: u64) -> Option<PostTicket> {
        let scope = self.scope.clone()?;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.local_id == local_id && e.status == DeliveryStatus::Failed)?;
        entry.status = DeliveryStatus::Pending;

        Some(PostTicket {
            local_id,
            comment: NewComment {
                scope,
                username: entry.comment.username.clone(),
                content: entry.comment.content.clone(),
            },
        })
    }

    /// Shows `scope` and waits for its comments.
    pub async fn load<C: CommentClient + ?Sized>(&mut self, client: &C, scope: CommentScope) -> ApplyOutcome {
        let ticket = self.show(scope);
        let result = ticket.fetch(client, self.config.fetch_timeout).await;
        self.apply(&ticket, result)
    }

    /// Composes and sends a comment, appending it locally without refetching.
    pub async fn submit<C: CommentClient + ?Sized>(
        &mut self,
        client: &C,
        author: &str,
        content: &str,
    ) -> ViewerResult<DeliveryStatus> {
        let ticket = self.compose(author, content)?;
        let result = ticket.send(client, self.config.fetch_timeout).await;
        self.confirm_post(&ticket, result);

        Ok(self
            .entries
            .iter()
            .find(|e| e.local_id == ticket.local_id)
            .map(|e| e.status)
            .unwrap_or(DeliveryStatus::Failed))
    }

    /// One line per comment: author, timestamp, content.
    pub fn render_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| {
                let c = &entry.comment;
                let when = chrono::DateTime::parse_from_rfc3339(&c.created_at)
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|_| c.created_at.clone());
                let suffix = match entry.status {
                    DeliveryStatus::Confirmed => "",
                    DeliveryStatus::Pending => " (sending)",
                    DeliveryStatus::Failed => " (not sent)",
                };
                format!("{} · {}: {}{}", c.username, when, c.content, suffix)
            })
            .collect()
    }
}

impl Default for DiscussionThread {
    fn default() -> Self {
        Self::new(DiscussionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn comment(id: &str, scope: &CommentScope, created_at: &str) -> Comment {
        Comment {
            id: id.to_string(),
            asset_id: scope.asset_id().map(str::to_string),
            label_id: scope.label_id().map(str::to_string),
            username: "astro".to_string(),
            content: format!("comment {}", id),
            created_at: created_at.to_string(),
        }
    }

    #[derive(Default)]
    struct FakeComments {
        stored: Mutex<Vec<Comment>>,
        fetches: AtomicUsize,
        posts: AtomicUsize,
        fetch_error: Mutex<Option<FetchError>>,
        post_error: Mutex<Option<FetchError>>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl CommentClient for FakeComments {
        async fn fetch_comments(&self, scope: &CommentScope) -> Result<Vec<Comment>, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(err) = self.fetch_error.lock().unwrap().clone() {
                return Err(err);
            }
            Ok(self
                .stored
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.scope().as_ref() == Some(scope))
                .cloned()
                .collect())
        }

        async fn post_comment(&self, new_comment: NewComment) -> Result<Comment, FetchError> {
            let n = self.posts.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.post_error.lock().unwrap().clone() {
                return Err(err);
            }
            let mut stored = comment(&format!("srv-{}", n), &new_comment.scope, "2024-06-01T12:00:00.000000Z");
            stored.username = new_comment.username;
            stored.content = new_comment.content;
            self.stored.lock().unwrap().push(stored.clone());
            Ok(stored)
        }
    }

    fn asset_a() -> CommentScope {
        CommentScope::Asset("A".to_string())
    }

    fn label_l1() -> CommentScope {
        CommentScope::Label("L1".to_string())
    }

    #[test]
    fn stale_fetch_is_discarded_after_scope_switch() {
        let mut thread = DiscussionThread::default();
        let first = thread.show(asset_a());
        let second = thread.show(label_l1());

        let l1_comments = vec![comment("c2", &label_l1(), "2024-01-02T00:00:00.000000Z")];
        assert_eq!(thread.apply(&second, Ok(l1_comments)), ApplyOutcome::Applied);

        let a_comments = vec![comment("c1", &asset_a(), "2024-01-01T00:00:00.000000Z")];
        assert_eq!(thread.apply(&first, Ok(a_comments)), ApplyOutcome::Stale);

        let ids: Vec<&str> = thread.comments().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c2"]);
        assert_eq!(thread.scope(), Some(&label_l1()));
    }

    #[test]
    fn stale_fetch_arriving_first_is_also_discarded() {
        let mut thread = DiscussionThread::default();
        let first = thread.show(asset_a());
        let second = thread.show(label_l1());

        assert_eq!(
            thread.apply(&first, Ok(vec![comment("c1", &asset_a(), "2024-01-01T00:00:00.000000Z")])),
            ApplyOutcome::Stale
        );
        assert_eq!(thread.status(), &ThreadStatus::Loading);
        assert_eq!(thread.comments().count(), 0);

        thread.apply(&second, Ok(Vec::new()));
        assert_eq!(thread.status(), &ThreadStatus::Ready);
    }

    #[test]
    fn comments_from_other_scopes_are_never_shown() {
        let mut thread = DiscussionThread::default();
        let ticket = thread.show(label_l1());
        thread.apply(
            &ticket,
            Ok(vec![
                comment("a", &asset_a(), "2024-01-01T00:00:00.000000Z"),
                comment("l", &label_l1(), "2024-01-02T00:00:00.000000Z"),
            ]),
        );
        let ids: Vec<&str> = thread.comments().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["l"]);
    }

    #[test]
    fn comments_are_shown_oldest_first() {
        let mut thread = DiscussionThread::default();
        let ticket = thread.show(asset_a());
        thread.apply(
            &ticket,
            Ok(vec![
                comment("late", &asset_a(), "2024-03-01T00:00:00.000000Z"),
                comment("early", &asset_a(), "2024-01-01T00:00:00.000000Z"),
            ]),
        );
        let ids: Vec<&str> = thread.comments().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn missing_thread_reads_as_empty() {
        let mut thread = DiscussionThread::default();
        let ticket = thread.show(asset_a());
        thread.apply(&ticket, Err(FetchError::NotFound));
        assert_eq!(thread.status(), &ThreadStatus::Ready);
        assert!(thread.entries().is_empty());
    }

    #[tokio::test]
    async fn empty_fields_are_rejected_without_a_network_call() {
        let client = FakeComments::default();
        let mut thread = DiscussionThread::default();
        thread.load(&client, asset_a()).await;

        for (author, content) in [("", "hello"), ("astro", ""), ("   ", "hello"), ("astro", "  \n")] {
            let err = thread.submit(&client, author, content).await.unwrap_err();
            assert!(matches!(err, ViewerError::Validation(_)), "{:?}", err);
        }
        assert_eq!(client.posts.load(Ordering::SeqCst), 0);
        assert!(thread.entries().is_empty());
    }

    #[tokio::test]
    async fn compose_without_scope_fails() {
        let mut thread = DiscussionThread::default();
        assert!(matches!(thread.compose("astro", "hi"), Err(ViewerError::NoScope)));
    }

    #[tokio::test]
    async fn successful_post_is_appended_without_refetch() {
        let client = FakeComments::default();
        let mut thread = DiscussionThread::default();
        thread.load(&client, label_l1()).await;
        assert_eq!(client.fetches.load(Ordering::SeqCst), 1);

        let status = thread.submit(&client, " astro ", "Spiral arm here").await.unwrap();
        assert_eq!(status, DeliveryStatus::Confirmed);
        assert_eq!(client.fetches.load(Ordering::SeqCst), 1);

        let entry = &thread.entries()[0];
        assert_eq!(entry.comment.id, "srv-0");
        assert_eq!(entry.comment.username, "astro");
        assert_eq!(entry.comment.label_id.as_deref(), Some("L1"));
    }

    #[tokio::test]
    async fn failed_post_stays_visible_and_can_be_retried() {
        let client = FakeComments::default();
        *client.post_error.lock().unwrap() = Some(FetchError::Transient("503".to_string()));
        let mut thread = DiscussionThread::default();
        thread.load(&client, asset_a()).await;

        let status = thread.submit(&client, "astro", "hello").await.unwrap();
        assert_eq!(status, DeliveryStatus::Failed);
        let local_id = thread.entries()[0].local_id;
        assert!(thread.render_lines()[0].ends_with("(not sent)"));

        *client.post_error.lock().unwrap() = None;
        let ticket = thread.retry_post(local_id).unwrap();
        assert_eq!(thread.entries()[0].status, DeliveryStatus::Pending);
        let result = ticket.send(&client, Duration::from_secs(1)).await;
        thread.confirm_post(&ticket, result);
        assert_eq!(thread.entries()[0].status, DeliveryStatus::Confirmed);
        assert!(thread.retry_post(local_id).is_none());
    }

    #[tokio::test]
    async fn confirmation_after_racing_refetch_does_not_duplicate() {
        let client = FakeComments::default();
        let mut thread = DiscussionThread::default();
        thread.load(&client, asset_a()).await;

        let post = thread.compose("astro", "hello").unwrap();
        let confirmed = post.send(&client, Duration::from_secs(1)).await;

        let refetch = thread.retry().unwrap();
        let fetched = refetch.fetch(&client, Duration::from_secs(1)).await;
        assert_eq!(thread.apply(&refetch, fetched), ApplyOutcome::Applied);

        assert_eq!(thread.confirm_post(&post, confirmed), ApplyOutcome::Applied);
        let ids: Vec<&str> = thread.comments().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["srv-0"]);
        assert!(thread.entries().iter().all(|e| e.status == DeliveryStatus::Confirmed));
    }

    #[tokio::test]
    async fn post_for_a_closed_scope_is_stale() {
        let client = FakeComments::default();
        let mut thread = DiscussionThread::default();
        thread.show(asset_a());
        let ticket = thread.compose("astro", "hi").unwrap();
        thread.show(label_l1());

        let result = ticket.send(&client, Duration::from_secs(1)).await;
        assert_eq!(thread.confirm_post(&ticket, result), ApplyOutcome::Stale);
        assert!(thread.entries().is_empty());
    }

    #[tokio::test]
    async fn slow_fetch_times_out_and_retry_recovers() {
        let client = FakeComments {
            delay: Some(Duration::from_millis(200)),
            ..FakeComments::default()
        };
        client
            .stored
            .lock()
            .unwrap()
            .push(comment("c1", &asset_a(), "2024-01-01T00:00:00.000000Z"));

        let mut thread = DiscussionThread::new(DiscussionConfig {
            fetch_timeout: Duration::from_millis(10),
        });
        thread.load(&client, asset_a()).await;
        assert!(matches!(
            thread.status(),
            ThreadStatus::Failed { retryable: true, .. }
        ));

        let ticket = thread.retry().unwrap();
        let result = ticket.fetch(&client, Duration::from_secs(2)).await;
        assert_eq!(thread.apply(&ticket, result), ApplyOutcome::Applied);
        assert_eq!(thread.status(), &ThreadStatus::Ready);
        assert_eq!(thread.comments().count(), 1);
    }

    #[tokio::test]
    async fn rejected_fetch_is_not_retryable() {
        let client = FakeComments::default();
        *client.fetch_error.lock().unwrap() = Some(FetchError::Rejected("bad scope".to_string()));
        let mut thread = DiscussionThread::default();
        thread.load(&client, asset_a()).await;
        assert!(matches!(
            thread.status(),
            ThreadStatus::Failed { retryable: false, .. }
        ));
    }

    #[test]
    fn render_lines_show_author_and_time() {
        let mut thread = DiscussionThread::default();
        let ticket = thread.show(asset_a());
        thread.apply(&ticket, Ok(vec![comment("c1", &asset_a(), "2024-01-15T10:30:00.000000Z")]));
        assert_eq!(thread.render_lines(), vec!["astro · 2024-01-15 10:30: comment c1".to_string()]);
    }
}

use board_client::BoardClientError;
use entity::prelude::*;
use tracing::{debug, error, info};

use crate::{
    config::{FeedConfig, ReconcilePolicy},
    pagination::Feed,
    submission::{Draft, Field, Reconciler, SubmitError},
    theme::Theme,
    viewport::{
        Intersection, RegionId, SubscriptionHandle, Viewport, ViewportTrigger,
    },
};

/// Tags a fetch so only the latest one may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// The fetch failed and the previous posts were kept.
    Failed,
    /// Superseded by a newer fetch, or the view is gone.
    Discarded,
}

/// Everything a renderer needs for one frame.
#[derive(Debug)]
pub struct ViewModel<'a> {
    pub posts: &'a [PostEntity],
    pub has_more: bool,
    pub total: usize,
    pub draft: &'a Draft,
    pub is_submitting: bool,
    pub is_submitted: bool,
    pub fetch_error: Option<&'a str>,
    pub submit_error: Option<&'a str>,
    pub theme: Theme,
}

/// Per-view state, built on mount and dropped on unmount. All feed
/// mutations go through here.
pub struct FeedView<V: Viewport> {
    feed: Feed,
    trigger: ViewportTrigger<V>,
    reconciler: Reconciler,
    theme: Theme,
    policy: ReconcilePolicy,
    generation: u64,
    mounted: bool,
    fetch_error: Option<String>,
}

impl<V: Viewport> FeedView<V> {
    pub fn mount(config: &FeedConfig, viewport: V) -> Self {
        Self {
            feed: Feed::new(config.page_size),
            trigger: ViewportTrigger::new(viewport),
            reconciler: Reconciler::default(),
            theme: Theme::default(),
            policy: config.policy,
            generation: 0,
            mounted: true,
            fetch_error: None,
        }
    }

    /// Starts a fetch cycle. Any ticket handed out earlier is now stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
        }
    }

    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<PostEntity>, BoardClientError>,
    ) -> FetchOutcome {
        if !self.mounted {
            debug!(task = "apply fetch", reason = "unmounted");
            return FetchOutcome::Discarded;
        }
        if ticket.generation != self.generation {
            debug!(
                task = "apply fetch",
                reason = "stale",
                generation = ticket.generation,
                latest = self.generation
            );
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(posts) => {
                info!(task = "apply fetch", count = posts.len());
                self.feed.initialize(posts);
                self.trigger.sync(&self.feed);
                self.fetch_error = None;
                FetchOutcome::Applied
            }
            Err(e) => {
                error!(task = "apply fetch", err = e.to_string());
                self.fetch_error = Some(e.to_string());
                FetchOutcome::Failed
            }
        }
    }

    pub fn attach_sentinel(&mut self, region: RegionId) {
        if self.mounted {
            self.trigger.attach(region, &self.feed);
        }
    }

    pub fn detach_sentinel(&mut self) {
        self.trigger.detach();
    }

    pub fn on_intersection(&mut self, entry: Intersection) -> bool {
        if !self.mounted {
            return false;
        }
        self.trigger.on_intersection(entry, &mut self.feed)
    }

    pub fn toggle_theme(&mut self) {
        self.theme.toggle();
    }

    pub fn set_field(
        &mut self,
        field: Field,
        value: &str,
    ) -> Result<(), SubmitError> {
        self.reconciler.set_field(field, value)
    }

    pub fn begin_submit(&mut self) -> Result<NewPostEntity, SubmitError> {
        if !self.mounted {
            return Err(SubmitError::Unmounted);
        }
        self.reconciler.begin()
    }

    pub fn finish_submit(
        &mut self,
        result: Result<PostEntity, BoardClientError>,
    ) -> Result<PostEntity, SubmitError> {
        if !self.mounted {
            debug!(task = "submit post", reason = "unmounted");
            return Err(SubmitError::Unmounted);
        }

        let post = self.reconciler.finish(result)?;
        if self.policy == ReconcilePolicy::Prepend
            && self.feed.prepend(post.clone())
        {
            self.trigger.sync(&self.feed);
        }
        Ok(post)
    }

    /// Stops the view. Later results are discarded and the sentinel
    /// observation is released.
    pub fn teardown(&mut self) {
        self.mounted = false;
        self.trigger.detach();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn sentinel_handle(&self) -> Option<SubscriptionHandle> {
        self.trigger.handle()
    }

    pub fn snapshot(&self) -> ViewModel<'_> {
        ViewModel {
            posts: self.feed.visible_slice(),
            has_more: self.feed.has_more(),
            total: self.feed.len(),
            draft: self.reconciler.draft(),
            is_submitting: self.reconciler.is_submitting(),
            is_submitted: self.reconciler.is_submitted(),
            fetch_error: self.fetch_error.as_deref(),
            submit_error: self.reconciler.last_error(),
            theme: self.theme,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        pagination::test::{post, posts},
        submission::{
            test::{filled, unavailable},
            SubmissionState,
        },
        viewport::ManualViewport,
    };

    const SENTINEL: RegionId = RegionId(7);

    fn mounted(policy: ReconcilePolicy) -> (FeedView<ManualViewport>, ManualViewport) {
        let viewport = ManualViewport::default();
        let config = FeedConfig {
            policy,
            ..Default::default()
        };
        (FeedView::mount(&config, viewport.clone()), viewport)
    }

    fn loaded(count: i64) -> FeedView<ManualViewport> {
        let (mut view, _) = mounted(ReconcilePolicy::AwaitRefresh);
        let ticket = view.begin_fetch();
        view.apply_fetch(ticket, Ok(posts(count)));
        view
    }

    fn fill(view: &mut FeedView<ManualViewport>) {
        let draft = filled();
        view.set_field(Field::Title, &draft.title).unwrap();
        view.set_field(Field::Description, &draft.description).unwrap();
        view.set_field(Field::Name, &draft.name).unwrap();
        view.set_field(Field::Password, &draft.password).unwrap();
        view.set_field(Field::Categories, "개인").unwrap();
    }

    fn ids(view: &FeedView<ManualViewport>) -> Vec<i64> {
        view.snapshot().posts.iter().map(|p| p.id).collect()
    }

    fn scroll(view: &mut FeedView<ManualViewport>, ratio: f32) -> bool {
        let handle = view.sentinel_handle().unwrap();
        view.on_intersection(Intersection { handle, ratio })
    }

    #[test]
    fn test_initial_load_shows_newest_first() {
        // Arrange
        let (mut view, _) = mounted(ReconcilePolicy::AwaitRefresh);

        // Act
        let ticket = view.begin_fetch();
        let outcome = view.apply_fetch(ticket, Ok(posts(3)));

        // Assert
        assert_eq!(outcome, FetchOutcome::Applied);
        assert_eq!(ids(&view), vec![3, 2, 1]);
        assert!(!view.snapshot().has_more);
    }

    #[test]
    fn test_scrolling_pages_through_feed() {
        // Arrange
        let mut view = loaded(25);
        view.attach_sentinel(SENTINEL);
        let mut counts = vec![view.feed().visible_count()];

        // Act
        for _ in 0..3 {
            scroll(&mut view, 1.0);
            counts.push(view.feed().visible_count());
            scroll(&mut view, 0.0);
        }

        // Assert
        assert_eq!(counts, vec![10, 20, 25, 25]);
    }

    #[test]
    fn test_no_reveal_before_first_fetch_lands() {
        let (mut view, _) = mounted(ReconcilePolicy::AwaitRefresh);
        view.attach_sentinel(SENTINEL);
        let ticket = view.begin_fetch();

        let fired = scroll(&mut view, 1.0);
        view.apply_fetch(ticket, Ok(posts(25)));

        assert!(!fired);
        assert_eq!(view.feed().visible_count(), 10);
    }

    #[test]
    fn test_sentinel_shown_over_empty_feed_still_pages() {
        // Arrange
        let (mut view, _) = mounted(ReconcilePolicy::AwaitRefresh);
        view.attach_sentinel(SENTINEL);
        let ticket = view.begin_fetch();
        scroll(&mut view, 1.0);
        view.apply_fetch(ticket, Ok(posts(25)));

        // Act
        let fired = scroll(&mut view, 1.0);

        // Assert
        assert!(fired);
        assert_eq!(view.feed().visible_count(), 20);
        assert!(view.snapshot().has_more);
    }

    #[test]
    fn test_newer_fetch_supersedes_older() {
        let (mut view, _) = mounted(ReconcilePolicy::AwaitRefresh);
        let older = view.begin_fetch();
        let newer = view.begin_fetch();

        let applied = view.apply_fetch(newer, Ok(posts(5)));
        let late = view.apply_fetch(older, Ok(posts(3)));

        assert_eq!(applied, FetchOutcome::Applied);
        assert_eq!(late, FetchOutcome::Discarded);
        assert_eq!(ids(&view), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_failed_refresh_keeps_last_good_posts() {
        let mut view = loaded(12);

        let ticket = view.begin_fetch();
        let outcome = view.apply_fetch(ticket, Err(unavailable()));

        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(view.feed().len(), 12);
        assert_eq!(view.feed().visible_count(), 10);
        assert!(view.snapshot().fetch_error.is_some());

        let ticket = view.begin_fetch();
        view.apply_fetch(ticket, Ok(posts(13)));
        assert!(view.snapshot().fetch_error.is_none());
    }

    #[test]
    fn test_result_after_teardown_is_discarded() {
        // Arrange
        let (mut view, viewport) = mounted(ReconcilePolicy::AwaitRefresh);
        view.attach_sentinel(SENTINEL);
        let ticket = view.begin_fetch();

        // Act
        view.teardown();
        let outcome = view.apply_fetch(ticket, Ok(posts(3)));

        // Assert
        assert_eq!(outcome, FetchOutcome::Discarded);
        assert!(view.feed().is_empty());
        assert!(viewport.active().is_empty());
    }

    #[test]
    fn test_rejected_submit_leaves_feed_alone() {
        // Arrange
        let mut view = loaded(15);
        view.set_field(Field::Title, "제목").unwrap();
        view.set_field(Field::Description, "내용").unwrap();
        view.set_field(Field::Name, "익명").unwrap();
        view.set_field(Field::Password, "pw").unwrap();
        view.set_field(Field::Categories, "none").unwrap();

        // Act
        let result = view.begin_submit();

        // Assert
        assert!(matches!(
            result,
            Err(SubmitError::ValidationRejected {
                field: Field::Categories,
                ..
            })
        ));
        assert!(!view.snapshot().is_submitting);
        assert_eq!(view.feed().len(), 15);
        assert_eq!(view.feed().visible_count(), 10);
    }

    #[test]
    fn test_unknown_category_edit_is_surfaced() {
        let mut view = loaded(3);

        let result = view.set_field(Field::Categories, "spam");

        assert!(result.is_err());
        let model = view.snapshot();
        assert_eq!(model.draft.category, None);
        assert!(model.submit_error.is_some_and(|e| e.contains("categories")));
    }

    #[test]
    fn test_rejected_resubmit_clears_acknowledgment() {
        // Arrange
        let mut view = loaded(3);
        fill(&mut view);
        view.begin_submit().unwrap();
        view.finish_submit(Ok(post(4))).unwrap();

        // Act
        view.set_field(Field::Title, " ").unwrap();
        let result = view.begin_submit();

        // Assert
        assert!(result.is_err());
        let model = view.snapshot();
        assert!(!model.is_submitted);
        assert!(model.submit_error.is_some());
    }

    #[test]
    fn test_success_waits_for_refresh_by_default() {
        let mut view = loaded(3);
        fill(&mut view);
        view.begin_submit().unwrap();

        let created = view.finish_submit(Ok(post(4))).unwrap();

        assert_eq!(created.id, 4);
        assert!(view.snapshot().is_submitted);
        assert_eq!(ids(&view), vec![3, 2, 1]);
    }

    #[test]
    fn test_success_prepends_with_policy() {
        let (mut view, _) = mounted(ReconcilePolicy::Prepend);
        let ticket = view.begin_fetch();
        view.apply_fetch(ticket, Ok(posts(3)));
        fill(&mut view);
        view.begin_submit().unwrap();

        view.finish_submit(Ok(post(4))).unwrap();
        assert_eq!(ids(&view), vec![4, 3, 2, 1]);

        // the next fetch already contains it; no duplicate
        let ticket = view.begin_fetch();
        view.apply_fetch(ticket, Ok(posts(4)));
        assert_eq!(ids(&view), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_failed_submit_keeps_draft() {
        let mut view = loaded(3);
        fill(&mut view);
        let before = view.reconciler().draft().clone();
        view.begin_submit().unwrap();

        let result = view.finish_submit(Err(unavailable()));

        assert!(matches!(result, Err(SubmitError::RemoteUnavailable { .. })));
        assert_eq!(view.reconciler().state(), SubmissionState::Failed);
        assert!(!view.snapshot().is_submitted);
        assert_eq!(view.reconciler().draft(), &before);
    }
}

mod manual;

pub use manual::ManualViewport;

use tracing::debug;

use crate::pagination::Feed;

/// Visibility ratio at which the sentinel counts as shown.
pub const FULLY_VISIBLE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionHandle(pub u64);

/// A visibility change reported by the platform for one subscription.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub handle: SubscriptionHandle,
    pub ratio: f32,
}

impl Intersection {
    pub fn is_fully_visible(&self) -> bool {
        self.ratio >= FULLY_VISIBLE
    }
}

/// Platform seam for observing a region's visibility.
pub trait Viewport {
    fn subscribe(&mut self, region: RegionId, threshold: f32)
        -> SubscriptionHandle;

    fn unsubscribe(&mut self, handle: SubscriptionHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Subscription {
    handle: SubscriptionHandle,
    // (visible_count, len) the subscription was opened for
    key: (usize, usize),
}

/// Advances a [`Feed`] when the sentinel region scrolls fully into view.
///
/// One reveal per transition: after a reveal, the trigger stays latched
/// until an event reports the region as not fully visible. A visible event
/// that reveals nothing does not latch. The observation is reopened whenever
/// the feed's cursor or length changes, and released on drop.
pub struct ViewportTrigger<V: Viewport> {
    viewport: V,
    region: Option<RegionId>,
    subscription: Option<Subscription>,
    latched: bool,
}

impl<V: Viewport> ViewportTrigger<V> {
    pub fn new(viewport: V) -> Self {
        Self {
            viewport,
            region: None,
            subscription: None,
            latched: false,
        }
    }

    /// Sentinel mounted.
    pub fn attach(&mut self, region: RegionId, feed: &Feed) {
        self.release();
        self.region = Some(region);
        self.latched = false;
        self.sync(feed);
    }

    /// Sentinel unmounted. The trigger idles until the next `attach`.
    pub fn detach(&mut self) {
        self.release();
        self.region = None;
        self.latched = false;
    }

    /// Reopens the observation if the feed changed since it was opened.
    pub fn sync(&mut self, feed: &Feed) {
        let Some(region) = self.region else {
            return;
        };
        let key = (feed.visible_count(), feed.len());
        if self.subscription.is_some_and(|s| s.key == key) {
            return;
        }

        // an exhausted feed that grew again starts a fresh transition
        let exhausted = self.subscription.is_some_and(|s| s.key.0 >= s.key.1);
        if exhausted && feed.has_more() {
            self.latched = false;
        }

        self.release();
        let handle = self.viewport.subscribe(region, FULLY_VISIBLE);
        debug!(
            task = "observe sentinel",
            handle = handle.0,
            visible_count = key.0,
            len = key.1
        );
        self.subscription = Some(Subscription { handle, key });
    }

    /// Handles one visibility event. Returns true when it revealed a page.
    pub fn on_intersection(
        &mut self,
        entry: Intersection,
        feed: &mut Feed,
    ) -> bool {
        let Some(subscription) = self.subscription else {
            return false;
        };
        if subscription.handle != entry.handle {
            debug!(task = "observe sentinel", stale_handle = entry.handle.0);
            return false;
        }

        if !entry.is_fully_visible() {
            self.latched = false;
            return false;
        }
        if self.latched || !feed.has_more() || !feed.reveal_more() {
            return false;
        }
        self.latched = true;
        debug!(
            task = "reveal more",
            visible_count = feed.visible_count(),
            len = feed.len()
        );
        self.sync(feed);
        true
    }

    pub fn is_observing(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn handle(&self) -> Option<SubscriptionHandle> {
        self.subscription.map(|s| s.handle)
    }

    fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.viewport.unsubscribe(subscription.handle);
        }
    }
}

impl<V: Viewport> Drop for ViewportTrigger<V> {
    fn drop(&mut self) {
        self.release();
    }
}

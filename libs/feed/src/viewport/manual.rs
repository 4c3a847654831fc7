use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use super::{RegionId, SubscriptionHandle, Viewport};

#[derive(Debug, Default)]
struct Inner {
    next_handle: u64,
    opened: usize,
    active: BTreeMap<SubscriptionHandle, RegionId>,
}

/// A [`Viewport`] whose visibility is reported by hand. Clones share state,
/// so a renderer can keep one copy to look up live handles while the
/// trigger owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualViewport {
    inner: Arc<Mutex<Inner>>,
}

impl ManualViewport {
    /// Live subscriptions, oldest first.
    pub fn active(&self) -> Vec<SubscriptionHandle> {
        self.lock().active.keys().copied().collect()
    }

    /// Live subscriptions on `region`.
    pub fn handles_for(&self, region: RegionId) -> Vec<SubscriptionHandle> {
        self.lock()
            .active
            .iter()
            .filter(|(_, r)| **r == region)
            .map(|(h, _)| *h)
            .collect()
    }

    /// Total number of subscriptions ever opened.
    pub fn opened(&self) -> usize {
        self.lock().opened
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Viewport for ManualViewport {
    fn subscribe(
        &mut self,
        region: RegionId,
        _threshold: f32,
    ) -> SubscriptionHandle {
        let mut inner = self.lock();
        let handle = SubscriptionHandle(inner.next_handle);
        inner.next_handle += 1;
        inner.opened += 1;
        inner.active.insert(handle, region);
        handle
    }

    fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        self.lock().active.remove(&handle);
    }
}

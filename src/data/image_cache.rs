use std::num::NonZeroUsize;

use lru::LruCache;

use crate::{data::client::ImagePayload, domain::ForecastId};

const DEFAULT_CAPACITY: usize = 48;

/// Recently viewed map images keyed by `(forecast, shift)`.
#[derive(Debug)]
pub struct ImageCache {
    entries: LruCache<(ForecastId, u32), ImagePayload>,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ImageCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, id: &ForecastId, shift: u32) -> Option<&ImagePayload> {
        self.entries.get(&(id.clone(), shift))
    }

    /// Archives fetched without a shift are not cached.
    pub fn insert(&mut self, payload: ImagePayload) {
        if let Some(shift) = payload.shift {
            self.entries
                .put((payload.forecast_id.clone(), shift), payload);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

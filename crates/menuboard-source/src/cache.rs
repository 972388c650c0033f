// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use menuboard_app::{FeedError, FeedResult};
use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::decode::FeedSnapshot;

pub type SharedFeed = FeedResult<Arc<FeedSnapshot>>;

/// Anything that can turn a feed location into rows.
pub trait FeedFetcher: Send + Sync {
    fn fetch(&self, location: &str) -> FeedResult<FeedSnapshot>;
}

impl<F: FeedFetcher + ?Sized> FeedFetcher for Arc<F> {
    fn fetch(&self, location: &str) -> FeedResult<FeedSnapshot> {
        (**self).fetch(location)
    }
}

#[derive(Default)]
struct Slot {
    result: Mutex<Option<SharedFeed>>,
    ready: Condvar,
}

impl Slot {
    fn fill(&self, result: SharedFeed) {
        *lock(&self.result) = Some(result);
        self.ready.notify_all();
    }

    fn wait(&self) -> SharedFeed {
        let mut guard = lock(&self.result);
        loop {
            if let Some(result) = guard.as_ref() {
                return result.clone();
            }
            guard = self
                .ready
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn is_filled(&self) -> bool {
        lock(&self.result).is_some()
    }
}

/// Fills the slot with a failure if the owning fetch unwinds, so waiters
/// never block forever.
struct FillGuard<'a> {
    slot: &'a Slot,
    filled: bool,
}

impl FillGuard<'_> {
    fn fill(mut self, result: SharedFeed) {
        self.slot.fill(result);
        self.filled = true;
    }
}

impl Drop for FillGuard<'_> {
    fn drop(&mut self) {
        if !self.filled {
            self.slot
                .fill(Err(FeedError::Fetch("fetch aborted".to_owned())));
        }
    }
}

/// At most one fetch per distinct location for the life of a page session.
///
/// The first caller for a location performs the fetch; every caller that
/// arrives while it is pending, or after it finished, gets the same result.
/// Failures are kept too: reloading the page is the retry mechanism.
pub struct FetchCache<F> {
    fetcher: F,
    slots: Mutex<HashMap<String, Arc<Slot>>>,
}

impl<F: FeedFetcher> FetchCache<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn fetch(&self, location: &str) -> SharedFeed {
        let key = location.trim().to_owned();
        let (slot, owner) = {
            let mut slots = lock(&self.slots);
            match slots.get(&key) {
                Some(slot) => (Arc::clone(slot), false),
                None => {
                    let slot = Arc::new(Slot::default());
                    slots.insert(key.clone(), Arc::clone(&slot));
                    (slot, true)
                }
            }
        };

        if !owner {
            tracing::debug!(location = %key, "adopting cached menu feed request");
            return slot.wait();
        }

        let guard = FillGuard {
            slot: &slot,
            filled: false,
        };
        let result = self.fetcher.fetch(&key).map(Arc::new);
        guard.fill(result.clone());
        result
    }

    /// Whether a fetch for `location` has been started (pending or done).
    pub fn contains(&self, location: &str) -> bool {
        lock(&self.slots).contains_key(location.trim())
    }

    pub fn is_pending(&self, location: &str) -> bool {
        lock(&self.slots)
            .get(location.trim())
            .is_some_and(|slot| !slot.is_filled())
    }
}

impl<F: FeedFetcher + 'static> FetchCache<F> {
    /// Starts the fetch on a background thread so a later `fetch` for the
    /// same location adopts it. Returns `None` if no thread could be spawned;
    /// the later `fetch` then does the work itself.
    pub fn prefetch(self: &Arc<Self>, location: &str) -> Option<JoinHandle<()>> {
        let cache = Arc::clone(self);
        let location = location.to_owned();
        let spawned = thread::Builder::new()
            .name("menuboard-early-fetch".to_owned())
            .spawn(move || {
                if let Err(error) = cache.fetch(&location) {
                    tracing::debug!(%error, "early menu fetch failed");
                }
            });
        match spawned {
            Ok(handle) => Some(handle),
            Err(error) => {
                tracing::warn!(%error, "could not start early menu fetch");
                None
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

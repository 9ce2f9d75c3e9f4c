//! Resource caches for images and sprite icons.
//!
//! A [`ResourceCache`] owns a bounded LRU of loaded drawables and a map of
//! in-flight loads keyed by resource identifier. Requesting a key that is
//! already loading returns a clone of the same [`LoadHandle`] instead of
//! issuing a second fetch. Fetchers complete loads through a [`Completer`];
//! the cache moves finished loads into the LRU the next time it is touched.
//!
//! The cache never starts timers. Callers pass their clock into
//! [`ResourceCache::load`] and [`ResourceCache::expire_stale`].

mod image;
mod sprite;

pub use image::{Drawable, ImageCache};
#[cfg(target_arch = "wasm32")]
pub use image::DomImageFetcher;
pub use sprite::SpriteCache;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::render::{LruCache, ResourceLookup};

/// Starts loading a resource. The fetcher must eventually call
/// [`Completer::resolve`] or [`Completer::reject`], possibly synchronously.
pub trait ResourceFetcher<D> {
    fn fetch(&self, key: &str, completer: Completer<D>);
}

#[derive(Debug)]
enum LoadState<D> {
    Pending,
    Ready(D),
    Failed(GridError),
}

#[derive(Debug)]
struct LoadSlot<D> {
    state: LoadState<D>,
    started_ms: f64,
    wakers: Vec<Waker>,
}

impl<D> LoadSlot<D> {
    fn finish(&mut self, state: LoadState<D>) -> bool {
        if !matches!(self.state, LoadState::Pending) {
            return false;
        }
        self.state = state;
        for waker in self.wakers.drain(..) {
            waker.wake();
        }
        true
    }
}

/// Shared handle to one load. Every caller asking for the same key while it
/// is in flight gets a clone of the same handle.
pub struct LoadHandle<D> {
    key: Rc<str>,
    slot: Rc<RefCell<LoadSlot<D>>>,
}

impl<D> Clone for LoadHandle<D> {
    fn clone(&self) -> Self {
        Self {
            key: Rc::clone(&self.key),
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for LoadHandle<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadHandle")
            .field("key", &self.key)
            .field("state", &self.slot.borrow().state)
            .finish()
    }
}

impl<D: Clone> LoadHandle<D> {
    fn pending(key: &str, started_ms: f64) -> Self {
        Self {
            key: Rc::from(key),
            slot: Rc::new(RefCell::new(LoadSlot {
                state: LoadState::Pending,
                started_ms,
                wakers: Vec::new(),
            })),
        }
    }

    fn ready(key: &str, value: D) -> Self {
        let handle = Self::pending(key, 0.0);
        handle.slot.borrow_mut().state = LoadState::Ready(value);
        handle
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current outcome without waiting: `None` while pending.
    pub fn peek(&self) -> Option<Result<D>> {
        match &self.slot.borrow().state {
            LoadState::Pending => None,
            LoadState::Ready(value) => Some(Ok(value.clone())),
            LoadState::Failed(err) => Some(Err(err.clone())),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.slot.borrow().state, LoadState::Pending)
    }

    /// Whether two handles refer to the same underlying load.
    pub fn same_load(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }

    fn completer(&self) -> Completer<D> {
        Completer {
            handle: self.clone(),
        }
    }
}

impl<D: Clone> Future for LoadHandle<D> {
    type Output = Result<D>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(outcome) = self.peek() {
            return Poll::Ready(outcome);
        }
        let mut slot = self.slot.borrow_mut();
        if !slot.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            slot.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

/// Write side of a [`LoadHandle`], given to the fetcher.
pub struct Completer<D> {
    handle: LoadHandle<D>,
}

impl<D: Clone> Completer<D> {
    pub fn key(&self) -> &str {
        self.handle.key()
    }

    /// Complete the load. Ignored if it already timed out.
    pub fn resolve(self, value: D) {
        if !self.handle.slot.borrow_mut().finish(LoadState::Ready(value)) {
            log::debug!("resource {} resolved after it was settled", self.key());
        }
    }

    pub fn reject(self, reason: impl Into<String>) {
        let err = GridError::ResourceLoad {
            key: self.key().to_string(),
            reason: reason.into(),
        };
        self.handle.slot.borrow_mut().finish(LoadState::Failed(err));
    }
}

/// Deduplicating, bounded resource cache.
pub struct ResourceCache<D, F> {
    name: &'static str,
    fetcher: F,
    loaded: LruCache<String, D>,
    in_flight: HashMap<String, LoadHandle<D>>,
    /// Keys whose last load failed; only an explicit `load` retries them.
    failed: HashSet<String>,
    timeout_ms: u64,
}

impl<D: Clone, F: ResourceFetcher<D>> ResourceCache<D, F> {
    pub fn new(name: &'static str, fetcher: F, capacity: usize, timeout_ms: u64) -> Self {
        Self {
            name,
            fetcher,
            loaded: LruCache::new(capacity),
            in_flight: HashMap::new(),
            failed: HashSet::new(),
            timeout_ms,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Start (or join) a load for `key`.
    pub fn load(&mut self, key: &str, now_ms: f64) -> LoadHandle<D> {
        self.settle();
        if let Some(value) = self.loaded.get(&key.to_string()) {
            return LoadHandle::ready(key, value.clone());
        }
        if let Some(handle) = self.in_flight.get(key) {
            return handle.clone();
        }
        self.failed.remove(key);
        log::debug!("{}: fetching {key}", self.name);
        let handle = LoadHandle::pending(key, now_ms);
        self.in_flight.insert(key.to_string(), handle.clone());
        self.fetcher.fetch(key, handle.completer());
        // Fetchers may complete synchronously.
        self.settle();
        handle
    }

    /// Loaded drawable for `key`, if any. Never starts a load.
    pub fn get(&mut self, key: &str) -> Option<D> {
        self.settle();
        self.loaded.get(&key.to_string()).cloned()
    }

    /// Loaded value for `key`, starting a load on a miss. Keys that failed
    /// are not retried here.
    pub fn request(&mut self, key: &str, now_ms: f64) -> Option<D> {
        if let Some(value) = self.get(key) {
            return Some(value);
        }
        if !self.in_flight.contains_key(key) && !self.failed.contains(key) {
            self.load(key, now_ms);
        }
        self.loaded.get(&key.to_string()).cloned()
    }

    pub fn has_failed(&self, key: &str) -> bool {
        self.failed.contains(key)
    }

    pub fn is_loaded(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_loading(&self, key: &str) -> bool {
        self.in_flight.get(key).is_some_and(LoadHandle::is_pending)
    }

    pub fn preload<S: AsRef<str>>(&mut self, keys: &[S], now_ms: f64) -> Vec<LoadHandle<D>> {
        keys.iter().map(|k| self.load(k.as_ref(), now_ms)).collect()
    }

    /// Reject in-flight loads started more than the timeout ago.
    /// Returns the number of loads that timed out.
    pub fn expire_stale(&mut self, now_ms: f64) -> usize {
        #[allow(clippy::cast_precision_loss)]
        let timeout = self.timeout_ms as f64;
        let mut expired = 0;
        for (key, handle) in &self.in_flight {
            let mut slot = handle.slot.borrow_mut();
            if now_ms - slot.started_ms >= timeout {
                let err = GridError::ResourceTimeout {
                    key: key.clone(),
                    timeout_ms: self.timeout_ms,
                };
                if slot.finish(LoadState::Failed(err)) {
                    expired += 1;
                }
            }
        }
        self.settle();
        expired
    }

    /// Move finished loads out of the in-flight map. Failures are logged
    /// and dropped so that a later `load` retries.
    pub fn settle(&mut self) -> usize {
        let done: Vec<String> = self
            .in_flight
            .iter()
            .filter(|(_, h)| !h.is_pending())
            .map(|(k, _)| k.clone())
            .collect();
        for key in &done {
            let Some(handle) = self.in_flight.remove(key) else {
                continue;
            };
            match handle.peek() {
                Some(Ok(value)) => {
                    self.loaded.insert(key.clone(), value);
                }
                Some(Err(err)) => {
                    log::warn!("{}: {err}", self.name);
                    self.failed.insert(key.clone());
                }
                None => {}
            }
        }
        done.len()
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    /// Forget loaded entries and detach in-flight loads. Detached loads
    /// still complete for whoever holds their handle.
    pub fn clear(&mut self) {
        self.loaded.clear();
        self.in_flight.clear();
        self.failed.clear();
    }
}

impl<D, F> fmt::Debug for ResourceCache<D, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCache")
            .field("name", &self.name)
            .field("loaded", &self.loaded.len())
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

/// Image and sprite caches sharing one fetcher type.
pub struct Resources<F> {
    pub images: ImageCache<F>,
    pub sprites: SpriteCache<F>,
}

impl<F: ResourceFetcher<Drawable> + Clone> Resources<F> {
    pub fn new(config: &GridConfig, fetcher: F) -> Self {
        Self {
            images: ImageCache::new(
                "images",
                fetcher.clone(),
                config.image_cache_capacity,
                config.resource_timeout_ms,
            ),
            sprites: SpriteCache::new(
                config.custom_icons.clone(),
                fetcher,
                config.sprite_cache_capacity,
                config.resource_timeout_ms,
            ),
        }
    }
}

impl<F: ResourceFetcher<Drawable>> ResourceLookup for Resources<F> {
    fn image(&mut self, url: &str, now_ms: f64) -> Option<Drawable> {
        self.images.request(url, now_ms)
    }

    fn icon(&mut self, name: &str, now_ms: f64) -> Option<Drawable> {
        self.sprites.request(name, now_ms)
    }

    fn expire_stale(&mut self, now_ms: f64) -> usize {
        self.images.expire_stale(now_ms) + self.sprites.expire_stale(now_ms)
    }
}

impl<F> fmt::Debug for Resources<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resources")
            .field("images", &self.images)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;

    /// Fetcher that parks completers until the test resolves them.
    #[derive(Default)]
    pub(crate) struct ManualFetcher {
        pub calls: Cell<usize>,
        pub pending: RefCell<Vec<Completer<u32>>>,
    }

    impl ResourceFetcher<u32> for ManualFetcher {
        fn fetch(&self, _key: &str, completer: Completer<u32>) {
            self.calls.set(self.calls.get() + 1);
            self.pending.borrow_mut().push(completer);
        }
    }

    fn cache(capacity: usize) -> ResourceCache<u32, ManualFetcher> {
        ResourceCache::new("test", ManualFetcher::default(), capacity, 1_000)
    }

    #[test]
    fn test_concurrent_loads_share_one_fetch() {
        let mut c = cache(4);
        let first = c.load("a.png", 0.0);
        let second = c.load("a.png", 5.0);
        assert_eq!(c.fetcher().calls.get(), 1);
        assert!(first.same_load(&second));

        c.fetcher().pending.borrow_mut().pop().unwrap().resolve(7);
        assert_eq!(first.peek().unwrap().unwrap(), 7);
        assert_eq!(second.peek().unwrap().unwrap(), 7);
        assert_eq!(c.get("a.png"), Some(7));
        assert_eq!(c.in_flight_len(), 0);
    }

    #[test]
    fn test_failure_removes_entry_and_allows_retry() {
        let mut c = cache(4);
        let handle = c.load("b.png", 0.0);
        c.fetcher().pending.borrow_mut().pop().unwrap().reject("404");
        assert!(matches!(
            handle.peek(),
            Some(Err(GridError::ResourceLoad { .. }))
        ));
        assert!(!c.is_loaded("b.png"));
        assert!(c.has_failed("b.png"));
        // Passive requests do not retry; an explicit load does.
        assert_eq!(c.request("b.png", 5.0), None);
        assert_eq!(c.fetcher().calls.get(), 1);
        c.load("b.png", 10.0);
        assert_eq!(c.fetcher().calls.get(), 2);
        assert!(!c.has_failed("b.png"));
    }

    #[test]
    fn test_timeout_rejects_and_late_result_is_ignored() {
        let mut c = cache(4);
        let handle = c.load("slow.png", 100.0);
        assert_eq!(c.expire_stale(500.0), 0);
        assert_eq!(c.expire_stale(1_100.0), 1);
        assert!(matches!(
            handle.peek(),
            Some(Err(GridError::ResourceTimeout { timeout_ms: 1_000, .. }))
        ));
        c.fetcher().pending.borrow_mut().pop().unwrap().resolve(1);
        assert!(!c.is_loaded("slow.png"));
    }

    #[test]
    fn test_capacity_trims_oldest() {
        let mut c = cache(2);
        for key in ["a", "b", "c"] {
            c.load(key, 0.0);
            c.fetcher().pending.borrow_mut().pop().unwrap().resolve(1);
            c.settle();
        }
        assert_eq!(c.len(), 2);
        assert!(!c.is_loaded("a"));
        assert!(c.is_loaded("c"));
    }

    #[test]
    fn test_handle_is_a_future() {
        use std::task::Wake;

        struct Noop;
        impl Wake for Noop {
            fn wake(self: std::sync::Arc<Self>) {}
        }

        let mut c = cache(2);
        let mut handle = c.load("x", 0.0);
        let waker = Waker::from(std::sync::Arc::new(Noop));
        let mut cx = Context::from_waker(&waker);
        assert!(Pin::new(&mut handle).poll(&mut cx).is_pending());
        c.fetcher().pending.borrow_mut().pop().unwrap().resolve(3);
        assert!(matches!(Pin::new(&mut handle).poll(&mut cx), Poll::Ready(Ok(3))));
    }
}

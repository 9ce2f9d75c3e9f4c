//! Named icon sprites resolved through the host's `customIcons` map.

use std::collections::HashMap;

use super::{Drawable, LoadHandle, ResourceCache, ResourceFetcher};

pub struct SpriteCache<F> {
    icons: HashMap<String, String>,
    cache: ResourceCache<Drawable, F>,
}

impl<F: ResourceFetcher<Drawable>> SpriteCache<F> {
    pub fn new(
        icons: HashMap<String, String>,
        fetcher: F,
        capacity: usize,
        timeout_ms: u64,
    ) -> Self {
        Self {
            icons,
            cache: ResourceCache::new("sprites", fetcher, capacity, timeout_ms),
        }
    }

    /// Register or replace an icon URL.
    pub fn register(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.icons.insert(name.into(), url.into());
    }

    pub fn set_icons(&mut self, icons: HashMap<String, String>) {
        self.icons = icons;
    }

    pub fn has_icon(&self, name: &str) -> bool {
        self.icons.contains_key(name)
    }

    /// Start loading icon `name`. `None` if no URL is registered for it.
    pub fn load(&mut self, name: &str, now_ms: f64) -> Option<LoadHandle<Drawable>> {
        let Some(url) = self.icons.get(name) else {
            log::debug!("sprites: unknown icon {name}");
            return None;
        };
        let url = url.clone();
        Some(self.cache.load(&url, now_ms))
    }

    /// Loaded icon, starting a load on a miss.
    pub fn request(&mut self, name: &str, now_ms: f64) -> Option<Drawable> {
        let url = self.icons.get(name)?.clone();
        self.cache.request(&url, now_ms)
    }

    pub fn get(&mut self, name: &str) -> Option<Drawable> {
        let url = self.icons.get(name)?.clone();
        self.cache.get(&url)
    }

    pub fn is_loaded(&mut self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn preload<S: AsRef<str>>(&mut self, names: &[S], now_ms: f64) -> Vec<LoadHandle<Drawable>> {
        names
            .iter()
            .filter_map(|name| self.load(name.as_ref(), now_ms))
            .collect()
    }

    pub fn expire_stale(&mut self, now_ms: f64) -> usize {
        self.cache.expire_stale(now_ms)
    }

    pub fn cache(&self) -> &ResourceCache<Drawable, F> {
        &self.cache
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

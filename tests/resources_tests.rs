//! Resource caches: deduplication, failure handling, timeouts and the
//! engine's use of them while painting.
#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

mod common;

use std::collections::HashMap;

use gridcanvas::interaction::GridHost;
use gridcanvas::render::{CellProvider, DrawOp};
use gridcanvas::resources::{ImageCache, Resources, SpriteCache};
use gridcanvas::{CellContent, CellPoint, GridConfig, GridEngine, GridError, RecordingSurface};

use common::ManualFetcher;

fn cache(fetcher: &ManualFetcher) -> ImageCache<ManualFetcher> {
    ImageCache::new("images", fetcher.clone(), 8, 100)
}

#[test]
fn test_concurrent_requests_share_one_fetch() {
    let fetcher = ManualFetcher::default();
    let mut images = cache(&fetcher);
    let a = images.load("a.png", 0.0);
    let b = images.load("a.png", 5.0);
    assert!(a.same_load(&b));
    assert_eq!(fetcher.fetch_count(), 1);
    assert!(images.is_loading("a.png"));

    fetcher.resolve_all();
    assert!(a.peek().unwrap().is_ok());
    assert_eq!(images.get("a.png").unwrap().width, 16.0);
    assert_eq!(images.in_flight_len(), 0);

    // Served from the cache from now on.
    let c = images.load("a.png", 10.0);
    assert!(!c.is_pending());
    assert_eq!(fetcher.fetch_count(), 1);
}

#[test]
fn test_failed_keys_wait_for_explicit_load() {
    let fetcher = ManualFetcher::default();
    let mut images = cache(&fetcher);
    assert!(images.request("bad.png", 0.0).is_none());
    fetcher.reject_all("404");
    assert!(images.request("bad.png", 1.0).is_none());
    assert!(images.has_failed("bad.png"));
    assert_eq!(fetcher.fetch_count(), 1);

    let retry = images.load("bad.png", 2.0);
    assert!(retry.is_pending());
    assert!(!images.has_failed("bad.png"));
    assert_eq!(fetcher.fetch_count(), 2);
}

#[test]
fn test_rejection_carries_the_key() {
    let fetcher = ManualFetcher::default();
    let mut images = cache(&fetcher);
    let handle = images.load("x.png", 0.0);
    fetcher.reject_all("decode error");
    match handle.peek() {
        Some(Err(GridError::ResourceLoad { key, reason })) => {
            assert_eq!(key, "x.png");
            assert_eq!(reason, "decode error");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_stale_loads_time_out() {
    let fetcher = ManualFetcher::default();
    let mut images = cache(&fetcher);
    let handle = images.load("slow.png", 0.0);
    assert_eq!(images.expire_stale(99.0), 0);
    assert_eq!(images.expire_stale(100.0), 1);
    assert!(matches!(
        handle.peek(),
        Some(Err(GridError::ResourceTimeout { timeout_ms: 100, .. }))
    ));
    assert!(images.has_failed("slow.png"));

    // A late completion is ignored.
    fetcher.resolve_all();
    assert!(images.get("slow.png").is_none());
    assert!(handle.peek().unwrap().is_err());
}

#[test]
fn test_capacity_bounds_the_cache() {
    let fetcher = ManualFetcher::default();
    let mut images = ImageCache::new("images", fetcher.clone(), 2, 100);
    images.preload(&["a", "b", "c"], 0.0);
    assert_eq!(images.in_flight_len(), 3);
    fetcher.resolve_all();
    images.settle();
    assert_eq!(images.len(), 2);
    images.clear();
    assert!(images.is_empty());
}

#[test]
fn test_sprites_resolve_through_icon_map() {
    let fetcher = ManualFetcher::default();
    let mut icons = HashMap::new();
    icons.insert("star".to_string(), "/icons/star.svg".to_string());
    let mut sprites = SpriteCache::new(icons, fetcher.clone(), 4, 100);

    assert!(sprites.load("missing", 0.0).is_none());
    assert!(sprites.request("star", 0.0).is_none());
    assert_eq!(*fetcher.fetches.borrow(), vec!["/icons/star.svg".to_string()]);
    fetcher.resolve_all();
    assert!(sprites.is_loaded("star"));

    sprites.register("heart", "/icons/heart.svg");
    assert!(sprites.has_icon("heart"));
}

/// Every cell shows the same image.
struct Gallery;

impl CellProvider for Gallery {
    fn cell_content(&self, _cell: CellPoint) -> CellContent {
        CellContent::image("photo.png")
    }
}

impl GridHost for Gallery {}

fn gallery() -> (GridEngine<Gallery, Resources<ManualFetcher>>, ManualFetcher) {
    let config = GridConfig::new(10, 1_000);
    let fetcher = ManualFetcher::default();
    let resources = Resources::new(&config, fetcher.clone());
    let mut e = GridEngine::new(config, Gallery, resources).unwrap();
    e.resize(800.0, 440.0);
    (e, fetcher)
}

fn images_drawn(surface: &RecordingSurface) -> usize {
    surface
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::Image { .. }))
        .count()
}

#[test]
fn test_frame_fetches_each_image_once() {
    let (mut e, fetcher) = gallery();
    let mut s = RecordingSurface::new(800.0, 440.0);
    let stats = e.render(&mut s, 0.0);
    assert_eq!(fetcher.fetch_count(), 1);
    assert_eq!(images_drawn(&s), 0);
    let loading = e.theme().loading_color.clone();
    let placeholders = s
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::FillRect { color, .. } if *color == loading))
        .count();
    assert_eq!(placeholders, stats.cells_painted as usize);

    fetcher.resolve_all();
    let mut s = RecordingSurface::new(800.0, 440.0);
    let stats = e.render(&mut s, 16.0);
    assert_eq!(images_drawn(&s), stats.cells_painted as usize);
    assert_eq!(fetcher.fetch_count(), 1);
}

#[test]
fn test_timed_out_image_is_not_refetched_by_frames() {
    let (mut e, fetcher) = gallery();
    let mut s = RecordingSurface::new(800.0, 440.0);
    e.render(&mut s, 0.0);
    let timeout = e.config().resource_timeout_ms as f64;
    let stats = e.render(&mut s, timeout);
    assert_eq!(stats.resources_expired, 1);
    e.render(&mut s, timeout + 16.0);
    assert_eq!(fetcher.fetch_count(), 1);

    // An explicit load retries.
    e.resources_mut().images.load("photo.png", timeout + 32.0);
    assert_eq!(fetcher.fetch_count(), 2);
}

#[test]
fn test_auto_size_row_uses_loaded_images() {
    let (mut e, fetcher) = gallery();
    let mut s = RecordingSurface::new(800.0, 440.0);
    // Nothing is loaded yet, so the default height is kept.
    assert_eq!(e.auto_size_row(0, &mut s), Some(40.0));
    fetcher.resolve_all();
    // 16px image plus 8px padding.
    assert_eq!(e.auto_size_row(0, &mut s), Some(24.0));
    assert_eq!(e.get_cell_bounds(gridcanvas::CellPosition::new(0, 1)).unwrap().y, 40.0 + 24.0);
    assert_eq!(e.auto_size_row(1_000, &mut s), None);
}

//! Image drawables and the DOM-backed image fetcher.

use super::ResourceCache;

/// A loaded, paintable image.
#[derive(Debug, Clone)]
pub struct Drawable {
    pub width: f64,
    pub height: f64,
    #[cfg(target_arch = "wasm32")]
    pub(crate) image: Option<web_sys::HtmlImageElement>,
}

impl Drawable {
    /// A drawable with known dimensions and no backing element. Surfaces
    /// that need pixels treat it as a placeholder.
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            #[cfg(target_arch = "wasm32")]
            image: None,
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_image(image: web_sys::HtmlImageElement) -> Self {
        Self {
            width: f64::from(image.natural_width()),
            height: f64::from(image.natural_height()),
            image: Some(image),
        }
    }

    /// Scale factor that fits the image inside `max_w` x `max_h` without
    /// distortion. Never upscales.
    pub fn fit_scale(&self, max_w: f64, max_h: f64) -> f64 {
        if !(self.width > 0.0 && self.height > 0.0) {
            return 0.0;
        }
        (max_w / self.width).min(max_h / self.height).min(1.0).max(0.0)
    }
}

/// Cache of images keyed by URL.
pub type ImageCache<F> = ResourceCache<Drawable, F>;

#[cfg(target_arch = "wasm32")]
mod dom {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;
    use web_sys::HtmlImageElement;

    use super::Drawable;
    use crate::resources::{Completer, ResourceFetcher};

    /// Loads images through `HtmlImageElement` and calls `on_ready` after
    /// every completion so the host can schedule a redraw.
    #[derive(Clone)]
    pub struct DomImageFetcher {
        cross_origin: Option<String>,
        on_ready: Rc<dyn Fn()>,
    }

    impl DomImageFetcher {
        pub fn new(on_ready: Rc<dyn Fn()>) -> Self {
            Self {
                cross_origin: Some("anonymous".to_string()),
                on_ready,
            }
        }
    }

    impl ResourceFetcher<Drawable> for DomImageFetcher {
        fn fetch(&self, key: &str, completer: Completer<Drawable>) {
            let image = match HtmlImageElement::new() {
                Ok(image) => image,
                Err(err) => {
                    completer.reject(format!("cannot create image element: {err:?}"));
                    return;
                }
            };
            if let Some(origin) = &self.cross_origin {
                image.set_cross_origin(Some(origin));
            }

            // Whichever of onload/onerror fires first takes the completer.
            let completer = Rc::new(RefCell::new(Some(completer)));

            let on_load = {
                let completer = Rc::clone(&completer);
                let on_ready = Rc::clone(&self.on_ready);
                let loaded = image.clone();
                Closure::once_into_js(move || {
                    if let Some(c) = completer.borrow_mut().take() {
                        c.resolve(Drawable::from_image(loaded));
                    }
                    on_ready();
                })
            };
            let on_error = {
                let on_ready = Rc::clone(&self.on_ready);
                Closure::once_into_js(move || {
                    if let Some(c) = completer.borrow_mut().take() {
                        c.reject("image failed to load");
                    }
                    on_ready();
                })
            };
            image.set_onload(Some(on_load.unchecked_ref()));
            image.set_onerror(Some(on_error.unchecked_ref()));
            image.set_src(key);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::DomImageFetcher;

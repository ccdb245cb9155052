//! Document-level accessibility effects
//!
//! The rendered page exposes exactly two global knobs: the root font
//! size and the body visual filter. Each is owned by one effect - the
//! font-scale effect writes the root size, the color-vision effect
//! writes the filter - so the two can mount, react, and unmount in any
//! order without touching each other's state.
//!
//! Effects are RAII guards: mounting applies the current preference and
//! subscribes to the store, dropping unsubscribes and restores the
//! document property to its base state. Drop is the single release
//! path, so cleanup runs on every exit route.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::prefs::{ColorVisionMode, PreferenceStore, SubscriptionId};

/// Base root font size in pixels
pub const BASE_FONT_PX: f64 = 16.0;

/// Smallest multiplier the font-scale effect will apply
pub const MIN_FONT_SCALE: f64 = 0.8;

/// Largest multiplier the font-scale effect will apply
pub const MAX_FONT_SCALE: f64 = 1.5;

/// The document-level properties the effects are allowed to mutate
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Root font size in pixels; owned by [`FontScaleEffect`]
    pub root_font_px: f64,
    /// Body visual filter expression; owned by [`ColorVisionEffect`]
    pub body_filter: String,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            root_font_px: BASE_FONT_PX,
            body_filter: String::new(),
        }
    }
}

/// Shared handle to the document
pub type SharedDocument = Arc<Mutex<Document>>;

fn lock(doc: &SharedDocument) -> MutexGuard<'_, Document> {
    doc.lock().unwrap_or_else(|e| e.into_inner())
}

/// Copy of the document's current state
pub fn snapshot(doc: &SharedDocument) -> Document {
    lock(doc).clone()
}

/// Filter expression for a color-vision mode.
///
/// Total over the enum; `None` maps to the identity (empty) filter.
pub fn filter_for(mode: ColorVisionMode) -> &'static str {
    match mode {
        ColorVisionMode::None => "",
        ColorVisionMode::Protanopia => "url(#protanopia-filter)",
        ColorVisionMode::Deuteranopia => "url(#deuteranopia-filter)",
        ColorVisionMode::Tritanopia => "url(#tritanopia-filter)",
        ColorVisionMode::Grayscale => "grayscale(100%)",
    }
}

/// Applies the preferred font scale to the document root.
///
/// A scale is applied only when `BASE_FONT_PX * scale` is finite and
/// within `[BASE_FONT_PX * 0.8, BASE_FONT_PX * 1.5]`; anything outside
/// that window leaves the previously applied size untouched. This is a
/// layout safety bound, not an error the reader sees.
pub struct FontScaleEffect {
    store: Arc<PreferenceStore>,
    document: SharedDocument,
    subscription: SubscriptionId,
}

impl FontScaleEffect {
    /// Apply the current scale and subscribe to future changes
    pub fn mount(store: Arc<PreferenceStore>, document: SharedDocument) -> Self {
        Self::apply(&document, store.get().font_scale);

        let doc = document.clone();
        let subscription = store.subscribe(move |record| {
            Self::apply(&doc, record.font_scale);
        });

        Self {
            store,
            document,
            subscription,
        }
    }

    fn apply(document: &SharedDocument, scale: f64) {
        let target = BASE_FONT_PX * scale;
        if !target.is_finite()
            || target < BASE_FONT_PX * MIN_FONT_SCALE
            || target > BASE_FONT_PX * MAX_FONT_SCALE
        {
            tracing::debug!("Skipping out-of-range font scale {}", scale);
            return;
        }
        lock(document).root_font_px = target;
    }
}

impl Drop for FontScaleEffect {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
        lock(&self.document).root_font_px = BASE_FONT_PX;
    }
}

/// Applies the preferred color-vision filter to the document body.
pub struct ColorVisionEffect {
    store: Arc<PreferenceStore>,
    document: SharedDocument,
    subscription: SubscriptionId,
}

impl ColorVisionEffect {
    /// Apply the current mode and subscribe to future changes
    pub fn mount(store: Arc<PreferenceStore>, document: SharedDocument) -> Self {
        Self::apply(&document, store.get().color_vision_mode);

        let doc = document.clone();
        let subscription = store.subscribe(move |record| {
            Self::apply(&doc, record.color_vision_mode);
        });

        Self {
            store,
            document,
            subscription,
        }
    }

    fn apply(document: &SharedDocument, mode: ColorVisionMode) {
        lock(document).body_filter = filter_for(mode).to_string();
    }
}

impl Drop for ColorVisionEffect {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
        lock(&self.document).body_filter.clear();
    }
}

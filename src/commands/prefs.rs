//! Inspect and change reader preferences

use anyhow::{anyhow, Result};
use std::sync::Arc;

use crate::document::{self, ColorVisionEffect, FontScaleEffect, SharedDocument};
use crate::prefs::{ColorVisionMode, PreferenceUpdate, ThemeMode};
use crate::Folio;

/// Print the current (hydrated) preference record and the document
/// state it resolves to
pub fn show(folio: &Folio) -> Result<()> {
    let store = folio.preference_store();
    let record = store.get();

    println!("font-scale:   {}", record.font_scale);
    println!("color-vision: {}", record.color_vision_mode.as_str());
    println!("theme:        {}", record.theme_mode.as_str());

    // Run the preferences through the real effects to show what a page
    // would actually apply (an out-of-range scale resolves to the base)
    let doc: SharedDocument = Arc::default();
    let _font = FontScaleEffect::mount(store.clone(), doc.clone());
    let _color = ColorVisionEffect::mount(store, doc.clone());
    let applied = document::snapshot(&doc);

    println!();
    println!("applied root font: {}px", applied.root_font_px);
    if applied.body_filter.is_empty() {
        println!("applied filter:    (none)");
    } else {
        println!("applied filter:    {}", applied.body_filter);
    }
    Ok(())
}

/// Apply a partial preference update and persist it
pub fn set(
    folio: &Folio,
    font_scale: Option<f64>,
    color_vision: Option<&str>,
    theme: Option<&str>,
) -> Result<()> {
    let color_vision_mode = color_vision
        .map(|s| {
            ColorVisionMode::parse(s).ok_or_else(|| {
                anyhow!(
                    "unknown color-vision mode '{}' (expected one of: {})",
                    s,
                    ColorVisionMode::ALL
                        .iter()
                        .map(|m| m.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
        })
        .transpose()?;
    let theme_mode = theme
        .map(|s| ThemeMode::parse(s).ok_or_else(|| anyhow!("unknown theme mode '{}'", s)))
        .transpose()?;

    let update = PreferenceUpdate {
        font_scale,
        color_vision_mode,
        theme_mode,
    };

    let store = folio.preference_store();
    store.set(update);
    // The CLI exits right after, so make the write synchronous
    store.flush()?;

    tracing::info!("Preferences updated: {:?}", store.get());
    show(folio)
}

/// Reset preferences to their defaults
pub fn reset(folio: &Folio) -> Result<()> {
    let store = folio.preference_store();
    store.reset();
    store.flush()?;
    println!("Preferences reset to defaults.");
    Ok(())
}

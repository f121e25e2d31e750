//! Runtime preferences.
//!
//! Read once at mount from the canvas element's `data-settings` JSON
//! attribute (the embedding page decides what to put there); nothing is
//! written back anywhere.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Start with audio muted
    pub muted: bool,
    /// Camera shake on impacts
    pub screen_shake: bool,
    /// Accessibility: minimize shake and flashes
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            screen_shake: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse from JSON, falling back to defaults on malformed input.
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("ignoring malformed settings: {e}");
            Self::default()
        })
    }

    /// Settings for the given canvas element's `data-settings` attribute.
    #[cfg(target_arch = "wasm32")]
    pub fn load(canvas: &web_sys::HtmlCanvasElement) -> Self {
        match canvas.get_attribute("data-settings") {
            Some(json) => Self::from_json(&json),
            None => Self::default(),
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }
}

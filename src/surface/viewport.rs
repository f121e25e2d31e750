//! Letterbox fit and pointer remapping.
//!
//! The backing canvas stays at the logical resolution; a CSS transform
//! scales it to fit its container. This struct is the pure math side:
//! the fitted scale, the centering offsets, and the inverse mapping
//! from client-space pointer positions into simulation coordinates.

use crate::consts::{HEIGHT, WIDTH};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Uniform scale applied to the canvas; 0 until the first non-empty
    /// fit (and again whenever the container collapses to zero area).
    pub ratio: f64,
    /// Horizontal letterbox offset in container pixels.
    pub x: f64,
    /// Vertical letterbox offset in container pixels.
    pub y: f64,
    /// Toggled on every fullscreenchange event.
    pub fullscreen: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            ratio: 0.0,
            x: 0.0,
            y: 0.0,
            fullscreen: false,
        }
    }
}

impl Viewport {
    /// Fit the logical canvas inside the container: the largest uniform
    /// scale that shows the whole canvas (letterboxing, never cropping),
    /// centered on both axes.
    pub fn refit(&mut self, container_w: f64, container_h: f64) {
        self.ratio = (container_w / f64::from(WIDTH)).min(container_h / f64::from(HEIGHT));
        self.x = (container_w - f64::from(WIDTH) * self.ratio) / 2.0;
        self.y = (container_h - f64::from(HEIGHT) * self.ratio) / 2.0;
    }

    /// CSS transform for the canvas element (transform-origin top-left),
    /// so the backing store keeps its logical size and scales crisply.
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px,{}px) scale({})",
            self.x, self.y, self.ratio
        )
    }

    /// Invert the fit: client-space pointer position to simulation
    /// coordinates, given the canvas bounding-rect origin.
    ///
    /// In fullscreen the letterbox offsets are subtracted manually
    /// because the centering no longer comes from the CSS transform.
    /// Returns `None` while there is no valid mapping (zero-area
    /// container), so callers drop pointer updates instead of dividing
    /// by zero.
    pub fn pointer_to_simulation(
        &self,
        client_x: f64,
        client_y: f64,
        rect_left: f64,
        rect_top: f64,
    ) -> Option<(f32, f32)> {
        if self.ratio <= 0.0 {
            return None;
        }
        let (off_x, off_y) = if self.fullscreen {
            (self.x, self.y)
        } else {
            (0.0, 0.0)
        };
        Some((
            ((client_x - rect_left - off_x) / self.ratio) as f32,
            ((client_y - rect_top - off_y) / self.ratio) as f32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_wide_container_letterboxes_horizontally() {
        let mut vp = Viewport::default();
        vp.refit(1920.0, 1080.0);
        assert_eq!(vp.ratio, 1.8);
        assert_eq!(vp.x, 240.0);
        assert_eq!(vp.y, 0.0);
    }

    #[test]
    fn fit_tall_container_letterboxes_vertically() {
        let mut vp = Viewport::default();
        vp.refit(800.0, 1200.0);
        assert_eq!(vp.ratio, 1.0);
        assert_eq!(vp.x, 0.0);
        assert_eq!(vp.y, 300.0);
    }

    #[test]
    fn css_transform_matches_fit() {
        let mut vp = Viewport::default();
        vp.refit(1920.0, 1080.0);
        assert_eq!(vp.css_transform(), "translate(240px,0px) scale(1.8)");
    }

    #[test]
    fn pointer_mapping_windowed() {
        let vp = Viewport {
            ratio: 2.0,
            x: 240.0,
            y: 0.0,
            fullscreen: false,
        };
        // Windowed: the CSS transform already centers the canvas, so the
        // rect origin is all that gets subtracted.
        assert_eq!(
            vp.pointer_to_simulation(300.0, 150.0, 100.0, 50.0),
            Some((100.0, 50.0))
        );
    }

    #[test]
    fn pointer_mapping_fullscreen_subtracts_letterbox() {
        let vp = Viewport {
            ratio: 2.0,
            x: 240.0,
            y: 60.0,
            fullscreen: true,
        };
        assert_eq!(
            vp.pointer_to_simulation(300.0, 150.0, 100.0, 50.0),
            Some(((300.0 - 100.0 - 240.0) / 2.0, (150.0 - 50.0 - 60.0) / 2.0))
        );
    }

    #[test]
    fn zero_area_container_drops_pointer_updates() {
        let mut vp = Viewport::default();
        vp.refit(0.0, 600.0);
        assert_eq!(vp.ratio, 0.0);
        assert_eq!(vp.pointer_to_simulation(10.0, 10.0, 0.0, 0.0), None);
    }

    #[test]
    fn unfitted_viewport_has_no_mapping() {
        let vp = Viewport::default();
        assert_eq!(vp.pointer_to_simulation(10.0, 10.0, 0.0, 0.0), None);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn fitted_canvas_never_overflows_container(
                w in 1.0f64..4096.0,
                h in 1.0f64..4096.0,
            ) {
                let mut vp = Viewport::default();
                vp.refit(w, h);
                prop_assert!(vp.ratio > 0.0);
                prop_assert!(f64::from(crate::consts::WIDTH) * vp.ratio <= w + 1e-6);
                prop_assert!(f64::from(crate::consts::HEIGHT) * vp.ratio <= h + 1e-6);
                prop_assert!(vp.x >= -1e-9);
                prop_assert!(vp.y >= -1e-9);
            }
        }
    }
}

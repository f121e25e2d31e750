//! Drawing-surface capability.
//!
//! The engine draws through this trait instead of holding a browser
//! context directly, so the orchestrator and the scenes compile and
//! test natively. The only production implementation is the 2D canvas
//! context on wasm.

/// Minimal 2D surface contract: transform stack, fill/stroke primitives
/// and text. Coordinates are simulation-space pixels.
pub trait DrawSurface {
    fn reset_transform(&self);
    fn save(&self);
    fn restore(&self);
    fn translate(&self, dx: f64, dy: f64);
    fn rotate(&self, radians: f64);
    fn scale(&self, sx: f64, sy: f64);
    fn set_fill(&self, color: &str);
    fn set_stroke(&self, color: &str);
    fn set_line_width(&self, width: f64);
    fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64);
    fn stroke_rect(&self, x: f64, y: f64, w: f64, h: f64);
    fn fill_circle(&self, x: f64, y: f64, radius: f64);
    fn line(&self, x1: f64, y1: f64, x2: f64, y2: f64);
    fn set_font(&self, font: &str);
    fn set_text_align(&self, align: &str);
    fn fill_text(&self, text: &str, x: f64, y: f64);
}

#[cfg(target_arch = "wasm32")]
mod canvas2d {
    use super::DrawSurface;
    use std::f64::consts::TAU;
    use web_sys::CanvasRenderingContext2d as Ctx;

    impl DrawSurface for Ctx {
        fn reset_transform(&self) {
            let _ = Ctx::reset_transform(self);
        }

        fn save(&self) {
            Ctx::save(self);
        }

        fn restore(&self) {
            Ctx::restore(self);
        }

        fn translate(&self, dx: f64, dy: f64) {
            let _ = Ctx::translate(self, dx, dy);
        }

        fn rotate(&self, radians: f64) {
            let _ = Ctx::rotate(self, radians);
        }

        fn scale(&self, sx: f64, sy: f64) {
            let _ = Ctx::scale(self, sx, sy);
        }

        fn set_fill(&self, color: &str) {
            self.set_fill_style_str(color);
        }

        fn set_stroke(&self, color: &str) {
            self.set_stroke_style_str(color);
        }

        fn set_line_width(&self, width: f64) {
            Ctx::set_line_width(self, width);
        }

        fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64) {
            Ctx::fill_rect(self, x, y, w, h);
        }

        fn stroke_rect(&self, x: f64, y: f64, w: f64, h: f64) {
            Ctx::stroke_rect(self, x, y, w, h);
        }

        fn fill_circle(&self, x: f64, y: f64, radius: f64) {
            self.begin_path();
            let _ = self.arc(x, y, radius, 0.0, TAU);
            self.fill();
        }

        fn line(&self, x1: f64, y1: f64, x2: f64, y2: f64) {
            self.begin_path();
            self.move_to(x1, y1);
            self.line_to(x2, y2);
            self.stroke();
        }

        fn set_font(&self, font: &str) {
            Ctx::set_font(self, font);
        }

        fn set_text_align(&self, align: &str) {
            Ctx::set_text_align(self, align);
        }

        fn fill_text(&self, text: &str, x: f64, y: f64) {
            let _ = Ctx::fill_text(self, text, x, y);
        }
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::DrawSurface;
    use std::cell::RefCell;

    /// Test double that records the order of operations.
    #[derive(Default)]
    pub struct RecordingSurface {
        pub ops: RefCell<Vec<String>>,
    }

    impl RecordingSurface {
        fn log(&self, op: &str) {
            self.ops.borrow_mut().push(op.to_string());
        }
    }

    impl DrawSurface for RecordingSurface {
        fn reset_transform(&self) {
            self.log("reset_transform");
        }

        fn save(&self) {
            self.log("save");
        }

        fn restore(&self) {
            self.log("restore");
        }

        fn translate(&self, _dx: f64, _dy: f64) {
            self.log("translate");
        }

        fn rotate(&self, _radians: f64) {
            self.log("rotate");
        }

        fn scale(&self, _sx: f64, _sy: f64) {
            self.log("scale");
        }

        fn set_fill(&self, _color: &str) {
            self.log("set_fill");
        }

        fn set_stroke(&self, _color: &str) {
            self.log("set_stroke");
        }

        fn set_line_width(&self, _width: f64) {
            self.log("set_line_width");
        }

        fn fill_rect(&self, _x: f64, _y: f64, _w: f64, _h: f64) {
            self.log("fill_rect");
        }

        fn stroke_rect(&self, _x: f64, _y: f64, _w: f64, _h: f64) {
            self.log("stroke_rect");
        }

        fn fill_circle(&self, _x: f64, _y: f64, _radius: f64) {
            self.log("fill_circle");
        }

        fn line(&self, _x1: f64, _y1: f64, _x2: f64, _y2: f64) {
            self.log("line");
        }

        fn set_font(&self, _font: &str) {
            self.log("set_font");
        }

        fn set_text_align(&self, _align: &str) {
            self.log("set_text_align");
        }

        fn fill_text(&self, _text: &str, _x: f64, _y: f64) {
            self.log("fill_text");
        }
    }
}

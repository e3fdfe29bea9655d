//! Host seams for measuring and drawing text, plus the per-frame render pass.
//!
//! Both traits mirror the subset of `CanvasRenderingContext2d` the overlay
//! needs, so the browser context implements them directly (see `web`) and
//! tests use a recording surface.

use crate::comment::{Comment, sanitize_width};
use crate::config::OverlayConfig;
use crate::lane::LaneGeometry;

pub trait TextMeasure {
    /// Width of `text` in pixels at the active font.
    fn measure_width(&self, text: &str) -> f64;
    /// Ascent + descent of the active font.
    fn font_height(&self) -> f64;
}

/// Width with failures mapped to zero.
pub fn measured_width(measure: &dyn TextMeasure, text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    sanitize_width(measure.measure_width(text))
}

pub trait Surface {
    fn clear(&mut self);
    fn set_font(&mut self, font: &str);
    fn set_stroke_style(&mut self, style: &str);
    fn set_fill_style(&mut self, style: &str);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    fn stroke_text(&mut self, text: &str, x: f64, y: f64);
}

/// Clear, then draw every comment oldest first: fill, then outline.
pub fn render_pass(comments: &[Comment], geometry: &LaneGeometry, config: &OverlayConfig, surface: &mut dyn Surface) {
    surface.clear();
    surface.set_stroke_style(&config.stroke_style);
    surface.set_font(&config.font);
    for c in comments {
        let y = geometry.lane_to_y(c.lane);
        surface.set_fill_style(&c.color);
        surface.fill_text(&c.text, c.x, y);
        surface.stroke_text(&c.text, c.x, y);
    }
}

/// Fixed-advance measure for native tests and headless runs:
/// every `char` is `char_width` wide.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    pub char_width: f64,
    pub font_height: f64,
}

impl TextMeasure for MonospaceMeasure {
    fn measure_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }

    fn font_height(&self) -> f64 {
        self.font_height
    }
}

/// Draw call captured by `RecordingSurface`.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Font(String),
    Stroke(String),
    Fill(String),
    FillText { text: String, x: f64, y: f64 },
    StrokeText { text: String, x: f64, y: f64 },
}

/// Surface that records calls instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    /// Texts filled since the last clear, in draw order.
    pub fn filled_texts(&self) -> Vec<&str> {
        let start = self.ops.iter().rposition(|op| *op == DrawOp::Clear).map_or(0, |i| i + 1);
        self.ops[start..]
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }
    fn set_font(&mut self, font: &str) {
        self.ops.push(DrawOp::Font(font.to_string()));
    }
    fn set_stroke_style(&mut self, style: &str) {
        self.ops.push(DrawOp::Stroke(style.to_string()));
    }
    fn set_fill_style(&mut self, style: &str) {
        self.ops.push(DrawOp::Fill(style.to_string()));
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(DrawOp::FillText { text: text.to_string(), x, y });
    }
    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(DrawOp::StrokeText { text: text.to_string(), x, y });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_clears_then_draws_in_order() {
        let cfg = OverlayConfig::default();
        let geo = LaneGeometry::new(500.0, 500.0, 20.0);
        let comments = vec![
            Comment::new("first", 0, 800.0, 50.0, 2.0, "#111"),
            Comment::new("second", 1, 800.0, 60.0, 2.0, "#222"),
        ];
        let mut surface = RecordingSurface::default();
        render_pass(&comments, &geo, &cfg, &mut surface);

        assert_eq!(surface.ops[0], DrawOp::Clear);
        assert_eq!(surface.ops[1], DrawOp::Stroke(cfg.stroke_style.clone()));
        assert_eq!(surface.ops[2], DrawOp::Font(cfg.font.clone()));
        assert_eq!(
            &surface.ops[3..6],
            &[
                DrawOp::Fill("#111".into()),
                DrawOp::FillText { text: "first".into(), x: 850.0, y: 20.0 },
                DrawOp::StrokeText { text: "first".into(), x: 850.0, y: 20.0 },
            ]
        );
        assert_eq!(surface.filled_texts(), vec!["first", "second"]);
        assert_eq!(
            surface.ops[7],
            DrawOp::FillText { text: "second".into(), x: 860.0, y: 50.0 }
        );
    }

    #[test]
    fn test_empty_frame_only_clears() {
        let mut surface = RecordingSurface::default();
        render_pass(&[], &LaneGeometry::new(500.0, 500.0, 20.0), &OverlayConfig::default(), &mut surface);
        assert_eq!(surface.ops.first(), Some(&DrawOp::Clear));
        assert!(surface.filled_texts().is_empty());
    }

    #[test]
    fn test_measured_width_failures_are_zero() {
        struct Broken;
        impl TextMeasure for Broken {
            fn measure_width(&self, _text: &str) -> f64 {
                f64::NAN
            }
            fn font_height(&self) -> f64 {
                0.0
            }
        }
        assert_eq!(measured_width(&Broken, "abc"), 0.0);
        let mono = MonospaceMeasure { char_width: 10.0, font_height: 20.0 };
        assert_eq!(measured_width(&mono, ""), 0.0);
        assert_eq!(measured_width(&mono, "弾幕だ"), 30.0);
    }
}

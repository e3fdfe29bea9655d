/// One scrolling message. Only `x` changes after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
    pub lane: u32,
    pub x: f64,      // left edge, starts just past the right screen edge
    pub speed: f64,  // pixels per tick
    pub width: f64,  // measured once at the active font
    pub color: String,
}

impl Comment {
    pub fn new(text: impl Into<String>, lane: u32, screen_width: f64, width: f64, speed: f64, color: impl Into<String>) -> Self {
        let width = sanitize_width(width);
        Self {
            text: text.into(),
            lane,
            x: screen_width + width,
            speed,
            width,
            color: color.into(),
        }
    }

    /// Flat per-frame decrement.
    pub fn advance(&mut self) {
        self.x -= self.speed;
    }

    /// Decrement scaled by a frame-time factor (1.0 == one reference frame).
    pub fn advance_scaled(&mut self, frames: f64) {
        self.x -= self.speed * frames;
    }

    /// Off-screen right still counts; only the left edge retires a comment.
    pub fn is_showing(&self) -> bool {
        self.x + self.width >= 0.0
    }
}

/// Unmeasurable text renders with zero width.
pub(crate) fn sanitize_width(width: f64) -> f64 {
    if width.is_finite() && width > 0.0 { width } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_past_right_edge() {
        let c = Comment::new("hello", 0, 800.0, 120.0, 4.0, "#fff");
        assert_eq!(c.x, 920.0);
        assert!(c.is_showing());
    }

    #[test]
    fn test_motion_is_exact_per_tick() {
        let mut c = Comment::new("abc", 1, 1000.0, 30.0, 3.0, "#fff");
        let x0 = c.x;
        for k in 1..=50 {
            c.advance();
            assert_eq!(c.x, x0 - k as f64 * 3.0);
        }
    }

    #[test]
    fn test_boundary_counts_as_retired_only_past_zero() {
        let mut c = Comment::new("w", 0, 0.0, 10.0, 10.0, "#fff");
        // x = 10, width = 10
        c.advance(); // x = 0
        assert!(c.is_showing());
        c.advance(); // x = -10, x + width == 0
        assert!(c.is_showing());
        c.advance(); // x = -20
        assert!(!c.is_showing());
    }

    #[test]
    fn test_bad_width_becomes_zero() {
        assert_eq!(Comment::new("", 0, 500.0, f64::NAN, 1.0, "#fff").x, 500.0);
        assert_eq!(Comment::new("", 0, 500.0, -4.0, 1.0, "#fff").width, 0.0);
    }
}

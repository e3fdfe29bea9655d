//! The comment overlay engine: one instance per overlay surface.
//!
//! Not thread-safe. The embedder serializes `on_message_arrived` and the frame
//! calls onto one execution context (the browser's event loop in `web`).
//! Frame scheduling lives outside: call `tick` (or `advance_frame`) once per
//! display refresh, then `render`.

use tracing::{debug, trace};

use crate::comment::Comment;
use crate::config::{MotionMode, OverlayConfig};
use crate::lane::{self, LaneGeometry};
use crate::random::{RandomSource, SmallRandom};
use crate::render::{self, Surface, TextMeasure};

pub struct CommentOverlay<R: RandomSource = SmallRandom> {
    config: OverlayConfig,
    geometry: LaneGeometry,
    comments: Vec<Comment>, // live only, creation order
    rng: R,
    last_frame_ms: Option<f64>,
}

impl CommentOverlay<SmallRandom> {
    pub fn new(config: OverlayConfig, font_height: f64) -> Self {
        Self::with_rng(config, font_height, SmallRandom::from_entropy())
    }
}

impl<R: RandomSource> CommentOverlay<R> {
    pub fn with_rng(config: OverlayConfig, font_height: f64, rng: R) -> Self {
        let geometry = LaneGeometry::new(config.screen_height, config.work_area_height, font_height);
        Self {
            config,
            geometry,
            comments: Vec::new(),
            rng,
            last_frame_ms: None,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn geometry(&self) -> &LaneGeometry {
        &self.geometry
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Drops every live comment; lanes start again from 0.
    pub fn clear(&mut self) {
        self.comments.clear();
        self.last_frame_ms = None;
    }

    /// One new comment per call, no dedup. Returns the assigned lane.
    pub fn on_message_arrived(&mut self, text: &str, measure: &dyn TextMeasure) -> u32 {
        let speed = self.config.draw_speed(&mut self.rng);
        let width = render::measured_width(measure, text);
        let lane = lane::allocate(&self.comments);
        let color = self.config.draw_fill(&mut self.rng).to_string();
        let comment = Comment::new(text, lane, self.config.screen_width, width, speed, color);
        debug!(lane, speed, width, live = self.comments.len() + 1, "comment spawned");
        self.comments.push(comment);
        lane
    }

    /// Inserts a prebuilt comment as-is (replay and tests).
    pub fn push_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Moves every comment by its flat per-frame speed and retires those fully
    /// past the left edge. Returns how many retired.
    pub fn tick(&mut self) -> usize {
        self.step(1.0)
    }

    /// Time-scaled variant: `elapsed_ms` of motion at `reference_hz` frames per second.
    pub fn tick_elapsed(&mut self, elapsed_ms: f64, reference_hz: f64) -> usize {
        let frames = if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            elapsed_ms * reference_hz / 1000.0
        } else {
            0.0
        };
        self.step(frames)
    }

    /// Frame callback entry point; `now_ms` is the frame timestamp.
    pub fn advance_frame(&mut self, now_ms: f64) -> usize {
        let prev = self.last_frame_ms.replace(now_ms);
        match self.config.motion {
            MotionMode::PerFrame => self.tick(),
            MotionMode::TimeScaled { reference_hz } => match prev {
                Some(prev) => self.tick_elapsed(now_ms - prev, reference_hz),
                // First frame: no delta yet, treat as one reference frame.
                None => self.step(1.0),
            },
        }
    }

    fn step(&mut self, frames: f64) -> usize {
        let mut retired = 0;
        // Reverse so removal never skips a neighbour.
        for i in (0..self.comments.len()).rev() {
            let c = &mut self.comments[i];
            if frames == 1.0 {
                c.advance();
            } else {
                c.advance_scaled(frames);
            }
            if !c.is_showing() {
                let gone = self.comments.remove(i);
                trace!(lane = gone.lane, "comment retired");
                retired += 1;
            }
        }
        retired
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        render::render_pass(&self.comments, &self.geometry, &self.config, surface);
    }
}

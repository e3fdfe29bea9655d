//! Lane allocation and lane → vertical offset mapping.
//!
//! Lanes are unbounded integers; screen rows are not. Once a lane number passes
//! the number of rows that fit, its Y position wraps around and may coincide
//! with a lower lane. New comments always take the lowest free lane, so the
//! wraparound only shows up when the overlay is crowded.

use crate::comment::Comment;

/// Lowest lane not held by any live comment. Never fails.
pub fn allocate(live: &[Comment]) -> u32 {
    let mut lane: u32 = 0;
    loop {
        if !live.iter().any(|c| c.lane == lane) {
            return lane;
        }
        lane += 1;
    }
}

/// Screen metrics needed to place a lane vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneGeometry {
    pub screen_height: f64,
    pub work_area_height: f64,
    pub font_height: f64,
}

impl LaneGeometry {
    pub fn new(screen_height: f64, work_area_height: f64, font_height: f64) -> Self {
        let font_height = if font_height.is_finite() && font_height > 0.0 { font_height } else { 0.0 };
        Self { screen_height, work_area_height, font_height }
    }

    /// Reserved area above the usable band (e.g. a top taskbar).
    pub fn work_area_top(&self) -> f64 {
        self.screen_height - self.work_area_height
    }

    pub fn row_pitch(&self) -> f64 {
        self.font_height * 1.5
    }

    /// Height the lanes cycle through; never below one pixel.
    pub fn band(&self) -> f64 {
        let band = self.screen_height - self.font_height * 2.0;
        if band.is_finite() && band >= 1.0 { band } else { 1.0 }
    }

    /// Rows that fit in the band before positions wrap. Wrapped lanes land
    /// between earlier rows; two lanes share a Y exactly only when
    /// `pitch * (a - b)` is a multiple of the band.
    pub fn rows(&self) -> u32 {
        let pitch = self.row_pitch();
        if pitch <= 0.0 {
            return 1;
        }
        (self.band() / pitch).ceil().max(1.0) as u32
    }

    pub fn lane_to_y(&self, lane: u32) -> f64 {
        lane_to_y(lane, self.screen_height, self.work_area_height, self.font_height)
    }
}

/// Baseline Y for `lane`:
/// `(1.5·fh·lane) mod max(screen − 2·fh, 1) + (screen − workArea) + fh`.
pub fn lane_to_y(lane: u32, screen_height: f64, work_area_height: f64, font_height: f64) -> f64 {
    let geo = LaneGeometry::new(screen_height, work_area_height, font_height);
    (geo.row_pitch() * lane as f64) % geo.band() + geo.work_area_top() + geo.font_height
}

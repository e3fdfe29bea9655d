//! Danmaku overlay core crate.
//!
//! Messages posted to a room scroll right-to-left across a transparent,
//! full-screen canvas. Each new comment takes the lowest lane no live comment
//! holds, moves a fixed number of pixels per frame and is dropped once it has
//! fully left the left edge.
//!
//! The engine (`CommentOverlay`) is host-independent and driven explicitly:
//! the embedder calls `on_message_arrived` for each feed message and `tick` +
//! `render` once per display refresh. `start_overlay()` wires it to a browser
//! canvas and `requestAnimationFrame`.

use wasm_bindgen::prelude::*;

pub mod comment;
pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod lane;
pub mod logging;
pub mod random;
pub mod render;
mod web;

pub use comment::Comment;
pub use config::{MotionMode, OverlayConfig};
pub use engine::CommentOverlay;
pub use error::{ConfigError, LaunchError, OverlayError};
pub use feed::{FeedChange, LaunchParams};
pub use lane::{LaneGeometry, allocate, lane_to_y};
pub use random::{RandomSource, SequenceSource, SmallRandom};
pub use render::{Surface, TextMeasure};
pub use web::{OverlayHandle, start_overlay};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

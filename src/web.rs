//! Browser boundary: canvas binding, `requestAnimationFrame` loop and the
//! handle JS uses to forward feed events.
//!
//! Each `OverlayHandle` owns its own engine and canvas. One handle per overlay
//! window (one window per display); nothing is shared between them.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

use crate::config::OverlayConfig;
use crate::engine::CommentOverlay;
use crate::error::OverlayError;
use crate::feed::{self, LaunchParams};
use crate::logging;
use crate::render::{Surface, TextMeasure};

/// Sample used to derive the font's line height.
const FONT_PROBE: &str = "ABC";

/// `CanvasRenderingContext2d` seen through the engine's traits.
struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl TextMeasure for CanvasSurface<'_> {
    fn measure_width(&self, text: &str) -> f64 {
        self.ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
    }

    fn font_height(&self) -> f64 {
        self.ctx
            .measure_text(FONT_PROBE)
            .map(|m| m.actual_bounding_box_ascent() + m.actual_bounding_box_descent())
            .unwrap_or(0.0)
    }
}

impl Surface for CanvasSurface<'_> {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }
    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }
    fn set_stroke_style(&mut self, style: &str) {
        self.ctx.set_stroke_style_str(style);
    }
    fn set_fill_style(&mut self, style: &str) {
        self.ctx.set_fill_style_str(style);
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.ctx.fill_text(text, x, y).ok();
    }
    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        self.ctx.stroke_text(text, x, y).ok();
    }
}

struct OverlayState {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    overlay: CommentOverlay,
    room_id: String,
    frame_id: Option<i32>,
    running: bool,
}

impl OverlayState {
    fn surface(&self) -> CanvasSurface<'_> {
        CanvasSurface {
            ctx: &self.ctx,
            width: self.canvas.width() as f64,
            height: self.canvas.height() as f64,
        }
    }

    /// Stopped overlays drop arrivals; nothing would retire them.
    fn arrive(&mut self, text: &str) -> bool {
        if !self.running {
            return false;
        }
        let surface = CanvasSurface {
            ctx: &self.ctx,
            width: self.canvas.width() as f64,
            height: self.canvas.height() as f64,
        };
        self.overlay.on_message_arrived(text, &surface);
        true
    }

    fn frame(&mut self, now: f64) {
        self.overlay.advance_frame(now);
        let mut surface = self.surface();
        self.overlay.render(&mut surface);
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Handle returned to JS; forward feed events here.
#[wasm_bindgen]
pub struct OverlayHandle {
    state: Rc<RefCell<OverlayState>>,
    callback: FrameCallback,
}

#[wasm_bindgen]
impl OverlayHandle {
    /// Feed adapter entry point: one comment per call.
    pub fn on_message_arrived(&self, text: &str) {
        self.state.borrow_mut().arrive(text);
    }

    /// Apply a JSON batch of document changes; returns how many comments spawned.
    pub fn apply_changes(&self, payload: &str) -> Result<usize, JsValue> {
        let texts = feed::arrivals_from_json(payload).map_err(OverlayError::from)?;
        let mut state = self.state.borrow_mut();
        let mut spawned = 0;
        for text in &texts {
            if state.arrive(text) {
                spawned += 1;
            }
        }
        Ok(spawned)
    }

    pub fn live_count(&self) -> usize {
        self.state.borrow().overlay.len()
    }

    pub fn room_id(&self) -> String {
        self.state.borrow().room_id.clone()
    }

    /// Stop scheduling frames and drop every live comment.
    pub fn stop(&self) {
        let mut state = self.state.borrow_mut();
        if !state.running {
            return;
        }
        state.running = false;
        if let (Some(id), Some(w)) = (state.frame_id.take(), window()) {
            let _ = w.cancel_animation_frame(id);
        }
        state.overlay.clear();
        let mut surface = state.surface();
        surface.clear();
        drop(state);
        // Breaks the closure's self-reference so it can be freed.
        self.callback.borrow_mut().take();
        info!("overlay stopped");
    }
}

/// Bind to `<canvas id=canvas_id>`, read launch params from the page URL and
/// start animating. `config_json` overrides the defaults.
#[wasm_bindgen]
pub fn start_overlay(canvas_id: &str, config_json: Option<String>) -> Result<OverlayHandle, JsValue> {
    let win = window().ok_or_else(|| browser_err("no window"))?;
    let doc = win.document().ok_or_else(|| browser_err("no document"))?;

    let mut config = match config_json.as_deref() {
        Some(src) => OverlayConfig::from_json(src).map_err(OverlayError::from)?,
        None => OverlayConfig::default(),
    };
    logging::init(&config.log_level);

    let search = win.location().search().unwrap_or_default();
    let room_id = if search.trim_start_matches('?').is_empty() {
        String::new()
    } else {
        let params = LaunchParams::from_query(&search).map_err(OverlayError::from)?;
        params.apply(&mut config);
        params.room_id
    };
    if let Err(e) = config.validate() {
        warn!(error = %e, "overlay config rejected");
        return Err(OverlayError::from(e).into());
    }

    let canvas: HtmlCanvasElement = doc
        .get_element_by_id(canvas_id)
        .ok_or_else(|| browser_err("overlay canvas not found"))?
        .dyn_into()?;
    if let Some(root) = doc.document_element() {
        canvas.set_width(root.client_width().max(0) as u32);
        canvas.set_height(root.client_height().max(0) as u32);
    }
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| browser_err("2d context unavailable"))?
        .dyn_into()?;
    ctx.set_font(&config.font);

    let font_height = CanvasSurface { ctx: &ctx, width: 0.0, height: 0.0 }.font_height();
    info!(room = %room_id, font_height, width = config.screen_width, height = config.screen_height, "overlay starting");

    let state = Rc::new(RefCell::new(OverlayState {
        canvas,
        ctx,
        overlay: CommentOverlay::new(config, font_height),
        room_id,
        frame_id: None,
        running: true,
    }));
    let callback = start_frame_loop(state.clone());
    Ok(OverlayHandle { state, callback })
}

fn start_frame_loop(state: Rc<RefCell<OverlayState>>) -> FrameCallback {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    let loop_state = state.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let mut st = loop_state.borrow_mut();
        if !st.running {
            return;
        }
        st.frame(ts);
        st.frame_id = request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    state.borrow_mut().frame_id = request_frame(&g);
    g
}

fn request_frame(cb: &FrameCallback) -> Option<i32> {
    let w = window()?;
    let cb = cb.borrow();
    let closure = cb.as_ref()?;
    w.request_animation_frame(closure.as_ref().unchecked_ref()).ok()
}

fn browser_err(msg: &str) -> JsValue {
    OverlayError::Browser(msg.to_string()).into()
}

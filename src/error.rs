use thiserror::Error;
use wasm_bindgen::JsValue;

/// Rejected overlay configuration. Raised at load time so the engine's
/// vertical mapping never sees a non-positive divisor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("base speed must be a positive finite number, got {0}")]
    BaseSpeed(f64),

    #[error("speed jitter must be within 0..=100 percent, got {0}")]
    Jitter(f64),

    #[error("fill palette is empty")]
    EmptyPalette,

    #[error("fill palette entry {0} is blank")]
    BlankPaletteEntry(usize),

    #[error("font descriptor is empty")]
    EmptyFont,

    #[error("{field} must be positive, got {value}")]
    ScreenDimension { field: &'static str, value: f64 },

    #[error("work area height {work_area} must be within 0..={screen}")]
    WorkArea { work_area: f64, screen: f64 },

    #[error("time-scaled motion needs a positive reference rate, got {0}")]
    ReferenceHz(f64),

    #[error("config parse error: {0}")]
    Parse(String),
}

/// Problems with the query string a launcher hands to each overlay window.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LaunchError {
    #[error("missing launch parameter `{0}`")]
    Missing(&'static str),

    #[error("launch parameter `{name}` is not a number: {value:?}")]
    NotNumeric { name: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error("feed payload error: {0}")]
    Feed(#[from] serde_json::Error),

    #[error("browser error: {0}")]
    Browser(String),
}

impl From<OverlayError> for JsValue {
    fn from(err: OverlayError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

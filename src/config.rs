//! Overlay configuration: speeds, palette, font and screen metrics.
//!
//! Loaded once at startup (JSON, camelCase keys) and validated before any
//! comment is created. Every field has a default so a partial document works.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::random::RandomSource;

/// How `speed` is applied per animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum MotionMode {
    /// Flat `x -= speed` per frame; visual speed follows the display refresh rate.
    #[default]
    PerFrame,
    /// `speed` is pixels per reference frame, scaled by measured frame delta.
    #[serde(rename_all = "camelCase")]
    TimeScaled { reference_hz: f64 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Pixels per tick.
    #[serde(default = "default_base_speed")]
    pub base_speed: f64,
    /// Symmetric jitter band around `base_speed`, 0..=100.
    #[serde(default = "default_jitter")]
    pub speed_jitter_percent: f64,
    /// CSS font shorthand used for measuring and drawing.
    #[serde(default = "default_font")]
    pub font: String,
    #[serde(default = "default_stroke")]
    pub stroke_style: String,
    #[serde(default = "default_palette")]
    pub fill_palette: Vec<String>,
    #[serde(default = "default_screen_width")]
    pub screen_width: f64,
    #[serde(default = "default_screen_height")]
    pub screen_height: f64,
    #[serde(default = "default_screen_height")]
    pub work_area_height: f64,
    #[serde(default)]
    pub motion: MotionMode,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            base_speed: default_base_speed(),
            speed_jitter_percent: default_jitter(),
            font: default_font(),
            stroke_style: default_stroke(),
            fill_palette: default_palette(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            work_area_height: default_screen_height(),
            motion: MotionMode::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_base_speed() -> f64 {
    4.0
}

fn default_jitter() -> f64 {
    20.0
}

fn default_font() -> String {
    "bold 48px 'Noto Sans JP', sans-serif".to_string()
}

fn default_stroke() -> String {
    "#000000".to_string()
}

fn default_palette() -> Vec<String> {
    vec![
        "#ffffff".into(),
        "#ffe14d".into(),
        "#7fe3ff".into(),
        "#ff9bd2".into(),
        "#a6ff8f".into(),
    ]
}

fn default_screen_width() -> f64 {
    1920.0
}

fn default_screen_height() -> f64 {
    1080.0
}

fn default_log_level() -> String {
    "info".to_string()
}

impl OverlayConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(src: &str) -> Result<Self, ConfigError> {
        let cfg: OverlayConfig =
            serde_json::from_str(src).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_speed.is_finite() || self.base_speed <= 0.0 {
            return Err(ConfigError::BaseSpeed(self.base_speed));
        }
        if !(0.0..=100.0).contains(&self.speed_jitter_percent) {
            return Err(ConfigError::Jitter(self.speed_jitter_percent));
        }
        if self.fill_palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if let Some(idx) = self.fill_palette.iter().position(|c| c.trim().is_empty()) {
            return Err(ConfigError::BlankPaletteEntry(idx));
        }
        if self.font.trim().is_empty() {
            return Err(ConfigError::EmptyFont);
        }
        for (field, value) in [
            ("screenWidth", self.screen_width),
            ("screenHeight", self.screen_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::ScreenDimension { field, value });
            }
        }
        if !(0.0..=self.screen_height).contains(&self.work_area_height) {
            return Err(ConfigError::WorkArea {
                work_area: self.work_area_height,
                screen: self.screen_height,
            });
        }
        if let MotionMode::TimeScaled { reference_hz } = self.motion {
            if !reference_hz.is_finite() || reference_hz <= 0.0 {
                return Err(ConfigError::ReferenceHz(reference_hz));
            }
        }
        Ok(())
    }

    /// `base ± jitter%`, uniform over the band.
    pub fn draw_speed(&self, rng: &mut impl RandomSource) -> f64 {
        let j = self.speed_jitter_percent;
        let rate = rng.next_unit() * j * 2.0 - j;
        self.base_speed + self.base_speed * rate / 100.0
    }

    pub fn draw_fill(&self, rng: &mut impl RandomSource) -> &str {
        let len = self.fill_palette.len();
        if len == 0 {
            return "#ffffff";
        }
        let idx = ((rng.next_unit() * len as f64).floor() as usize).min(len - 1);
        &self.fill_palette[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{SequenceSource, SmallRandom};

    #[test]
    fn test_defaults_validate() {
        assert!(OverlayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let cfg = OverlayConfig::from_json(r#"{ "baseSpeed": 6, "fillPalette": ["red"] }"#)
            .expect("valid config");
        assert_eq!(cfg.base_speed, 6.0);
        assert_eq!(cfg.fill_palette, vec!["red".to_string()]);
        assert_eq!(cfg.speed_jitter_percent, 20.0);
        assert_eq!(cfg.motion, MotionMode::PerFrame);
    }

    #[test]
    fn test_time_scaled_motion_parses() {
        let cfg = OverlayConfig::from_json(
            r#"{ "motion": { "mode": "timeScaled", "referenceHz": 60 } }"#,
        )
        .expect("valid config");
        assert_eq!(cfg.motion, MotionMode::TimeScaled { reference_hz: 60.0 });
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases: [(&str, ConfigError); 5] = [
            (r#"{ "baseSpeed": 0 }"#, ConfigError::BaseSpeed(0.0)),
            (r#"{ "speedJitterPercent": 120 }"#, ConfigError::Jitter(120.0)),
            (r#"{ "fillPalette": [] }"#, ConfigError::EmptyPalette),
            (r##"{ "fillPalette": ["#fff", " "] }"##, ConfigError::BlankPaletteEntry(1)),
            (r#"{ "font": "" }"#, ConfigError::EmptyFont),
        ];
        for (src, expected) in cases {
            assert_eq!(OverlayConfig::from_json(src), Err(expected), "{src}");
        }
    }

    #[test]
    fn test_rejects_bad_screen_metrics() {
        let err = OverlayConfig::from_json(r#"{ "screenHeight": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ScreenDimension { field: "screenHeight", .. }));
        let err =
            OverlayConfig::from_json(r#"{ "screenHeight": 500, "workAreaHeight": 600 }"#)
                .unwrap_err();
        assert!(matches!(err, ConfigError::WorkArea { .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            OverlayConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_speed_band_edges() {
        let cfg = OverlayConfig {
            base_speed: 100.0,
            speed_jitter_percent: 20.0,
            ..OverlayConfig::default()
        };
        let mut rng = SequenceSource::new(vec![0.0, 0.5]);
        assert!((cfg.draw_speed(&mut rng) - 80.0).abs() < 1e-9);
        assert!((cfg.draw_speed(&mut rng) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_jitter_bounds_and_symmetry() {
        let cfg = OverlayConfig {
            base_speed: 100.0,
            speed_jitter_percent: 20.0,
            ..OverlayConfig::default()
        };
        let mut rng = SmallRandom::seeded(1234);
        let (mut below, mut above) = (0usize, 0usize);
        for _ in 0..10_000 {
            let s = cfg.draw_speed(&mut rng);
            assert!((80.0..=120.0).contains(&s), "speed {s} out of band");
            if s < 100.0 {
                below += 1;
            } else {
                above += 1;
            }
        }
        // Symmetric band: neither side should dominate.
        assert!(below > 4_500 && above > 4_500, "below={below} above={above}");
    }

    #[test]
    fn test_zero_jitter_is_exact() {
        let cfg = OverlayConfig {
            speed_jitter_percent: 0.0,
            ..OverlayConfig::default()
        };
        let mut rng = SmallRandom::seeded(9);
        assert_eq!(cfg.draw_speed(&mut rng), cfg.base_speed);
    }

    #[test]
    fn test_fill_pick_covers_palette() {
        let cfg = OverlayConfig {
            fill_palette: vec!["a".into(), "b".into(), "c".into()],
            ..OverlayConfig::default()
        };
        let mut rng = SequenceSource::new(vec![0.0, 0.34, 0.99]);
        assert_eq!(cfg.draw_fill(&mut rng), "a");
        assert_eq!(cfg.draw_fill(&mut rng), "b");
        assert_eq!(cfg.draw_fill(&mut rng), "c");
    }
}

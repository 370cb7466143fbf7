use crate::core::errors::{ConfigError, ConfigResult};
use std::env;

/// Detection filter configuration
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Detections below this confidence are dropped.
    pub confidence_threshold: f32,
    /// Capture areas under this many pixels on either side abort the scan.
    pub min_capture_extent: u32,
}

/// Color sampling configuration
#[derive(Debug, Clone)]
pub struct ColorConfig {
    /// Pixels with luma below this are "ink".
    pub luma_threshold: u8,
    /// Central sampling window fraction, per axis.
    pub window_lo: f32,
    pub window_hi: f32,
}

/// Overlay rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub default_font_size: u32,
    /// Gaussian blur sigma for the crop duplicate that obscures the
    /// original on-screen text.
    pub blur_sigma: f32,
}

/// Translation configuration (source → target fixed for the session)
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    pub source_lang: String,
    pub target_lang: String,
}

/// Main configuration for the overlay core
#[derive(Debug, Clone)]
pub struct Config {
    pub detection: DetectionConfig,
    pub color: ColorConfig,
    pub render: RenderConfig,
    pub translation: TranslationConfig,
}

impl Config {
    pub fn new() -> ConfigResult<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let config = Self::load_from_env();
        config.validate()?;
        Ok(config)
    }

    fn load_from_env() -> Self {
        Self {
            detection: DetectionConfig {
                confidence_threshold: env::var("CONFIDENCE_THRESHOLD")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0.5),
                min_capture_extent: env::var("MIN_CAPTURE_EXTENT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            },
            color: ColorConfig {
                luma_threshold: env::var("LUMA_THRESHOLD")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(128),
                window_lo: env::var("SAMPLING_WINDOW_LO")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0.4),
                window_hi: env::var("SAMPLING_WINDOW_HI")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0.6),
            },
            render: RenderConfig {
                default_font_size: env::var("DEFAULT_FONT_SIZE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(12),
                blur_sigma: env::var("BLUR_SIGMA")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5.0),
            },
            translation: TranslationConfig {
                source_lang: env::var("SOURCE_LANG").unwrap_or_else(|_| "en".to_string()),
                target_lang: env::var("TARGET_LANG").unwrap_or_else(|_| "pt".to_string()),
            },
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.detection.confidence_threshold) {
            return Err(ConfigError::InvalidConfidenceThreshold(
                self.detection.confidence_threshold,
            ));
        }

        if self.detection.min_capture_extent == 0 {
            return Err(ConfigError::InvalidMinCaptureExtent(
                self.detection.min_capture_extent,
            ));
        }

        let (lo, hi) = (self.color.window_lo, self.color.window_hi);
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo >= hi {
            return Err(ConfigError::InvalidSamplingWindow { lo, hi });
        }

        if self.render.default_font_size == 0 {
            return Err(ConfigError::InvalidFontSize(
                self.render.default_font_size as i64,
            ));
        }

        if self.render.blur_sigma <= 0.0 {
            return Err(ConfigError::InvalidBlurSigma(self.render.blur_sigma));
        }

        if self.translation.source_lang.trim().is_empty()
            || self.translation.target_lang.trim().is_empty()
        {
            return Err(ConfigError::EmptyLanguageTag);
        }

        Ok(())
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.detection.confidence_threshold
    }

    pub fn min_capture_extent(&self) -> u32 {
        self.detection.min_capture_extent
    }

    pub fn luma_threshold(&self) -> u8 {
        self.color.luma_threshold
    }

    pub fn sampling_window(&self) -> (f32, f32) {
        (self.color.window_lo, self.color.window_hi)
    }

    pub fn default_font_size(&self) -> u32 {
        self.render.default_font_size
    }

    pub fn blur_sigma(&self) -> f32 {
        self.render.blur_sigma
    }
}

impl Default for Config {
    /// Built-in defaults without touching the environment. Guaranteed valid.
    fn default() -> Self {
        Self {
            detection: DetectionConfig {
                confidence_threshold: 0.5,
                min_capture_extent: 10,
            },
            color: ColorConfig {
                luma_threshold: 128,
                window_lo: 0.4,
                window_hi: 0.6,
            },
            render: RenderConfig {
                default_font_size: 12,
                blur_sigma: 5.0,
            },
            translation: TranslationConfig {
                source_lang: "en".to_string(),
                target_lang: "pt".to_string(),
            },
        }
    }
}

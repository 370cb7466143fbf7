// Error types for the overlay pipeline
//
// thiserror enums per concern, anyhow at the capability seams. A failed
// translation of one item is deliberately NOT an error here: the batcher
// falls back to the source text and logs instead.

use thiserror::Error;

/// Scan pipeline errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Capture area below the minimum valid extent. Surfaced as a no-op
    /// failure, never fatal; the prior overlay stays up.
    #[error("degenerate capture area: {width}x{height} (minimum {min_extent}px per side)")]
    DegenerateCapture {
        width: u32,
        height: u32,
        min_extent: u32,
    },

    #[error("screen capture failed: {0}")]
    CaptureFailed(#[source] anyhow::Error),

    #[error("text detection failed: {0}")]
    DetectionFailed(#[source] anyhow::Error),
}

/// Translation seam errors
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation backend failed for {chars}-char text: {source}")]
    BackendFailed {
        chars: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("translation backend returned an empty result")]
    EmptyResult,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("confidence threshold must be in [0.0, 1.0], got {0}")]
    InvalidConfidenceThreshold(f32),

    #[error("sampling window must satisfy 0.0 <= lo < hi <= 1.0, got [{lo}, {hi}]")]
    InvalidSamplingWindow { lo: f32, hi: f32 },

    #[error("minimum capture extent must be >= 1, got {0}")]
    InvalidMinCaptureExtent(u32),

    #[error("default font size must be a positive integer, got {0}")]
    InvalidFontSize(i64),

    #[error("blur sigma must be > 0, got {0}")]
    InvalidBlurSigma(f32),

    #[error("language tag must be non-empty")]
    EmptyLanguageTag,
}

// Convenience aliases
pub type ScanResult<T> = Result<T, ScanError>;
pub type TranslationResult<T> = Result<T, TranslationError>;
pub type ConfigResult<T> = Result<T, ConfigError>;

// Core pipeline for a screen-capture translation overlay
//
// Detects text regions in a captured frame, estimates each region's native
// text color, batch-translates the detected text, and keeps one mutable
// region store in sync with two consumers: the on-screen overlay and the
// editable text list. Screen capture, detection, translation, and drawing
// primitives are capabilities the host application implements.

pub mod capabilities;
pub mod core;
pub mod orchestration;
pub mod services;
pub mod utils;

// Re-export commonly used types and functions
pub use crate::core::{
    config::Config,
    errors::{ConfigError, ScanError, TranslationError},
    types::{Action, BBox, RawDetection, Region, RenderHandle, Rgb, ScanStatus, UiEvent},
};

pub use capabilities::{
    parse_detections, OverlayRenderer, ScreenCapture, StatusIndicator, TextDetector, TextListView,
    Translator,
};

pub use orchestration::{RegionPipeline, Session};

pub use services::{ColorSampler, RegionStore, RenderSync, TranslationBatcher};

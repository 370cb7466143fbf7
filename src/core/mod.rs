pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items for convenience
pub use config::Config;
pub use errors::{ConfigError, ScanError, TranslationError};
pub use types::{
    Action, BBox, RawDetection, Region, RenderHandle, Rgb, ScanStatus, UiEvent,
};

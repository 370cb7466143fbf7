// Capability traits for the excluded collaborators
//
// The core never talks to the OS or a GUI toolkit directly: screen capture,
// text detection, translation, drawing primitives, and the text-list widget
// all sit behind these seams. Capture/detect/translate cross the worker
// thread boundary and are Send + Sync; the renderer, text list, and status
// indicator are UI-thread-only.

use crate::core::types::{BBox, RawDetection, RenderHandle, Rgb, ScanStatus};
use anyhow::Result;
use image::DynamicImage;
use tracing::warn;

/// Full-screen or sub-area screen grab.
///
/// Callers validate that `area` has each dimension >= the configured
/// minimum extent before calling.
pub trait ScreenCapture: Send + Sync {
    fn capture(&self, area: Option<BBox>) -> Result<DynamicImage>;
}

/// External text detector. One blocking call per scan.
pub trait TextDetector: Send + Sync {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<RawDetection>>;
}

/// External translator, source → target fixed for the session. May fail per
/// call; the batcher handles fallback.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str) -> Result<String>;
}

/// Low-level overlay drawing primitives, backed by the host toolkit.
///
/// Handles are opaque and single-use: once passed to `remove` they are dead.
pub trait OverlayRenderer {
    fn draw_image(&mut self, x: i32, y: i32, image: &DynamicImage) -> RenderHandle;

    /// Draw text anchored at (x, y), wrapped to `wrap_width` pixels.
    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        color: Rgb,
        font_size: u32,
        wrap_width: u32,
    ) -> RenderHandle;

    fn remove(&mut self, handle: RenderHandle);
}

/// The editable text-list view: two ordered blocks, detected originals and
/// current translations. Replaced wholesale on every sync.
pub trait TextListView {
    fn replace(&mut self, detected: &str, translated: &str);
}

/// Scan status indicator (the original app's screen border color).
pub trait StatusIndicator {
    fn set_status(&mut self, status: ScanStatus);
}

/// Parse a JSON array of detections, skipping malformed entries.
///
/// Detector adapters that bridge out-of-process engines deliver results as
/// JSON. A malformed entry (missing text, bad polygon shape) drops that
/// single detection and keeps the rest, mirroring how variant tuple shapes
/// are tolerated at this boundary.
pub fn parse_detections(payload: &str) -> Result<Vec<RawDetection>> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(payload)?;
    let mut detections = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<RawDetection>(entry) {
            Ok(det) => detections.push(det),
            Err(e) => warn!("Skipping malformed detection at index {}: {}", index, e),
        }
    }
    Ok(detections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_detections_with_and_without_confidence() {
        let payload = r#"[
            {"polygon": [[0,0],[10,0],[10,5],[0,5]], "text": "Hello", "confidence": 0.9},
            {"polygon": [[1,1],[8,1],[8,4],[1,4]], "text": "World"}
        ]"#;

        let detections = parse_detections(payload).unwrap();
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].text, "Hello");
        assert_eq!(detections[0].confidence, Some(0.9));
        assert_eq!(detections[1].confidence, None);
    }

    #[test]
    fn skips_malformed_entries_without_aborting() {
        let payload = r#"[
            {"polygon": [[0,0],[10,0],[10,5],[0,5]], "text": "kept", "confidence": 0.8},
            {"polygon": "not-a-polygon", "text": "dropped"},
            {"text": "no polygon"},
            {"polygon": [[2,2],[20,2],[20,9],[2,9]], "text": "also kept"}
        ]"#;

        let detections = parse_detections(payload).unwrap();
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].text, "kept");
        assert_eq!(detections[1].text, "also kept");
    }

    #[test]
    fn non_array_payload_is_an_error() {
        assert!(parse_detections(r#"{"not": "an array"}"#).is_err());
    }
}

// Core types for the capture → detect → translate → overlay workflow

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Axis-aligned rectangle in pixel coordinates.
///
/// Used both for capture areas (absolute screen space) and for region
/// bounding boxes. `width`/`height` are always >= 1 for boxes produced by
/// `from_polygon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Axis-aligned bounding box of a detector polygon.
    ///
    /// Lossy but deterministic: arbitrary quads collapse to
    /// (min x, min y)..(max x, max y). Returns `None` for empty polygons or
    /// polygons with zero extent on either axis, which cannot back a region.
    pub fn from_polygon(points: &[(i32, i32)]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (mut min_x, mut min_y) = *first;
        let (mut max_x, mut max_y) = *first;
        for &(x, y) in rest {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        let width = (max_x - min_x) as u32;
        let height = (max_y - min_y) as u32;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self::new(min_x, min_y, width, height))
    }

    /// Translate into absolute screen space by the capture origin.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// RGB color used for overlay text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase hex encoding, e.g. `#1a2b3c`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Perceptual brightness in [0, 255]: sqrt(0.299 R² + 0.587 G² + 0.114 B²).
    pub fn brightness(self) -> f32 {
        let (r, g, b) = (self.r as f32, self.g as f32, self.b as f32);
        (0.299 * r * r + 0.587 * g * g + 0.114 * b * b).sqrt()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// One raw detection as produced by the detector capability.
///
/// `confidence` is optional: detector variants that omit it are trusted at
/// 1.0 downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDetection {
    pub polygon: Vec<(i32, i32)>,
    pub text: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// Opaque reference to an on-screen visual element.
///
/// Issued by the overlay renderer, owned by RenderSync, and only ever used
/// to remove or replace the element it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u64);

/// One detected text block with its geometry, texts, colors, and visuals.
#[derive(Clone)]
pub struct Region {
    /// Bounding box in absolute screen coordinates.
    pub bbox: BBox,
    /// Detected text, non-empty and trimmed.
    pub original_text: String,
    /// Current translation; mutable via store edits.
    pub translation: String,
    pub text_color: Rgb,
    pub outline_color: Rgb,
    /// Pre-blur crop of the captured frame at the local bbox.
    pub crop_image: Arc<DynamicImage>,
    /// On-screen elements currently drawn for this region. Owned by
    /// RenderSync; empty until the first sync.
    pub render_handles: Vec<RenderHandle>,
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("bbox", &self.bbox)
            .field("original_text", &self.original_text)
            .field("translation", &self.translation)
            .field("text_color", &self.text_color)
            .field("outline_color", &self.outline_color)
            .field(
                "crop_image",
                &format_args!("{}x{}", self.crop_image.width(), self.crop_image.height()),
            )
            .field("render_handles", &self.render_handles)
            .finish()
    }
}

/// Visual state of the scan indicator (the original app's border color).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Idle,
    Selecting,
    Scanning,
}

/// Message from the scan worker thread to the UI thread.
///
/// The UI thread owns all renderer mutation; the worker only produces data.
#[derive(Debug)]
pub enum UiEvent {
    /// A scan pass finished with these regions (possibly none).
    ScanCompleted(Vec<Region>),
    /// The scan aborted; the prior overlay is left untouched.
    ScanFailed(String),
    /// Always sent last, on every worker exit path. Restores the idle
    /// indicator.
    ScanFinished,
}

/// User-facing commands, dispatched to the session from the host event loop.
#[derive(Debug, Clone)]
pub enum Action {
    /// Full-screen scan pass.
    Scan,
    /// Enter area-selection mode.
    BeginAreaSelection,
    /// Mouse-drag update of the pending selection rectangle.
    UpdateSelection(BBox),
    /// Confirm the pending selection; with no rectangle this abandons the
    /// capture without scanning.
    ConfirmSelection,
    /// Tear down all visuals and empty the store.
    ClearOverlay,
    ToggleHud,
    /// Bulk retranslation from edited source lines, matched to regions by
    /// position.
    ApplyEdits { originals: Vec<String> },
    /// Redraw the overlay from stored crops and colors; no re-detection.
    ReapplyOverlay,
    /// Raw font-size input from the UI; invalid input is rejected and the
    /// prior size kept.
    SetFontSize(String),
}

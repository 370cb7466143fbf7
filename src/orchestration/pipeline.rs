// RegionPipeline: one full scan pass
//
// capture (done by the caller) → detect → filter → normalize geometry →
// crop → color-sample → batch-translate → zip into Regions. The output
// sequence preserves detection order; the session installs it into the
// store and triggers render sync.

use crate::capabilities::{TextDetector, Translator};
use crate::core::config::Config;
use crate::core::errors::{ScanError, ScanResult};
use crate::core::types::{BBox, Region, Rgb};
use crate::services::color::ColorSampler;
use crate::services::translation::TranslationBatcher;
use crate::utils::image_ops::crop_region;
use image::DynamicImage;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace};

pub struct RegionPipeline {
    config: Arc<Config>,
    detector: Arc<dyn TextDetector>,
    sampler: ColorSampler,
    batcher: TranslationBatcher,
}

impl RegionPipeline {
    pub fn new(
        config: Arc<Config>,
        detector: Arc<dyn TextDetector>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        let sampler = ColorSampler::new(&config.color);
        let batcher = TranslationBatcher::new(translator, &config.translation);
        Self {
            config,
            detector,
            sampler,
            batcher,
        }
    }

    /// Run one scan pass over an already-captured image.
    ///
    /// `origin_offset` is the capture area's screen position: (0, 0) for a
    /// full-screen grab, the selection origin for a sub-area grab. Region
    /// bboxes come out in absolute screen space; crops are taken in local
    /// image space.
    ///
    /// Zero surviving detections is a valid "nothing found" outcome and
    /// yields an empty sequence, not an error.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn scan(
        &self,
        image: &DynamicImage,
        origin_offset: (i32, i32),
    ) -> ScanResult<Vec<Region>> {
        let min_extent = self.config.min_capture_extent();
        if image.width() < min_extent || image.height() < min_extent {
            return Err(ScanError::DegenerateCapture {
                width: image.width(),
                height: image.height(),
                min_extent,
            });
        }

        let detections = self
            .detector
            .detect(image)
            .map_err(ScanError::DetectionFailed)?;
        debug!("Detector returned {} candidates", detections.len());

        // Filter and normalize. Survivors keep their detection order; that
        // order is the positional contract with the translation batch below.
        let threshold = self.config.confidence_threshold();
        let mut survivors = Vec::new();
        for det in detections {
            // Detector variants that omit confidence are trusted fully.
            let confidence = det.confidence.unwrap_or(1.0);
            if confidence < threshold {
                trace!("Dropping detection below confidence threshold: {confidence:.2}");
                continue;
            }
            let text = det.text.trim();
            if text.is_empty() {
                continue;
            }
            let Some(local_bbox) = BBox::from_polygon(&det.polygon) else {
                trace!("Dropping detection with degenerate polygon");
                continue;
            };

            let crop = crop_region(image, &local_bbox);
            let (text_color, outline_color) = self.sampler.sample_color(&crop);

            survivors.push(Survivor {
                local_bbox,
                text: text.to_string(),
                crop,
                text_color,
                outline_color,
            });
        }

        let texts: Vec<&str> = survivors.iter().map(|s| s.text.as_str()).collect();
        let translations = self.batcher.translate_batch(&texts);
        debug_assert_eq!(translations.len(), survivors.len());

        let (dx, dy) = origin_offset;
        let regions: Vec<Region> = survivors
            .into_iter()
            .zip(translations)
            .map(|(s, translation)| Region {
                bbox: s.local_bbox.offset(dx, dy),
                original_text: s.text,
                translation,
                text_color: s.text_color,
                outline_color: s.outline_color,
                crop_image: Arc::new(s.crop),
                render_handles: Vec::new(),
            })
            .collect();

        info!("Scan pass produced {} regions", regions.len());
        Ok(regions)
    }
}

struct Survivor {
    local_bbox: BBox,
    text: String,
    crop: DynamicImage,
    text_color: Rgb,
    outline_color: Rgb,
}

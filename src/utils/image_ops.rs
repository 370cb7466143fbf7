use crate::core::types::BBox;
use image::DynamicImage;

/// Crop `bbox` out of `image`, clamped to the image bounds.
///
/// Detector polygons occasionally overhang the captured frame by a pixel or
/// two; clamping keeps the crop valid instead of failing the region.
pub fn crop_region(image: &DynamicImage, bbox: &BBox) -> DynamicImage {
    let x = bbox.x.max(0) as u32;
    let y = bbox.y.max(0) as u32;
    let x = x.min(image.width().saturating_sub(1));
    let y = y.min(image.height().saturating_sub(1));
    let width = bbox.width.min(image.width() - x).max(1);
    let height = bbox.height.min(image.height() - y).max(1);
    image.crop_imm(x, y, width, height)
}

/// Gaussian-blurred duplicate used to obscure the original on-screen text.
pub fn blur(image: &DynamicImage, sigma: f32) -> DynamicImage {
    DynamicImage::ImageRgba8(image::imageops::blur(image, sigma))
}

/// Rec. 601 luma, the same weighting the color sampler's grayscale
/// conversion uses.
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

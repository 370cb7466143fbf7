// Native text color estimation
//
// A detected region is assumed to be dominated by glyph pixels near its
// center; sampling only the central window avoids background and margin
// bias at the edges.

use crate::core::config::ColorConfig;
use crate::core::types::Rgb;
use crate::utils::image_ops::luma;
use image::DynamicImage;
use tracing::trace;

/// Estimates foreground/outline colors from a cropped region image.
pub struct ColorSampler {
    luma_threshold: u8,
    window_lo: f32,
    window_hi: f32,
}

impl ColorSampler {
    pub fn new(config: &ColorConfig) -> Self {
        Self {
            luma_threshold: config.luma_threshold,
            window_lo: config.window_lo,
            window_hi: config.window_hi,
        }
    }

    /// Estimate `(text_color, outline_color)` for a region crop.
    ///
    /// Ink pixels are those in the central window with luma below the
    /// threshold; `text_color` is their per-channel mean (pure black when no
    /// ink exists). The outline is white or black, whichever contrasts with
    /// the sampled color, so the halo stays legible regardless of what sits
    /// behind the region on screen.
    ///
    /// Deterministic: identical input yields identical output.
    pub fn sample_color(&self, region_image: &DynamicImage) -> (Rgb, Rgb) {
        let rgb = region_image.to_rgb8();
        let (width, height) = (rgb.width(), rgb.height());

        let x1 = (width as f32 * self.window_lo) as u32;
        let x2 = (width as f32 * self.window_hi) as u32;
        let y1 = (height as f32 * self.window_lo) as u32;
        let y2 = (height as f32 * self.window_hi) as u32;

        let mut sums = [0u64; 3];
        let mut ink_count = 0u64;
        for y in y1..y2 {
            for x in x1..x2 {
                let pixel = rgb.get_pixel(x, y);
                if luma(pixel[0], pixel[1], pixel[2]) < self.luma_threshold as f32 {
                    sums[0] += pixel[0] as u64;
                    sums[1] += pixel[1] as u64;
                    sums[2] += pixel[2] as u64;
                    ink_count += 1;
                }
            }
        }

        // Tiny crops can produce an empty window; treated the same as an
        // all-bright window.
        let text_color = if ink_count == 0 {
            Rgb::BLACK
        } else {
            Rgb::new(
                mean_channel(sums[0], ink_count),
                mean_channel(sums[1], ink_count),
                mean_channel(sums[2], ink_count),
            )
        };

        let outline_color = if text_color.brightness() < 127.0 {
            Rgb::WHITE
        } else {
            Rgb::BLACK
        };

        trace!(
            "Sampled {} ink pixels → text {} outline {}",
            ink_count,
            text_color,
            outline_color
        );

        (text_color, outline_color)
    }
}

/// Per-channel mean rounded to nearest integer.
fn mean_channel(sum: u64, count: u64) -> u8 {
    ((sum as f64 / count as f64).round() as u64).min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use image::{Rgb as ImgRgb, RgbImage};

    fn sampler() -> ColorSampler {
        ColorSampler::new(&Config::default().color)
    }

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, ImgRgb(color)))
    }

    #[test]
    fn all_bright_window_defaults_to_black_on_white() {
        let img = solid(50, 50, [250, 250, 250]);
        let (text, outline) = sampler().sample_color(&img);
        assert_eq!(text.to_hex(), "#000000");
        // Black has brightness 0, below 127, so the outline is white.
        assert_eq!(outline.to_hex(), "#ffffff");
    }

    #[test]
    fn uniform_dark_ink_is_sampled_exactly() {
        let img = solid(50, 50, [40, 20, 60]);
        let (text, outline) = sampler().sample_color(&img);
        assert_eq!(text, Rgb::new(40, 20, 60));
        assert_eq!(outline, Rgb::WHITE);
    }

    #[test]
    fn bright_sampled_ink_gets_black_outline() {
        // Luma of (220, 60, 220) ≈ 126, dark enough to count as ink, but its
        // perceptual brightness is ≈ 149, above the 127 cutoff.
        let img = solid(50, 50, [220, 60, 220]);
        let (text, outline) = sampler().sample_color(&img);
        assert_eq!(text, Rgb::new(220, 60, 220));
        assert_eq!(outline, Rgb::BLACK);
    }

    #[test]
    fn edge_pixels_do_not_bias_the_sample() {
        // Dark border, bright center: the window sees only the center.
        let mut img = RgbImage::from_pixel(50, 50, ImgRgb([0, 0, 0]));
        for y in 15..35 {
            for x in 15..35 {
                img.put_pixel(x, y, ImgRgb([255, 255, 255]));
            }
        }
        let (text, _) = sampler().sample_color(&DynamicImage::ImageRgb8(img));
        assert_eq!(text, Rgb::BLACK);
    }

    #[test]
    fn mixed_ink_pixels_average_per_channel() {
        // Half the window (20,20,20), half (60,60,60): mean is (40,40,40).
        let mut img = RgbImage::from_pixel(100, 100, ImgRgb([255, 255, 255]));
        for y in 40..60 {
            for x in 40..60 {
                let shade = if x < 50 { 20 } else { 60 };
                img.put_pixel(x, y, ImgRgb([shade, shade, shade]));
            }
        }
        let (text, outline) = sampler().sample_color(&DynamicImage::ImageRgb8(img));
        assert_eq!(text, Rgb::new(40, 40, 40));
        assert_eq!(outline, Rgb::WHITE);
    }

    #[test]
    fn sampling_is_deterministic() {
        let img = solid(30, 30, [90, 45, 10]);
        let sampler = sampler();
        let first = sampler.sample_color(&img);
        for _ in 0..5 {
            assert_eq!(sampler.sample_color(&img), first);
        }
    }

    #[test]
    fn one_pixel_crop_yields_empty_window_and_black() {
        let img = solid(1, 1, [0, 0, 0]);
        let (text, outline) = sampler().sample_color(&img);
        assert_eq!(text, Rgb::BLACK);
        assert_eq!(outline, Rgb::WHITE);
    }
}

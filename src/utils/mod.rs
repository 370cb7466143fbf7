pub mod image_ops;

pub use image_ops::{blur, crop_region, luma};

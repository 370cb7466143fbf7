pub mod color;
pub mod rendering;
pub mod store;
pub mod translation;

// Re-export commonly used services
pub use color::ColorSampler;
pub use rendering::RenderSync;
pub use store::RegionStore;
pub use translation::TranslationBatcher;

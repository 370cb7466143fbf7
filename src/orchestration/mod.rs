pub mod pipeline;
pub mod session;

pub use pipeline::RegionPipeline;
pub use session::Session;

// Adapters layer: concrete implementations of the domain ports.

pub mod local;
pub mod vision;

pub use local::LocalUploadSource;
pub use vision::{VisionTextDetector, DEFAULT_VISION_ENDPOINT};

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalUploadSource, VisionTextDetector};
pub use config::toml_config::TomlConfig;
pub use crate::core::{extractor::extract, intake::IntakeOrchestrator, response::IntakeResponse};
pub use utils::error::{IntakeError, Result};

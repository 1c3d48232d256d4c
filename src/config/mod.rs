pub mod toml_config;

#[cfg(feature = "cli")]
use crate::adapters::vision::DEFAULT_VISION_ENDPOINT;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_range, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "doc-intake")]
#[command(about = "Validate identity document images, run OCR and extract holder fields")]
pub struct CliConfig {
    /// Image files to submit together (one or two)
    pub files: Vec<String>,

    /// Optional TOML configuration file; flags win over its values
    #[arg(short, long)]
    pub config: Option<String>,

    /// Text detection endpoint
    #[arg(long)]
    pub ocr_endpoint: Option<String>,

    /// API key for the text detection endpoint
    #[arg(long, env = "VISION_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Validate the files only; no OCR call is made
    #[arg(long)]
    pub dry_run: bool,

    /// First name entered on the form, for comparison
    #[arg(long, requires = "last_name")]
    pub first_name: Option<String>,

    /// Last name entered on the form, for comparison
    #[arg(long, requires = "first_name")]
    pub last_name: Option<String>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Fill every unset flag from the file configuration.
    pub fn merge_file(mut self, file: &toml_config::TomlConfig) -> Self {
        if self.ocr_endpoint.is_none() {
            self.ocr_endpoint = file.ocr.endpoint.clone();
        }
        if self.api_key.is_none() {
            self.api_key = file.ocr.api_key.clone();
        }
        if self.timeout.is_none() {
            self.timeout = file.ocr.timeout_seconds;
        }
        self.verbose |= file.verbose_logging();
        self.json_logs |= file.json_logging();
        self
    }

    pub fn form_names(&self) -> Option<(&str, &str)> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some((first.as_str(), last.as_str())),
            _ => None,
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn ocr_endpoint(&self) -> &str {
        self.ocr_endpoint.as_deref().unwrap_or(DEFAULT_VISION_ENDPOINT)
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn request_timeout_secs(&self) -> u64 {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validate_url("ocr_endpoint", self.ocr_endpoint())?;
        validate_range("timeout", self.request_timeout_secs(), 1, 300)?;
        Ok(())
    }
}

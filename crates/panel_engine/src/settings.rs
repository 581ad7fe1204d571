use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://ejecutable-toggles-wqhx.vercel.app";

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Cap for generated artifacts (CSV and ZIP downloads).
    pub max_artifact_bytes: u64,
    /// Cap for JSON responses.
    pub max_json_bytes: u64,
    pub output_dir: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            max_artifact_bytes: 512 * 1024 * 1024,
            max_json_bytes: 4 * 1024 * 1024,
            output_dir: PathBuf::from("output"),
        }
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use panel_engine::EngineSettings;
use panel_logging::{panel_debug, panel_info};
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "pension-panel.ron";

/// Optional settings read from `pension-panel.ron`. Unset fields keep engine defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct PanelConfig {
    pub base_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_artifact_mb: Option<u64>,
}

/// Loads the config file.
///
/// An explicit path must exist. Without one, `./pension-panel.ron` is used when
/// present and defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<PanelConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(CONFIG_FILENAME);
            if !default.exists() {
                panel_debug!("No {} found, using defaults", CONFIG_FILENAME);
                return Ok(PanelConfig::default());
            }
            default
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    panel_info!("Loaded config from {:?}", path);
    Ok(config)
}

pub fn parse_config(content: &str) -> anyhow::Result<PanelConfig> {
    Ok(ron::from_str(content)?)
}

impl PanelConfig {
    /// Builds engine settings; command line values win over the file.
    pub fn into_settings(
        self,
        base_url: Option<String>,
        output_dir: Option<PathBuf>,
    ) -> EngineSettings {
        let defaults = EngineSettings::default();
        EngineSettings {
            base_url: base_url.or(self.base_url).unwrap_or(defaults.base_url),
            output_dir: output_dir.or(self.output_dir).unwrap_or(defaults.output_dir),
            connect_timeout: self
                .connect_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            request_timeout: self
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            max_artifact_bytes: self
                .max_artifact_mb
                .map(|mb| mb.saturating_mul(1024 * 1024))
                .unwrap_or(defaults.max_artifact_bytes),
            max_json_bytes: defaults.max_json_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse_config(r#"(base_url: Some("http://localhost:8000"), request_timeout_secs: Some(5))"#)
            .unwrap();
        let settings = config.into_settings(None, None);

        assert_eq!(settings.base_url, "http://localhost:8000");
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(
            settings.connect_timeout,
            EngineSettings::default().connect_timeout
        );
        assert_eq!(settings.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn command_line_overrides_file() {
        let config = PanelConfig {
            base_url: Some("http://from-file".to_string()),
            output_dir: Some(PathBuf::from("file-out")),
            ..PanelConfig::default()
        };
        let settings = config.into_settings(
            Some("http://from-cli".to_string()),
            Some(PathBuf::from("cli-out")),
        );
        assert_eq!(settings.base_url, "http://from-cli");
        assert_eq!(settings.output_dir, PathBuf::from("cli-out"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.ron");
        assert!(load_config(Some(missing.as_path())).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "(base_url: 42").unwrap();
        assert!(load_config(Some(path.as_path())).is_err());
    }
}

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::persist::PersistError;
use crate::RequestId;
use crate::TimerId;

/// Body of `GET /api/business-rules`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesSnapshot {
    /// Rule name and enabled flag, in the order the service sent them.
    pub rules: Vec<(String, bool)>,
    pub total_rules: usize,
    pub active_rules: usize,
    pub inactive_rules: usize,
}

#[derive(Debug, Deserialize)]
struct RulesPayload {
    rules: Map<String, Value>,
    #[serde(default)]
    total_rules: usize,
    #[serde(default)]
    active_rules: usize,
    #[serde(default)]
    inactive_rules: usize,
}

impl RulesSnapshot {
    pub(crate) fn from_json(body: &[u8]) -> Result<Self, ApiError> {
        let payload: RulesPayload = serde_json::from_slice(body)
            .map_err(|err| ApiError::new(ApiFailureKind::Decode, err.to_string()))?;
        let rules = payload
            .rules
            .into_iter()
            .map(|(name, value)| match value {
                Value::Bool(enabled) => Ok((name, enabled)),
                other => Err(ApiError::new(
                    ApiFailureKind::Decode,
                    format!("rule {name} is not a boolean: {other}"),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            rules,
            total_rules: payload.total_rules,
            active_rules: payload.active_rules,
            inactive_rules: payload.inactive_rules,
        })
    }

    /// Whether the counts reported by the service match the mapping itself.
    pub fn counts_consistent(&self) -> bool {
        let active = self.rules.iter().filter(|(_, enabled)| *enabled).count();
        self.total_rules == self.rules.len()
            && self.active_rules == active
            && self.inactive_rules == self.rules.len() - active
    }
}

/// Body of `GET /api/business-rules/info`. Only `environment` is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemInfoPayload {
    pub environment: Option<String>,
    pub details: Vec<(String, String)>,
}

impl SystemInfoPayload {
    pub(crate) fn from_json(body: &[u8]) -> Result<Self, ApiError> {
        let fields: Map<String, Value> = serde_json::from_slice(body)
            .map_err(|err| ApiError::new(ApiFailureKind::Decode, err.to_string()))?;
        let mut info = Self::default();
        for (key, value) in fields {
            if key == "environment" {
                info.environment = value.as_str().map(ToOwned::to_owned);
            } else {
                info.details.push((key, value_to_text(&value)));
            }
        }
        Ok(info)
    }
}

/// One entry of `GET /api/files`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(default, deserialize_with = "size_as_text")]
    pub size: Option<String>,
}

fn size_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_null()).map(|v| value_to_text(&v)))
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Body of `POST /api/generate/download_csv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CsvJobSpec {
    #[serde(rename = "id_cotizacion_inicial")]
    pub range_start: u64,
    #[serde(rename = "id_cotizacion_final")]
    pub range_end: u64,
}

/// Body of `POST /api/generate/download_final_bundle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BundleJobSpec {
    #[serde(rename = "total_cotizaciones")]
    pub total_records: u64,
    #[serde(rename = "total_grupos")]
    pub records_per_group: u32,
}

/// A remote operation the engine can execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    FetchRules,
    FetchSystemInfo,
    PatchRule { name: String, enabled: bool },
    ResetRules,
    ListFiles,
    /// Generate a CSV and save it under the output directory as `file_name`.
    GenerateCsv { spec: CsvJobSpec, file_name: String },
    /// Generate a ZIP bundle and save it under the output directory as `file_name`.
    GenerateBundle { spec: BundleJobSpec, file_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome {
    Rules(RulesSnapshot),
    SystemInfo(SystemInfoPayload),
    Files(Vec<FileEntry>),
    /// The request succeeded and carried no payload.
    Done,
    /// A generated artifact was written to this path.
    Saved(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Completed {
        request_id: RequestId,
        result: Result<ApiOutcome, EngineError>,
    },
    TimerFired {
        timer_id: TimerId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiFailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for ApiFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailureKind::InvalidUrl => write!(f, "invalid url"),
            ApiFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiFailureKind::Timeout => write!(f, "timeout"),
            ApiFailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            ApiFailureKind::Decode => write!(f, "invalid response body"),
            ApiFailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("could not save artifact: {0}")]
    Persist(String),
    #[error("engine setup failed: {0}")]
    Setup(String),
    #[error("unexpected outcome: {0}")]
    Unexpected(String),
}

impl From<PersistError> for EngineError {
    fn from(err: PersistError) -> Self {
        EngineError::Persist(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_keep_service_order() {
        let body = br#"{"rules":{"rule_10_b":true,"rule_02_a":false},"total_rules":2,"active_rules":1,"inactive_rules":1}"#;
        let snapshot = RulesSnapshot::from_json(body).unwrap();
        assert_eq!(
            snapshot.rules,
            vec![
                ("rule_10_b".to_string(), true),
                ("rule_02_a".to_string(), false)
            ]
        );
        assert!(snapshot.counts_consistent());
    }

    #[test]
    fn non_boolean_rule_is_a_decode_error() {
        let body = br#"{"rules":{"a":"yes"}}"#;
        let err = RulesSnapshot::from_json(body).unwrap_err();
        assert_eq!(err.kind, ApiFailureKind::Decode);
    }

    #[test]
    fn file_sizes_accept_text_numbers_and_absence() {
        let body = br#"[{"name":"a.csv","size":"1.2 MB"},{"name":"b.zip","size":2048},{"name":"c.csv"},{"name":"d.csv","size":null}]"#;
        let files: Vec<FileEntry> = serde_json::from_slice(body).unwrap();
        let sizes: Vec<_> = files.iter().map(|f| f.size.as_deref()).collect();
        assert_eq!(sizes, vec![Some("1.2 MB"), Some("2048"), None, None]);
    }

    #[test]
    fn job_specs_use_service_field_names() {
        let csv = serde_json::to_value(CsvJobSpec {
            range_start: 1,
            range_end: 100,
        })
        .unwrap();
        assert_eq!(
            csv,
            serde_json::json!({"id_cotizacion_inicial": 1, "id_cotizacion_final": 100})
        );
        let bundle = serde_json::to_value(BundleJobSpec {
            total_records: 1000,
            records_per_group: 100,
        })
        .unwrap();
        assert_eq!(
            bundle,
            serde_json::json!({"total_cotizaciones": 1000, "total_grupos": 100})
        );
    }

    #[test]
    fn system_info_splits_environment_from_details() {
        let body = br#"{"environment":"staging","version":"1.4.0","rules_loaded":18}"#;
        let info = SystemInfoPayload::from_json(body).unwrap();
        assert_eq!(info.environment.as_deref(), Some("staging"));
        assert_eq!(
            info.details,
            vec![
                ("version".to_string(), "1.4.0".to_string()),
                ("rules_loaded".to_string(), "18".to_string())
            ]
        );
    }
}

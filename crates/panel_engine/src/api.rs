use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use url::Url;

use panel_logging::{panel_debug, panel_warn};

use crate::{
    ApiError, ApiFailureKind, BundleJobSpec, CsvJobSpec, EngineSettings, FileEntry,
    RulesSnapshot, SystemInfoPayload,
};

const RULES_PATH: &str = "api/business-rules";
const RULES_INFO_PATH: &str = "api/business-rules/info";
const RULES_RESET_PATH: &str = "api/business-rules/reset";
const FILES_PATH: &str = "api/files";
const GENERATE_CSV_PATH: &str = "api/generate/download_csv";
const GENERATE_BUNDLE_PATH: &str = "api/generate/download_final_bundle";

/// The remote pension data service.
///
/// Any transport failure, non-2xx status or undecodable body is an `Err`.
#[async_trait::async_trait]
pub trait PanelApi: Send + Sync {
    async fn fetch_rules(&self) -> Result<RulesSnapshot, ApiError>;

    async fn fetch_system_info(&self) -> Result<SystemInfoPayload, ApiError>;

    /// Sends a partial update containing only `name`.
    async fn patch_rule(&self, name: &str, enabled: bool) -> Result<(), ApiError>;

    async fn reset_rules(&self) -> Result<(), ApiError>;

    async fn list_files(&self) -> Result<Vec<FileEntry>, ApiError>;

    async fn generate_csv(&self, spec: &CsvJobSpec) -> Result<Bytes, ApiError>;

    async fn generate_bundle(&self, spec: &BundleJobSpec) -> Result<Bytes, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestPanelApi {
    base: Url,
    client: reqwest::Client,
    max_artifact_bytes: u64,
    max_json_bytes: u64,
}

impl ReqwestPanelApi {
    pub fn new(settings: &EngineSettings) -> Result<Self, ApiError> {
        let mut base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(ApiFailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                ApiFailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        // Endpoints are joined relative to the base, so it must end with a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiFailureKind::Network, err.to_string()))?;

        Ok(Self {
            base,
            client,
            max_artifact_bytes: settings.max_artifact_bytes,
            max_json_bytes: settings.max_json_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self
            .base
            .join(path)
            .map_err(|err| ApiError::new(ApiFailureKind::InvalidUrl, err.to_string()))?;
        panel_debug!("{} {}", method, url);
        Ok(self.client.request(method, url))
    }

    fn json_request<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &T,
    ) -> Result<RequestBuilder, ApiError> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| ApiError::new(ApiFailureKind::Decode, err.to_string()))?;
        Ok(self
            .request(method, path)?
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(payload))
    }

    async fn read_body(&self, request: RequestBuilder, max_bytes: u64) -> Result<Bytes, ApiError> {
        let response = send(request).await?;

        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::new(
                    ApiFailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::new(
                    ApiFailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(Bytes::from(bytes))
    }

    async fn read_json_body(&self, request: RequestBuilder) -> Result<Bytes, ApiError> {
        self.read_body(request, self.max_json_bytes).await
    }
}

#[async_trait::async_trait]
impl PanelApi for ReqwestPanelApi {
    async fn fetch_rules(&self) -> Result<RulesSnapshot, ApiError> {
        let body = self
            .read_json_body(self.request(Method::GET, RULES_PATH)?)
            .await?;
        let snapshot = RulesSnapshot::from_json(&body)?;
        if !snapshot.counts_consistent() {
            panel_warn!(
                "Rule counts from service (total={}, active={}, inactive={}) disagree with the {} rules received",
                snapshot.total_rules,
                snapshot.active_rules,
                snapshot.inactive_rules,
                snapshot.rules.len()
            );
        }
        Ok(snapshot)
    }

    async fn fetch_system_info(&self) -> Result<SystemInfoPayload, ApiError> {
        let body = self
            .read_json_body(self.request(Method::GET, RULES_INFO_PATH)?)
            .await?;
        SystemInfoPayload::from_json(&body)
    }

    async fn patch_rule(&self, name: &str, enabled: bool) -> Result<(), ApiError> {
        let mut update = serde_json::Map::new();
        update.insert(name.to_string(), serde_json::Value::Bool(enabled));
        send(self.json_request(Method::PATCH, RULES_PATH, &update)?).await?;
        Ok(())
    }

    async fn reset_rules(&self) -> Result<(), ApiError> {
        send(self.request(Method::POST, RULES_RESET_PATH)?).await?;
        Ok(())
    }

    async fn list_files(&self) -> Result<Vec<FileEntry>, ApiError> {
        let body = self
            .read_json_body(self.request(Method::GET, FILES_PATH)?)
            .await?;
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(ApiFailureKind::Decode, err.to_string()))
    }

    async fn generate_csv(&self, spec: &CsvJobSpec) -> Result<Bytes, ApiError> {
        let request = self.json_request(Method::POST, GENERATE_CSV_PATH, spec)?;
        self.read_body(request, self.max_artifact_bytes).await
    }

    async fn generate_bundle(&self, spec: &BundleJobSpec) -> Result<Bytes, ApiError> {
        let request = self.json_request(Method::POST, GENERATE_BUNDLE_PATH, spec)?;
        self.read_body(request, self.max_artifact_bytes).await
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await.map_err(map_reqwest_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::new(
            ApiFailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    Ok(response)
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiFailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(ApiFailureKind::Decode, err.to_string());
    }
    ApiError::new(ApiFailureKind::Network, err.to_string())
}

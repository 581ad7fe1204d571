//! Panel engine: remote API client, artifact persistence and effect execution.
mod api;
mod engine;
mod persist;
mod settings;
mod types;

pub use api::{PanelApi, ReqwestPanelApi};
pub use engine::{EngineHandle, RequestId, TimerId};
pub use persist::{ensure_output_dir, ArtifactStore, PersistError};
pub use settings::{EngineSettings, DEFAULT_BASE_URL};
pub use types::{
    ApiError, ApiFailureKind, ApiOutcome, ApiRequest, BundleJobSpec, CsvJobSpec, EngineError,
    EngineEvent, FileEntry, RulesSnapshot, SystemInfoPayload,
};

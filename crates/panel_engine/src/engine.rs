use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use panel_logging::{panel_debug, panel_info, panel_trace, panel_warn};

use crate::api::{PanelApi, ReqwestPanelApi};
use crate::persist::ArtifactStore;
use crate::{ApiOutcome, ApiRequest, EngineError, EngineEvent, EngineSettings};

pub type RequestId = u64;
pub type TimerId = u64;

enum EngineCommand {
    Submit {
        request_id: RequestId,
        request: ApiRequest,
    },
    ScheduleTimer {
        timer_id: TimerId,
        after: Duration,
    },
    CancelTimer {
        timer_id: TimerId,
    },
}

/// Runs remote requests and timers on a background tokio runtime.
///
/// Every submitted request is its own task, so requests never wait for each
/// other. Each one produces exactly one [`EngineEvent::Completed`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        let api = ReqwestPanelApi::new(&settings)?;
        panel_info!(
            "Engine targeting {} (artifacts in {:?})",
            api.base_url(),
            settings.output_dir
        );
        Self::with_api(Arc::new(api), ArtifactStore::new(settings.output_dir))
    }

    pub fn with_api(api: Arc<dyn PanelApi>, store: ArtifactStore) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|err| EngineError::Setup(err.to_string()))?;
        let store = Arc::new(store);

        thread::spawn(move || {
            let mut timers: HashMap<TimerId, (CancellationToken, JoinHandle<()>)> =
                HashMap::new();
            while let Ok(command) = cmd_rx.recv() {
                timers.retain(|_, (_, handle)| !handle.is_finished());
                match command {
                    EngineCommand::Submit {
                        request_id,
                        request,
                    } => {
                        let api = api.clone();
                        let store = store.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = execute(api.as_ref(), &store, request).await;
                            let _ = event_tx.send(EngineEvent::Completed { request_id, result });
                        });
                    }
                    EngineCommand::ScheduleTimer { timer_id, after } => {
                        let token = CancellationToken::new();
                        let cancelled = token.clone();
                        let event_tx = event_tx.clone();
                        let handle = runtime.spawn(async move {
                            tokio::select! {
                                _ = cancelled.cancelled() => {}
                                _ = tokio::time::sleep(after) => {
                                    panel_trace!("Timer {} fired", timer_id);
                                    let _ = event_tx.send(EngineEvent::TimerFired { timer_id });
                                }
                            }
                        });
                        if let Some((previous, _)) = timers.insert(timer_id, (token, handle)) {
                            previous.cancel();
                        }
                    }
                    EngineCommand::CancelTimer { timer_id } => {
                        if let Some((token, _)) = timers.remove(&timer_id) {
                            panel_debug!("Cancelled timer {}", timer_id);
                            token.cancel();
                        }
                    }
                }
            }
            for (token, _) in timers.values() {
                token.cancel();
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, request_id: RequestId, request: ApiRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            request_id,
            request,
        });
    }

    pub fn schedule_timer(&self, timer_id: TimerId, after: Duration) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::ScheduleTimer { timer_id, after });
    }

    /// Cancels a pending timer. Unknown or already fired ids are ignored.
    pub fn cancel_timer(&self, timer_id: TimerId) {
        let _ = self.cmd_tx.send(EngineCommand::CancelTimer { timer_id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn execute(
    api: &dyn PanelApi,
    store: &ArtifactStore,
    request: ApiRequest,
) -> Result<ApiOutcome, EngineError> {
    let outcome = match request {
        ApiRequest::FetchRules => ApiOutcome::Rules(api.fetch_rules().await?),
        ApiRequest::FetchSystemInfo => ApiOutcome::SystemInfo(api.fetch_system_info().await?),
        ApiRequest::PatchRule { name, enabled } => {
            api.patch_rule(&name, enabled).await?;
            ApiOutcome::Done
        }
        ApiRequest::ResetRules => {
            api.reset_rules().await?;
            ApiOutcome::Done
        }
        ApiRequest::ListFiles => ApiOutcome::Files(api.list_files().await?),
        ApiRequest::GenerateCsv { spec, file_name } => {
            let bytes = api.generate_csv(&spec).await?;
            ApiOutcome::Saved(save(store, &file_name, &bytes)?)
        }
        ApiRequest::GenerateBundle { spec, file_name } => {
            let bytes = api.generate_bundle(&spec).await?;
            ApiOutcome::Saved(save(store, &file_name, &bytes)?)
        }
    };
    Ok(outcome)
}

fn save(
    store: &ArtifactStore,
    file_name: &str,
    bytes: &[u8],
) -> Result<std::path::PathBuf, EngineError> {
    match store.save(file_name, bytes) {
        Ok(path) => {
            panel_info!("Saved {} ({} bytes)", path.display(), bytes.len());
            Ok(path)
        }
        Err(err) => {
            panel_warn!("Failed to save {} in {:?}: {}", file_name, store.dir(), err);
            Err(err.into())
        }
    }
}

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use panel_core::{
    ArtifactDescriptor, BundleJobRequest, CsvJobRequest, Effect, JobKind, LoadedRules, Msg,
    RemoteError, Rule, RuleStats, SystemInfo,
};
use panel_engine::{
    ApiOutcome, ApiRequest, BundleJobSpec, CsvJobSpec, EngineError, EngineEvent, EngineHandle,
    RequestId,
};
use panel_logging::{panel_debug, panel_info, panel_warn};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    next_request: RequestId,
    pending: HashMap<RequestId, Effect>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            next_request: 1,
            pending: HashMap::new(),
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScheduleExpiry { id, after } => self.engine.schedule_timer(id, after),
                Effect::CancelExpiry { id } => self.engine.cancel_timer(id),
                remote => {
                    let Some(request) = to_request(&remote) else {
                        continue;
                    };
                    let request_id = self.next_request;
                    self.next_request += 1;
                    panel_info!("Request {} {:?}", request_id, request);
                    self.pending.insert(request_id, remote);
                    self.engine.submit(request_id, request);
                }
            }
        }
    }

    /// Number of submitted requests still waiting for a result.
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    /// Waits up to `timeout` for the next engine event and maps it to a message.
    pub fn next_msg(&mut self, timeout: Duration) -> Option<Msg> {
        let event = self.engine.recv_timeout(timeout)?;
        match event {
            EngineEvent::TimerFired { timer_id } => Some(Msg::NotificationExpired(timer_id)),
            EngineEvent::Completed { request_id, result } => {
                let Some(effect) = self.pending.remove(&request_id) else {
                    panel_warn!("Result for unknown request {}", request_id);
                    return None;
                };
                panel_debug!("Request {} finished (ok={})", request_id, result.is_ok());
                to_msg(effect, result)
            }
        }
    }
}

pub(crate) fn to_request(effect: &Effect) -> Option<ApiRequest> {
    let request = match effect {
        Effect::FetchRules => ApiRequest::FetchRules,
        Effect::PatchRule { name, enabled, .. } => ApiRequest::PatchRule {
            name: name.clone(),
            enabled: *enabled,
        },
        Effect::ResetRules => ApiRequest::ResetRules,
        Effect::FetchSystemInfo => ApiRequest::FetchSystemInfo,
        Effect::GenerateCsv { request, file_name } => ApiRequest::GenerateCsv {
            spec: csv_spec(request),
            file_name: file_name.clone(),
        },
        Effect::GenerateBundle { request, file_name } => ApiRequest::GenerateBundle {
            spec: bundle_spec(request),
            file_name: file_name.clone(),
        },
        Effect::ListArtifacts => ApiRequest::ListFiles,
        Effect::ScheduleExpiry { .. } | Effect::CancelExpiry { .. } => return None,
    };
    Some(request)
}

/// Maps a finished request back to the message that reports it.
///
/// Timer effects never reach the engine as requests, so they map to nothing.
pub(crate) fn to_msg(effect: Effect, result: Result<ApiOutcome, EngineError>) -> Option<Msg> {
    let msg = match effect {
        Effect::FetchRules => {
            let result = result.and_then(|outcome| match outcome {
                ApiOutcome::Rules(snapshot) => Ok(LoadedRules {
                    stats: RuleStats {
                        total: snapshot.total_rules,
                        active: snapshot.active_rules,
                        inactive: snapshot.inactive_rules,
                    },
                    rules: snapshot
                        .rules
                        .into_iter()
                        .map(|(name, enabled)| Rule::new(name, enabled))
                        .collect(),
                }),
                other => Err(unexpected(other)),
            });
            Msg::RulesLoaded(result.map_err(remote))
        }
        Effect::PatchRule {
            name,
            enabled,
            previous,
        } => Msg::RulePatched {
            name,
            enabled,
            previous,
            result: expect_done(result),
        },
        Effect::ResetRules => Msg::RulesReset(expect_done(result)),
        Effect::FetchSystemInfo => {
            let result = result.and_then(|outcome| match outcome {
                ApiOutcome::SystemInfo(info) => Ok(SystemInfo {
                    environment: info.environment,
                    details: info.details,
                }),
                other => Err(unexpected(other)),
            });
            if let Err(err) = &result {
                panel_warn!("Loading system info failed: {}", err);
            }
            Msg::SystemInfoLoaded(result.map_err(remote))
        }
        Effect::GenerateCsv { .. } => Msg::JobFinished {
            kind: JobKind::Csv,
            result: expect_saved(result),
        },
        Effect::GenerateBundle { .. } => Msg::JobFinished {
            kind: JobKind::Bundle,
            result: expect_saved(result),
        },
        Effect::ListArtifacts => {
            let result = result.and_then(|outcome| match outcome {
                ApiOutcome::Files(files) => Ok(files
                    .into_iter()
                    .map(|file| ArtifactDescriptor {
                        name: file.name,
                        size: file.size,
                    })
                    .collect()),
                other => Err(unexpected(other)),
            });
            if let Err(err) = &result {
                panel_warn!("Refreshing the file list failed: {}", err);
            }
            Msg::ArtifactsListed(result.map_err(remote))
        }
        Effect::ScheduleExpiry { .. } | Effect::CancelExpiry { .. } => {
            panel_warn!("Timer effect {:?} came back as a request result", effect);
            return None;
        }
    };
    Some(msg)
}

fn csv_spec(request: &CsvJobRequest) -> CsvJobSpec {
    CsvJobSpec {
        range_start: request.range_start,
        range_end: request.range_end,
    }
}

fn bundle_spec(request: &BundleJobRequest) -> BundleJobSpec {
    BundleJobSpec {
        total_records: request.total_records,
        records_per_group: request.records_per_group,
    }
}

fn expect_done(result: Result<ApiOutcome, EngineError>) -> Result<(), RemoteError> {
    match result {
        Ok(ApiOutcome::Done) => Ok(()),
        Ok(other) => Err(remote(unexpected(other))),
        Err(err) => Err(remote(err)),
    }
}

fn expect_saved(result: Result<ApiOutcome, EngineError>) -> Result<PathBuf, RemoteError> {
    match result {
        Ok(ApiOutcome::Saved(path)) => Ok(path),
        Ok(other) => Err(remote(unexpected(other))),
        Err(err) => Err(remote(err)),
    }
}

fn unexpected(outcome: ApiOutcome) -> EngineError {
    EngineError::Unexpected(format!("{outcome:?}"))
}

fn remote(err: EngineError) -> RemoteError {
    RemoteError::new(err.to_string())
}

use std::fmt;
use std::path::PathBuf;

use crate::{
    ArtifactDescriptor, BundleJobRequest, CsvJobRequest, JobKind, LoadedRules, NotificationId,
    SystemInfo,
};

/// Failure reported back for a remote effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Panel opened: load rules, system info and the file list.
    PanelOpened,
    /// Request a full reload of the rule mapping.
    RulesRequested,
    /// Result of a full rule load.
    RulesLoaded(Result<LoadedRules, RemoteError>),
    /// Operator flipped a rule switch.
    RuleToggled { name: String, enabled: bool },
    /// Result of a single-rule update. `previous` is the value before the optimistic write.
    RulePatched {
        name: String,
        enabled: bool,
        previous: bool,
        result: Result<(), RemoteError>,
    },
    /// Operator asked to restore all rules to defaults (needs confirmation).
    ResetRequested,
    /// Result of the rule reset.
    RulesReset(Result<(), RemoteError>),
    /// Operator accepted the pending confirmation.
    ConfirmAccepted,
    /// Operator declined the pending confirmation.
    ConfirmCancelled,
    SystemInfoRequested,
    SystemInfoLoaded(Result<SystemInfo, RemoteError>),
    /// Operator submitted the single-range CSV form.
    CsvJobSubmitted(CsvJobRequest),
    /// Operator submitted the bundle form.
    BundleJobSubmitted(BundleJobRequest),
    /// A generation job ended; on success the artifact was saved at the path.
    JobFinished {
        kind: JobKind,
        result: Result<PathBuf, RemoteError>,
    },
    ArtifactsRequested,
    ArtifactsListed(Result<Vec<ArtifactDescriptor>, RemoteError>),
    /// Operator closed a notification.
    NotificationDismissed(NotificationId),
    /// Expiry timer for a notification fired.
    NotificationExpired(NotificationId),
    /// Wall clock update, used to stamp notifications.
    Tick { now_ms: u64 },
}

use std::time::Duration;

use crate::{BundleJobRequest, CsvJobRequest, NotificationId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchRules,
    PatchRule {
        name: String,
        enabled: bool,
        previous: bool,
    },
    ResetRules,
    FetchSystemInfo,
    GenerateCsv {
        request: CsvJobRequest,
        file_name: String,
    },
    GenerateBundle {
        request: BundleJobRequest,
        file_name: String,
    },
    ListArtifacts,
    ScheduleExpiry {
        id: NotificationId,
        after: Duration,
    },
    CancelExpiry {
        id: NotificationId,
    },
}

impl Effect {
    /// Whether the effect is a remote call that answers with exactly one message.
    pub fn is_remote(&self) -> bool {
        !matches!(
            self,
            Effect::ScheduleExpiry { .. } | Effect::CancelExpiry { .. }
        )
    }
}

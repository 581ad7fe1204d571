//! Panel core: pure state machine for the pension data control panel.
//!
//! Nothing in this crate performs IO. `update` applies a [`Msg`] to the
//! [`AppState`] and returns the [`Effect`]s the caller must execute; their
//! results come back as further messages.
mod catalog;
mod confirm;
mod effect;
mod jobs;
mod msg;
mod notifications;
mod rules;
mod state;
mod update;
mod view_model;

pub use catalog::{ArtifactCatalog, ArtifactDescriptor, SystemInfo, DEFAULT_ENVIRONMENT};
pub use confirm::{ConfirmationGate, GateBusy, PendingConfirmation};
pub use effect::Effect;
pub use jobs::{
    BundleJobRequest, CsvJobRequest, JobKind, JobTracker, ValidationError,
    MAX_RECORDS_PER_GROUP,
};
pub use msg::{Msg, RemoteError};
pub use notifications::{
    Notification, NotificationCenter, NotificationId, Severity, NOTIFICATION_TTL,
};
pub use rules::{
    format_rule_name, rule_description, LoadedRules, Rule, RuleStats, RuleSyncState, UnknownRule,
    GENERIC_RULE_DESCRIPTION,
};
pub use state::{AppState, ConfirmedAction, RESET_PROMPT};
pub use update::update;
pub use view_model::{AppViewModel, RuleRowView};

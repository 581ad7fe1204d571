use crate::{ArtifactDescriptor, Notification, RuleStats, SystemInfo};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub rules: Vec<RuleRowView>,
    /// False until the first successful rule load.
    pub rules_loaded: bool,
    pub stats: RuleStats,
    pub active_percent: u32,
    pub notifications: Vec<Notification>,
    pub pending_confirmation: Option<String>,
    pub artifacts: Vec<ArtifactDescriptor>,
    /// False until the file list has been fetched once.
    pub artifacts_refreshed: bool,
    pub system_info: Option<SystemInfo>,
    pub last_csv: Option<String>,
    pub last_bundle: Option<String>,
    pub in_flight: usize,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRowView {
    pub name: String,
    pub display_name: String,
    pub description: &'static str,
    pub enabled: bool,
}

use crate::view_model::{AppViewModel, RuleRowView};
use crate::{
    format_rule_name, rule_description, ArtifactCatalog, ConfirmationGate, Effect, JobKind,
    JobTracker, Notification, NotificationCenter, NotificationId, RuleSyncState, Severity,
    SystemInfo, NOTIFICATION_TTL,
};

/// Prompt shown before restoring every rule to its default.
pub const RESET_PROMPT: &str = "Restore all rules to their default values?";

/// Actions that only run after the operator confirms them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmedAction {
    ResetRules,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    rules: RuleSyncState,
    notifications: NotificationCenter,
    confirmation: ConfirmationGate<ConfirmedAction>,
    jobs: JobTracker,
    catalog: ArtifactCatalog,
    system_info: Option<SystemInfo>,
    in_flight: usize,
    clock_ms: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let stats = self.rules.stats();
        AppViewModel {
            rules: self
                .rules
                .rules()
                .iter()
                .map(|rule| RuleRowView {
                    name: rule.name.clone(),
                    display_name: format_rule_name(&rule.name),
                    description: rule_description(&rule.name),
                    enabled: rule.enabled,
                })
                .collect(),
            rules_loaded: self.rules.is_loaded(),
            stats,
            active_percent: stats.active_percent(),
            notifications: self.notifications.entries().to_vec(),
            pending_confirmation: self
                .confirmation
                .pending()
                .map(|pending| pending.message.clone()),
            artifacts: self.catalog.artifacts().to_vec(),
            artifacts_refreshed: self.catalog.is_refreshed(),
            system_info: self.system_info.clone(),
            last_csv: self
                .jobs
                .last_saved(JobKind::Csv)
                .map(|path| path.display().to_string()),
            last_bundle: self
                .jobs
                .last_saved(JobKind::Bundle)
                .map(|path| path.display().to_string()),
            in_flight: self.in_flight,
            busy: self.in_flight > 0,
        }
    }

    pub fn rule_enabled(&self, name: &str) -> Option<bool> {
        self.rules.get(name)
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.entries()
    }

    pub fn has_notification(&self, id: NotificationId) -> bool {
        self.notifications.contains(id)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    pub(crate) fn rules_mut(&mut self) -> &mut RuleSyncState {
        &mut self.rules
    }

    pub(crate) fn confirmation_mut(&mut self) -> &mut ConfirmationGate<ConfirmedAction> {
        &mut self.confirmation
    }

    pub(crate) fn jobs_mut(&mut self) -> &mut JobTracker {
        &mut self.jobs
    }

    pub(crate) fn catalog_mut(&mut self) -> &mut ArtifactCatalog {
        &mut self.catalog
    }

    pub(crate) fn set_system_info(&mut self, info: SystemInfo) {
        self.system_info = Some(info);
    }

    pub(crate) fn set_clock(&mut self, now_ms: u64) {
        self.clock_ms = now_ms;
    }

    /// Posts a notification and schedules its expiry.
    pub(crate) fn notify(
        &mut self,
        effects: &mut Vec<Effect>,
        message: impl Into<String>,
        severity: Severity,
    ) -> NotificationId {
        let id = self.notifications.post(message, severity, self.clock_ms);
        effects.push(Effect::ScheduleExpiry {
            id,
            after: NOTIFICATION_TTL,
        });
        id
    }

    pub(crate) fn dismiss_notification(&mut self, id: NotificationId) -> bool {
        self.notifications.dismiss(id)
    }

    pub(crate) fn track_requests(&mut self, effects: &[Effect]) {
        let issued = effects.iter().filter(|effect| effect.is_remote()).count();
        self.in_flight += issued;
    }

    pub(crate) fn request_settled(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}

use chrono::{Local, TimeZone};
use panel_core::{AppViewModel, Notification, Severity, DEFAULT_ENVIRONMENT};

const BAR_WIDTH: usize = 20;

pub fn render_dashboard(view: &AppViewModel) -> Vec<String> {
    let environment = view
        .system_info
        .as_ref()
        .map(|info| info.display_environment())
        .unwrap_or(DEFAULT_ENVIRONMENT);

    let mut lines = vec![
        format!("Environment: {environment}"),
        format!(
            "Rules: {} total | {} active | {} inactive",
            view.stats.total, view.stats.active, view.stats.inactive
        ),
        format!(
            "Active: [{}] {}%",
            progress_bar(view.active_percent),
            view.active_percent
        ),
        format!("Files: {}", view.artifacts.len()),
    ];
    if let Some(path) = &view.last_csv {
        lines.push(format!("Last CSV: {path}"));
    }
    if let Some(path) = &view.last_bundle {
        lines.push(format!("Last bundle: {path}"));
    }
    lines
}

pub fn render_rules(view: &AppViewModel) -> Vec<String> {
    if !view.rules_loaded {
        return vec!["Rules not loaded yet".to_string()];
    }
    if view.rules.is_empty() {
        return vec!["The service returned no rules".to_string()];
    }
    let width = view
        .rules
        .iter()
        .map(|row| row.display_name.chars().count())
        .max()
        .unwrap_or(0);
    view.rules
        .iter()
        .map(|row| {
            format!(
                "[{}] {:<width$}  {}  ({})",
                if row.enabled { "on " } else { "off" },
                row.display_name,
                row.description,
                row.name,
            )
        })
        .collect()
}

pub fn render_files(view: &AppViewModel) -> Vec<String> {
    if !view.artifacts_refreshed {
        return vec!["File list not loaded yet".to_string()];
    }
    if view.artifacts.is_empty() {
        return vec!["No files available".to_string()];
    }
    view.artifacts
        .iter()
        .map(|file| match &file.size {
            Some(size) => format!("{}  {}", file.name, size),
            None => file.name.clone(),
        })
        .collect()
}

pub fn render_notification(notification: &Notification) -> String {
    let marker = match notification.severity {
        Severity::Info => "i",
        Severity::Success => "+",
        Severity::Error => "!",
    };
    format!(
        "{} [{}] #{} {}",
        format_time(notification.created_at_ms),
        marker,
        notification.id,
        notification.message
    )
}

fn progress_bar(percent: u32) -> String {
    let filled = (percent.min(100) as usize * BAR_WIDTH) / 100;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn format_time(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(|ms| Local.timestamp_millis_opt(ms).single())
        .map(|time| time.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_core::{ArtifactDescriptor, RuleRowView, RuleStats, SystemInfo};
    use pretty_assertions::assert_eq;

    fn view() -> AppViewModel {
        AppViewModel {
            rules_loaded: true,
            artifacts_refreshed: true,
            rules: vec![
                RuleRowView {
                    name: "rule_17_smlv_range".to_string(),
                    display_name: "Smlv Range".to_string(),
                    description: "Rango SMLV",
                    enabled: true,
                },
                RuleRowView {
                    name: "rule_30_id_format".to_string(),
                    display_name: "Id Format".to_string(),
                    description: "Formato de identificación",
                    enabled: false,
                },
            ],
            stats: RuleStats {
                total: 2,
                active: 1,
                inactive: 1,
            },
            active_percent: 50,
            artifacts: vec![
                ArtifactDescriptor {
                    name: "pensiones_1_100.csv".to_string(),
                    size: Some("2 KB".to_string()),
                },
                ArtifactDescriptor {
                    name: "bundle.zip".to_string(),
                    size: None,
                },
            ],
            ..AppViewModel::default()
        }
    }

    #[test]
    fn dashboard_falls_back_to_default_environment() {
        let lines = render_dashboard(&view());
        assert_eq!(lines[0], "Environment: Production");
        assert_eq!(lines[1], "Rules: 2 total | 1 active | 1 inactive");
        assert_eq!(lines[2], "Active: [##########----------] 50%");
    }

    #[test]
    fn dashboard_shows_reported_environment() {
        let mut view = view();
        view.system_info = Some(SystemInfo {
            environment: Some("staging".to_string()),
            details: Vec::new(),
        });
        assert_eq!(render_dashboard(&view)[0], "Environment: staging");
    }

    #[test]
    fn rule_rows_are_aligned() {
        let lines = render_rules(&view());
        assert_eq!(
            lines,
            vec![
                "[on ] Smlv Range  Rango SMLV  (rule_17_smlv_range)".to_string(),
                "[off] Id Format   Formato de identificación  (rule_30_id_format)".to_string(),
            ]
        );
    }

    #[test]
    fn files_without_size_show_name_only() {
        assert_eq!(
            render_files(&view()),
            vec!["pensiones_1_100.csv  2 KB".to_string(), "bundle.zip".to_string()]
        );
    }

    #[test]
    fn unloaded_lists_differ_from_empty_ones() {
        let unloaded = AppViewModel::default();
        assert_eq!(render_rules(&unloaded), vec!["Rules not loaded yet".to_string()]);
        assert_eq!(render_files(&unloaded), vec!["File list not loaded yet".to_string()]);

        let empty = AppViewModel {
            rules_loaded: true,
            artifacts_refreshed: true,
            ..AppViewModel::default()
        };
        assert_eq!(
            render_rules(&empty),
            vec!["The service returned no rules".to_string()]
        );
        assert_eq!(render_files(&empty), vec!["No files available".to_string()]);
    }

    #[test]
    fn notification_line_carries_id_and_marker() {
        let line = render_notification(&Notification {
            id: 7,
            message: "Rule x updated".to_string(),
            severity: Severity::Success,
            created_at_ms: 0,
        });
        assert!(line.ends_with("[+] #7 Rule x updated"), "{line}");
    }
}

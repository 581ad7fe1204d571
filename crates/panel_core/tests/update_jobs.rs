use std::path::PathBuf;

use panel_core::{
    update, AppState, ArtifactDescriptor, BundleJobRequest, CsvJobRequest, Effect, JobKind, Msg,
    RemoteError, Severity, SystemInfo,
};
use pretty_assertions::assert_eq;

fn remote_effects(effects: &[Effect]) -> Vec<Effect> {
    effects.iter().filter(|e| e.is_remote()).cloned().collect()
}

#[test]
fn invalid_csv_range_is_rejected_without_network_call() {
    let (state, effects) = update(
        AppState::new(),
        Msg::CsvJobSubmitted(CsvJobRequest {
            range_start: 10,
            range_end: 5,
        }),
    );

    assert!(remote_effects(&effects).is_empty());
    assert!(!state.is_busy());
    assert_eq!(state.notifications().len(), 1);
    assert_eq!(state.notifications()[0].severity, Severity::Error);
}

#[test]
fn valid_csv_job_is_submitted_with_derived_file_name() {
    let request = CsvJobRequest {
        range_start: 1,
        range_end: 100,
    };
    let (state, effects) = update(AppState::new(), Msg::CsvJobSubmitted(request));

    assert_eq!(
        effects,
        vec![Effect::GenerateCsv {
            request,
            file_name: "pensiones_1_100.csv".to_string(),
        }]
    );
    assert!(state.is_busy());
}

#[test]
fn bundle_success_saves_notifies_and_refreshes_catalog() {
    let request = BundleJobRequest {
        total_records: 1000,
        records_per_group: 100,
    };
    let (state, effects) = update(AppState::new(), Msg::BundleJobSubmitted(request));
    assert_eq!(
        effects,
        vec![Effect::GenerateBundle {
            request,
            file_name: "bundle_pensiones_1000_registros.zip".to_string(),
        }]
    );

    let saved = PathBuf::from("output").join("bundle_pensiones_1000_registros.zip");
    let (state, effects) = update(
        state,
        Msg::JobFinished {
            kind: JobKind::Bundle,
            result: Ok(saved.clone()),
        },
    );
    assert_eq!(remote_effects(&effects), vec![Effect::ListArtifacts]);
    assert_eq!(state.notifications()[0].severity, Severity::Success);
    assert_eq!(
        state.view().last_bundle,
        Some(saved.display().to_string())
    );

    let listing = vec![ArtifactDescriptor {
        name: "bundle_pensiones_1000_registros.zip".to_string(),
        size: Some("2.1 MB".to_string()),
    }];
    let (state, _) = update(state, Msg::ArtifactsListed(Ok(listing.clone())));
    assert_eq!(state.view().artifacts, listing);
    assert!(!state.is_busy());
}

#[test]
fn oversized_groups_are_rejected_at_submission() {
    let (state, effects) = update(
        AppState::new(),
        Msg::BundleJobSubmitted(BundleJobRequest {
            total_records: 1000,
            records_per_group: 251,
        }),
    );

    assert!(remote_effects(&effects).is_empty());
    assert!(state.notifications()[0].message.contains("250"));
}

#[test]
fn job_failure_notifies_without_refresh() {
    let (state, _) = update(AppState::new(), Msg::CsvJobSubmitted(CsvJobRequest::default()));
    let (state, effects) = update(
        state,
        Msg::JobFinished {
            kind: JobKind::Csv,
            result: Err(RemoteError::new("http status 502")),
        },
    );

    assert!(remote_effects(&effects).is_empty());
    assert_eq!(state.view().last_csv, None);
    assert_eq!(state.notifications()[0].severity, Severity::Error);
    assert!(!state.is_busy());
}

#[test]
fn csv_and_bundle_jobs_run_independently() {
    let (state, _) = update(AppState::new(), Msg::CsvJobSubmitted(CsvJobRequest::default()));
    let (state, _) = update(
        state,
        Msg::BundleJobSubmitted(BundleJobRequest::default()),
    );
    assert_eq!(state.view().in_flight, 2);

    let (state, _) = update(
        state,
        Msg::JobFinished {
            kind: JobKind::Bundle,
            result: Err(RemoteError::new("timeout")),
        },
    );
    let (state, _) = update(
        state,
        Msg::JobFinished {
            kind: JobKind::Csv,
            result: Ok(PathBuf::from("pensiones_1_100.csv")),
        },
    );

    let view = state.view();
    assert_eq!(view.last_csv.as_deref(), Some("pensiones_1_100.csv"));
    assert_eq!(view.last_bundle, None);
    let severities: Vec<_> = view.notifications.iter().map(|n| n.severity).collect();
    assert_eq!(severities, vec![Severity::Error, Severity::Success]);
    // Only the catalog refresh from the CSV success is outstanding.
    assert_eq!(view.in_flight, 1);
}

#[test]
fn catalog_failure_keeps_list_and_stays_silent() {
    let listing = vec![ArtifactDescriptor {
        name: "pensiones_1_100.csv".to_string(),
        size: None,
    }];
    let (state, _) = update(AppState::new(), Msg::ArtifactsRequested);
    assert!(!state.view().artifacts_refreshed);
    let (state, _) = update(state, Msg::ArtifactsListed(Ok(listing.clone())));
    assert!(state.view().artifacts_refreshed);
    let (state, _) = update(state, Msg::ArtifactsRequested);
    let (state, effects) = update(
        state,
        Msg::ArtifactsListed(Err(RemoteError::new("network error"))),
    );

    assert!(effects.is_empty());
    assert_eq!(state.view().artifacts, listing);
    assert!(state.notifications().is_empty());
}

#[test]
fn system_info_failure_notifies_and_keeps_last_info() {
    let (state, _) = update(AppState::new(), Msg::SystemInfoRequested);
    let (state, _) = update(state, Msg::SystemInfoLoaded(Ok(SystemInfo::default())));
    let info = state.view().system_info.expect("info stored");
    assert_eq!(info.display_environment(), "Production");

    let (state, _) = update(state, Msg::SystemInfoRequested);
    let (state, effects) = update(
        state,
        Msg::SystemInfoLoaded(Err(RemoteError::new("down"))),
    );
    assert!(state.view().system_info.is_some());
    assert!(!state.is_busy());
    assert_eq!(state.notifications().len(), 1);
    let notification = &state.notifications()[0];
    assert_eq!(notification.severity, Severity::Error);
    assert_eq!(notification.message, "Error loading system info: down");
    assert!(effects
        .iter()
        .any(|effect| matches!(effect, Effect::ScheduleExpiry { id, .. } if *id == notification.id)));
}

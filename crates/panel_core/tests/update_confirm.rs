use panel_core::{
    update, AppState, Effect, LoadedRules, Msg, RemoteError, Rule, Severity, RESET_PROMPT,
};

fn init_logging() {
    panel_logging::initialize_for_tests();
}

fn remote_effects(effects: &[Effect]) -> Vec<Effect> {
    effects.iter().filter(|e| e.is_remote()).cloned().collect()
}

#[test]
fn reset_waits_for_confirmation() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ResetRequested);

    assert!(effects.is_empty());
    assert_eq!(
        state.view().pending_confirmation.as_deref(),
        Some(RESET_PROMPT)
    );
    assert!(!state.is_busy());
}

#[test]
fn confirm_issues_reset_once_and_clears_slot() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ResetRequested);
    let (state, effects) = update(state, Msg::ConfirmAccepted);

    assert_eq!(effects, vec![Effect::ResetRules]);
    assert_eq!(state.view().pending_confirmation, None);

    let (state, effects) = update(state, Msg::ConfirmAccepted);
    assert!(effects.is_empty());
    assert_eq!(state.view().in_flight, 1);
}

#[test]
fn cancel_never_issues_reset() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ResetRequested);
    let (state, effects) = update(state, Msg::ConfirmCancelled);
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::ConfirmAccepted);
    assert!(effects.is_empty());
    assert_eq!(state.view().pending_confirmation, None);
    assert!(!state.is_busy());
}

#[test]
fn confirm_and_cancel_without_request_are_noops() {
    init_logging();
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::ConfirmAccepted);
    assert_eq!(next, state);
    assert!(effects.is_empty());

    let (next, effects) = update(state.clone(), Msg::ConfirmCancelled);
    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn second_reset_request_is_rejected_while_pending() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ResetRequested);
    let (state, effects) = update(state, Msg::ResetRequested);

    assert!(remote_effects(&effects).is_empty());
    assert_eq!(state.notifications().len(), 1);
    assert_eq!(state.notifications()[0].severity, Severity::Info);

    // The first request is still the one that runs.
    let (_state, effects) = update(state, Msg::ConfirmAccepted);
    assert_eq!(effects, vec![Effect::ResetRules]);
}

#[test]
fn reset_success_reloads_and_failure_does_not() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ResetRequested);
    let (state, _) = update(state, Msg::ConfirmAccepted);
    let (state, effects) = update(state, Msg::RulesReset(Ok(())));
    assert_eq!(remote_effects(&effects), vec![Effect::FetchRules]);
    assert_eq!(state.notifications()[0].severity, Severity::Success);

    let (state, _) = update(state, Msg::RulesLoaded(Ok(LoadedRules::counted(vec![Rule::new("a", true)]))));
    let (state, _) = update(state, Msg::ResetRequested);
    let (state, _) = update(state, Msg::ConfirmAccepted);
    let (state, effects) = update(
        state,
        Msg::RulesReset(Err(RemoteError::new("connection reset"))),
    );
    assert!(remote_effects(&effects).is_empty());
    assert_eq!(state.rule_enabled("a"), Some(true));
    let last = state.notifications().last().unwrap();
    assert_eq!(last.severity, Severity::Error);
    assert!(last.message.contains("connection reset"));
    assert!(!state.is_busy());
}

use crate::{AppState, ConfirmedAction, Effect, Msg, Severity, RESET_PROMPT};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let mut effects = Vec::new();
    apply(&mut state, msg, &mut effects);
    state.track_requests(&effects);
    (state, effects)
}

fn apply(state: &mut AppState, msg: Msg, effects: &mut Vec<Effect>) {
    match msg {
        Msg::PanelOpened => {
            effects.extend([
                Effect::FetchRules,
                Effect::FetchSystemInfo,
                Effect::ListArtifacts,
            ]);
        }
        Msg::RulesRequested => effects.push(Effect::FetchRules),
        Msg::RulesLoaded(result) => {
            state.request_settled();
            match result {
                Ok(loaded) => state.rules_mut().replace(loaded),
                Err(err) => {
                    state.notify(effects, format!("Error loading rules: {err}"), Severity::Error);
                }
            }
        }
        Msg::RuleToggled { name, enabled } => {
            match state.rules_mut().apply_optimistic(&name, enabled) {
                Ok(previous) => effects.push(Effect::PatchRule {
                    name,
                    enabled,
                    previous,
                }),
                Err(err) => {
                    state.notify(effects, err.to_string(), Severity::Error);
                }
            }
        }
        Msg::RulePatched {
            name,
            enabled: _,
            previous,
            result,
        } => {
            state.request_settled();
            match result {
                Ok(()) => {
                    state.notify(
                        effects,
                        format!("Rule {name} updated"),
                        Severity::Success,
                    );
                    effects.push(Effect::FetchRules);
                }
                Err(err) => {
                    // Restore the value captured before the optimistic write.
                    state.rules_mut().revert(&name, previous);
                    state.notify(
                        effects,
                        format!("Error updating rule {name}: {err}"),
                        Severity::Error,
                    );
                }
            }
        }
        Msg::ResetRequested => {
            if let Err(busy) = state
                .confirmation_mut()
                .request(RESET_PROMPT, ConfirmedAction::ResetRules)
            {
                state.notify(effects, busy.to_string(), Severity::Info);
            }
        }
        Msg::ConfirmAccepted => {
            if let Some(action) = state.confirmation_mut().confirm() {
                run_confirmed(action, effects);
            }
        }
        Msg::ConfirmCancelled => {
            state.confirmation_mut().cancel();
        }
        Msg::RulesReset(result) => {
            state.request_settled();
            match result {
                Ok(()) => {
                    state.notify(
                        effects,
                        "Rules restored to default values",
                        Severity::Success,
                    );
                    effects.push(Effect::FetchRules);
                }
                Err(err) => {
                    state.notify(effects, format!("Error restoring rules: {err}"), Severity::Error);
                }
            }
        }
        Msg::SystemInfoRequested => effects.push(Effect::FetchSystemInfo),
        Msg::SystemInfoLoaded(result) => {
            state.request_settled();
            match result {
                Ok(info) => state.set_system_info(info),
                // The dashboard keeps the last info it had.
                Err(err) => {
                    state.notify(
                        effects,
                        format!("Error loading system info: {err}"),
                        Severity::Error,
                    );
                }
            }
        }
        Msg::CsvJobSubmitted(request) => match request.validate() {
            Ok(()) => effects.push(Effect::GenerateCsv {
                file_name: request.file_name(),
                request,
            }),
            Err(err) => {
                state.notify(effects, err.to_string(), Severity::Error);
            }
        },
        Msg::BundleJobSubmitted(request) => match request.validate() {
            Ok(()) => effects.push(Effect::GenerateBundle {
                file_name: request.file_name(),
                request,
            }),
            Err(err) => {
                state.notify(effects, err.to_string(), Severity::Error);
            }
        },
        Msg::JobFinished { kind, result } => {
            state.request_settled();
            match result {
                Ok(path) => {
                    state.jobs_mut().record_saved(kind, path);
                    state.notify(
                        effects,
                        format!("{kind} generated and saved"),
                        Severity::Success,
                    );
                    effects.push(Effect::ListArtifacts);
                }
                Err(err) => {
                    state.notify(effects, format!("Error generating {kind}: {err}"), Severity::Error);
                }
            }
        }
        Msg::ArtifactsRequested => effects.push(Effect::ListArtifacts),
        Msg::ArtifactsListed(result) => {
            state.request_settled();
            // The file list fails quietly; the previous list stays.
            if let Ok(artifacts) = result {
                state.catalog_mut().replace(artifacts);
            }
        }
        Msg::NotificationDismissed(id) => {
            if state.dismiss_notification(id) {
                effects.push(Effect::CancelExpiry { id });
            }
        }
        Msg::NotificationExpired(id) => {
            state.dismiss_notification(id);
        }
        Msg::Tick { now_ms } => state.set_clock(now_ms),
    }
}

fn run_confirmed(action: ConfirmedAction, effects: &mut Vec<Effect>) {
    match action {
        ConfirmedAction::ResetRules => effects.push(Effect::ResetRules),
    }
}

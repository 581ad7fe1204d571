use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use panel_core::{BundleJobRequest, CsvJobRequest, Msg};
use panel_engine::EngineHandle;
use panel_logging::{level_for_verbosity, panel_info, panel_warn};

use super::cli::{Cli, Commands, GenerateCommands, RuleCommands};
use super::config::load_config;
use super::effects::EffectRunner;
use super::logging;
use super::render::{render_dashboard, render_files, render_rules};
use super::session::Session;
use super::shell::run_shell;

const SETTLE_MARGIN: Duration = Duration::from_secs(5);

pub fn run_app() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::initialize(cli.log, level_for_verbosity(cli.verbose));

    let config = load_config(cli.config.as_deref())?;
    let settings = config.into_settings(cli.base_url, cli.output_dir);
    let settle_limit = settings.connect_timeout + settings.request_timeout + SETTLE_MARGIN;
    let engine = EngineHandle::new(settings).context("failed to start the engine")?;

    let stdout = io::stdout();
    let mut session = Session::new(EffectRunner::new(engine), stdout.lock(), settle_limit);
    let settled = run_command(&mut session, cli.command)?;

    if !settled {
        panel_warn!("Exiting with requests still in flight");
    }
    if session.error_count() > 0 || !settled {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_command<W: Write>(session: &mut Session<W>, command: Commands) -> anyhow::Result<bool> {
    panel_info!("Running {:?}", command);
    let settled = match command {
        Commands::Dashboard => {
            let settled = dispatch_and_settle(session, Msg::PanelOpened)?;
            session.print_lines(&render_dashboard(&session.view()))?;
            settled
        }
        Commands::Rules { command } => run_rule_command(session, command)?,
        Commands::Generate { command } => {
            let msg = match command {
                GenerateCommands::Csv { start, end } => {
                    Msg::CsvJobSubmitted(CsvJobRequest {
                        range_start: start,
                        range_end: end,
                    })
                }
                GenerateCommands::Bundle { total, per_group } => {
                    Msg::BundleJobSubmitted(BundleJobRequest {
                        total_records: total,
                        records_per_group: per_group,
                    })
                }
            };
            let settled = dispatch_and_settle(session, msg)?;
            let view = session.view();
            let saved: Vec<String> = view
                .last_csv
                .iter()
                .chain(view.last_bundle.iter())
                .map(|path| format!("Saved to {path}"))
                .collect();
            session.print_lines(&saved)?;
            settled
        }
        Commands::Files => {
            let settled = dispatch_and_settle(session, Msg::ArtifactsRequested)?;
            session.print_lines(&render_files(&session.view()))?;
            settled
        }
        Commands::Shell => {
            run_shell(session)?;
            true
        }
    };
    Ok(settled)
}

fn run_rule_command<W: Write>(
    session: &mut Session<W>,
    command: RuleCommands,
) -> anyhow::Result<bool> {
    match command {
        RuleCommands::List => {
            let settled = dispatch_and_settle(session, Msg::RulesRequested)?;
            session.print_lines(&render_rules(&session.view()))?;
            Ok(settled)
        }
        RuleCommands::Set { name, state } => {
            if !dispatch_and_settle(session, Msg::RulesRequested)? {
                return Ok(false);
            }
            dispatch_and_settle(
                session,
                Msg::RuleToggled {
                    name,
                    enabled: state.enabled(),
                },
            )
        }
        RuleCommands::Reset { yes } => {
            session.dispatch(Msg::ResetRequested)?;
            let Some(prompt) = session.view().pending_confirmation else {
                return Ok(true);
            };
            let confirmed = yes || ask(session, &prompt)?;
            if confirmed {
                dispatch_and_settle(session, Msg::ConfirmAccepted)
            } else {
                session.dispatch(Msg::ConfirmCancelled)?;
                session.print_lines(&["Cancelled".to_string()])?;
                Ok(true)
            }
        }
    }
}

fn dispatch_and_settle<W: Write>(session: &mut Session<W>, msg: Msg) -> anyhow::Result<bool> {
    session.dispatch(msg)?;
    Ok(session.settle()?)
}

fn ask<W: Write>(session: &mut Session<W>, prompt: &str) -> io::Result<bool> {
    session.print_lines(&[format!("{prompt} [y/N]")])?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

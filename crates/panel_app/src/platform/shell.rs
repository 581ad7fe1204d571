use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use panel_core::{BundleJobRequest, CsvJobRequest, Msg, NotificationId};
use panel_logging::panel_info;

use super::render::{render_dashboard, render_files, render_notification, render_rules};
use super::session::Session;

const IDLE_POLL: Duration = Duration::from_millis(50);

pub const HELP: &[&str] = &[
    "dashboard                 rule counts, environment, files",
    "rules                     list rules",
    "set <rule> on|off         toggle a rule",
    "reset                     restore all rules to defaults (asks first)",
    "yes | no                  answer the pending confirmation",
    "csv <start> <end>         generate a CSV for an id range",
    "bundle <total> <per-group> generate a ZIP bundle",
    "files                     list generated files",
    "notifications             show visible notifications",
    "dismiss <id>              dismiss a notification",
    "quit                      leave the shell",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Dashboard,
    Rules,
    Set { name: String, enabled: bool },
    Reset,
    Confirm,
    Cancel,
    Csv(CsvJobRequest),
    Bundle(BundleJobRequest),
    Files,
    Notifications,
    Dismiss(NotificationId),
    Quit,
    Empty,
}

pub fn parse_shell_command(line: &str) -> Result<ShellCommand, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        [] => ShellCommand::Empty,
        ["help" | "?"] => ShellCommand::Help,
        ["dashboard"] => ShellCommand::Dashboard,
        ["rules"] => ShellCommand::Rules,
        ["set", name, state] => ShellCommand::Set {
            name: (*name).to_string(),
            enabled: parse_switch(state)?,
        },
        ["reset"] => ShellCommand::Reset,
        ["yes" | "y"] => ShellCommand::Confirm,
        ["no" | "n"] => ShellCommand::Cancel,
        ["csv", start, end] => ShellCommand::Csv(CsvJobRequest {
            range_start: parse_number(start)?,
            range_end: parse_number(end)?,
        }),
        ["bundle", total, per_group] => ShellCommand::Bundle(BundleJobRequest {
            total_records: parse_number(total)?,
            records_per_group: parse_number(per_group)?,
        }),
        ["files"] => ShellCommand::Files,
        ["notifications"] => ShellCommand::Notifications,
        ["dismiss", id] => ShellCommand::Dismiss(parse_number(id)?),
        ["quit" | "exit"] => ShellCommand::Quit,
        [other, ..] => return Err(format!("unknown command `{other}` (try `help`)")),
    };
    Ok(command)
}

fn parse_switch(word: &str) -> Result<bool, String> {
    match word {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(format!("expected on or off, got `{other}`")),
    }
}

fn parse_number<T: std::str::FromStr>(word: &str) -> Result<T, String> {
    word.parse()
        .map_err(|_| format!("`{word}` is not a valid number"))
}

/// Runs the interactive loop until `quit` or end of input.
///
/// Engine events keep flowing while waiting for input, so notifications
/// expire and results print as they arrive.
pub fn run_shell<W: Write>(session: &mut Session<W>) -> io::Result<()> {
    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    session.dispatch(Msg::PanelOpened)?;
    session.print_lines(&["Type `help` for commands.".to_string()])?;
    loop {
        match line_rx.try_recv() {
            Ok(line) => match parse_shell_command(&line) {
                Ok(ShellCommand::Quit) => break,
                Ok(command) => execute(session, command)?,
                Err(message) => session.print_lines(&[message])?,
            },
            Err(mpsc::TryRecvError::Empty) => session.poll(IDLE_POLL)?,
            Err(mpsc::TryRecvError::Disconnected) => break,
        }
    }
    panel_info!("Shell closed");
    Ok(())
}

fn execute<W: Write>(session: &mut Session<W>, command: ShellCommand) -> io::Result<()> {
    match command {
        ShellCommand::Help => {
            let lines: Vec<String> = HELP.iter().map(|line| line.to_string()).collect();
            session.print_lines(&lines)
        }
        ShellCommand::Dashboard => session.print_lines(&render_dashboard(&session.view())),
        ShellCommand::Rules => session.print_lines(&render_rules(&session.view())),
        ShellCommand::Files => session.print_lines(&render_files(&session.view())),
        ShellCommand::Notifications => {
            let lines: Vec<String> = session
                .view()
                .notifications
                .iter()
                .map(render_notification)
                .collect();
            session.print_lines(&lines)
        }
        ShellCommand::Set { name, enabled } => {
            session.dispatch(Msg::RuleToggled { name, enabled })
        }
        ShellCommand::Reset => {
            session.dispatch(Msg::ResetRequested)?;
            if let Some(prompt) = session.view().pending_confirmation {
                session.print_lines(&[format!("{prompt} (yes/no)")])?;
            }
            Ok(())
        }
        ShellCommand::Confirm => session.dispatch(Msg::ConfirmAccepted),
        ShellCommand::Cancel => session.dispatch(Msg::ConfirmCancelled),
        ShellCommand::Csv(request) => session.dispatch(Msg::CsvJobSubmitted(request)),
        ShellCommand::Bundle(request) => session.dispatch(Msg::BundleJobSubmitted(request)),
        ShellCommand::Dismiss(id) => session.dispatch(Msg::NotificationDismissed(id)),
        ShellCommand::Quit | ShellCommand::Empty => Ok(()),
    }
}

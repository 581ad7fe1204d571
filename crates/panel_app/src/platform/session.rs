use std::io::{self, Write};
use std::time::{Duration, Instant};

use chrono::Utc;
use panel_core::{update, AppState, AppViewModel, Msg, NotificationId, Severity};
use panel_logging::{panel_debug, panel_error, panel_warn};

use super::effects::EffectRunner;
use super::render::render_notification;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Drives the core state machine against the engine and prints notifications
/// as they are posted.
pub struct Session<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
    last_printed: NotificationId,
    errors: usize,
    settle_limit: Duration,
}

impl<W: Write> Session<W> {
    /// `settle_limit` bounds how long [`Session::settle`] waits without any engine event.
    pub fn new(runner: EffectRunner, out: W, settle_limit: Duration) -> Self {
        Self {
            state: AppState::new(),
            runner,
            out,
            last_printed: 0,
            errors: 0,
            settle_limit,
        }
    }

    pub fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        self.apply(Msg::Tick { now_ms: now_ms() });
        panel_debug!("Dispatch {:?}", msg);
        self.apply(msg);
        self.print_new_notifications()
    }

    /// Feeds engine results back until no request is in flight.
    ///
    /// Returns `false` if the engine went quiet for longer than the settle limit.
    pub fn settle(&mut self) -> io::Result<bool> {
        let mut last_event = Instant::now();
        while self.state.is_busy() {
            match self.runner.next_msg(POLL_INTERVAL) {
                Some(msg) => {
                    last_event = Instant::now();
                    self.dispatch(msg)?;
                }
                None if last_event.elapsed() >= self.settle_limit => {
                    panel_warn!(
                        "Gave up waiting for {} outstanding request(s)",
                        self.runner.outstanding()
                    );
                    return Ok(false);
                }
                None => {}
            }
        }
        Ok(true)
    }

    /// Handles at most one engine event, waiting up to `timeout` for it.
    pub fn poll(&mut self, timeout: Duration) -> io::Result<()> {
        match self.runner.next_msg(timeout) {
            Some(msg) => self.dispatch(msg),
            None => Ok(()),
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn print_lines(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }

    /// Number of error notifications posted so far.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    fn apply(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn print_new_notifications(&mut self) -> io::Result<()> {
        let fresh: Vec<_> = self
            .state
            .notifications()
            .iter()
            .filter(|n| n.id > self.last_printed)
            .cloned()
            .collect();
        for notification in fresh {
            if notification.severity == Severity::Error {
                self.errors += 1;
                panel_error!("#{} {}", notification.id, notification.message);
            }
            self.last_printed = notification.id;
            writeln!(self.out, "{}", render_notification(&notification))?;
        }
        self.out.flush()
    }
}

fn now_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

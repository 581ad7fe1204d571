use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation<A> {
    pub message: String,
    pub action: A,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("another confirmation is already pending")]
pub struct GateBusy;

/// Single-slot holder for an action awaiting operator confirmation.
///
/// While a confirmation is pending, further requests are rejected and the
/// first one is kept. An action leaves the gate only through
/// [`ConfirmationGate::confirm`], and only once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationGate<A> {
    pending: Option<PendingConfirmation<A>>,
}

impl<A> Default for ConfirmationGate<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> ConfirmationGate<A> {
    pub fn request(&mut self, message: impl Into<String>, action: A) -> Result<(), GateBusy> {
        if self.pending.is_some() {
            return Err(GateBusy);
        }
        self.pending = Some(PendingConfirmation {
            message: message.into(),
            action,
        });
        Ok(())
    }

    /// Clears the slot and hands back the action to run, if any.
    pub fn confirm(&mut self) -> Option<A> {
        self.pending.take().map(|pending| pending.action)
    }

    /// Clears the slot without running the action. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn pending(&self) -> Option<&PendingConfirmation<A>> {
        self.pending.as_ref()
    }
}

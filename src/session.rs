//! Chat session state
//!
//! The minimum the chat loop needs to sequence generate -> preview ->
//! confirm/cancel: the conversation so far, the workflow awaiting
//! confirmation, and a guard that refuses a second request while one is in
//! flight. Methods take `&self` so a session can be shared behind an `Arc`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::api::check_message;
use crate::error::{FlowError, SessionError};
use crate::orchestrator::{Orchestrator, SubmissionReceipt};
use crate::provider::Message;
use crate::workflow::GeneratedWorkflow;

#[derive(Debug, Default)]
struct SessionState {
    history: Vec<Message>,
    pending: Option<GeneratedWorkflow>,
}

#[derive(Debug, Default)]
pub struct ChatSession {
    state: Mutex<SessionState>,
    busy: AtomicBool,
}

/// Clears the busy flag when dropped
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SessionError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SessionError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn history(&self) -> Vec<Message> {
        self.state().history.clone()
    }

    pub fn pending(&self) -> Option<GeneratedWorkflow> {
        self.state().pending.clone()
    }

    /// Generate a workflow for `text` and hold it for confirmation.
    ///
    /// Replaces any workflow still pending. The exchange is added to the
    /// history only when generation succeeds.
    pub async fn ask(
        &self,
        orchestrator: &Orchestrator,
        text: &str,
    ) -> Result<GeneratedWorkflow, FlowError> {
        let message = check_message(&serde_json::Value::String(text.to_string()))?.to_string();
        let _guard = InFlight::acquire(&self.busy)?;

        let history = {
            let mut state = self.state();
            state.pending = None;
            state.history.clone()
        };

        let generated = orchestrator.generate(&message, &history).await?;

        let mut state = self.state();
        state.history.push(Message::user(message));
        state
            .history
            .push(Message::assistant(generated.original.to_string()));
        state.pending = Some(generated.clone());
        debug!(turns = state.history.len(), "workflow pending confirmation");

        Ok(generated)
    }

    /// Submit the pending workflow.
    ///
    /// On failure the workflow stays pending so the user can retry.
    pub async fn confirm(
        &self,
        orchestrator: &Orchestrator,
    ) -> Result<SubmissionReceipt, FlowError> {
        let _guard = InFlight::acquire(&self.busy)?;
        let workflow = self
            .state()
            .pending
            .as_ref()
            .map(|p| p.workflow.to_value())
            .ok_or(SessionError::NothingPending)?;

        let receipt = orchestrator.submit(&workflow).await?;
        self.state().pending = None;
        Ok(receipt)
    }

    /// Drop the pending workflow.
    pub fn cancel(&self) -> Result<GeneratedWorkflow, SessionError> {
        self.state().pending.take().ok_or(SessionError::NothingPending)
    }

    /// Forget the conversation and any pending workflow.
    pub fn clear(&self) {
        let mut state = self.state();
        state.history.clear();
        state.pending = None;
    }
}

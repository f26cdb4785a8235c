//! The editing session: one caregiver note moving through draft and final.

use pflegedoc_client::{CallError, Optimize};
use pflegedoc_core::{
    Config, DocumentationEntry, Mode, OptimizationLevel, OptimizationResult, StoredEntry,
    ValidationError, validate_documentation_text, validate_patient_name,
};
use pflegedoc_store::EntryStore;
use thiserror::Error;
use tracing::{info, warn};

/// Where the session stands.
///
/// Submission is the span of the in-flight [`Session::submit`] call; the
/// `&mut self` receiver guarantees at most one call is outstanding, so no
/// separate state is needed for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No result yet; inputs are being edited.
    Idle,
    /// An optimization result is held in memory and may be edited and saved.
    Reviewing,
    /// The entry went final. Terminal; no further edits.
    Finalized,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Optimize(#[from] CallError),
    /// Finalize requires a persisted entry; also raised when save or finalize
    /// is attempted with nothing under review. Checked locally, before any
    /// network call.
    #[error("no entry under review")]
    NoEntry,
    /// The store rejected or failed the named operation. The in-memory state
    /// is kept; the user may re-trigger the action.
    #[error("store rejected the {0} operation")]
    Store(&'static str),
    #[error("entry is finalized and can no longer be edited")]
    Finalized,
    #[error("a result is already under review")]
    NotIdle,
}

/// Orchestrates one entry through validate → optimize → persist → finalize.
///
/// Generic over the optimizer and store seams so the flow can be driven
/// against in-memory fakes in tests.
pub struct Session<O, S> {
    optimizer: O,
    store: S,
    max_text_length: usize,
    state: SessionState,
    result: Option<OptimizationResult>,
    entry_id: Option<String>,
}

impl<O: Optimize, S: EntryStore> Session<O, S> {
    pub fn new(optimizer: O, store: S, config: &Config) -> Self {
        Self {
            optimizer,
            store,
            max_text_length: config.max_text_length,
            state: SessionState::Idle,
            result: None,
            entry_id: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The result under review, if any.
    pub fn result(&self) -> Option<&OptimizationResult> {
        self.result.as_ref()
    }

    /// Identifier of the persisted draft. `None` when the create failed and
    /// the result lives in memory only.
    pub fn entry_id(&self) -> Option<&str> {
        self.entry_id.as_deref()
    }

    /// Validate, optimize, and persist a new submission.
    ///
    /// Validation failures never reach the network. A remote failure leaves
    /// the session `Idle` with nothing persisted. A persistence failure after
    /// a successful optimization still moves to `Reviewing`: the completed
    /// work stays visible even though the draft was not stored.
    pub async fn submit(
        &mut self,
        patient_name: &str,
        mode: Mode,
        text: &str,
        level: OptimizationLevel,
    ) -> Result<&OptimizationResult, SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::NotIdle);
        }

        validate_patient_name(patient_name)?;
        validate_documentation_text(text, self.max_text_length)?;

        let entry = DocumentationEntry {
            patient_name: patient_name.trim().to_string(),
            mode,
            original_text: text.trim().to_string(),
            optimization_level: level,
        };

        let result = self.optimizer.optimize(&entry).await?;

        match self.store.create(&entry, &result).await {
            Some(stored) => self.entry_id = Some(stored.id),
            None => warn!("draft not persisted; keeping result in memory only"),
        }

        self.state = SessionState::Reviewing;
        Ok(self.result.insert(result))
    }

    /// Apply an edit to the optimized text and persist it.
    ///
    /// The in-memory text is updated first; a store failure leaves it in
    /// place with the persisted copy stale. That divergence is surfaced as an
    /// error and not reconciled automatically.
    pub async fn save(&mut self, edited_text: &str) -> Result<(), SessionError> {
        match self.state {
            SessionState::Finalized => return Err(SessionError::Finalized),
            SessionState::Idle => return Err(SessionError::NoEntry),
            SessionState::Reviewing => {}
        }
        let result = self.result.as_mut().ok_or(SessionError::NoEntry)?;
        result.optimized_text = edited_text.to_string();

        let Some(id) = self.entry_id.as_deref() else {
            warn!("no persisted draft; edit kept in memory only");
            return Ok(());
        };
        if self.store.update_text(id, edited_text).await.is_none() {
            return Err(SessionError::Store("update"));
        }
        Ok(())
    }

    /// Freeze the entry. Irreversible.
    ///
    /// Requires a persisted draft: with no entry id this fails locally and
    /// performs no store call. On store failure the session stays in
    /// `Reviewing` with edits retained.
    pub async fn finalize(&mut self) -> Result<StoredEntry, SessionError> {
        match self.state {
            SessionState::Finalized => return Err(SessionError::Finalized),
            SessionState::Idle => return Err(SessionError::NoEntry),
            SessionState::Reviewing => {}
        }
        let id = self.entry_id.as_deref().ok_or(SessionError::NoEntry)?;
        let text = self
            .result
            .as_ref()
            .map(|r| r.optimized_text.clone())
            .ok_or(SessionError::NoEntry)?;

        let stored = self
            .store
            .finalize(id, &text)
            .await
            .ok_or(SessionError::Store("finalize"))?;

        info!(id = %stored.id, "entry finalized");
        self.state = SessionState::Finalized;
        Ok(stored)
    }

    /// Discard the in-session result and start over with a fresh entry.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.result = None;
        self.entry_id = None;
    }
}

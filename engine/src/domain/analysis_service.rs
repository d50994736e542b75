//! AI analysis collaborator integration.
//!
//! The provider is an opaque one-shot call over a read-only child snapshot.
//! Each child has a single last-write-wins result slot: a newer request
//! simply overwrites whatever a previous one left behind, and no attempt is
//! made to tell a stale in-flight response from a fresh one. Provider
//! failures are converted into a displayable message and never propagate.

use anyhow::Result;
use log::{info, warn};
use shared::{ChildSnapshot, RenderedDocument};
use std::collections::HashMap;
use std::sync::Mutex;

use super::markdown;

/// Message shown inline when the collaborator fails for any reason.
pub const ANALYSIS_ERROR_MESSAGE: &str =
    "Analysis is unavailable right now. Please try again.";

/// One-shot analysis collaborator. Implementations wrap the remote service;
/// tests use fakes.
pub trait AnalysisProvider: Send + Sync {
    /// Produce free-text analysis (constrained markdown) for one child.
    fn analyze(&self, snapshot: &ChildSnapshot) -> Result<String>;
}

/// Outcome of an analysis request, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Rendered report, ready for display.
    Report(RenderedDocument),
    /// Displayable failure message.
    Failed(String),
}

/// Per-child result slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSlot {
    pub loading: bool,
    pub outcome: Option<AnalysisOutcome>,
}

/// Wraps a provider and owns the per-child result slots.
pub struct AnalysisService<P: AnalysisProvider> {
    provider: P,
    slots: Mutex<HashMap<String, AnalysisSlot>>,
}

impl<P: AnalysisProvider> AnalysisService<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Run one analysis request for a child, overwriting any previous slot
    /// content for that child. Returns the outcome that was stored.
    pub fn request(&self, snapshot: &ChildSnapshot) -> AnalysisOutcome {
        info!("Requesting analysis for child {}", snapshot.id);
        self.slots.lock().unwrap().insert(
            snapshot.id.clone(),
            AnalysisSlot { loading: true, outcome: None },
        );

        let outcome = match self.provider.analyze(snapshot) {
            Ok(text) => AnalysisOutcome::Report(markdown::render(&text)),
            Err(e) => {
                warn!("Analysis provider failed for {}: {}", snapshot.id, e);
                AnalysisOutcome::Failed(ANALYSIS_ERROR_MESSAGE.to_string())
            }
        };

        self.slots.lock().unwrap().insert(
            snapshot.id.clone(),
            AnalysisSlot { loading: false, outcome: Some(outcome.clone()) },
        );
        outcome
    }

    /// The current slot for a child, if a request was ever made.
    pub fn slot(&self, child_id: &str) -> Option<AnalysisSlot> {
        self.slots.lock().unwrap().get(child_id).cloned()
    }

    pub fn is_loading(&self, child_id: &str) -> bool {
        self.slots
            .lock()
            .unwrap()
            .get(child_id)
            .map(|slot| slot.loading)
            .unwrap_or(false)
    }
}

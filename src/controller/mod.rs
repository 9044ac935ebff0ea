//! Controller — one conversational turn at a time.
//!
//! DESIGN
//! ======
//! The controller owns the conversation and a two-state phase:
//!
//! ```text
//!   Idle --begin(query)--> Processing --complete(outcome)--> Idle
//! ```
//!
//! `begin` is the only way into `Processing` and hands out the single
//! [`PendingTurn`] that can leave it. The turn resolves its request without
//! borrowing the controller, so a caller can keep feeding input while the
//! request is in flight; `begin` refuses all of it until `complete` runs.
//! This is what keeps at most one request outstanding and keeps replies in
//! request order.
//!
//! ERROR HANDLING
//! ==============
//! Analysis failures never escape a turn: they become an assistant entry
//! prefixed with [`ERROR_PREFIX`] and the phase returns to `Idle`.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::{AnalysisClient, AnalysisError, AnalysisResult};
use crate::conversation::{ConversationStore, MessageEntry};
use crate::series::to_series;

/// Prefix of the assistant message appended when a request fails.
pub const ERROR_PREFIX: &str = "Server error: ";

// =============================================================================
// TYPES
// =============================================================================

/// Submission phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Processing { turn: Uuid, query: String },
}

/// A started turn whose request has not been made yet.
///
/// Produced only by [`InteractionController::begin`]; consumed by
/// [`PendingTurn::resolve`].
pub struct PendingTurn {
    turn: Uuid,
    query: String,
    client: Arc<dyn AnalysisClient>,
}

/// Outcome of a resolved turn, ready for [`InteractionController::complete`].
#[derive(Debug)]
pub struct TurnOutcome {
    turn: Uuid,
    result: Result<AnalysisResult, AnalysisError>,
}

impl PendingTurn {
    /// The trimmed query this turn will send.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Perform the single analysis round trip for this turn.
    pub async fn resolve(self) -> TurnOutcome {
        let result = self.client.analyze(&self.query).await;
        TurnOutcome { turn: self.turn, result }
    }
}

impl TurnOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct InteractionController {
    client: Arc<dyn AnalysisClient>,
    store: ConversationStore,
    phase: Phase,
}

impl InteractionController {
    /// A controller in `Idle` with a fresh conversation.
    #[must_use]
    pub fn new(client: Arc<dyn AnalysisClient>) -> Self {
        Self { client, store: ConversationStore::new(), phase: Phase::Idle }
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        matches!(self.phase, Phase::Processing { .. })
    }

    #[must_use]
    pub fn conversation(&self) -> &ConversationStore {
        &self.store
    }

    /// Start a turn for `query`.
    ///
    /// Returns `None` without side effects when the trimmed query is empty
    /// or a turn is already in flight. Otherwise appends the user entry and
    /// moves to `Processing`.
    pub fn begin(&mut self, query: &str) -> Option<PendingTurn> {
        let query = query.trim();
        if query.is_empty() {
            debug!("controller: ignoring blank submission");
            return None;
        }
        if self.is_processing() {
            debug!(query_len = query.len(), "controller: ignoring submission while processing");
            return None;
        }

        let turn = Uuid::new_v4();
        self.store.append(MessageEntry::user(query));
        self.phase = Phase::Processing { turn, query: query.to_owned() };
        info!(%turn, query_len = query.len(), "controller: turn started");

        Some(PendingTurn { turn, query: query.to_owned(), client: Arc::clone(&self.client) })
    }

    /// Finish the in-flight turn with its outcome and return to `Idle`.
    ///
    /// Returns the appended assistant entry, or `None` if `outcome` does not
    /// belong to the current turn.
    pub fn complete(&mut self, outcome: TurnOutcome) -> Option<&MessageEntry> {
        match &self.phase {
            Phase::Processing { turn, .. } if *turn == outcome.turn => {}
            _ => {
                warn!(turn = %outcome.turn, "controller: dropping outcome for a turn that is not in flight");
                return None;
            }
        }

        let entry = match outcome.result {
            Ok(result) => {
                let series = to_series(result.chart.as_deref(), result.is_comparison, &result.areas);
                info!(
                    turn = %outcome.turn,
                    is_comparison = result.is_comparison,
                    points = series.len(),
                    table_rows = result.table.len(),
                    "controller: turn answered"
                );
                MessageEntry::reply(result.summary, Some(series), result.table, result.is_comparison, result.chart_type)
            }
            Err(e) => {
                warn!(turn = %outcome.turn, error = %e, "controller: turn failed");
                MessageEntry::assistant(format!("{ERROR_PREFIX}{e}"))
            }
        };

        self.store.append(entry);
        self.phase = Phase::Idle;
        self.store.last()
    }

    /// Run a whole turn: `begin`, resolve the request, `complete`.
    ///
    /// Returns `false` when the submission was ignored.
    pub async fn submit(&mut self, query: &str) -> bool {
        let Some(pending) = self.begin(query) else {
            return false;
        };
        let outcome = pending.resolve().await;
        self.complete(outcome);
        true
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

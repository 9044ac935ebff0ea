//! Interactive terminal session driving the controller.
//!
//! DESIGN
//! ======
//! The loop owns the controller and at most one in-flight turn future. It
//! `select!`s between that future and the next input line, so input keeps
//! flowing while a request is pending; the controller refuses new questions
//! until the turn completes. The in-flight branch is polled first so a
//! finished turn is always recorded before more input is handled.
//!
//! Ending the session (EOF or `/quit`) waits for an in-flight turn rather
//! than cancelling it.

use std::path::PathBuf;
use std::pin::Pin;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::analysis::AnalysisError;
use crate::config::ConfigError;
use crate::controller::{InteractionController, Phase, TurnOutcome};
use crate::export::{ExportError, write_csv};
use crate::render::render_entry;

/// Starter questions offered by `/samples`.
pub const SAMPLE_QUERIES: [&str; 3] = [
    "Give me analysis of Wakad",
    "Compare Ambegaon Budruk and Aundh demand trends",
    "Show price growth for Akurdi over the last 3 years",
];

const HELP: &str = "Commands: /samples, /sample N, /export, /history, /quit. Anything else is sent as a question.";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// COMMANDS
// =============================================================================

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Samples,
    Sample(usize),
    Export,
    History,
    Quit,
    Help,
}

/// Parse a raw input line. Anything not starting with `/` is a question,
/// including blank lines, which the controller ignores.
#[must_use]
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Ask(line.to_owned());
    };

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("samples"), None, None) => Command::Samples,
        (Some("sample"), Some(n), None) => match n.parse::<usize>() {
            Ok(n) if (1..=SAMPLE_QUERIES.len()).contains(&n) => Command::Sample(n),
            _ => Command::Help,
        },
        (Some("export"), None, None) => Command::Export,
        (Some("history"), None, None) => Command::History,
        (Some("quit" | "exit"), None, None) => Command::Quit,
        _ => Command::Help,
    }
}

// =============================================================================
// LOOP
// =============================================================================

type InFlight = Pin<Box<dyn Future<Output = TurnOutcome> + Send>>;

async fn emit<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> std::io::Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.flush().await
}

/// Run the session until EOF or `/quit`.
///
/// # Errors
///
/// Returns [`SessionError::Io`] if reading input or writing output fails.
/// Analysis and export failures are reported inside the session.
pub async fn run<R, W>(
    mut controller: InteractionController,
    input: R,
    mut output: W,
    export_dir: PathBuf,
) -> Result<(), SessionError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    for entry in controller.conversation().all() {
        emit(&mut output, &render_entry(entry)).await?;
    }
    emit(&mut output, &format!("{HELP}\n\n")).await?;

    let mut lines = input.lines();
    let mut in_flight: Option<InFlight> = None;

    loop {
        tokio::select! {
            biased;

            outcome = async {
                match in_flight.as_mut() {
                    Some(turn) => turn.await,
                    None => std::future::pending().await,
                }
            }, if in_flight.is_some() => {
                in_flight = None;
                finish_turn(&mut controller, outcome, &mut output).await?;
            }

            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Command::Quit => break,
                    Command::Ask(query) => ask(&mut controller, &query, false, &mut in_flight, &mut output).await?,
                    Command::Sample(n) => {
                        ask(&mut controller, SAMPLE_QUERIES[n - 1], true, &mut in_flight, &mut output).await?;
                    }
                    Command::Samples => {
                        let list: String = SAMPLE_QUERIES
                            .iter()
                            .enumerate()
                            .map(|(i, q)| format!("  {}. {q}\n", i + 1))
                            .collect();
                        emit(&mut output, &format!("Try these queries:\n{list}\n")).await?;
                    }
                    Command::Export => {
                        let message = export_latest(&controller, &export_dir).await;
                        emit(&mut output, &format!("{message}\n\n")).await?;
                    }
                    Command::History => {
                        for entry in controller.conversation().all() {
                            emit(&mut output, &format!("{}\n", render_entry(entry))).await?;
                        }
                    }
                    Command::Help => emit(&mut output, &format!("{HELP}\n\n")).await?,
                }
            }
        }
    }

    if let Some(pending) = in_flight.take() {
        debug!("session: waiting for in-flight turn before exit");
        let outcome = pending.await;
        finish_turn(&mut controller, outcome, &mut output).await?;
    }

    info!(messages = controller.conversation().len(), "session: ended");
    Ok(())
}

/// Start a turn for `query`. With `echo`, the user entry is printed too
/// (the question did not come from the keyboard).
async fn ask<W: AsyncWrite + Unpin>(
    controller: &mut InteractionController,
    query: &str,
    echo: bool,
    in_flight: &mut Option<InFlight>,
    output: &mut W,
) -> std::io::Result<()> {
    let Some(pending) = controller.begin(query) else {
        // Refused submissions add nothing to the conversation; a question
        // typed mid-turn gets a one-line notice so it is not lost silently.
        if let Phase::Processing { query: current, .. } = controller.phase() {
            if !query.trim().is_empty() {
                let notice = format!("Still analyzing \"{current}\"; ask again once it answers.\n\n");
                emit(output, &notice).await?;
            }
        }
        return Ok(());
    };
    let notice = format!("Analyzing data... ({})\n\n", pending.query());
    *in_flight = Some(Box::pin(pending.resolve()));

    if echo {
        if let Some(entry) = controller.conversation().last() {
            let text = render_entry(entry);
            emit(output, &text).await?;
        }
    }
    emit(output, &notice).await
}

async fn finish_turn<W: AsyncWrite + Unpin>(
    controller: &mut InteractionController,
    outcome: TurnOutcome,
    output: &mut W,
) -> std::io::Result<()> {
    debug!(success = outcome.is_success(), "session: turn resolved");
    if let Some(entry) = controller.complete(outcome) {
        let text = format!("{}\n", render_entry(entry));
        emit(output, &text).await?;
    }
    Ok(())
}

async fn export_latest(controller: &InteractionController, dir: &std::path::Path) -> String {
    let Some(table) = controller.conversation().latest_table() else {
        return ExportError::EmptyTable.to_string();
    };
    match write_csv(table, dir).await {
        Ok(path) => format!("Exported {} rows to {}", table.len(), path.display()),
        Err(e) => format!("Export failed: {e}"),
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

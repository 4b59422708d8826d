//! Batch action dispatcher
//!
//! Turns a frozen copy of the selection into one engine call per item and
//! collects per-item results. Partial failure is normal: succeeded ids leave
//! the selection, failed ids stay selected so the user can retry.

use std::collections::HashSet;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::engine::{DiffEngine, EngineError, ItemId, MergeDirection, Side};
use crate::selection::SelectionModel;
use crate::toast::Severity;

/// The operation applied to every item of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOp {
    Merge(MergeDirection),
    Delete(Side),
}

impl BatchOp {
    fn verb(self) -> &'static str {
        match self {
            BatchOp::Merge(_) => "merge",
            BatchOp::Delete(_) => "delete",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            BatchOp::Merge(_) => "Merged",
            BatchOp::Delete(_) => "Deleted",
        }
    }

    /// Trailing qualifier, e.g. "left-to-right" or "from left"
    fn qualifier(self) -> String {
        match self {
            BatchOp::Merge(direction) => direction.label().to_string(),
            BatchOp::Delete(side) => format!("from {side}"),
        }
    }
}

fn items(n: usize) -> String {
    if n == 1 {
        "1 item".to_string()
    } else {
        format!("{n} items")
    }
}

/// An operation bound to the ids selected when it was captured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCommand {
    op: BatchOp,
    items: Vec<ItemId>,
}

impl BatchCommand {
    /// Freeze the current selection. Later selection changes do not affect it.
    pub fn capture(op: BatchOp, selection: &SelectionModel) -> Self {
        Self::for_items(op, selection.snapshot())
    }

    /// Build a command over explicit ids, dropping duplicates
    pub fn for_items(op: BatchOp, ids: impl IntoIterator<Item = ItemId>) -> Self {
        let mut seen = HashSet::new();
        let items = ids.into_iter().filter(|id| seen.insert(id.clone())).collect();
        Self { op, items }
    }

    pub fn op(&self) -> BatchOp {
        self.op
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn describe(&self) -> String {
        format!("{} {} {}", self.op.verb(), items(self.items.len()), self.op.qualifier())
    }

    /// Question shown in the confirm dialog
    pub fn confirm_prompt(&self) -> String {
        let target = match self.items.as_slice() {
            [only] => only.to_string(),
            many => items(many.len()),
        };
        match self.op {
            BatchOp::Merge(direction) => format!(
                "Merge {} {} ({})?",
                target,
                direction.arrow(),
                direction.label()
            ),
            BatchOp::Delete(side) => format!("Delete {target} from the {side} side?"),
        }
    }
}

/// Result of the engine call for one id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResult {
    pub id: ItemId,
    pub result: Result<(), EngineError>,
}

/// Per-item results of a completed batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub op: BatchOp,
    pub results: Vec<ItemResult>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &ItemId> {
        self.results
            .iter()
            .filter(|r| r.result.is_ok())
            .map(|r| &r.id)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&ItemId, &EngineError)> {
        self.results
            .iter()
            .filter_map(|r| r.result.as_ref().err().map(|err| (&r.id, err)))
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// The single toast summarizing this batch
    pub fn notification(&self) -> (String, Severity) {
        let failed = self.failed_count();
        match self.failures().next() {
            None => (
                format!(
                    "{} {} {}",
                    self.op.past_tense(),
                    items(self.total()),
                    self.op.qualifier()
                ),
                Severity::Success,
            ),
            Some((_, first)) => (
                format!(
                    "{} of {} items failed to {}: {}",
                    failed,
                    self.total(),
                    self.op.verb(),
                    first
                ),
                Severity::Error,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The captured id list was empty; the engine was not contacted
    NothingSelected(BatchOp),
    Completed(BatchReport),
}

impl BatchOutcome {
    /// Remove succeeded ids from the selection. Failed ids stay selected.
    pub fn apply(&self, selection: &mut SelectionModel) {
        if let BatchOutcome::Completed(report) = self {
            selection.remove_many(report.succeeded());
        }
    }

    /// Toast for this outcome, `None` when nothing happened
    pub fn notification(&self) -> Option<(String, Severity)> {
        match self {
            BatchOutcome::NothingSelected(_) => None,
            BatchOutcome::Completed(report) => Some(report.notification()),
        }
    }
}

/// Sends batch commands to the engine
pub struct BatchDispatcher<E: ?Sized> {
    engine: Arc<E>,
}

impl<E: DiffEngine + ?Sized> BatchDispatcher<E> {
    pub fn new(engine: Arc<E>) -> Self {
        Self { engine }
    }

    /// Run `command`, one engine call per id, in order
    pub async fn execute(&self, command: BatchCommand) -> BatchOutcome {
        if command.is_empty() {
            debug!("Batch {:?} skipped: nothing selected", command.op);
            return BatchOutcome::NothingSelected(command.op);
        }

        info!("Dispatching {}", command.describe());

        let mut results = Vec::with_capacity(command.items.len());
        for id in command.items {
            let result = match command.op {
                BatchOp::Merge(direction) => self.engine.merge_item(&id, direction).await,
                BatchOp::Delete(side) => self.engine.delete_item(&id, side).await,
            };
            if let Err(err) = &result {
                warn!("Failed to {} {}: {}", command.op.verb(), id, err);
            }
            results.push(ItemResult { id, result });
        }

        BatchOutcome::Completed(BatchReport {
            op: command.op,
            results,
        })
    }
}

/// Background thread running batches on its own current-thread runtime
///
/// The UI thread submits commands and polls outcomes between frames.
pub struct BatchWorker {
    commands: Option<UnboundedSender<BatchCommand>>,
    outcomes: UnboundedReceiver<BatchOutcome>,
    handle: Option<JoinHandle<()>>,
    pending: usize,
}

impl BatchWorker {
    pub fn spawn<E>(engine: Arc<E>) -> io::Result<Self>
    where
        E: DiffEngine + ?Sized + 'static,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (command_tx, mut command_rx) = mpsc::unbounded_channel::<BatchCommand>();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let dispatcher = BatchDispatcher::new(engine);

        let handle = thread::Builder::new()
            .name("batch-worker".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    while let Some(command) = command_rx.recv().await {
                        let outcome = dispatcher.execute(command).await;
                        if outcome_tx.send(outcome).is_err() {
                            break;
                        }
                    }
                });
                debug!("Batch worker stopped");
            })?;

        Ok(Self {
            commands: Some(command_tx),
            outcomes: outcome_rx,
            handle: Some(handle),
            pending: 0,
        })
    }

    /// Queue a command. Returns false once the worker has shut down.
    pub fn submit(&mut self, command: BatchCommand) -> bool {
        let sent = self
            .commands
            .as_ref()
            .is_some_and(|tx| tx.send(command).is_ok());
        if sent {
            self.pending += 1;
        }
        sent
    }

    /// Next finished outcome, without blocking
    pub fn try_next(&mut self) -> Option<BatchOutcome> {
        let outcome = self.outcomes.try_recv().ok()?;
        self.pending = self.pending.saturating_sub(1);
        Some(outcome)
    }

    /// Whether submitted batches are still running
    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    /// Stop accepting work and wait for in-flight batches to finish
    pub fn shutdown(&mut self) {
        self.commands = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Batch worker panicked");
            }
        }
    }
}

impl Drop for BatchWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Single-run controller
///
/// The platform allows one simulated run at a time. Each run holds a token
/// carrying a shared cancellation flag; starting a new run cancels whichever
/// run currently owns the slot, and the stop endpoint flips the flag for a
/// specific workflow. The engine checks the flag between nodes, never
/// mid-node, so a stop takes effect at the next step boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Guard over the single active simulated run
#[derive(Debug, Default)]
pub struct RunController {
    /// The run currently owning the execution slot, if any
    active: Mutex<Option<ActiveRun>>,
}

#[derive(Debug)]
struct ActiveRun {
    workflow_id: String,
    cancel: Arc<AtomicBool>,
}

/// Cancellation token held by an in-flight run
#[derive(Debug, Clone)]
pub struct RunToken {
    workflow_id: String,
    cancel: Arc<AtomicBool>,
}

impl RunToken {
    /// Whether this run has been asked to stop
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Workflow this token belongs to
    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }
}

impl RunController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the execution slot for a workflow
    ///
    /// Any run currently holding the slot is cancelled; its engine task
    /// notices at the next node boundary and winds down.
    pub fn begin(&self, workflow_id: &str) -> RunToken {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(previous) = active.take() {
            tracing::info!(
                "⏸️ Cancelling active run of '{}' to start '{}'",
                previous.workflow_id,
                workflow_id
            );
            previous.cancel.store(true, Ordering::SeqCst);
        }

        let cancel = Arc::new(AtomicBool::new(false));
        *active = Some(ActiveRun {
            workflow_id: workflow_id.to_string(),
            cancel: Arc::clone(&cancel),
        });

        RunToken {
            workflow_id: workflow_id.to_string(),
            cancel,
        }
    }

    /// Request cancellation of the active run for the given workflow
    ///
    /// Returns false when that workflow does not own the slot (no run in
    /// flight, or another workflow's run replaced it).
    pub fn stop(&self, workflow_id: &str) -> bool {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());

        match active.as_ref() {
            Some(run) if run.workflow_id == workflow_id => {
                run.cancel.store(true, Ordering::SeqCst);
                *active = None;
                true
            }
            _ => false,
        }
    }

    /// Release the slot at the end of a run, if this token still owns it
    pub fn finish(&self, token: &RunToken) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(run) = active.as_ref() {
            if run.workflow_id == token.workflow_id && Arc::ptr_eq(&run.cancel, &token.cancel) {
                *active = None;
            }
        }
    }

    /// Workflow ID of the run currently owning the slot, if any
    pub fn active_workflow(&self) -> Option<String> {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|run| run.workflow_id.clone())
    }
}

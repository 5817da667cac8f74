//! Solver worker thread.
//!
//! Tasks arrive over an `mpsc` channel and are solved one at a time in
//! submission order. Every task yields exactly one `TaskOutcome` on the result
//! channel, errors included; a failing (or panicking) task never stops the
//! worker. `WorkerCommand::Shutdown` ends the loop.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use mortar_ballistics::AmmunitionCatalog;
use mortar_geometry::SafetyLimits;
use thiserror::Error;
use tracing::{debug, warn};

use crate::mission::{MissionError, MissionResult};
use crate::task::{MissionTask, solve_task};

/// Sequence number assigned to each submitted task.
pub type TaskId = u64;

/// Messages accepted by the worker loop.
#[derive(Debug)]
pub enum WorkerCommand {
    Solve { id: TaskId, task: MissionTask },
    Shutdown,
}

/// Result of one task, tagged with the id returned by `submit`.
#[derive(Debug)]
pub struct TaskOutcome {
    pub id: TaskId,
    pub result: Result<MissionResult, MissionError>,
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to spawn solver thread: {0}")]
    Spawn(#[from] io::Error),
    #[error("solver worker is no longer running")]
    Disconnected,
    #[error("solver thread panicked")]
    Panicked,
}

/// Handle owning the solver thread and both ends of its channels.
pub struct MissionWorker {
    commands: mpsc::Sender<WorkerCommand>,
    outcomes: mpsc::Receiver<TaskOutcome>,
    handle: Option<JoinHandle<()>>,
    next_id: TaskId,
}

impl MissionWorker {
    /// Start the solver thread. The catalog is shared read-only for the worker's lifetime.
    pub fn spawn(
        catalog: Arc<AmmunitionCatalog>,
        limits: SafetyLimits,
    ) -> Result<Self, WorkerError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
        let (out_tx, out_rx) = mpsc::channel::<TaskOutcome>();

        let handle = std::thread::Builder::new()
            .name("fire-mission-worker".into())
            .spawn(move || run_worker(&catalog, limits, cmd_rx, out_tx))?;

        Ok(Self {
            commands: cmd_tx,
            outcomes: out_rx,
            handle: Some(handle),
            next_id: 0,
        })
    }

    /// Queue a task; results come back in submission order.
    ///
    /// Fails with `Disconnected` once the solver thread has exited.
    pub fn submit(&mut self, task: MissionTask) -> Result<TaskId, WorkerError> {
        let id = self.next_id;
        self.commands
            .send(WorkerCommand::Solve { id, task })
            .map_err(|_| WorkerError::Disconnected)?;
        self.next_id += 1;
        Ok(id)
    }

    /// Block until the next outcome is available.
    pub fn recv(&self) -> Result<TaskOutcome, WorkerError> {
        self.outcomes.recv().map_err(|_| WorkerError::Disconnected)
    }

    /// Next outcome if one is ready.
    pub fn try_recv(&self) -> Option<TaskOutcome> {
        self.outcomes.try_recv().ok()
    }

    /// Wait up to `timeout` for the next outcome.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<TaskOutcome> {
        self.outcomes.recv_timeout(timeout).ok()
    }

    /// Send the shutdown sentinel and wait for the thread to finish.
    ///
    /// Tasks queued before the call are still solved; their outcomes are dropped.
    pub fn shutdown(mut self) -> Result<(), WorkerError> {
        self.stop()
    }

    fn stop(&mut self) -> Result<(), WorkerError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        // a worker that already exited has dropped its receiver; joining still reports panics
        let _ = self.commands.send(WorkerCommand::Shutdown);
        handle.join().map_err(|_| WorkerError::Panicked)
    }
}

impl Drop for MissionWorker {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!(error = %err, "solver worker did not stop cleanly");
        }
    }
}

fn run_worker(
    catalog: &AmmunitionCatalog,
    limits: SafetyLimits,
    commands: mpsc::Receiver<WorkerCommand>,
    outcomes: mpsc::Sender<TaskOutcome>,
) {
    for command in commands {
        let (id, task) = match command {
            WorkerCommand::Solve { id, task } => (id, task),
            WorkerCommand::Shutdown => break,
        };

        debug!(task = id, mission = %task.mission_type, "solving task");
        let result = solve_guarded(|| solve_task(task, catalog, limits));

        if let Err(err) = &result {
            warn!(task = id, error = %err, "task failed");
        }
        if outcomes.send(TaskOutcome { id, result }).is_err() {
            debug!("outcome receiver dropped, stopping solver worker");
            break;
        }
    }
}

/// Run one solve, turning a panic into `MissionError::Internal`.
fn solve_guarded<F>(solve: F) -> Result<MissionResult, MissionError>
where
    F: FnOnce() -> Result<MissionResult, MissionError>,
{
    panic::catch_unwind(AssertUnwindSafe(solve))
        .unwrap_or_else(|payload| Err(MissionError::Internal(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panicking_solve_becomes_internal_error() {
        let result = solve_guarded(|| panic!("table index {} out of bounds", 7));
        assert_eq!(
            result.unwrap_err(),
            MissionError::Internal("table index 7 out of bounds".to_string())
        );

        let result = solve_guarded(|| panic!("static message"));
        assert_eq!(
            result.unwrap_err(),
            MissionError::Internal("static message".to_string())
        );
    }

    #[test]
    fn non_string_payload_gets_a_generic_message() {
        let result = solve_guarded(|| std::panic::panic_any(42_u32));
        assert_eq!(
            result.unwrap_err(),
            MissionError::Internal("task panicked".to_string())
        );
    }

    #[test]
    fn solver_errors_pass_through() {
        let failure = MissionError::PreconditionFailed {
            required: 3,
            supplied: 2,
        };
        let result = solve_guarded(|| Err(failure.clone()));
        assert_eq!(result.unwrap_err(), failure);
    }
}

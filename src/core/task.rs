//! Cancellable deferred work
//!
//! Every timer on the screen (boot, strike, unlock) and every price fetch is
//! spawned through a [`TaskSet`]. Each task runs under a child of the set's
//! root [`CancellationToken`]; cancelling the root stops all of them at their
//! next suspension point and the join handles are aborted as a backstop.
//!
//! Dropping a `TaskSet` cancels everything it spawned.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle to one spawned piece of deferred work
#[derive(Debug)]
pub struct CancellableTask {
    name: &'static str,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl CancellableTask {
    /// Spawn `fut` on the current tokio runtime under a child of `parent`
    pub fn spawn<F>(name: &'static str, parent: &CancellationToken, fut: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = parent.child_token();
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {
                    debug!(event_type = "TASK_CANCELLED", task = name, "Deferred task cancelled");
                }
                _ = fut => {}
            }
        });

        Self { name, token, handle }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop the task; safe to call more than once
    pub fn cancel(&self) {
        self.token.cancel();
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Owner of all deferred work belonging to one screen
#[derive(Debug, Default)]
pub struct TaskSet {
    root: CancellationToken,
    tasks: Vec<CancellableTask>,
}

impl TaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root token; cancelled once the set is cancelled or dropped
    pub fn token(&self) -> CancellationToken {
        self.root.clone()
    }

    /// Spawn a new task; a no-op once the set has been cancelled
    pub fn spawn<F>(&mut self, name: &'static str, fut: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.root.is_cancelled() {
            return false;
        }
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(CancellableTask::spawn(name, &self.root, fut));
        true
    }

    /// Number of tasks that have not completed yet
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    /// Names of tasks that have not completed yet
    pub fn pending_names(&self) -> Vec<&'static str> {
        self.tasks
            .iter()
            .filter(|task| !task.is_finished())
            .map(CancellableTask::name)
            .collect()
    }

    /// Cancel every task, including ones spawned later
    pub fn cancel_all(&mut self) {
        self.root.cancel();
        for task in self.tasks.drain(..) {
            task.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.root.is_cancelled()
    }
}

impl Drop for TaskSet {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

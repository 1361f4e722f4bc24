//! Background worker for action chains.
//!
//! Each job runs its port calls on its own thread so the TUI main loop
//! keeps drawing while the contract confirms or the FHE client works.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::{Job, JobResult, Stage, SubscriptionService};
use crate::ports::{ContractProvider, FheClient};

/// Messages from a running job.
#[derive(Debug)]
pub enum ActionProgress {
    /// The chain reached a new stage
    Stage(Stage),
    /// The chain finished; always the last message
    Finished(JobResult),
}

/// Handle to a running job.
pub struct ActionWorkerHandle {
    /// Receiver for progress updates
    pub progress_rx: Receiver<ActionProgress>,
    /// Thread handle (for joining)
    _handle: JoinHandle<()>,
}

impl ActionWorkerHandle {
    /// Block until the job reports its result.
    ///
    /// Returns `None` if the worker thread died without reporting.
    pub fn wait(self) -> Option<JobResult> {
        self.progress_rx.iter().find_map(|p| match p {
            ActionProgress::Finished(result) => Some(result),
            ActionProgress::Stage(_) => None,
        })
    }
}

pub struct ActionWorker;

impl ActionWorker {
    /// Spawn a background thread running `job`.
    pub fn spawn<P, F>(service: Arc<SubscriptionService<P, F>>, job: Job) -> ActionWorkerHandle
    where
        P: ContractProvider + Send + Sync + 'static,
        F: FheClient + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_with_progress(&service, &job, &tx);
        });

        ActionWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_with_progress<P, F>(
        service: &SubscriptionService<P, F>,
        job: &Job,
        tx: &Sender<ActionProgress>,
    ) where
        P: ContractProvider,
        F: FheClient,
    {
        tracing::debug!("Worker started for {:?}", job.task);

        // The receiver may be gone after quit; nothing to report then.
        let result = job.run(service, &mut |stage| {
            let _ = tx.send(ActionProgress::Stage(stage));
        });

        let _ = tx.send(ActionProgress::Finished(result));
    }
}

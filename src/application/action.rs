//! User actions and the work they schedule.
//!
//! The session turns an `Action` into a `Job` (or refuses it); the job runs
//! off the UI thread and produces an `Outcome` that the session applies.

use crate::domain::{Address, NewSubscription, TxReceipt};
use crate::ports::{ContractProvider, FheClient};
use crate::{MysteryboxError, Result};

use super::service::{Created, Decrypted, LoadReport, Stage, SubscriptionService};

/// Requests the view layer can make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Refresh,
    CheckAvailability,
    Create(NewSubscription),
    Decrypt(String),
}

/// What a job does once it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Initialize FHE, load the list and check availability
    Connect,
    Refresh,
    CheckAvailability,
    Create(NewSubscription),
    Decrypt(String),
}

/// A unit of work bound to the session epoch that scheduled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub epoch: u64,
    pub account: Address,
    pub task: Task,
}

/// Result of one job.
#[derive(Debug)]
pub enum Outcome {
    Connected {
        fhe: Result<bool>,
        load: Result<LoadReport>,
        availability: Result<TxReceipt>,
    },
    Loaded(Result<LoadReport>),
    Availability(Result<TxReceipt>),
    Created {
        name: String,
        result: Result<Created>,
    },
    Decrypted {
        id: String,
        result: Result<Decrypted>,
    },
}

/// Outcome tagged with the epoch of its job.
#[derive(Debug)]
pub struct JobResult {
    pub epoch: u64,
    pub outcome: Outcome,
}

impl Job {
    /// Run the port call chain for this job.
    pub fn run<P, F>(
        &self,
        service: &SubscriptionService<P, F>,
        progress: &mut dyn FnMut(Stage),
    ) -> JobResult
    where
        P: ContractProvider,
        F: FheClient,
    {
        let outcome = match &self.task {
            Task::Connect => {
                let fhe = service.initialize_fhe();
                let load = service.load_subscriptions();
                let availability = match &load {
                    Ok(_) => service.check_availability(&self.account),
                    Err(_) => Err(MysteryboxError::Contract(
                        crate::ports::ContractError::Unavailable("contract not loaded".into()),
                    )),
                };
                Outcome::Connected {
                    fhe,
                    load,
                    availability,
                }
            }
            Task::Refresh => Outcome::Loaded(service.load_subscriptions()),
            Task::CheckAvailability => {
                Outcome::Availability(service.check_availability(&self.account))
            }
            Task::Create(new) => Outcome::Created {
                name: new.name.clone(),
                result: service.create_subscription(&self.account, new, progress),
            },
            Task::Decrypt(id) => Outcome::Decrypted {
                id: id.clone(),
                result: service.decrypt_preference(&self.account, id, progress),
            },
        };

        JobResult {
            epoch: self.epoch,
            outcome,
        }
    }
}

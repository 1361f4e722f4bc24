//! Session state: everything the view renders, owned in one place.
//!
//! A session lives for one wallet connection. Connecting or disconnecting
//! bumps the epoch and resets all derived state, so a job that was started
//! under a previous connection is ignored when its result arrives.

use std::collections::HashMap;
use std::time::Instant;

use crate::domain::{
    Address, BoxQuery, SubscriptionBox, SubscriptionDraft, SubscriptionStats,
};

use super::action::{Action, Job, JobResult, Outcome, Task};
use super::history::OperationHistory;
use super::service::{Decrypted, LoadReport, Stage};
use super::toast::Toast;

/// What applying a job result did, for the view to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Result belonged to a previous connection and was dropped
    Stale,
    Done,
    /// A subscription was created and the form was reset
    Created,
    /// Decrypt finished; `value` is `None` on failure or convergence
    Decrypted { id: String, value: Option<u32> },
}

#[derive(Debug, Default)]
pub struct Session {
    account: Option<Address>,
    epoch: u64,
    fhe_ready: bool,

    boxes: Vec<SubscriptionBox>,
    stats: SubscriptionStats,
    revealed: HashMap<String, u32>,

    pub query: BoxQuery,
    pub draft: SubscriptionDraft,

    history: OperationHistory,
    toast: Option<Toast>,

    loading: bool,
    refreshing: bool,
    checking: bool,
    creating: bool,
    decrypting: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session for `account`.
    pub fn connect(&mut self, account: Address) -> Job {
        self.reset();
        self.account = Some(account);
        self.loading = true;
        tracing::info!("Wallet connected: {}", account.short());

        Job {
            epoch: self.epoch,
            account,
            task: Task::Connect,
        }
    }

    /// Drop the account and everything derived from it.
    pub fn disconnect(&mut self) {
        if self.account.is_some() {
            tracing::info!("Wallet disconnected");
        }
        self.reset();
    }

    fn reset(&mut self) {
        let epoch = self.epoch + 1;
        *self = Self {
            epoch,
            ..Self::default()
        };
    }

    /// Validate the creation form and schedule it.
    pub fn submit_draft(&mut self, now: Instant) -> Option<Job> {
        if self.account.is_none() {
            self.toast = Some(Toast::error("Please connect wallet first", now));
            return None;
        }

        match self.draft.validate() {
            Ok(new) => self.begin(Action::Create(new), now),
            Err(e) => {
                self.toast = Some(Toast::error(e.to_string(), now));
                None
            }
        }
    }

    /// Turn a user action into a job.
    ///
    /// Returns `None` when the wallet is missing, when the same kind of
    /// action is already running, or when encryption is unavailable.
    pub fn begin(&mut self, action: Action, now: Instant) -> Option<Job> {
        let Some(account) = self.account else {
            self.toast = Some(Toast::error("Please connect wallet first", now));
            return None;
        };

        let task = match action {
            Action::Refresh => {
                if self.loading || self.refreshing {
                    return None;
                }
                self.refreshing = true;
                Task::Refresh
            }
            Action::CheckAvailability => {
                if self.checking {
                    return None;
                }
                self.checking = true;
                Task::CheckAvailability
            }
            Action::Create(new) => {
                if self.creating {
                    return None;
                }
                if self.loading {
                    self.toast = Some(Toast::pending("FHE system is initializing..."));
                    return None;
                }
                if !self.fhe_ready {
                    self.toast = Some(Toast::error("FHE system is not initialized", now));
                    return None;
                }
                self.creating = true;
                self.toast = Some(Toast::pending("Creating confidential subscription..."));
                Task::Create(new)
            }
            Action::Decrypt(id) => {
                if self.decrypting.is_some() {
                    return None;
                }
                self.decrypting = Some(id.clone());
                Task::Decrypt(id)
            }
        };

        Some(Job {
            epoch: self.epoch,
            account,
            task,
        })
    }

    /// Reflect a progress point of the running chain in the toast.
    pub fn progress(&mut self, stage: Stage) {
        let message = match stage {
            Stage::Encrypting => "Encrypting preferences...",
            Stage::Confirming => "Waiting for confirmation...",
            Stage::Decrypting => "Homomorphically matching preferences...",
            Stage::Reloading => "Refreshing subscriptions...",
        };
        self.toast = Some(Toast::pending(message));
    }

    /// Apply a finished job.
    pub fn complete(&mut self, result: JobResult, now: Instant) -> Completion {
        if result.epoch != self.epoch {
            tracing::debug!("Dropping result from epoch {}", result.epoch);
            return Completion::Stale;
        }

        match result.outcome {
            Outcome::Connected {
                fhe,
                load,
                availability,
            } => {
                self.loading = false;
                self.apply_availability(availability, now);
                match fhe {
                    Ok(ran) => {
                        self.fhe_ready = true;
                        if ran {
                            self.history.record("FHE System Initialized");
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to initialize FHE client: {}", e);
                        self.fhe_ready = false;
                        self.toast = Some(Toast::error("FHEVM initialization failed", now));
                    }
                }
                self.apply_load(load, now);
                Completion::Done
            }
            Outcome::Loaded(load) => {
                self.refreshing = false;
                self.apply_load(load, now);
                Completion::Done
            }
            Outcome::Availability(availability) => {
                self.checking = false;
                self.apply_availability(availability, now);
                Completion::Done
            }
            Outcome::Created { name, result } => {
                self.creating = false;
                match result {
                    Ok(created) => {
                        self.toast = Some(Toast::success(
                            "Subscription created with FHE protection!",
                            now,
                        ));
                        self.history.record(&format!("Created subscription: {name}"));
                        self.draft = SubscriptionDraft::default();
                        self.apply_reload(created.reload);
                        Completion::Created
                    }
                    Err(e) if e.is_user_rejection() => {
                        self.toast = Some(Toast::error("Transaction rejected", now));
                        Completion::Done
                    }
                    Err(e) => {
                        tracing::error!("Failed to create subscription: {}", e);
                        self.toast = Some(Toast::error(format!("Creation failed: {e}"), now));
                        Completion::Done
                    }
                }
            }
            Outcome::Decrypted { id, result } => {
                self.decrypting = None;
                let value = match result {
                    Ok(Decrypted::Stored(v)) => {
                        self.toast = Some(Toast::success("Preference already verified", now));
                        self.history.record(&format!("Viewed verified preference: {v}"));
                        Some(v)
                    }
                    Ok(Decrypted::Verified { value, reload }) => {
                        self.toast = Some(Toast::success("Preference decrypted and verified!", now));
                        self.history.record(&format!("Decrypted preference: {value}"));
                        self.apply_reload(reload);
                        Some(value)
                    }
                    Ok(Decrypted::AlreadyVerified { reload }) => {
                        self.toast = Some(Toast::success("Preference already verified", now));
                        self.apply_reload(reload);
                        None
                    }
                    Err(e) => {
                        tracing::error!("Decryption failed for {}: {}", id, e);
                        self.toast = Some(Toast::error("Decryption failed", now));
                        None
                    }
                };
                if let Some(v) = value {
                    self.revealed.insert(id.clone(), v);
                }
                Completion::Decrypted { id, value }
            }
        }
    }

    fn apply_load(&mut self, load: crate::Result<LoadReport>, now: Instant) {
        match load {
            Ok(report) => self.replace_boxes(report),
            Err(e) => {
                tracing::error!("Failed to load subscriptions: {}", e);
                self.toast = Some(Toast::error("Failed to load subscriptions", now));
            }
        }
    }

    /// Reload after a successful write; a failure here does not undo the
    /// write, so it is only logged.
    fn apply_reload(&mut self, reload: crate::Result<LoadReport>) {
        match reload {
            Ok(report) => self.replace_boxes(report),
            Err(e) => tracing::warn!("Reload after write failed: {}", e),
        }
    }

    fn apply_availability(&mut self, availability: crate::Result<crate::domain::TxReceipt>, now: Instant) {
        match availability {
            Ok(_) => {
                self.history.record("System Availability Checked");
                self.toast = Some(Toast::success("System is available!", now));
            }
            Err(e) => tracing::warn!("Availability check failed: {}", e),
        }
    }

    fn replace_boxes(&mut self, report: LoadReport) {
        self.boxes = report.boxes;
        self.stats = SubscriptionStats::from_boxes(&self.boxes);
        self.history
            .record(&format!("Loaded {} subscriptions", self.boxes.len()));
    }

    /// Dismiss the toast once its deadline passed.
    pub fn tick(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }

    #[must_use]
    pub fn account(&self) -> Option<Address> {
        self.account
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    #[must_use]
    pub fn fhe_ready(&self) -> bool {
        self.fhe_ready
    }

    #[must_use]
    pub fn boxes(&self) -> &[SubscriptionBox] {
        &self.boxes
    }

    /// Boxes passing the current search and category filter.
    #[must_use]
    pub fn visible_boxes(&self) -> Vec<&SubscriptionBox> {
        self.query.apply(&self.boxes)
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&SubscriptionBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn stats(&self) -> SubscriptionStats {
        self.stats
    }

    #[must_use]
    pub fn history(&self) -> &OperationHistory {
        &self.history
    }

    #[must_use]
    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Cleartext revealed for `id` during this session.
    #[must_use]
    pub fn revealed(&self, id: &str) -> Option<u32> {
        self.revealed.get(id).copied()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    #[must_use]
    pub fn is_checking(&self) -> bool {
        self.checking
    }

    #[must_use]
    pub fn is_creating(&self) -> bool {
        self.creating
    }

    #[must_use]
    pub fn is_decrypting(&self, id: &str) -> bool {
        self.decrypting.as_deref() == Some(id)
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.loading || self.refreshing || self.checking || self.creating || self.decrypting.is_some()
    }
}

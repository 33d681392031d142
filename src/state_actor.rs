//! In-memory result store owned by a single task.
//!
//! Every request is handled to completion before the next one is read from the
//! mailbox, so a scan never observes a half-recorded sample.

use crate::{CheckId, ResultStore, Sample, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

struct StateActor {
    receiver: mpsc::Receiver<StateActorMessage>,
    samples: BTreeMap<CheckId, Vec<Sample>>,
}

impl StateActor {
    fn new(receiver: mpsc::Receiver<StateActorMessage>, samples: Vec<Sample>) -> Self {
        let mut actor = Self {
            receiver,
            samples: BTreeMap::new(),
        };
        for sample in samples {
            actor.record(sample);
        }
        actor
    }

    fn record(&mut self, sample: Sample) {
        let log = self.samples.entry(sample.check_id).or_default();
        // Behind every sample with the same or an earlier timestamp.
        let at = log.partition_point(|s| s.created_at <= sample.created_at);
        log.insert(at, sample);
    }

    fn log(&self, check_id: CheckId) -> &[Sample] {
        self.samples.get(&check_id).map(Vec::as_slice).unwrap_or_default()
    }

    fn handle_message(&mut self, msg: StateActorMessage) {
        // Errors when sending can happen e.g. if the `select!` macro is used to cancel waiting
        // for the response. We can safely ignore these.
        match msg {
            StateActorMessage::Record { sample, respond_to } => {
                debug!(check_id = sample.check_id, success = sample.success, "recording sample");
                self.record(sample);
                let _ = respond_to.send(());
            }
            StateActorMessage::Scan {
                check_id,
                respond_to,
            } => {
                let _ = respond_to.send(self.log(check_id).to_vec());
            }
            StateActorMessage::Count {
                check_id,
                success,
                since,
                respond_to,
            } => {
                let log = self.log(check_id);
                let first = log.partition_point(|s| s.created_at < since);
                let count = log[first..].iter().filter(|s| s.success == success).count();
                let _ = respond_to.send(count as u64);
            }
            StateActorMessage::Latest {
                check_id,
                respond_to,
            } => {
                let _ = respond_to.send(self.log(check_id).last().cloned());
            }
        }
    }

    async fn run(&mut self) {
        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg);
        }
        info!("result store stopped");
    }
}

/// Cloneable handle to the in-memory store. The store task stops once every handle
/// has been dropped.
#[derive(Clone)]
pub struct StateActorHandle {
    sender: mpsc::Sender<StateActorMessage>,
}

impl StateActorHandle {
    /// Spawns the store task preloaded with `samples`. Must be called from within a
    /// tokio runtime.
    pub fn new(samples: Vec<Sample>, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let mut actor = StateActor::new(receiver, samples);
        tokio::spawn(async move { actor.run().await });

        Self { sender }
    }

    /// Appends a probe result.
    pub async fn record(&self, sample: Sample) -> Result<(), StoreError> {
        self.request(|respond_to| StateActorMessage::Record { sample, respond_to })
            .await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> StateActorMessage,
    ) -> Result<T, StoreError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(build(send))
            .await
            .map_err(|_| StoreError::Closed)?;
        recv.await.map_err(|_| StoreError::NoReply)
    }
}

#[async_trait]
impl ResultStore for StateActorHandle {
    async fn scan_samples(&self, check_id: CheckId) -> Result<Vec<Sample>, StoreError> {
        self.request(|respond_to| StateActorMessage::Scan {
            check_id,
            respond_to,
        })
        .await
    }

    async fn count_samples(
        &self,
        check_id: CheckId,
        success: bool,
        since: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        self.request(|respond_to| StateActorMessage::Count {
            check_id,
            success,
            since,
            respond_to,
        })
        .await
    }

    async fn latest_sample(&self, check_id: CheckId) -> Result<Option<Sample>, StoreError> {
        self.request(|respond_to| StateActorMessage::Latest {
            check_id,
            respond_to,
        })
        .await
    }
}

enum StateActorMessage {
    Record {
        sample: Sample,
        respond_to: oneshot::Sender<()>,
    },
    Scan {
        check_id: CheckId,
        respond_to: oneshot::Sender<Vec<Sample>>,
    },
    Count {
        check_id: CheckId,
        success: bool,
        since: DateTime<Utc>,
        respond_to: oneshot::Sender<u64>,
    },
    Latest {
        check_id: CheckId,
        respond_to: oneshot::Sender<Option<Sample>>,
    },
}

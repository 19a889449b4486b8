//! Owning thread for accessibility work.
//!
//! Accessibility handles must only be touched from one thread. [`AxThread`]
//! builds the [`Dispatcher`] on a dedicated OS thread and feeds it envelopes
//! over a channel; replies come back on a oneshot so async callers can await
//! them without ever holding an element.

use crate::errors::AutomationError;
use crate::handlers::Dispatcher;
use crate::protocol::{CommandEnvelope, CommandResponse};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

const THREAD_NAME: &str = "axquery-ax";

struct Job {
    envelope: CommandEnvelope,
    reply: oneshot::Sender<CommandResponse>,
}

pub struct AxThread {
    sender: Option<mpsc::Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl AxThread {
    /// Start the thread and build the dispatcher on it. Fails if the factory
    /// fails or the thread cannot be spawned.
    pub fn spawn<F>(factory: F) -> Result<Self, AutomationError>
    where
        F: FnOnce() -> Result<Dispatcher, AutomationError> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<Job>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), AutomationError>>();

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let dispatcher = match factory() {
                    Ok(dispatcher) => {
                        let _ = ready_tx.send(Ok(()));
                        dispatcher
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                info!("Accessibility thread started");
                while let Ok(job) = receiver.recv() {
                    let response = dispatcher.dispatch(&job.envelope);
                    if job.reply.send(response).is_err() {
                        debug!("Caller dropped before response for {}", job.envelope.command_id);
                    }
                }
                info!("Accessibility thread stopped");
            })
            .map_err(|e| AutomationError::Internal(format!("failed to spawn {THREAD_NAME}: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                sender: Some(sender),
                handle: Some(handle),
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(AutomationError::Internal(
                    "accessibility thread exited during startup".to_string(),
                ))
            }
        }
    }

    /// Queue a command and await its response.
    pub async fn execute(&self, envelope: CommandEnvelope) -> Result<CommandResponse, AutomationError> {
        let receiver = self.submit(envelope)?;
        receiver.await.map_err(|_| stopped())
    }

    /// Blocking variant for synchronous callers. Must not be called from
    /// inside an async runtime.
    pub fn execute_blocking(
        &self,
        envelope: CommandEnvelope,
    ) -> Result<CommandResponse, AutomationError> {
        let receiver = self.submit(envelope)?;
        receiver.blocking_recv().map_err(|_| stopped())
    }

    fn submit(
        &self,
        envelope: CommandEnvelope,
    ) -> Result<oneshot::Receiver<CommandResponse>, AutomationError> {
        let (reply, receiver) = oneshot::channel();
        let sender = self.sender.as_ref().ok_or_else(stopped)?;
        sender
            .send(Job { envelope, reply })
            .map_err(|_| stopped())?;
        Ok(receiver)
    }

    /// Stop accepting work and wait for queued commands to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Accessibility thread panicked");
            }
        }
    }
}

impl Drop for AxThread {
    fn drop(&mut self) {
        self.stop();
    }
}

fn stopped() -> AutomationError {
    AutomationError::Internal("accessibility thread is not running".to_string())
}

//! Host execution context.
//!
//! The client-side runtime is single-thread affine, so every command channel
//! call has to be issued from one designated thread. `HostContext` owns that
//! thread: a current-thread Tokio runtime driving a `LocalSet`. Work is
//! marshaled onto it with [`HostContext::run`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::thread::ThreadId;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::error::BridgeError;

type Job = Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = ()>>> + Send>;

/// Handle to the host's designated execution context. Cheap to clone.
#[derive(Clone)]
pub struct HostContext {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    thread_id: ThreadId,
    jobs: mpsc::UnboundedSender<Job>,
}

impl HostContext {
    /// Start the context on a dedicated thread.
    ///
    /// The thread exits once every handle has been dropped.
    pub fn spawn(name: impl Into<String>) -> Result<Self, BridgeError> {
        let name = name.into();
        let (jobs_tx, mut jobs_rx) = mpsc::unbounded_channel::<Job>();
        let (ready_tx, ready_rx) = std::sync::mpsc::channel::<ThreadId>();

        let thread_name = name.clone();
        std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        error!(context = %thread_name, error = %e, "Failed to build host runtime");
                        return;
                    }
                };
                if ready_tx.send(std::thread::current().id()).is_err() {
                    return;
                }

                let local = tokio::task::LocalSet::new();
                local.block_on(&runtime, async move {
                    while let Some(job) = jobs_rx.recv().await {
                        tokio::task::spawn_local(job());
                    }
                });
                debug!(context = %thread_name, "Host context stopped");
            })
            .map_err(|e| BridgeError::ContextUnavailable(format!("{name}: {e}")))?;

        let thread_id = ready_rx
            .recv()
            .map_err(|_| BridgeError::ContextUnavailable(format!("{name}: runtime failed to start")))?;

        info!(context = %name, "Host context started");

        Ok(Self {
            inner: Arc::new(Inner {
                name,
                thread_id,
                jobs: jobs_tx,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether the calling code is running on the host thread.
    pub fn is_current(&self) -> bool {
        std::thread::current().id() == self.inner.thread_id
    }

    /// Marshal `f` onto the host context and wait for the future it builds.
    ///
    /// The future runs as a local task, so it does not need to be `Send`.
    pub async fn run<F, Fut, T>(&self, f: F) -> Result<T, BridgeError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + 'static,
        T: Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        let job: Job = Box::new(move || {
            Box::pin(async move {
                let _ = done_tx.send(f().await);
            })
        });

        self.inner
            .jobs
            .send(job)
            .map_err(|_| BridgeError::ContextUnavailable(self.inner.name.clone()))?;

        done_rx
            .await
            .map_err(|_| BridgeError::ContextUnavailable(self.inner.name.clone()))
    }
}

impl std::fmt::Debug for HostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostContext")
            .field("name", &self.inner.name)
            .field("thread_id", &self.inner.thread_id)
            .finish()
    }
}

//! Generation Coordinator
//!
//! Turns the editable configuration into at most one in-flight request and
//! publishes every state transition on a watch channel.
//!
//! The network call runs on a spawned task. When it completes, the task
//! applies the outcome only if the coordinator still exists and the
//! submission's token is still current; anything else is a stale result and
//! is dropped.

use crate::coordinator::RequestState;
use crate::error::{Result, SceneError};
use crate::model::{GenerationRequest, GeneratorConfig};
use crate::notify::{Notice, NotificationSink};
use crate::service::GenerationService;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Identity of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GenerationToken(u64);

impl GenerationToken {
    fn next(self) -> Self {
        GenerationToken(self.0 + 1)
    }
}

impl fmt::Display for GenerationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to an accepted submission
///
/// Dropping it does not cancel the request; the outcome is still applied
/// to the coordinator.
#[derive(Debug)]
pub struct Submission {
    token: GenerationToken,
    task: JoinHandle<()>,
}

impl Submission {
    pub fn token(&self) -> GenerationToken {
        self.token
    }

    /// Wait until the outcome has been applied (or discarded as stale)
    pub async fn settled(self) {
        if let Err(e) = self.task.await {
            tracing::warn!(token = %self.token, error = %e, "generation task did not complete");
        }
    }
}

struct CoordinatorInner {
    token: GenerationToken,
    state_tx: watch::Sender<RequestState>,
}

impl CoordinatorInner {
    fn state(&self) -> RequestState {
        self.state_tx.borrow().clone()
    }

    fn transition(&self, next: RequestState) {
        tracing::debug!(token = %self.token, state = %next, "request state changed");
        self.state_tx.send_replace(next);
    }
}

/// Owns the request state for one generator
///
/// The service and notification sink are injected; nothing is global.
pub struct GenerationCoordinator {
    service: Arc<dyn GenerationService>,
    notifier: Arc<dyn NotificationSink>,
    inner: Arc<Mutex<CoordinatorInner>>,
}

impl GenerationCoordinator {
    pub fn new(service: Arc<dyn GenerationService>, notifier: Arc<dyn NotificationSink>) -> Self {
        let (state_tx, _rx) = watch::channel(RequestState::Idle);
        Self {
            service,
            notifier,
            inner: Arc::new(Mutex::new(CoordinatorInner {
                token: GenerationToken::default(),
                state_tx,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CoordinatorInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Validate `config` and dispatch one request
    ///
    /// An empty prompt or a submission while another request is pending is
    /// rejected here, before anything is dispatched, and leaves the state
    /// untouched. On success the state is `Pending` when this returns.
    ///
    /// # Example
    /// ```ignore
    /// let submission = coordinator.submit(&config)?;
    /// submission.settled().await;
    /// assert!(coordinator.state().is_settled());
    /// ```
    pub fn submit(&self, config: &GeneratorConfig) -> Result<Submission> {
        let request = match GenerationRequest::from_config(config) {
            Ok(request) => request,
            Err(e) => return Err(self.reject(e)),
        };
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| SceneError::NoRuntime)?;

        let token = {
            let mut inner = self.lock();
            if inner.state().is_pending() {
                drop(inner);
                return Err(self.reject(SceneError::DuplicateSubmission));
            }
            inner.token = inner.token.next();
            inner.transition(RequestState::Pending);
            inner.token
        };

        tracing::info!(
            token = %token,
            service = self.service.name(),
            prompt = request.prompt(),
            tone = %request.emotional_tone(),
            "dispatching generation request"
        );

        let task = runtime.spawn(Self::run(
            Arc::clone(&self.service),
            Arc::clone(&self.notifier),
            Arc::downgrade(&self.inner),
            token,
            request,
        ));
        Ok(Submission { token, task })
    }

    fn reject(&self, error: SceneError) -> SceneError {
        tracing::debug!(code = error.error_code(), "submission rejected");
        let notice = match &error {
            SceneError::DuplicateSubmission => Notice::warning(error.friendly_message()),
            _ => Notice::error(error.friendly_message()),
        };
        self.notifier.notify(notice);
        error
    }

    async fn run(
        service: Arc<dyn GenerationService>,
        notifier: Arc<dyn NotificationSink>,
        inner: Weak<Mutex<CoordinatorInner>>,
        token: GenerationToken,
        request: GenerationRequest,
    ) {
        let outcome = service.generate(request).await;

        let Some(inner) = inner.upgrade() else {
            tracing::debug!(token = %token, "coordinator gone, discarding result");
            return;
        };
        let notice = {
            let inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            if inner.token != token {
                tracing::debug!(token = %token, current = %inner.token, "discarding stale result");
                return;
            }

            match outcome {
                Ok(result) => {
                    tracing::info!(token = %token, result = %result.id, "generation succeeded");
                    inner.transition(RequestState::Succeeded(Arc::new(result)));
                    Notice::success("AI animation generated successfully!")
                }
                Err(e) => {
                    tracing::error!(token = %token, code = e.error_code(), error = %e, "generation failed");
                    let notice = Notice::error(e.friendly_message());
                    inner.transition(RequestState::Failed(e.to_string()));
                    notice
                }
            }
        };
        notifier.notify(notice);
    }

    // ========================================================================
    // Observation
    // ========================================================================

    pub fn state(&self) -> RequestState {
        self.lock().state()
    }

    pub fn is_pending(&self) -> bool {
        self.state().is_pending()
    }

    /// Observe state transitions
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.lock().state_tx.subscribe()
    }

    /// Token of the most recent accepted submission
    pub fn current_token(&self) -> GenerationToken {
        self.lock().token
    }
}

//! Holds the single user-visible error message.
//!
//! Setting a message arms a timer that hides it again after the configured
//! timeout. A newer message replaces the old one and restarts the timer.
//! Dismissing hides the message right away. Dropping the channel cancels
//! any pending timer.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use tokio::{runtime::Handle, task::JoinHandle, time::Instant};

#[derive(Default)]
struct Inner {
    message: Option<String>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl Inner {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

pub struct ErrorChannel {
    inner: Arc<Mutex<Inner>>,
    timeout: Duration,
}

impl ErrorChannel {
    pub fn new(timeout: Duration) -> Self {
        ErrorChannel {
            inner: Arc::new(Mutex::new(Inner::default())),
            timeout,
        }
    }

    /// Outside a tokio runtime the message is still shown but never expires
    /// on its own; it stays until dismissed or replaced.
    pub fn push(&self, message: impl Into<String>) {
        let message = message.into();

        let mut inner = self.lock();
        inner.cancel_timer();
        inner.generation = inner.generation.wrapping_add(1);
        inner.message = Some(message);

        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("no tokio runtime, error message will not expire");
            return;
        };
        let deadline = Instant::now() + self.timeout;
        let generation = inner.generation;
        let weak = Arc::downgrade(&self.inner);
        inner.timer = Some(runtime.spawn(expire(weak, generation, deadline)));
    }

    pub fn dismiss(&self) {
        let mut inner = self.lock();
        inner.cancel_timer();
        inner.message = None;
    }

    pub fn message(&self) -> Option<String> {
        self.lock().message.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.lock().message.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ErrorChannel {
    fn drop(&mut self) {
        self.lock().cancel_timer();
    }
}

async fn expire(inner: Weak<Mutex<Inner>>, generation: u64, deadline: Instant) {
    tokio::time::sleep_until(deadline).await;

    let Some(inner) = inner.upgrade() else {
        return;
    };
    let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
    // a newer message re-armed the timer while this one was waking up
    if inner.generation == generation {
        inner.message = None;
        inner.timer = None;
    }
}

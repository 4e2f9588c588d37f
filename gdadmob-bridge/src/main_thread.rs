//! Marshalling work onto the UI thread.
//!
//! SDK callbacks arrive on arbitrary threads. Anything that touches a view
//! goes through [`MainThread::dispatch`] and runs later on the thread that
//! owns the UI.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

pub type MainTask = Box<dyn FnOnce() + Send + 'static>;

pub trait MainThread: Send + Sync {
    fn dispatch(&self, task: MainTask);
}

/// Runs tasks inline on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateMainThread;

impl MainThread for ImmediateMainThread {
    fn dispatch(&self, task: MainTask) {
        task();
    }
}

/// Holds tasks until the UI loop calls [`QueuedMainThread::drain`].
#[derive(Default)]
pub struct QueuedMainThread {
    queue: Mutex<VecDeque<MainTask>>,
}

impl QueuedMainThread {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        lock(&self.queue).len()
    }

    /// Runs queued tasks in FIFO order, including any they enqueue, and
    /// returns how many ran.
    pub fn drain(&self) -> usize {
        let mut ran = 0;
        loop {
            // the lock is released before the task runs so it may dispatch
            let Some(task) = lock(&self.queue).pop_front() else {
                break;
            };
            task();
            ran += 1;
        }
        if ran > 0 {
            trace!(ran, "Drained main thread queue");
        }
        ran
    }
}

impl MainThread for QueuedMainThread {
    fn dispatch(&self, task: MainTask) {
        lock(&self.queue).push_back(task);
    }
}

impl std::fmt::Debug for QueuedMainThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedMainThread")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

//! Marshalling of units of work onto a single owning thread.

use super::error::GateError;
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

type Job<T> = Box<dyn FnOnce(&mut T) + Send>;

/// Runs units of work against a target that only its owning thread may touch.
///
/// Called from the owning thread, [`invoke`](Self::invoke) runs the work
/// inline. Called from anywhere else, it enqueues the work for the owner and
/// resolves once the owner has run it. Work never re-enters the gate.
///
/// # Example
///
/// ```rust
/// use hanoi_motion::dispatch::DispatchGate;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let gate = DispatchGate::spawn(Vec::<u32>::new()).unwrap();
/// gate.invoke(|items| items.push(7)).await.unwrap();
/// let len = gate.invoke(|items| items.len()).await.unwrap();
/// assert_eq!(len, 1);
/// # });
/// ```
pub struct DispatchGate<T> {
    target: Arc<Mutex<T>>,
    owner: ThreadId,
    jobs: mpsc::UnboundedSender<Job<T>>,
}

impl<T> Clone for DispatchGate<T> {
    fn clone(&self) -> Self {
        Self {
            target: Arc::clone(&self.target),
            owner: self.owner,
            jobs: self.jobs.clone(),
        }
    }
}

/// The owning side of a gate: drains and runs the queued work.
pub struct OwnerLoop<T> {
    target: Arc<Mutex<T>>,
    jobs: mpsc::UnboundedReceiver<Job<T>>,
}

impl<T: Send + 'static> DispatchGate<T> {
    /// Make the calling thread the owner. The caller drives the returned
    /// loop with [`OwnerLoop::pump`] or [`OwnerLoop::run`].
    pub fn attach(target: T) -> (Self, OwnerLoop<T>) {
        let target = Arc::new(Mutex::new(target));
        let (tx, rx) = mpsc::unbounded_channel();
        let gate = Self {
            target: Arc::clone(&target),
            owner: thread::current().id(),
            jobs: tx,
        };
        (gate, OwnerLoop { target, jobs: rx })
    }

    /// Start a dedicated owner thread that runs queued work until every
    /// gate handle has been dropped.
    pub fn spawn(target: T) -> io::Result<Self> {
        let target = Arc::new(Mutex::new(target));
        let (tx, rx) = mpsc::unbounded_channel();
        let owner_loop = OwnerLoop {
            target: Arc::clone(&target),
            jobs: rx,
        };
        let handle = thread::Builder::new()
            .name("dispatch-owner".to_string())
            .spawn(move || owner_loop.run())?;
        Ok(Self {
            target,
            owner: handle.thread().id(),
            jobs: tx,
        })
    }

    pub fn is_owner(&self) -> bool {
        thread::current().id() == self.owner
    }

    pub fn owner_thread(&self) -> ThreadId {
        self.owner
    }

    /// Run `work` on the owning thread and return its result.
    pub async fn invoke<R, F>(&self, work: F) -> Result<R, GateError>
    where
        F: FnOnce(&mut T) -> R + Send + 'static,
        R: Send + 'static,
    {
        self.submit(work).wait().await
    }

    /// Hand `work` to the owner without waiting for it.
    ///
    /// On the owning thread the work has already run when this returns.
    /// Elsewhere it is queued: work submitted in some order runs in that
    /// order, so a caller may submit while holding its own lock and wait
    /// after releasing it.
    pub fn submit<R, F>(&self, work: F) -> Pending<R>
    where
        F: FnOnce(&mut T) -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.is_owner() {
            return Pending(PendingState::Done(work(&mut self.target.lock())));
        }

        let (tx, rx) = oneshot::channel();
        let queued = self.jobs.send(Box::new(move |target: &mut T| {
            let _ = tx.send(work(target));
        }));
        match queued {
            Ok(()) => Pending(PendingState::Queued(rx)),
            Err(_) => Pending(PendingState::Closed),
        }
    }
}

/// Result of a [`DispatchGate::submit`], possibly not produced yet.
#[must_use = "submitted work should be waited on to observe its result"]
pub struct Pending<R>(PendingState<R>);

enum PendingState<R> {
    Done(R),
    Queued(oneshot::Receiver<R>),
    Closed,
}

impl<R> Pending<R> {
    /// Wait for the owner to run the work.
    pub async fn wait(self) -> Result<R, GateError> {
        match self.0 {
            PendingState::Done(result) => Ok(result),
            PendingState::Queued(rx) => rx.await.map_err(|_| GateError::Closed),
            PendingState::Closed => Err(GateError::Closed),
        }
    }
}

impl<T> OwnerLoop<T> {
    /// Run every job queued so far without waiting for more.
    /// Returns the number of jobs run.
    pub fn pump(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.jobs.try_recv() {
            job(&mut self.target.lock());
            ran += 1;
        }
        ran
    }

    /// Run jobs as they arrive until all gate handles are dropped.
    ///
    /// Blocks the calling thread; must not be called from async code.
    pub fn run(mut self) {
        while let Some(job) = self.jobs.blocking_recv() {
            job(&mut self.target.lock());
        }
        debug!("dispatch owner loop finished");
    }
}

// Shared fixtures for the context-core integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use rewind_context_core::propagation::{BoxedTask, Executor, RejectedTask};
use rewind_context_core::{trace, SessionId};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Minimal fixed-size thread pool with a bounded queue.
///
/// Workers are reused across tasks and survive panicking tasks, which is
/// exactly the situation the propagation bridge has to cope with.
pub struct WorkerPool {
    sender: Mutex<Option<SyncSender<BoxedTask>>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(workers: usize, capacity: usize) -> Self {
        Self::with_residual(workers, capacity, None)
    }

    /// Pool whose workers start with `residual` already in their slot, as if
    /// left over from earlier unrelated work
    pub fn with_residual(workers: usize, capacity: usize, residual: Option<SessionId>) -> Self {
        let (sender, receiver) = mpsc::sync_channel::<BoxedTask>(capacity);
        let receiver = Arc::new(Mutex::new(receiver));
        let workers = (0..workers)
            .map(|index| {
                let receiver = receiver.clone();
                let residual = residual.clone();
                thread::Builder::new()
                    .name(format!("pool-worker-{}", index))
                    .spawn(move || worker_loop(receiver, residual))
                    .expect("spawn pool worker")
            })
            .collect();

        Self {
            sender: Mutex::new(Some(sender)),
            workers,
        }
    }

    /// Run `check` on a worker and wait for its result
    pub fn observe<T, F>(&self, check: F) -> T
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        self.execute(rewind_context_core::propagation::task_fn(move || {
            let _ = tx.send(check());
        }))
        .expect("check accepted");
        rx.recv().expect("check ran")
    }

    /// Stop accepting work and wait for the workers to drain the queue
    pub fn shutdown(mut self) {
        self.sender.lock().take();
        for worker in self.workers.drain(..) {
            worker.join().expect("worker exits cleanly");
        }
    }
}

impl Executor for WorkerPool {
    fn execute(&self, task: BoxedTask) -> Result<(), RejectedTask> {
        let guard = self.sender.lock();
        let Some(sender) = guard.as_ref() else {
            return Err(RejectedTask::new(task, "pool is shut down"));
        };
        sender.try_send(task).map_err(|err| match err {
            TrySendError::Full(task) => RejectedTask::new(task, "queue is full"),
            TrySendError::Disconnected(task) => RejectedTask::new(task, "workers are gone"),
        })
    }
}

fn worker_loop(receiver: Arc<Mutex<Receiver<BoxedTask>>>, residual: Option<SessionId>) {
    if let Some(residual) = residual {
        trace::set(residual);
    }
    loop {
        let next = receiver.lock().recv();
        match next {
            Ok(task) => {
                let _ = panic::catch_unwind(AssertUnwindSafe(|| task.run()));
            }
            Err(_) => break,
        }
    }
}

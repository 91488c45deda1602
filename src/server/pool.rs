//! Fixed-size worker pool
//!
//! Each worker is a dedicated OS thread that pops jobs from the shared
//! [`BoundedQueue`] and runs the handler on them one at a time. The pool
//! stops through the sentinel protocol: [`WorkerPool::shutdown`] pushes
//! one [`Job::Shutdown`] per worker behind whatever is already queued,
//! then joins every thread.

use crate::server::queue::{BoundedQueue, Job};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

struct Worker {
    id: usize,
    handle: JoinHandle<()>,
}

/// A fixed set of worker threads fed from a bounded queue.
pub struct WorkerPool<T> {
    queue: Arc<BoundedQueue<Job<T>>>,
    workers: Vec<Worker>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Start `size` workers sharing a queue of `capacity` jobs.
    ///
    /// Every popped work item is passed to `handler`. A panic inside the
    /// handler is logged and the worker moves on to the next job.
    pub fn spawn<F>(size: usize, capacity: usize, handler: F) -> io::Result<Self>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let queue = Arc::new(BoundedQueue::new(capacity));
        let handler = Arc::new(handler);
        let mut pool = Self {
            queue,
            workers: Vec::new(),
        };

        for id in 0..size.max(1) {
            let queue = Arc::clone(&pool.queue);
            let handler = Arc::clone(&handler);

            let spawned = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || worker_loop(id, &queue, &*handler));

            match spawned {
                Ok(handle) => pool.workers.push(Worker { id, handle }),
                Err(e) => {
                    // Stop the threads that did start before giving up
                    pool.shutdown();
                    return Err(e);
                }
            }
        }

        tracing::debug!(workers = pool.workers.len(), capacity, "Worker pool started");
        Ok(pool)
    }

    /// Queue a work item, blocking while the queue is full.
    pub fn submit(&self, item: T) {
        self.queue.push(Job::Work(item));
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Number of jobs waiting to be picked up.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Enqueue one sentinel per worker and wait for all of them to exit.
    ///
    /// Work already in the queue is processed first, since sentinels are
    /// pushed behind it.
    pub fn shutdown(self) {
        for _ in &self.workers {
            self.queue.push(Job::Shutdown);
        }

        for worker in self.workers {
            if worker.handle.join().is_err() {
                tracing::error!(worker = worker.id, "Worker thread terminated abnormally");
            }
        }

        tracing::debug!("Worker pool stopped");
    }
}

fn worker_loop<T, F>(id: usize, queue: &BoundedQueue<Job<T>>, handler: &F)
where
    F: Fn(T),
{
    loop {
        match queue.pop() {
            Job::Work(item) => {
                if panic::catch_unwind(AssertUnwindSafe(|| handler(item))).is_err() {
                    tracing::error!(worker = id, "Handler panicked, continuing with next job");
                }
            }
            Job::Shutdown => {
                tracing::debug!(worker = id, "Worker received shutdown sentinel");
                return;
            }
        }
    }
}

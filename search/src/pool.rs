//! Bounded worker pool for the multi-path entry points.
//!
//! Jobs go into a `crossbeam-channel` queue; a fixed number of scoped threads
//! drain it and send results back to a collector running on the calling
//! thread. The collector alone decides when enough has been found. Every
//! worker is joined before [`run_bounded`] returns.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crossbeam_channel::unbounded;

use crate::cancel::CancellationToken;

// Guarded structures stay valid if a worker panics mid-update, so poison is
// recovered rather than propagated.

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Collector verdict after each result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Run `work` over `jobs` on at most `threads` threads.
///
/// `collect` sees results in arrival order. Returning [`Flow::Stop`] cancels
/// `cancel`; workers skip remaining jobs and later results are dropped.
/// `work` should poll the token itself for long jobs.
pub fn run_bounded<J, R, W, C>(
    threads: usize,
    jobs: Vec<J>,
    cancel: &CancellationToken,
    work: W,
    mut collect: C,
) where
    J: Send,
    R: Send,
    W: Fn(J, &CancellationToken) -> Option<R> + Sync,
    C: FnMut(R) -> Flow,
{
    if jobs.is_empty() || cancel.is_cancelled() {
        return;
    }
    let threads = threads.clamp(1, jobs.len());

    let (job_tx, job_rx) = unbounded::<J>();
    for job in jobs {
        // The receiver is alive, so an unbounded send cannot fail.
        let _ = job_tx.send(job);
    }
    drop(job_tx);

    let (result_tx, result_rx) = unbounded::<R>();
    let work = &work;

    std::thread::scope(|scope| {
        for _ in 0..threads {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for job in &job_rx {
                    if cancel.is_cancelled() {
                        break;
                    }
                    if let Some(result) = work(job, cancel) {
                        if result_tx.send(result).is_err() {
                            break;
                        }
                    }
                }
            });
        }
        drop(result_tx);

        for result in &result_rx {
            if collect(result) == Flow::Stop {
                cancel.cancel();
                break;
            }
        }
        drop(result_rx);
    });
}

//! Single-job background workers with cooperative cancellation.
//!
//! A [`JobHandle`] runs one [`Job`] on a dedicated named thread and publishes
//! its outcome over a bounded channel. The owner polls without blocking;
//! [`JobHandle::shutdown`] raises the stop flag and joins the thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError, bounded};
use strata_config::StorageConfig;

use crate::error::SaveError;

/// Work that a background thread can attempt, possibly more than once.
pub trait Job: Send + 'static {
    type Output: Send + 'static;

    /// Thread name suffix, e.g. `"save"`.
    fn name(&self) -> &'static str;

    /// Performs one attempt.
    fn run_once(&mut self) -> Result<Self::Output, SaveError>;
}

/// Retry and pacing policy for a job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JobOptions {
    /// Attempts before the last failure becomes the result. Zero behaves as one.
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub startup_delay: Duration,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            retry_delay: Duration::from_millis(30),
            startup_delay: Duration::ZERO,
        }
    }
}

impl From<&StorageConfig> for JobOptions {
    fn from(config: &StorageConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            retry_delay: config.retry_delay(),
            startup_delay: config.startup_delay(),
        }
    }
}

/// Lifecycle of a background job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    /// No job has been started.
    Idle,
    Running,
    /// The outcome has been published.
    Completed,
    /// The job stopped before publishing an outcome.
    Cancelled,
}

/// Owner of one running job.
pub struct JobHandle<T> {
    name: String,
    thread: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    result_rx: Receiver<Result<T, SaveError>>,
    state: JobState,
}

impl<T: Send + 'static> JobHandle<T> {
    /// Starts `job` on a new thread named `strata-<job name>`.
    pub fn spawn<J>(mut job: J, options: JobOptions) -> Result<Self, SaveError>
    where
        J: Job<Output = T>,
    {
        let name = format!("strata-{}", job.name());
        let stop = Arc::new(AtomicBool::new(false));
        let (result_tx, result_rx) = bounded(1);
        let thread_stop = Arc::clone(&stop);
        let thread_name = name.clone();

        let thread = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                if !options.startup_delay.is_zero() {
                    std::thread::sleep(options.startup_delay);
                }
                let max_attempts = options.max_attempts.max(1);
                let mut attempt = 0;
                loop {
                    if thread_stop.load(Ordering::Acquire) {
                        tracing::debug!("{} stopped before attempt {}", thread_name, attempt + 1);
                        return;
                    }
                    attempt += 1;
                    let result = job.run_once();
                    if thread_stop.load(Ordering::Acquire) {
                        tracing::debug!("{} stopped after attempt {}", thread_name, attempt);
                        return;
                    }
                    match result {
                        Err(err) if attempt < max_attempts => {
                            tracing::warn!(
                                "{} attempt {}/{} failed: {}",
                                thread_name,
                                attempt,
                                max_attempts,
                                err
                            );
                            std::thread::sleep(options.retry_delay);
                        }
                        outcome => {
                            let _ = result_tx.send(outcome);
                            return;
                        }
                    }
                }
            })
            .map_err(|source| SaveError::Spawn {
                name: name.clone(),
                source,
            })?;

        Ok(Self {
            name,
            thread: Some(thread),
            stop,
            result_rx,
            state: JobState::Running,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Returns `true` once the worker has published an outcome or exited.
    pub fn is_finished(&self) -> bool {
        match self.state {
            JobState::Running => {
                !self.result_rx.is_empty()
                    || self.thread.as_ref().is_none_or(JoinHandle::is_finished)
            }
            _ => true,
        }
    }

    /// Takes the outcome if one has been published. Never blocks.
    pub fn poll(&mut self) -> Option<Result<T, SaveError>> {
        if self.state != JobState::Running {
            return None;
        }
        match self.result_rx.try_recv() {
            Ok(outcome) => {
                self.state = JobState::Completed;
                self.join();
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.state = JobState::Cancelled;
                if self.join_panicked() {
                    return Some(Err(SaveError::WorkerPanicked(self.name.clone())));
                }
                None
            }
        }
    }

    /// Asks the worker to stop at its next check.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Signals stop and joins the worker. No-op once joined.
    pub fn shutdown(&mut self) {
        if self.thread.is_none() {
            return;
        }
        self.stop();
        self.join();
        if self.state == JobState::Running {
            self.state = JobState::Cancelled;
        }
    }

    fn join(&mut self) {
        if self.join_panicked() {
            tracing::warn!("{} worker panicked", self.name);
        }
    }

    fn join_panicked(&mut self) -> bool {
        self.thread
            .take()
            .is_some_and(|thread| thread.join().is_err())
    }
}

impl<T> Drop for JobHandle<T> {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Holds at most one outstanding job of a kind.
pub struct JobSlot<T> {
    handle: Option<JobHandle<T>>,
}

impl<T: Send + 'static> JobSlot<T> {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Starts a job unless one is already held, in which case the held handle
    /// is returned and `start` is not called.
    pub fn start_with(
        &mut self,
        start: impl FnOnce() -> Result<JobHandle<T>, SaveError>,
    ) -> Result<&mut JobHandle<T>, SaveError> {
        match self.handle {
            Some(ref mut handle) => {
                tracing::debug!("{} already running", handle.name());
                Ok(handle)
            }
            None => Ok(self.handle.insert(start()?)),
        }
    }

    pub fn handle(&self) -> Option<&JobHandle<T>> {
        self.handle.as_ref()
    }

    pub fn state(&self) -> JobState {
        self.handle.as_ref().map_or(JobState::Idle, JobHandle::state)
    }

    pub fn is_busy(&self) -> bool {
        self.handle.is_some()
    }

    /// Polls the held job. The slot empties once the job completes or is cancelled.
    pub fn poll(&mut self) -> Option<Result<T, SaveError>> {
        let handle = self.handle.as_mut()?;
        let outcome = handle.poll();
        if handle.state() != JobState::Running {
            self.handle = None;
        }
        outcome
    }

    /// Shuts down and drops the held job.
    pub fn shutdown(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.shutdown();
        }
    }
}

impl<T: Send + 'static> Default for JobSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-interval timer driven by frame deltas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PollTimer {
    interval: Duration,
    elapsed: Duration,
}

impl PollTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Advances the timer. Returns `true` and restarts when the interval has passed.
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.elapsed += delta;
        if self.elapsed >= self.interval {
            self.elapsed = Duration::ZERO;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

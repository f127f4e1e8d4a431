//! Runs searches on a single background worker.
//!
//! [`SolveTask`] owns one worker thread fed by a queue of capacity one. Every
//! submission yields a [`SolveHandle`] that can be waited on, polled, or given
//! a completion callback. Callbacks are never run on the worker: they are
//! posted into a [`Mailbox`] and run by whichever thread calls
//! [`Mailbox::dispatch`], usually the UI thread once per frame.

use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use anyhow::anyhow;
use log::{debug, error};

type Work = Box<dyn FnOnce() -> bool + Send>;
type Callback = Box<dyn FnOnce(bool) + Send>;
type Letter<C> = Box<dyn FnOnce(&mut C) + Send>;
type Waker = Arc<dyn Fn() + Send + Sync>;

struct Job {
    work: Work,
    slot: Arc<Slot>,
}

/// Completion state shared between a handle and the worker
#[derive(Default)]
struct Slot {
    state: Mutex<SlotState>,
    done: Condvar,
}

#[derive(Default)]
struct SlotState {
    result: Option<bool>,
    callbacks: Vec<Callback>,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        // the state is plain data, a panic while holding the lock cannot corrupt it
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Posts the pending callbacks before publishing the result, so anyone
    /// woken by `done` can already dispatch them.
    fn complete(&self, result: bool) {
        let mut state = self.lock();
        for callback in state.callbacks.drain(..) {
            callback(result);
        }
        state.result = Some(result);
        drop(state);

        self.done.notify_all();
    }
}

/// The single-worker queue that searches are run on
pub struct SolveTask {
    sender: Option<SyncSender<Job>>,
    handle: Option<JoinHandle<()>>,
    busy: Arc<AtomicBool>,
}

impl SolveTask {
    pub fn spawn() -> Self {
        let (sender, receiver) = mpsc::sync_channel::<Job>(1);
        let busy = Arc::new(AtomicBool::new(false));

        let worker_busy = Arc::clone(&busy);
        let handle = thread::Builder::new()
            .name("maze-solver".to_string())
            .spawn(move || {
                while let Ok(job) = receiver.recv() {
                    let result = match panic::catch_unwind(AssertUnwindSafe(job.work)) {
                        Ok(result) => result,
                        Err(_) => {
                            error!("solve panicked, reporting no path");
                            false
                        }
                    };
                    debug!("solve finished: path found = {}", result);

                    worker_busy.store(false, Ordering::Release);
                    job.slot.complete(result);
                }
                debug!("solve worker shutting down");
            });

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("failed to start solve worker: {}", e);
                None
            }
        };

        Self {
            sender: handle.as_ref().map(|_| sender),
            handle,
            busy,
        }
    }

    /// True from submission until the worker has finished the search
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Queues `work` and returns without waiting for it.
    ///
    /// Panics if a previous submission is still running.
    pub fn submit(
        &self,
        work: impl FnOnce() -> bool + Send + 'static,
    ) -> Result<SolveHandle, anyhow::Error> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| anyhow!("solve worker is not running"))?;

        assert!(
            !self.busy.swap(true, Ordering::AcqRel),
            "a solve is already running"
        );

        let slot = Arc::new(Slot::default());
        let job = Job {
            work: Box::new(work),
            slot: Arc::clone(&slot),
        };

        if sender.send(job).is_err() {
            self.busy.store(false, Ordering::Release);
            return Err(anyhow!("solve worker has exited"));
        }

        Ok(SolveHandle { slot })
    }
}

impl Debug for SolveTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolveTask")
            .field("running", &self.handle.is_some())
            .field("busy", &self.is_busy())
            .finish()
    }
}

impl Drop for SolveTask {
    fn drop(&mut self) {
        // closing the queue ends the worker loop once the current job is done
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("solve worker panicked");
            }
        }
    }
}

/// Handle to one submitted search
#[derive(Clone)]
pub struct SolveHandle {
    slot: Arc<Slot>,
}

impl SolveHandle {
    pub fn is_finished(&self) -> bool {
        self.slot.lock().result.is_some()
    }

    /// The result, if the search has finished
    pub fn try_result(&self) -> Option<bool> {
        self.slot.lock().result
    }

    /// Blocks until the search has finished
    pub fn wait(&self) -> bool {
        let mut state = self.slot.lock();
        loop {
            if let Some(result) = state.result {
                return result;
            }
            state = self
                .slot
                .done
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Arranges for `callback` to be posted to `mailbox` when the search
    /// finishes, or right away if it already has.
    pub fn on_complete<C: 'static>(
        &self,
        mailbox: &Mailbox<C>,
        callback: impl FnOnce(&mut C, bool) + Send + 'static,
    ) {
        let poster = mailbox.poster();
        let post: Callback = Box::new(move |result| {
            poster.post(move |ctx| callback(ctx, result));
        });

        let mut state = self.slot.lock();
        match state.result {
            Some(result) => {
                drop(state);
                post(result);
            }
            None => state.callbacks.push(post),
        }
    }
}

impl Debug for SolveHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolveHandle")
            .field("result", &self.try_result())
            .finish()
    }
}

/// A queue of callbacks run on the thread that owns it.
///
/// `C` is the state the callbacks get mutable access to when dispatched.
pub struct Mailbox<C> {
    sender: Sender<Letter<C>>,
    receiver: Receiver<Letter<C>>,
    waker: Option<Waker>,
}

impl<C> Default for Mailbox<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Mailbox<C> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            waker: None,
        }
    }

    /// `waker` is called from the posting thread after every post, e.g. to
    /// request a repaint so the owner gets to dispatch.
    pub fn with_waker(waker: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            waker: Some(Arc::new(waker)),
            ..Self::new()
        }
    }

    fn poster(&self) -> Poster<C> {
        Poster {
            sender: self.sender.clone(),
            waker: self.waker.clone(),
        }
    }

    /// Runs every callback posted so far. Returns how many ran.
    pub fn dispatch(&self, ctx: &mut C) -> usize {
        let mut count = 0;
        while let Ok(letter) = self.receiver.try_recv() {
            letter(ctx);
            count += 1;
        }
        count
    }
}

struct Poster<C> {
    sender: Sender<Letter<C>>,
    waker: Option<Waker>,
}

impl<C> Poster<C> {
    fn post(&self, letter: impl FnOnce(&mut C) + Send + 'static) {
        // the mailbox may be gone already if its owner shut down first
        if self.sender.send(Box::new(letter)).is_ok() {
            if let Some(waker) = &self.waker {
                waker();
            }
        }
    }
}

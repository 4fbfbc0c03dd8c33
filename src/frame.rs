//! Frame Scheduling
//!
//! The per-frame update is a scheduled task. Requesting a frame returns a
//! [`FrameHandle`]; the host later delivers that handle back to
//! [`SceneManager::on_frame`](crate::manager::SceneManager::on_frame).
//! Cancelling a handle guarantees the manager will never run a frame for it,
//! even if the host has already queued the callback: the manager only
//! accepts the handle it currently holds.
//!
//! Handles are monotonically increasing tokens and are never reused.

/// Token identifying one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

/// Display-synchronised scheduling primitive.
pub trait FrameScheduler {
    /// Schedules one frame callback and returns its handle.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancels a previously requested frame. Cancelling a handle that already
    /// fired, or was already cancelled, is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Monotonic handle source shared by scheduler implementations.
#[derive(Debug, Default)]
pub struct HandleSequence {
    last: u64,
}

impl HandleSequence {
    pub fn next_handle(&mut self) -> FrameHandle {
        self.last += 1;
        FrameHandle(self.last)
    }
}

/// Scheduler driven by an explicit loop (tests, headless hosts).
///
/// Pending handles are queued in request order; the driver pops them with
/// [`take_due`](Self::take_due) and feeds them to the manager.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    sequence: HandleSequence,
    pending: Vec<FrameHandle>,
    cancelled: u64,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every pending handle.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    /// Number of handles cancelled while still pending.
    #[must_use]
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = self.sequence.next_handle();
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}

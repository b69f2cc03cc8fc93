//! Per-frame scheduling abstraction.
//!
//! The render loop never runs on a timer that could overlap itself: the
//! controller requests the next frame from within the completion of the
//! previous one and holds at most one outstanding [`FrameHandle`]. The
//! trait keeps the loop's start/stop contract testable without a real
//! display refresh source.

/// Identifier of one scheduled animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Wraps a scheduler-assigned id. Schedulers are responsible for
    /// keeping ids unique across requests.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Source of per-frame callbacks. `request_frame` schedules exactly one
/// future tick and returns its handle; `cancel` revokes a handle that has
/// not fired yet. Cancelling an unknown or already-fired handle is a
/// no-op.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel(&mut self, handle: FrameHandle);
}

/// Deterministic scheduler used by tests and the CLI demo driver. The
/// owner decides when a frame "fires" by calling [`ManualScheduler::fire`].
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Option<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the pending handle, if any. The caller is expected to deliver
    /// it to the controller's frame callback.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Handle of the not-yet-fired frame, if one is scheduled.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle::new(self.next_id);
        self.pending = Some(handle);
        self.requested += 1;
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_consumes_the_pending_handle() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.request_frame();

        assert_eq!(scheduler.pending(), Some(handle));
        assert_eq!(scheduler.fire(), Some(handle));
        assert_eq!(scheduler.fire(), None);
    }

    #[test]
    fn cancel_revokes_only_the_matching_handle() {
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.request_frame();
        scheduler.cancel(first);
        assert_eq!(scheduler.pending(), None);
        assert_eq!(scheduler.cancelled(), 1);

        let second = scheduler.request_frame();
        // A stale handle must not cancel a newer request.
        scheduler.cancel(first);
        assert_eq!(scheduler.pending(), Some(second));
        assert_eq!(scheduler.cancelled(), 1);
    }

    #[test]
    fn handles_are_unique_across_requests() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_frame();
        scheduler.fire();
        let b = scheduler.request_frame();
        assert_ne!(a, b);
    }
}

//! Per-frame callback scheduling.
//!
//! A [`FrameScheduler`] hands out one [`FrameHandle`] per requested frame.
//! The handle is owned by whoever requested the frame; dropping or
//! cancelling it withdraws the request, so a torn down animation can never be
//! ticked again.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Default)]
struct Pending {
    next_id: u64,
    ids: Vec<u64>,
}

impl Pending {
    fn withdraw(&mut self, id: u64) -> bool {
        match self.ids.iter().position(|&pending| pending == id) {
            Some(pos) => {
                self.ids.swap_remove(pos);
                true
            }
            None => false,
        }
    }
}

/// Single-threaded frame request queue, one per host loop.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    pending: Rc<RefCell<Pending>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a callback on the next display refresh.
    pub fn request(&self) -> FrameHandle {
        let mut pending = self.pending.borrow_mut();
        let id = pending.next_id;
        pending.next_id = pending.next_id.wrapping_add(1);
        pending.ids.push(id);
        FrameHandle {
            id,
            scheduler: Rc::downgrade(&self.pending),
        }
    }

    /// Drain every request due on this refresh.
    pub fn take_due(&self) -> DueFrames {
        DueFrames {
            ids: std::mem::take(&mut self.pending.borrow_mut().ids),
        }
    }

    /// Number of outstanding requests.
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().ids.len()
    }
}

/// An outstanding frame request.
#[derive(Debug)]
pub struct FrameHandle {
    id: u64,
    scheduler: Weak<RefCell<Pending>>,
}

impl FrameHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the request is still queued.
    pub fn is_pending(&self) -> bool {
        let Some(pending) = self.scheduler.upgrade() else {
            return false;
        };
        let queued = pending.borrow().ids.contains(&self.id);
        queued
    }

    /// Withdraw the request. Returns false if it already fired.
    pub fn cancel(self) -> bool {
        self.withdraw()
    }

    fn withdraw(&self) -> bool {
        let Some(pending) = self.scheduler.upgrade() else {
            return false;
        };
        let Ok(mut pending) = pending.try_borrow_mut() else {
            return false;
        };
        pending.withdraw(self.id)
    }
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        self.withdraw();
    }
}

/// Requests that fired on one display refresh.
#[derive(Debug, Default)]
pub struct DueFrames {
    ids: Vec<u64>,
}

impl DueFrames {
    /// Whether `handle` fired on this refresh.
    pub fn contains(&self, handle: &FrameHandle) -> bool {
        self.ids.contains(&handle.id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

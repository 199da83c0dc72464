//! The acquire/release discipline for memory objects shared with the graphics
//! pipeline.
//!
//! A memory object created by binding a vertex buffer, texture or render
//! buffer is backed by the same memory the rasterizer uses. Compute commands
//! may only touch it between an explicit acquire and release on a command
//! queue. While released, the graphics pipeline owns the memory.

use parking_lot::Mutex;
use crate::error::{Error as OclError, Result as OclResult};
use crate::standard::{CommandQueue, Event, QueueId};


/// Ownership state of a memory object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SharingState {
    /// A plain compute object, not shared with graphics.
    Exclusive,
    /// Shared and currently owned by the graphics pipeline.
    Released,
    /// Shared and currently owned by the compute queue with the given id.
    Acquired(QueueId),
}


/// Tracks the `SharingState` of one memory object.
#[derive(Debug)]
pub struct ShareTracker {
    state: Mutex<SharingState>,
}

impl ShareTracker {
    /// A tracker for an object which is not shared.
    pub fn exclusive() -> ShareTracker {
        ShareTracker { state: Mutex::new(SharingState::Exclusive) }
    }

    /// A tracker for a shared object. Graphics owns it initially.
    pub fn shared() -> ShareTracker {
        ShareTracker { state: Mutex::new(SharingState::Released) }
    }

    /// Returns the current state.
    pub fn state(&self) -> SharingState {
        *self.state.lock()
    }

    /// Returns true if the tracked object is shared with graphics.
    pub fn is_shared(&self) -> bool {
        self.state() != SharingState::Exclusive
    }

    /// Hands ownership of the object to `queue`.
    pub fn acquire(&self, queue: QueueId) -> OclResult<()> {
        let mut state = self.state.lock();
        match *state {
            SharingState::Exclusive => Err(OclError::NotShared),
            SharingState::Acquired(owner) => Err(OclError::AlreadyAcquired(owner.as_u64())),
            SharingState::Released => {
                *state = SharingState::Acquired(queue);
                trace!("shared object acquired by queue {}", queue);
                Ok(())
            },
        }
    }

    /// Hands ownership of the object back to graphics. Only the acquiring
    /// queue may release.
    pub fn release(&self, queue: QueueId) -> OclResult<()> {
        let mut state = self.state.lock();
        match *state {
            SharingState::Exclusive => Err(OclError::NotShared),
            SharingState::Released => Err(OclError::NotAcquired),
            SharingState::Acquired(owner) if owner != queue => Err(OclError::QueueMismatch {
                owner: owner.as_u64(),
                queue: queue.as_u64(),
            }),
            SharingState::Acquired(_) => {
                *state = SharingState::Released;
                trace!("shared object released by queue {}", queue);
                Ok(())
            },
        }
    }

    /// Checks that a compute command issued on `queue` may use the object.
    pub fn check_access(&self, queue: QueueId) -> OclResult<()> {
        match self.state() {
            SharingState::Exclusive => Ok(()),
            SharingState::Released => Err(OclError::NotAcquired),
            SharingState::Acquired(owner) if owner == queue => Ok(()),
            SharingState::Acquired(owner) => Err(OclError::QueueMismatch {
                owner: owner.as_u64(),
                queue: queue.as_u64(),
            }),
        }
    }
}


/// A memory object which may be shared with the graphics pipeline.
pub trait SharedObject {
    type Queue: CommandQueue;
    type Event: Event;

    /// Returns true if the object was created by binding a graphics resource.
    fn is_shared(&self) -> bool;

    /// Enqueues the acquisition of the object for compute use on `queue`.
    ///
    /// Must be called before any kernel or memory command uses a shared
    /// object.
    fn acquire_for_sharing(&self, queue: &Self::Queue) -> OclResult<Self::Event>;

    /// Enqueues the hand-back of the object to the graphics pipeline.
    fn release_for_sharing(&self, queue: &Self::Queue) -> OclResult<Self::Event>;
}


/// Acquires `objects` on `queue` in order, runs `f`, then releases them in
/// reverse order and waits for the releases to complete.
///
/// Releases happen even when `f` fails. If an acquire fails, the objects
/// acquired before it are released again. The first error encountered is
/// returned.
pub fn with_shared<Q, E, T, F>(queue: &Q, objects: &[&dyn SharedObject<Queue = Q, Event = E>], f: F)
        -> OclResult<T>
        where Q: CommandQueue, E: Event, F: FnOnce() -> OclResult<T>
{
    let mut acquired = 0;
    let mut acquire_err = None;

    for obj in objects {
        match obj.acquire_for_sharing(queue) {
            Ok(_) => acquired += 1,
            Err(err) => {
                acquire_err = Some(err);
                break;
            },
        }
    }

    let result = match acquire_err {
        Some(err) => Err(err),
        None => f(),
    };

    let mut release_err = None;

    for obj in objects[..acquired].iter().rev() {
        if let Err(err) = obj.release_for_sharing(queue).and_then(|ev| ev.wait_for()) {
            if release_err.is_none() {
                release_err = Some(err);
            } else {
                warn!("failed to release shared object: {}", err);
            }
        }
    }

    match (result, release_err) {
        (Ok(val), None) => Ok(val),
        (Ok(_), Some(err)) => Err(err),
        (Err(err), Some(rel_err)) => {
            warn!("failed to release shared object after an earlier error: {}", rel_err);
            Err(err)
        },
        (Err(err), None) => Err(err),
    }
}

//! Command queues.

use std::sync::atomic::{AtomicU64, Ordering};
use crate::error::Result as OclResult;
use crate::standard::Device;


static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(1);


/// A process-unique identifier for a command queue.
///
/// Shared memory objects record the id of the queue that acquired them so
/// that a release (or any compute command) from a different queue can be
/// rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueueId(u64);

impl QueueId {
    /// Returns a fresh, never before issued id.
    pub fn next() -> QueueId {
        QueueId(NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id value.
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for QueueId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


/// A command queue which sends commands to one particular device.
pub trait CommandQueue {
    type Device: Device;

    /// Returns the unique id of this queue.
    fn id(&self) -> QueueId;

    /// Returns the device commands are sent to.
    fn device(&self) -> &Self::Device;

    /// Issues all previously queued commands to the device.
    fn flush(&self) -> OclResult<()>;

    /// Blocks until all commands in this queue have completed.
    fn finish(&self) -> OclResult<()>;
}

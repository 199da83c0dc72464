//! Host command queues and events.

use futures::{Async, Future, Poll};
use crate::error::{Error as OclError, Result as OclResult};
use crate::host::HostDevice;
use crate::standard::{CommandQueue, Event, QueueId};


/// A command queue of a `HostContext`.
///
/// Commands execute synchronously on the calling thread, so every event a
/// host queue hands out is already complete.
#[derive(Clone, Debug)]
pub struct HostQueue {
    id: QueueId,
    context_id: u64,
    device: HostDevice,
}

impl HostQueue {
    pub(crate) fn new(context_id: u64, device: HostDevice) -> HostQueue {
        HostQueue { id: QueueId::next(), context_id, device }
    }

    /// Returns an error unless this queue belongs to the context with id
    /// `context_id`.
    pub(crate) fn check_context(&self, context_id: u64) -> OclResult<()> {
        if self.context_id == context_id {
            Ok(())
        } else {
            Err("command queue belongs to a different context".into())
        }
    }
}

impl CommandQueue for HostQueue {
    type Device = HostDevice;

    fn id(&self) -> QueueId { self.id }

    fn device(&self) -> &HostDevice { &self.device }

    fn flush(&self) -> OclResult<()> { Ok(()) }

    fn finish(&self) -> OclResult<()> { Ok(()) }
}


/// The completion event of a host command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostEvent {
    queue: QueueId,
}

impl HostEvent {
    pub(crate) fn complete(queue: &HostQueue) -> HostEvent {
        HostEvent { queue: queue.id() }
    }

    /// Returns the queue the command was issued on.
    pub fn queue(&self) -> QueueId {
        self.queue
    }
}

impl Event for HostEvent {
    fn is_complete(&self) -> OclResult<bool> { Ok(true) }

    fn wait_for(&self) -> OclResult<()> { Ok(()) }
}

impl Future for HostEvent {
    type Item = ();
    type Error = OclError;

    fn poll(&mut self) -> Poll<Self::Item, Self::Error> {
        Ok(Async::Ready(()))
    }
}

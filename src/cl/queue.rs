//! OpenCL command queues and events.

use futures::{task, Async, Future, Poll};
use ocl_core::{self, CommandQueue as CommandQueueCore, Event as EventCore};
use crate::cl::ClDevice;
use crate::error::{Error as OclError, Result as OclResult};
use crate::standard::{CommandQueue, Event, QueueId};


/// An OpenCL command queue.
#[derive(Clone, Debug)]
pub struct ClQueue {
    id: QueueId,
    core: CommandQueueCore,
    device: ClDevice,
}

impl ClQueue {
    pub(crate) fn new(core: CommandQueueCore, device: ClDevice) -> ClQueue {
        ClQueue { id: QueueId::next(), core, device }
    }

    /// Returns the underlying queue.
    pub fn as_core(&self) -> &CommandQueueCore {
        &self.core
    }
}

impl CommandQueue for ClQueue {
    type Device = ClDevice;

    fn id(&self) -> QueueId { self.id }

    fn device(&self) -> &ClDevice { &self.device }

    fn flush(&self) -> OclResult<()> {
        ocl_core::flush(&self.core).map_err(OclError::from)
    }

    fn finish(&self) -> OclResult<()> {
        ocl_core::finish(&self.core).map_err(OclError::from)
    }
}


/// The completion event of an enqueued OpenCL command.
#[derive(Debug)]
pub struct ClEvent {
    core: EventCore,
}

impl ClEvent {
    pub(crate) fn new(core: EventCore) -> ClEvent {
        ClEvent { core }
    }

    /// Returns the underlying event.
    pub fn as_core(&self) -> &EventCore {
        &self.core
    }
}

impl Event for ClEvent {
    fn is_complete(&self) -> OclResult<bool> {
        ocl_core::event_is_complete(&self.core).map_err(OclError::from)
    }

    fn wait_for(&self) -> OclResult<()> {
        ocl_core::wait_for_event(&self.core).map_err(OclError::from)
    }
}

impl Future for ClEvent {
    type Item = ();
    type Error = OclError;

    fn poll(&mut self) -> Poll<Self::Item, Self::Error> {
        if self.is_complete()? {
            Ok(Async::Ready(()))
        } else {
            task::current().notify();
            Ok(Async::NotReady)
        }
    }
}

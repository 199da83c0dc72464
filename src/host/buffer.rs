//! Host buffers.

use crate::error::Result as OclResult;
use crate::host::{HostEvent, HostQueue, Storage};
use crate::standard::{self, Buffer, CommandQueue, MemoryAccess, SharedObject, ShareTracker};


/// A buffer of a `HostContext`.
pub struct HostBuffer {
    context_id: u64,
    storage: Storage,
    size: usize,
    access: MemoryAccess,
    sharing: ShareTracker,
}

impl HostBuffer {
    pub(crate) fn new(context_id: u64, storage: Storage, access: MemoryAccess, shared: bool)
            -> HostBuffer {
        let size = storage.read().len();
        let sharing = if shared { ShareTracker::shared() } else { ShareTracker::exclusive() };
        HostBuffer { context_id, storage, size, access, sharing }
    }

    /// Returns the sharing state tracker of this buffer.
    pub fn sharing(&self) -> &ShareTracker {
        &self.sharing
    }

    fn check_queue(&self, queue: &HostQueue) -> OclResult<()> {
        queue.check_context(self.context_id)?;
        self.sharing.check_access(queue.id())
    }
}

impl SharedObject for HostBuffer {
    type Queue = HostQueue;
    type Event = HostEvent;

    fn is_shared(&self) -> bool {
        self.sharing.is_shared()
    }

    fn acquire_for_sharing(&self, queue: &HostQueue) -> OclResult<HostEvent> {
        queue.check_context(self.context_id)?;
        self.sharing.acquire(queue.id())?;
        Ok(HostEvent::complete(queue))
    }

    fn release_for_sharing(&self, queue: &HostQueue) -> OclResult<HostEvent> {
        queue.check_context(self.context_id)?;
        self.sharing.release(queue.id())?;
        Ok(HostEvent::complete(queue))
    }
}

impl Buffer for HostBuffer {
    fn size(&self) -> usize {
        self.size
    }

    fn access(&self) -> MemoryAccess {
        self.access
    }

    fn read(&self, queue: &HostQueue, offset: usize, dst: &mut [u8]) -> OclResult<()> {
        self.check_queue(queue)?;
        standard::check_range(offset, dst.len(), self.size)?;
        dst.copy_from_slice(&self.storage.read()[offset..offset + dst.len()]);
        Ok(())
    }

    fn write(&self, queue: &HostQueue, offset: usize, src: &[u8]) -> OclResult<()> {
        self.check_queue(queue)?;
        standard::check_range(offset, src.len(), self.size)?;
        self.storage.write()[offset..offset + src.len()].copy_from_slice(src);
        Ok(())
    }

    fn copy_to(&self, queue: &HostQueue, dst: &HostBuffer, src_offset: usize, dst_offset: usize,
            len: usize) -> OclResult<HostEvent> {
        self.check_queue(queue)?;
        dst.check_queue(queue)?;
        standard::check_range(src_offset, len, self.size)?;
        standard::check_range(dst_offset, len, dst.size)?;

        if std::sync::Arc::ptr_eq(&self.storage, &dst.storage) {
            self.storage.write().copy_within(src_offset..src_offset + len, dst_offset);
        } else {
            // Never hold both locks: opposing copies on two threads would deadlock.
            let data = self.storage.read()[src_offset..src_offset + len].to_vec();
            dst.storage.write()[dst_offset..dst_offset + len].copy_from_slice(&data);
        }
        Ok(HostEvent::complete(queue))
    }

    fn fill(&self, queue: &HostQueue, pattern: &[u8], offset: usize, len: usize)
            -> OclResult<HostEvent> {
        self.check_queue(queue)?;
        standard::check_fill_pattern(pattern, offset, len)?;
        standard::check_range(offset, len, self.size)?;

        for chunk in self.storage.write()[offset..offset + len].chunks_mut(pattern.len()) {
            chunk.copy_from_slice(pattern);
        }
        Ok(HostEvent::complete(queue))
    }
}

impl std::fmt::Debug for HostBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("HostBuffer")
            .field("size", &self.size)
            .field("access", &self.access)
            .field("sharing", &self.sharing.state())
            .finish()
    }
}

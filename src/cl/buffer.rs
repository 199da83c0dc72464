//! OpenCL buffers.

use ocl_core::{self, Event as EventCore, Mem};
use crate::cl::{ClEvent, ClQueue};
use crate::error::Result as OclResult;
use crate::standard::{self, Buffer, CommandQueue, MemoryAccess, SharedObject, ShareTracker};


/// Enqueues `clEnqueueAcquireGLObjects` for `mem` after claiming it in
/// `sharing`. The claim is dropped again if the enqueue fails.
pub(crate) fn acquire_gl_object(queue: &ClQueue, mem: &Mem, sharing: &ShareTracker)
        -> OclResult<ClEvent> {
    sharing.acquire(queue.id())?;
    let mut event = EventCore::null();

    match ocl_core::enqueue_acquire_gl_objects(queue.as_core(), &[mem.clone()],
            None::<EventCore>, Some(&mut event)) {
        Ok(()) => Ok(ClEvent::new(event)),
        Err(err) => {
            sharing.release(queue.id())?;
            Err(err.into())
        },
    }
}

/// Enqueues `clEnqueueReleaseGLObjects` for `mem`. The claim in `sharing` is
/// restored if the enqueue fails.
pub(crate) fn release_gl_object(queue: &ClQueue, mem: &Mem, sharing: &ShareTracker)
        -> OclResult<ClEvent> {
    sharing.release(queue.id())?;
    let mut event = EventCore::null();

    match ocl_core::enqueue_release_gl_objects(queue.as_core(), &[mem.clone()],
            None::<EventCore>, Some(&mut event)) {
        Ok(()) => Ok(ClEvent::new(event)),
        Err(err) => {
            sharing.acquire(queue.id())?;
            Err(err.into())
        },
    }
}


/// An OpenCL buffer.
pub struct ClBuffer {
    mem: Mem,
    size: usize,
    access: MemoryAccess,
    sharing: ShareTracker,
}

impl ClBuffer {
    pub(crate) fn new(mem: Mem, size: usize, access: MemoryAccess, shared: bool) -> ClBuffer {
        let sharing = if shared { ShareTracker::shared() } else { ShareTracker::exclusive() };
        ClBuffer { mem, size, access, sharing }
    }

    /// Returns the underlying memory object, e.g. to pass it as a kernel
    /// argument.
    pub fn as_core(&self) -> &Mem {
        &self.mem
    }
}

impl SharedObject for ClBuffer {
    type Queue = ClQueue;
    type Event = ClEvent;

    fn is_shared(&self) -> bool {
        self.sharing.is_shared()
    }

    fn acquire_for_sharing(&self, queue: &ClQueue) -> OclResult<ClEvent> {
        acquire_gl_object(queue, &self.mem, &self.sharing)
    }

    fn release_for_sharing(&self, queue: &ClQueue) -> OclResult<ClEvent> {
        release_gl_object(queue, &self.mem, &self.sharing)
    }
}

impl Buffer for ClBuffer {
    fn size(&self) -> usize {
        self.size
    }

    fn access(&self) -> MemoryAccess {
        self.access
    }

    fn read(&self, queue: &ClQueue, offset: usize, dst: &mut [u8]) -> OclResult<()> {
        self.sharing.check_access(queue.id())?;
        standard::check_range(offset, dst.len(), self.size)?;
        unsafe {
            ocl_core::enqueue_read_buffer(queue.as_core(), &self.mem, true, offset, dst,
                None::<EventCore>, None::<&mut EventCore>)?;
        }
        Ok(())
    }

    fn write(&self, queue: &ClQueue, offset: usize, src: &[u8]) -> OclResult<()> {
        self.sharing.check_access(queue.id())?;
        standard::check_range(offset, src.len(), self.size)?;
        unsafe {
            ocl_core::enqueue_write_buffer(queue.as_core(), &self.mem, true, offset, src,
                None::<EventCore>, None::<&mut EventCore>)?;
        }
        Ok(())
    }

    fn copy_to(&self, queue: &ClQueue, dst: &ClBuffer, src_offset: usize, dst_offset: usize,
            len: usize) -> OclResult<ClEvent> {
        self.sharing.check_access(queue.id())?;
        dst.sharing.check_access(queue.id())?;
        standard::check_range(src_offset, len, self.size)?;
        standard::check_range(dst_offset, len, dst.size)?;

        let mut event = EventCore::null();
        ocl_core::enqueue_copy_buffer::<u8, _, _, _>(queue.as_core(), &self.mem, &dst.mem,
            src_offset, dst_offset, len, None::<EventCore>, Some(&mut event))?;
        Ok(ClEvent::new(event))
    }

    /// Fills by writing the repeated pattern, which supports patterns of any
    /// length.
    fn fill(&self, queue: &ClQueue, pattern: &[u8], offset: usize, len: usize)
            -> OclResult<ClEvent> {
        self.sharing.check_access(queue.id())?;
        standard::check_fill_pattern(pattern, offset, len)?;
        standard::check_range(offset, len, self.size)?;

        let data: Vec<u8> = pattern.iter().cloned().cycle().take(len).collect();
        let mut event = EventCore::null();
        unsafe {
            ocl_core::enqueue_write_buffer(queue.as_core(), &self.mem, true, offset, &data,
                None::<EventCore>, Some(&mut event))?;
        }
        Ok(ClEvent::new(event))
    }
}

impl std::fmt::Debug for ClBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ClBuffer")
            .field("size", &self.size)
            .field("access", &self.access)
            .field("sharing", &self.sharing.state())
            .finish()
    }
}

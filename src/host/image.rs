//! Host images.

use crate::error::{Error as OclError, Result as OclResult};
use crate::host::{HostEvent, HostQueue, Storage};
use crate::standard::{self, CommandQueue, Image, ImageDescriptor, ImageFormat, ImageType,
    MemoryAccess, SharedObject, ShareTracker};


/// An image of a `HostContext`. Pixels are stored tightly packed, row by row
/// and slice by slice.
pub struct HostImage {
    context_id: u64,
    storage: Storage,
    format: ImageFormat,
    image_type: ImageType,
    extent: [usize; 3],
    element_size: usize,
    access: MemoryAccess,
    sharing: ShareTracker,
}

impl HostImage {
    pub(crate) fn new(context_id: u64, storage: Storage, format: ImageFormat, image_type: ImageType,
            extent: [usize; 3], element_size: usize, access: MemoryAccess, shared: bool)
            -> HostImage {
        debug_assert_eq!(storage.read().len(), extent[0] * extent[1] * extent[2] * element_size);
        let sharing = if shared { ShareTracker::shared() } else { ShareTracker::exclusive() };
        HostImage { context_id, storage, format, image_type, extent, element_size, access, sharing }
    }

    /// Returns the allowed access from kernel code.
    pub fn access(&self) -> MemoryAccess {
        self.access
    }

    /// Returns the sharing state tracker of this image.
    pub fn sharing(&self) -> &ShareTracker {
        &self.sharing
    }

    fn check_queue(&self, queue: &HostQueue) -> OclResult<()> {
        queue.check_context(self.context_id)?;
        self.sharing.check_access(queue.id())
    }

    /// Byte offset of pixel `[x, y, z]`.
    fn offset_of(&self, x: usize, y: usize, z: usize) -> usize {
        ((z * self.extent[1] + y) * self.extent[0] + x) * self.element_size
    }
}

/// Repacks the (possibly pitched) initial contents of `desc` into a tightly
/// packed vector. `desc` must have been validated.
pub(crate) fn pack_host_data(desc: &ImageDescriptor, data: &[u8], element_size: usize)
        -> OclResult<Vec<u8>> {
    let extent = desc.extent();
    let len = standard::extent_len(extent, element_size)
        .ok_or_else(|| OclError::InvalidDescriptor(format!("image of {:?} is too large", extent)))?;
    let (row_pitch, slice_pitch) = desc.resolved_pitches(element_size);
    let row_len = extent[0] * element_size;
    let mut packed = Vec::with_capacity(len);

    if desc.image_type == ImageType::Image1DArray {
        for layer in 0..extent[1] {
            let src = layer * slice_pitch;
            packed.extend_from_slice(&data[src..src + row_len]);
        }
    } else {
        for z in 0..extent[2] {
            for y in 0..extent[1] {
                let src = z * slice_pitch + y * row_pitch;
                packed.extend_from_slice(&data[src..src + row_len]);
            }
        }
    }

    Ok(packed)
}

impl SharedObject for HostImage {
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

impl Image for HostImage {
    fn format(&self) -> ImageFormat { self.format }

    fn image_type(&self) -> ImageType { self.image_type }

    fn extent(&self) -> [usize; 3] { self.extent }

    fn element_size(&self) -> usize { self.element_size }

    fn read(&self, queue: &HostQueue, origin: [usize; 3], region: [usize; 3], dst: &mut [u8])
            -> OclResult<()> {
        self.check_queue(queue)?;
        standard::check_region(self.extent, origin, region, self.element_size, dst.len())?;

        let storage = self.storage.read();
        let row_len = region[0] * self.element_size;
        let mut host_off = 0;

        for z in 0..region[2] {
            for y in 0..region[1] {
                let off = self.offset_of(origin[0], origin[1] + y, origin[2] + z);
                dst[host_off..host_off + row_len].copy_from_slice(&storage[off..off + row_len]);
                host_off += row_len;
            }
        }
        Ok(())
    }

    fn write(&self, queue: &HostQueue, origin: [usize; 3], region: [usize; 3], src: &[u8])
            -> OclResult<()> {
        self.check_queue(queue)?;
        standard::check_region(self.extent, origin, region, self.element_size, src.len())?;

        let mut storage = self.storage.write();
        let row_len = region[0] * self.element_size;
        let mut host_off = 0;

        for z in 0..region[2] {
            for y in 0..region[1] {
                let off = self.offset_of(origin[0], origin[1] + y, origin[2] + z);
                storage[off..off + row_len].copy_from_slice(&src[host_off..host_off + row_len]);
                host_off += row_len;
            }
        }
        Ok(())
    }

    fn fill(&self, queue: &HostQueue, pixel: &[u8]) -> OclResult<HostEvent> {
        self.check_queue(queue)?;
        if pixel.len() != self.element_size {
            return Err(format!("fill pixel is {} bytes long, the image element size is {}",
                pixel.len(), self.element_size).into());
        }

        for chunk in self.storage.write().chunks_mut(self.element_size) {
            chunk.copy_from_slice(pixel);
        }
        Ok(HostEvent::complete(queue))
    }
}

impl std::fmt::Debug for HostImage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("HostImage")
            .field("format", &self.format)
            .field("image_type", &self.image_type)
            .field("extent", &self.extent)
            .field("access", &self.access)
            .field("sharing", &self.sharing.state())
            .finish()
    }
}

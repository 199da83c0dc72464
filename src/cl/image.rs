//! OpenCL images and format conversion.

use ocl_core::{self, Event as EventCore, ImageChannelDataType, ImageChannelOrder,
    ImageFormat as ImageFormatCore, Mem};
use crate::cl::buffer::{acquire_gl_object, release_gl_object};
use crate::cl::{ClEvent, ClQueue};
use crate::error::Result as OclResult;
use crate::standard::{self, ChannelOrder, ChannelType, CommandQueue, Image, ImageFormat,
    ImageType, MemoryAccess, SharedObject, ShareTracker};


pub(crate) fn order_to_core(order: ChannelOrder) -> ImageChannelOrder {
    match order {
        ChannelOrder::R => ImageChannelOrder::R,
        ChannelOrder::A => ImageChannelOrder::A,
        ChannelOrder::Rg => ImageChannelOrder::Rg,
        ChannelOrder::Ra => ImageChannelOrder::Ra,
        ChannelOrder::Rgb => ImageChannelOrder::Rgb,
        ChannelOrder::Rgba => ImageChannelOrder::Rgba,
        ChannelOrder::Bgra => ImageChannelOrder::Bgra,
        ChannelOrder::Argb => ImageChannelOrder::Argb,
        ChannelOrder::Intensity => ImageChannelOrder::Intensity,
        ChannelOrder::Luminance => ImageChannelOrder::Luminance,
        ChannelOrder::Rx => ImageChannelOrder::Rx,
        ChannelOrder::Rgx => ImageChannelOrder::Rgx,
        ChannelOrder::Rgbx => ImageChannelOrder::Rgbx,
    }
}

pub(crate) fn order_from_core(order: ImageChannelOrder) -> Option<ChannelOrder> {
    Some(match order {
        ImageChannelOrder::R => ChannelOrder::R,
        ImageChannelOrder::A => ChannelOrder::A,
        ImageChannelOrder::Rg => ChannelOrder::Rg,
        ImageChannelOrder::Ra => ChannelOrder::Ra,
        ImageChannelOrder::Rgb => ChannelOrder::Rgb,
        ImageChannelOrder::Rgba => ChannelOrder::Rgba,
        ImageChannelOrder::Bgra => ChannelOrder::Bgra,
        ImageChannelOrder::Argb => ChannelOrder::Argb,
        ImageChannelOrder::Intensity => ChannelOrder::Intensity,
        ImageChannelOrder::Luminance => ChannelOrder::Luminance,
        ImageChannelOrder::Rx => ChannelOrder::Rx,
        ImageChannelOrder::Rgx => ChannelOrder::Rgx,
        ImageChannelOrder::Rgbx => ChannelOrder::Rgbx,
        _ => return None,
    })
}

pub(crate) fn type_to_core(channel_type: ChannelType) -> ImageChannelDataType {
    match channel_type {
        ChannelType::SnormInt8 => ImageChannelDataType::SnormInt8,
        ChannelType::SnormInt16 => ImageChannelDataType::SnormInt16,
        ChannelType::UnormInt8 => ImageChannelDataType::UnormInt8,
        ChannelType::UnormInt16 => ImageChannelDataType::UnormInt16,
        ChannelType::UnormShort565 => ImageChannelDataType::UnormShort565,
        ChannelType::UnormShort555 => ImageChannelDataType::UnormShort555,
        ChannelType::UnormInt101010 => ImageChannelDataType::UnormInt101010,
        ChannelType::SignedInt8 => ImageChannelDataType::SignedInt8,
        ChannelType::SignedInt16 => ImageChannelDataType::SignedInt16,
        ChannelType::SignedInt32 => ImageChannelDataType::SignedInt32,
        ChannelType::UnsignedInt8 => ImageChannelDataType::UnsignedInt8,
        ChannelType::UnsignedInt16 => ImageChannelDataType::UnsignedInt16,
        ChannelType::UnsignedInt32 => ImageChannelDataType::UnsignedInt32,
        ChannelType::HalfFloat => ImageChannelDataType::HalfFloat,
        ChannelType::Float => ImageChannelDataType::Float,
    }
}

pub(crate) fn type_from_core(channel_type: ImageChannelDataType) -> Option<ChannelType> {
    Some(match channel_type {
        ImageChannelDataType::SnormInt8 => ChannelType::SnormInt8,
        ImageChannelDataType::SnormInt16 => ChannelType::SnormInt16,
        ImageChannelDataType::UnormInt8 => ChannelType::UnormInt8,
        ImageChannelDataType::UnormInt16 => ChannelType::UnormInt16,
        ImageChannelDataType::UnormShort565 => ChannelType::UnormShort565,
        ImageChannelDataType::UnormShort555 => ChannelType::UnormShort555,
        ImageChannelDataType::UnormInt101010 => ChannelType::UnormInt101010,
        ImageChannelDataType::SignedInt8 => ChannelType::SignedInt8,
        ImageChannelDataType::SignedInt16 => ChannelType::SignedInt16,
        ImageChannelDataType::SignedInt32 => ChannelType::SignedInt32,
        ImageChannelDataType::UnsignedInt8 => ChannelType::UnsignedInt8,
        ImageChannelDataType::UnsignedInt16 => ChannelType::UnsignedInt16,
        ImageChannelDataType::UnsignedInt32 => ChannelType::UnsignedInt32,
        ImageChannelDataType::HalfFloat => ChannelType::HalfFloat,
        ImageChannelDataType::Float => ChannelType::Float,
        _ => return None,
    })
}

/// Converts a format with known channel order and type. Unknown halves fall
/// back to `Rgba`/`UnormInt8`, which callers rule out by validating first.
pub(crate) fn format_to_core(format: &ImageFormat) -> ImageFormatCore {
    ImageFormatCore::new(
        order_to_core(format.order.unwrap_or(ChannelOrder::Rgba)),
        type_to_core(format.channel_type.unwrap_or(ChannelType::UnormInt8)),
    )
}

pub(crate) fn format_from_core(format: &ImageFormatCore) -> ImageFormat {
    ImageFormat {
        order: order_from_core(format.channel_order),
        channel_type: type_from_core(format.channel_data_type),
    }
}


/// An OpenCL image.
pub struct ClImage {
    mem: Mem,
    format: ImageFormat,
    image_type: ImageType,
    extent: [usize; 3],
    element_size: usize,
    access: MemoryAccess,
    sharing: ShareTracker,
}

impl ClImage {
    pub(crate) fn new(mem: Mem, format: ImageFormat, image_type: ImageType, extent: [usize; 3],
            element_size: usize, access: MemoryAccess, shared: bool) -> ClImage {
        let sharing = if shared { ShareTracker::shared() } else { ShareTracker::exclusive() };
        ClImage { mem, format, image_type, extent, element_size, access, sharing }
    }

    /// Returns the underlying memory object.
    pub fn as_core(&self) -> &Mem {
        &self.mem
    }

    pub fn access(&self) -> MemoryAccess {
        self.access
    }
}

impl SharedObject for ClImage {
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

impl Image for ClImage {
    fn format(&self) -> ImageFormat { self.format }

    fn image_type(&self) -> ImageType { self.image_type }

    fn extent(&self) -> [usize; 3] { self.extent }

    fn element_size(&self) -> usize { self.element_size }

    fn read(&self, queue: &ClQueue, origin: [usize; 3], region: [usize; 3], dst: &mut [u8])
            -> OclResult<()> {
        self.sharing.check_access(queue.id())?;
        standard::check_region(self.extent, origin, region, self.element_size, dst.len())?;
        unsafe {
            ocl_core::enqueue_read_image(queue.as_core(), &self.mem, true, origin, region, 0, 0,
                dst, None::<EventCore>, None::<&mut EventCore>)?;
        }
        Ok(())
    }

    fn write(&self, queue: &ClQueue, origin: [usize; 3], region: [usize; 3], src: &[u8])
            -> OclResult<()> {
        self.sharing.check_access(queue.id())?;
        standard::check_region(self.extent, origin, region, self.element_size, src.len())?;
        unsafe {
            ocl_core::enqueue_write_image(queue.as_core(), &self.mem, true, origin, region, 0, 0,
                src, None::<EventCore>, None::<&mut EventCore>)?;
        }
        Ok(())
    }

    /// Fills by writing the repeated pixel over the whole image.
    /// `clEnqueueFillImage` takes a converted color instead of raw pixel
    /// bytes.
    fn fill(&self, queue: &ClQueue, pixel: &[u8]) -> OclResult<ClEvent> {
        self.sharing.check_access(queue.id())?;
        if pixel.len() != self.element_size {
            return Err(format!("fill pixel is {} bytes long, the image element size is {}",
                pixel.len(), self.element_size).into());
        }

        let len = self.extent[0] * self.extent[1] * self.extent[2] * self.element_size;
        let data: Vec<u8> = pixel.iter().cloned().cycle().take(len).collect();
        let mut event = EventCore::null();
        unsafe {
            ocl_core::enqueue_write_image(queue.as_core(), &self.mem, true, [0, 0, 0], self.extent,
                0, 0, &data, None::<EventCore>, Some(&mut event))?;
        }
        Ok(ClEvent::new(event))
    }
}

impl std::fmt::Debug for ClImage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ClImage")
            .field("format", &self.format)
            .field("image_type", &self.image_type)
            .field("extent", &self.extent)
            .field("sharing", &self.sharing.state())
            .finish()
    }
}

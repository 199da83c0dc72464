//! The host compute context.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use parking_lot::RwLock;
use crate::error::{Error as OclError, Result as OclResult};
use crate::gfx::{self, RenderBuffer, TextureType, VertexBuffer};
use crate::host::image::pack_host_data;
use crate::host::{DeviceSpec, GraphicsMemory, HostBuffer, HostDevice, HostEvent,
    HostImage, HostProgram, HostQueue, Storage};
use crate::standard::{self, CommandQueue, Context, Device, ImageDescriptor, ImageFormat, ImageType,
    MemoryAccess};


static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);


/// A builder for `HostContext`.
#[must_use = "builders do nothing unless '::build' is called"]
#[derive(Debug, Default)]
pub struct HostContextBuilder {
    devices: Vec<DeviceSpec>,
    graphics: Option<GraphicsMemory>,
}

impl HostContextBuilder {
    /// Returns a new builder. Without any call to `::device`, the context
    /// gets a single default CPU device.
    pub fn new() -> HostContextBuilder {
        HostContextBuilder::default()
    }

    /// Adds a device.
    pub fn device(mut self, spec: DeviceSpec) -> HostContextBuilder {
        self.devices.push(spec);
        self
    }

    /// Adds several devices.
    pub fn devices<I: IntoIterator<Item = DeviceSpec>>(mut self, specs: I) -> HostContextBuilder {
        self.devices.extend(specs);
        self
    }

    /// Enables sharing with the graphics memory store `graphics`.
    pub fn graphics(mut self, graphics: GraphicsMemory) -> HostContextBuilder {
        self.graphics = Some(graphics);
        self
    }

    /// Creates the context.
    ///
    /// Fails when graphics sharing is requested but a device does not
    /// support it.
    pub fn build(self) -> OclResult<HostContext> {
        let specs = if self.devices.is_empty() { vec![DeviceSpec::default()] } else { self.devices };

        if self.graphics.is_some() {
            if let Some(spec) = specs.iter().find(|s| !s.gl_sharing) {
                return Err(format!("device '{}' does not support sharing with the graphics \
                    pipeline", spec.name).into());
            }
        }

        let id = NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed);
        let devices: Vec<HostDevice> = specs.into_iter().enumerate()
            .map(|(i, spec)| HostDevice::new(id, i, spec))
            .collect();
        let max_alloc = devices.iter().map(|d| d.global_mem_size()).min().unwrap_or(0);

        debug!("created host context {} with {} device(s), graphics sharing: {}", id,
            devices.len(), self.graphics.is_some());

        Ok(HostContext { id, devices, graphics: self.graphics, max_alloc })
    }
}


/// A compute context executing on the host.
///
/// Every command runs synchronously on the calling thread. Combined with a
/// `GraphicsMemory` store it behaves like an OpenCL context created with
/// GL sharing: bound objects alias the renderer's storage.
#[derive(Debug)]
pub struct HostContext {
    id: u64,
    devices: Vec<HostDevice>,
    graphics: Option<GraphicsMemory>,
    max_alloc: u64,
}

impl HostContext {
    /// Returns a new `HostContextBuilder`.
    pub fn builder() -> HostContextBuilder {
        HostContextBuilder::new()
    }

    /// Returns a context with one default device and no graphics sharing.
    pub fn new() -> OclResult<HostContext> {
        HostContextBuilder::new().build()
    }

    /// Returns the graphics store this context shares with, if any.
    pub fn graphics(&self) -> Option<&GraphicsMemory> {
        self.graphics.as_ref()
    }

    fn graphics_or_err(&self) -> OclResult<&GraphicsMemory> {
        self.graphics.as_ref().ok_or(OclError::NoGraphicsSharing)
    }

    fn alloc(&self, size: usize) -> OclResult<Storage> {
        self.check_alloc(size)?;
        Ok(Arc::new(RwLock::new(vec![0u8; size])))
    }

    fn check_alloc(&self, size: usize) -> OclResult<()> {
        if size as u64 > self.max_alloc {
            Err(OclError::OutOfResources { requested: size, available: self.max_alloc as usize })
        } else {
            Ok(())
        }
    }
}

impl Context for HostContext {
    type Device = HostDevice;
    type Queue = HostQueue;
    type Event = HostEvent;
    type Buffer = HostBuffer;
    type Image = HostImage;
    type Program = HostProgram;

    fn devices(&self) -> &[HostDevice] {
        &self.devices
    }

    fn create_queue_for(&self, device: &HostDevice) -> OclResult<HostQueue> {
        standard::check_device_membership(&self.devices, device)?;
        let queue = HostQueue::new(self.id, device.clone());
        trace!("created queue {} on device '{}'", queue.id(), device.name());
        Ok(queue)
    }

    fn create_buffer_with_access(&self, size: usize, access: MemoryAccess)
            -> OclResult<HostBuffer> {
        let storage = self.alloc(size)?;
        Ok(HostBuffer::new(self.id, storage, access, false))
    }

    fn create_buffer_from_host_with_access(&self, data: &[u8], access: MemoryAccess)
            -> OclResult<HostBuffer> {
        self.check_alloc(data.len())?;
        let storage = Arc::new(RwLock::new(data.to_vec()));
        Ok(HostBuffer::new(self.id, storage, access, false))
    }

    fn create_image(&self, access: MemoryAccess, format: &ImageFormat,
            descriptor: &ImageDescriptor) -> OclResult<HostImage> {
        let element_size = descriptor.validate(format)?;

        if !self.query_supported_formats(access, descriptor.image_type)?.contains(format) {
            return Err(OclError::UnsupportedFormat(format!("{} for {:?}", format,
                descriptor.image_type)));
        }

        let extent = descriptor.extent();
        let size = standard::extent_len(extent, element_size).ok_or_else(|| {
            OclError::InvalidDescriptor(format!("image of {:?} is too large", extent))
        })?;
        let storage = match descriptor.host_data {
            Some(ref data) => {
                self.check_alloc(size)?;
                Arc::new(RwLock::new(pack_host_data(descriptor, data, element_size)?))
            },
            None => self.alloc(size)?,
        };

        Ok(HostImage::new(self.id, storage, *format, descriptor.image_type, extent, element_size,
            access, false))
    }

    /// Returns the formats every device of the context supports. Host images
    /// support the same formats for each access and image type.
    fn query_supported_formats(&self, _access: MemoryAccess, _image_type: ImageType)
            -> OclResult<Vec<ImageFormat>> {
        let mut devices = self.devices.iter();
        let mut formats = match devices.next() {
            Some(device) => device.spec().supported_formats(),
            None => return Err(OclError::NoDevices),
        };
        for device in devices {
            let supported = device.spec().supported_formats();
            formats.retain(|f| supported.contains(f));
        }
        Ok(formats)
    }

    fn bind_vertex_buffer(&self, vb: &VertexBuffer, access: MemoryAccess)
            -> OclResult<HostBuffer> {
        let graphics = self.graphics_or_err()?;
        let id = vb.gl_id().ok_or(OclError::NotUploaded("vertex buffer"))?;
        let storage = graphics.buffer_storage(id)?;
        Ok(HostBuffer::new(self.id, storage, access, true))
    }

    fn bind_image(&self, image: &gfx::Image, texture_type: TextureType, miplevel: u32,
            access: MemoryAccess) -> OclResult<HostImage> {
        let graphics = self.graphics_or_err()?;
        let id = image.gl_id().ok_or(OclError::NotUploaded("image"))?;
        image.check_level(miplevel)?;
        let format = compute_format(image.format())?;
        let storage = graphics.texture_level_storage(id, texture_type, miplevel)?;
        let extent = image.level_extent(texture_type, miplevel);
        check_storage_len(id, &storage, extent, image.format().pixel_size())?;

        Ok(HostImage::new(self.id, storage, format, texture_type.image_type(), extent,
            image.format().pixel_size(), access, true))
    }

    fn bind_pure_render_buffer(&self, buffer: &RenderBuffer, access: MemoryAccess)
            -> OclResult<HostImage> {
        let graphics = self.graphics_or_err()?;
        let id = buffer.gl_id().ok_or(OclError::NotUploaded("render buffer"))?;
        let format = compute_format(buffer.format())?;
        let storage = graphics.renderbuffer_storage(id)?;
        let extent = [buffer.width(), buffer.height(), 1];
        check_storage_len(id, &storage, extent, buffer.format().pixel_size())?;

        Ok(HostImage::new(self.id, storage, format, ImageType::Image2D, extent,
            buffer.format().pixel_size(), access, true))
    }

    fn create_program_from_source_code(&self, source: &str) -> OclResult<HostProgram> {
        Ok(HostProgram::new(source.to_owned()))
    }
}

fn compute_format(format: gfx::PixelFormat) -> OclResult<ImageFormat> {
    format.compute_format()
        .ok_or_else(|| OclError::UnsupportedFormat(format!("{:?} has no compute equivalent", format)))
}

/// Returns an error unless the GL object `id` holds exactly `extent` pixels
/// of `pixel_size` bytes.
fn check_storage_len(id: u32, storage: &Storage, extent: [usize; 3], pixel_size: usize)
        -> OclResult<()> {
    let len = storage.read().len();
    match standard::extent_len(extent, pixel_size) {
        Some(expected) if expected == len => Ok(()),
        _ => Err(OclError::InvalidDescriptor(format!("GL object {} holds {} bytes, which does not \
            match {:?} pixels of {} bytes", id, len, extent, pixel_size))),
    }
}

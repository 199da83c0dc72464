//! The OpenCL compute context.

use std::ffi::CString;
use ocl_core::{self, Context as ContextCore, ContextProperties, DeviceId, MemFlags,
    OpenclVersion};
use crate::cl::image::{format_from_core, format_to_core};
use crate::cl::{ClBuffer, ClDevice, ClEvent, ClImage, ClPlatform, ClProgram, ClQueue};
use crate::error::{Error as OclError, Result as OclResult};
use crate::gfx::{self, RenderBuffer, TextureType, VertexBuffer};
use crate::standard::{self, Context, Device, DeviceKinds, ImageDescriptor, ImageFormat, ImageType,
    MemoryAccess};


/// Picks the devices a context is created with.
pub trait PlatformChooser {
    /// Returns the chosen devices. They must all belong to one platform.
    fn choose_devices(&self, platforms: &[ClPlatform]) -> Vec<ClDevice>;
}

/// Chooses all GPUs of the first platform that has one, or all devices of
/// the first platform with any device. When graphics sharing is requested
/// only devices supporting it are considered.
#[derive(Clone, Debug, Default)]
pub struct DefaultPlatformChooser {
    pub require_gl_sharing: bool,
}

impl DefaultPlatformChooser {
    fn eligible<'p>(&self, platform: &'p ClPlatform) -> impl Iterator<Item = &'p ClDevice> + 'p {
        let require_gl_sharing = self.require_gl_sharing;
        platform.devices().iter().filter(move |d| !require_gl_sharing || d.has_gl_sharing())
    }
}

impl PlatformChooser for DefaultPlatformChooser {
    fn choose_devices(&self, platforms: &[ClPlatform]) -> Vec<ClDevice> {
        for platform in platforms {
            let gpus: Vec<ClDevice> = self.eligible(platform)
                .filter(|d| d.kinds().contains(DeviceKinds::GPU))
                .cloned()
                .collect();
            if !gpus.is_empty() {
                return gpus;
            }
        }

        platforms.iter()
            .map(|p| self.eligible(p).cloned().collect::<Vec<_>>())
            .find(|devices| !devices.is_empty())
            .unwrap_or_default()
    }
}


/// A builder for `ClContext`.
#[must_use = "builders do nothing unless '::build' is called"]
pub struct ClContextBuilder {
    chooser: Option<Box<dyn PlatformChooser>>,
    properties: Option<ContextProperties>,
    gl_sharing: bool,
}

impl ClContextBuilder {
    pub fn new() -> ClContextBuilder {
        ClContextBuilder { chooser: None, properties: None, gl_sharing: false }
    }

    /// Sets the device chooser. Defaults to `DefaultPlatformChooser`.
    pub fn chooser<C: PlatformChooser + 'static>(mut self, chooser: C) -> ClContextBuilder {
        self.chooser = Some(Box::new(chooser));
        self
    }

    /// Sets context properties. The platform property is always set to the
    /// platform of the chosen devices.
    pub fn properties(mut self, properties: ContextProperties) -> ClContextBuilder {
        self.properties = Some(properties);
        self
    }

    /// Sets context properties naming the renderer's GL context (e.g. via
    /// `ContextProperties::gl_context` and `::glx_display`), enabling the
    /// `bind_*` methods of the context.
    pub fn gl_properties(mut self, properties: ContextProperties) -> ClContextBuilder {
        self.properties = Some(properties);
        self.gl_sharing = true;
        self
    }

    /// Creates the context.
    pub fn build(self) -> OclResult<ClContext> {
        let platforms = ClPlatform::list()?;
        let devices = match self.chooser {
            Some(ref chooser) => chooser.choose_devices(&platforms),
            None => DefaultPlatformChooser { require_gl_sharing: self.gl_sharing }
                .choose_devices(&platforms),
        };

        if devices.is_empty() {
            return Err(OclError::NoDevices);
        }

        let platform = platforms.iter()
            .find(|p| devices.iter().all(|d| p.devices().contains(d)))
            .ok_or_else(|| OclError::from("chosen devices do not belong to a single platform"))?;

        if self.gl_sharing {
            if let Some(device) = devices.iter().find(|d| !d.has_gl_sharing()) {
                return Err(format!("device '{}' does not support sharing with the graphics \
                    pipeline", device.name()).into());
            }
        }

        let properties = self.properties.unwrap_or_else(ContextProperties::new)
            .platform(*platform.as_core());
        let device_ids: Vec<DeviceId> = devices.iter().map(|d| *d.as_core()).collect();
        let core = ocl_core::create_context(Some(&properties), &device_ids, None, None)?;
        let device_versions = ocl_core::device_versions(&device_ids)?;

        debug!("created OpenCL context on platform '{}' with {} device(s), graphics sharing: {}",
            platform.name(), devices.len(), self.gl_sharing);

        Ok(ClContext { core, devices, device_ids, device_versions, gl_sharing: self.gl_sharing })
    }
}

impl Default for ClContextBuilder {
    fn default() -> ClContextBuilder {
        ClContextBuilder::new()
    }
}


/// A compute context backed by an OpenCL platform.
pub struct ClContext {
    core: ContextCore,
    devices: Vec<ClDevice>,
    device_ids: Vec<DeviceId>,
    device_versions: Vec<OpenclVersion>,
    gl_sharing: bool,
}

impl ClContext {
    pub fn builder() -> ClContextBuilder {
        ClContextBuilder::new()
    }

    /// Returns the underlying context.
    pub fn as_core(&self) -> &ContextCore {
        &self.core
    }

    fn check_gl_sharing(&self) -> OclResult<()> {
        if self.gl_sharing { Ok(()) } else { Err(OclError::NoGraphicsSharing) }
    }
}

fn compute_format(format: gfx::PixelFormat) -> OclResult<ImageFormat> {
    format.compute_format()
        .ok_or_else(|| OclError::UnsupportedFormat(format!("{:?} has no compute equivalent", format)))
}

impl Context for ClContext {
    type Device = ClDevice;
    type Queue = ClQueue;
    type Event = ClEvent;
    type Buffer = ClBuffer;
    type Image = ClImage;
    type Program = ClProgram;

    fn devices(&self) -> &[ClDevice] {
        &self.devices
    }

    fn create_queue_for(&self, device: &ClDevice) -> OclResult<ClQueue> {
        standard::check_device_membership(&self.devices, device)?;
        let core = ocl_core::create_command_queue(&self.core, device.as_core(), None)?;
        Ok(ClQueue::new(core, device.clone()))
    }

    fn create_buffer_with_access(&self, size: usize, access: MemoryAccess)
            -> OclResult<ClBuffer> {
        let mem = unsafe {
            ocl_core::create_buffer::<_, u8>(&self.core, access.into(), size, None)?
        };
        Ok(ClBuffer::new(mem, size, access, false))
    }

    fn create_buffer_from_host_with_access(&self, data: &[u8], access: MemoryAccess)
            -> OclResult<ClBuffer> {
        let flags = MemFlags::from(access).copy_host_ptr();
        let mem = unsafe {
            ocl_core::create_buffer(&self.core, flags, data.len(), Some(data))?
        };
        Ok(ClBuffer::new(mem, data.len(), access, false))
    }

    fn create_image(&self, access: MemoryAccess, format: &ImageFormat,
            descriptor: &ImageDescriptor) -> OclResult<ClImage> {
        let element_size = descriptor.validate(format)?;

        if descriptor.image_type == ImageType::Image1DBuffer {
            return Err(OclError::InvalidDescriptor("1D buffer images are created from a \
                buffer, which is not supported".to_owned()));
        }
        if !self.query_supported_formats(access, descriptor.image_type)?.contains(format) {
            return Err(OclError::UnsupportedFormat(format!("{} for {:?}", format,
                descriptor.image_type)));
        }

        let mut flags = MemFlags::from(access);
        let (row_pitch, slice_pitch) = match descriptor.host_data {
            Some(_) => {
                flags = flags.copy_host_ptr();
                (descriptor.row_pitch, descriptor.slice_pitch)
            },
            None => (0, 0),
        };
        let desc = ocl_core::ImageDescriptor::new(descriptor.image_type.to_mem_object_type(),
            descriptor.width, descriptor.height, descriptor.depth, descriptor.array_size,
            row_pitch, slice_pitch, None);

        let mem = unsafe {
            ocl_core::create_image(&self.core, flags, &format_to_core(format), &desc,
                descriptor.host_data.as_ref().map(|d| d.as_slice()),
                Some(&self.device_versions))?
        };

        Ok(ClImage::new(mem, *format, descriptor.image_type, descriptor.extent(), element_size,
            access, false))
    }

    fn query_supported_formats(&self, access: MemoryAccess, image_type: ImageType)
            -> OclResult<Vec<ImageFormat>> {
        let formats = ocl_core::get_supported_image_formats(&self.core, access.into(),
            image_type.to_mem_object_type())?;

        Ok(formats.iter()
            .map(|res| match *res {
                Ok(ref format) => format_from_core(format),
                Err(_) => ImageFormat { order: None, channel_type: None },
            })
            .collect())
    }

    fn bind_vertex_buffer(&self, vb: &VertexBuffer, access: MemoryAccess)
            -> OclResult<ClBuffer> {
        self.check_gl_sharing()?;
        let id = vb.gl_id().ok_or(OclError::NotUploaded("vertex buffer"))?;
        let mem = unsafe { ocl_core::create_from_gl_buffer(&self.core, id, access.into())? };
        Ok(ClBuffer::new(mem, vb.byte_len(), access, true))
    }

    fn bind_image(&self, image: &gfx::Image, texture_type: TextureType, miplevel: u32,
            access: MemoryAccess) -> OclResult<ClImage> {
        self.check_gl_sharing()?;
        let id = image.gl_id().ok_or(OclError::NotUploaded("image"))?;
        image.check_level(miplevel)?;
        let format = compute_format(image.format())?;

        let mem = unsafe {
            ocl_core::create_from_gl_texture(&self.core, texture_type.gl_target(),
                miplevel as i32, id, access.into(), Some(&self.device_versions))?
        };

        Ok(ClImage::new(mem, format, texture_type.image_type(),
            image.level_extent(texture_type, miplevel), image.format().pixel_size(), access, true))
    }

    fn bind_pure_render_buffer(&self, buffer: &RenderBuffer, access: MemoryAccess)
            -> OclResult<ClImage> {
        self.check_gl_sharing()?;
        let id = buffer.gl_id().ok_or(OclError::NotUploaded("render buffer"))?;
        let format = compute_format(buffer.format())?;
        let mem = unsafe {
            ocl_core::create_from_gl_renderbuffer(&self.core, id, access.into())?
        };

        Ok(ClImage::new(mem, format, ImageType::Image2D, [buffer.width(), buffer.height(), 1],
            buffer.format().pixel_size(), access, true))
    }

    fn create_program_from_source_code(&self, source: &str) -> OclResult<ClProgram> {
        let src = CString::new(source)
            .map_err(|_| OclError::from("program source contains a nul byte"))?;
        let core = ocl_core::create_program_with_source(&self.core, &[src])?;
        Ok(ClProgram::new(core, self.device_ids.clone(), source.to_owned()))
    }
}

impl std::fmt::Debug for ClContext {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ClContext")
            .field("devices", &self.devices)
            .field("gl_sharing", &self.gl_sharing)
            .finish()
    }
}

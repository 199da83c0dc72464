//! The central compute context.

use crate::asset::AssetLocator;
use crate::error::{Error as OclError, Result as OclResult};
use crate::gfx::{self, RenderBuffer, Texture, TextureType, VertexBuffer};
use crate::standard::{Buffer, CommandQueue, Device, Event, Image, ImageDescriptor, ImageFormat,
    ImageType, MemoryAccess, Program, ProgramSource};


/// The central compute context. Every action starts from here.
///
/// The context is used to:
///
/// * Query the available devices
/// * Create command queues
/// * Create buffers and images
/// * Create buffers and images shared with vertex buffers, textures and
///   render buffers of the renderer
/// * Create program objects from source code and source files
///
/// Backends implement the required methods. The remaining methods are
/// conveniences expressed in terms of them and should not be overridden
/// with different semantics.
///
/// ## Shared objects
///
/// Objects returned by the `bind_*` methods share memory with the graphics
/// resource they were created from: changes in one view are visible in the
/// other. The resource must already have been uploaded to the GPU, i.e. it
/// must have been used at least once for drawing. Before a shared object
/// can be used by compute commands it must be acquired with
/// `SharedObject::acquire_for_sharing` and afterwards released with
/// `SharedObject::release_for_sharing`, so that graphics and compute
/// operations do not interfere with each other.
pub trait Context {
    type Device: Device;
    type Queue: CommandQueue<Device = Self::Device>;
    type Event: Event;
    type Buffer: Buffer<Queue = Self::Queue, Event = Self::Event>;
    type Image: Image<Queue = Self::Queue, Event = Self::Event>;
    type Program: Program;

    /// Returns all devices of this context. They all belong to the same
    /// platform and were picked when the context was created.
    fn devices(&self) -> &[Self::Device];

    /// Creates a command queue on the first device returned by `devices`.
    fn create_queue(&self) -> OclResult<Self::Queue> {
        match self.devices().first() {
            Some(device) => self.create_queue_for(device),
            None => Err(OclError::NoDevices),
        }
    }

    /// Creates a command queue sending commands to `device`, which must be
    /// one of `devices`.
    fn create_queue_for(&self, device: &Self::Device) -> OclResult<Self::Queue>;

    /// Allocates a new buffer of `size` bytes with the given kernel access.
    fn create_buffer_with_access(&self, size: usize, access: MemoryAccess)
        -> OclResult<Self::Buffer>;

    /// Allocates a new read-write buffer of `size` bytes.
    fn create_buffer(&self, size: usize) -> OclResult<Self::Buffer> {
        self.create_buffer_with_access(size, MemoryAccess::ReadWrite)
    }

    /// Creates a new buffer initialized with a copy of `data`.
    fn create_buffer_from_host_with_access(&self, data: &[u8], access: MemoryAccess)
        -> OclResult<Self::Buffer>;

    /// Creates a new read-write buffer initialized with a copy of `data`.
    fn create_buffer_from_host(&self, data: &[u8]) -> OclResult<Self::Buffer> {
        self.create_buffer_from_host_with_access(data, MemoryAccess::ReadWrite)
    }

    /// Creates a new 1D, 2D or 3D image.
    ///
    /// `format` specifies the element type and channel order, `descriptor`
    /// the dimensions and, optionally, the initial contents.
    fn create_image(&self, access: MemoryAccess, format: &ImageFormat,
        descriptor: &ImageDescriptor) -> OclResult<Self::Image>;

    /// Returns every image format supported for `access` and `image_type`.
    ///
    /// Entries may have an unknown channel order or type when the device
    /// supports formats this crate does not know.
    fn query_supported_formats(&self, access: MemoryAccess, image_type: ImageType)
        -> OclResult<Vec<ImageFormat>>;

    /// Creates a buffer sharing memory with an uploaded vertex buffer, e.g.
    /// to animate particle meshes from kernels.
    fn bind_vertex_buffer(&self, vb: &VertexBuffer, access: MemoryAccess)
        -> OclResult<Self::Buffer>;

    /// Creates an image sharing memory with mip level `miplevel` of an
    /// uploaded engine image. `texture_type` is needed because the engine
    /// image does not record how it is sampled.
    fn bind_image(&self, image: &gfx::Image, texture_type: TextureType, miplevel: u32,
        access: MemoryAccess) -> OclResult<Self::Image>;

    /// Creates an image sharing memory with mip level `miplevel` of a
    /// texture.
    ///
    /// Equivalent to `bind_image(texture.image(), texture.texture_type(),
    /// miplevel, access)`.
    fn bind_texture_level(&self, texture: &Texture, miplevel: u32, access: MemoryAccess)
            -> OclResult<Self::Image> {
        self.bind_image(texture.image(), texture.texture_type(), miplevel, access)
    }

    /// Creates an image sharing memory with the base level of a texture.
    fn bind_texture(&self, texture: &Texture, access: MemoryAccess) -> OclResult<Self::Image> {
        self.bind_texture_level(texture, 0, access)
    }

    /// Creates an image sharing memory with a render buffer, e.g. for
    /// reductions over a rendered frame such as tone mapping.
    ///
    /// Render buffers backed by a texture share the texture's base level.
    fn bind_render_buffer(&self, buffer: &RenderBuffer, access: MemoryAccess)
            -> OclResult<Self::Image> {
        match buffer.texture() {
            Some(texture) => self.bind_texture(texture, access),
            None => self.bind_pure_render_buffer(buffer, access),
        }
    }

    /// Creates an image sharing memory with a render buffer which is not
    /// backed by a texture. Use `bind_render_buffer` instead.
    fn bind_pure_render_buffer(&self, buffer: &RenderBuffer, access: MemoryAccess)
        -> OclResult<Self::Image>;

    /// Creates a program object from source code. The program still needs
    /// to be built.
    fn create_program_from_source_code(&self, source: &str) -> OclResult<Self::Program>;

    /// Creates a program object from an include string followed by the
    /// contents of `resources`, loaded through `locator` in order.
    ///
    /// Typically the include string holds compile time constants like a grid
    /// size, followed by library files (`.clh`) and one main file (`.cl`).
    /// Files that can't be loaded are skipped with a warning.
    fn create_program_from_source_files_with_include<L, S>(&self, locator: &L, include: &str,
            resources: &[S]) -> OclResult<Self::Program>
            where L: AssetLocator + ?Sized, S: AsRef<str>
    {
        let source = ProgramSource::new()
            .include(include)
            .resources(resources.iter().map(|r| r.as_ref()))
            .assemble(locator);
        self.create_program_from_source_code(&source)
    }

    /// `create_program_from_source_files_with_include` with an empty include
    /// string.
    fn create_program_from_source_files<L, S>(&self, locator: &L, resources: &[S])
            -> OclResult<Self::Program>
            where L: AssetLocator + ?Sized, S: AsRef<str>
    {
        self.create_program_from_source_files_with_include(locator, "", resources)
    }
}


/// Returns an error unless `device` is one of `devices`.
pub fn check_device_membership<D: Device>(devices: &[D], device: &D) -> OclResult<()> {
    if devices.contains(device) {
        Ok(())
    } else {
        Err(OclError::ForeignDevice(device.name()))
    }
}

//! Tests run against the host backend, which needs no OpenCL installation.
//!
//! `RecordingContext` wraps a `HostContext` and records every call to a
//! required `Context` method, so the tests can check what the provided
//! convenience methods forward to.

pub mod buffer_copy;
pub mod context_props;
pub mod image_ops;
pub mod source_assembly;

use std::cell::RefCell;
use rand::{self, Rng};
use crate::error::{Error as OclError, Result as OclResult};
use crate::gfx::{self, RenderBuffer, TextureType, VertexBuffer};
use crate::host::{GraphicsMemory, HostBuffer, HostContext, HostDevice, HostEvent, HostImage,
    HostProgram, HostQueue};
use crate::standard::{Context, ImageDescriptor, ImageFormat, ImageType, MemoryAccess};


fn gen_region_origin(dims: &[usize; 3]) -> ([usize; 3], [usize; 3]) {
    let mut rng = rand::thread_rng();

    let region = [
        rng.gen_range(1..=dims[0]),
        rng.gen_range(1..=dims[1]),
        rng.gen_range(1..=dims[2]),
    ];

    let origin = [
        rng.gen_range(0..=(dims[0] - region[0])),
        rng.gen_range(0..=(dims[1] - region[1])),
        rng.gen_range(0..=(dims[2] - region[2])),
    ];

    (origin, region)
}

fn within_region(coords: [usize; 3], region_ofs: [usize; 3], region_size: [usize; 3]) -> bool {
    let mut within: bool = true;
    for i in 0..3 {
        within &= coords[i] >= region_ofs[i] && coords[i] < (region_ofs[i] + region_size[i]);
    }
    within
}

/// Checks that every element of `vec` (laid out with `dims` and `elem`
/// bytes per element) equals `in_region_val` inside the region and
/// `out_region_val` outside of it.
fn verify_vec_rect(origin: [usize; 3], region: [usize; 3], in_region_val: u8, out_region_val: u8,
        dims: [usize; 3], elem: usize, vec: &[u8]) -> OclResult<()> {
    for z in 0..dims[2] {
        for y in 0..dims[1] {
            for x in 0..dims[0] {
                let idz = ((z * dims[1] + y) * dims[0] + x) * elem;
                let expected = if within_region([x, y, z], origin, region) {
                    in_region_val
                } else {
                    out_region_val
                };

                for idx in idz..idz + elem {
                    if vec[idx] != expected {
                        return Err(format!("vec[{}] ({:?}) should be '{}' but is '{}'", idx,
                            [x, y, z], expected, vec[idx]).into());
                    }
                }
            }
        }
    }
    Ok(())
}

fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen()).collect()
}


#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CreateQueueFor(usize),
    CreateBuffer(usize, MemoryAccess),
    CreateBufferFromHost(Vec<u8>, MemoryAccess),
    CreateImage(MemoryAccess, ImageFormat),
    QuerySupportedFormats(MemoryAccess, ImageType),
    BindVertexBuffer(Option<u32>, MemoryAccess),
    BindImage { gl_id: Option<u32>, texture_type: TextureType, miplevel: u32,
        access: MemoryAccess },
    BindPureRenderBuffer(Option<u32>, MemoryAccess),
    ProgramFromSource(String),
}

/// A context delegating to a `HostContext` while recording the calls made
/// to the required methods.
pub struct RecordingContext {
    inner: HostContext,
    devices: Vec<HostDevice>,
    calls: RefCell<Vec<Call>>,
}

impl RecordingContext {
    pub fn new() -> RecordingContext {
        RecordingContext::with_graphics(GraphicsMemory::new())
    }

    pub fn with_graphics(graphics: GraphicsMemory) -> RecordingContext {
        let inner = HostContext::builder().graphics(graphics).build().unwrap();
        let devices = inner.devices().to_vec();
        RecordingContext { inner, devices, calls: RefCell::new(Vec::new()) }
    }

    /// A context reporting an empty device list.
    pub fn without_devices() -> RecordingContext {
        let mut ctx = RecordingContext::new();
        ctx.devices.clear();
        ctx
    }

    pub fn graphics(&self) -> &GraphicsMemory {
        self.inner.graphics().unwrap()
    }

    /// Returns and clears the recorded calls.
    pub fn take_calls(&self) -> Vec<Call> {
        self.calls.borrow_mut().drain(..).collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl Context for RecordingContext {
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
        self.record(Call::CreateQueueFor(device.index()));
        self.inner.create_queue_for(device)
    }

    fn create_buffer_with_access(&self, size: usize, access: MemoryAccess)
            -> OclResult<HostBuffer> {
        self.record(Call::CreateBuffer(size, access));
        self.inner.create_buffer_with_access(size, access)
    }

    fn create_buffer_from_host_with_access(&self, data: &[u8], access: MemoryAccess)
            -> OclResult<HostBuffer> {
        self.record(Call::CreateBufferFromHost(data.to_vec(), access));
        self.inner.create_buffer_from_host_with_access(data, access)
    }

    fn create_image(&self, access: MemoryAccess, format: &ImageFormat,
            descriptor: &ImageDescriptor) -> OclResult<HostImage> {
        self.record(Call::CreateImage(access, *format));
        self.inner.create_image(access, format, descriptor)
    }

    fn query_supported_formats(&self, access: MemoryAccess, image_type: ImageType)
            -> OclResult<Vec<ImageFormat>> {
        self.record(Call::QuerySupportedFormats(access, image_type));
        self.inner.query_supported_formats(access, image_type)
    }

    fn bind_vertex_buffer(&self, vb: &VertexBuffer, access: MemoryAccess)
            -> OclResult<HostBuffer> {
        self.record(Call::BindVertexBuffer(vb.gl_id(), access));
        self.inner.bind_vertex_buffer(vb, access)
    }

    fn bind_image(&self, image: &gfx::Image, texture_type: TextureType, miplevel: u32,
            access: MemoryAccess) -> OclResult<HostImage> {
        self.record(Call::BindImage { gl_id: image.gl_id(), texture_type, miplevel, access });
        self.inner.bind_image(image, texture_type, miplevel, access)
    }

    fn bind_pure_render_buffer(&self, buffer: &RenderBuffer, access: MemoryAccess)
            -> OclResult<HostImage> {
        self.record(Call::BindPureRenderBuffer(buffer.gl_id(), access));
        self.inner.bind_pure_render_buffer(buffer, access)
    }

    fn create_program_from_source_code(&self, source: &str) -> OclResult<HostProgram> {
        self.record(Call::ProgramFromSource(source.to_owned()));
        self.inner.create_program_from_source_code(source)
    }
}

fn assert_err<T: std::fmt::Debug, F: Fn(&OclError) -> bool>(result: OclResult<T>, pred: F) {
    match result {
        Err(ref err) if pred(err) => (),
        other => panic!("unexpected result: {:?}", other),
    }
}

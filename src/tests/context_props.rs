//! What the provided `Context` methods forward to.

use crate::asset::MemoryLocator;
use crate::gfx::{Image, PixelFormat, RenderBuffer, Texture, TextureType};
use crate::standard::{Buffer, CommandQueue, Context, Device, MemoryAccess, Program};
use crate::host::{DeviceSpec, HostContext};
use super::{assert_err, Call, RecordingContext};
use crate::error::Error as OclError;


#[test]
fn create_queue_uses_first_device() {
    let ctx = RecordingContext::new();
    let queue = ctx.create_queue().unwrap();

    assert_eq!(ctx.take_calls(), vec![Call::CreateQueueFor(0)]);
    assert_eq!(queue.device(), &ctx.devices()[0]);
}

#[test]
fn create_queue_without_devices() {
    let ctx = RecordingContext::without_devices();
    assert_err(ctx.create_queue(), |e| match *e { OclError::NoDevices => true, _ => false });
    assert!(ctx.take_calls().is_empty());
}

#[test]
fn create_queue_picks_first_of_several() {
    let ctx = HostContext::builder()
        .device(DeviceSpec::new("alpha"))
        .device(DeviceSpec::new("beta"))
        .build().unwrap();

    assert_eq!(ctx.create_queue().unwrap().device().name(), "alpha");
    assert_eq!(ctx.create_queue_for(&ctx.devices()[1]).unwrap().device().name(), "beta");
}

#[test]
fn create_queue_for_foreign_device() {
    let ctx_a = HostContext::new().unwrap();
    let ctx_b = HostContext::new().unwrap();

    assert_err(ctx_a.create_queue_for(&ctx_b.devices()[0]),
        |e| match *e { OclError::ForeignDevice(_) => true, _ => false });
}

#[test]
fn buffers_default_to_read_write() {
    let ctx = RecordingContext::new();

    let buffer = ctx.create_buffer(64).unwrap();
    assert_eq!(buffer.size(), 64);
    assert_eq!(buffer.access(), MemoryAccess::ReadWrite);

    let buffer = ctx.create_buffer_from_host(&[9, 8, 7]).unwrap();
    assert_eq!(buffer.size(), 3);
    assert_eq!(buffer.access(), MemoryAccess::ReadWrite);

    assert_eq!(ctx.take_calls(), vec![
        Call::CreateBuffer(64, MemoryAccess::ReadWrite),
        Call::CreateBufferFromHost(vec![9, 8, 7], MemoryAccess::ReadWrite),
    ]);
}

#[test]
fn explicit_access_is_kept() {
    let ctx = RecordingContext::new();
    let buffer = ctx.create_buffer_with_access(16, MemoryAccess::WriteOnly).unwrap();
    assert_eq!(buffer.access(), MemoryAccess::WriteOnly);
    assert!(!buffer.access().allows_kernel_read());
    assert!(buffer.access().allows_kernel_write());
}

#[test]
fn bind_texture_forwards_to_bind_image() {
    let ctx = RecordingContext::new();
    let mut texture = Texture::new(Image::new(PixelFormat::RGBA8, 8, 8, 1).with_mip_count(4),
        TextureType::TwoDimensional);
    ctx.graphics().upload_image(texture.image_mut(), TextureType::TwoDimensional, None).unwrap();
    let gl_id = texture.image().gl_id();

    ctx.bind_texture_level(&texture, 2, MemoryAccess::ReadOnly).unwrap();
    ctx.bind_texture(&texture, MemoryAccess::WriteOnly).unwrap();

    assert_eq!(ctx.take_calls(), vec![
        Call::BindImage { gl_id, texture_type: TextureType::TwoDimensional, miplevel: 2,
            access: MemoryAccess::ReadOnly },
        Call::BindImage { gl_id, texture_type: TextureType::TwoDimensional, miplevel: 0,
            access: MemoryAccess::WriteOnly },
    ]);
}

#[test]
fn bind_render_buffer_with_texture() {
    let ctx = RecordingContext::new();
    let texture = Texture::new(Image::new(PixelFormat::RGBA16F, 32, 16, 1),
        TextureType::TwoDimensional);
    let mut rb = RenderBuffer::with_texture(texture);
    ctx.graphics().upload_render_buffer(&mut rb).unwrap();
    let gl_id = rb.texture().unwrap().image().gl_id();
    assert!(gl_id.is_some());

    let image = ctx.bind_render_buffer(&rb, MemoryAccess::ReadWrite).unwrap();
    assert_eq!(crate::standard::Image::extent(&image), [32, 16, 1]);
    assert_eq!(ctx.take_calls(), vec![Call::BindImage { gl_id,
        texture_type: TextureType::TwoDimensional, miplevel: 0, access: MemoryAccess::ReadWrite }]);
}

#[test]
fn bind_render_buffer_without_texture() {
    let ctx = RecordingContext::new();
    let mut rb = RenderBuffer::new(PixelFormat::RGBA8, 4, 4);
    ctx.graphics().upload_render_buffer(&mut rb).unwrap();

    ctx.bind_render_buffer(&rb, MemoryAccess::ReadOnly).unwrap();
    assert_eq!(ctx.take_calls(), vec![Call::BindPureRenderBuffer(rb.gl_id(),
        MemoryAccess::ReadOnly)]);
}

#[test]
fn program_from_source_files_concatenates() {
    let ctx = RecordingContext::new();
    let locator = MemoryLocator::new()
        .with("Common.clh", "#define ONE 1\r\nfloat one() { return ONE; }")
        .with("Main.cl", "__kernel void main_k(__global float* a) { a[0] = one(); }\n");

    let program = ctx.create_program_from_source_files_with_include(&locator, "#define N 8\n",
        &["Common.clh", "Missing.clh", "Main.cl"]).unwrap();

    let expected = "#define N 8\n#define ONE 1\nfloat one() { return ONE; }\n\
        __kernel void main_k(__global float* a) { a[0] = one(); }\n";
    assert_eq!(program.source(), expected);
    assert_eq!(ctx.take_calls(), vec![Call::ProgramFromSource(expected.to_owned())]);
}

#[test]
fn program_from_source_files_without_include() {
    let ctx = RecordingContext::new();
    let locator = MemoryLocator::new().with("a.cl", "A").with("b.cl", "B");

    let program = ctx.create_program_from_source_files(&locator, &["b.cl", "a.cl", "b.cl"])
        .unwrap();
    assert_eq!(program.source(), "B\nA\nB\n");
}

#[test]
fn program_from_no_files_is_the_include() {
    let ctx = RecordingContext::new();
    let program = ctx.create_program_from_source_files_with_include(&MemoryLocator::new(),
        "#define X 1\n", &[] as &[&str]).unwrap();
    assert_eq!(program.source(), "#define X 1\n");
}

//! A frame of a particle system: the renderer uploads a mesh and a render
//! target, compute work updates both, and the renderer sees the results.

extern crate ocl_scene;

use ocl_scene::gfx::{Image as GfxImage, PixelFormat, RenderBuffer, Texture, TextureType,
    VertexBuffer, VertexFormat, VertexKind};
use ocl_scene::host::{GraphicsMemory, HostContext};
use ocl_scene::{with_shared, Buffer, Context, Image, MemoryAccess, MemoryLocator, Program,
    SharedObject};

const PARTICLES: usize = 256;

fn positions(step: f32) -> Vec<u8> {
    (0..PARTICLES * 3)
        .flat_map(|i| (i as f32 * step).to_ne_bytes().to_vec())
        .collect()
}

#[test]
fn particle_frame() {
    ocl_scene::init_logging(Default::default());

    let graphics = GraphicsMemory::new();
    let context = HostContext::builder().graphics(graphics.clone()).build().unwrap();
    let queue = context.create_queue().unwrap();

    // Renderer side:
    let mut mesh = VertexBuffer::new(VertexKind::Position, 3, VertexFormat::Float, PARTICLES);
    graphics.upload_vertex_buffer(&mut mesh, &positions(1.0)).unwrap();
    let mut target = RenderBuffer::with_texture(Texture::new(
        GfxImage::new(PixelFormat::RGBA8, 8, 8, 1), TextureType::TwoDimensional));
    graphics.upload_render_buffer(&mut target).unwrap();

    // Compute side:
    let locator = MemoryLocator::new()
        .with("Common/Math.clh", "float3 advance(float3 p, float dt) { return p * dt; }")
        .with("Particles.cl", "__kernel void update(__global float* pos, float dt) {\n\
            pos[get_global_id(0)] *= dt;\n}\n");
    let mut program = context.create_program_from_source_files_with_include(&locator,
        &format!("#define PARTICLES {}\n", PARTICLES), &["Common/Math.clh", "Particles.cl"])
        .unwrap();
    program.build("-cl-fast-relaxed-math").unwrap();
    assert_eq!(program.kernel_names().unwrap(), vec!["update".to_owned()]);
    assert!(program.source().starts_with("#define PARTICLES 256\nfloat3 advance"));

    let staging = context.create_buffer_from_host(&positions(2.0)).unwrap();
    let vertices = context.bind_vertex_buffer(&mesh, MemoryAccess::WriteOnly).unwrap();
    let frame = context.bind_render_buffer(&target, MemoryAccess::WriteOnly).unwrap();
    assert!(vertices.is_shared() && frame.is_shared() && !staging.is_shared());

    with_shared(&queue, &[&vertices], || {
        staging.copy_to(&queue, &vertices, 0, 0, staging.size()).map(|_| ())
    }).unwrap();
    with_shared(&queue, &[&frame], || frame.fill(&queue, &[255, 0, 0, 255]).map(|_| ()))
        .unwrap();

    assert_eq!(graphics.read_vertex_buffer(&mesh).unwrap(), positions(2.0));
    assert_eq!(graphics.read_render_buffer(&target).unwrap(), [255u8, 0, 0, 255].repeat(64));
}

//! Tests various image operations.
//!
//! Writes random regions and verifies the whole image afterwards.

use crate::error::Error as OclError;
use crate::host::{DeviceSpec, HostContext};
use crate::standard::{ChannelOrder, ChannelType, Context, Image, ImageDescriptor, ImageFormat,
    ImageType, MemoryAccess};
use super::{assert_err, gen_region_origin, random_bytes, verify_vec_rect};

const DIMS: [usize; 3] = [16, 32, 4];
const TEST_ITERS: i32 = 8;

#[test]
fn image_ops() {
    let context = HostContext::new().unwrap();
    let queue = context.create_queue().unwrap();
    let format = ImageFormat::new(ChannelOrder::Rgba, ChannelType::SignedInt32);
    let elem = 16;

    let img = context.create_image(MemoryAccess::ReadWrite, &format,
        &ImageDescriptor::image_3d(DIMS[0], DIMS[1], DIMS[2])).unwrap();
    assert_eq!(img.element_size(), elem);
    assert_eq!(img.extent(), DIMS);
    assert_eq!(img.image_type(), ImageType::Image3D);

    let mut vec = vec![0u8; DIMS[0] * DIMS[1] * DIMS[2] * elem];

    for ttl_runs in 0..TEST_ITERS {
        let (origin, region) = gen_region_origin(&DIMS);
        let in_val = ttl_runs as u8 + 1;

        img.fill(&queue, &[0u8; 16]).unwrap();
        img.write(&queue, origin, region, &vec![in_val; region[0] * region[1] * region[2] * elem])
            .unwrap();

        img.read(&queue, [0, 0, 0], DIMS, &mut vec).unwrap();
        verify_vec_rect(origin, region, in_val, 0, DIMS, elem, &vec).unwrap();

        let mut part = vec![0u8; region[0] * region[1] * region[2] * elem];
        img.read(&queue, origin, region, &mut part).unwrap();
        assert!(part.iter().all(|&b| b == in_val));
    }
}

#[test]
fn pitched_host_data() {
    let context = HostContext::new().unwrap();
    let queue = context.create_queue().unwrap();
    let format = ImageFormat::new(ChannelOrder::R, ChannelType::UnsignedInt8);

    // Rows of 3 pixels padded to 4 bytes, slices of 2 rows padded to 12 bytes.
    let data = vec![
        1, 2, 3, 0,   4, 5, 6, 0,   0, 0, 0, 0,
        7, 8, 9, 0,   10, 11, 12, 0,   0, 0, 0, 0,
    ];
    let desc = ImageDescriptor::image_3d(3, 2, 2).with_host_data(data, 4, 12);
    let img = context.create_image(MemoryAccess::ReadOnly, &format, &desc).unwrap();

    let mut out = vec![0u8; 12];
    img.read(&queue, [0, 0, 0], [3, 2, 2], &mut out).unwrap();
    assert_eq!(out, (1..=12).collect::<Vec<u8>>());
}

#[test]
fn image_1d_array_layers() {
    let context = HostContext::new().unwrap();
    let queue = context.create_queue().unwrap();
    let format = ImageFormat::new(ChannelOrder::Rg, ChannelType::UnsignedInt8);
    let data = random_bytes(4 * 2 * 3);

    let desc = ImageDescriptor::new(ImageType::Image1DArray, 4, 0, 0, 3)
        .with_host_data(data.clone(), 0, 0);
    let img = context.create_image(MemoryAccess::ReadWrite, &format, &desc).unwrap();
    assert_eq!(img.extent(), [4, 3, 1]);

    let mut layer = vec![0u8; 8];
    img.read(&queue, [0, 2, 0], [4, 1, 1], &mut layer).unwrap();
    assert_eq!(layer, &data[16..24]);
}

#[test]
fn fill_pixel_must_match_element_size() {
    let context = HostContext::new().unwrap();
    let queue = context.create_queue().unwrap();
    let img = context.create_image(MemoryAccess::ReadWrite, &ImageFormat::rgba8(),
        &ImageDescriptor::image_2d(2, 2)).unwrap();

    assert!(img.fill(&queue, &[1, 2, 3]).is_err());
    img.fill(&queue, &[1, 2, 3, 4]).unwrap();

    let mut out = vec![0u8; 16];
    img.read(&queue, [0, 0, 0], [2, 2, 1], &mut out).unwrap();
    assert_eq!(out, [1u8, 2, 3, 4].repeat(4));
}

#[test]
fn unsupported_formats() {
    let context = HostContext::builder()
        .device(DeviceSpec::new("limited").image_formats(vec![ImageFormat::rgba8()]))
        .build().unwrap();

    let formats = context.query_supported_formats(MemoryAccess::ReadOnly, ImageType::Image2D)
        .unwrap();
    assert_eq!(formats, vec![ImageFormat::rgba8()]);

    context.create_image(MemoryAccess::ReadOnly, &ImageFormat::rgba8(),
        &ImageDescriptor::image_2d(4, 4)).unwrap();
    assert_err(context.create_image(MemoryAccess::ReadOnly, &ImageFormat::rgba_float(),
        &ImageDescriptor::image_2d(4, 4)),
        |e| match *e { OclError::UnsupportedFormat(_) => true, _ => false });
}

#[test]
fn supported_formats_are_shared_by_all_devices() {
    let context = HostContext::builder()
        .device(DeviceSpec::new("a").image_formats(vec![ImageFormat::rgba8(),
            ImageFormat::rgba_float()]))
        .device(DeviceSpec::new("b"))
        .device(DeviceSpec::new("c").image_formats(vec![ImageFormat::rgba_float()]))
        .build().unwrap();

    assert_eq!(context.query_supported_formats(MemoryAccess::WriteOnly, ImageType::Image3D)
        .unwrap(), vec![ImageFormat::rgba_float()]);
}

#[test]
fn default_device_supports_every_known_format() {
    let context = HostContext::new().unwrap();
    let formats = context.query_supported_formats(MemoryAccess::ReadWrite, ImageType::Image2D)
        .unwrap();
    assert!(formats.contains(&ImageFormat::rgba8()));
    assert!(formats.contains(&ImageFormat::new(ChannelOrder::Rgb, ChannelType::UnormShort565)));
    assert!(!formats.contains(&ImageFormat::new(ChannelOrder::Rgb, ChannelType::Float)));
    assert!(formats.iter().all(|f| f.is_known()));
}

#[test]
fn oversized_images() {
    let context = HostContext::new().unwrap();

    assert_err(context.create_image(MemoryAccess::ReadWrite, &ImageFormat::rgba8(),
        &ImageDescriptor::image_3d(1 << 22, 1 << 22, 1 << 22)),
        |e| match *e { OclError::InvalidDescriptor(_) => true, _ => false });

    // 2 GiB, above the default device's 1 GiB.
    assert_err(context.create_image(MemoryAccess::ReadWrite, &ImageFormat::rgba_float(),
        &ImageDescriptor::image_3d(1 << 9, 1 << 9, 1 << 9)),
        |e| match *e { OclError::OutOfResources { .. } => true, _ => false });
}

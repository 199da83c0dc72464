//! Engine-side graphics resources which can be shared with compute.
//!
//! These types carry just enough of the renderer's view of a resource to bind
//! it: its layout and the GL object id assigned when the renderer uploaded
//! it. A resource without an id has never been drawn and cannot be shared.

use crate::error::{Error as OclError, Result as OclResult};
use crate::standard::{ImageFormat, ImageType};


/// The role of a vertex buffer within a mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexKind {
    Position,
    Normal,
    Tangent,
    TexCoord,
    Color,
    Size,
    Index,
}

/// The component type of a vertex buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Half,
    Float,
    Double,
}

impl VertexFormat {
    /// Size of one component in bytes.
    pub fn component_size(&self) -> usize {
        match *self {
            VertexFormat::Byte | VertexFormat::UnsignedByte => 1,
            VertexFormat::Short | VertexFormat::UnsignedShort | VertexFormat::Half => 2,
            VertexFormat::Int | VertexFormat::UnsignedInt | VertexFormat::Float => 4,
            VertexFormat::Double => 8,
        }
    }
}


/// A mesh vertex buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexBuffer {
    kind: VertexKind,
    components: u8,
    format: VertexFormat,
    element_count: usize,
    gl_id: Option<u32>,
}

impl VertexBuffer {
    /// A not yet uploaded buffer of `element_count` vertices with
    /// `components` values of `format` each.
    pub fn new(kind: VertexKind, components: u8, format: VertexFormat, element_count: usize)
            -> VertexBuffer {
        VertexBuffer { kind, components, format, element_count, gl_id: None }
    }

    pub fn kind(&self) -> VertexKind { self.kind }
    pub fn components(&self) -> u8 { self.components }
    pub fn format(&self) -> VertexFormat { self.format }
    pub fn element_count(&self) -> usize { self.element_count }

    /// Size of the whole buffer in bytes, saturating at `usize::MAX`.
    pub fn byte_len(&self) -> usize {
        self.element_count
            .saturating_mul(self.components as usize)
            .saturating_mul(self.format.component_size())
    }

    /// The GL buffer object, once uploaded.
    pub fn gl_id(&self) -> Option<u32> { self.gl_id }

    /// Records the GL buffer object. Called by the renderer on upload.
    pub fn set_gl_id(&mut self, id: u32) {
        self.gl_id = Some(id);
    }

    /// Forgets the GL buffer object, e.g. after the GL context was lost.
    pub fn clear_gl_id(&mut self) {
        self.gl_id = None;
    }
}


/// Pixel formats of engine images.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    R8,
    RG8,
    RGBA8,
    BGRA8,
    RGB565,
    Luminance8,
    R16F,
    RGBA16F,
    R32F,
    RG32F,
    RGBA32F,
    R32I,
    RGBA32UI,
    Depth24,
    Depth32F,
}

impl PixelFormat {
    /// Returns the compute image format with the same memory layout, if
    /// there is one. Depth formats have none.
    pub fn compute_format(&self) -> Option<ImageFormat> {
        use crate::standard::ChannelOrder as O;
        use crate::standard::ChannelType as T;

        let (order, channel_type) = match *self {
            PixelFormat::R8 => (O::R, T::UnormInt8),
            PixelFormat::RG8 => (O::Rg, T::UnormInt8),
            PixelFormat::RGBA8 => (O::Rgba, T::UnormInt8),
            PixelFormat::BGRA8 => (O::Bgra, T::UnormInt8),
            PixelFormat::RGB565 => (O::Rgb, T::UnormShort565),
            PixelFormat::Luminance8 => (O::Luminance, T::UnormInt8),
            PixelFormat::R16F => (O::R, T::HalfFloat),
            PixelFormat::RGBA16F => (O::Rgba, T::HalfFloat),
            PixelFormat::R32F => (O::R, T::Float),
            PixelFormat::RG32F => (O::Rg, T::Float),
            PixelFormat::RGBA32F => (O::Rgba, T::Float),
            PixelFormat::R32I => (O::R, T::SignedInt32),
            PixelFormat::RGBA32UI => (O::Rgba, T::UnsignedInt32),
            PixelFormat::Depth24 | PixelFormat::Depth32F => return None,
        };
        Some(ImageFormat::new(order, channel_type))
    }

    /// Size of one pixel in bytes.
    pub fn pixel_size(&self) -> usize {
        match *self {
            PixelFormat::R8 | PixelFormat::Luminance8 => 1,
            PixelFormat::RG8 | PixelFormat::RGB565 | PixelFormat::R16F => 2,
            PixelFormat::RGBA8 | PixelFormat::BGRA8 | PixelFormat::R32F | PixelFormat::R32I
                | PixelFormat::Depth24 | PixelFormat::Depth32F => 4,
            PixelFormat::RGBA16F | PixelFormat::RG32F => 8,
            PixelFormat::RGBA32F | PixelFormat::RGBA32UI => 16,
        }
    }
}


enum_from_primitive! {
    /// Texture kinds, valued by their GL texture target.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum TextureType {
        TwoDimensional = 0x0DE1,
        TwoDimensionalArray = 0x8C1A,
        ThreeDimensional = 0x806F,
        CubeMap = 0x8513,
    }
}

impl TextureType {
    /// Returns the GL texture target enum.
    pub fn gl_target(&self) -> u32 {
        *self as u32
    }

    /// Parses a GL texture target enum.
    pub fn from_gl_target(target: u32) -> Option<TextureType> {
        use enum_primitive::FromPrimitive;
        TextureType::from_u32(target)
    }

    /// Returns the compute image type a level of such a texture is shared as.
    ///
    /// Cube maps are shared as 2D arrays of their six faces.
    pub fn image_type(&self) -> ImageType {
        match *self {
            TextureType::TwoDimensional => ImageType::Image2D,
            TextureType::TwoDimensionalArray | TextureType::CubeMap => ImageType::Image2DArray,
            TextureType::ThreeDimensional => ImageType::Image3D,
        }
    }
}


/// An engine image: the pixel storage of a texture or render target.
///
/// `depth` is the depth of 3D images and the layer count of array images.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    format: PixelFormat,
    width: usize,
    height: usize,
    depth: usize,
    mip_count: u32,
    gl_id: Option<u32>,
}

impl Image {
    pub fn new(format: PixelFormat, width: usize, height: usize, depth: usize) -> Image {
        Image { format, width, height, depth: depth.max(1), mip_count: 1, gl_id: None }
    }

    /// Sets the number of mipmap levels (at least 1).
    pub fn with_mip_count(mut self, mip_count: u32) -> Image {
        self.mip_count = mip_count.max(1);
        self
    }

    pub fn format(&self) -> PixelFormat { self.format }
    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn depth(&self) -> usize { self.depth }
    pub fn mip_count(&self) -> u32 { self.mip_count }

    /// Returns the extent of mip level `level` as `[x, y, z]` when viewed as
    /// a texture of type `texture_type`.
    pub fn level_extent(&self, texture_type: TextureType, level: u32) -> [usize; 3] {
        let shrink = |v: usize| v.checked_shr(level).unwrap_or(0).max(1);
        match texture_type {
            TextureType::TwoDimensional => [shrink(self.width), shrink(self.height), 1],
            TextureType::TwoDimensionalArray => [shrink(self.width), shrink(self.height), self.depth],
            TextureType::ThreeDimensional => [shrink(self.width), shrink(self.height), shrink(self.depth)],
            TextureType::CubeMap => [shrink(self.width), shrink(self.height), 6],
        }
    }

    /// Returns an error unless `level` is one of this image's mip levels.
    pub fn check_level(&self, level: u32) -> OclResult<()> {
        if level < self.mip_count {
            Ok(())
        } else {
            Err(OclError::InvalidMipLevel { level, count: self.mip_count })
        }
    }

    /// The GL texture object, once uploaded.
    pub fn gl_id(&self) -> Option<u32> { self.gl_id }

    /// Records the GL texture object. Called by the renderer on upload.
    pub fn set_gl_id(&mut self, id: u32) {
        self.gl_id = Some(id);
    }

    pub fn clear_gl_id(&mut self) {
        self.gl_id = None;
    }
}


/// A texture: an image plus the way it is sampled.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    image: Image,
    texture_type: TextureType,
}

impl Texture {
    pub fn new(image: Image, texture_type: TextureType) -> Texture {
        Texture { image, texture_type }
    }

    pub fn image(&self) -> &Image { &self.image }
    pub fn image_mut(&mut self) -> &mut Image { &mut self.image }
    pub fn texture_type(&self) -> TextureType { self.texture_type }
}


/// A color or depth target of a frame buffer.
///
/// A render buffer either renders into a texture or owns a pure GL
/// renderbuffer object.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderBuffer {
    format: PixelFormat,
    width: usize,
    height: usize,
    gl_id: Option<u32>,
    texture: Option<Texture>,
}

impl RenderBuffer {
    /// A pure render buffer, not backed by a texture.
    pub fn new(format: PixelFormat, width: usize, height: usize) -> RenderBuffer {
        RenderBuffer { format, width, height, gl_id: None, texture: None }
    }

    /// A render buffer which renders into `texture`.
    pub fn with_texture(texture: Texture) -> RenderBuffer {
        let image = texture.image();
        RenderBuffer {
            format: image.format(),
            width: image.width(),
            height: image.height(),
            gl_id: None,
            texture: Some(texture),
        }
    }

    pub fn format(&self) -> PixelFormat { self.format }
    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    /// The attached texture, if any.
    pub fn texture(&self) -> Option<&Texture> { self.texture.as_ref() }
    pub fn texture_mut(&mut self) -> Option<&mut Texture> { self.texture.as_mut() }

    /// The GL renderbuffer object of a pure render buffer, once uploaded.
    pub fn gl_id(&self) -> Option<u32> { self.gl_id }

    pub fn set_gl_id(&mut self, id: u32) {
        self.gl_id = Some(id);
    }
}

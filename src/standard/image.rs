//! Images, image formats and image descriptors.

use crate::error::{Error as OclError, Result as OclResult};
use crate::standard::SharedObject;


/// Specifies the number of channels and the channel layout i.e. the memory
/// layout in which channels are stored in the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelOrder {
    R,
    A,
    Rg,
    Ra,
    /// Only valid with a packed channel type (`UnormShort565`,
    /// `UnormShort555` or `UnormInt101010`).
    Rgb,
    Rgba,
    /// Only valid with 8-bit channel types.
    Bgra,
    /// Only valid with 8-bit channel types.
    Argb,
    Intensity,
    Luminance,
    Rx,
    Rgx,
    /// Only valid with a packed channel type.
    Rgbx,
}

impl ChannelOrder {
    /// Returns the number of channels.
    pub fn channel_count(&self) -> usize {
        match *self {
            ChannelOrder::R | ChannelOrder::A | ChannelOrder::Intensity | ChannelOrder::Luminance
                | ChannelOrder::Rx => 1,
            ChannelOrder::Rg | ChannelOrder::Ra | ChannelOrder::Rgx => 2,
            ChannelOrder::Rgb | ChannelOrder::Rgbx => 3,
            ChannelOrder::Rgba | ChannelOrder::Bgra | ChannelOrder::Argb => 4,
        }
    }
}


/// Describes the size and interpretation of a single channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelType {
    // Each channel component is a normalized signed 8-bit integer value:
    SnormInt8,
    // Each channel component is a normalized signed 16-bit integer value:
    SnormInt16,
    // Each channel component is a normalized unsigned 8-bit integer value:
    UnormInt8,
    // Each channel component is a normalized unsigned 16-bit integer value:
    UnormInt16,
    // A normalized 5-6-5 3-channel RGB pixel packed into 16 bits:
    UnormShort565,
    // A normalized x-5-5-5 4-channel xRGB pixel packed into 16 bits:
    UnormShort555,
    // A normalized x-10-10-10 4-channel xRGB pixel packed into 32 bits:
    UnormInt101010,
    SignedInt8,
    SignedInt16,
    SignedInt32,
    UnsignedInt8,
    UnsignedInt16,
    UnsignedInt32,
    // Each channel component is a 16-bit half-float value:
    HalfFloat,
    // Each channel component is a single precision floating-point value:
    Float,
}

impl ChannelType {
    /// Returns the size of a whole pixel for packed types.
    pub fn packed_size(&self) -> Option<usize> {
        match *self {
            ChannelType::UnormShort565 | ChannelType::UnormShort555 => Some(2),
            ChannelType::UnormInt101010 => Some(4),
            _ => None,
        }
    }

    /// Returns the size of one channel in bytes, `None` for packed types.
    pub fn channel_size(&self) -> Option<usize> {
        match *self {
            ChannelType::SnormInt8 | ChannelType::UnormInt8 | ChannelType::SignedInt8
                | ChannelType::UnsignedInt8 => Some(1),
            ChannelType::SnormInt16 | ChannelType::UnormInt16 | ChannelType::SignedInt16
                | ChannelType::UnsignedInt16 | ChannelType::HalfFloat => Some(2),
            ChannelType::SignedInt32 | ChannelType::UnsignedInt32 | ChannelType::Float => Some(4),
            ChannelType::UnormShort565 | ChannelType::UnormShort555
                | ChannelType::UnormInt101010 => None,
        }
    }
}


/// The element type and channel order of an image.
///
/// Either half may be `None` when a device reports a format this crate does
/// not know about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageFormat {
    pub order: Option<ChannelOrder>,
    pub channel_type: Option<ChannelType>,
}

impl ImageFormat {
    pub fn new(order: ChannelOrder, channel_type: ChannelType) -> ImageFormat {
        ImageFormat { order: Some(order), channel_type: Some(channel_type) }
    }

    /// Normalized unsigned 8-bit RGBA.
    pub fn rgba8() -> ImageFormat {
        ImageFormat::new(ChannelOrder::Rgba, ChannelType::UnormInt8)
    }

    /// Single precision float RGBA.
    pub fn rgba_float() -> ImageFormat {
        ImageFormat::new(ChannelOrder::Rgba, ChannelType::Float)
    }

    /// Returns the size of a pixel in bytes, or `None` if the format is
    /// unknown or not a valid combination.
    pub fn element_size(&self) -> Option<usize> {
        let (order, channel_type) = match (self.order, self.channel_type) {
            (Some(o), Some(t)) => (o, t),
            _ => return None,
        };

        match order {
            ChannelOrder::Rgb | ChannelOrder::Rgbx => channel_type.packed_size(),
            ChannelOrder::Bgra | ChannelOrder::Argb => match channel_type.channel_size() {
                Some(1) => Some(4),
                _ => None,
            },
            _ => channel_type.channel_size().map(|sz| sz * order.channel_count()),
        }
    }

    /// Returns the size of a pixel in bytes or an `UnsupportedFormat` error.
    pub fn element_size_or_err(&self) -> OclResult<usize> {
        self.element_size().ok_or_else(|| OclError::UnsupportedFormat(self.to_string()))
    }

    /// Returns true if both the channel order and type are known.
    pub fn is_known(&self) -> bool {
        self.order.is_some() && self.channel_type.is_some()
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match (self.order, self.channel_type) {
            (Some(o), Some(t)) => write!(f, "{:?}/{:?}", o, t),
            (Some(o), None) => write!(f, "{:?}/<unknown>", o),
            (None, Some(t)) => write!(f, "<unknown>/{:?}", t),
            (None, None) => write!(f, "<unknown>"),
        }
    }
}


/// The dimensionality of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageType {
    Image1D,
    Image1DBuffer,
    Image1DArray,
    Image2D,
    Image2DArray,
    Image3D,
}

impl ImageType {
    #[cfg(feature = "opencl")]
    pub fn to_mem_object_type(&self) -> ocl_core::MemObjectType {
        use ocl_core::MemObjectType;
        match *self {
            ImageType::Image1D => MemObjectType::Image1d,
            ImageType::Image1DBuffer => MemObjectType::Image1dBuffer,
            ImageType::Image1DArray => MemObjectType::Image1dArray,
            ImageType::Image2D => MemObjectType::Image2d,
            ImageType::Image2DArray => MemObjectType::Image2dArray,
            ImageType::Image3D => MemObjectType::Image3d,
        }
    }
}


/// Describes the type and dimensions of a new image.
///
/// Pitches of zero are computed from the extents and the element size. If
/// `host_data` is present it provides the initial image contents, laid out
/// with the (resolved) row and slice pitches.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageDescriptor {
    pub image_type: ImageType,
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    pub array_size: usize,
    pub row_pitch: usize,
    pub slice_pitch: usize,
    pub host_data: Option<Vec<u8>>,
}

impl ImageDescriptor {
    pub fn new(image_type: ImageType, width: usize, height: usize, depth: usize,
            array_size: usize) -> ImageDescriptor {
        ImageDescriptor {
            image_type,
            width,
            height,
            depth,
            array_size,
            row_pitch: 0,
            slice_pitch: 0,
            host_data: None,
        }
    }

    pub fn image_1d(width: usize) -> ImageDescriptor {
        ImageDescriptor::new(ImageType::Image1D, width, 1, 1, 1)
    }

    pub fn image_2d(width: usize, height: usize) -> ImageDescriptor {
        ImageDescriptor::new(ImageType::Image2D, width, height, 1, 1)
    }

    pub fn image_3d(width: usize, height: usize, depth: usize) -> ImageDescriptor {
        ImageDescriptor::new(ImageType::Image3D, width, height, depth, 1)
    }

    pub fn image_2d_array(width: usize, height: usize, array_size: usize) -> ImageDescriptor {
        ImageDescriptor::new(ImageType::Image2DArray, width, height, 1, array_size)
    }

    /// Attaches initial contents with explicit pitches (0 for tightly packed).
    pub fn with_host_data(mut self, data: Vec<u8>, row_pitch: usize, slice_pitch: usize)
            -> ImageDescriptor {
        self.host_data = Some(data);
        self.row_pitch = row_pitch;
        self.slice_pitch = slice_pitch;
        self
    }

    /// Returns the extent of the image as `[x, y, z]`, where array layers
    /// occupy the first unused dimension.
    pub fn extent(&self) -> [usize; 3] {
        match self.image_type {
            ImageType::Image1D | ImageType::Image1DBuffer => [self.width, 1, 1],
            ImageType::Image1DArray => [self.width, self.array_size, 1],
            ImageType::Image2D => [self.width, self.height, 1],
            ImageType::Image2DArray => [self.width, self.height, self.array_size],
            ImageType::Image3D => [self.width, self.height, self.depth],
        }
    }

    /// Returns `(row_pitch, slice_pitch)` with zero pitches resolved to
    /// tightly packed values. Saturates on overflow, which `validate`
    /// rejects.
    pub fn resolved_pitches(&self, element_size: usize) -> (usize, usize) {
        let extent = self.extent();
        let row_pitch = if self.row_pitch == 0 {
            extent[0].saturating_mul(element_size)
        } else {
            self.row_pitch
        };
        let slice_pitch = if self.slice_pitch != 0 {
            self.slice_pitch
        } else if self.image_type == ImageType::Image1DArray {
            row_pitch
        } else {
            row_pitch.saturating_mul(extent[1])
        };
        (row_pitch, slice_pitch)
    }

    /// Returns the number of slices (`extent[2]`, or `extent[1]` for 1D
    /// arrays).
    fn slice_count(&self) -> usize {
        let extent = self.extent();
        match self.image_type {
            ImageType::Image1DArray => extent[1],
            _ => extent[2],
        }
    }

    /// Checks extents, pitches and host data against `format`.
    ///
    /// Returns the element size of the format.
    pub fn validate(&self, format: &ImageFormat) -> OclResult<usize> {
        let element_size = format.element_size_or_err()?;

        let needs = match self.image_type {
            ImageType::Image1D | ImageType::Image1DBuffer => [true, false, false, false],
            ImageType::Image1DArray => [true, false, false, true],
            ImageType::Image2D => [true, true, false, false],
            ImageType::Image2DArray => [true, true, false, true],
            ImageType::Image3D => [true, true, true, false],
        };
        let values = [self.width, self.height, self.depth, self.array_size];
        let names = ["width", "height", "depth", "array_size"];

        for i in 0..4 {
            if needs[i] && values[i] == 0 {
                return Err(OclError::InvalidDescriptor(format!("{} must be non-zero for {:?}",
                    names[i], self.image_type)));
            }
        }

        let extent = self.extent();
        let too_large = || OclError::InvalidDescriptor(format!("{:?} image of {:?} with \
            {}-byte elements is too large", self.image_type, extent, element_size));

        extent_len(extent, element_size).ok_or_else(too_large)?;
        let min_row_pitch = extent[0] * element_size;
        if self.row_pitch != 0 && (self.row_pitch < min_row_pitch || self.row_pitch % element_size != 0) {
            return Err(OclError::InvalidDescriptor(format!("row pitch {} must be a multiple of {} \
                and at least {}", self.row_pitch, element_size, min_row_pitch)));
        }

        let row_pitch = if self.row_pitch == 0 { min_row_pitch } else { self.row_pitch };
        let min_slice_pitch = match self.image_type {
            ImageType::Image1DArray => row_pitch,
            _ => row_pitch.checked_mul(extent[1]).ok_or_else(too_large)?,
        };
        let slice_pitch = if self.slice_pitch == 0 { min_slice_pitch } else { self.slice_pitch };
        if self.slice_pitch != 0 && (slice_pitch < min_slice_pitch || slice_pitch % row_pitch != 0) {
            return Err(OclError::InvalidDescriptor(format!("slice pitch {} must be a multiple of \
                the row pitch {} and at least {}", slice_pitch, row_pitch, min_slice_pitch)));
        }

        if let Some(ref data) = self.host_data {
            let required = slice_pitch.checked_mul(self.slice_count()).ok_or_else(too_large)?;
            if data.len() < required {
                return Err(OclError::InvalidDescriptor(format!("host data holds {} bytes, \
                    {} required", data.len(), required)));
            }
        }

        Ok(element_size)
    }
}


/// A 1D, 2D or 3D image (or image array) in device memory.
///
/// Origins and regions are given in pixels as `[x, y, z]` (see
/// `ImageDescriptor::extent`). Host-side data is tightly packed.
pub trait Image: SharedObject {
    /// Returns the image format.
    fn format(&self) -> ImageFormat;

    /// Returns the image type.
    fn image_type(&self) -> ImageType;

    /// Returns the extent of the image in pixels.
    fn extent(&self) -> [usize; 3];

    /// Returns the size of one pixel in bytes.
    fn element_size(&self) -> usize;

    /// Reads `region` starting at `origin` into `dst`. Blocks until the read
    /// has completed.
    fn read(&self, queue: &Self::Queue, origin: [usize; 3], region: [usize; 3], dst: &mut [u8])
        -> OclResult<()>;

    /// Writes `src` into `region` starting at `origin`. Blocks until the
    /// write has completed.
    fn write(&self, queue: &Self::Queue, origin: [usize; 3], region: [usize; 3], src: &[u8])
        -> OclResult<()>;

    /// Sets every pixel of the image to `pixel`, which must be exactly one
    /// element long.
    fn fill(&self, queue: &Self::Queue, pixel: &[u8]) -> OclResult<Self::Event>;
}


/// Checks that `region` at `origin` lies within `extent` and that a host
/// slice of `host_len` bytes matches it. Returns the region's byte length.
pub fn check_region(extent: [usize; 3], origin: [usize; 3], region: [usize; 3],
        element_size: usize, host_len: usize) -> OclResult<usize> {
    for i in 0..3 {
        if region[i] == 0 {
            return Err(OclError::InvalidDescriptor(format!("region {:?} has a zero dimension",
                region)));
        }
        match origin[i].checked_add(region[i]) {
            Some(end) if end <= extent[i] => (),
            _ => return Err(OclError::OutOfBounds { offset: origin[i], len: region[i],
                size: extent[i] }),
        }
    }

    let len = extent_len(region, element_size)
        .ok_or_else(|| OclError::InvalidDescriptor(format!("region {:?} is too large", region)))?;
    if host_len != len {
        return Err(format!("host data length ({}) does not match the region length ({})",
            host_len, len).into());
    }
    Ok(len)
}

/// Returns the byte length of `extent` pixels of `element_size` bytes each,
/// or `None` if it does not fit in a `usize`.
pub fn extent_len(extent: [usize; 3], element_size: usize) -> Option<usize> {
    extent[0].checked_mul(extent[1])?.checked_mul(extent[2])?.checked_mul(element_size)
}

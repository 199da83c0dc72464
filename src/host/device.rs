//! Host devices.

use std::sync::Arc;
use crate::standard::{ChannelOrder, ChannelType, Device, DeviceKinds, ImageFormat};


/// The description of a host device, used to configure a `HostContext`.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceSpec {
    pub name: String,
    pub vendor: String,
    pub kinds: DeviceKinds,
    pub compute_units: u32,
    pub global_mem_size: u64,
    pub gl_sharing: bool,
    /// Supported image formats. `None` supports every format with a known
    /// element size.
    pub image_formats: Option<Vec<ImageFormat>>,
}

impl DeviceSpec {
    pub fn new<S: Into<String>>(name: S) -> DeviceSpec {
        DeviceSpec { name: name.into(), ..DeviceSpec::default() }
    }

    pub fn kinds(mut self, kinds: DeviceKinds) -> DeviceSpec {
        self.kinds = kinds;
        self
    }

    pub fn compute_units(mut self, compute_units: u32) -> DeviceSpec {
        self.compute_units = compute_units;
        self
    }

    pub fn global_mem_size(mut self, size: u64) -> DeviceSpec {
        self.global_mem_size = size;
        self
    }

    pub fn gl_sharing(mut self, gl_sharing: bool) -> DeviceSpec {
        self.gl_sharing = gl_sharing;
        self
    }

    pub fn image_formats(mut self, formats: Vec<ImageFormat>) -> DeviceSpec {
        self.image_formats = Some(formats);
        self
    }

    /// Returns the image formats this device supports.
    pub fn supported_formats(&self) -> Vec<ImageFormat> {
        match self.image_formats {
            Some(ref formats) => formats.clone(),
            None => all_known_formats(),
        }
    }
}

impl Default for DeviceSpec {
    fn default() -> DeviceSpec {
        DeviceSpec {
            name: "host".to_owned(),
            vendor: "ocl-scene".to_owned(),
            kinds: DeviceKinds::CPU,
            compute_units: 1,
            global_mem_size: 1 << 30,
            gl_sharing: true,
            image_formats: None,
        }
    }
}


/// Returns every channel order/type combination with a known element size.
pub fn all_known_formats() -> Vec<ImageFormat> {
    const ORDERS: [ChannelOrder; 13] = [ChannelOrder::R, ChannelOrder::A, ChannelOrder::Rg,
        ChannelOrder::Ra, ChannelOrder::Rgb, ChannelOrder::Rgba, ChannelOrder::Bgra,
        ChannelOrder::Argb, ChannelOrder::Intensity, ChannelOrder::Luminance, ChannelOrder::Rx,
        ChannelOrder::Rgx, ChannelOrder::Rgbx];
    const TYPES: [ChannelType; 15] = [ChannelType::SnormInt8, ChannelType::SnormInt16,
        ChannelType::UnormInt8, ChannelType::UnormInt16, ChannelType::UnormShort565,
        ChannelType::UnormShort555, ChannelType::UnormInt101010, ChannelType::SignedInt8,
        ChannelType::SignedInt16, ChannelType::SignedInt32, ChannelType::UnsignedInt8,
        ChannelType::UnsignedInt16, ChannelType::UnsignedInt32, ChannelType::HalfFloat,
        ChannelType::Float];

    ORDERS.iter()
        .flat_map(|&o| TYPES.iter().map(move |&t| ImageFormat::new(o, t)))
        .filter(|f| f.element_size().is_some())
        .collect()
}


/// A device of a `HostContext`.
///
/// Devices compare equal only to devices of the same context and index.
#[derive(Clone)]
pub struct HostDevice {
    context_id: u64,
    index: usize,
    spec: Arc<DeviceSpec>,
}

impl HostDevice {
    pub(crate) fn new(context_id: u64, index: usize, spec: DeviceSpec) -> HostDevice {
        HostDevice { context_id, index, spec: Arc::new(spec) }
    }

    /// Returns the position of this device within its context.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the description the device was created from.
    pub fn spec(&self) -> &DeviceSpec {
        &self.spec
    }
}

impl Device for HostDevice {
    fn name(&self) -> String { self.spec.name.clone() }
    fn vendor(&self) -> String { self.spec.vendor.clone() }
    fn kinds(&self) -> DeviceKinds { self.spec.kinds }
    fn compute_units(&self) -> u32 { self.spec.compute_units }
    fn global_mem_size(&self) -> u64 { self.spec.global_mem_size }
    fn has_gl_sharing(&self) -> bool { self.spec.gl_sharing }
}

impl PartialEq for HostDevice {
    fn eq(&self, other: &HostDevice) -> bool {
        self.context_id == other.context_id && self.index == other.index
    }
}

impl std::fmt::Debug for HostDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("HostDevice")
            .field("name", &self.spec.name)
            .field("index", &self.index)
            .field("kinds", &self.spec.kinds)
            .finish()
    }
}

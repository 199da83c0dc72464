//! OpenCL platforms and devices.

use std::sync::Arc;
use ocl_core::{self, DeviceId, DeviceInfo, DeviceInfoResult, PlatformId, PlatformInfo};
use crate::error::Result as OclResult;
use crate::standard::{Device, DeviceKinds};


#[derive(Debug)]
struct DeviceInfoCache {
    name: String,
    vendor: String,
    kinds: DeviceKinds,
    compute_units: u32,
    global_mem_size: u64,
    extensions: String,
}

/// An OpenCL device.
///
/// Properties are queried once, when the device is listed.
#[derive(Clone)]
pub struct ClDevice {
    id: DeviceId,
    info: Arc<DeviceInfoCache>,
}

impl ClDevice {
    /// Queries the properties of the device `id`.
    pub fn new(id: DeviceId) -> OclResult<ClDevice> {
        let kinds = match ocl_core::get_device_info(&id, DeviceInfo::Type)? {
            DeviceInfoResult::Type(t) => DeviceKinds::from_bits_truncate(t.bits() as u32),
            _ => DeviceKinds::empty(),
        };
        let compute_units = match ocl_core::get_device_info(&id, DeviceInfo::MaxComputeUnits)? {
            DeviceInfoResult::MaxComputeUnits(n) => n,
            _ => 0,
        };
        let global_mem_size = match ocl_core::get_device_info(&id, DeviceInfo::GlobalMemSize)? {
            DeviceInfoResult::GlobalMemSize(n) => n,
            _ => 0,
        };

        let info = DeviceInfoCache {
            name: ocl_core::get_device_info(&id, DeviceInfo::Name)?.to_string(),
            vendor: ocl_core::get_device_info(&id, DeviceInfo::Vendor)?.to_string(),
            kinds,
            compute_units,
            global_mem_size,
            extensions: ocl_core::get_device_info(&id, DeviceInfo::Extensions)?.to_string(),
        };

        Ok(ClDevice { id, info: Arc::new(info) })
    }

    /// Returns the underlying device id.
    pub fn as_core(&self) -> &DeviceId {
        &self.id
    }

    /// Returns true if the device reports the extension `name`.
    pub fn has_extension(&self, name: &str) -> bool {
        self.info.extensions.split_whitespace().any(|ext| ext == name)
    }
}

impl Device for ClDevice {
    fn name(&self) -> String { self.info.name.clone() }
    fn vendor(&self) -> String { self.info.vendor.clone() }
    fn kinds(&self) -> DeviceKinds { self.info.kinds }
    fn compute_units(&self) -> u32 { self.info.compute_units }
    fn global_mem_size(&self) -> u64 { self.info.global_mem_size }

    fn has_gl_sharing(&self) -> bool {
        self.has_extension("cl_khr_gl_sharing") || self.has_extension("cl_APPLE_gl_sharing")
    }
}

impl PartialEq for ClDevice {
    fn eq(&self, other: &ClDevice) -> bool {
        self.id == other.id
    }
}

impl std::fmt::Debug for ClDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ClDevice")
            .field("name", &self.info.name)
            .field("vendor", &self.info.vendor)
            .field("kinds", &self.info.kinds)
            .finish()
    }
}


/// An OpenCL platform together with its devices.
#[derive(Clone, Debug)]
pub struct ClPlatform {
    id: PlatformId,
    name: String,
    vendor: String,
    devices: Vec<ClDevice>,
}

impl ClPlatform {
    /// Returns every platform available on this machine.
    pub fn list() -> OclResult<Vec<ClPlatform>> {
        let mut platforms = Vec::new();
        for id in ocl_core::get_platform_ids()? {
            platforms.push(ClPlatform::new(id)?);
        }
        Ok(platforms)
    }

    fn new(id: PlatformId) -> OclResult<ClPlatform> {
        let mut devices = Vec::new();
        for device_id in ocl_core::get_device_ids(&id, None, None)? {
            devices.push(ClDevice::new(device_id)?);
        }

        Ok(ClPlatform {
            name: ocl_core::get_platform_info(&id, PlatformInfo::Name)?.to_string(),
            vendor: ocl_core::get_platform_info(&id, PlatformInfo::Vendor)?.to_string(),
            id,
            devices,
        })
    }

    pub fn as_core(&self) -> &PlatformId { &self.id }

    pub fn name(&self) -> &str { &self.name }

    pub fn vendor(&self) -> &str { &self.vendor }

    pub fn devices(&self) -> &[ClDevice] { &self.devices }
}

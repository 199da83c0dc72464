//! Compute devices.

bitflags! {
    /// The kinds of a compute device.
    pub struct DeviceKinds: u32 {
        const DEFAULT = 1 << 0;
        const CPU = 1 << 1;
        const GPU = 1 << 2;
        const ACCELERATOR = 1 << 3;
        const CUSTOM = 1 << 4;
        const ALL = 0xFFFF_FFFF;
    }
}


/// A device of a context's platform.
///
/// Devices are obtained through `Context::devices` and are used to create
/// command queues and to query capabilities.
pub trait Device: Clone + PartialEq + std::fmt::Debug {
    /// Returns the device name.
    fn name(&self) -> String;

    /// Returns the device vendor.
    fn vendor(&self) -> String;

    /// Returns the device kinds.
    fn kinds(&self) -> DeviceKinds;

    /// Returns the number of parallel compute units.
    fn compute_units(&self) -> u32;

    /// Returns the size of global device memory in bytes.
    fn global_mem_size(&self) -> u64;

    /// Returns true if the device can share memory objects with the graphics
    /// pipeline.
    fn has_gl_sharing(&self) -> bool;
}

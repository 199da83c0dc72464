//! Kernel-side access rights of memory objects.

/// The allowed access of a buffer or image from kernel code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemoryAccess {
    ReadWrite,
    ReadOnly,
    WriteOnly,
}

impl MemoryAccess {
    /// Returns true if kernels may read the object.
    pub fn allows_kernel_read(&self) -> bool {
        *self != MemoryAccess::WriteOnly
    }

    /// Returns true if kernels may write the object.
    pub fn allows_kernel_write(&self) -> bool {
        *self != MemoryAccess::ReadOnly
    }
}

impl Default for MemoryAccess {
    fn default() -> MemoryAccess {
        MemoryAccess::ReadWrite
    }
}

#[cfg(feature = "opencl")]
impl From<MemoryAccess> for ocl_core::MemFlags {
    fn from(access: MemoryAccess) -> ocl_core::MemFlags {
        match access {
            MemoryAccess::ReadWrite => ocl_core::MemFlags::new().read_write(),
            MemoryAccess::ReadOnly => ocl_core::MemFlags::new().read_only(),
            MemoryAccess::WriteOnly => ocl_core::MemFlags::new().write_only(),
        }
    }
}

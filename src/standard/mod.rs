//! Backend-neutral compute types.
//!
//! Backends (see `host` and, with the `opencl` feature, `cl`) implement the
//! traits defined here. Code written against `Context` runs on either.

mod context;
mod device;
mod queue;
mod event;
mod memory_access;
mod sharing;
mod buffer;
mod image;
mod program;

pub use self::context::{Context, check_device_membership};
pub use self::device::{Device, DeviceKinds};
pub use self::queue::{CommandQueue, QueueId};
pub use self::event::Event;
pub use self::memory_access::MemoryAccess;
pub use self::sharing::{SharedObject, ShareTracker, SharingState, with_shared};
pub use self::buffer::{Buffer, check_range, check_fill_pattern};
pub use self::image::{Image, ImageFormat, ImageDescriptor, ImageType, ChannelOrder, ChannelType,
    check_region, extent_len};
pub use self::program::{Program, ProgramSource};

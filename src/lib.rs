//! Compute contexts for a scene graph renderer.
//!
//! A `Context` is the central object for running OpenCL style compute work
//! next to a renderer. It owns the devices it was created with and is used
//! to create command queues, buffers, images and programs. Buffers and
//! images can also be *bound* to the renderer's vertex buffers, textures
//! and render buffers so that kernels operate directly on graphics memory.
//!
//! Two backends implement `Context`:
//!
//! * `host::HostContext` runs everything on the calling thread and models
//!   graphics memory with `host::GraphicsMemory`. It is always available.
//! * `cl::ClContext` (feature `opencl`) drives a real OpenCL platform
//!   through `ocl-core`.
//!
//! ## Example
//!
//! ```
//! use ocl_scene::{Buffer, Context, MemoryAccess};
//! use ocl_scene::host::HostContext;
//!
//! let context = HostContext::new().unwrap();
//! let queue = context.create_queue().unwrap();
//! let buffer = context.create_buffer_from_host(&[1, 2, 3, 4]).unwrap();
//!
//! let mut out = [0u8; 4];
//! buffer.read(&queue, 0, &mut out).unwrap();
//! assert_eq!(out, [1, 2, 3, 4]);
//! assert_eq!(buffer.access(), MemoryAccess::ReadWrite);
//! ```
//!
//! ## Links
//!
//! **OpenCL/GL sharing:** [cl_khr_gl_sharing](https://www.khronos.org/registry/OpenCL/sdk/1.2/docs/man/xhtml/cl_khr_gl_sharing.html)

#[macro_use] extern crate log;
#[macro_use] extern crate bitflags;
#[macro_use] extern crate enum_primitive;

pub mod error;
pub mod logging;
pub mod asset;
pub mod gfx;
pub mod standard;
pub mod host;
#[cfg(feature = "opencl")]
pub mod cl;
#[cfg(test)] mod tests;

pub use crate::error::{Error, Result};
pub use crate::logging::{init_logging, LoggingConfig};
pub use crate::asset::{AssetInfo, AssetLocator, FileLocator, MemoryLocator};
pub use crate::standard::{Buffer, ChannelOrder, ChannelType, CommandQueue, Context, Device,
    DeviceKinds, Event, Image, ImageDescriptor, ImageFormat, ImageType, MemoryAccess, Program,
    ProgramSource, QueueId, SharedObject, ShareTracker, SharingState, with_shared};

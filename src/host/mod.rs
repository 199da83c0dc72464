//! A compute backend executing on the host.
//!
//! `HostContext` implements `Context` without any OpenCL installation.
//! Paired with a `GraphicsMemory` store it also models sharing with the
//! graphics pipeline, which makes it the backend used by the tests.

mod buffer;
mod context;
mod device;
mod graphics;
mod image;
mod program;
mod queue;

pub use self::buffer::HostBuffer;
pub use self::context::{HostContext, HostContextBuilder};
pub use self::device::{all_known_formats, DeviceSpec, HostDevice};
pub use self::graphics::{GraphicsMemory, Storage};
pub use self::image::HostImage;
pub use self::program::HostProgram;
pub use self::queue::{HostEvent, HostQueue};

//! A compute backend over an OpenCL platform, via `ocl-core`.
//!
//! Binding graphics resources requires a context created with
//! `ClContextBuilder::gl_properties` naming the renderer's GL context, and
//! devices supporting `cl_khr_gl_sharing`.

mod buffer;
mod context;
mod device;
mod image;
mod program;
mod queue;

pub use self::buffer::ClBuffer;
pub use self::context::{ClContext, ClContextBuilder, DefaultPlatformChooser, PlatformChooser};
pub use self::device::{ClDevice, ClPlatform};
pub use self::image::ClImage;
pub use self::program::ClProgram;
pub use self::queue::{ClEvent, ClQueue};

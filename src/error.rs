//! Standard error type for ocl-scene.
//!

/// Ocl-scene error result type.
pub type Result<T> = ::std::result::Result<T, Error>;


/// An enum of the failures a compute context and its objects can produce.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // String: An arbitrary error:
    #[error("{0}")]
    String(String),
    // Io: std::io error:
    #[error("{0}")]
    Io(#[from] ::std::io::Error),
    #[error("the context has no devices")]
    NoDevices,
    #[error("device '{0}' does not belong to this context")]
    ForeignDevice(String),
    #[error("{0} has not been uploaded to the GPU yet (no GL object id)")]
    NotUploaded(&'static str),
    #[error("GL object {0} is not known to the graphics pipeline")]
    InvalidGlObject(u32),
    #[error("the context was created without graphics sharing")]
    NoGraphicsSharing,
    #[error("mip level {level} is out of range (image has {count} levels)")]
    InvalidMipLevel { level: u32, count: u32 },
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid image descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("range [{offset}, {offset} + {len}) exceeds object size {size}")]
    OutOfBounds { offset: usize, len: usize, size: usize },
    #[error("allocation of {requested} bytes exceeds available device memory ({available} bytes)")]
    OutOfResources { requested: usize, available: usize },
    #[error("memory object is not shared with the graphics pipeline")]
    NotShared,
    #[error("shared memory object is already acquired by queue {0}")]
    AlreadyAcquired(u64),
    #[error("shared memory object must be acquired before use")]
    NotAcquired,
    #[error("shared memory object is acquired by queue {owner}, not queue {queue}")]
    QueueMismatch { owner: u64, queue: u64 },
    #[error("program build failed:\n{0}")]
    Build(String),
    #[cfg(feature = "opencl")]
    #[error("ocl-core error: {0}")]
    OclCore(#[from] ocl_core::Error),
}

impl Error {
    /// Returns true if this error is a violation of the acquire/release
    /// discipline for shared objects.
    pub fn is_sharing_error(&self) -> bool {
        match *self {
            Error::NotShared | Error::AlreadyAcquired(_) | Error::NotAcquired
                | Error::QueueMismatch { .. } => true,
            _ => false,
        }
    }
}

impl<'a> From<&'a str> for Error {
    fn from(desc: &'a str) -> Self {
        Error::String(String::from(desc))
    }
}

impl From<String> for Error {
    fn from(desc: String) -> Self {
        Error::String(desc)
    }
}

impl From<Error> for String {
    fn from(err: Error) -> String {
        err.to_string()
    }
}

//! Device buffers.

use crate::error::{Error as OclError, Result as OclResult};
use crate::standard::{MemoryAccess, SharedObject};


/// A linear block of device memory.
///
/// All offsets and lengths are in bytes. Buffers created by binding a vertex
/// buffer are shared with the graphics pipeline and every command below
/// requires them to be acquired by the issuing queue first (see
/// `SharedObject`).
pub trait Buffer: SharedObject {
    /// Returns the size of the buffer in bytes.
    fn size(&self) -> usize;

    /// Returns the allowed access from kernel code.
    fn access(&self) -> MemoryAccess;

    /// Reads `dst.len()` bytes starting at `offset` into `dst`. Blocks until
    /// the read has completed.
    fn read(&self, queue: &Self::Queue, offset: usize, dst: &mut [u8]) -> OclResult<()>;

    /// Writes `src` into the buffer starting at `offset`. Blocks until the
    /// write has completed.
    fn write(&self, queue: &Self::Queue, offset: usize, src: &[u8]) -> OclResult<()>;

    /// Copies `len` bytes from this buffer to `dst`.
    fn copy_to(&self, queue: &Self::Queue, dst: &Self, src_offset: usize, dst_offset: usize,
        len: usize) -> OclResult<Self::Event> where Self: Sized;

    /// Fills `len` bytes starting at `offset` with repetitions of `pattern`.
    ///
    /// `offset` and `len` must be multiples of the pattern length.
    fn fill(&self, queue: &Self::Queue, pattern: &[u8], offset: usize, len: usize)
        -> OclResult<Self::Event>;
}


/// Returns an error unless `[offset, offset + len)` lies within `size`.
pub fn check_range(offset: usize, len: usize, size: usize) -> OclResult<()> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(OclError::OutOfBounds { offset, len, size }),
    }
}

/// Returns an error unless `pattern`, `offset` and `len` describe a valid
/// fill.
pub fn check_fill_pattern(pattern: &[u8], offset: usize, len: usize) -> OclResult<()> {
    if pattern.is_empty() {
        return Err("fill pattern must not be empty".into());
    }
    if offset % pattern.len() != 0 || len % pattern.len() != 0 {
        return Err(format!("fill offset ({}) and length ({}) must be multiples of the \
            pattern length ({})", offset, len, pattern.len()).into());
    }
    Ok(())
}

//! Command completion events.

use crate::error::Result as OclResult;


/// An event signalling the completion of an enqueued command.
pub trait Event {
    /// Returns true if the associated command has completed.
    fn is_complete(&self) -> OclResult<bool>;

    /// Blocks until the associated command has completed.
    fn wait_for(&self) -> OclResult<()>;
}

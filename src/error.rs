use thiserror::Error;

/// Errors reported by the checked and fallible operations of [`VlVec`](crate::VlVec).
///
/// Everything else follows the conventions of [`Vec`](alloc::vec::Vec):
/// a bad position passed to `insert` or `erase` panics, and an infallible
/// growth that cannot allocate aborts through [`handle_alloc_error`](alloc::alloc::handle_alloc_error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A checked access asked for an index outside `[0, len)`.
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    /// A fallible growth could not obtain a heap region of `capacity` slots.
    #[error("failed to allocate heap storage for {capacity} elements")]
    AllocationFailure { capacity: usize },
}

pub type Result<T> = core::result::Result<T, Error>;

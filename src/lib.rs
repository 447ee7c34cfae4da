//! ## Intro
//!
//! A variable-length vector that keeps small collections inline
//! and moves them to the heap once they outgrow a fixed threshold.
//!
//! Similar to [`SmallVec`], but the vector also moves *back*: as soon as removals bring
//! the length down to the threshold again, the elements return to the inline buffer
//! and the heap region is released.
//!
//! ## Storage model
//!
//! A [`VlVec<T, N>`] always has exactly one active region:
//!
//! - **Inline**: a buffer of `N` slots embedded in the vector. Capacity is exactly `N`.
//! - **Heap**: an owned allocation. Capacity is never `N`, and never below the length.
//!
//! Growth past the current capacity allocates `floor(1.5 * required)` slots, where
//! `required` is the length after the operation. A bulk insertion grows at most once.
//!
//! ```
//! # use vlvec::{VlVec, vlvec};
//! let mut vec: VlVec<i32, 4> = vlvec![1, 2, 3];
//! assert!(vec.is_inline());
//!
//! // Push beyond the threshold: migrates to the heap
//! vec.extend([4, 5, 6, 7, 8]);
//! assert!(!vec.is_inline());
//!
//! // Remove down to the threshold: migrates back
//! vec.truncate(4);
//! assert!(vec.is_inline());
//! ```
//!
//! ### Alias
//!
//! - [`SmallVlVec<T>`] = `VlVec<T, 8>`, for tiny collections
//! - [`WideVlVec<T>`] = `VlVec<T, 32>`, for collections that are usually a few dozen elements
//!
//! The default threshold is [`DEFAULT_THRESHOLD`], so `VlVec<T>` holds 16 elements inline.
//!
//! ## Errors
//!
//! Checked access ([`VlVec::at`]) and fallible growth ([`VlVec::try_push`], [`VlVec::try_reserve`])
//! return [`Error`]. Positions passed to `insert`/`erase` are asserted and panic when invalid.
//!
//! ## `no_std` support
//!
//! This crate requires only `core` and `alloc`, making it suitable for embedded and no_std environments.
//!
//! ## Optional features
//!
//! ### `std` (default)
//!
//! [`VlVec<u8, N>`] implements [`std::io::Write`] by appending to the vector.
//!
//! ### `serde`
//!
//! When this optional dependency is enabled,
//! [`VlVec`] implements the [`serde::Serialize`] and [`serde::Deserialize`] traits.
//!
//! ### `tracing`
//!
//! Every change of the active region emits a `trace` event with target `vlvec`,
//! carrying `from`, `to`, `len` and `capacity`.
//!
//! [`serde::Serialize`]: https://docs.rs/serde/latest/serde/trait.Serialize.html
//! [`serde::Deserialize`]: https://docs.rs/serde/latest/serde/trait.Deserialize.html
//! [`SmallVec`]: https://docs.rs/smallvec/latest/smallvec
//! [`std::io::Write`]: https://doc.rust-lang.org/std/io/trait.Write.html
#![no_std]

extern crate alloc;

mod error;
mod heap;
mod utils;

#[doc(inline)]
pub use error::{Error, Result};

pub mod vl_vec;
#[doc(inline)]
pub use vl_vec::{IntoIter, VlVec};

#[cfg(feature = "serde")]
mod serde;

#[cfg(feature = "std")]
mod std_io;

/// The threshold used when `N` is not given: `VlVec<T>` holds 16 elements inline.
pub const DEFAULT_THRESHOLD: usize = 16;

/// A `VlVec` with a threshold of 8 elements.
///
/// This is an alias for [`VlVec<T, 8>`].
///
/// # Examples
///
/// ```
/// # use vlvec::SmallVlVec;
/// let mut vec: SmallVlVec<i32> = SmallVlVec::new();
///
/// vec.push(1);
/// vec.push(2);
/// vec.push(3);
/// assert!(vec.is_inline());
/// assert_eq!(vec, [1, 2, 3]);
///
/// vec.extend(&[4, 5, 6, 7, 8, 9]);
/// assert!(!vec.is_inline());
/// assert_eq!(vec.len(), 9);
/// ```
pub type SmallVlVec<T> = VlVec<T, 8>;

/// A `VlVec` with a threshold of 32 elements.
///
/// This is an alias for [`VlVec<T, 32>`].
///
/// # Examples
///
/// ```
/// # use vlvec::WideVlVec;
/// let mut vec: WideVlVec<String> = WideVlVec::new();
///
/// for i in 0..32 {
///     vec.push(format!("item_{}", i));
/// }
/// assert!(vec.is_inline());
///
/// vec.push("beyond".to_string());
/// assert!(!vec.is_inline());
/// assert_eq!(vec.capacity(), 49);
/// ```
pub type WideVlVec<T> = VlVec<T, 32>;

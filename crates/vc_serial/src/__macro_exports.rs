//! Items used by exported macros. Not public API.

#![doc(hidden)]

#[cfg(feature = "auto_register")]
pub use inventory;

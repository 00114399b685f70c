#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

// Thread-locals, `OnceLock` and `RwLock` come from std.
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod annotation;
pub mod collections;
pub mod descriptor;
pub mod registry;
pub mod resolve;
pub mod ser;
pub mod value;

#[cfg(test)]
mod test_utils;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use error::SerialError;
pub use registry::SerialRegistry;
pub use resolve::{Resolver, SerialType, TypeDesc};
pub use value::{PrimitiveArray, Record, Value};

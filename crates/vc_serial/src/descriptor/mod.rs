//! Runtime descriptions of serialized shapes.
//!
//! A [`SerialDescriptor`] tells a format what it is looking at without a value in
//! hand: the serial name, the [`SerialKind`], nullability and an indexed list of
//! elements with their own descriptors and annotations.
//!
//! ## Menu
//!
//! - [`PrimitiveKind`] / [`SerialKind`]: The closed kind taxonomy.
//! - [`SerialDescriptor`]: The descriptor itself, cheap to clone.
//! - [`RecordDescriptorBuilder`]: Assembles record descriptors element by element.
//! - [`LazyDescriptor`]: A memoized descriptor for self-referential elements.
//! - [`ElementInfo`]: One record element.

mod builder;
mod descriptor;
pub(crate) mod element;
mod kind;

pub use builder::RecordDescriptorBuilder;
pub use descriptor::SerialDescriptor;
pub use element::{ElementInfo, LazyDescriptor};
pub use kind::{PrimitiveKind, SerialKind};

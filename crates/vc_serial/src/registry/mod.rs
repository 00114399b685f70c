//! Registry of user-defined serializable types.
//!
//! ## Menu
//!
//! - [`UserTypeEntry`]: A serial name, a type-argument arity and a factory.
//! - [`SerialRegistry`]: Entries keyed by serial name, consulted by the resolver.
//! - [`FactoryContext`]: What a factory sees while it builds a serializer.
//! - [`LazySerializer`]: A serializer resolved on first use, for recursive types.
//! - [`impl_auto_register`]: Submits an entry for [`SerialRegistry::auto_register`].
//!
//! ## auto_register
//!
//! We use the [`inventory`] crate to collect entries declared anywhere in the
//! program. Not all platforms support it (although major platforms do); without the
//! `auto_register` feature [`SerialRegistry::auto_register`] does nothing and
//! returns `false`.
//!
//! [`inventory`]: https://docs.rs/inventory
//! [`impl_auto_register`]: crate::impl_auto_register

// -----------------------------------------------------------------------------
// Modules

mod entry;
mod factory;
mod lazy;
mod serial_registry;

// -----------------------------------------------------------------------------
// Exports

pub use entry::{UserTypeEntry, UserTypeFactory};
pub use factory::FactoryContext;
pub use lazy::LazySerializer;
pub use serial_registry::SerialRegistry;

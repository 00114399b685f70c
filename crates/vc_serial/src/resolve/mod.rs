//! Serializer resolution from structural type descriptions.
//!
//! ## Menu
//!
//! - [`TypeDesc`]: A structural, runtime description of a type.
//! - [`SerialType`]: Rust types with a known [`TypeDesc`].
//! - [`Resolver`]: Resolves a [`TypeDesc`] into a [`SharedSerializer`], optionally
//!   caching the result.
//!
//! ## Resolution
//!
//! | Description        | Serializer                                                 |
//! |--------------------|------------------------------------------------------------|
//! | `Primitive(kind)`  | [`primitive_serializer`], the same instance every time     |
//! | `Nullable(T)`      | [`NullableSerializer`] over `T`                            |
//! | `Array(T)`         | [`PrimitiveArraySerializer`] for non-string primitives, else [`ArraySerializer`] |
//! | `List(T)`          | [`ListSerializer`]                                         |
//! | `Set(T)`           | [`SetSerializer`]                                          |
//! | `Map(K, V)`        | [`MapSerializer`]                                          |
//! | `User { name, .. }`| The factory registered under `name` in the [`SerialRegistry`] |
//! | `Opaque(name)`     | Always [`SerialError::NoSerializer`]                       |
//!
//! [`SharedSerializer`]: crate::ser::SharedSerializer
//! [`primitive_serializer`]: crate::ser::primitive_serializer
//! [`NullableSerializer`]: crate::ser::NullableSerializer
//! [`PrimitiveArraySerializer`]: crate::ser::PrimitiveArraySerializer
//! [`ArraySerializer`]: crate::ser::ArraySerializer
//! [`ListSerializer`]: crate::ser::ListSerializer
//! [`SetSerializer`]: crate::ser::SetSerializer
//! [`MapSerializer`]: crate::ser::MapSerializer
//! [`SerialRegistry`]: crate::registry::SerialRegistry
//! [`SerialError::NoSerializer`]: crate::SerialError::NoSerializer

// -----------------------------------------------------------------------------
// Modules

mod resolver;
mod serial_type;
mod type_desc;

// -----------------------------------------------------------------------------
// Exports

pub use resolver::Resolver;
pub use serial_type::SerialType;
pub use type_desc::TypeDesc;

pub(crate) use resolver::resolve_in;

//! Type-erased value serializers.
//!
//! Every serializer pairs a [`SerialDescriptor`] with an encoder and a decoder for
//! one shape of [`Value`]. Formats are `serde` formats: encoding produces a
//! [`Serialize`] view of the value, decoding consumes any [`Deserializer`].
//!
//! ## Menu
//!
//! - [`ValueSerializer`]: The object-safe serializer trait.
//! - [`SharedSerializer`]: `Arc<dyn ValueSerializer>`, how serializers are shared.
//! - [`SerializeWith`] / [`DeserializeWith`]: `serde` adapters pairing a serializer
//!   with a value or with a deserializer.
//! - [`primitive_serializer`]: The primitive singleton table.
//! - Containers: [`ListSerializer`], [`SetSerializer`], [`ArraySerializer`],
//!   [`PrimitiveArraySerializer`], [`MapSerializer`], [`NullableSerializer`].
//! - [`RecordSerializer`]: Field-by-field serializer for user records.
//!
//! [`Deserializer`]: serde_core::Deserializer

// -----------------------------------------------------------------------------
// Modules

mod array;
mod error_utils;
mod list;
mod map;
mod nullable;
mod primitive;
mod record;
mod seq_visitor;
mod set;

// -----------------------------------------------------------------------------
// Exports

pub use array::{ArraySerializer, PrimitiveArraySerializer};
pub use list::ListSerializer;
pub use map::MapSerializer;
pub use nullable::NullableSerializer;
pub use primitive::{PrimitiveSerializer, primitive_serializer};
pub use record::{RecordSerializer, RecordSerializerBuilder, UnknownFieldPolicy};
pub use set::SetSerializer;

pub(crate) use error_utils::{de_error, ser_error};

use alloc::boxed::Box;
use alloc::sync::Arc;

use serde_core::de::{DeserializeSeed, Error as _};
use serde_core::{Deserializer, Serialize, Serializer};

use crate::Value;
use crate::descriptor::SerialDescriptor;

// -----------------------------------------------------------------------------
// ValueSerializer

/// A serializer for one shape of [`Value`].
///
/// Implementations must be thread-safe: the resolver hands them out as
/// [`SharedSerializer`] and several threads may encode with the same instance.
///
/// Callers normally go through [`serialize_with`](<dyn ValueSerializer>::serialize_with)
/// and [`deserialize_seed`](<dyn ValueSerializer>::deserialize_seed).
///
/// # Examples
///
/// ```
/// use serde::de::DeserializeSeed;
/// use vc_serial::Value;
/// use vc_serial::descriptor::PrimitiveKind;
/// use vc_serial::ser::primitive_serializer;
///
/// let int = primitive_serializer(PrimitiveKind::I32);
///
/// let text = serde_json::to_string(&int.serialize_with(&Value::I32(7))).unwrap();
/// assert_eq!(text, "7");
///
/// let mut de = serde_json::Deserializer::from_str("-3");
/// assert_eq!(int.deserialize_seed().deserialize(&mut de).unwrap(), Value::I32(-3));
/// ```
pub trait ValueSerializer: Send + Sync + 'static {
    /// Returns the descriptor of the shape this serializer handles.
    fn descriptor(&self) -> &SerialDescriptor;

    /// Returns the descriptor when it is available without failing.
    ///
    /// Only serializers that resolve themselves on first use can fail here, see
    /// [`LazySerializer`](crate::registry::LazySerializer).
    #[inline]
    fn try_descriptor(&self) -> Option<&SerialDescriptor> {
        Some(self.descriptor())
    }

    /// Returns a [`Serialize`] view of `value`.
    ///
    /// A value of the wrong shape is reported when the view is serialized.
    fn encode<'a>(&'a self, value: &'a Value) -> Box<dyn erased_serde::Serialize + 'a>;

    /// Reads one value from `deserializer`.
    fn decode<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error>;
}

/// A serializer shared between containers, caches and threads.
pub type SharedSerializer = Arc<dyn ValueSerializer>;

impl dyn ValueSerializer {
    /// Pairs this serializer with a value, producing something `serde` can serialize.
    #[inline]
    pub fn serialize_with<'a>(&'a self, value: &'a Value) -> SerializeWith<'a> {
        SerializeWith::new(self, value)
    }

    /// Returns a [`DeserializeSeed`] decoding one value with this serializer.
    #[inline]
    pub fn deserialize_seed(&self) -> DeserializeWith<'_> {
        DeserializeWith::new(self)
    }
}

// -----------------------------------------------------------------------------
// SerializeWith

/// A [`Serialize`] adapter for a value and the serializer describing it.
pub struct SerializeWith<'a> {
    serializer: &'a dyn ValueSerializer,
    value: &'a Value,
}

impl<'a> SerializeWith<'a> {
    #[inline]
    pub fn new(serializer: &'a dyn ValueSerializer, value: &'a Value) -> Self {
        Self { serializer, value }
    }
}

impl Serialize for SerializeWith<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let _guard = error_utils::enter(self.serializer.try_descriptor());
        let view = self.serializer.encode(self.value);
        erased_serde::serialize(&*view, serializer)
    }
}

// -----------------------------------------------------------------------------
// DeserializeWith

/// A [`DeserializeSeed`] decoding one value with the wrapped serializer.
pub struct DeserializeWith<'a> {
    serializer: &'a dyn ValueSerializer,
}

impl<'a> DeserializeWith<'a> {
    #[inline]
    pub fn new(serializer: &'a dyn ValueSerializer) -> Self {
        Self { serializer }
    }
}

impl<'de> DeserializeSeed<'de> for DeserializeWith<'_> {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        let _guard = error_utils::enter(self.serializer.try_descriptor());
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        self.serializer
            .decode(&mut erased)
            .map_err(D::Error::custom)
    }
}

// -----------------------------------------------------------------------------
// SerializerExt

/// Builds container serializers around an existing serializer.
///
/// # Examples
///
/// ```
/// use vc_serial::descriptor::PrimitiveKind;
/// use vc_serial::ser::{SerializerExt, primitive_serializer};
///
/// let ints = primitive_serializer(PrimitiveKind::I32).list().nullable();
///
/// assert_eq!(ints.descriptor().serial_name(), "List?");
/// assert_eq!(ints.descriptor().element_descriptor(0).serial_name(), "i32");
/// ```
pub trait SerializerExt {
    /// A list of this element.
    fn list(&self) -> SharedSerializer;
    /// A set of this element.
    fn set(&self) -> SharedSerializer;
    /// A boxed array of this element.
    fn array(&self) -> SharedSerializer;
    /// The nullable form of this serializer.
    fn nullable(&self) -> SharedSerializer;
    /// A map from this key to `value`.
    fn map_to(&self, value: SharedSerializer) -> SharedSerializer;
}

impl SerializerExt for SharedSerializer {
    #[inline]
    fn list(&self) -> SharedSerializer {
        Arc::new(ListSerializer::new(self.clone()))
    }

    #[inline]
    fn set(&self) -> SharedSerializer {
        Arc::new(SetSerializer::new(self.clone()))
    }

    #[inline]
    fn array(&self) -> SharedSerializer {
        Arc::new(ArraySerializer::new(self.clone()))
    }

    #[inline]
    fn nullable(&self) -> SharedSerializer {
        NullableSerializer::wrap(self.clone())
    }

    #[inline]
    fn map_to(&self, value: SharedSerializer) -> SharedSerializer {
        Arc::new(MapSerializer::new(self.clone(), value))
    }
}

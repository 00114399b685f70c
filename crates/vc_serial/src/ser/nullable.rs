use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use serde_core::de::{DeserializeSeed, Error, Visitor};
use serde_core::{Deserializer, Serialize, Serializer};

use super::{SerializeWith, SharedSerializer, ValueSerializer};
use crate::Value;
use crate::descriptor::SerialDescriptor;

/// Adds absence to another serializer.
///
/// [`Value::Null`] is written as the format's "none", anything else is handed to the
/// wrapped serializer as "some".
pub struct NullableSerializer {
    inner: SharedSerializer,
    descriptor: SerialDescriptor,
}

impl NullableSerializer {
    /// Wraps `inner`, or returns it unchanged when it is already nullable.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use vc_serial::descriptor::PrimitiveKind;
    /// use vc_serial::ser::{NullableSerializer, primitive_serializer};
    ///
    /// let once = NullableSerializer::wrap(primitive_serializer(PrimitiveKind::I64));
    /// let twice = NullableSerializer::wrap(once.clone());
    ///
    /// assert!(once.descriptor().is_nullable());
    /// assert!(Arc::ptr_eq(&once, &twice));
    /// ```
    pub fn wrap(inner: SharedSerializer) -> SharedSerializer {
        if inner.descriptor().is_nullable() {
            return inner;
        }
        let descriptor = inner.descriptor().nullable();
        Arc::new(Self { inner, descriptor })
    }
}

struct NullableView<'a> {
    inner: &'a dyn ValueSerializer,
    value: &'a Value,
}

impl Serialize for NullableView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Null => serializer.serialize_none(),
            value => serializer.serialize_some(&SerializeWith::new(self.inner, value)),
        }
    }
}

struct OptionVisitor<'a> {
    inner: &'a dyn ValueSerializer,
}

impl<'de> Visitor<'de> for OptionVisitor<'_> {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("nullable value of type ")?;
        formatter.write_str(self.inner.descriptor().serial_name())
    }

    fn visit_none<E: Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E: Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        self.inner.deserialize_seed().deserialize(deserializer)
    }
}

impl ValueSerializer for NullableSerializer {
    #[inline]
    fn descriptor(&self) -> &SerialDescriptor {
        &self.descriptor
    }

    fn encode<'a>(&'a self, value: &'a Value) -> Box<dyn erased_serde::Serialize + 'a> {
        Box::new(NullableView {
            inner: &*self.inner,
            value,
        })
    }

    fn decode<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error> {
        deserializer.deserialize_option(OptionVisitor { inner: &*self.inner })
    }
}

// -----------------------------------------------------------------------------
// Tests

use alloc::boxed::Box;
use core::fmt::{self, Formatter};

use serde_core::de::{MapAccess, Visitor};
use serde_core::ser::SerializeMap;
use serde_core::{Deserializer as _, Serialize, Serializer};

use super::seq_visitor::MismatchView;
use super::{SerializeWith, SharedSerializer, ValueSerializer};
use crate::Value;
use crate::collections::OrderedMap;
use crate::descriptor::SerialDescriptor;

/// Serializer of [`Value::Map`], written as a format map.
///
/// When the input repeats a key, the last value wins and the entry keeps the
/// position of the first occurrence.
pub struct MapSerializer {
    key: SharedSerializer,
    value: SharedSerializer,
    descriptor: SerialDescriptor,
}

impl MapSerializer {
    pub fn new(key: SharedSerializer, value: SharedSerializer) -> Self {
        let descriptor = SerialDescriptor::map(
            "Map",
            key.descriptor().clone(),
            value.descriptor().clone(),
        );
        Self {
            key,
            value,
            descriptor,
        }
    }

    #[inline]
    pub fn key(&self) -> &SharedSerializer {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &SharedSerializer {
        &self.value
    }
}

struct MapView<'a> {
    key: &'a dyn ValueSerializer,
    value: &'a dyn ValueSerializer,
    entries: &'a OrderedMap<Value, Value>,
}

impl Serialize for MapView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in self.entries.iter() {
            state.serialize_entry(
                &SerializeWith::new(self.key, key),
                &SerializeWith::new(self.value, value),
            )?;
        }
        state.end()
    }
}

struct MapVisitor<'a> {
    key: &'a dyn ValueSerializer,
    value: &'a dyn ValueSerializer,
}

impl<'de> Visitor<'de> for MapVisitor<'_> {
    type Value = Value;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(
            formatter,
            "a map from {} to {}",
            self.key.descriptor().serial_name(),
            self.value.descriptor().serial_name(),
        )
    }

    fn visit_map<V>(self, mut map: V) -> Result<Self::Value, V::Error>
    where
        V: MapAccess<'de>,
    {
        let mut entries = OrderedMap::with_capacity(map.size_hint().unwrap_or_default().min(4096));

        while let Some(key) = map.next_key_seed(self.key.deserialize_seed())? {
            let value = map.next_value_seed(self.value.deserialize_seed())?;
            entries.insert(key, value);
        }

        Ok(Value::Map(entries))
    }
}

impl ValueSerializer for MapSerializer {
    #[inline]
    fn descriptor(&self) -> &SerialDescriptor {
        &self.descriptor
    }

    fn encode<'a>(&'a self, value: &'a Value) -> Box<dyn erased_serde::Serialize + 'a> {
        match value {
            Value::Map(entries) => Box::new(MapView {
                key: &*self.key,
                value: &*self.value,
                entries,
            }),
            other => Box::new(MismatchView {
                expected: self.descriptor.serial_name().into(),
                found: other.kind_name(),
            }),
        }
    }

    fn decode<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error> {
        deserializer.deserialize_map(MapVisitor {
            key: &*self.key,
            value: &*self.value,
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

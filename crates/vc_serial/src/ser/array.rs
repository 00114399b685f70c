use alloc::boxed::Box;
use alloc::vec::Vec;

use serde_core::{Deserialize, Deserializer as _, Serialize, Serializer};

use super::seq_visitor::{MismatchView, SeqView, SeqVisitor};
use super::{SharedSerializer, ValueSerializer, primitive_serializer};
use crate::Value;
use crate::descriptor::{PrimitiveKind, SerialDescriptor};
use crate::value::PrimitiveArray;

// -----------------------------------------------------------------------------
// ArraySerializer

/// Serializer of [`Value::Array`], a fixed-length sequence of boxed elements.
pub struct ArraySerializer {
    element: SharedSerializer,
    descriptor: SerialDescriptor,
}

impl ArraySerializer {
    pub fn new(element: SharedSerializer) -> Self {
        let descriptor = SerialDescriptor::list("Array", element.descriptor().clone());
        Self {
            element,
            descriptor,
        }
    }

    #[inline]
    pub fn element(&self) -> &SharedSerializer {
        &self.element
    }
}

fn collect_array(items: Vec<Value>) -> Value {
    Value::Array(items.into_boxed_slice())
}

impl ValueSerializer for ArraySerializer {
    #[inline]
    fn descriptor(&self) -> &SerialDescriptor {
        &self.descriptor
    }

    fn encode<'a>(&'a self, value: &'a Value) -> Box<dyn erased_serde::Serialize + 'a> {
        match value {
            Value::Array(items) => Box::new(SeqView {
                element: &*self.element,
                items,
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
        deserializer.deserialize_seq(SeqVisitor {
            element: &*self.element,
            expecting: "an array",
            finish: collect_array,
        })
    }
}

// -----------------------------------------------------------------------------
// PrimitiveArraySerializer

/// Serializer of arrays of a non-string primitive, decoded into unboxed storage.
///
/// The wire shape is the same sequence [`ArraySerializer`] writes. Encoding accepts
/// a matching [`Value::PrimitiveArray`] as well as a [`Value::Array`] of matching
/// primitives; decoding always yields [`Value::PrimitiveArray`].
///
/// # Examples
///
/// ```
/// use vc_serial::descriptor::PrimitiveKind;
/// use vc_serial::ser::PrimitiveArraySerializer;
///
/// let ints = PrimitiveArraySerializer::new(PrimitiveKind::I32).unwrap();
/// assert_eq!(ints.kind(), PrimitiveKind::I32);
///
/// assert!(PrimitiveArraySerializer::new(PrimitiveKind::String).is_none());
/// ```
pub struct PrimitiveArraySerializer {
    kind: PrimitiveKind,
    descriptor: SerialDescriptor,
}

impl PrimitiveArraySerializer {
    /// Creates the specialized array serializer of `kind`.
    ///
    /// Returns `None` for [`PrimitiveKind::String`], which has no unboxed form.
    pub fn new(kind: PrimitiveKind) -> Option<Self> {
        let name = match kind {
            PrimitiveKind::String => return None,
            PrimitiveKind::Char => "CharArray",
            PrimitiveKind::I8 => "I8Array",
            PrimitiveKind::I16 => "I16Array",
            PrimitiveKind::I32 => "I32Array",
            PrimitiveKind::I64 => "I64Array",
            PrimitiveKind::F32 => "F32Array",
            PrimitiveKind::F64 => "F64Array",
            PrimitiveKind::Bool => "BoolArray",
        };
        let element = SerialDescriptor::primitive(kind);
        Some(Self {
            kind,
            descriptor: SerialDescriptor::list(name, element),
        })
    }

    #[inline]
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }
}

struct PrimitiveArrayView<'a> {
    array: &'a PrimitiveArray,
}

impl Serialize for PrimitiveArrayView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.array {
            PrimitiveArray::Bool(items) => serializer.collect_seq(items.iter()),
            PrimitiveArray::Char(items) => serializer.collect_seq(items.iter()),
            PrimitiveArray::I8(items) => serializer.collect_seq(items.iter()),
            PrimitiveArray::I16(items) => serializer.collect_seq(items.iter()),
            PrimitiveArray::I32(items) => serializer.collect_seq(items.iter()),
            PrimitiveArray::I64(items) => serializer.collect_seq(items.iter()),
            PrimitiveArray::F32(items) => serializer.collect_seq(items.iter()),
            PrimitiveArray::F64(items) => serializer.collect_seq(items.iter()),
        }
    }
}

#[inline]
fn array_kind(array: &PrimitiveArray) -> PrimitiveKind {
    match array {
        PrimitiveArray::Bool(_) => PrimitiveKind::Bool,
        PrimitiveArray::Char(_) => PrimitiveKind::Char,
        PrimitiveArray::I8(_) => PrimitiveKind::I8,
        PrimitiveArray::I16(_) => PrimitiveKind::I16,
        PrimitiveArray::I32(_) => PrimitiveKind::I32,
        PrimitiveArray::I64(_) => PrimitiveKind::I64,
        PrimitiveArray::F32(_) => PrimitiveKind::F32,
        PrimitiveArray::F64(_) => PrimitiveKind::F64,
    }
}

impl ValueSerializer for PrimitiveArraySerializer {
    #[inline]
    fn descriptor(&self) -> &SerialDescriptor {
        &self.descriptor
    }

    fn encode<'a>(&'a self, value: &'a Value) -> Box<dyn erased_serde::Serialize + 'a> {
        match value {
            Value::PrimitiveArray(array) if array_kind(array) == self.kind => {
                Box::new(PrimitiveArrayView { array })
            }
            Value::Array(items) => {
                // Boxed form, checked element by element by the primitive serializer.
                let element = primitive_serializer(self.kind);
                Box::new(OwnedSeqView { element, items })
            }
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
        let array = match self.kind {
            PrimitiveKind::Bool => PrimitiveArray::Bool(Box::deserialize(deserializer)?),
            PrimitiveKind::Char => PrimitiveArray::Char(Box::deserialize(deserializer)?),
            PrimitiveKind::I8 => PrimitiveArray::I8(Box::deserialize(deserializer)?),
            PrimitiveKind::I16 => PrimitiveArray::I16(Box::deserialize(deserializer)?),
            PrimitiveKind::I32 => PrimitiveArray::I32(Box::deserialize(deserializer)?),
            PrimitiveKind::I64 => PrimitiveArray::I64(Box::deserialize(deserializer)?),
            PrimitiveKind::F32 => PrimitiveArray::F32(Box::deserialize(deserializer)?),
            PrimitiveKind::F64 => PrimitiveArray::F64(Box::deserialize(deserializer)?),
            PrimitiveKind::String => unreachable!("string arrays are never specialized"),
        };
        Ok(Value::PrimitiveArray(array))
    }
}

/// [`SeqView`] over an element serializer it owns.
struct OwnedSeqView<'a> {
    element: SharedSerializer,
    items: &'a [Value],
}

impl Serialize for OwnedSeqView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SeqView {
            element: &*self.element,
            items: self.items,
        }
        .serialize(serializer)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;

    use super::PrimitiveArraySerializer;
    use crate::Value;
    use crate::descriptor::{PrimitiveKind, SerialKind};
    use crate::ser::{SerializerExt, SharedSerializer, primitive_serializer};
    use crate::test_utils::{from_json, from_ron, to_json, to_ron};
    use crate::value::PrimitiveArray;

    fn ints() -> SharedSerializer {
        alloc::sync::Arc::new(PrimitiveArraySerializer::new(PrimitiveKind::I32).unwrap())
    }

    #[test]
    fn same_wire_shape_as_boxed_arrays() {
        let boxed = primitive_serializer(PrimitiveKind::I32).array();
        let unboxed = ints();

        let boxed_value = Value::Array(vec![Value::I32(4), Value::I32(5)].into_boxed_slice());
        let unboxed_value = Value::PrimitiveArray(PrimitiveArray::I32(Box::new([4_i32, 5])));

        let json = to_json(&boxed, &boxed_value).unwrap();
        assert_eq!(json, "[4,5]");
        assert_eq!(to_json(&unboxed, &unboxed_value).unwrap(), json);
        assert_eq!(to_json(&unboxed, &boxed_value).unwrap(), json);

        assert_eq!(from_json(&boxed, &json).unwrap(), boxed_value);
        assert_eq!(from_json(&unboxed, &json).unwrap(), unboxed_value);
    }

    #[test]
    fn every_kind_round_trips() {
        let samples = [
            PrimitiveArray::Bool(Box::new([true, false])),
            PrimitiveArray::Char(Box::new(['a', 'z'])),
            PrimitiveArray::I8(Box::new([-1_i8, 1])),
            PrimitiveArray::I16(Box::new([300_i16])),
            PrimitiveArray::I32(Box::new([0_i32; 0])),
            PrimitiveArray::I64(Box::new([1_i64 << 40])),
            PrimitiveArray::F32(Box::new([0.5_f32])),
            PrimitiveArray::F64(Box::new([1.25_f64, -8.0])),
        ];
        for array in samples {
            let kind = super::array_kind(&array);
            let serializer: SharedSerializer =
                alloc::sync::Arc::new(PrimitiveArraySerializer::new(kind).unwrap());
            let value = Value::PrimitiveArray(array);

            let json = to_json(&serializer, &value).unwrap();
            assert_eq!(from_json(&serializer, &json).unwrap(), value);

            let ron = to_ron(&serializer, &value).unwrap();
            assert_eq!(from_ron(&serializer, &ron).unwrap(), value);
        }
    }

    #[test]
    fn descriptor_names_the_element() {
        let serializer = ints();
        let descriptor = serializer.descriptor();
        assert_eq!(descriptor.serial_name(), "I32Array");
        assert_eq!(descriptor.kind(), SerialKind::List);
        assert_eq!(descriptor.element_descriptor(0).serial_name(), "i32");
    }

    #[test]
    fn mismatched_kind_is_rejected() {
        let serializer = ints();
        let value = Value::PrimitiveArray(PrimitiveArray::I8(Box::new([1_i8])));
        assert!(to_json(&serializer, &value).is_err());

        let value = Value::Array(vec![Value::I64(1)].into_boxed_slice());
        assert!(to_json(&serializer, &value).is_err());
    }
}

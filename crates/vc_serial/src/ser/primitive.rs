use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use std::sync::OnceLock;

use serde_core::{Deserialize, Serialize, Serializer};

use super::{SharedSerializer, ValueSerializer, ser_error};
use crate::descriptor::{PrimitiveKind, SerialDescriptor};
use crate::{SerialError, Value};

// -----------------------------------------------------------------------------
// PrimitiveSerializer

/// The serializer of one [`PrimitiveKind`].
///
/// There is exactly one instance per kind, obtained through [`primitive_serializer`].
pub struct PrimitiveSerializer {
    kind: PrimitiveKind,
    descriptor: SerialDescriptor,
}

impl PrimitiveSerializer {
    fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            descriptor: SerialDescriptor::primitive(kind),
        }
    }

    /// Returns the kind this serializer handles.
    #[inline]
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }
}

/// Returns the shared serializer of a primitive kind.
///
/// Every call for the same kind returns the same instance.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_serial::descriptor::PrimitiveKind;
/// use vc_serial::ser::primitive_serializer;
///
/// let a = primitive_serializer(PrimitiveKind::Bool);
/// let b = primitive_serializer(PrimitiveKind::Bool);
///
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(a.descriptor().serial_name(), "bool");
/// ```
pub fn primitive_serializer(kind: PrimitiveKind) -> SharedSerializer {
    static TABLE: OnceLock<[SharedSerializer; 9]> = OnceLock::new();

    let table = TABLE.get_or_init(|| {
        PrimitiveKind::ALL.map(|kind| Arc::new(PrimitiveSerializer::new(kind)) as SharedSerializer)
    });
    table[kind.index()].clone()
}

struct PrimitiveView<'a> {
    kind: PrimitiveKind,
    value: &'a Value,
}

impl Serialize for PrimitiveView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (self.kind, self.value) {
            (PrimitiveKind::String, Value::String(v)) => serializer.serialize_str(v),
            (PrimitiveKind::Char, Value::Char(v)) => serializer.serialize_char(*v),
            (PrimitiveKind::I8, Value::I8(v)) => serializer.serialize_i8(*v),
            (PrimitiveKind::I16, Value::I16(v)) => serializer.serialize_i16(*v),
            (PrimitiveKind::I32, Value::I32(v)) => serializer.serialize_i32(*v),
            (PrimitiveKind::I64, Value::I64(v)) => serializer.serialize_i64(*v),
            (PrimitiveKind::F32, Value::F32(v)) => serializer.serialize_f32(*v),
            (PrimitiveKind::F64, Value::F64(v)) => serializer.serialize_f64(*v),
            (PrimitiveKind::Bool, Value::Bool(v)) => serializer.serialize_bool(*v),
            (kind, value) => Err(ser_error(SerialError::ValueMismatch {
                expected: kind.serial_name().into(),
                found: value.kind_name(),
            })),
        }
    }
}

impl ValueSerializer for PrimitiveSerializer {
    #[inline]
    fn descriptor(&self) -> &SerialDescriptor {
        &self.descriptor
    }

    fn encode<'a>(&'a self, value: &'a Value) -> Box<dyn erased_serde::Serialize + 'a> {
        Box::new(PrimitiveView {
            kind: self.kind,
            value,
        })
    }

    fn decode<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error> {
        Ok(match self.kind {
            PrimitiveKind::String => Value::String(String::deserialize(deserializer)?),
            PrimitiveKind::Char => Value::Char(char::deserialize(deserializer)?),
            PrimitiveKind::I8 => Value::I8(i8::deserialize(deserializer)?),
            PrimitiveKind::I16 => Value::I16(i16::deserialize(deserializer)?),
            PrimitiveKind::I32 => Value::I32(i32::deserialize(deserializer)?),
            PrimitiveKind::I64 => Value::I64(i64::deserialize(deserializer)?),
            PrimitiveKind::F32 => Value::F32(f32::deserialize(deserializer)?),
            PrimitiveKind::F64 => Value::F64(f64::deserialize(deserializer)?),
            PrimitiveKind::Bool => Value::Bool(bool::deserialize(deserializer)?),
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::sync::Arc;

    use super::primitive_serializer;
    use crate::Value;
    use crate::descriptor::{PrimitiveKind, SerialKind};
    use crate::test_utils::{from_json, from_ron, to_json, to_ron};

    fn samples() -> [(PrimitiveKind, Value); 9] {
        [
            (PrimitiveKind::String, Value::from("hello \"world\"")),
            (PrimitiveKind::Char, Value::Char('λ')),
            (PrimitiveKind::I8, Value::I8(i8::MIN)),
            (PrimitiveKind::I16, Value::I16(-1234)),
            (PrimitiveKind::I32, Value::I32(i32::MAX)),
            (PrimitiveKind::I64, Value::I64(-9_000_000_000)),
            (PrimitiveKind::F32, Value::F32(1.5)),
            (PrimitiveKind::F64, Value::F64(-0.25)),
            (PrimitiveKind::Bool, Value::Bool(true)),
        ]
    }

    #[test]
    fn round_trip_every_kind() {
        for (kind, value) in samples() {
            let serializer = primitive_serializer(kind);
            let json = to_json(&serializer, &value).unwrap();
            assert_eq!(from_json(&serializer, &json).unwrap(), value, "{json}");

            let ron = to_ron(&serializer, &value).unwrap();
            assert_eq!(from_ron(&serializer, &ron).unwrap(), value, "{ron}");
        }
    }

    #[test]
    fn singleton_per_kind() {
        for kind in PrimitiveKind::ALL {
            let a = primitive_serializer(kind);
            let b = primitive_serializer(kind);
            assert!(Arc::ptr_eq(&a, &b));
            assert_eq!(a.descriptor().kind(), SerialKind::Primitive(kind));
            assert_eq!(a.descriptor().serial_name(), kind.serial_name());
            assert!(!a.descriptor().is_nullable());
        }
    }

    #[test]
    fn wrong_value_is_reported() {
        let serializer = primitive_serializer(PrimitiveKind::I32);
        let err = to_json(&serializer, &Value::from("7")).unwrap_err();
        assert!(err.to_string().contains("expected i32 value, found String"));
    }

    #[test]
    fn wrong_input_is_reported() {
        let serializer = primitive_serializer(PrimitiveKind::Bool);
        assert!(from_json(&serializer, "\"yes\"").is_err());
    }
}

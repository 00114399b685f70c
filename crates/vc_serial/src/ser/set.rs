use alloc::boxed::Box;
use alloc::vec::Vec;

use serde_core::Deserializer as _;

use super::seq_visitor::{MismatchView, SeqView, SeqVisitor};
use super::{SharedSerializer, ValueSerializer};
use crate::Value;
use crate::collections::OrderedSet;
use crate::descriptor::SerialDescriptor;

/// Serializer of [`Value::Set`], written as a format sequence.
///
/// Decoding collapses repeated elements: the first occurrence keeps its position.
pub struct SetSerializer {
    element: SharedSerializer,
    descriptor: SerialDescriptor,
}

impl SetSerializer {
    pub fn new(element: SharedSerializer) -> Self {
        let descriptor = SerialDescriptor::list("Set", element.descriptor().clone());
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

fn collect_set(items: Vec<Value>) -> Value {
    Value::Set(items.into_iter().collect::<OrderedSet<_>>())
}

impl ValueSerializer for SetSerializer {
    #[inline]
    fn descriptor(&self) -> &SerialDescriptor {
        &self.descriptor
    }

    fn encode<'a>(&'a self, value: &'a Value) -> Box<dyn erased_serde::Serialize + 'a> {
        match value {
            Value::Set(items) => Box::new(SeqView {
                element: &*self.element,
                items: items.as_slice(),
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
            expecting: "a set",
            finish: collect_set,
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::Value;
    use crate::collections::OrderedSet;
    use crate::descriptor::{PrimitiveKind, SerialKind};
    use crate::ser::{SerializerExt, primitive_serializer};
    use crate::test_utils::{from_json, to_json};

    #[test]
    fn duplicates_collapse_in_order() {
        let serializer = primitive_serializer(PrimitiveKind::String).set();

        let value = from_json(&serializer, r#"["a","b","c","c"]"#).unwrap();
        let set = value.as_set().unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(
            set.as_slice(),
            [Value::from("a"), Value::from("b"), Value::from("c")]
        );

        assert_eq!(to_json(&serializer, &value).unwrap(), r#"["a","b","c"]"#);
    }

    #[test]
    fn descriptor_is_list_kind() {
        let serializer = primitive_serializer(PrimitiveKind::I64).set();
        assert_eq!(serializer.descriptor().serial_name(), "Set");
        assert_eq!(serializer.descriptor().kind(), SerialKind::List);
    }

    #[test]
    fn list_value_is_rejected() {
        let serializer = primitive_serializer(PrimitiveKind::I64).set();
        let list = Value::from(alloc::vec![1_i64]);
        assert!(to_json(&serializer, &list).is_err());

        let set: OrderedSet<Value> = [Value::I64(1)].into_iter().collect();
        assert_eq!(to_json(&serializer, &Value::Set(set)).unwrap(), "[1]");
    }
}

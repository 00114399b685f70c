use alloc::boxed::Box;

use serde_core::Deserializer as _;

use super::seq_visitor::{MismatchView, SeqView, SeqVisitor};
use super::{SharedSerializer, ValueSerializer};
use crate::Value;
use crate::descriptor::SerialDescriptor;

/// Serializer of [`Value::List`], written as a format sequence.
///
/// Its descriptor is a list named `List` whose element is the element serializer's
/// descriptor.
pub struct ListSerializer {
    element: SharedSerializer,
    descriptor: SerialDescriptor,
}

impl ListSerializer {
    pub fn new(element: SharedSerializer) -> Self {
        let descriptor = SerialDescriptor::list("List", element.descriptor().clone());
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

impl ValueSerializer for ListSerializer {
    #[inline]
    fn descriptor(&self) -> &SerialDescriptor {
        &self.descriptor
    }

    fn encode<'a>(&'a self, value: &'a Value) -> Box<dyn erased_serde::Serialize + 'a> {
        match value {
            Value::List(items) => Box::new(SeqView {
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
            expecting: "a list",
            finish: Value::List,
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::Value;
    use crate::descriptor::{PrimitiveKind, SerialKind};
    use crate::ser::{SerializerExt, primitive_serializer};
    use crate::test_utils::{from_json, from_ron, to_json, to_ron};

    #[test]
    fn nested_lists() {
        let serializer = primitive_serializer(PrimitiveKind::I32).list().list();
        let value = Value::List(vec![Value::from(vec![1, 2, 3]), Value::List(Vec::new())]);

        let json = to_json(&serializer, &value).unwrap();
        assert_eq!(json, "[[1,2,3],[]]");
        assert_eq!(from_json(&serializer, &json).unwrap(), value);

        let ron = to_ron(&serializer, &value).unwrap();
        assert_eq!(from_ron(&serializer, &ron).unwrap(), value);
    }

    #[test]
    fn descriptor_shape() {
        let serializer = primitive_serializer(PrimitiveKind::String).list();
        let descriptor = serializer.descriptor();

        assert_eq!(descriptor.serial_name(), "List");
        assert_eq!(descriptor.kind(), SerialKind::List);
        assert_eq!(descriptor.elements_count(), 1);
        assert_eq!(descriptor.element_descriptor(0).serial_name(), "String");
    }

    #[test]
    fn rejects_other_shapes() {
        let serializer = primitive_serializer(PrimitiveKind::I32).list();
        let err = to_json(&serializer, &Value::I32(1)).unwrap_err();
        assert!(err.to_string().contains("expected List value, found i32"));

        assert!(from_json(&serializer, "{\"a\":1}").is_err());
        assert!(from_json(&serializer, "[1,\"two\"]").is_err());
    }

    #[test]
    fn format_errors_keep_their_message() {
        let serializer = primitive_serializer(PrimitiveKind::I32).list().list();
        let plain = serde_json::from_str::<Vec<Vec<i32>>>("[[1,2").unwrap_err();

        let err = from_json(&serializer, "[[1,2").unwrap_err();
        assert_eq!(err.to_string(), plain.to_string());
        assert_eq!(plain.classify(), serde_json::error::Category::Eof);
        // Rebuilt through `custom` when it leaves the erased deserializer.
        assert_eq!(err.classify(), serde_json::error::Category::Data);
    }
}

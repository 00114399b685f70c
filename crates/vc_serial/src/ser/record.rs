use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::{self, Formatter};

use serde_core::de::{IgnoredAny, MapAccess, Visitor};
use serde_core::ser::SerializeMap;
use serde_core::{Deserializer as _, Serialize, Serializer};

use super::seq_visitor::MismatchView;
use super::{SerializeWith, SharedSerializer, ValueSerializer, de_error, ser_error};
use crate::annotation::{Annotation, Annotations, SerialName};
use crate::descriptor::element::{ElementDescriptor, ElementInfo};
use crate::descriptor::{LazyDescriptor, RecordDescriptorBuilder, SerialDescriptor};
use crate::registry::LazySerializer;
use crate::value::Record;
use crate::{SerialError, Value};

// -----------------------------------------------------------------------------
// UnknownFieldPolicy

/// What a record decoder does with an input field it does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownFieldPolicy {
    /// Fail with an error naming the record and the field.
    #[default]
    Reject,
    /// Skip the field's value.
    Ignore,
}

// -----------------------------------------------------------------------------
// RecordSerializer

struct RecordField {
    property: Cow<'static, str>,
    wire_name: Cow<'static, str>,
    serializer: SharedSerializer,
    default: Option<Value>,
}

/// Serializer of [`Value::Record`], written as a format map keyed by field name.
///
/// Fields are encoded in declaration order. Decoding accepts fields in any order.
///
/// Created through [`RecordSerializerBuilder`].
pub struct RecordSerializer {
    fields: Box<[RecordField]>,
    policy: UnknownFieldPolicy,
    descriptor: SerialDescriptor,
}

impl RecordSerializer {
    /// Returns the unknown field policy used when decoding.
    #[inline]
    pub fn unknown_fields(&self) -> UnknownFieldPolicy {
        self.policy
    }

    /// Returns the serializer of the field with the given property name.
    pub fn field_serializer(&self, property: &str) -> Option<&SharedSerializer> {
        self.fields
            .iter()
            .find(|field| field.property == property)
            .map(|field| &field.serializer)
    }

    fn finish<E: serde_core::de::Error>(&self, slots: Vec<Option<Value>>) -> Result<Value, E> {
        let mut record = Record::with_capacity(self.fields.len());
        for (field, slot) in self.fields.iter().zip(slots) {
            let value = match (slot, &field.default) {
                (Some(value), _) => value,
                (None, Some(default)) => default.clone(),
                (None, None) => {
                    return Err(de_error(SerialError::MissingField {
                        descriptor: self.descriptor.serial_name().into(),
                        field: field.wire_name.clone().into_owned(),
                    }));
                }
            };
            record.insert(field.property.clone(), value);
        }
        Ok(Value::Record(record))
    }
}

struct RecordView<'a> {
    serializer: &'a RecordSerializer,
    record: &'a Record,
}

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = &self.serializer.fields;
        let mut state = serializer.serialize_map(Some(fields.len()))?;
        for field in fields.iter() {
            let value = match (self.record.get(&field.property), &field.default) {
                (Some(value), _) | (None, Some(value)) => value,
                (None, None) => {
                    return Err(ser_error(SerialError::MissingField {
                        descriptor: self.serializer.descriptor.serial_name().into(),
                        field: field.property.clone().into_owned(),
                    }));
                }
            };
            state.serialize_entry(
                &*field.wire_name,
                &SerializeWith::new(&*field.serializer, value),
            )?;
        }
        state.end()
    }
}

struct RecordVisitor<'a> {
    serializer: &'a RecordSerializer,
}

impl<'de> Visitor<'de> for RecordVisitor<'_> {
    type Value = Value;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "record `{}`", self.serializer.descriptor.serial_name())
    }

    fn visit_map<V>(self, mut map: V) -> Result<Self::Value, V::Error>
    where
        V: MapAccess<'de>,
    {
        let record = self.serializer;
        let descriptor = &record.descriptor;
        let mut slots: Vec<Option<Value>> = (0..record.fields.len()).map(|_| None).collect();

        while let Some(key) = map.next_key::<String>()? {
            let index = match record.policy {
                UnknownFieldPolicy::Reject => match descriptor.element_index_strict(&key) {
                    Ok(index) => index,
                    Err(err) => return Err(de_error(err)),
                },
                UnknownFieldPolicy::Ignore => match descriptor.element_index(&key) {
                    Some(index) => index,
                    None => {
                        log::trace!(
                            "skipping unknown field `{key}` of `{}`",
                            descriptor.serial_name()
                        );
                        map.next_value::<IgnoredAny>()?;
                        continue;
                    }
                },
            };
            if slots[index].is_some() {
                return Err(de_error(format_args!(
                    "duplicate field `{key}` in record `{}`",
                    descriptor.serial_name()
                )));
            }
            let field = &record.fields[index];
            slots[index] = Some(map.next_value_seed(field.serializer.deserialize_seed())?);
        }

        record.finish(slots)
    }
}

impl ValueSerializer for RecordSerializer {
    #[inline]
    fn descriptor(&self) -> &SerialDescriptor {
        &self.descriptor
    }

    fn encode<'a>(&'a self, value: &'a Value) -> Box<dyn erased_serde::Serialize + 'a> {
        match value {
            Value::Record(record) => Box::new(RecordView {
                serializer: self,
                record,
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
        deserializer.deserialize_map(RecordVisitor { serializer: self })
    }
}

// -----------------------------------------------------------------------------
// RecordSerializerBuilder

enum PendingSerializer {
    Eager(SharedSerializer),
    Lazy(LazySerializer),
}

struct PendingField {
    property: Cow<'static, str>,
    serializer: PendingSerializer,
    annotations: Annotations,
    default: Option<Value>,
}

/// Builder of [`RecordSerializer`]s, the usual body of a user type factory.
///
/// Field-level calls ([`default_value`](Self::default_value),
/// [`annotate`](Self::annotate)) apply to the most recently added field.
///
/// A field annotated with [`SerialName`] appears under that name in the descriptor
/// and on the wire; the decoded [`Record`] keeps the property name.
///
/// # Examples
///
/// ```
/// use vc_serial::annotation::SerialName;
/// use vc_serial::descriptor::PrimitiveKind;
/// use vc_serial::ser::{RecordSerializerBuilder, SharedSerializer, primitive_serializer};
/// use vc_serial::{Record, Value};
///
/// let user: SharedSerializer = std::sync::Arc::new(
///     RecordSerializerBuilder::new("User")
///         .field("user_id", primitive_serializer(PrimitiveKind::I64))
///         .annotate(SerialName::new("userId"))
///         .field("admin", primitive_serializer(PrimitiveKind::Bool))
///         .default_value(false)
///         .build(),
/// );
///
/// assert_eq!(user.descriptor().element_name(0), "userId");
/// assert!(user.descriptor().is_element_optional(1));
///
/// let value = Value::Record(Record::new().with_field("user_id", 7_i64).with_field("admin", true));
/// let json = serde_json::to_string(&user.serialize_with(&value)).unwrap();
/// assert_eq!(json, r#"{"userId":7,"admin":true}"#);
/// ```
#[must_use]
pub struct RecordSerializerBuilder {
    name: Cow<'static, str>,
    fields: Vec<PendingField>,
    annotations: Annotations,
    type_arguments: Vec<SerialDescriptor>,
    policy: UnknownFieldPolicy,
}

impl RecordSerializerBuilder {
    /// Starts a record with the given serial name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            annotations: Annotations::new(),
            type_arguments: Vec::new(),
            policy: UnknownFieldPolicy::default(),
        }
    }

    /// Appends a field.
    pub fn field(
        self,
        property: impl Into<Cow<'static, str>>,
        serializer: SharedSerializer,
    ) -> Self {
        self.push(property.into(), PendingSerializer::Eager(serializer))
    }

    /// Appends a field whose serializer is resolved on first use.
    ///
    /// Needed when the field's type refers back to the record being built.
    pub fn lazy_field(
        self,
        property: impl Into<Cow<'static, str>>,
        serializer: LazySerializer,
    ) -> Self {
        self.push(property.into(), PendingSerializer::Lazy(serializer))
    }

    fn push(mut self, property: Cow<'static, str>, serializer: PendingSerializer) -> Self {
        self.fields.push(PendingField {
            property,
            serializer,
            annotations: Annotations::new(),
            default: None,
        });
        self
    }

    /// Gives the last field a default, used when the input lacks it.
    ///
    /// Fields with a default are optional in the descriptor.
    ///
    /// # Panics
    ///
    /// Panics if no field was added yet.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.last_field().default = Some(value.into());
        self
    }

    /// Attaches an annotation to the last field.
    ///
    /// # Panics
    ///
    /// Panics if no field was added yet.
    pub fn annotate<A: Annotation>(mut self, annotation: A) -> Self {
        self.last_field().annotations.push(annotation);
        self
    }

    /// Attaches an annotation to the record type itself.
    pub fn annotate_type<A: Annotation>(mut self, annotation: A) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Records a type argument the record was instantiated with.
    pub fn type_argument(mut self, descriptor: SerialDescriptor) -> Self {
        self.type_arguments.push(descriptor);
        self
    }

    /// Sets the unknown field policy, [`UnknownFieldPolicy::Reject`] by default.
    pub fn unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Finishes the serializer.
    ///
    /// # Panics
    ///
    /// Panics if a field carries more than one [`SerialName`], or if two fields end
    /// up with the same serial name.
    pub fn build(self) -> RecordSerializer {
        let mut descriptor = RecordDescriptorBuilder::new(self.name.clone());
        let mut fields = Vec::with_capacity(self.fields.len());

        for (index, pending) in self.fields.into_iter().enumerate() {
            let wire_name = match pending.annotations.unique::<SerialName>(&self.name, index) {
                Ok(Some(rename)) => rename.clone().into_inner(),
                Ok(None) => pending.property.clone(),
                Err(err) => panic!("{err}"),
            };

            let (serializer, element) = match pending.serializer {
                PendingSerializer::Eager(serializer) => {
                    let element = ElementDescriptor::Eager(serializer.descriptor().clone());
                    (serializer, element)
                }
                PendingSerializer::Lazy(lazy) => {
                    let init = lazy.clone();
                    let element = ElementDescriptor::Lazy(LazyDescriptor::new(move || {
                        init.descriptor().clone()
                    }));
                    (Arc::new(lazy) as SharedSerializer, element)
                }
            };

            let mut info = ElementInfo::new(wire_name.clone(), element);
            info.annotations = pending.annotations;
            info.optional = pending.default.is_some();
            descriptor = descriptor.element_info(info);

            fields.push(RecordField {
                property: pending.property,
                wire_name,
                serializer,
                default: pending.default,
            });
        }

        descriptor = descriptor.type_annotations(self.annotations);
        for argument in self.type_arguments {
            descriptor = descriptor.type_argument(argument);
        }

        RecordSerializer {
            fields: fields.into_boxed_slice(),
            policy: self.policy,
            descriptor: descriptor.build(),
        }
    }

    fn last_field(&mut self) -> &mut PendingField {
        let name = &self.name;
        match self.fields.last_mut() {
            Some(field) => field,
            None => panic!("record `{name}` has no field to configure"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

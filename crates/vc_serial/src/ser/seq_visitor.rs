use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::fmt::{self, Formatter};

use serde_core::de::{SeqAccess, Visitor};
use serde_core::ser::SerializeSeq;
use serde_core::{Serialize, Serializer};

use super::{SerializeWith, ValueSerializer, ser_error};
use crate::{SerialError, Value};

/// Writes `items` as a sequence, each through `element`.
pub(super) struct SeqView<'a> {
    pub element: &'a dyn ValueSerializer,
    pub items: &'a [Value],
}

impl Serialize for SeqView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_seq(Some(self.items.len()))?;
        for item in self.items {
            state.serialize_element(&SerializeWith::new(self.element, item))?;
        }
        state.end()
    }
}

/// Reports a value handed to a serializer of another shape.
pub(super) struct MismatchView<'a> {
    pub expected: Cow<'a, str>,
    pub found: &'static str,
}

impl Serialize for MismatchView<'_> {
    fn serialize<S: Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
        Err(ser_error(SerialError::ValueMismatch {
            expected: self.expected.clone().into_owned(),
            found: self.found,
        }))
    }
}

/// A [`Visitor`] collecting a sequence decoded through `element`.
///
/// `finish` turns the collected items into the container value.
pub(super) struct SeqVisitor<'a> {
    pub element: &'a dyn ValueSerializer,
    pub expecting: &'static str,
    pub finish: fn(Vec<Value>) -> Value,
}

impl<'de> Visitor<'de> for SeqVisitor<'_> {
    type Value = Value;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(
            formatter,
            "{} of {}",
            self.expecting,
            self.element.descriptor().serial_name()
        )
    }

    fn visit_seq<V>(self, mut seq: V) -> Result<Self::Value, V::Error>
    where
        V: SeqAccess<'de>,
    {
        // The size hint comes from the input.
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default().min(4096));

        while let Some(item) = seq.next_element_seed(self.element.deserialize_seed())? {
            items.push(item);
        }

        Ok((self.finish)(items))
    }
}

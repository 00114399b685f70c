//! Format helpers shared by tests.

use alloc::string::String;

use serde_core::de::DeserializeSeed;

use crate::Value;
use crate::ser::SharedSerializer;

pub(crate) fn to_json(
    serializer: &SharedSerializer,
    value: &Value,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&serializer.serialize_with(value))
}

pub(crate) fn from_json(
    serializer: &SharedSerializer,
    text: &str,
) -> Result<Value, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(text);
    let value = serializer.deserialize_seed().deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

pub(crate) fn to_ron(serializer: &SharedSerializer, value: &Value) -> Result<String, ron::Error> {
    ron::to_string(&serializer.serialize_with(value))
}

pub(crate) fn from_ron(serializer: &SharedSerializer, text: &str) -> Result<Value, ron::Error> {
    let mut de = ron::Deserializer::from_str(text).map_err(|err| err.code)?;
    let value = serializer.deserialize_seed().deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

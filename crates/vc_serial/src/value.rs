//! The dynamic value model shared by every serializer.
//!
//! Serializers produced by the resolver are type-erased, so they all exchange the
//! same [`Value`] tree. Floats compare and hash by bit pattern, which makes `Value`
//! usable as a set element or map key.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};

use crate::collections::{OrderedMap, OrderedSet};

// -----------------------------------------------------------------------------
// Value

/// A dynamically typed value.
///
/// # Examples
///
/// ```
/// use vc_serial::Value;
///
/// let value = Value::from(vec![Some(1_i32), None]);
/// let items = value.as_list().unwrap();
///
/// assert_eq!(items[0], Value::I32(1));
/// assert!(items[1].is_null());
/// assert_eq!(value.kind_name(), "list");
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    String(String),
    /// A fixed-length sequence of boxed values.
    Array(Box<[Value]>),
    /// A fixed-length sequence of unboxed primitives.
    PrimitiveArray(PrimitiveArray),
    List(Vec<Value>),
    Set(OrderedSet<Value>),
    Map(OrderedMap<Value, Value>),
    Record(Record),
}

impl Value {
    /// Returns a short name for the variant, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "String",
            Self::Array(_) => "array",
            Self::PrimitiveArray(_) => "primitive array",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&OrderedSet<Value>> {
        match self {
            Self::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&OrderedMap<Value, Value>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits(),
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::PrimitiveArray(a), Self::PrimitiveArray(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(value) => value.hash(state),
            Self::Char(value) => value.hash(state),
            Self::I8(value) => value.hash(state),
            Self::I16(value) => value.hash(state),
            Self::I32(value) => value.hash(state),
            Self::I64(value) => value.hash(state),
            Self::F32(value) => value.to_bits().hash(state),
            Self::F64(value) => value.to_bits().hash(state),
            Self::String(value) => value.hash(state),
            Self::Array(items) => items.hash(state),
            Self::PrimitiveArray(items) => items.hash(state),
            Self::List(items) => items.hash(state),
            Self::Set(items) => items.hash(state),
            Self::Map(entries) => entries.hash(state),
            Self::Record(record) => record.hash(state),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => String,
    PrimitiveArray => PrimitiveArray,
    OrderedSet<Value> => Set,
    OrderedMap<Value, Value> => Map,
    Record => Record,
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// -----------------------------------------------------------------------------
// PrimitiveArray

/// A fixed-length array of unboxed primitives.
///
/// Produced by the specialized primitive array serializers; there is no `String`
/// variant because strings are not unboxed.
#[derive(Debug, Clone)]
pub enum PrimitiveArray {
    Bool(Box<[bool]>),
    Char(Box<[char]>),
    I8(Box<[i8]>),
    I16(Box<[i16]>),
    I32(Box<[i32]>),
    I64(Box<[i64]>),
    F32(Box<[f32]>),
    F64(Box<[f64]>),
}

impl PrimitiveArray {
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(items) => items.len(),
            Self::Char(items) => items.len(),
            Self::I8(items) => items.len(),
            Self::I16(items) => items.len(),
            Self::I32(items) => items.len(),
            Self::I64(items) => items.len(),
            Self::F32(items) => items.len(),
            Self::F64(items) => items.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PartialEq for PrimitiveArray {
    fn eq(&self, other: &Self) -> bool {
        fn bits_eq<T: Copy, B: PartialEq>(a: &[T], b: &[T], bits: impl Fn(T) -> B) -> bool {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| bits(*x) == bits(*y))
        }

        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => bits_eq(&a[..], &b[..], f32::to_bits),
            (Self::F64(a), Self::F64(b)) => bits_eq(&a[..], &b[..], f64::to_bits),
            _ => false,
        }
    }
}

impl Eq for PrimitiveArray {}

impl Hash for PrimitiveArray {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::Bool(items) => items.hash(state),
            Self::Char(items) => items.hash(state),
            Self::I8(items) => items.hash(state),
            Self::I16(items) => items.hash(state),
            Self::I32(items) => items.hash(state),
            Self::I64(items) => items.hash(state),
            Self::F32(items) => items.iter().for_each(|x| x.to_bits().hash(state)),
            Self::F64(items) => items.iter().for_each(|x| x.to_bits().hash(state)),
        }
    }
}

// -----------------------------------------------------------------------------
// Record

/// The value of a record: field names mapped to values, in declaration order.
///
/// Field names are property names, independent of any wire renaming.
///
/// # Examples
///
/// ```
/// use vc_serial::{Record, Value};
///
/// let point = Record::new()
///     .with_field("x", 1_i32)
///     .with_field("y", 2_i32);
///
/// assert_eq!(point.get("y"), Some(&Value::I32(2)));
/// assert_eq!(point.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Record {
    fields: Vec<(Cow<'static, str>, Value)>,
}

impl Record {
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Adds a field and returns `self`.
    #[inline]
    pub fn with_field(
        mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<Value>,
    ) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field, replacing and returning its previous value.
    pub fn insert(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Iterates over fields in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (&**name, value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{PrimitiveArray, Record, Value};
    use crate::collections::OrderedSet;

    #[test]
    fn floats_compare_by_bits() {
        assert_eq!(Value::F64(f64::NAN), Value::F64(f64::NAN));
        assert_ne!(Value::F32(0.0), Value::F32(-0.0));

        let set: OrderedSet<Value> = [Value::F64(f64::NAN), Value::F64(f64::NAN)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn variants_do_not_mix() {
        assert_ne!(Value::I32(1), Value::I64(1));
        assert_ne!(
            Value::from(vec![1_i32]),
            Value::Array(vec![Value::I32(1)].into_boxed_slice())
        );
        assert_ne!(
            Value::PrimitiveArray(PrimitiveArray::I8(vec![1].into_boxed_slice())),
            Value::PrimitiveArray(PrimitiveArray::I16(vec![1].into_boxed_slice()))
        );
    }

    #[test]
    fn record_insert_replaces() {
        let mut record = Record::new().with_field("a", 1_i32);
        assert_eq!(record.insert("a", 2_i32), Some(Value::I32(1)));
        assert_eq!(record.insert("b", "text"), None);

        let fields: vec::Vec<_> = record.iter().collect();
        assert_eq!(
            fields,
            [("a", &Value::I32(2)), ("b", &Value::String("text".into()))]
        );
    }

    #[test]
    fn option_maps_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some('x')), Value::Char('x'));
    }
}

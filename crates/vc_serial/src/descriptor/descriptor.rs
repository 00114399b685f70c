use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use crate::SerialError;
use crate::annotation::Annotations;
use crate::collections::FixedHashState;
use crate::descriptor::{ElementInfo, PrimitiveKind, SerialKind};

// -----------------------------------------------------------------------------
// SerialDescriptor

/// Immutable description of a serialized shape, cheap to clone.
///
/// A descriptor has a serial name, a [`SerialKind`], a nullability flag and a dense
/// list of elements `0..elements_count()`. Each element has a name, a nested
/// descriptor and a set of annotations.
///
/// How elements are addressed depends on the kind:
///
/// | kind        | `elements_count` | `element_name(i)` | `element_descriptor(i)`          |
/// |-------------|------------------|-------------------|----------------------------------|
/// | `Primitive` | 0                | -                 | -                                |
/// | `Record`    | field count      | field name        | field descriptor (maybe lazy)    |
/// | `List`      | 1                | `i` in decimal    | the element, for every `i`       |
/// | `Map`       | 2                | `i` in decimal    | key for even `i`, value for odd  |
///
/// # Equality
///
/// Descriptors compare by shape, not identity: name, kind, nullability, type
/// arguments and element names. List and map element descriptors are compared
/// deeply, record element descriptors only by serial name, kind and nullability so
/// that self-referential records compare in bounded time.
///
/// # Examples
///
/// ```
/// use vc_serial::descriptor::{PrimitiveKind, SerialDescriptor, SerialKind};
///
/// let list = SerialDescriptor::list("List", SerialDescriptor::primitive(PrimitiveKind::I32));
///
/// assert_eq!(list.kind(), SerialKind::List);
/// assert_eq!(list.elements_count(), 1);
/// assert_eq!(list.element_name(3), "3");
/// assert_eq!(list.element_descriptor(3).serial_name(), "i32");
/// assert_eq!(list.element_index("0"), Some(0));
/// assert_eq!(list.element_index("first"), None);
/// ```
#[derive(Clone)]
pub struct SerialDescriptor(Arc<DescriptorInner>);

struct DescriptorInner {
    name: Cow<'static, str>,
    nullable: bool,
    annotations: Annotations,
    type_arguments: Box<[SerialDescriptor]>,
    shape: Shape,
}

#[derive(Clone)]
enum Shape {
    Primitive(PrimitiveKind),
    Record(Arc<RecordShape>),
    List(SerialDescriptor),
    Map(SerialDescriptor, SerialDescriptor),
}

struct RecordShape {
    elements: Box<[ElementInfo]>,
    indices: HashMap<Cow<'static, str>, usize, FixedHashState>,
}

impl SerialDescriptor {
    /// Creates the leaf descriptor of a primitive kind.
    ///
    /// Its serial name is the kind's canonical name.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::from_shape(kind.serial_name().into(), Shape::Primitive(kind))
    }

    /// Creates a structural list descriptor.
    pub fn list(name: impl Into<Cow<'static, str>>, element: SerialDescriptor) -> Self {
        Self::from_shape(name.into(), Shape::List(element))
    }

    /// Creates a map descriptor with the given key and value descriptors.
    pub fn map(
        name: impl Into<Cow<'static, str>>,
        key: SerialDescriptor,
        value: SerialDescriptor,
    ) -> Self {
        Self::from_shape(name.into(), Shape::Map(key, value))
    }

    fn from_shape(name: Cow<'static, str>, shape: Shape) -> Self {
        Self(Arc::new(DescriptorInner {
            name,
            nullable: false,
            annotations: Annotations::new(),
            type_arguments: Box::new([]),
            shape,
        }))
    }

    /// Creates a record descriptor; used by [`RecordDescriptorBuilder`].
    ///
    /// # Panics
    ///
    /// Panics if two elements share a name.
    ///
    /// [`RecordDescriptorBuilder`]: crate::descriptor::RecordDescriptorBuilder
    pub(crate) fn record(
        name: Cow<'static, str>,
        elements: Vec<ElementInfo>,
        annotations: Annotations,
        type_arguments: Vec<SerialDescriptor>,
    ) -> Self {
        let mut indices = HashMap::with_capacity_and_hasher(elements.len(), FixedHashState);
        for (index, element) in elements.iter().enumerate() {
            if indices.insert(element.name.clone(), index).is_some() {
                panic!(
                    "descriptor `{name}` declares element `{}` more than once",
                    element.name
                );
            }
        }

        Self(Arc::new(DescriptorInner {
            name,
            nullable: false,
            annotations,
            type_arguments: type_arguments.into_boxed_slice(),
            shape: Shape::Record(Arc::new(RecordShape {
                elements: elements.into_boxed_slice(),
                indices,
            })),
        }))
    }

    /// Returns the nullable form of this descriptor.
    ///
    /// The result has the same kind and elements, reports `is_nullable() == true`
    /// and its serial name gains a `?` suffix. A nullable descriptor is returned
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_serial::descriptor::{PrimitiveKind, SerialDescriptor};
    ///
    /// let int = SerialDescriptor::primitive(PrimitiveKind::I32);
    /// let nullable = int.nullable();
    ///
    /// assert!(nullable.is_nullable());
    /// assert_eq!(nullable.serial_name(), "i32?");
    /// assert_eq!(nullable.nullable(), nullable);
    /// assert_ne!(nullable, int);
    /// ```
    pub fn nullable(&self) -> Self {
        if self.0.nullable {
            return self.clone();
        }
        Self(Arc::new(DescriptorInner {
            name: format!("{}?", self.0.name).into(),
            nullable: true,
            annotations: self.0.annotations.clone(),
            type_arguments: self.0.type_arguments.clone(),
            shape: self.0.shape.clone(),
        }))
    }

    /// Returns the serial name.
    #[inline]
    pub fn serial_name(&self) -> &str {
        &self.0.name
    }

    /// Returns the structural kind.
    pub fn kind(&self) -> SerialKind {
        match &self.0.shape {
            Shape::Primitive(kind) => SerialKind::Primitive(*kind),
            Shape::Record(_) => SerialKind::Record,
            Shape::List(_) => SerialKind::List,
            Shape::Map(..) => SerialKind::Map,
        }
    }

    /// Returns `true` if the described value may be absent (null).
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.0.nullable
    }

    /// Returns the annotations attached to the described type itself.
    #[inline]
    pub fn annotations(&self) -> &Annotations {
        &self.0.annotations
    }

    /// Returns the descriptors of the type arguments this type was instantiated with.
    #[inline]
    pub fn type_arguments(&self) -> &[SerialDescriptor] {
        &self.0.type_arguments
    }

    /// Returns the number of addressable elements.
    ///
    /// `0` for primitives, the field count for records, `1` for lists and `2` for
    /// maps.
    pub fn elements_count(&self) -> usize {
        match &self.0.shape {
            Shape::Primitive(_) => 0,
            Shape::Record(record) => record.elements.len(),
            Shape::List(_) => 1,
            Shape::Map(..) => 2,
        }
    }

    /// Returns the element info at `index`, for record descriptors.
    ///
    /// Returns `None` when `index` is out of range or the descriptor is not a record.
    #[inline]
    pub fn element(&self, index: usize) -> Option<&ElementInfo> {
        match &self.0.shape {
            Shape::Record(record) => record.elements.get(index),
            _ => None,
        }
    }

    /// Returns the name of the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the descriptor is primitive or `index` is out of range for a record.
    pub fn element_name(&self, index: usize) -> Cow<'_, str> {
        match &self.0.shape {
            Shape::Record(_) => Cow::Borrowed(self.record_element(index).name()),
            Shape::List(_) | Shape::Map(..) => Cow::Owned(index.to_string()),
            Shape::Primitive(_) => self.no_elements(index),
        }
    }

    /// Returns the index of the element called `name`, or `None` (the unknown-name
    /// sentinel) when there is no such element.
    ///
    /// Never fails; see [`element_index_strict`](Self::element_index_strict) for the
    /// rejecting form.
    pub fn element_index(&self, name: &str) -> Option<usize> {
        match &self.0.shape {
            Shape::Record(record) => record.indices.get(name).copied(),
            Shape::List(_) | Shape::Map(..) => name.parse().ok(),
            Shape::Primitive(_) => None,
        }
    }

    /// Returns the nested descriptor of the element at `index`.
    ///
    /// Lazy record elements are resolved on first access.
    ///
    /// # Panics
    ///
    /// Panics if the descriptor is primitive or `index` is out of range for a record.
    pub fn element_descriptor(&self, index: usize) -> &SerialDescriptor {
        match &self.0.shape {
            Shape::Record(_) => self.record_element(index).descriptor(),
            Shape::List(element) => element,
            Shape::Map(key, value) => {
                if index % 2 == 0 {
                    key
                } else {
                    value
                }
            }
            Shape::Primitive(_) => self.no_elements(index),
        }
    }

    /// Returns the raw, unfiltered annotations of the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the descriptor is primitive or `index` is out of range for a record.
    pub fn element_annotations(&self, index: usize) -> &Annotations {
        match &self.0.shape {
            Shape::Record(_) => self.record_element(index).annotations(),
            Shape::List(_) | Shape::Map(..) => Annotations::EMPTY,
            Shape::Primitive(_) => self.no_elements(index),
        }
    }

    /// Returns `true` if the element at `index` may be missing from the input.
    ///
    /// # Panics
    ///
    /// Panics if the descriptor is primitive or `index` is out of range for a record.
    pub fn is_element_optional(&self, index: usize) -> bool {
        match &self.0.shape {
            Shape::Record(_) => self.record_element(index).is_optional(),
            Shape::List(_) | Shape::Map(..) => false,
            Shape::Primitive(_) => self.no_elements(index),
        }
    }

    #[inline]
    fn record_element(&self, index: usize) -> &ElementInfo {
        match self.element(index) {
            Some(element) => element,
            None => panic!(
                "descriptor `{}` has {} elements, index {index} is out of range",
                self.0.name,
                self.elements_count(),
            ),
        }
    }

    #[cold]
    fn no_elements(&self, index: usize) -> ! {
        panic!(
            "primitive descriptor `{}` has no elements, requested index {index}",
            self.0.name
        )
    }
}

// -----------------------------------------------------------------------------
// Derived helpers

impl SerialDescriptor {
    /// Collects [`element_descriptor`](Self::element_descriptor) for every index
    /// `0..elements_count()`, in index order.
    pub fn element_descriptors(&self) -> Vec<&SerialDescriptor> {
        (0..self.elements_count())
            .map(|index| self.element_descriptor(index))
            .collect()
    }

    /// Collects [`element_name`](Self::element_name) for every index
    /// `0..elements_count()`, in index order.
    pub fn element_names(&self) -> Vec<Cow<'_, str>> {
        (0..self.elements_count())
            .map(|index| self.element_name(index))
            .collect()
    }

    /// Same as [`element_index`](Self::element_index), but an unknown name is an error.
    ///
    /// Decoders of name-keyed formats pick this form to reject unknown fields and the
    /// lenient one to skip them.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_serial::descriptor::{PrimitiveKind, RecordDescriptorBuilder, SerialDescriptor};
    ///
    /// let point = RecordDescriptorBuilder::new("Point")
    ///     .element("x", SerialDescriptor::primitive(PrimitiveKind::I32))
    ///     .element("y", SerialDescriptor::primitive(PrimitiveKind::I32))
    ///     .build();
    ///
    /// assert_eq!(point.element_index_strict("y").unwrap(), 1);
    ///
    /// let err = point.element_index_strict("z").unwrap_err();
    /// assert_eq!(err.to_string(), "descriptor `Point` does not contain element with name `z`");
    /// ```
    pub fn element_index_strict(&self, name: &str) -> Result<usize, SerialError> {
        self.element_index(name)
            .ok_or_else(|| SerialError::UnknownElement {
                descriptor: self.serial_name().into(),
                name: name.into(),
            })
    }
}

// -----------------------------------------------------------------------------
// Equality

/// Shape comparison used for record elements.
#[inline]
fn shallow_eq(a: &SerialDescriptor, b: &SerialDescriptor) -> bool {
    a.serial_name() == b.serial_name() && a.kind() == b.kind() && a.is_nullable() == b.is_nullable()
}

impl PartialEq for SerialDescriptor {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        let (a, b) = (&*self.0, &*other.0);
        if a.name != b.name || a.nullable != b.nullable || a.type_arguments != b.type_arguments {
            return false;
        }
        match (&a.shape, &b.shape) {
            (Shape::Primitive(x), Shape::Primitive(y)) => x == y,
            (Shape::List(x), Shape::List(y)) => x == y,
            (Shape::Map(xk, xv), Shape::Map(yk, yv)) => xk == yk && xv == yv,
            (Shape::Record(x), Shape::Record(y)) => {
                x.elements.len() == y.elements.len()
                    && x.elements.iter().zip(y.elements.iter()).all(|(x, y)| {
                        x.name == y.name
                            && x.optional == y.optional
                            && shallow_eq(x.descriptor(), y.descriptor())
                    })
            }
            _ => false,
        }
    }
}

impl Eq for SerialDescriptor {}

// -----------------------------------------------------------------------------
// Formatting

impl fmt::Debug for SerialDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("SerialDescriptor");
        debug
            .field("name", &self.0.name)
            .field("kind", &self.kind())
            .field("nullable", &self.0.nullable);
        if !self.0.type_arguments.is_empty() {
            debug.field("type_arguments", &self.0.type_arguments);
        }
        if !self.0.annotations.is_empty() {
            debug.field("annotations", &self.0.annotations);
        }
        match &self.0.shape {
            Shape::Primitive(_) => {}
            Shape::Record(record) => {
                debug.field("elements", &record.elements);
            }
            Shape::List(element) => {
                debug.field("element", element);
            }
            Shape::Map(key, value) => {
                debug.field("key", key).field("value", value);
            }
        }
        debug.finish()
    }
}

/// Renders `Name(a: i32, b: List<String>)` for records, `Name<element>` for lists and
/// `Name<key, value>` for maps. Record elements only print their serial name.
impl fmt::Display for SerialDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.shape {
            Shape::Primitive(_) => f.write_str(&self.0.name),
            Shape::List(element) => write!(f, "{}<{element}>", self.0.name),
            Shape::Map(key, value) => write!(f, "{}<{key}, {value}>", self.0.name),
            Shape::Record(record) => {
                write!(f, "{}(", self.0.name)?;
                for (index, element) in record.elements.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", element.name, element.descriptor().serial_name())?;
                }
                f.write_str(")")
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

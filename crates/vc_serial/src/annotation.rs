//! Annotations attached to descriptors and their elements.
//!
//! ## Menu
//!
//! - [`Annotation`]: Any `'static + Debug + Send + Sync` value, blanket implemented.
//! - [`Annotations`]: An ordered annotation list. Unlike a type-keyed map it keeps
//!   every instance, so a malformed definition carrying the same kind twice stays
//!   detectable.
//! - [`find_annotation`] / [`try_find_annotation`]: Extract the single annotation of a
//!   kind from a descriptor element.
//! - [`SerialName`]: Built-in annotation that renames a record field on the wire.

use alloc::borrow::Cow;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, type_name};
use core::fmt::Debug;

use crate::SerialError;
use crate::descriptor::SerialDescriptor;

// -----------------------------------------------------------------------------
// Annotation

/// Metadata that can be attached to a descriptor or one of its elements.
///
/// Implemented for every `'static + Debug + Send + Sync` type.
pub trait Annotation: Any + Debug + Send + Sync {}

impl<T: Any + Debug + Send + Sync> Annotation for T {}

// -----------------------------------------------------------------------------
// Annotations

/// An ordered list of annotations.
///
/// # Examples
///
/// ```
/// use vc_serial::annotation::{Annotations, SerialName};
///
/// let annotations = Annotations::new()
///     .with(SerialName::new("userId"))
///     .with(7_u32);
///
/// assert_eq!(annotations.len(), 2);
/// assert_eq!(annotations.of_kind::<u32>().count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct Annotations {
    items: Vec<Arc<dyn Annotation>>,
}

impl Annotations {
    /// A static reference to an empty [`Annotations`].
    pub(crate) const EMPTY: &'static Self = &Self::new();

    /// Creates an empty list.
    #[inline]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends an annotation and returns `self`.
    #[inline]
    pub fn with<A: Annotation>(mut self, annotation: A) -> Self {
        self.push(annotation);
        self
    }

    /// Appends an annotation.
    ///
    /// Duplicates are kept on purpose.
    #[inline]
    pub fn push<A: Annotation>(&mut self, annotation: A) {
        self.items.push(Arc::new(annotation));
    }

    /// Iterates over every annotation, in insertion order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &dyn Annotation> {
        self.items.iter().map(|item| &**item)
    }

    /// Iterates over the annotations of kind `A`.
    pub fn of_kind<A: Annotation>(&self) -> impl Iterator<Item = &A> {
        self.items
            .iter()
            .filter_map(|item| (&**item as &dyn Any).downcast_ref::<A>())
    }

    /// Returns the single annotation of kind `A`.
    ///
    /// `owner` and `index` only feed the error message.
    pub(crate) fn unique<A: Annotation>(
        &self,
        owner: &str,
        index: usize,
    ) -> Result<Option<&A>, SerialError> {
        let mut candidates = self.of_kind::<A>();
        let Some(first) = candidates.next() else {
            return Ok(None);
        };
        if candidates.next().is_some() {
            return Err(SerialError::DuplicateAnnotation {
                annotation: type_name::<A>(),
                descriptor: owner.into(),
                index,
            });
        }
        Ok(Some(first))
    }

    /// Returns the number of annotations.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there is no annotation.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Debug for Annotations {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Extraction

/// Returns the annotation of kind `A` attached to element `index` of `descriptor`.
///
/// - No match: `Ok(None)`.
/// - One match: `Ok(Some(_))`.
/// - Several matches: [`SerialError::DuplicateAnnotation`]. A kind carries exactly one
///   decision per element, so this is a malformed type definition, not bad input.
///
/// # Panics
///
/// Panics if `index` is out of range for a record descriptor.
pub fn try_find_annotation<A: Annotation>(
    descriptor: &SerialDescriptor,
    index: usize,
) -> Result<Option<&A>, SerialError> {
    descriptor
        .element_annotations(index)
        .unique::<A>(descriptor.serial_name(), index)
}

/// Returns the annotation of kind `A` attached to element `index` of `descriptor`.
///
/// # Panics
///
/// Panics if the element carries more than one annotation of kind `A`,
/// or if `index` is out of range for a record descriptor.
///
/// # Examples
///
/// ```
/// use vc_serial::annotation::{find_annotation, SerialName};
/// use vc_serial::descriptor::{RecordDescriptorBuilder, SerialDescriptor, PrimitiveKind};
///
/// let descriptor = RecordDescriptorBuilder::new("User")
///     .element("user_id", SerialDescriptor::primitive(PrimitiveKind::I64))
///     .annotate(SerialName::new("userId"))
///     .element("name", SerialDescriptor::primitive(PrimitiveKind::String))
///     .build();
///
/// let name = find_annotation::<SerialName>(&descriptor, 0).unwrap();
/// assert_eq!(name.as_str(), "userId");
/// assert!(find_annotation::<SerialName>(&descriptor, 1).is_none());
/// ```
pub fn find_annotation<A: Annotation>(descriptor: &SerialDescriptor, index: usize) -> Option<&A> {
    match try_find_annotation::<A>(descriptor, index) {
        Ok(found) => found,
        Err(err) => panic!("{err}"),
    }
}

// -----------------------------------------------------------------------------
// SerialName

/// Overrides the name a record field uses on the wire.
///
/// Consumed by [`RecordSerializerBuilder`](crate::ser::RecordSerializerBuilder):
/// the descriptor element takes the serial name, the decoded record keeps the
/// property name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialName(Cow<'static, str>);

impl SerialName {
    /// Creates a new serial name.
    #[inline]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Returns the name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn into_inner(self) -> Cow<'static, str> {
        self.0
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Annotations, SerialName, find_annotation, try_find_annotation};
    use crate::SerialError;
    use crate::descriptor::{PrimitiveKind, RecordDescriptorBuilder, SerialDescriptor};

    #[derive(Debug, PartialEq)]
    struct Since(u32);

    fn descriptor() -> SerialDescriptor {
        RecordDescriptorBuilder::new("Config")
            .element("port", SerialDescriptor::primitive(PrimitiveKind::I32))
            .annotate(Since(1))
            .annotate(SerialName::new("listen_port"))
            .element("host", SerialDescriptor::primitive(PrimitiveKind::String))
            .annotate(Since(2))
            .annotate(Since(3))
            .element("debug", SerialDescriptor::primitive(PrimitiveKind::Bool))
            .build()
    }

    #[test]
    fn single_match_is_returned() {
        let descriptor = descriptor();
        assert_eq!(find_annotation::<Since>(&descriptor, 0), Some(&Since(1)));
    }

    #[test]
    fn missing_kind_is_absent() {
        let descriptor = descriptor();
        assert_eq!(find_annotation::<Since>(&descriptor, 2), None);
        assert!(matches!(try_find_annotation::<Since>(&descriptor, 2), Ok(None)));
    }

    #[test]
    fn duplicate_kind_is_an_error() {
        let descriptor = descriptor();
        let err = try_find_annotation::<Since>(&descriptor, 1).unwrap_err();

        let SerialError::DuplicateAnnotation {
            annotation,
            descriptor: owner,
            index,
        } = &err
        else {
            panic!("unexpected error: {err}");
        };
        assert!(annotation.ends_with("Since"));
        assert_eq!(owner, "Config");
        assert_eq!(*index, 1);
    }

    #[test]
    #[should_panic(expected = "duplicate annotations")]
    fn duplicate_kind_panics_in_find() {
        let descriptor = descriptor();
        let _ = find_annotation::<Since>(&descriptor, 1);
    }

    #[test]
    fn raw_annotations_are_unfiltered() {
        let descriptor = descriptor();
        assert_eq!(descriptor.element_annotations(0).len(), 2);
        assert_eq!(descriptor.element_annotations(1).len(), 2);
        assert!(descriptor.element_annotations(2).is_empty());
    }

    #[test]
    fn of_kind_keeps_order() {
        let annotations = Annotations::new().with(Since(4)).with(9_u8).with(Since(5));
        let found: alloc::vec::Vec<_> = annotations.of_kind::<Since>().collect();
        assert_eq!(found, [&Since(4), &Since(5)]);
    }
}

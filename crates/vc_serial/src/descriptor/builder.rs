use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::annotation::{Annotation, Annotations};
use crate::descriptor::element::{ElementDescriptor, ElementInfo, LazyDescriptor};
use crate::descriptor::SerialDescriptor;

/// Builder of record descriptors.
///
/// Element-level calls ([`annotate`](Self::annotate), [`optional`](Self::optional))
/// apply to the most recently added element.
///
/// # Examples
///
/// ```
/// use vc_serial::descriptor::{PrimitiveKind, RecordDescriptorBuilder, SerialDescriptor};
///
/// let descriptor = RecordDescriptorBuilder::new("User")
///     .element("id", SerialDescriptor::primitive(PrimitiveKind::I64))
///     .element("nickname", SerialDescriptor::primitive(PrimitiveKind::String).nullable())
///     .optional()
///     .build();
///
/// assert_eq!(descriptor.elements_count(), 2);
/// assert!(!descriptor.is_element_optional(0));
/// assert!(descriptor.is_element_optional(1));
/// ```
#[must_use]
pub struct RecordDescriptorBuilder {
    name: Cow<'static, str>,
    elements: Vec<ElementInfo>,
    annotations: Annotations,
    type_arguments: Vec<SerialDescriptor>,
}

impl RecordDescriptorBuilder {
    /// Starts a record descriptor with the given serial name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
            annotations: Annotations::new(),
            type_arguments: Vec::new(),
        }
    }

    /// Appends an element with an eagerly known descriptor.
    pub fn element(
        mut self,
        name: impl Into<Cow<'static, str>>,
        descriptor: SerialDescriptor,
    ) -> Self {
        self.elements
            .push(ElementInfo::new(name.into(), ElementDescriptor::Eager(descriptor)));
        self
    }

    /// Appends an element whose descriptor is built on first access.
    pub fn lazy_element(
        mut self,
        name: impl Into<Cow<'static, str>>,
        init: impl Fn() -> SerialDescriptor + Send + Sync + 'static,
    ) -> Self {
        self.elements.push(ElementInfo::new(
            name.into(),
            ElementDescriptor::Lazy(LazyDescriptor::new(init)),
        ));
        self
    }

    /// Appends an element sharing an existing [`LazyDescriptor`].
    pub fn lazy_element_with(
        mut self,
        name: impl Into<Cow<'static, str>>,
        lazy: LazyDescriptor,
    ) -> Self {
        self.elements
            .push(ElementInfo::new(name.into(), ElementDescriptor::Lazy(lazy)));
        self
    }

    /// Attaches an annotation to the last element.
    ///
    /// # Panics
    ///
    /// Panics if no element was added yet.
    pub fn annotate<A: Annotation>(mut self, annotation: A) -> Self {
        self.last_element().annotations.push(annotation);
        self
    }

    /// Marks the last element as optional: decoders may find it absent.
    ///
    /// # Panics
    ///
    /// Panics if no element was added yet.
    pub fn optional(mut self) -> Self {
        self.last_element().optional = true;
        self
    }

    /// Attaches an annotation to the record type itself.
    pub fn annotate_type<A: Annotation>(mut self, annotation: A) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Records a type argument the type was instantiated with.
    pub fn type_argument(mut self, descriptor: SerialDescriptor) -> Self {
        self.type_arguments.push(descriptor);
        self
    }

    /// Appends a prepared element.
    pub(crate) fn element_info(mut self, info: ElementInfo) -> Self {
        self.elements.push(info);
        self
    }

    /// Replaces the annotations of the record type itself.
    pub(crate) fn type_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Finishes the descriptor.
    ///
    /// # Panics
    ///
    /// Panics if two elements share a name.
    pub fn build(self) -> SerialDescriptor {
        SerialDescriptor::record(self.name, self.elements, self.annotations, self.type_arguments)
    }

    fn last_element(&mut self) -> &mut ElementInfo {
        let name = &self.name;
        match self.elements.last_mut() {
            Some(element) => element,
            None => panic!("record `{name}` has no element to configure"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RecordDescriptorBuilder;
    use crate::descriptor::{LazyDescriptor, PrimitiveKind, SerialDescriptor};

    #[test]
    #[should_panic(expected = "more than once")]
    fn duplicate_element_names_panic() {
        let _ = RecordDescriptorBuilder::new("Twice")
            .element("a", SerialDescriptor::primitive(PrimitiveKind::I8))
            .element("a", SerialDescriptor::primitive(PrimitiveKind::I16))
            .build();
    }

    #[test]
    #[should_panic(expected = "no element to configure")]
    fn annotate_without_element_panics() {
        let _ = RecordDescriptorBuilder::new("Empty").annotate(1_u8);
    }

    #[test]
    fn type_level_metadata() {
        let arg = SerialDescriptor::primitive(PrimitiveKind::F64);
        let descriptor = RecordDescriptorBuilder::new("Wrapper")
            .annotate_type("deprecated")
            .type_argument(arg.clone())
            .element("inner", arg)
            .build();

        assert_eq!(descriptor.annotations().len(), 1);
        assert_eq!(descriptor.type_arguments().len(), 1);
        assert_eq!(descriptor.type_arguments()[0].serial_name(), "f64");
    }

    #[test]
    fn elements_share_a_lazy_descriptor() {
        let lazy = LazyDescriptor::new(|| SerialDescriptor::primitive(PrimitiveKind::Bool));
        let descriptor = RecordDescriptorBuilder::new("Pair")
            .lazy_element_with("left", lazy.clone())
            .lazy_element_with("right", lazy.clone())
            .build();
        assert!(!lazy.is_resolved());

        assert_eq!(descriptor.element_descriptor(0).serial_name(), "bool");
        assert!(lazy.is_resolved());
        assert_eq!(descriptor.element_name(1), "right");
    }
}

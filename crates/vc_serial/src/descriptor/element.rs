use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;
use std::sync::OnceLock;

use crate::annotation::Annotations;
use crate::descriptor::SerialDescriptor;

// -----------------------------------------------------------------------------
// LazyDescriptor

/// A descriptor resolved on first access and memoized afterwards.
///
/// Used for record elements that refer back to their own type (directly or through a
/// container), where eager construction would never terminate.
///
/// # Examples
///
/// ```
/// use vc_serial::descriptor::{LazyDescriptor, PrimitiveKind, SerialDescriptor};
///
/// let lazy = LazyDescriptor::new(|| SerialDescriptor::primitive(PrimitiveKind::I32));
/// assert!(!lazy.is_resolved());
///
/// assert_eq!(lazy.get().serial_name(), "i32");
/// assert!(lazy.is_resolved());
/// ```
#[derive(Clone)]
pub struct LazyDescriptor(Arc<LazyInner>);

struct LazyInner {
    cell: OnceLock<SerialDescriptor>,
    init: Box<dyn Fn() -> SerialDescriptor + Send + Sync>,
}

impl LazyDescriptor {
    /// Creates a lazy descriptor from its initializer.
    pub fn new(init: impl Fn() -> SerialDescriptor + Send + Sync + 'static) -> Self {
        Self(Arc::new(LazyInner {
            cell: OnceLock::new(),
            init: Box::new(init),
        }))
    }

    /// Resolves the descriptor, running the initializer on first call only.
    #[inline]
    pub fn get(&self) -> &SerialDescriptor {
        self.0.cell.get_or_init(|| (self.0.init)())
    }

    /// Returns `true` once the initializer has run.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.0.cell.get().is_some()
    }
}

impl fmt::Debug for LazyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.cell.get() {
            Some(descriptor) => write!(f, "Lazy({})", descriptor.serial_name()),
            None => f.write_str("Lazy(<unresolved>)"),
        }
    }
}

// -----------------------------------------------------------------------------
// ElementDescriptor

#[derive(Clone, Debug)]
pub(crate) enum ElementDescriptor {
    Eager(SerialDescriptor),
    Lazy(LazyDescriptor),
}

impl ElementDescriptor {
    #[inline]
    pub(crate) fn get(&self) -> &SerialDescriptor {
        match self {
            Self::Eager(descriptor) => descriptor,
            Self::Lazy(lazy) => lazy.get(),
        }
    }
}

// -----------------------------------------------------------------------------
// ElementInfo

/// Information for one element of a record descriptor.
#[derive(Clone)]
pub struct ElementInfo {
    pub(crate) name: Cow<'static, str>,
    pub(crate) descriptor: ElementDescriptor,
    pub(crate) annotations: Annotations,
    pub(crate) optional: bool,
}

impl ElementInfo {
    pub(crate) fn new(name: Cow<'static, str>, descriptor: ElementDescriptor) -> Self {
        Self {
            name,
            descriptor,
            annotations: Annotations::new(),
            optional: false,
        }
    }

    /// Returns the element name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the element's descriptor, resolving it if it is lazy.
    #[inline]
    pub fn descriptor(&self) -> &SerialDescriptor {
        self.descriptor.get()
    }

    /// Returns the annotations attached to this element.
    #[inline]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Returns `true` if the element may be absent from the input.
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

impl fmt::Debug for ElementInfo {
    // Only the element's serial name is printed, recursive types stay finite.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ElementInfo");
        debug.field("name", &self.name);
        match &self.descriptor {
            ElementDescriptor::Eager(descriptor) => {
                debug.field("descriptor", &descriptor.serial_name())
            }
            ElementDescriptor::Lazy(lazy) => debug.field("descriptor", lazy),
        };
        debug
            .field("annotations", &self.annotations)
            .field("optional", &self.optional)
            .finish()
    }
}

use alloc::borrow::Cow;
use core::fmt;

use crate::SerialError;
use crate::registry::FactoryContext;
use crate::ser::SharedSerializer;

/// Builds the serializer of a user type from the serializers of its type arguments.
///
/// The resolver checks the arity before calling, so `args` always holds exactly
/// [`UserTypeEntry::arity`] serializers, in declaration order.
pub type UserTypeFactory =
    fn(cx: &FactoryContext<'_>, args: &[SharedSerializer]) -> Result<SharedSerializer, SerialError>;

/// A registered user type.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_serial::SerialError;
/// use vc_serial::descriptor::PrimitiveKind;
/// use vc_serial::registry::{FactoryContext, SerialRegistry, UserTypeEntry};
/// use vc_serial::ser::{RecordSerializerBuilder, SharedSerializer, primitive_serializer};
///
/// fn meters(_: &FactoryContext<'_>, _: &[SharedSerializer]) -> Result<SharedSerializer, SerialError> {
///     Ok(Arc::new(
///         RecordSerializerBuilder::new("Meters")
///             .field("value", primitive_serializer(PrimitiveKind::F64))
///             .build(),
///     ))
/// }
///
/// let mut registry = SerialRegistry::new();
/// assert!(registry.register(UserTypeEntry::new("Meters", 0, meters)));
/// assert!(registry.contains("Meters"));
/// ```
#[derive(Clone)]
pub struct UserTypeEntry {
    name: Cow<'static, str>,
    arity: usize,
    factory: UserTypeFactory,
}

impl UserTypeEntry {
    /// Creates an entry; usable in constant context.
    #[inline]
    pub const fn new(name: &'static str, arity: usize, factory: UserTypeFactory) -> Self {
        Self {
            name: Cow::Borrowed(name),
            arity,
            factory,
        }
    }

    /// Creates an entry with a name only known at runtime.
    #[inline]
    pub fn with_name(
        name: impl Into<Cow<'static, str>>,
        arity: usize,
        factory: UserTypeFactory,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            factory,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of type arguments the type takes.
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    #[inline]
    pub fn factory(&self) -> UserTypeFactory {
        self.factory
    }

    #[inline]
    pub(crate) fn into_key(self) -> (Cow<'static, str>, Self) {
        (self.name.clone(), self)
    }
}

impl fmt::Debug for UserTypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserTypeEntry")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(UserTypeEntry);

/// Submits a [`UserTypeEntry`] for [`SerialRegistry::auto_register`].
///
/// Expands to nothing when the `auto_register` feature is disabled.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_serial::{SerialError, impl_auto_register};
/// use vc_serial::descriptor::PrimitiveKind;
/// use vc_serial::registry::{FactoryContext, SerialRegistry};
/// use vc_serial::ser::{RecordSerializerBuilder, SharedSerializer, primitive_serializer};
///
/// fn celsius(_: &FactoryContext<'_>, _: &[SharedSerializer]) -> Result<SharedSerializer, SerialError> {
///     Ok(Arc::new(
///         RecordSerializerBuilder::new("Celsius")
///             .field("degrees", primitive_serializer(PrimitiveKind::F32))
///             .build(),
///     ))
/// }
///
/// impl_auto_register!("Celsius", 0, celsius);
///
/// let mut registry = SerialRegistry::new();
/// if registry.auto_register() {
///     assert!(registry.contains("Celsius"));
/// }
/// ```
///
/// [`SerialRegistry::auto_register`]: crate::registry::SerialRegistry::auto_register
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! impl_auto_register {
    ($name:expr, $arity:expr, $factory:expr $(,)?) => {
        const _: () = {
            $crate::__macro_exports::inventory::submit! {
                $crate::registry::UserTypeEntry::new($name, $arity, $factory)
            }
        };
    };
}

/// Submits a [`UserTypeEntry`] for [`SerialRegistry::auto_register`].
///
/// Expands to nothing when the `auto_register` feature is disabled.
///
/// [`SerialRegistry::auto_register`]: crate::registry::SerialRegistry::auto_register
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! impl_auto_register {
    ($name:expr, $arity:expr, $factory:expr $(,)?) => {};
}

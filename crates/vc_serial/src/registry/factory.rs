use alloc::sync::Arc;

use crate::SerialError;
use crate::registry::{LazySerializer, SerialRegistry};
use crate::resolve::{TypeDesc, resolve_in};
use crate::ser::SharedSerializer;

/// What a [`UserTypeFactory`](crate::registry::UserTypeFactory) sees while it
/// builds a serializer.
///
/// Factories of recursive types must not [`resolve`](Self::resolve) themselves;
/// they reference their own type through [`lazy`](Self::lazy) instead.
#[derive(Clone, Copy)]
pub struct FactoryContext<'a> {
    registry: &'a Arc<SerialRegistry>,
    ty: &'a TypeDesc,
}

impl<'a> FactoryContext<'a> {
    #[inline]
    pub(crate) fn new(registry: &'a Arc<SerialRegistry>, ty: &'a TypeDesc) -> Self {
        Self { registry, ty }
    }

    #[inline]
    pub fn registry(&self) -> &'a Arc<SerialRegistry> {
        self.registry
    }

    /// The type being built.
    #[inline]
    pub fn ty(&self) -> &'a TypeDesc {
        self.ty
    }

    /// Type arguments of the type being built, empty for non-generic types.
    #[inline]
    pub fn type_arguments(&self) -> &'a [TypeDesc] {
        match self.ty {
            TypeDesc::User { args, .. } => args,
            _ => &[],
        }
    }

    /// Returns a serializer of `ty` resolved on first use.
    #[inline]
    pub fn lazy(&self, ty: TypeDesc) -> LazySerializer {
        LazySerializer::new(self.registry.clone(), ty)
    }

    /// Resolves `ty` now, against the same registry.
    #[inline]
    pub fn resolve(&self, ty: &TypeDesc) -> Result<SharedSerializer, SerialError> {
        resolve_in(self.registry, ty)
    }
}

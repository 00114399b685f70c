use alloc::boxed::Box;
use alloc::sync::Arc;
use std::sync::OnceLock;

use serde_core::{Serialize, Serializer};

use crate::descriptor::SerialDescriptor;
use crate::registry::SerialRegistry;
use crate::resolve::{TypeDesc, resolve_in};
use crate::ser::{SharedSerializer, ValueSerializer, de_error, ser_error};
use crate::{SerialError, Value};

/// A serializer resolved on first use.
///
/// Recursive types reference themselves through a `LazySerializer`: the factory
/// of `Tree` builds its `children` field from `List<Tree>` without resolving
/// `Tree` again while it is still being built.
///
/// Clones share the resolved serializer. A failed resolution is retried on the
/// next use and reported each time.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_serial::{SerialRegistry, TypeDesc};
/// use vc_serial::registry::LazySerializer;
///
/// let lazy = LazySerializer::new(Arc::new(SerialRegistry::new()), TypeDesc::list(TypeDesc::BOOL));
/// assert_eq!(lazy.get().unwrap().descriptor().serial_name(), "List");
///
/// let missing = LazySerializer::new(Arc::new(SerialRegistry::new()), TypeDesc::user("Nope", []));
/// assert!(missing.get().is_err());
/// ```
#[derive(Clone)]
pub struct LazySerializer {
    registry: Arc<SerialRegistry>,
    ty: TypeDesc,
    cell: Arc<OnceLock<SharedSerializer>>,
}

impl LazySerializer {
    pub fn new(registry: Arc<SerialRegistry>, ty: TypeDesc) -> Self {
        Self {
            registry,
            ty,
            cell: Arc::new(OnceLock::new()),
        }
    }

    #[inline]
    pub fn ty(&self) -> &TypeDesc {
        &self.ty
    }

    /// Returns `true` once the serializer has been resolved.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Resolves the serializer if needed and returns it.
    pub fn get(&self) -> Result<&SharedSerializer, SerialError> {
        if let Some(serializer) = self.cell.get() {
            return Ok(serializer);
        }
        log::debug!("resolving lazy serializer of `{}`", self.ty);
        let resolved = resolve_in(&self.registry, &self.ty)?;
        // Another thread may have won the race; either result is equivalent.
        Ok(self.cell.get_or_init(|| resolved))
    }
}

struct ErrorView {
    error: SerialError,
}

impl Serialize for ErrorView {
    fn serialize<S: Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
        Err(ser_error(&self.error))
    }
}

impl ValueSerializer for LazySerializer {
    /// # Panics
    ///
    /// Panics if the type cannot be resolved.
    fn descriptor(&self) -> &SerialDescriptor {
        match self.get() {
            Ok(serializer) => serializer.descriptor(),
            Err(err) => panic!("cannot describe `{}`: {err}", self.ty),
        }
    }

    #[inline]
    fn try_descriptor(&self) -> Option<&SerialDescriptor> {
        self.get().ok().map(|serializer| serializer.descriptor())
    }

    fn encode<'a>(&'a self, value: &'a Value) -> Box<dyn erased_serde::Serialize + 'a> {
        match self.get() {
            Ok(serializer) => serializer.encode(value),
            Err(error) => Box::new(ErrorView { error }),
        }
    }

    fn decode<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error> {
        match self.get() {
            Ok(serializer) => serializer.decode(deserializer),
            Err(err) => Err(de_error(err)),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::sync::Arc;

    use super::LazySerializer;
    use crate::registry::SerialRegistry;
    use crate::resolve::TypeDesc;
    use crate::ser::SharedSerializer;
    use crate::test_utils::{from_json, to_json};
    use crate::{SerialError, Value};

    #[test]
    fn resolves_once_and_shares_between_clones() {
        let lazy = LazySerializer::new(Arc::new(SerialRegistry::new()), TypeDesc::I16);
        let other = lazy.clone();
        assert!(!other.is_resolved());

        let first = lazy.get().unwrap().clone();
        assert!(other.is_resolved());
        assert!(Arc::ptr_eq(&first, other.get().unwrap()));
    }

    #[test]
    fn unresolvable_type_surfaces_on_use() {
        let registry = Arc::new(SerialRegistry::new());
        let lazy = LazySerializer::new(registry, TypeDesc::user("Ghost", []));
        assert_eq!(
            lazy.get().err(),
            Some(SerialError::NoSerializer { ty: "Ghost".into() })
        );

        let shared: SharedSerializer = Arc::new(lazy);
        assert!(shared.try_descriptor().is_none());

        let err = to_json(&shared, &Value::I32(1)).unwrap_err().to_string();
        assert!(err.contains("no serializer found for type `Ghost`"), "{err}");

        let err = from_json(&shared, "1").unwrap_err().to_string();
        assert!(err.contains("no serializer found for type `Ghost`"), "{err}");
    }

    #[test]
    fn delegates_encoding() {
        let lazy: SharedSerializer = Arc::new(LazySerializer::new(
            Arc::new(SerialRegistry::new()),
            TypeDesc::nullable(TypeDesc::STRING),
        ));
        assert_eq!(lazy.descriptor().serial_name(), "String?");
        assert_eq!(to_json(&lazy, &Value::Null).unwrap(), "null");
        assert_eq!(from_json(&lazy, r#""hi""#).unwrap(), Value::from("hi"));
    }
}

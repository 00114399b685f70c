use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::{PoisonError, RwLock};

use hashbrown::HashMap;

use crate::SerialError;
use crate::collections::FixedHashState;
use crate::registry::{FactoryContext, SerialRegistry};
use crate::resolve::{SerialType, TypeDesc};
use crate::ser::{
    ArraySerializer, ListSerializer, MapSerializer, NullableSerializer,
    PrimitiveArraySerializer, SetSerializer, SharedSerializer, primitive_serializer,
};

// -----------------------------------------------------------------------------
// resolve_in

/// Resolves `ty` against `registry`, without caching.
pub(crate) fn resolve_in(
    registry: &Arc<SerialRegistry>,
    ty: &TypeDesc,
) -> Result<SharedSerializer, SerialError> {
    log::trace!("resolving `{ty}`");

    let serializer: SharedSerializer = match ty {
        TypeDesc::Primitive(kind) => primitive_serializer(*kind),
        TypeDesc::Nullable(inner) => NullableSerializer::wrap(resolve_in(registry, inner)?),
        TypeDesc::Array(element) => match &**element {
            TypeDesc::Primitive(kind) => match PrimitiveArraySerializer::new(*kind) {
                Some(array) => Arc::new(array),
                None => Arc::new(ArraySerializer::new(primitive_serializer(*kind))),
            },
            element => Arc::new(ArraySerializer::new(resolve_in(registry, element)?)),
        },
        TypeDesc::List(element) => Arc::new(ListSerializer::new(resolve_in(registry, element)?)),
        TypeDesc::Set(element) => Arc::new(SetSerializer::new(resolve_in(registry, element)?)),
        TypeDesc::Map(key, value) => Arc::new(MapSerializer::new(
            resolve_in(registry, key)?,
            resolve_in(registry, value)?,
        )),
        TypeDesc::User { name, args } => {
            let Some(entry) = registry.get(name) else {
                return Err(SerialError::NoSerializer { ty: ty.to_string() });
            };
            if entry.arity() != args.len() {
                return Err(SerialError::ArityMismatch {
                    ty: name.to_string(),
                    expected: entry.arity(),
                    found: args.len(),
                });
            }
            let args = args
                .iter()
                .map(|arg| resolve_in(registry, arg))
                .collect::<Result<Vec<_>, _>>()?;
            (entry.factory())(&FactoryContext::new(registry, ty), &args)?
        }
        TypeDesc::Opaque(_) => return Err(SerialError::NoSerializer { ty: ty.to_string() }),
    };

    Ok(serializer)
}

// -----------------------------------------------------------------------------
// Resolver

/// Resolves [`TypeDesc`]s into serializers.
///
/// Resolution is deterministic: resolving the same description twice yields
/// serializers with equal descriptors. Without a cache, every call builds new
/// container serializers; with [`with_cache`](Self::with_cache), the first
/// complete serializer of each description is reused.
///
/// # Examples
///
/// ```
/// use vc_serial::{Resolver, SerialError, SerialRegistry, TypeDesc, Value};
///
/// let resolver = Resolver::with_cache(SerialRegistry::new());
///
/// let names = resolver.serializer::<Vec<Option<String>>>().unwrap();
/// assert_eq!(names.descriptor().serial_name(), "List");
///
/// let value = Value::from(vec![Some("a"), None]);
/// let json = serde_json::to_string(&names.serialize_with(&value)).unwrap();
/// assert_eq!(json, r#"["a",null]"#);
///
/// let err = resolver.resolve(&TypeDesc::opaque("Socket")).err().unwrap();
/// assert_eq!(err.to_string(), "no serializer found for type `Socket`");
/// ```
pub struct Resolver {
    registry: Arc<SerialRegistry>,
    cache: Option<RwLock<HashMap<TypeDesc, SharedSerializer, FixedHashState>>>,
}

impl Resolver {
    /// Creates a resolver without cache.
    pub fn new(registry: impl Into<Arc<SerialRegistry>>) -> Self {
        Self {
            registry: registry.into(),
            cache: None,
        }
    }

    /// Creates a resolver remembering every serializer it resolved.
    pub fn with_cache(registry: impl Into<Arc<SerialRegistry>>) -> Self {
        Self {
            registry: registry.into(),
            cache: Some(RwLock::new(HashMap::with_hasher(FixedHashState))),
        }
    }

    #[inline]
    pub fn registry(&self) -> &Arc<SerialRegistry> {
        &self.registry
    }

    /// Resolves the serializer of `ty`.
    ///
    /// # Errors
    ///
    /// - [`SerialError::NoSerializer`] for opaque types and user types missing from
    ///   the registry, naming the type.
    /// - [`SerialError::ArityMismatch`] when a user type is applied to the wrong
    ///   number of type arguments.
    /// - Any error returned by a user type factory.
    pub fn resolve(&self, ty: &TypeDesc) -> Result<SharedSerializer, SerialError> {
        let Some(cache) = &self.cache else {
            return resolve_in(&self.registry, ty);
        };

        if let Some(found) = cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ty)
        {
            return Ok(found.clone());
        }

        // Built outside the lock: factories may resolve other types.
        let serializer = resolve_in(&self.registry, ty)?;

        let mut cache = cache.write().unwrap_or_else(PoisonError::into_inner);
        let serializer = cache
            .entry(ty.clone())
            .or_insert_with(|| {
                log::debug!("caching serializer of `{ty}`");
                serializer
            })
            .clone();
        Ok(serializer)
    }

    /// Resolves the serializer of the Rust type `T`.
    #[inline]
    pub fn serializer<T: SerialType>(&self) -> Result<SharedSerializer, SerialError> {
        self.resolve(&T::type_desc())
    }

    /// Number of cached serializers, always zero without cache.
    pub fn cached(&self) -> usize {
        match &self.cache {
            Some(cache) => cache.read().unwrap_or_else(PoisonError::into_inner).len(),
            None => 0,
        }
    }
}

impl core::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Resolver")
            .field("registry", &self.registry)
            .field("cached", &self.cached())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::Resolver;
    use crate::registry::{FactoryContext, SerialRegistry, UserTypeEntry};
    use crate::resolve::TypeDesc;
    use crate::ser::{RecordSerializerBuilder, SharedSerializer};
    use crate::test_utils::{from_json, from_ron, to_json, to_ron};
    use crate::value::{PrimitiveArray, Record};
    use crate::{SerialError, Value};

    fn boxed(
        _: &FactoryContext<'_>,
        args: &[SharedSerializer],
    ) -> Result<SharedSerializer, SerialError> {
        Ok(Arc::new(
            RecordSerializerBuilder::new("Box")
                .type_argument(args[0].descriptor().clone())
                .field("boxed", args[0].clone())
                .build(),
        ))
    }

    fn tree(
        cx: &FactoryContext<'_>,
        _: &[SharedSerializer],
    ) -> Result<SharedSerializer, SerialError> {
        Ok(Arc::new(
            RecordSerializerBuilder::new("Tree")
                .field("value", cx.resolve(&TypeDesc::I32)?)
                .lazy_field("children", cx.lazy(TypeDesc::list(TypeDesc::user("Tree", []))))
                .default_value(Value::List(vec![]))
                .build(),
        ))
    }

    fn registry() -> SerialRegistry {
        let mut registry = SerialRegistry::new();
        registry.register(UserTypeEntry::new("Box", 1, boxed));
        registry.register(UserTypeEntry::new("Tree", 0, tree));
        registry
    }

    fn boxed_ty(inner: TypeDesc) -> TypeDesc {
        TypeDesc::user("Box", [inner])
    }

    fn boxed_value(inner: Value) -> Value {
        Value::Record(Record::new().with_field("boxed", inner))
    }

    #[test]
    fn primitives_are_singletons() {
        let resolver = Resolver::new(SerialRegistry::new());
        let a = resolver.resolve(&TypeDesc::F32).unwrap();
        let b = resolver.resolve(&TypeDesc::F32).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn independent_resolutions_have_equal_descriptors() {
        let resolver = Resolver::new(registry());
        let ty = TypeDesc::map(TypeDesc::STRING, boxed_ty(TypeDesc::set(TypeDesc::CHAR)));

        let a = resolver.resolve(&ty).unwrap();
        let b = resolver.resolve(&ty).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.descriptor(), b.descriptor());
        assert_eq!(a.descriptor().to_string(), b.descriptor().to_string());
    }

    #[test]
    fn box_of_primitive() {
        let resolver = Resolver::new(registry());
        let serializer = resolver.resolve(&boxed_ty(TypeDesc::STRING)).unwrap();

        let descriptor = serializer.descriptor();
        assert_eq!(descriptor.serial_name(), "Box");
        assert_eq!(descriptor.type_arguments()[0].serial_name(), "String");

        let value = boxed_value(Value::from("hi"));
        let json = to_json(&serializer, &value).unwrap();
        assert_eq!(json, r#"{"boxed":"hi"}"#);
        assert_eq!(from_json(&serializer, &json).unwrap(), value);
    }

    #[test]
    fn box_three_levels_deep() {
        let resolver = Resolver::new(registry());
        let ty = boxed_ty(boxed_ty(boxed_ty(TypeDesc::I32)));
        let serializer = resolver.resolve(&ty).unwrap();

        let value = boxed_value(boxed_value(boxed_value(Value::I32(42))));
        let json = to_json(&serializer, &value).unwrap();
        assert_eq!(json, r#"{"boxed":{"boxed":{"boxed":42}}}"#);
        assert_eq!(from_json(&serializer, &json).unwrap(), value);

        let ron = to_ron(&serializer, &value).unwrap();
        assert_eq!(from_ron(&serializer, &ron).unwrap(), value);

        let innermost = serializer
            .descriptor()
            .element_descriptor(0)
            .element_descriptor(0)
            .element_descriptor(0);
        assert_eq!(innermost.serial_name(), "i32");
    }

    #[test]
    fn arrays_of_primitives_are_dense() {
        let resolver = Resolver::new(SerialRegistry::new());

        let serializer = resolver.resolve(&TypeDesc::array(TypeDesc::I64)).unwrap();
        assert_eq!(serializer.descriptor().serial_name(), "I64Array");
        assert_eq!(
            from_json(&serializer, "[1,2]").unwrap(),
            Value::PrimitiveArray(PrimitiveArray::I64(vec![1_i64, 2].into_boxed_slice()))
        );

        let serializer = resolver.resolve(&TypeDesc::array(TypeDesc::STRING)).unwrap();
        assert_eq!(serializer.descriptor().serial_name(), "Array");
        let decoded = from_json(&serializer, r#"["x"]"#).unwrap();
        assert_eq!(decoded.as_array(), Some(&[Value::from("x")][..]));
        assert_eq!(decoded.as_list(), None);
    }

    #[test]
    fn nullable_of_every_shape() {
        let resolver = Resolver::new(registry());
        let shapes = [
            (TypeDesc::BOOL, Value::Bool(true)),
            (TypeDesc::list(TypeDesc::I8), Value::from(vec![1_i8, 2])),
            (boxed_ty(TypeDesc::CHAR), boxed_value(Value::Char('q'))),
            (
                TypeDesc::map(TypeDesc::STRING, TypeDesc::F64),
                Value::Map([(Value::from("k"), Value::F64(0.5))].into_iter().collect()),
            ),
            (
                TypeDesc::set(TypeDesc::STRING),
                Value::Set([Value::from("a"), Value::from("b")].into_iter().collect()),
            ),
            (
                TypeDesc::array(TypeDesc::STRING),
                Value::Array(vec![Value::from("z")].into_boxed_slice()),
            ),
            (
                TypeDesc::array(TypeDesc::I16),
                Value::PrimitiveArray(PrimitiveArray::I16(vec![7_i16, -7].into_boxed_slice())),
            ),
        ];
        for (ty, value) in shapes {
            let serializer = resolver.resolve(&TypeDesc::nullable(ty)).unwrap();
            assert!(serializer.descriptor().is_nullable());

            for value in [Value::Null, value.clone()] {
                let json = to_json(&serializer, &value).unwrap();
                assert_eq!(from_json(&serializer, &json).unwrap(), value);
                let ron = to_ron(&serializer, &value).unwrap();
                assert_eq!(from_ron(&serializer, &ron).unwrap(), value);
            }
        }
    }

    #[test]
    fn recursive_tree() {
        let resolver = Resolver::new(registry());
        let serializer = resolver.resolve(&TypeDesc::user("Tree", [])).unwrap();

        let leaf = |value: i32| {
            Value::Record(
                Record::new()
                    .with_field("value", value)
                    .with_field("children", Value::List(vec![])),
            )
        };
        let value = Value::Record(
            Record::new()
                .with_field("value", 1)
                .with_field("children", Value::List(vec![leaf(2), leaf(3)])),
        );

        let json = to_json(&serializer, &value).unwrap();
        assert_eq!(
            json,
            r#"{"value":1,"children":[{"value":2,"children":[]},{"value":3,"children":[]}]}"#
        );
        assert_eq!(from_json(&serializer, &json).unwrap(), value);
        assert_eq!(
            from_json(&serializer, r#"{"value":1,"children":[{"value":2},{"value":3}]}"#).unwrap(),
            value
        );

        let descriptor = serializer.descriptor();
        let children = descriptor.element_descriptor(1);
        assert_eq!(children.serial_name(), "List");
        assert_eq!(children.element_descriptor(0).serial_name(), "Tree");
        assert_eq!(children.element_descriptor(0).element_name(1), "children");
    }

    #[test]
    fn unknown_and_opaque_types_are_named() {
        let resolver = Resolver::new(registry());

        let err = resolver.resolve(&TypeDesc::list(TypeDesc::user("Missing", []))).err();
        assert_eq!(err, Some(SerialError::NoSerializer { ty: "Missing".into() }));

        let err = resolver.resolve(&TypeDesc::opaque("Mutex<i32>")).err().unwrap();
        assert_eq!(err.to_string(), "no serializer found for type `Mutex<i32>`");

        let err = resolver.resolve(&TypeDesc::user("Gadget", [TypeDesc::I8])).err().unwrap();
        assert_eq!(err.to_string(), "no serializer found for type `Gadget<i8>`");
    }

    #[test]
    fn arity_is_checked() {
        let resolver = Resolver::new(registry());
        let err = resolver
            .resolve(&TypeDesc::user("Box", [TypeDesc::I8, TypeDesc::I16]))
            .err();
        assert_eq!(
            err,
            Some(SerialError::ArityMismatch {
                ty: "Box".into(),
                expected: 1,
                found: 2,
            })
        );
    }

    #[test]
    fn cache_returns_the_same_instance() {
        let resolver = Resolver::with_cache(registry());
        let ty = TypeDesc::list(boxed_ty(TypeDesc::I16));

        let a = resolver.resolve(&ty).unwrap();
        let b = resolver.resolve(&ty).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(resolver.cached(), 1);

        assert!(resolver.resolve(&TypeDesc::opaque("Nope")).is_err());
        assert_eq!(resolver.cached(), 1);

        let uncached = Resolver::new(registry());
        assert_eq!(uncached.cached(), 0);
    }

    #[test]
    fn reified_lookup() {
        let resolver = Resolver::new(SerialRegistry::new());
        let serializer = resolver.serializer::<Vec<Option<i32>>>().unwrap();

        let value = Value::from(vec![Some(1), None]);
        assert_eq!(to_json(&serializer, &value).unwrap(), "[1,null]");
    }
}

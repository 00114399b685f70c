use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::string::String;
use alloc::vec::Vec;
use std::collections::{HashMap, HashSet};

use crate::collections::{OrderedMap, OrderedSet};
use crate::resolve::TypeDesc;

/// A Rust type with a known [`TypeDesc`].
///
/// Implemented for the primitives, `String`, `Option` and the standard containers,
/// so that [`Resolver::serializer`](crate::Resolver::serializer) can look up a
/// serializer from a type parameter.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use vc_serial::{SerialType, TypeDesc};
///
/// assert_eq!(<[bool; 4]>::type_desc(), TypeDesc::array(TypeDesc::BOOL));
/// assert_eq!(
///     <BTreeMap<String, Vec<f32>>>::type_desc().to_string(),
///     "Map<String, List<f32>>",
/// );
/// ```
///
/// User types implement it with [`TypeDesc::user`]:
///
/// ```
/// use vc_serial::{SerialType, TypeDesc};
///
/// struct Pair<A, B>(A, B);
///
/// impl<A: SerialType, B: SerialType> SerialType for Pair<A, B> {
///     fn type_desc() -> TypeDesc {
///         TypeDesc::user("Pair", [A::type_desc(), B::type_desc()])
///     }
/// }
///
/// assert_eq!(TypeDesc::of::<Pair<i8, char>>().to_string(), "Pair<i8, char>");
/// ```
pub trait SerialType {
    fn type_desc() -> TypeDesc;
}

macro_rules! impl_primitive {
    ($($ty:ty => $desc:ident),* $(,)?) => {
        $(
            impl SerialType for $ty {
                #[inline]
                fn type_desc() -> TypeDesc {
                    TypeDesc::$desc
                }
            }
        )*
    };
}

impl_primitive! {
    String => STRING,
    char => CHAR,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    bool => BOOL,
}

impl<T: SerialType> SerialType for Option<T> {
    #[inline]
    fn type_desc() -> TypeDesc {
        TypeDesc::nullable(T::type_desc())
    }
}

impl<T: SerialType> SerialType for Box<[T]> {
    #[inline]
    fn type_desc() -> TypeDesc {
        TypeDesc::array(T::type_desc())
    }
}

impl<T: SerialType, const N: usize> SerialType for [T; N] {
    #[inline]
    fn type_desc() -> TypeDesc {
        TypeDesc::array(T::type_desc())
    }
}

macro_rules! impl_container {
    ($ctor:ident: $($ty:ident<$t:ident $(, $s:ident)?>),* $(,)?) => {
        $(
            impl<$t: SerialType $(, $s)?> SerialType for $ty<$t $(, $s)?> {
                #[inline]
                fn type_desc() -> TypeDesc {
                    TypeDesc::$ctor($t::type_desc())
                }
            }
        )*
    };
}

impl_container!(list: Vec<T>, VecDeque<T>);
impl_container!(set: OrderedSet<T>, BTreeSet<T>, HashSet<T, S>);

macro_rules! impl_map {
    ($($ty:ident<K, V $(, $s:ident)?>),* $(,)?) => {
        $(
            impl<K: SerialType, V: SerialType $(, $s)?> SerialType for $ty<K, V $(, $s)?> {
                #[inline]
                fn type_desc() -> TypeDesc {
                    TypeDesc::map(K::type_desc(), V::type_desc())
                }
            }
        )*
    };
}

impl_map!(OrderedMap<K, V>, BTreeMap<K, V>, HashMap<K, V, S>);

impl<T: SerialType, S> SerialType for hashbrown::HashSet<T, S> {
    #[inline]
    fn type_desc() -> TypeDesc {
        TypeDesc::set(T::type_desc())
    }
}

impl<K: SerialType, V: SerialType, S> SerialType for hashbrown::HashMap<K, V, S> {
    #[inline]
    fn type_desc() -> TypeDesc {
        TypeDesc::map(K::type_desc(), V::type_desc())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::collections::OrderedSet;
    use crate::resolve::TypeDesc;

    #[test]
    fn nested_std_types() {
        assert_eq!(TypeDesc::of::<Option<String>>(), TypeDesc::nullable(TypeDesc::STRING));
        assert_eq!(TypeDesc::of::<VecDeque<i8>>(), TypeDesc::list(TypeDesc::I8));
        assert_eq!(
            TypeDesc::of::<Vec<OrderedSet<bool>>>(),
            TypeDesc::list(TypeDesc::set(TypeDesc::BOOL))
        );
        assert_eq!(
            TypeDesc::of::<std::collections::HashMap<i32, Option<f64>>>(),
            TypeDesc::map(TypeDesc::I32, TypeDesc::nullable(TypeDesc::F64))
        );
    }
}

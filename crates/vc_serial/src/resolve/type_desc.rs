use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::descriptor::PrimitiveKind;
use crate::resolve::SerialType;

/// A structural description of a type, the input of resolution.
///
/// Two structurally equal descriptions resolve to serializers with equal
/// descriptors.
///
/// # Examples
///
/// ```
/// use vc_serial::TypeDesc;
///
/// let ty = TypeDesc::map(TypeDesc::STRING, TypeDesc::list(TypeDesc::nullable(TypeDesc::I32)));
/// assert_eq!(ty.to_string(), "Map<String, List<Option<i32>>>");
///
/// let boxed = TypeDesc::user("Box", [TypeDesc::STRING]);
/// assert_eq!(boxed.to_string(), "Box<String>");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    Primitive(PrimitiveKind),
    Nullable(Box<TypeDesc>),
    /// A fixed-length array.
    Array(Box<TypeDesc>),
    List(Box<TypeDesc>),
    Set(Box<TypeDesc>),
    Map(Box<TypeDesc>, Box<TypeDesc>),
    /// A type registered by name in a [`SerialRegistry`](crate::SerialRegistry),
    /// with its type arguments.
    User {
        name: Cow<'static, str>,
        args: Vec<TypeDesc>,
    },
    /// A type known to have no serializer, such as a closure or a handle.
    Opaque(Cow<'static, str>),
}

impl TypeDesc {
    pub const STRING: Self = Self::Primitive(PrimitiveKind::String);
    pub const CHAR: Self = Self::Primitive(PrimitiveKind::Char);
    pub const I8: Self = Self::Primitive(PrimitiveKind::I8);
    pub const I16: Self = Self::Primitive(PrimitiveKind::I16);
    pub const I32: Self = Self::Primitive(PrimitiveKind::I32);
    pub const I64: Self = Self::Primitive(PrimitiveKind::I64);
    pub const F32: Self = Self::Primitive(PrimitiveKind::F32);
    pub const F64: Self = Self::Primitive(PrimitiveKind::F64);
    pub const BOOL: Self = Self::Primitive(PrimitiveKind::Bool);

    #[inline]
    pub fn nullable(inner: TypeDesc) -> Self {
        Self::Nullable(Box::new(inner))
    }

    #[inline]
    pub fn array(element: TypeDesc) -> Self {
        Self::Array(Box::new(element))
    }

    #[inline]
    pub fn list(element: TypeDesc) -> Self {
        Self::List(Box::new(element))
    }

    #[inline]
    pub fn set(element: TypeDesc) -> Self {
        Self::Set(Box::new(element))
    }

    #[inline]
    pub fn map(key: TypeDesc, value: TypeDesc) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// A registered user type applied to `args`.
    pub fn user(
        name: impl Into<Cow<'static, str>>,
        args: impl IntoIterator<Item = TypeDesc>,
    ) -> Self {
        Self::User {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    #[inline]
    pub fn opaque(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Opaque(name.into())
    }

    /// The description of a Rust type.
    ///
    /// ```
    /// use vc_serial::TypeDesc;
    ///
    /// assert_eq!(TypeDesc::of::<Vec<Option<i64>>>(), TypeDesc::list(TypeDesc::nullable(TypeDesc::I64)));
    /// ```
    #[inline]
    pub fn of<T: SerialType>() -> Self {
        T::type_desc()
    }

    /// Returns `true` for [`TypeDesc::Nullable`].
    #[inline]
    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }
}

impl From<PrimitiveKind> for TypeDesc {
    #[inline]
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[TypeDesc]) -> fmt::Result {
    f.write_str("<")?;
    for (index, arg) in args.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        fmt::Display::fmt(arg, f)?;
    }
    f.write_str(">")
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => f.write_str(kind.serial_name()),
            Self::Nullable(inner) => write!(f, "Option<{inner}>"),
            Self::Array(element) => write!(f, "[{element}]"),
            Self::List(element) => write!(f, "List<{element}>"),
            Self::Set(element) => write!(f, "Set<{element}>"),
            Self::Map(key, value) => write!(f, "Map<{key}, {value}>"),
            Self::User { name, args } => {
                f.write_str(name)?;
                if args.is_empty() {
                    Ok(())
                } else {
                    write_args(f, args)
                }
            }
            Self::Opaque(name) => f.write_str(name),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::TypeDesc;

    #[test]
    fn display_is_rust_like() {
        assert_eq!(TypeDesc::array(TypeDesc::CHAR).to_string(), "[char]");
        assert_eq!(TypeDesc::set(TypeDesc::F64).to_string(), "Set<f64>");
        assert_eq!(
            TypeDesc::user("Pair", [TypeDesc::BOOL, TypeDesc::user("Unit", [])]).to_string(),
            "Pair<bool, Unit>"
        );
        assert_eq!(TypeDesc::opaque("fn()").to_string(), "fn()");
    }

    #[test]
    fn structural_equality() {
        let a = TypeDesc::user("Box", [TypeDesc::list(TypeDesc::I8)]);
        let b = TypeDesc::user(alloc::string::String::from("Box"), [TypeDesc::list(TypeDesc::I8)]);
        assert_eq!(a, b);
        assert_ne!(a, TypeDesc::user("Box", [TypeDesc::list(TypeDesc::I16)]));
        assert!(TypeDesc::nullable(TypeDesc::I8).is_nullable());
    }
}

use core::fmt;

// -----------------------------------------------------------------------------
// PrimitiveKind

/// The closed set of primitive kinds, each backed by a shared serializer singleton.
///
/// # Examples
///
/// ```
/// use vc_serial::descriptor::PrimitiveKind;
///
/// assert_eq!(PrimitiveKind::I32.serial_name(), "i32");
/// assert_eq!(PrimitiveKind::ALL.len(), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Char,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
}

impl PrimitiveKind {
    /// Every primitive kind, in table order.
    pub const ALL: [PrimitiveKind; 9] = [
        Self::String,
        Self::Char,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::F32,
        Self::F64,
        Self::Bool,
    ];

    /// Returns the canonical serial name of this kind.
    pub const fn serial_name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
        }
    }

    /// Position of this kind inside [`PrimitiveKind::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::String => 0,
            Self::Char => 1,
            Self::I8 => 2,
            Self::I16 => 3,
            Self::I32 => 4,
            Self::I64 => 5,
            Self::F32 => 6,
            Self::F64 => 7,
            Self::Bool => 8,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.serial_name())
    }
}

// -----------------------------------------------------------------------------
// SerialKind

/// The structural kind of a [`SerialDescriptor`](crate::descriptor::SerialDescriptor).
///
/// - `Primitive`: a leaf without elements.
/// - `Record`: fixed arity, one element per field.
/// - `List`: a structural list. It reports a single element whose index repeats.
/// - `Map`: alternating key (even index) and value (odd index) elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerialKind {
    Primitive(PrimitiveKind),
    Record,
    List,
    Map,
}

impl SerialKind {
    /// Returns `true` for [`SerialKind::Primitive`].
    #[inline]
    pub const fn is_primitive(self) -> bool {
        matches!(self, Self::Primitive(_))
    }
}

impl fmt::Display for SerialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "primitive({kind})"),
            Self::Record => f.write_str("record"),
            Self::List => f.write_str("list"),
            Self::Map => f.write_str("map"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{PrimitiveKind, SerialKind};

    #[test]
    fn table_order_matches_index() {
        for (position, kind) in PrimitiveKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), position);
        }
    }

    #[test]
    fn only_primitive_kinds_are_primitive() {
        assert!(SerialKind::Primitive(PrimitiveKind::Char).is_primitive());
        assert!(!SerialKind::Record.is_primitive());
        assert!(!SerialKind::List.is_primitive());
        assert!(!SerialKind::Map.is_primitive());
    }
}

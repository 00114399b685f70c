use alloc::borrow::Cow;

use hashbrown::HashMap;

use crate::collections::FixedHashState;
use crate::registry::UserTypeEntry;

/// User types known to the resolver, keyed by serial name.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_serial::{SerialError, SerialRegistry, TypeDesc};
/// use vc_serial::registry::{FactoryContext, UserTypeEntry};
/// use vc_serial::ser::SharedSerializer;
///
/// fn boxed(_: &FactoryContext<'_>, args: &[SharedSerializer]) -> Result<SharedSerializer, SerialError> {
///     Ok(args[0].clone())
/// }
///
/// let mut registry = SerialRegistry::new();
/// assert!(registry.register(UserTypeEntry::new("Box", 1, boxed)));
/// assert!(!registry.register(UserTypeEntry::new("Box", 1, boxed)));
///
/// assert_eq!(registry.get("Box").map(|entry| entry.arity()), Some(1));
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct SerialRegistry {
    entries: HashMap<Cow<'static, str>, UserTypeEntry, FixedHashState>,
}

impl SerialRegistry {
    /// Creates an empty registry.
    ///
    /// Entries submitted with [`impl_auto_register`](crate::impl_auto_register) are
    /// only added by [`auto_register`](Self::auto_register).
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: HashMap::with_hasher(FixedHashState),
        }
    }

    /// Registers `entry`, replacing any entry with the same name.
    ///
    /// Returns `true` if the name was not registered yet.
    pub fn register(&mut self, entry: UserTypeEntry) -> bool {
        let (name, entry) = entry.into_key();
        match self.entries.insert(name, entry) {
            None => true,
            Some(old) => {
                log::warn!("user type `{}` registered twice, the later entry wins", old.name());
                false
            }
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&UserTypeEntry> {
        self.entries.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the registered entries in no particular order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &UserTypeEntry> {
        self.entries.values()
    }

    /// Registers every entry declared through
    /// [`impl_auto_register`](crate::impl_auto_register).
    ///
    /// Names already present keep their current entry, so explicit registrations
    /// take precedence.
    ///
    /// Returns `false` when the `auto_register` feature is disabled, in which case
    /// nothing is registered.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        for entry in inventory::iter::<UserTypeEntry> {
            if !self.contains(entry.name()) {
                self.register(entry.clone());
            }
        }
        cfg!(feature = "auto_register")
    }
}

impl core::fmt::Debug for SerialRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::SerialRegistry;
    use crate::descriptor::PrimitiveKind;
    use crate::registry::{FactoryContext, UserTypeEntry};
    use crate::ser::{SharedSerializer, primitive_serializer};
    use crate::SerialError;

    fn int(
        _: &FactoryContext<'_>,
        _: &[SharedSerializer],
    ) -> Result<SharedSerializer, SerialError> {
        Ok(primitive_serializer(PrimitiveKind::I32))
    }

    fn text(
        _: &FactoryContext<'_>,
        _: &[SharedSerializer],
    ) -> Result<SharedSerializer, SerialError> {
        Ok(primitive_serializer(PrimitiveKind::String))
    }

    crate::impl_auto_register!("AutoInt", 0, int);

    #[test]
    fn later_registration_replaces() {
        let mut registry = SerialRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register(UserTypeEntry::new("Id", 0, int)));
        assert!(!registry.register(UserTypeEntry::new("Id", 2, text)));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Id").map(UserTypeEntry::arity), Some(2));
        assert!(registry.get("Missing").is_none());
    }

    #[test]
    fn runtime_names() {
        let mut registry = SerialRegistry::new();
        let name = alloc::format!("Generated{}", 3);
        registry.register(UserTypeEntry::with_name(name, 0, int));
        assert!(registry.contains("Generated3"));
    }

    #[cfg(feature = "auto_register")]
    #[test]
    fn auto_register_keeps_explicit_entries() {
        let mut registry = SerialRegistry::new();
        assert!(registry.auto_register());
        assert!(registry.contains("AutoInt"));

        let mut registry = SerialRegistry::new();
        registry.register(UserTypeEntry::new("AutoInt", 1, text));
        assert!(registry.auto_register());
        assert_eq!(registry.get("AutoInt").map(UserTypeEntry::arity), Some(1));

        let registry = alloc::sync::Arc::new(registry);
        let entry = registry.get("AutoInt").unwrap();
        let cx = FactoryContext::new(&registry, &crate::TypeDesc::STRING);
        let serializer = (entry.factory())(&cx, &[]).unwrap();
        assert_eq!(serializer.descriptor().serial_name(), "String");
    }

    #[cfg(not(feature = "auto_register"))]
    #[test]
    fn auto_register_disabled() {
        assert!(!SerialRegistry::new().auto_register());
    }
}

use core::fmt::Display;

use crate::descriptor::SerialDescriptor;

#[cfg(all(debug_assertions, feature = "debug"))]
std::thread_local! {
    static DESCRIPTOR_STACK: core::cell::RefCell<alloc::vec::Vec<SerialDescriptor>> =
        const { core::cell::RefCell::new(alloc::vec::Vec::new()) };
}

/// Pops the descriptor pushed by [`enter`] when dropped.
pub(super) struct StackGuard {
    #[cfg(all(debug_assertions, feature = "debug"))]
    pushed: bool,
}

impl Drop for StackGuard {
    #[inline]
    fn drop(&mut self) {
        #[cfg(all(debug_assertions, feature = "debug"))]
        if self.pushed {
            DESCRIPTOR_STACK.with_borrow_mut(|stack| stack.pop());
        }
    }
}

/// Records `descriptor` as being processed until the guard is dropped.
///
/// Only tracked with `debug_assertions` and the `debug` feature.
#[inline]
pub(super) fn enter(descriptor: Option<&SerialDescriptor>) -> StackGuard {
    #[cfg(all(debug_assertions, feature = "debug"))]
    {
        let pushed = descriptor.is_some();
        if let Some(descriptor) = descriptor {
            DESCRIPTOR_STACK.with_borrow_mut(|stack| stack.push(descriptor.clone()));
        }
        StackGuard { pushed }
    }
    #[cfg(not(all(debug_assertions, feature = "debug")))]
    {
        let _ = descriptor;
        StackGuard {}
    }
}

#[cfg(all(debug_assertions, feature = "debug"))]
fn with_stack<R>(msg: impl Display, f: impl FnOnce(core::fmt::Arguments<'_>) -> R) -> R {
    use core::fmt::Write;

    DESCRIPTOR_STACK.with_borrow(|stack| {
        if stack.is_empty() {
            return f(format_args!("{msg}"));
        }
        let mut path = alloc::string::String::new();
        for (index, descriptor) in stack.iter().enumerate() {
            if index > 0 {
                path.push_str(" -> ");
            }
            let _ = path.write_str(descriptor.serial_name());
        }
        f(format_args!("{msg} (while processing: {path})"))
    })
}

/// Creates a serialization error naming the descriptors being processed.
#[cfg(all(debug_assertions, feature = "debug"))]
pub(crate) fn ser_error<E: serde_core::ser::Error>(msg: impl Display) -> E {
    with_stack(msg, |args| E::custom(args))
}

/// Creates a serialization error.
#[cfg(not(all(debug_assertions, feature = "debug")))]
#[inline]
pub(crate) fn ser_error<E: serde_core::ser::Error>(msg: impl Display) -> E {
    E::custom(msg)
}

/// Creates a deserialization error naming the descriptors being processed.
#[cfg(all(debug_assertions, feature = "debug"))]
pub(crate) fn de_error<E: serde_core::de::Error>(msg: impl Display) -> E {
    with_stack(msg, |args| E::custom(args))
}

/// Creates a deserialization error.
#[cfg(not(all(debug_assertions, feature = "debug")))]
#[inline]
pub(crate) fn de_error<E: serde_core::de::Error>(msg: impl Display) -> E {
    E::custom(msg)
}

#[cfg(all(test, debug_assertions, feature = "debug"))]
mod tests {
    use alloc::string::ToString;

    use super::{de_error, enter};
    use crate::descriptor::{PrimitiveKind, SerialDescriptor};

    #[test]
    fn message_carries_stack() {
        let list = SerialDescriptor::list("List", SerialDescriptor::primitive(PrimitiveKind::I8));
        let _outer = enter(Some(&list));
        {
            let _inner = enter(Some(list.element_descriptor(0)));
            let err: serde_json::Error = de_error("bad");
            assert_eq!(err.to_string(), "bad (while processing: List -> i8)");
        }
        let err: serde_json::Error = de_error("bad");
        assert_eq!(err.to_string(), "bad (while processing: List)");
    }
}

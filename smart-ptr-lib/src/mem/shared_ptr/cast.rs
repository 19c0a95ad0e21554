use core::any::Any;

use crate::mem::counter::Counter;

use super::SharedPtr;

/// Runtime-checked conversion of a reference to a more specific type.
///
/// Implement it for the trait objects of a hierarchy, usually through [`Any::downcast_ref`].
pub trait DynamicCast<T: ?Sized> {
    fn dynamic_cast(&self) -> Option<&T>;
}

impl<T: Any> DynamicCast<T> for dyn Any {
    #[inline(always)]
    fn dynamic_cast(&self) -> Option<&T> {
        self.downcast_ref()
    }
}

impl<T: Any> DynamicCast<T> for dyn Any + Send {
    #[inline(always)]
    fn dynamic_cast(&self) -> Option<&T> {
        self.downcast_ref()
    }
}

impl<T: Any> DynamicCast<T> for dyn Any + Send + Sync {
    #[inline(always)]
    fn dynamic_cast(&self) -> Option<&T> {
        self.downcast_ref()
    }
}

/// Checked downcast of a shared pointer.
///
/// On success the result shares the control block of `source` and both report the incremented
/// count. Otherwise, or if `source` is empty, the result is empty and `source` is untouched.
pub fn cast_to<T: ?Sized, U: ?Sized + DynamicCast<T> + 'static, C: Counter>(
    source: &SharedPtr<U, C>,
) -> SharedPtr<T, C> {
    SharedPtr::project(source, <U as DynamicCast<T>>::dynamic_cast)
}

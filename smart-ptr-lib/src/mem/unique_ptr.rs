use core::{
    fmt,
    ops::{Deref, DerefMut},
};

use log::trace;

use super::{counter::Counter, managed::Managed, shared_ptr::SharedPtr};

/// A move-only pointer with a single owner. There is no control block and no count.
///
/// Copying is rejected at compile time:
///
/// ```compile_fail
/// use smart_ptr_lib::mem::unique_ptr::UniquePtr;
///
/// fn copy<T: Clone>(p: &T) -> T {
///     p.clone()
/// }
///
/// let a = UniquePtr::new(1);
/// let b = copy(&a);
/// ```
pub struct UniquePtr<T: ?Sized> {
    object: Option<Box<T>>,
}

impl<T: ?Sized> UniquePtr<T> {
    #[inline(always)]
    pub const fn empty() -> Self {
        Self { object: None }
    }
    pub fn new(value: T) -> Self
    where
        T: Sized,
    {
        Self::from(Box::new(value))
    }
    #[inline(always)]
    pub fn get(&self) -> Option<&T> {
        self.object.as_deref()
    }
    #[inline(always)]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.object.as_deref_mut()
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.object.is_none()
    }
    /// Gives the object to the caller without deleting it and leaves `self` empty.
    #[inline(always)]
    pub fn release(&mut self) -> Option<Box<T>> {
        self.object.take()
    }
    /// Deletes the current object, if any, and takes ownership of `object`.
    pub fn reset(&mut self, object: Option<Box<T>>) {
        *self = Self::from(object);
    }
    /// Moves the value out and leaves `self` empty.
    pub fn take(&mut self) -> Self {
        Self::from(self.release())
    }
    /// Moves the object into a pointer of a related type, e.g. `|b| b as Box<dyn Base>`.
    pub fn map<U: ?Sized>(mut self, f: impl FnOnce(Box<T>) -> Box<U>) -> UniquePtr<U> {
        UniquePtr::from(self.release().map(f))
    }
    /// Moves the object under a new control block. An empty pointer gives an empty `SharedPtr`.
    pub fn into_shared<C: Counter>(mut self) -> SharedPtr<T, C>
    where
        T: Managed<C>,
    {
        SharedPtr::from(self.release())
    }
}

impl<T: ?Sized> From<Box<T>> for UniquePtr<T> {
    #[inline(always)]
    fn from(object: Box<T>) -> Self {
        Self {
            object: Some(object),
        }
    }
}

impl<T: ?Sized> From<Option<Box<T>>> for UniquePtr<T> {
    #[inline(always)]
    fn from(object: Option<Box<T>>) -> Self {
        Self { object }
    }
}

impl<T: ?Sized> Default for UniquePtr<T> {
    #[inline(always)]
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> Deref for UniquePtr<T> {
    type Target = T;
    #[inline(always)]
    fn deref(&self) -> &T {
        match self.get() {
            Some(object) => object,
            None => panic!("dereference of an empty UniquePtr"),
        }
    }
}

impl<T: ?Sized> DerefMut for UniquePtr<T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        match self.get_mut() {
            Some(object) => object,
            None => panic!("dereference of an empty UniquePtr"),
        }
    }
}

impl<T: ?Sized> Drop for UniquePtr<T> {
    fn drop(&mut self) {
        if let Some(object) = self.object.take() {
            trace!("delete unique object {:p}", object);
        }
    }
}

impl<T: ?Sized> fmt::Debug for UniquePtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniquePtr")
            .field("is_empty", &self.is_empty())
            .finish()
    }
}

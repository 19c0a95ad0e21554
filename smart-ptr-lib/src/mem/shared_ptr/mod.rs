pub mod cast;

use core::{fmt, marker::PhantomData, mem::swap, ops::Deref, ptr::NonNull};

use super::{
    atomic_counter::AtomicCounter,
    control_block::{Block, ControlBlock},
    counter::Counter,
    local_counter::LocalCounter,
    managed::Managed,
};

struct Shared<T: ?Sized, C: Counter> {
    object: NonNull<T>,
    control_block: NonNull<ControlBlock<C>>,
}

impl<T: ?Sized, C: Counter> Clone for Shared<T, C> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized, C: Counter> Copy for Shared<T, C> {}

/// A reference-counted pointer to an object shared by several owners.
///
/// The pointer is either empty or holds both a view of the managed object and its
/// [`ControlBlock`]. Cloning increments the count, dropping decrements it, and the owner which
/// brings the count to zero deletes the object and the control block.
///
/// Pointers with different view types may share one control block, see [`SharedPtr::upcast`] and
/// [`cast_to`](cast::cast_to).
///
/// The default counter is not atomic, so the pointer can't be sent to another thread:
///
/// ```compile_fail
/// use smart_ptr_lib::mem::shared_ptr::SharedPtr;
///
/// let p: SharedPtr<i32> = SharedPtr::new(5);
/// std::thread::spawn(move || *p);
/// ```
pub struct SharedPtr<T: ?Sized, C: Counter = LocalCounter> {
    shared: Option<Shared<T, C>>,
    _0: PhantomData<T>,
}

/// A shared pointer with an atomic counter.
pub type SyncSharedPtr<T> = SharedPtr<T, AtomicCounter>;

impl<T: ?Sized, C: Counter> SharedPtr<T, C> {
    #[inline(always)]
    pub const fn empty() -> Self {
        Self {
            shared: None,
            _0: PhantomData,
        }
    }
    pub fn new(value: T) -> Self
    where
        T: Sized + Managed<C>,
    {
        Self::from(Box::new(value))
    }
    #[inline(always)]
    unsafe fn from_shared(shared: Shared<T, C>) -> Self {
        Self {
            shared: Some(shared),
            _0: PhantomData,
        }
    }
    /// Creates a pointer which views `ptr` but shares the control block of `other`.
    ///
    /// The result is empty, and the count is untouched, if `ptr` is null or `other` is empty.
    ///
    /// # Safety
    ///
    /// `ptr` must stay valid for as long as the object managed by `other` is alive.
    pub unsafe fn from_alias<U: ?Sized>(other: &SharedPtr<U, C>, ptr: *const T) -> Self {
        match (other.shared, NonNull::new(ptr as *mut T)) {
            (Some(shared), Some(object)) => {
                shared.control_block.as_ref().increment();
                Self::from_shared(Shared {
                    object,
                    control_block: shared.control_block,
                })
            }
            _ => Self::empty(),
        }
    }
    /// Aliasing construction with a view computed from the object of `other`.
    ///
    /// `None` gives an empty pointer and leaves the count of `other` untouched.
    pub fn project<U: ?Sized + 'static>(
        other: &SharedPtr<U, C>,
        f: impl FnOnce(&U) -> Option<&T>,
    ) -> Self {
        match other.get().and_then(f) {
            Some(object) => unsafe { Self::from_alias(other, object) },
            None => Self::empty(),
        }
    }
    /// A new owner of the same object with another view type, e.g. `|b| b as &dyn Base`.
    pub fn upcast<U: ?Sized>(&self, f: impl FnOnce(&T) -> &U) -> SharedPtr<U, C>
    where
        T: 'static,
    {
        SharedPtr::project(self, |t| Some(f(t)))
    }
    /// Same as [`Self::upcast`] but consumes `self`, so the count doesn't change.
    pub fn map<U: ?Sized>(mut self, f: impl FnOnce(&T) -> &U) -> SharedPtr<U, C>
    where
        T: 'static,
    {
        let object = match self.get() {
            Some(t) => NonNull::from(f(t)),
            None => return SharedPtr::empty(),
        };
        match self.shared.take() {
            Some(shared) => unsafe {
                SharedPtr::from_shared(Shared {
                    object,
                    control_block: shared.control_block,
                })
            },
            None => SharedPtr::empty(),
        }
    }
    #[inline(always)]
    pub fn get(&self) -> Option<&T> {
        self.shared.as_ref().map(|s| unsafe { s.object.as_ref() })
    }
    #[inline(always)]
    pub fn control_block(&self) -> Option<&ControlBlock<C>> {
        self.shared
            .as_ref()
            .map(|s| unsafe { s.control_block.as_ref() })
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.shared.is_none()
    }
    /// The number of owners sharing the control block, `0` for an empty pointer.
    pub fn use_count(&self) -> usize {
        self.control_block().map_or(0, |c| c.read() as usize)
    }
    /// `true` if both pointers share a control block, or both are empty.
    pub fn ptr_eq<U: ?Sized>(&self, other: &SharedPtr<U, C>) -> bool {
        match (self.shared, other.shared) {
            (Some(a), Some(b)) => a.control_block == b.control_block,
            (None, None) => true,
            _ => false,
        }
    }
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        swap(&mut self.shared, &mut other.shared)
    }
    /// Replaces `self` with `rhs`. The previous value of `self` is released when the swapped
    /// temporary drops, so assigning a clone of `self` to itself is a no-op.
    pub fn assign(&mut self, mut rhs: Self) {
        rhs.swap(self);
    }
    /// Moves the value out and leaves `self` empty.
    pub fn take(&mut self) -> Self {
        let mut result = Self::empty();
        result.swap(self);
        result
    }
    pub fn reset(&mut self) {
        self.assign(Self::empty())
    }
}

impl<T: ?Sized + Managed<C>, C: Counter> From<Box<T>> for SharedPtr<T, C> {
    fn from(object: Box<T>) -> Self {
        let (object, control_block) = Block::<T, C>::new(object);
        unsafe {
            Self::from_shared(Shared {
                object,
                control_block,
            })
        }
    }
}

impl<T: ?Sized + Managed<C>, C: Counter> From<Option<Box<T>>> for SharedPtr<T, C> {
    fn from(object: Option<Box<T>>) -> Self {
        object.map_or_else(Self::empty, Self::from)
    }
}

impl<T: ?Sized, C: Counter> Default for SharedPtr<T, C> {
    #[inline(always)]
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized, C: Counter> Clone for SharedPtr<T, C> {
    fn clone(&self) -> Self {
        match self.shared {
            Some(shared) => unsafe {
                shared.control_block.as_ref().increment();
                Self::from_shared(shared)
            },
            None => Self::empty(),
        }
    }
}

impl<T: ?Sized, C: Counter> Drop for SharedPtr<T, C> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            unsafe {
                if shared.control_block.as_ref().decrement() == 0 {
                    ControlBlock::delete(shared.control_block);
                }
            }
        }
    }
}

impl<T: ?Sized, C: Counter> Deref for SharedPtr<T, C> {
    type Target = T;
    #[inline(always)]
    fn deref(&self) -> &T {
        match self.get() {
            Some(object) => object,
            None => panic!("dereference of an empty SharedPtr"),
        }
    }
}

impl<T: ?Sized, C: Counter> fmt::Debug for SharedPtr<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedPtr")
            .field("use_count", &self.use_count())
            .finish()
    }
}

unsafe impl<T: ?Sized + Send + Sync> Send for SharedPtr<T, AtomicCounter> {}

unsafe impl<T: ?Sized + Send + Sync> Sync for SharedPtr<T, AtomicCounter> {}

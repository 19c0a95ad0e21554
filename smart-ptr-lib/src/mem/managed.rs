use super::{atomic_counter::AtomicCounter, counter::Counter, local_counter::LocalCounter};

/// Types which may be owned by a control block with the counter `C`.
///
/// # Safety
///
/// An object owned by an [`AtomicCounter`] block can be dropped on any thread holding the last
/// owner, so the implementation for it requires `Send + Sync`.
pub unsafe trait Managed<C: Counter> {}

unsafe impl<T: ?Sized> Managed<LocalCounter> for T {}

unsafe impl<T: ?Sized + Send + Sync> Managed<AtomicCounter> for T {}

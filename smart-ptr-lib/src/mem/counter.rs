use super::ref_counter_update::RefCounterUpdate;

/// A strong reference counter stored in a [`ControlBlock`](super::control_block::ControlBlock).
///
/// A default counter is `1`: it is created together with its first owner.
///
/// # Safety
///
/// `ref_counter_update` must return the value before the update and must apply `i` exactly once.
/// Shared pointers free the managed object when a `Release` returns `1`, so a wrong result is a
/// double free or a use after free.
pub unsafe trait Counter: Default {
    // required
    fn ref_counter_update(&self, i: RefCounterUpdate) -> isize;
}

/// Aborts if a pointer is cloned while the count is already at `isize::MAX` or is not positive.
/// Unwinding is not enough: the clone may be forgotten in a loop until the count wraps around.
#[inline(always)]
pub(crate) fn check_add_ref(previous: isize) {
    if !(1..isize::MAX).contains(&previous) {
        std::process::abort();
    }
}

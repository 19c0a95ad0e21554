use core::{alloc::Layout, ptr::NonNull};
use std::alloc::{alloc, dealloc, handle_alloc_error};

/// Moves `value` into a new block of the global allocator. Allocation failure is fatal.
pub fn new<T>(value: T) -> NonNull<T> {
    let layout = Layout::new::<T>();
    let p = if layout.size() == 0 {
        NonNull::dangling()
    } else {
        match NonNull::new(unsafe { alloc(layout) } as *mut T) {
            Some(p) => p,
            None => handle_alloc_error(layout),
        }
    };
    unsafe { p.as_ptr().write(value) };
    p
}

/// Drops the value and returns its block to the global allocator.
///
/// # Safety
///
/// `p` must come from [`new`] and must not be used afterwards.
pub unsafe fn delete<T>(p: NonNull<T>) {
    let layout = Layout::new::<T>();
    p.as_ptr().drop_in_place();
    if layout.size() != 0 {
        dealloc(p.as_ptr() as *mut u8, layout);
    }
}

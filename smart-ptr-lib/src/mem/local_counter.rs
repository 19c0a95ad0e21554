use core::cell::Cell;

use super::{
    counter::{check_add_ref, Counter},
    ref_counter_update::RefCounterUpdate,
};

/// Non-atomic counter. A plain read-modify-write, so pointers using it are neither `Send` nor `Sync`.
#[repr(transparent)]
#[derive(Debug)]
pub struct LocalCounter {
    counter: Cell<isize>,
}

impl Default for LocalCounter {
    #[inline(always)]
    fn default() -> Self {
        Self {
            counter: Cell::new(1),
        }
    }
}

unsafe impl Counter for LocalCounter {
    #[inline(always)]
    fn ref_counter_update(&self, i: RefCounterUpdate) -> isize {
        let result = self.counter.get();
        if i == RefCounterUpdate::AddRef {
            check_add_ref(result);
        }
        self.counter.set(result + i as isize);
        result
    }
}

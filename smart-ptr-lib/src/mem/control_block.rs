use core::ptr::NonNull;

use log::trace;

use super::{counter::Counter, global, ref_counter_update::RefCounterUpdate};

/// Strong count of one managed object and the routine which deletes it.
///
/// The control block is allocated separately from the object. It remembers the original type of
/// the object, so every pointer sharing it deletes the object the same way whatever its own view
/// type is.
#[repr(C)]
pub struct ControlBlock<C: Counter> {
    counter: C,
    delete_block: unsafe fn(NonNull<ControlBlock<C>>),
}

impl<C: Counter> ControlBlock<C> {
    #[inline(always)]
    pub(crate) fn increment(&self) {
        self.counter.ref_counter_update(RefCounterUpdate::AddRef);
    }
    /// Returns the count after the decrement. The owner which gets `0` must call [`Self::delete`].
    #[inline(always)]
    pub(crate) fn decrement(&self) -> isize {
        self.counter.ref_counter_update(RefCounterUpdate::Release) - 1
    }
    #[inline(always)]
    pub fn read(&self) -> isize {
        self.counter.ref_counter_update(RefCounterUpdate::Read)
    }
    /// Deletes the managed object and the control block.
    ///
    /// # Safety
    ///
    /// The count must have reached zero. Neither `this` nor the object may be used afterwards.
    pub(crate) unsafe fn delete(this: NonNull<Self>) {
        let delete_block = this.as_ref().delete_block;
        delete_block(this)
    }
}

/// Block = (ControlBlock, pointer to the object as it was allocated)
#[repr(C)]
pub(crate) struct Block<T: ?Sized, C: Counter> {
    header: ControlBlock<C>,
    object: NonNull<T>,
}

impl<T: ?Sized, C: Counter> Block<T, C> {
    /// Takes ownership of `object` and allocates a control block for it with the count `1`.
    pub fn new(object: Box<T>) -> (NonNull<T>, NonNull<ControlBlock<C>>) {
        let object = NonNull::from(Box::leak(object));
        let block = global::new(Self {
            header: ControlBlock {
                counter: C::default(),
                delete_block: Self::delete_block,
            },
            object,
        });
        trace!("alloc control block {:p}", block);
        (object, block.cast())
    }
    unsafe fn delete_block(header: NonNull<ControlBlock<C>>) {
        let block = header.cast::<Self>();
        let object = block.as_ref().object;
        trace!("delete control block {:p}", block);
        global::delete(block);
        drop(Box::from_raw(object.as_ptr()));
    }
}

#[cfg(test)]
mod test {
    use core::cell::Cell;

    use wasm_bindgen_test::wasm_bindgen_test;

    use crate::mem::{atomic_counter::AtomicCounter, local_counter::LocalCounter};

    use super::{Block, ControlBlock};

    struct A<'a>(i32, &'a Cell<isize>);

    impl Drop for A<'_> {
        fn drop(&mut self) {
            self.1.set(self.1.get() + 1);
        }
    }

    trait Name {
        fn name(&self) -> i32;
    }

    impl Name for A<'_> {
        fn name(&self) -> i32 {
            self.0
        }
    }

    #[test]
    #[wasm_bindgen_test]
    fn test() {
        let x = Cell::new(0);
        let (object, header) = Block::<_, LocalCounter>::new(Box::new(A(7, &x)));
        let cb = unsafe { header.as_ref() };
        assert_eq!(unsafe { object.as_ref() }.0, 7);
        assert_eq!(cb.read(), 1);
        cb.increment();
        assert_eq!(cb.read(), 2);
        assert_eq!(cb.decrement(), 1);
        assert_eq!(x.get(), 0);
        assert_eq!(cb.decrement(), 0);
        unsafe { ControlBlock::delete(header) };
        assert_eq!(x.get(), 1);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_original_type() {
        let x = Cell::new(0);
        let object: Box<dyn Name + '_> = Box::new(A(3, &x));
        let (object, header) = Block::<_, AtomicCounter>::new(object);
        assert_eq!(unsafe { object.as_ref() }.name(), 3);
        assert_eq!(unsafe { header.as_ref() }.decrement(), 0);
        unsafe { ControlBlock::delete(header) };
        assert_eq!(x.get(), 1);
    }
}

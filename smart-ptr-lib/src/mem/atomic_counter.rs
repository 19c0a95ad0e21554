use core::sync::atomic::{fence, AtomicIsize, Ordering};

use super::{
    counter::{check_add_ref, Counter},
    ref_counter_update::RefCounterUpdate,
};

/// Thread-safe counter.
///
/// This is an opt-in alternative to [`LocalCounter`](super::local_counter::LocalCounter), used by
/// [`SyncSharedPtr`](super::shared_ptr::SyncSharedPtr). The last `Release` synchronizes with every
/// earlier one so the object is dropped after all other owners are done with it.
#[repr(transparent)]
#[derive(Debug)]
pub struct AtomicCounter {
    counter: AtomicIsize,
}

impl Default for AtomicCounter {
    #[inline(always)]
    fn default() -> Self {
        Self {
            counter: AtomicIsize::new(1),
        }
    }
}

unsafe impl Counter for AtomicCounter {
    #[inline(always)]
    fn ref_counter_update(&self, i: RefCounterUpdate) -> isize {
        match i {
            RefCounterUpdate::AddRef => {
                let result = self.counter.fetch_add(1, Ordering::Relaxed);
                check_add_ref(result);
                result
            }
            RefCounterUpdate::Read => self.counter.load(Ordering::Relaxed),
            RefCounterUpdate::Release => {
                let result = self.counter.fetch_sub(1, Ordering::Release);
                if result == 1 {
                    fence(Ordering::Acquire);
                }
                result
            }
        }
    }
}

#[cfg(test)]
mod test {
    use core::sync::atomic::{AtomicIsize, Ordering};
    use std::{env, process::Command, sync::Arc, thread};

    use wasm_bindgen_test::wasm_bindgen_test;

    use crate::mem::{
        atomic_counter::AtomicCounter, counter::Counter, ref_counter_update::RefCounterUpdate,
    };

    #[test]
    #[wasm_bindgen_test]
    fn test() {
        let x = AtomicCounter::default();
        assert_eq!(x.counter.load(Ordering::Relaxed), 1);
        assert_eq!(x.ref_counter_update(RefCounterUpdate::Read), 1);
        assert_eq!(x.ref_counter_update(RefCounterUpdate::AddRef), 1);
        assert_eq!(x.ref_counter_update(RefCounterUpdate::Release), 2);
        assert_eq!(x.ref_counter_update(RefCounterUpdate::Read), 1);
        assert_eq!(x.ref_counter_update(RefCounterUpdate::Release), 1);
        assert_eq!(x.ref_counter_update(RefCounterUpdate::Read), 0);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_near_max() {
        let x = AtomicCounter {
            counter: AtomicIsize::new(isize::MAX - 1),
        };
        assert_eq!(x.ref_counter_update(RefCounterUpdate::AddRef), isize::MAX - 1);
        assert_eq!(x.ref_counter_update(RefCounterUpdate::Read), isize::MAX);
    }

    /// Runs itself in a child process which must abort on the overflowing `AddRef`.
    #[test]
    fn test_overflow_aborts() {
        if env::var_os("SMART_PTR_LIB_ATOMIC_OVERFLOW").is_some() {
            let x = AtomicCounter {
                counter: AtomicIsize::new(isize::MAX),
            };
            x.ref_counter_update(RefCounterUpdate::AddRef);
            return;
        }
        let status = Command::new(env::current_exe().unwrap())
            .args([
                "--exact",
                "mem::atomic_counter::test::test_overflow_aborts",
                "--nocapture",
            ])
            .env("SMART_PTR_LIB_ATOMIC_OVERFLOW", "1")
            .status()
            .unwrap();
        assert!(!status.success());
    }

    #[test]
    fn test_threads() {
        let x = Arc::new(AtomicCounter::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let x = x.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        x.ref_counter_update(RefCounterUpdate::AddRef);
                        x.ref_counter_update(RefCounterUpdate::Release);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(x.ref_counter_update(RefCounterUpdate::Read), 1);
    }
}

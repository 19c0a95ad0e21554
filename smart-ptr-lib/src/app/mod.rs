use core::any::Any;
use std::io::{self, Error};

use io_trait::Io;
use log::debug;

use crate::mem::shared_ptr::{
    cast::{cast_to, DynamicCast},
    SharedPtr,
};

/// Root of the demo hierarchy.
pub trait Base: Any {
    fn val(&self) -> i32;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> DynamicCast<T> for dyn Base {
    #[inline(always)]
    fn dynamic_cast(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }
}

#[derive(Debug)]
pub struct A {
    val: i32,
}

impl Default for A {
    fn default() -> Self {
        Self { val: 1 }
    }
}

impl Base for A {
    fn val(&self) -> i32 {
        self.val
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct B {
    a: A,
    bval: i32,
}

impl Default for B {
    fn default() -> Self {
        Self {
            a: A::default(),
            bval: 2,
        }
    }
}

impl B {
    pub fn bval(&self) -> i32 {
        self.bval
    }
}

impl Base for B {
    fn val(&self) -> i32 {
        self.a.val()
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn use_count_line<T: ?Sized>(s: &mut String, name: &str, p: &SharedPtr<T>) {
    *s += &format!("use count of {} is: {}\n", name, p.use_count());
}

/// Shares a `B` through a `dyn Base` pointer, casts it back and reports the counts.
pub fn scenario() -> String {
    let mut s = String::new();
    let ptr1: SharedPtr<B> = SharedPtr::new(B::default());
    use_count_line(&mut s, "ptr1", &ptr1);
    let mut ptr2: SharedPtr<dyn Base> = SharedPtr::empty();
    use_count_line(&mut s, "ptr2", &ptr2);
    ptr2.assign(ptr1.upcast(|b| b as &dyn Base));
    use_count_line(&mut s, "ptr2", &ptr2);
    use_count_line(&mut s, "ptr1", &ptr1);
    let ptr3: SharedPtr<B> = cast_to(&ptr2);
    use_count_line(&mut s, "ptr3", &ptr3);
    if let Some(b) = ptr3.get() {
        s += &format!("the val of this class is: {}\n", b.bval());
    }
    let a: SharedPtr<A> = SharedPtr::new(A::default());
    let a: SharedPtr<dyn Base> = a.map(|a| a as &dyn Base);
    let failed: SharedPtr<B> = cast_to(&a);
    use_count_line(&mut s, "failed cast", &failed);
    s
}

pub fn run(io: &impl Io) -> io::Result<()> {
    let mut a = io.args();
    a.next();
    let output = a
        .next()
        .ok_or_else(|| Error::other("missing output path"))?;
    let s = scenario();
    debug!("writing {} bytes to {}", s.len(), output);
    io.write(&output, s.as_bytes())
}

#[cfg(test)]
mod test {
    use io_test::VirtualIo;
    use io_trait::Io;
    use wasm_bindgen_test::wasm_bindgen_test;

    use super::{run, scenario};

    const EXPECTED: &str = "use count of ptr1 is: 1
use count of ptr2 is: 0
use count of ptr2 is: 2
use count of ptr1 is: 2
use count of ptr3 is: 3
the val of this class is: 2
use count of failed cast is: 0
";

    #[test]
    #[wasm_bindgen_test]
    fn test_scenario() {
        assert_eq!(scenario(), EXPECTED);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_run() {
        let io: VirtualIo = VirtualIo::new(&["output.txt"]);
        let result = run(&io);
        assert!(result.is_ok());
        let output = io.read("output.txt").unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), EXPECTED);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_missing_output() {
        let io: VirtualIo = VirtualIo::new(&[]);
        assert!(run(&io).is_err());
    }
}

pub mod atomic_counter;
pub mod control_block;
pub mod counter;
mod global;
pub mod local_counter;
pub mod managed;
pub mod ref_counter_update;
pub mod shared_ptr;
pub mod unique_ptr;

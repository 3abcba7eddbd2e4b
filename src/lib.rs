#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
extern crate tracing;

mod stdext;

mod error;
pub mod ffi;
pub mod routine;
pub mod scan;
pub mod table;

pub mod builtin;

pub use error::{Error, Result};
pub use routine::{Breakpoint, Routine};
pub use scan::Frame;
pub use table::RoutineTable;

/// A machine address, either a program counter or a stack pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Addr(pub usize);

impl Addr {
    pub fn addr(self) -> usize {
        self.0
    }

    pub fn byte_add(self, count: usize) -> Addr {
        Addr(self.0.wrapping_add(count))
    }

    fn ptr<T>(self) -> *const T {
        core::ptr::with_exposed_provenance(self.0)
    }
}

//! The AVX2 JSON value parser blob.
//!
//! `_value_entry` covers the blob up to the `_value` entry and never adjusts the
//! stack pointer, so it carries no stack map.

use crate::{Breakpoint, Routine, RoutineTable};

pub const VALUE_ENTRY: u32 = 544;
pub const VALUE_STACK: u32 = 104;
pub const VALUE_SIZE: u32 = 13456;

#[rustfmt::skip]
const VALUE_PCSP: &[Breakpoint] = &[
    Breakpoint::new(1, 0),
    Breakpoint::new(4, 8),
    Breakpoint::new(6, 16),
    Breakpoint::new(8, 24),
    Breakpoint::new(10, 32),
    Breakpoint::new(12, 40),
    Breakpoint::new(13, 48),
    Breakpoint::new(3601, 104),
    Breakpoint::new(3605, 48),
    Breakpoint::new(3606, 40),
    Breakpoint::new(3608, 32),
    Breakpoint::new(3610, 24),
    Breakpoint::new(3612, 16),
    Breakpoint::new(3614, 8),
    Breakpoint::new(3618, 0),
    Breakpoint::new(13456, 104),
];

pub const VALUE_ENTRY_ROUTINE: Routine<'static> =
    Routine::new("_value_entry", 0, VALUE_ENTRY, 0, &[]);

pub const VALUE: Routine<'static> =
    Routine::new("_value", VALUE_ENTRY, VALUE_SIZE, VALUE_STACK, VALUE_PCSP);

pub static VALUE_ROUTINES: [Routine<'static>; 2] = [VALUE_ENTRY_ROUTINE, VALUE];

pub static VALUE_TABLE: RoutineTable<'static> =
    RoutineTable::new(VALUE_ENTRY + VALUE_SIZE, &VALUE_ROUTINES);

//! Stack depth maps for precompiled foreign routines.
//!
//! A routine is precompiled machine code that the runtime calls into but cannot
//! analyze itself. When a thread is paused inside such a routine, whoever scans the
//! stack needs to know how far the stack pointer has moved since the routine was
//! entered. The generated stack map answers that with a table of this shape:
//! ```text
//! PC   SP
//! P0   D0
//! P1   D1
//! ...
//! PN   DN
//! ```
//!
//! Every row is a [`Breakpoint`]: starting at instruction offset `Pi` (relative to the
//! routine entry), the stack pointer sits `Di` bytes below the entry stack pointer, up
//! to the next row. Depth only changes at pushes, pops and explicit stack pointer
//! arithmetic, so the table stays small even for routines spanning many kilobytes.
//!
//! The first row holds the prologue depth and the last row the epilogue depth. The
//! generator may terminate the table with a row at exactly the routine size. That row
//! can never be reached by a program counter inside the routine. A routine without any
//! rows never touches the stack pointer, so its depth is 0 throughout.


use alloc::string::ToString;
use core::ops::Range;

use crate::{Error, Result};

/// Stack map of a routine that leaves the stack pointer alone.
const UNADJUSTED: &[Breakpoint] = &[Breakpoint::new(0, 0)];

/// Frame depth is valid from `offset` until the next breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    /// Instruction offset from the routine entry.
    pub offset: u32,
    /// Bytes the stack pointer has moved below the entry stack pointer.
    pub depth: u32,
}

impl Breakpoint {
    pub const fn new(offset: u32, depth: u32) -> Self {
        Self { offset, depth }
    }
}

/// Describes a foreign routine inside a code blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routine<'a> {
    /// The symbol the routine is registered under.
    pub name: &'a str,
    /// Offset of the first instruction from the start of the code blob.
    pub entry: u32,
    /// Size of the routine in bytes. Zero for symbols that only alias a location.
    pub size: u32,
    /// The largest depth the routine ever reaches.
    pub frame_size: u32,
    /// Sorted by offset. Empty if the depth is 0 everywhere.
    pub breakpoints: &'a [Breakpoint],
}

impl<'a> Routine<'a> {
    pub const fn new(
        name: &'a str,
        entry: u32,
        size: u32,
        frame_size: u32,
        breakpoints: &'a [Breakpoint],
    ) -> Self {
        Self {
            name,
            entry,
            size,
            frame_size,
            breakpoints,
        }
    }

    /// The blob offset one past the last instruction.
    pub fn end(&self) -> u32 {
        self.entry.saturating_add(self.size)
    }

    /// Whether `blob_offset` is an instruction of this routine.
    pub fn contains(&self, blob_offset: u32) -> bool {
        (self.entry..self.end()).contains(&blob_offset)
    }

    /// Returns the frame depth at `offset`, measured from the routine entry.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is not inside the routine. A runtime only looks up program
    /// counters it paused inside the routine, so this means the caller or the table
    /// is broken, and interpreting the stack anyway would be unsound.
    pub fn depth_at(&self, offset: u32) -> u32 {
        match self.try_depth_at(offset) {
            Ok(depth) => depth,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`Routine::depth_at`], but reports the broken contract as an error.
    pub fn try_depth_at(&self, offset: u32) -> Result<u32> {
        if offset >= self.size {
            return Err(Error::OffsetOutOfRange {
                routine: self.name.to_string(),
                offset,
                size: self.size,
            });
        }

        let rows = self.reachable_rows();
        // Number of breakpoints at or before `offset`.
        let idx = rows.partition_point(|bp| bp.offset <= offset);
        let breakpoint = match idx.checked_sub(1) {
            Some(idx) => rows[idx],
            // Before the first row the routine is still in its prologue.
            None => *rows.first().ok_or_else(|| Error::UnreachableBreakpoints {
                routine: self.name.to_string(),
                size: self.size,
            })?,
        };

        trace!(
            routine = self.name,
            offset,
            breakpoint = breakpoint.offset,
            depth = breakpoint.depth,
            "resolved frame depth"
        );
        Ok(breakpoint.depth)
    }

    /// The rows a program counter inside the routine can hit.
    fn reachable_rows(&self) -> &'a [Breakpoint] {
        let rows = if self.breakpoints.is_empty() {
            UNADJUSTED
        } else {
            self.breakpoints
        };
        &rows[..rows.partition_point(|bp| bp.offset < self.size)]
    }

    /// Depth at the routine entry.
    pub fn prologue_depth(&self) -> Option<u32> {
        self.reachable_rows().first().map(|bp| bp.depth)
    }

    /// Depth at the last instruction.
    pub fn epilogue_depth(&self) -> Option<u32> {
        self.reachable_rows().last().map(|bp| bp.depth)
    }

    /// Iterates over the ranges of constant depth, in order, covering `0..size`.
    pub fn segments(&self) -> impl Iterator<Item = (Range<u32>, u32)> + '_ {
        let rows = self.reachable_rows();
        rows.iter().enumerate().map(move |(i, bp)| {
            let start = if i == 0 { 0 } else { bp.offset };
            let end = rows.get(i + 1).map_or(self.size, |next| next.offset);
            (start..end, bp.depth)
        })
    }

    /// Checks the stack map against the invariants the resolver relies on.
    #[instrument(level = "debug", skip(self), fields(routine = self.name))]
    pub fn validate(&self, blob_size: u32) -> Result<()> {
        let fits = self
            .entry
            .checked_add(self.size)
            .is_some_and(|end| end <= blob_size);
        if !fits {
            return Err(Error::RoutineOutOfBlob {
                routine: self.name.to_string(),
                entry: self.entry,
                size: self.size,
                blob_size,
            });
        }

        // A sized routine with rows needs at least one that a program counter can reach.
        let unreachable = self
            .breakpoints
            .first()
            .is_some_and(|bp| bp.offset >= self.size);
        if self.size > 0 && unreachable {
            return Err(Error::UnreachableBreakpoints {
                routine: self.name.to_string(),
                size: self.size,
            });
        }

        for pair in self.breakpoints.windows(2) {
            if pair[1].offset <= pair[0].offset {
                return Err(Error::UnsortedBreakpoints {
                    routine: self.name.to_string(),
                    previous: pair[0].offset,
                    next: pair[1].offset,
                });
            }
        }

        for bp in self.breakpoints {
            if bp.depth > self.frame_size {
                return Err(Error::DepthExceedsFrame {
                    routine: self.name.to_string(),
                    offset: bp.offset,
                    depth: bp.depth,
                    frame_size: self.frame_size,
                });
            }
            if bp.offset > self.size {
                return Err(Error::BreakpointPastEnd {
                    routine: self.name.to_string(),
                    offset: bp.offset,
                    size: self.size,
                });
            }
        }

        trace!(breakpoints = self.breakpoints.len(), "stack map is valid");
        Ok(())
    }
}

//! Resolves the frame of a thread paused inside a foreign routine.
//!
//! A stack scanner that stops a thread at program counter `pc` with stack pointer
//! `sp` uses the stack map to find where the routine's frame ends. On x86-64, `call`
//! pushes the return address right below the caller's stack pointer, so at the entry
//! of the routine `sp` points at the return address. Everything the routine pushed
//! afterwards lies between `sp` and `sp + depth`.


use crate::{Addr, Routine, RoutineTable};

/// Size of the return address pushed by `call`.
const RETURN_ADDRESS_SIZE: usize = core::mem::size_of::<usize>();

#[derive(Debug, Clone, Copy)]
pub struct Frame<'t> {
    pub routine: &'t Routine<'t>,
    /// Offset of the paused instruction from the routine entry.
    pub offset: u32,
    pub depth: u32,
    pub sp: Addr,
}

impl<'t> Frame<'t> {
    /// Returns `None` if `pc` does not point into any routine of the blob mapped at
    /// `blob_base`.
    #[instrument(level = "trace", skip(table))]
    pub fn resolve(
        table: &'t RoutineTable<'t>,
        blob_base: Addr,
        pc: Addr,
        sp: Addr,
    ) -> Option<Self> {
        let blob_offset = pc.addr().checked_sub(blob_base.addr())?;
        let blob_offset = u32::try_from(blob_offset).ok()?;
        let (routine, offset) = table.routine_at(blob_offset)?;
        let depth = routine.depth_at(offset);

        trace!(routine = routine.name, offset, depth, "resolved frame");
        Some(Frame {
            routine,
            offset,
            depth,
            sp,
        })
    }

    /// The stack pointer right after the routine was called.
    pub fn entry_sp(&self) -> Addr {
        self.sp.byte_add(self.depth as usize)
    }

    pub fn return_address_slot(&self) -> Addr {
        self.entry_sp()
    }

    /// The stack pointer of the caller once the routine has returned.
    pub fn caller_sp(&self) -> Addr {
        self.entry_sp().byte_add(RETURN_ADDRESS_SIZE)
    }

    /// The words the routine itself pushed, from `sp` up to the return address.
    pub fn pushed_words(&self) -> usize {
        self.depth as usize / RETURN_ADDRESS_SIZE
    }

    /// Reads the address the routine returns to.
    ///
    /// # Safety
    ///
    /// `sp` must be the stack pointer of a live thread paused at this frame, or
    /// otherwise point to readable memory of at least `depth + 8` bytes.
    pub unsafe fn return_address(&self) -> Addr {
        Addr(self.return_address_slot().ptr::<usize>().read())
    }
}

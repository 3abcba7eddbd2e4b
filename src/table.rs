//! The set of routines living in one code blob.


use alloc::string::ToString;

use crate::{Error, Result, Routine};

/// All routines of a code blob, sorted by entry offset.
///
/// Tables are built once, usually as `static` data, and never change afterwards.
#[derive(Debug, Clone, Copy)]
pub struct RoutineTable<'a> {
    pub blob_size: u32,
    pub routines: &'a [Routine<'a>],
}

impl<'a> RoutineTable<'a> {
    pub const fn new(blob_size: u32, routines: &'a [Routine<'a>]) -> Self {
        Self {
            blob_size,
            routines,
        }
    }

    #[instrument(skip(self), fields(blob_size = self.blob_size, routines = self.routines.len()))]
    pub fn validate(&self) -> Result<()> {
        let mut previous_entry = 0;
        let mut previous_end = 0;
        for (i, routine) in self.routines.iter().enumerate() {
            routine.validate(self.blob_size)?;

            if routine.entry < previous_entry {
                return Err(Error::UnsortedRoutines {
                    routine: routine.name.to_string(),
                    entry: routine.entry,
                    previous_entry,
                });
            }
            previous_entry = routine.entry;

            // aliases may point anywhere, even into another routine
            if routine.size > 0 {
                if routine.entry < previous_end {
                    return Err(Error::OverlappingRoutines {
                        routine: routine.name.to_string(),
                        entry: routine.entry,
                        previous_end,
                    });
                }
                previous_end = routine.end();
            }

            if self.routines[..i].iter().any(|r| r.name == routine.name) {
                return Err(Error::DuplicateName(routine.name.to_string()));
            }
        }

        debug!("routine table is valid");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Routine<'a>> {
        self.routines.iter().find(|routine| routine.name == name)
    }

    /// Finds the routine containing `blob_offset` and the offset relative to its entry.
    pub fn routine_at(&self, blob_offset: u32) -> Option<(&Routine<'a>, u32)> {
        let candidates = self.routines.partition_point(|r| r.entry <= blob_offset);

        // Aliases have no instructions and may share the entry of a real routine.
        let routine = self.routines[..candidates]
            .iter()
            .rev()
            .find(|r| r.size > 0)?;

        debug!(
            blob_offset,
            candidate = routine.name,
            entry = routine.entry,
            size = routine.size,
            "searched routine table"
        );

        if !routine.contains(blob_offset) {
            return None;
        }
        Some((routine, blob_offset - routine.entry))
    }

    /// Frame depth at an offset from the start of the blob, if any routine covers it.
    pub fn depth_at_blob_offset(&self, blob_offset: u32) -> Option<u32> {
        let (routine, offset) = self.routine_at(blob_offset)?;
        Some(routine.depth_at(offset))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Routine<'a>> {
        self.routines.iter()
    }
}

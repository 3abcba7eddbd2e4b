use alloc::string::String;

use thiserror::Error;

/// A stack map lookup or a stack map itself is invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("instruction offset {offset} is out of range for routine `{routine}` of size {size}")]
    OffsetOutOfRange {
        routine: String,
        offset: u32,
        size: u32,
    },
    #[error(
        "routine `{routine}` at {entry} with size {size} extends past the end of the {blob_size} byte code blob"
    )]
    RoutineOutOfBlob {
        routine: String,
        entry: u32,
        size: u32,
        blob_size: u32,
    },
    #[error("routine `{routine}` has size {size} but none of its breakpoints lies inside it")]
    UnreachableBreakpoints { routine: String, size: u32 },
    #[error(
        "breakpoint offsets of routine `{routine}` are not strictly increasing: {previous} is followed by {next}"
    )]
    UnsortedBreakpoints {
        routine: String,
        previous: u32,
        next: u32,
    },
    #[error(
        "breakpoint at {offset} in routine `{routine}` records depth {depth}, exceeding the frame size {frame_size}"
    )]
    DepthExceedsFrame {
        routine: String,
        offset: u32,
        depth: u32,
        frame_size: u32,
    },
    #[error("breakpoint at {offset} in routine `{routine}` lies past the routine size {size}")]
    BreakpointPastEnd {
        routine: String,
        offset: u32,
        size: u32,
    },
    #[error("routine `{routine}` at {entry} is listed after a routine entered at {previous_entry}")]
    UnsortedRoutines {
        routine: String,
        entry: u32,
        previous_entry: u32,
    },
    #[error("routine `{routine}` at {entry} starts before the previous routine ends at {previous_end}")]
    OverlappingRoutines {
        routine: String,
        entry: u32,
        previous_end: u32,
    },
    #[error("routine name `{0}` is registered more than once")]
    DuplicateName(String),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

//! Stack maps for the precompiled routines shipped with the crate.
//!
//! The tables are emitted by the assembler pipeline that produces the code blobs and
//! are checked in as plain data.

pub mod avx2;

//! C ABI for stack scanners that live outside of Rust.
//!
//! Panics must not unwind across these functions, so broken contracts are logged and
//! abort the process instead.

use crate::builtin::avx2::{VALUE, VALUE_TABLE};
use crate::stdext;

/// Frame depth of `_value` at `offset` from its entry. Aborts if `offset` is outside
/// the routine.
#[no_mangle]
pub extern "C" fn pcsp_value_depth_at(offset: u32) -> u32 {
    match VALUE.try_depth_at(offset) {
        Ok(depth) => depth,
        Err(err) => {
            error!("{err}");
            stdext::abort();
        }
    }
}

#[no_mangle]
pub extern "C" fn pcsp_value_frame_size() -> u32 {
    VALUE.frame_size
}

/// Writes the frame depth at `blob_offset` into the AVX2 value blob to `out_depth`.
/// Returns `false` and leaves `out_depth` untouched if no routine covers the offset.
///
/// # Safety
///
/// `out_depth` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn pcsp_value_lookup(blob_offset: u32, out_depth: *mut u32) -> bool {
    if out_depth.is_null() {
        error!("pcsp_value_lookup called with a null out pointer");
        stdext::abort();
    }
    match VALUE_TABLE.depth_at_blob_offset(blob_offset) {
        Some(depth) => {
            out_depth.write(depth);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::avx2::{VALUE_ENTRY, VALUE_STACK};

    #[test]
    fn depth_through_c_abi() {
        assert_eq!(pcsp_value_depth_at(500), 48);
        assert_eq!(pcsp_value_depth_at(5000), 0);
        assert_eq!(pcsp_value_depth_at(3601), 104);
        assert_eq!(pcsp_value_frame_size(), VALUE_STACK);
    }

    #[test]
    fn lookup_through_c_abi() {
        let mut depth = u32::MAX;
        assert!(unsafe { pcsp_value_lookup(VALUE_ENTRY + 13, &mut depth) });
        assert_eq!(depth, 48);

        let mut depth = u32::MAX;
        assert!(unsafe { pcsp_value_lookup(3, &mut depth) });
        assert_eq!(depth, 0);

        let mut depth = u32::MAX;
        assert!(!unsafe { pcsp_value_lookup(VALUE_TABLE.blob_size, &mut depth) });
        assert_eq!(depth, u32::MAX);
    }
}

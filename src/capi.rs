//! C entry point
//!
//! # Safety
//!
//! Both arguments must be null or point to NUL-terminated strings that
//! stay valid for the duration of the call.

use std::ffi::{c_char, c_int, CStr};
use std::path::Path;

/// Concatenate the files listed in `list_file` into `out_filename`.
///
/// Returns 0 on success, 1 on failure (including null or non UTF-8
/// arguments).
///
/// # Safety
///
/// See the module documentation.
#[no_mangle]
pub unsafe extern "C" fn fconcat(list_file: *const c_char, out_filename: *const c_char) -> c_int {
    let (Some(list), Some(output)) = (to_str(list_file), to_str(out_filename)) else {
        eprintln!("fconcat: invalid argument");
        return 1;
    };

    crate::concat_files(Path::new(list), Path::new(output))
}

unsafe fn to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr;

    #[test]
    fn test_null_arguments_fail() {
        let out = CString::new("out.mp4").unwrap();
        assert_eq!(unsafe { fconcat(ptr::null(), out.as_ptr()) }, 1);
        assert_eq!(unsafe { fconcat(out.as_ptr(), ptr::null()) }, 1);
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let bad = CString::new(vec![0xff, 0xfe]).unwrap();
        let out = CString::new("out.mp4").unwrap();
        assert_eq!(unsafe { fconcat(bad.as_ptr(), out.as_ptr()) }, 1);
    }
}

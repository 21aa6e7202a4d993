//! C API for FFI bindings
//!
//! This module lets the editor's C code call the converters directly.
//! All functions are marked with #[unsafe(no_mangle)] and use C calling
//! conventions. Strings returned from here must be released with
//! [`reconv_free_string`].

use crate::pattern::convert_pattern;
use crate::substitute::SubstitutionConverter;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

fn into_raw(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(s) => s.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Write an error message through `error` when the caller asked for one
///
/// # Safety
/// - error must be null or point to writable storage for a pointer
unsafe fn set_error(error: *mut *mut c_char, message: &str) {
    unsafe {
        if !error.is_null() {
            *error = into_raw(message.to_string());
        }
    }
}

/// Convert a legacy pattern to the canonical dialect
///
/// # Safety
/// - pattern must be a valid null-terminated UTF-8 string
/// - error and offset pointers can be null if you don't need them
///
/// Returns the converted pattern, or null on error. On error `*error`
/// receives the message and `*offset` the byte offset where it was found.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn reconv_convert_pattern(
    pattern: *const c_char,
    error: *mut *mut c_char,
    offset: *mut usize,
) -> *mut c_char {
    unsafe {
        if pattern.is_null() {
            set_error(error, "pattern is null");
            return std::ptr::null_mut();
        }

        let pattern_str = match CStr::from_ptr(pattern).to_str() {
            Ok(s) => s,
            Err(_) => {
                set_error(error, "pattern is not valid UTF-8");
                return std::ptr::null_mut();
            }
        };

        match convert_pattern(pattern_str) {
            Ok(converted) => into_raw(converted),
            Err(e) => {
                set_error(error, &e.message());
                if !offset.is_null() {
                    *offset = e.offset().unwrap_or(0);
                }
                std::ptr::null_mut()
            }
        }
    }
}

/// Convert a legacy substitution template
///
/// # Safety
/// - template must be a valid null-terminated UTF-8 string
///
/// A `max_len` of zero means no cap. Returns null only when the template
/// is null or not UTF-8.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn reconv_convert_substitution(
    template: *const c_char,
    max_len: usize,
) -> *mut c_char {
    unsafe {
        if template.is_null() {
            return std::ptr::null_mut();
        }

        let Ok(template_str) = CStr::from_ptr(template).to_str() else {
            return std::ptr::null_mut();
        };

        let mut converter = SubstitutionConverter::new();
        if max_len > 0 {
            converter = converter.max_len(max_len);
        }
        into_raw(converter.convert(template_str))
    }
}

/// Free a string returned by this library
///
/// # Safety
/// - s must be a pointer returned by one of the functions in this module
/// - s must not be used after calling this function
#[unsafe(no_mangle)]
pub unsafe extern "C" fn reconv_free_string(s: *mut c_char) {
    unsafe {
        if !s.is_null() {
            drop(CString::from_raw(s));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffi_convert_pattern() {
        let pattern = CString::new("x{2}").unwrap();
        unsafe {
            let result = reconv_convert_pattern(pattern.as_ptr(), std::ptr::null_mut(), std::ptr::null_mut());
            assert!(!result.is_null());
            assert_eq!(CStr::from_ptr(result).to_str().unwrap(), "x\\{2}");
            reconv_free_string(result);
        }
    }

    #[test]
    fn test_ffi_convert_pattern_error() {
        let pattern = CString::new("a**").unwrap();
        let mut error: *mut c_char = std::ptr::null_mut();
        let mut offset: usize = 0;
        unsafe {
            let result = reconv_convert_pattern(pattern.as_ptr(), &mut error, &mut offset);
            assert!(result.is_null());
            assert!(!error.is_null());
            let message = CStr::from_ptr(error).to_str().unwrap();
            assert!(message.contains("nested quantifiers"));
            assert_eq!(offset, 2);
            reconv_free_string(error);
        }
    }

    #[test]
    fn test_ffi_null_pattern() {
        let mut error: *mut c_char = std::ptr::null_mut();
        unsafe {
            let result = reconv_convert_pattern(std::ptr::null(), &mut error, std::ptr::null_mut());
            assert!(result.is_null());
            assert_eq!(CStr::from_ptr(error).to_str().unwrap(), "pattern is null");
            reconv_free_string(error);
        }
    }

    #[test]
    fn test_ffi_convert_substitution() {
        let template = CString::new("\\0-\\q").unwrap();
        unsafe {
            let result = reconv_convert_substitution(template.as_ptr(), 0);
            assert_eq!(CStr::from_ptr(result).to_str().unwrap(), "&-q");
            reconv_free_string(result);

            let result = reconv_convert_substitution(template.as_ptr(), 2);
            assert_eq!(CStr::from_ptr(result).to_str().unwrap(), "&-");
            reconv_free_string(result);

            assert!(reconv_convert_substitution(std::ptr::null(), 0).is_null());
        }
    }
}

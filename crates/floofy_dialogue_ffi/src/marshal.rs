// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conversions between boundary values and model types.

use floofy_dialogue::Id;

/// Id value meaning "no entity"
pub const FLOOFY_NULL_ID: i64 = -1;

/// A string allocated by this library. Not NUL-terminated.
///
/// Release with [`floofy_string_free`]; a null `ptr` means no string.
#[repr(C)]
#[derive(Debug)]
pub struct FloofyString {
    /// UTF-8 bytes
    pub ptr: *mut u8,
    /// Byte length
    pub len: usize,
}

impl FloofyString {
    pub(crate) fn null() -> Self {
        Self {
            ptr: std::ptr::null_mut(),
            len: 0,
        }
    }

    pub(crate) fn from_string(value: String) -> Self {
        let bytes = value.into_bytes().into_boxed_slice();
        let len = bytes.len();
        Self {
            ptr: Box::into_raw(bytes).cast::<u8>(),
            len,
        }
    }

    /// Whether this carries no string
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// View the contents from Rust
    pub fn as_str(&self) -> Option<&str> {
        if self.ptr.is_null() {
            return None;
        }
        // SAFETY: non-null strings come from `from_string` and own `len` bytes of UTF-8
        let bytes = unsafe { std::slice::from_raw_parts(self.ptr, self.len) };
        std::str::from_utf8(bytes).ok()
    }
}

/// Release a string returned by this library. Null strings are ignored.
///
/// # Safety
/// `value` must come from this library and must not be freed twice.
#[no_mangle]
pub unsafe extern "C" fn floofy_string_free(value: FloofyString) {
    if value.ptr.is_null() {
        return;
    }
    // SAFETY: the pointer and length were produced together by `from_string`
    drop(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(value.ptr, value.len)) });
}

/// Borrow a UTF-8 argument. A null pointer is only accepted with length 0.
///
/// # Safety
/// A non-null `ptr` must point to `len` readable bytes that outlive `'a`.
pub(crate) unsafe fn str_arg<'a>(ptr: *const u8, len: usize) -> Option<&'a str> {
    if ptr.is_null() {
        return (len == 0).then_some("");
    }
    // SAFETY: forwarded from the caller
    let bytes = unsafe { std::slice::from_raw_parts(ptr, len) };
    std::str::from_utf8(bytes).ok()
}

/// Borrow a byte buffer argument
///
/// # Safety
/// A non-null `ptr` must point to `len` readable bytes that outlive `'a`.
pub(crate) unsafe fn bytes_arg<'a>(ptr: *const u8, len: usize) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return (len == 0).then_some(&[][..]);
    }
    // SAFETY: forwarded from the caller
    Some(unsafe { std::slice::from_raw_parts(ptr, len) })
}

/// Decode an id argument; negative means none
pub(crate) fn id_in<T: From<Id>>(raw: i64) -> Option<T> {
    u64::try_from(raw).ok().map(|value| T::from(Id::new(value)))
}

/// Encode an id result
pub(crate) fn id_out<T: Into<Id>>(id: Option<T>) -> i64 {
    id.and_then(|id| i64::try_from(id.into().value()).ok())
        .unwrap_or(FLOOFY_NULL_ID)
}

/// Encode an optional owned string
pub(crate) fn string_out(value: Option<&str>) -> FloofyString {
    value.map_or_else(FloofyString::null, |s| FloofyString::from_string(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use floofy_dialogue::EntryId;

    #[test]
    fn test_id_encoding() {
        assert_eq!(id_in::<EntryId>(-1), None);
        assert_eq!(id_in::<EntryId>(3), Some(EntryId::new(3)));
        assert_eq!(id_out(Some(EntryId::new(3))), 3);
        assert_eq!(id_out::<EntryId>(None), FLOOFY_NULL_ID);
    }

    #[test]
    fn test_string_round_trip() {
        let value = FloofyString::from_string("héllo".to_string());
        assert_eq!(value.as_str(), Some("héllo"));
        assert_eq!(value.len, "héllo".len());
        // SAFETY: produced above, freed once
        unsafe { floofy_string_free(value) };

        let empty = FloofyString::from_string(String::new());
        assert_eq!(empty.as_str(), Some(""));
        // SAFETY: produced above, freed once
        unsafe { floofy_string_free(empty) };
        // SAFETY: null strings are ignored
        unsafe { floofy_string_free(FloofyString::null()) };
    }

    #[test]
    fn test_string_arguments() {
        let text = "name";
        // SAFETY: pointer and length describe `text`
        assert_eq!(unsafe { str_arg(text.as_ptr(), text.len()) }, Some("name"));
        // SAFETY: null with zero length is accepted
        assert_eq!(unsafe { str_arg(std::ptr::null(), 0) }, Some(""));
        // SAFETY: null with a length is rejected before any read
        assert_eq!(unsafe { str_arg(std::ptr::null(), 4) }, None);
        let invalid = [0xff_u8, 0xfe];
        // SAFETY: pointer and length describe `invalid`
        assert_eq!(unsafe { str_arg(invalid.as_ptr(), invalid.len()) }, None);
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! GUID values at the boundary.

use crate::marshal::{str_arg, FloofyString};
use floofy_dialogue::Guid;

/// 16 raw GUID bytes; all zero means unassigned
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloofyGuid {
    /// Raw bytes, most significant first
    pub bytes: [u8; 16],
}

impl From<Guid> for FloofyGuid {
    fn from(guid: Guid) -> Self {
        Self { bytes: *guid.as_bytes() }
    }
}

impl From<FloofyGuid> for Guid {
    fn from(guid: FloofyGuid) -> Self {
        Guid::from_bytes(guid.bytes)
    }
}

/// Generate a random, valid GUID
#[no_mangle]
pub extern "C" fn floofy_guid_new() -> FloofyGuid {
    Guid::new_random().into()
}

/// Whether a GUID is anything other than all zeros
#[no_mangle]
pub extern "C" fn floofy_guid_is_valid(guid: FloofyGuid) -> bool {
    Guid::from(guid).is_valid()
}

/// Byte-wise equality
#[no_mangle]
pub extern "C" fn floofy_guid_equal(a: FloofyGuid, b: FloofyGuid) -> bool {
    a == b
}

/// Canonical `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX` uppercase form
#[no_mangle]
pub extern "C" fn floofy_guid_to_string(guid: FloofyGuid) -> FloofyString {
    FloofyString::from_string(Guid::from(guid).to_string())
}

/// Parse the canonical hyphenated form, in either case.
///
/// `out` is left untouched when parsing fails.
///
/// # Safety
/// `text` must point to `len` readable bytes; `out` must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn floofy_guid_from_string(text: *const u8, len: usize, out: *mut FloofyGuid) -> bool {
    // SAFETY: forwarded from the caller
    let Some(text) = (unsafe { str_arg(text, len) }) else {
        return false;
    };
    match text.parse::<Guid>() {
        Ok(guid) => {
            // SAFETY: caller passes a writable slot or null
            if let Some(out) = unsafe { out.as_mut() } {
                *out = guid.into();
            }
            true
        }
        Err(e) => {
            tracing::debug!("Rejected GUID string {:?}: {}", text, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_round_trip() {
        let text = "F964FB23-022B-48CD-99C4-52EAC595B9B0";
        let mut guid = FloofyGuid::default();
        // SAFETY: `text` and `guid` are live locals
        assert!(unsafe { floofy_guid_from_string(text.as_ptr(), text.len(), &mut guid) });
        assert!(floofy_guid_is_valid(guid));
        assert_eq!(guid.bytes[0], 0xF9);

        let rendered = floofy_guid_to_string(guid);
        assert_eq!(rendered.as_str(), Some(text));
        // SAFETY: produced above, freed once
        unsafe { crate::floofy_string_free(rendered) };
    }

    #[test]
    fn test_rejects_malformed_text() {
        let mut guid = FloofyGuid { bytes: [7; 16] };
        let text = "F964FB23022B48CD99C452EAC595B9B0";
        // SAFETY: `text` and `guid` are live locals
        assert!(!unsafe { floofy_guid_from_string(text.as_ptr(), text.len(), &mut guid) });
        assert_eq!(guid.bytes, [7; 16]);
    }

    #[test]
    fn test_equality_and_validity() {
        let a = floofy_guid_new();
        let b = floofy_guid_new();
        assert!(floofy_guid_equal(a, a));
        assert!(!floofy_guid_equal(a, b));
        assert!(!floofy_guid_is_valid(FloofyGuid::default()));
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flat choice registry handles.
//!
//! Mirrors the dialogue manager: `ChoiceManager*` is host-owned, `Choice*`
//! values from a manager are borrowed, and removed choices belong to the host
//! until adopted back or released with [`floofy_choice_free`].

use crate::marshal::{bytes_arg, id_out, str_arg, string_out, FloofyString};
use floofy_dialogue::{Choice, ChoiceManager, WriteOptions};

fn into_handle(manager: ChoiceManager) -> *mut ChoiceManager {
    Box::into_raw(Box::new(manager))
}

fn choice_handle(choice: Option<&mut Choice>) -> *mut Choice {
    choice.map_or(std::ptr::null_mut(), |c| c as *mut Choice)
}

/// Create an empty choice registry
#[no_mangle]
pub extern "C" fn floofy_choices_new() -> *mut ChoiceManager {
    into_handle(ChoiceManager::new())
}

/// Release a choice registry and everything it owns
///
/// # Safety
/// `mgr` must be null or a registry from this library, not freed before.
#[no_mangle]
pub unsafe extern "C" fn floofy_choices_free(mgr: *mut ChoiceManager) {
    if mgr.is_null() {
        return;
    }
    // SAFETY: the handle came from `Box::into_raw` and is released once
    drop(unsafe { Box::from_raw(mgr) });
}

/// Load a choice file. Null on any failure.
///
/// # Safety
/// `path` must point to `path_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_choices_read_file(path: *const u8, path_len: usize) -> *mut ChoiceManager {
    // SAFETY: forwarded from the caller
    let Some(path) = (unsafe { str_arg(path, path_len) }) else {
        return std::ptr::null_mut();
    };
    ChoiceManager::read_from_file(path).map_or(std::ptr::null_mut(), into_handle)
}

/// Parse a choice document from memory. Null on any failure.
///
/// # Safety
/// `contents` must point to `len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_choices_read_buffer(contents: *const u8, len: usize) -> *mut ChoiceManager {
    // SAFETY: forwarded from the caller
    let Some(contents) = (unsafe { bytes_arg(contents, len) }) else {
        return std::ptr::null_mut();
    };
    ChoiceManager::read_from_slice(contents).map_or(std::ptr::null_mut(), into_handle)
}

/// Save a choice registry to a file
///
/// # Safety
/// `mgr` must be null or a live registry; `path` must point to `path_len`
/// readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_choices_write_file(mgr: *const ChoiceManager, path: *const u8, path_len: usize) -> bool {
    // SAFETY: caller passes a live registry or null, and readable path bytes
    let (mgr, path) = unsafe { (mgr.as_ref(), str_arg(path, path_len)) };
    let (Some(mgr), Some(path)) = (mgr, path) else {
        return false;
    };
    match mgr.write_to_file(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to write choice file {}: {}", path, e);
            false
        }
    }
}

/// Serialize a choice registry to a string. Null on failure.
///
/// # Safety
/// `mgr` must be null or a live registry.
#[no_mangle]
pub unsafe extern "C" fn floofy_choices_write_buffer(mgr: *const ChoiceManager, pretty: bool) -> FloofyString {
    // SAFETY: caller passes a live registry or null
    let Some(mgr) = (unsafe { mgr.as_ref() }) else {
        return FloofyString::null();
    };
    match mgr.write_to_string_with(&WriteOptions { pretty }) {
        Ok(contents) => FloofyString::from_string(contents),
        Err(e) => {
            tracing::warn!("Failed to serialize choices: {}", e);
            FloofyString::null()
        }
    }
}

/// Add a choice. Null if the name is taken.
///
/// # Safety
/// `mgr` must be null or a live registry; `name` must point to `name_len`
/// readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_choices_add(mgr: *mut ChoiceManager, name: *const u8, name_len: usize) -> *mut Choice {
    // SAFETY: caller passes a live registry or null, and readable name bytes
    let (mgr, name) = unsafe { (mgr.as_mut(), str_arg(name, name_len)) };
    let (Some(mgr), Some(name)) = (mgr, name) else {
        return std::ptr::null_mut();
    };
    choice_handle(mgr.add_choice(name))
}

/// Hand a detached choice back. On a name clash the host keeps ownership.
///
/// # Safety
/// `mgr` must be null or a live registry; `choice` must be null or a choice
/// returned by [`floofy_choices_remove`] and not yet adopted or freed.
#[no_mangle]
pub unsafe extern "C" fn floofy_choices_adopt(mgr: *mut ChoiceManager, choice: *mut Choice) -> bool {
    // SAFETY: caller passes a live registry or null
    let Some(mgr) = (unsafe { mgr.as_mut() }) else {
        return false;
    };
    if choice.is_null() {
        return false;
    }
    // SAFETY: detached choices are boxes owned by the caller
    let choice = unsafe { Box::from_raw(choice) };
    match mgr.adopt_choice(choice) {
        Ok(_) => true,
        Err(choice) => {
            // Ownership returns to the caller at the same address
            let _ = Box::into_raw(choice);
            false
        }
    }
}

/// Detach a choice by name. The host owns the result.
///
/// # Safety
/// `mgr` must be null or a live registry; `name` must point to `name_len`
/// readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_choices_remove(mgr: *mut ChoiceManager, name: *const u8, name_len: usize) -> *mut Choice {
    // SAFETY: caller passes a live registry or null, and readable name bytes
    let (mgr, name) = unsafe { (mgr.as_mut(), str_arg(name, name_len)) };
    let (Some(mgr), Some(name)) = (mgr, name) else {
        return std::ptr::null_mut();
    };
    mgr.remove_choice(name).map_or(std::ptr::null_mut(), Box::into_raw)
}

/// Rename a choice, keeping names unique
///
/// # Safety
/// `mgr` must be null or a live registry; both names must point to their
/// stated number of readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_choices_rename(
    mgr: *mut ChoiceManager,
    old: *const u8,
    old_len: usize,
    new: *const u8,
    new_len: usize,
) -> bool {
    // SAFETY: caller passes a live registry or null, and readable name bytes
    let (mgr, old, new) = unsafe { (mgr.as_mut(), str_arg(old, old_len), str_arg(new, new_len)) };
    match (mgr, old, new) {
        (Some(mgr), Some(old), Some(new)) => mgr.rename_choice(old, new),
        _ => false,
    }
}

/// Number of choices; 0 for a null registry
///
/// # Safety
/// `mgr` must be null or a live registry.
#[no_mangle]
pub unsafe extern "C" fn floofy_choices_num(mgr: *const ChoiceManager) -> usize {
    // SAFETY: caller passes a live registry or null
    unsafe { mgr.as_ref() }.map_or(0, ChoiceManager::num_choices)
}

/// Look up a choice by name
///
/// # Safety
/// `mgr` must be null or a live registry; `name` must point to `name_len`
/// readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_choices_named(mgr: *mut ChoiceManager, name: *const u8, name_len: usize) -> *mut Choice {
    // SAFETY: caller passes a live registry or null, and readable name bytes
    let (mgr, name) = unsafe { (mgr.as_mut(), str_arg(name, name_len)) };
    let (Some(mgr), Some(name)) = (mgr, name) else {
        return std::ptr::null_mut();
    };
    choice_handle(mgr.choice_mut(name))
}

/// Look up a choice by position. Null when out of range.
///
/// # Safety
/// `mgr` must be null or a live registry.
#[no_mangle]
pub unsafe extern "C" fn floofy_choices_at(mgr: *mut ChoiceManager, index: usize) -> *mut Choice {
    // SAFETY: caller passes a live registry or null
    let mgr = unsafe { mgr.as_mut() };
    choice_handle(mgr.and_then(|m| m.choice_at_mut(index)))
}

/// Release a detached choice
///
/// # Safety
/// `choice` must be null or a choice returned by [`floofy_choices_remove`]
/// that no registry owns.
#[no_mangle]
pub unsafe extern "C" fn floofy_choice_free(choice: *mut Choice) {
    if choice.is_null() {
        return;
    }
    // SAFETY: detached choices are boxes owned by the caller
    drop(unsafe { Box::from_raw(choice) });
}

/// Name of a choice
///
/// # Safety
/// `choice` must be null or a live choice handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_choice_name(choice: *const Choice) -> FloofyString {
    // SAFETY: caller passes a live choice or null
    let choice = unsafe { choice.as_ref() };
    string_out(choice.map(|c| c.name.as_str()))
}

/// Id of a choice within its registry
///
/// # Safety
/// `choice` must be null or a live choice handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_choice_id(choice: *const Choice) -> i64 {
    // SAFETY: caller passes a live choice or null
    let choice = unsafe { choice.as_ref() };
    id_out(choice.map(Choice::id))
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Manager and dialogue handles.
//!
//! A `DialogueManager*` is owned by the host and released with
//! [`floofy_manager_free`]. `Dialogue*` values obtained from a manager are
//! borrowed and stay valid until the dialogue is removed or the manager is
//! freed; a dialogue returned by [`floofy_manager_remove_dialogue`] is owned
//! by the host until it is adopted back or released with
//! [`floofy_dialogue_free`].

use crate::marshal::{bytes_arg, id_out, str_arg, string_out, FloofyString};
use floofy_dialogue::{Dialogue, DialogueManager, WriteOptions};

fn into_handle(manager: DialogueManager) -> *mut DialogueManager {
    Box::into_raw(Box::new(manager))
}

fn dialogue_handle(dialogue: Option<&mut Dialogue>) -> *mut Dialogue {
    dialogue.map_or(std::ptr::null_mut(), |d| d as *mut Dialogue)
}

/// Create an empty manager
#[no_mangle]
pub extern "C" fn floofy_manager_new() -> *mut DialogueManager {
    into_handle(DialogueManager::new())
}

/// Release a manager and every dialogue it owns
///
/// # Safety
/// `mgr` must be null or a manager from this library, not freed before.
#[no_mangle]
pub unsafe extern "C" fn floofy_manager_free(mgr: *mut DialogueManager) {
    if mgr.is_null() {
        return;
    }
    // SAFETY: the handle came from `Box::into_raw` and is released once
    drop(unsafe { Box::from_raw(mgr) });
}

/// Load a dialogue file. Returns null on any failure.
///
/// # Safety
/// `path` must point to `path_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_manager_read_file(path: *const u8, path_len: usize) -> *mut DialogueManager {
    // SAFETY: forwarded from the caller
    let Some(path) = (unsafe { str_arg(path, path_len) }) else {
        return std::ptr::null_mut();
    };
    DialogueManager::read_from_file(path).map_or(std::ptr::null_mut(), into_handle)
}

/// Parse a dialogue document from memory. Returns null on any failure.
///
/// # Safety
/// `contents` must point to `len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_manager_read_buffer(contents: *const u8, len: usize) -> *mut DialogueManager {
    // SAFETY: forwarded from the caller
    let Some(contents) = (unsafe { bytes_arg(contents, len) }) else {
        return std::ptr::null_mut();
    };
    DialogueManager::read_from_slice(contents).map_or(std::ptr::null_mut(), into_handle)
}

/// Save a manager to a file in the current format version
///
/// # Safety
/// `mgr` must be null or a live manager; `path` must point to `path_len`
/// readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_manager_write_file(
    mgr: *const DialogueManager,
    path: *const u8,
    path_len: usize,
) -> bool {
    // SAFETY: caller passes a live manager or null
    let Some(mgr) = (unsafe { mgr.as_ref() }) else {
        return false;
    };
    // SAFETY: forwarded from the caller
    let Some(path) = (unsafe { str_arg(path, path_len) }) else {
        return false;
    };
    match mgr.write_to_file(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to write dialogue file {}: {}", path, e);
            false
        }
    }
}

/// Serialize a manager to a string. Null on failure.
///
/// # Safety
/// `mgr` must be null or a live manager.
#[no_mangle]
pub unsafe extern "C" fn floofy_manager_write_buffer(mgr: *const DialogueManager, pretty: bool) -> FloofyString {
    // SAFETY: caller passes a live manager or null
    let Some(mgr) = (unsafe { mgr.as_ref() }) else {
        return FloofyString::null();
    };
    match mgr.write_to_string_with(&WriteOptions { pretty }) {
        Ok(contents) => FloofyString::from_string(contents),
        Err(e) => {
            tracing::warn!("Failed to serialize dialogues: {}", e);
            FloofyString::null()
        }
    }
}

/// Add a dialogue. Null if the name is taken.
///
/// # Safety
/// `mgr` must be null or a live manager; `name` must point to `name_len`
/// readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_manager_add_dialogue(
    mgr: *mut DialogueManager,
    name: *const u8,
    name_len: usize,
) -> *mut Dialogue {
    // SAFETY: caller passes a live manager or null
    let Some(mgr) = (unsafe { mgr.as_mut() }) else {
        return std::ptr::null_mut();
    };
    // SAFETY: forwarded from the caller
    let Some(name) = (unsafe { str_arg(name, name_len) }) else {
        return std::ptr::null_mut();
    };
    dialogue_handle(mgr.add_dialogue(name))
}

/// Hand a detached dialogue back to a manager.
///
/// On success the manager owns it again and the same pointer stays valid as
/// a borrowed handle. On a name clash the host keeps ownership.
///
/// # Safety
/// `mgr` must be null or a live manager; `dlg` must be null or a dialogue
/// returned by [`floofy_manager_remove_dialogue`] and not yet adopted or freed.
#[no_mangle]
pub unsafe extern "C" fn floofy_manager_adopt_dialogue(mgr: *mut DialogueManager, dlg: *mut Dialogue) -> bool {
    // SAFETY: caller passes a live manager or null
    let Some(mgr) = (unsafe { mgr.as_mut() }) else {
        return false;
    };
    if dlg.is_null() {
        return false;
    }
    // SAFETY: detached dialogues are boxes owned by the caller
    let dialogue = unsafe { Box::from_raw(dlg) };
    match mgr.adopt_dialogue(dialogue) {
        Ok(_) => true,
        Err(dialogue) => {
            // Ownership returns to the caller at the same address
            let _ = Box::into_raw(dialogue);
            false
        }
    }
}

/// Detach a dialogue by name. The host owns the result.
///
/// # Safety
/// `mgr` must be null or a live manager; `name` must point to `name_len`
/// readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_manager_remove_dialogue(
    mgr: *mut DialogueManager,
    name: *const u8,
    name_len: usize,
) -> *mut Dialogue {
    // SAFETY: caller passes a live manager or null
    let Some(mgr) = (unsafe { mgr.as_mut() }) else {
        return std::ptr::null_mut();
    };
    // SAFETY: forwarded from the caller
    let Some(name) = (unsafe { str_arg(name, name_len) }) else {
        return std::ptr::null_mut();
    };
    mgr.remove_dialogue(name)
        .map_or(std::ptr::null_mut(), Box::into_raw)
}

/// Rename a dialogue, keeping names unique
///
/// # Safety
/// `mgr` must be null or a live manager; both names must point to their
/// stated number of readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_manager_rename_dialogue(
    mgr: *mut DialogueManager,
    old: *const u8,
    old_len: usize,
    new: *const u8,
    new_len: usize,
) -> bool {
    // SAFETY: caller passes a live manager or null
    let Some(mgr) = (unsafe { mgr.as_mut() }) else {
        return false;
    };
    // SAFETY: forwarded from the caller
    let names = unsafe { (str_arg(old, old_len), str_arg(new, new_len)) };
    match names {
        (Some(old), Some(new)) => mgr.rename_dialogue(old, new),
        _ => false,
    }
}

/// Number of dialogues; 0 for a null manager
///
/// # Safety
/// `mgr` must be null or a live manager.
#[no_mangle]
pub unsafe extern "C" fn floofy_manager_num_dialogues(mgr: *const DialogueManager) -> usize {
    // SAFETY: caller passes a live manager or null
    unsafe { mgr.as_ref() }.map_or(0, DialogueManager::num_dialogues)
}

/// Look up a dialogue by name
///
/// # Safety
/// `mgr` must be null or a live manager; `name` must point to `name_len`
/// readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_manager_dialogue_named(
    mgr: *mut DialogueManager,
    name: *const u8,
    name_len: usize,
) -> *mut Dialogue {
    // SAFETY: caller passes a live manager or null
    let Some(mgr) = (unsafe { mgr.as_mut() }) else {
        return std::ptr::null_mut();
    };
    // SAFETY: forwarded from the caller
    let Some(name) = (unsafe { str_arg(name, name_len) }) else {
        return std::ptr::null_mut();
    };
    dialogue_handle(mgr.dialogue_mut(name))
}

/// Look up a dialogue by position. Null when out of range.
///
/// # Safety
/// `mgr` must be null or a live manager.
#[no_mangle]
pub unsafe extern "C" fn floofy_manager_dialogue_at(mgr: *mut DialogueManager, index: usize) -> *mut Dialogue {
    // SAFETY: caller passes a live manager or null
    let Some(mgr) = (unsafe { mgr.as_mut() }) else {
        return std::ptr::null_mut();
    };
    dialogue_handle(mgr.dialogue_at_mut(index))
}

/// Release a detached dialogue
///
/// # Safety
/// `dlg` must be null or a dialogue returned by
/// [`floofy_manager_remove_dialogue`] that no manager owns.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_free(dlg: *mut Dialogue) {
    if dlg.is_null() {
        return;
    }
    // SAFETY: detached dialogues are boxes owned by the caller
    drop(unsafe { Box::from_raw(dlg) });
}

/// Name of a dialogue
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_name(dlg: *const Dialogue) -> FloofyString {
    // SAFETY: caller passes a live dialogue or null
    let dialogue = unsafe { dlg.as_ref() };
    string_out(dialogue.map(Dialogue::name))
}

/// Numeric id of a dialogue within its manager; negative for null
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_id(dlg: *const Dialogue) -> i64 {
    // SAFETY: caller passes a live dialogue or null
    let dialogue = unsafe { dlg.as_ref() };
    id_out(dialogue.map(Dialogue::id))
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Participants, entries and choice edges, addressed by dialogue and id.
//!
//! Ids stay meaningful across mutation of the dialogue, unlike pointers into
//! it. Every function tolerates a null dialogue and unknown ids, answering
//! with [`FLOOFY_NULL_ID`], `false`, 0 or a null string.

use crate::guid::FloofyGuid;
use crate::marshal::{id_in, id_out, str_arg, string_out, FloofyString, FLOOFY_NULL_ID};
use floofy_dialogue::{
    Dialogue, DialogueChoice, DialogueChoiceId, DialogueEntry, EntryId, Participant, ParticipantId, Reaction,
    ViewPosition,
};

/// Reaction code reported for a missing entry
pub const FLOOFY_NO_REACTION: i32 = -1;

/// Borrow a dialogue handle
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
unsafe fn dialogue<'a>(dlg: *const Dialogue) -> Option<&'a Dialogue> {
    // SAFETY: forwarded from the caller
    unsafe { dlg.as_ref() }
}

/// Mutably borrow a dialogue handle
///
/// # Safety
/// `dlg` must be null or a live dialogue handle with no other borrow active.
unsafe fn dialogue_mut<'a>(dlg: *mut Dialogue) -> Option<&'a mut Dialogue> {
    // SAFETY: forwarded from the caller
    unsafe { dlg.as_mut() }
}

fn entry_mut(dlg: &mut Dialogue, entry: i64) -> Option<&mut DialogueEntry> {
    dlg.entry_mut(id_in(entry)?)
}

fn choice_mut(dlg: &mut Dialogue, choice: i64) -> Option<&mut DialogueChoice> {
    dlg.choice_mut(id_in(choice)?)
}

// Participants

/// Add a participant; returns its id
///
/// # Safety
/// `dlg` must be null or a live dialogue handle; `name` must point to
/// `name_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_add_participant(dlg: *mut Dialogue, name: *const u8, name_len: usize) -> i64 {
    // SAFETY: caller passes a live dialogue or null
    let Some(dlg) = (unsafe { dialogue_mut(dlg) }) else {
        return FLOOFY_NULL_ID;
    };
    // SAFETY: forwarded from the caller
    let Some(name) = (unsafe { str_arg(name, name_len) }) else {
        return FLOOFY_NULL_ID;
    };
    id_out(Some(dlg.add_participant(name)))
}

/// Number of participants
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_num_participants(dlg: *const Dialogue) -> usize {
    // SAFETY: caller passes a live dialogue or null
    unsafe { dialogue(dlg) }.map_or(0, Dialogue::num_participants)
}

/// Participant id by position
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_participant_at(dlg: *const Dialogue, index: usize) -> i64 {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    id_out(dlg.and_then(|d| d.participant_at(index)).map(Participant::id))
}

/// Id of the first participant with this name
///
/// # Safety
/// `dlg` must be null or a live dialogue handle; `name` must point to
/// `name_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_participant_named(
    dlg: *const Dialogue,
    name: *const u8,
    name_len: usize,
) -> i64 {
    // SAFETY: caller passes a live dialogue or null, and readable name bytes
    let (dlg, name) = unsafe { (dialogue(dlg), str_arg(name, name_len)) };
    let (Some(dlg), Some(name)) = (dlg, name) else {
        return FLOOFY_NULL_ID;
    };
    id_out(dlg.participant_named(name).map(Participant::id))
}

/// Remove every participant with this name; returns how many went
///
/// # Safety
/// `dlg` must be null or a live dialogue handle; `name` must point to
/// `name_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_remove_participant(
    dlg: *mut Dialogue,
    name: *const u8,
    name_len: usize,
) -> usize {
    // SAFETY: caller passes a live dialogue or null, and readable name bytes
    let (dlg, name) = unsafe { (dialogue_mut(dlg), str_arg(name, name_len)) };
    match (dlg, name) {
        (Some(dlg), Some(name)) => dlg.remove_participant(name),
        _ => 0,
    }
}

/// Participant name
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_participant_name(dlg: *const Dialogue, participant: i64) -> FloofyString {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    let participant = dlg.zip(id_in::<ParticipantId>(participant)).and_then(|(d, id)| d.participant(id));
    string_out(participant.map(|p| p.name.as_str()))
}

/// Rename a participant. Participant names need not be unique.
///
/// # Safety
/// `dlg` must be null or a live dialogue handle; `name` must point to
/// `name_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_participant_set_name(
    dlg: *mut Dialogue,
    participant: i64,
    name: *const u8,
    name_len: usize,
) -> bool {
    // SAFETY: caller passes a live dialogue or null, and readable name bytes
    let (dlg, name) = unsafe { (dialogue_mut(dlg), str_arg(name, name_len)) };
    let (Some(dlg), Some(name)) = (dlg, name) else {
        return false;
    };
    match id_in::<ParticipantId>(participant).and_then(|id| dlg.participant_mut(id)) {
        Some(p) => {
            p.name = name.to_string();
            true
        }
        None => false,
    }
}

// Entries

/// Add an entry spoken by `participant`; returns its id
///
/// # Safety
/// `dlg` must be null or a live dialogue handle; `text` must point to
/// `text_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_add_entry(
    dlg: *mut Dialogue,
    participant: i64,
    text: *const u8,
    text_len: usize,
) -> i64 {
    // SAFETY: caller passes a live dialogue or null, and readable text bytes
    let (dlg, text) = unsafe { (dialogue_mut(dlg), str_arg(text, text_len)) };
    let (Some(dlg), Some(text), Some(participant)) = (dlg, text, id_in::<ParticipantId>(participant)) else {
        return FLOOFY_NULL_ID;
    };
    id_out(Some(dlg.add_entry(participant, text)))
}

/// Number of entries
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_num_entries(dlg: *const Dialogue) -> usize {
    // SAFETY: caller passes a live dialogue or null
    unsafe { dialogue(dlg) }.map_or(0, Dialogue::num_entries)
}

/// Entry id by position
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_entry_at(dlg: *const Dialogue, index: usize) -> i64 {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    id_out(dlg.and_then(|d| d.entry_at(index)).map(DialogueEntry::id))
}

/// Remove the entry at a position
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_remove_entry_at(dlg: *mut Dialogue, index: usize) -> bool {
    // SAFETY: caller passes a live dialogue or null
    unsafe { dialogue_mut(dlg) }.is_some_and(|d| d.remove_entry_at(index).is_some())
}

/// Entry text
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_entry_text(dlg: *const Dialogue, entry: i64) -> FloofyString {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    let entry = dlg.zip(id_in::<EntryId>(entry)).and_then(|(d, id)| d.entry(id));
    string_out(entry.map(|e| e.text.as_str()))
}

/// Replace entry text
///
/// # Safety
/// `dlg` must be null or a live dialogue handle; `text` must point to
/// `text_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_entry_set_text(
    dlg: *mut Dialogue,
    entry: i64,
    text: *const u8,
    text_len: usize,
) -> bool {
    // SAFETY: caller passes a live dialogue or null, and readable text bytes
    let (dlg, text) = unsafe { (dialogue_mut(dlg), str_arg(text, text_len)) };
    let (Some(dlg), Some(text)) = (dlg, text) else {
        return false;
    };
    match entry_mut(dlg, entry) {
        Some(e) => {
            e.text = text.to_string();
            true
        }
        None => false,
    }
}

/// Id of the participant speaking an entry
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_entry_participant(dlg: *const Dialogue, entry: i64) -> i64 {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    let entry = dlg.zip(id_in::<EntryId>(entry)).and_then(|(d, id)| d.entry(id));
    id_out(entry.map(|e| e.active_participant))
}

/// Change who speaks an entry. The participant must exist.
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_entry_set_participant(dlg: *mut Dialogue, entry: i64, participant: i64) -> bool {
    // SAFETY: caller passes a live dialogue or null
    let Some(dlg) = (unsafe { dialogue_mut(dlg) }) else {
        return false;
    };
    let Some(participant) = id_in::<ParticipantId>(participant).filter(|id| dlg.participant(*id).is_some()) else {
        return false;
    };
    match entry_mut(dlg, entry) {
        Some(e) => {
            e.active_participant = participant;
            true
        }
        None => false,
    }
}

/// Editor position of an entry, written to `x` and `y`
///
/// # Safety
/// `dlg` must be null or a live dialogue handle; `x` and `y` must be null or
/// writable.
#[no_mangle]
pub unsafe extern "C" fn floofy_entry_position(dlg: *const Dialogue, entry: i64, x: *mut f64, y: *mut f64) -> bool {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    let Some(entry) = dlg.zip(id_in::<EntryId>(entry)).and_then(|(d, id)| d.entry(id)) else {
        return false;
    };
    // SAFETY: caller passes writable slots or null
    unsafe {
        if let Some(x) = x.as_mut() {
            *x = entry.position.x;
        }
        if let Some(y) = y.as_mut() {
            *y = entry.position.y;
        }
    }
    true
}

/// Move an entry in the editor view
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_entry_set_position(dlg: *mut Dialogue, entry: i64, x: f64, y: f64) -> bool {
    // SAFETY: caller passes a live dialogue or null
    let Some(dlg) = (unsafe { dialogue_mut(dlg) }) else {
        return false;
    };
    match entry_mut(dlg, entry) {
        Some(e) => {
            e.position = ViewPosition::new(x, y);
            true
        }
        None => false,
    }
}

/// Left reaction code, or [`FLOOFY_NO_REACTION`] for a missing entry
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_entry_left_reaction(dlg: *const Dialogue, entry: i64) -> i32 {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    dlg.zip(id_in::<EntryId>(entry))
        .and_then(|(d, id)| d.entry(id))
        .map_or(FLOOFY_NO_REACTION, |e| e.left_reaction.code())
}

/// Right reaction code, or [`FLOOFY_NO_REACTION`] for a missing entry
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_entry_right_reaction(dlg: *const Dialogue, entry: i64) -> i32 {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    dlg.zip(id_in::<EntryId>(entry))
        .and_then(|(d, id)| d.entry(id))
        .map_or(FLOOFY_NO_REACTION, |e| e.right_reaction.code())
}

/// Set the left reaction from its code. Unknown codes are rejected.
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_entry_set_left_reaction(dlg: *mut Dialogue, entry: i64, code: i32) -> bool {
    // SAFETY: caller passes a live dialogue or null
    let Some(dlg) = (unsafe { dialogue_mut(dlg) }) else {
        return false;
    };
    match (entry_mut(dlg, entry), Reaction::from_code(code)) {
        (Some(e), Some(reaction)) => {
            e.left_reaction = reaction;
            true
        }
        _ => false,
    }
}

/// Set the right reaction from its code. Unknown codes are rejected.
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_entry_set_right_reaction(dlg: *mut Dialogue, entry: i64, code: i32) -> bool {
    // SAFETY: caller passes a live dialogue or null
    let Some(dlg) = (unsafe { dialogue_mut(dlg) }) else {
        return false;
    };
    match (entry_mut(dlg, entry), Reaction::from_code(code)) {
        (Some(e), Some(reaction)) => {
            e.right_reaction = reaction;
            true
        }
        _ => false,
    }
}

/// Number of choices leaving an entry
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_entry_num_choices(dlg: *const Dialogue, entry: i64) -> usize {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    dlg.zip(id_in::<EntryId>(entry))
        .and_then(|(d, id)| d.entry(id))
        .map_or(0, DialogueEntry::num_choices)
}

/// Id of the `index`th choice leaving an entry
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_entry_choice_at(dlg: *const Dialogue, entry: i64, index: usize) -> i64 {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    let entry = dlg.zip(id_in::<EntryId>(entry)).and_then(|(d, id)| d.entry(id));
    id_out(entry.and_then(|e| e.choice_at(index)))
}

// Choice edges

/// Add a choice leaving `src` toward `dst` (negative for none).
///
/// Returns the choice id, or a negative value when `src` is not an entry of
/// this dialogue.
///
/// # Safety
/// `dlg` must be null or a live dialogue handle; `text` must point to
/// `text_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_add_choice(
    dlg: *mut Dialogue,
    src: i64,
    text: *const u8,
    text_len: usize,
    dst: i64,
) -> i64 {
    // SAFETY: caller passes a live dialogue or null, and readable text bytes
    let (dlg, text) = unsafe { (dialogue_mut(dlg), str_arg(text, text_len)) };
    let (Some(dlg), Some(text), Some(src)) = (dlg, text, id_in::<EntryId>(src)) else {
        return FLOOFY_NULL_ID;
    };
    id_out(dlg.add_choice(src, text, id_in(dst)))
}

/// Number of choices in a dialogue
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_num_choices(dlg: *const Dialogue) -> usize {
    // SAFETY: caller passes a live dialogue or null
    unsafe { dialogue(dlg) }.map_or(0, Dialogue::num_choices)
}

/// Choice id by position
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_choice_at(dlg: *const Dialogue, index: usize) -> i64 {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    id_out(dlg.and_then(|d| d.choice_at(index)).map(DialogueChoice::id))
}

/// Id of the first choice with this text
///
/// # Safety
/// `dlg` must be null or a live dialogue handle; `text` must point to
/// `text_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_choice_named(dlg: *const Dialogue, text: *const u8, text_len: usize) -> i64 {
    // SAFETY: caller passes a live dialogue or null, and readable text bytes
    let (dlg, text) = unsafe { (dialogue(dlg), str_arg(text, text_len)) };
    let (Some(dlg), Some(text)) = (dlg, text) else {
        return FLOOFY_NULL_ID;
    };
    id_out(dlg.choice_named(text).map(DialogueChoice::id))
}

/// Remove every choice with this text; returns how many went
///
/// # Safety
/// `dlg` must be null or a live dialogue handle; `text` must point to
/// `text_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_remove_choice(dlg: *mut Dialogue, text: *const u8, text_len: usize) -> usize {
    // SAFETY: caller passes a live dialogue or null, and readable text bytes
    let (dlg, text) = unsafe { (dialogue_mut(dlg), str_arg(text, text_len)) };
    match (dlg, text) {
        (Some(dlg), Some(text)) => dlg.remove_choice(text),
        _ => 0,
    }
}

/// Choice text
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_choice_text(dlg: *const Dialogue, choice: i64) -> FloofyString {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    let choice = dlg.zip(id_in::<DialogueChoiceId>(choice)).and_then(|(d, id)| d.choice(id));
    string_out(choice.map(|c| c.text.as_str()))
}

/// Replace choice text
///
/// # Safety
/// `dlg` must be null or a live dialogue handle; `text` must point to
/// `text_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_choice_set_text(
    dlg: *mut Dialogue,
    choice: i64,
    text: *const u8,
    text_len: usize,
) -> bool {
    // SAFETY: caller passes a live dialogue or null, and readable text bytes
    let (dlg, text) = unsafe { (dialogue_mut(dlg), str_arg(text, text_len)) };
    let (Some(dlg), Some(text)) = (dlg, text) else {
        return false;
    };
    match choice_mut(dlg, choice) {
        Some(c) => {
            c.text = text.to_string();
            true
        }
        None => false,
    }
}

/// Source entry of a choice
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_choice_source(dlg: *const Dialogue, choice: i64) -> i64 {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    let choice = dlg.zip(id_in::<DialogueChoiceId>(choice)).and_then(|(d, id)| d.choice(id));
    id_out(choice.map(DialogueChoice::source))
}

/// Destination entry of a choice; negative when it ends the dialogue
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_choice_destination(dlg: *const Dialogue, choice: i64) -> i64 {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    let choice = dlg.zip(id_in::<DialogueChoiceId>(choice)).and_then(|(d, id)| d.choice(id));
    id_out(choice.and_then(DialogueChoice::destination))
}

/// Retarget a choice. A negative `dst` clears it; otherwise `dst` must be an
/// entry of this dialogue.
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_choice_set_destination(dlg: *mut Dialogue, choice: i64, dst: i64) -> bool {
    // SAFETY: caller passes a live dialogue or null
    let Some(dlg) = (unsafe { dialogue_mut(dlg) }) else {
        return false;
    };
    let dst = id_in::<EntryId>(dst);
    if dst.is_some_and(|id| dlg.entry(id).is_none()) {
        return false;
    }
    match choice_mut(dlg, choice) {
        Some(c) => {
            c.set_destination(dst);
            true
        }
        None => false,
    }
}

/// Whether a choice carries a stable GUID
///
/// # Safety
/// `dlg` must be null or a live dialogue handle.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_choice_guid_assigned(dlg: *const Dialogue, choice: i64) -> bool {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    dlg.zip(id_in::<DialogueChoiceId>(choice))
        .and_then(|(d, id)| d.choice(id))
        .is_some_and(DialogueChoice::guid_assigned)
}

/// GUID of a choice, written to `out`. `false` when none was assigned.
///
/// # Safety
/// `dlg` must be null or a live dialogue handle; `out` must be null or
/// writable.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_choice_guid(dlg: *const Dialogue, choice: i64, out: *mut FloofyGuid) -> bool {
    // SAFETY: caller passes a live dialogue or null
    let dlg = unsafe { dialogue(dlg) };
    let guid = dlg
        .zip(id_in::<DialogueChoiceId>(choice))
        .and_then(|(d, id)| d.choice(id))
        .and_then(DialogueChoice::guid);
    let Some(guid) = guid else {
        return false;
    };
    // SAFETY: caller passes a writable slot or null
    if let Some(out) = unsafe { out.as_mut() } {
        *out = guid.into();
    }
    true
}

/// Assign a GUID to a choice if it has none, writing the current value to
/// `out`. Calling again leaves the GUID unchanged.
///
/// # Safety
/// `dlg` must be null or a live dialogue handle; `out` must be null or
/// writable.
#[no_mangle]
pub unsafe extern "C" fn floofy_dialogue_choice_assign_guid(dlg: *mut Dialogue, choice: i64, out: *mut FloofyGuid) -> bool {
    // SAFETY: caller passes a live dialogue or null
    let Some(dlg) = (unsafe { dialogue_mut(dlg) }) else {
        return false;
    };
    let Some(choice) = choice_mut(dlg, choice) else {
        return false;
    };
    let guid = choice.assign_guid();
    // SAFETY: caller passes a writable slot or null
    if let Some(out) = unsafe { out.as_mut() } {
        *out = guid.into();
    }
    true
}

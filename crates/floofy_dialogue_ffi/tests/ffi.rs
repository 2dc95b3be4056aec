// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drives the C surface the way a host would.

#![allow(unsafe_code)]

use floofy_dialogue_ffi::choices::*;
use floofy_dialogue_ffi::dialogues::*;
use floofy_dialogue_ffi::entities::*;
use floofy_dialogue_ffi::guid::*;
use floofy_dialogue_ffi::{floofy_string_free, FloofyGuid, FloofyString, FLOOFY_NULL_ID};

/// Copy a returned string and release it
fn take(value: FloofyString) -> Option<String> {
    let owned = value.as_str().map(str::to_string);
    // SAFETY: every string handed to this helper came from the library
    unsafe { floofy_string_free(value) };
    owned
}

#[test]
fn test_build_and_query_dialogue() {
    // SAFETY: all handles and buffers below are live for the duration of each call
    unsafe {
        let mgr = floofy_manager_new();
        let name = "Intro";
        let dlg = floofy_manager_add_dialogue(mgr, name.as_ptr(), name.len());
        assert!(!dlg.is_null());
        assert!(floofy_manager_add_dialogue(mgr, name.as_ptr(), name.len()).is_null());
        assert_eq!(take(floofy_dialogue_name(dlg)).as_deref(), Some("Intro"));

        let bob = floofy_dialogue_add_participant(dlg, "Bob".as_ptr(), 3);
        assert!(bob >= 0);
        let hello = "Hello there";
        let entry = floofy_dialogue_add_entry(dlg, bob, hello.as_ptr(), hello.len());
        assert_eq!(floofy_entry_participant(dlg, entry), bob);
        assert_eq!(take(floofy_entry_text(dlg, entry)).as_deref(), Some(hello));

        let text = "Wave";
        let choice = floofy_dialogue_add_choice(dlg, entry, text.as_ptr(), text.len(), FLOOFY_NULL_ID);
        assert!(choice >= 0);
        assert_eq!(floofy_dialogue_choice_source(dlg, choice), entry);
        assert_eq!(floofy_dialogue_choice_destination(dlg, choice), FLOOFY_NULL_ID);
        assert_eq!(floofy_entry_num_choices(dlg, entry), 1);
        assert_eq!(floofy_entry_choice_at(dlg, entry, 0), choice);

        assert!(floofy_dialogue_choice_set_destination(dlg, choice, entry));
        assert_eq!(floofy_dialogue_choice_destination(dlg, choice), entry);
        assert!(!floofy_dialogue_choice_set_destination(dlg, choice, 999));

        // Unknown source entry
        assert_eq!(
            floofy_dialogue_add_choice(dlg, 999, text.as_ptr(), text.len(), FLOOFY_NULL_ID),
            FLOOFY_NULL_ID
        );

        floofy_manager_free(mgr);
    }
}

#[test]
fn test_entry_attributes() {
    // SAFETY: all handles and buffers below are live for the duration of each call
    unsafe {
        let mgr = floofy_manager_new();
        let dlg = floofy_manager_add_dialogue(mgr, "D".as_ptr(), 1);
        let p = floofy_dialogue_add_participant(dlg, "P".as_ptr(), 1);
        let entry = floofy_dialogue_add_entry(dlg, p, "line".as_ptr(), 4);

        assert!(floofy_entry_set_position(dlg, entry, 12.5, -3.0));
        let (mut x, mut y) = (0.0, 0.0);
        assert!(floofy_entry_position(dlg, entry, &mut x, &mut y));
        assert_eq!((x, y), (12.5, -3.0));

        assert_eq!(floofy_entry_left_reaction(dlg, entry), 0);
        assert!(floofy_entry_set_left_reaction(dlg, entry, 3));
        assert!(floofy_entry_set_right_reaction(dlg, entry, 1));
        assert!(!floofy_entry_set_right_reaction(dlg, entry, 9));
        assert_eq!(floofy_entry_left_reaction(dlg, entry), 3);
        assert_eq!(floofy_entry_right_reaction(dlg, entry), 1);
        assert_eq!(floofy_entry_left_reaction(dlg, 999), FLOOFY_NO_REACTION);

        assert!(!floofy_entry_set_participant(dlg, entry, 999));
        let q = floofy_dialogue_add_participant(dlg, "Q".as_ptr(), 1);
        assert!(floofy_entry_set_participant(dlg, entry, q));
        assert_eq!(floofy_entry_participant(dlg, entry), q);

        assert!(floofy_dialogue_remove_entry_at(dlg, 0));
        assert_eq!(floofy_dialogue_num_entries(dlg), 0);
        assert!(!floofy_dialogue_remove_entry_at(dlg, 0));

        floofy_manager_free(mgr);
    }
}

#[test]
fn test_remove_and_adopt_keeps_handle() {
    // SAFETY: all handles and buffers below are live for the duration of each call
    unsafe {
        let mgr = floofy_manager_new();
        let dlg = floofy_manager_add_dialogue(mgr, "Roaming".as_ptr(), 7);
        floofy_dialogue_add_participant(dlg, "Bob".as_ptr(), 3);

        let removed = floofy_manager_remove_dialogue(mgr, "Roaming".as_ptr(), 7);
        assert_eq!(removed, dlg);
        assert_eq!(floofy_manager_num_dialogues(mgr), 0);

        assert!(floofy_manager_adopt_dialogue(mgr, removed));
        assert_eq!(floofy_manager_dialogue_named(mgr, "Roaming".as_ptr(), 7), dlg);
        assert_eq!(floofy_dialogue_num_participants(dlg), 1);

        // A clash leaves the detached dialogue with the host
        let detached = floofy_manager_remove_dialogue(mgr, "Roaming".as_ptr(), 7);
        floofy_manager_add_dialogue(mgr, "Roaming".as_ptr(), 7);
        assert!(!floofy_manager_adopt_dialogue(mgr, detached));
        floofy_dialogue_free(detached);

        floofy_manager_free(mgr);
    }
}

#[test]
fn test_buffer_and_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dialogues.json");
    let path = path.to_str().unwrap();

    // SAFETY: all handles and buffers below are live for the duration of each call
    unsafe {
        let mgr = floofy_manager_new();
        let dlg = floofy_manager_add_dialogue(mgr, "Saved".as_ptr(), 5);
        let p = floofy_dialogue_add_participant(dlg, "Ann".as_ptr(), 3);
        let e = floofy_dialogue_add_entry(dlg, p, "Hi".as_ptr(), 2);
        let c = floofy_dialogue_add_choice(dlg, e, "Bye".as_ptr(), 3, FLOOFY_NULL_ID);
        let mut guid = FloofyGuid::default();
        assert!(floofy_dialogue_choice_assign_guid(dlg, c, &mut guid));

        let contents = take(floofy_manager_write_buffer(mgr, false)).unwrap();
        let reloaded = floofy_manager_read_buffer(contents.as_ptr(), contents.len());
        assert!(!reloaded.is_null());
        let again = floofy_manager_dialogue_at(reloaded, 0);
        let mut stored = FloofyGuid::default();
        assert!(floofy_dialogue_choice_guid(again, c, &mut stored));
        assert!(floofy_guid_equal(guid, stored));
        floofy_manager_free(reloaded);

        assert!(floofy_manager_write_file(mgr, path.as_ptr(), path.len()));
        let loaded = floofy_manager_read_file(path.as_ptr(), path.len());
        assert_eq!(floofy_manager_num_dialogues(loaded), 1);
        let again = floofy_manager_dialogue_at(loaded, 0);
        assert_eq!(take(floofy_entry_text(again, e)).as_deref(), Some("Hi"));
        floofy_manager_free(loaded);

        floofy_manager_free(mgr);
    }
}

#[test]
fn test_malformed_input_yields_null() {
    let broken = r#"{"version":2,"eReactionVersion":1,"dialogues":[{"name":"x"}]}"#;
    let missing = "/definitely/not/here.json";
    // SAFETY: buffers are live locals
    unsafe {
        assert!(floofy_manager_read_buffer(broken.as_ptr(), broken.len()).is_null());
        assert!(floofy_manager_read_file(missing.as_ptr(), missing.len()).is_null());
        assert!(floofy_choices_read_file(missing.as_ptr(), missing.len()).is_null());
        let invalid = [0xff_u8, 0xfe];
        assert!(floofy_manager_read_buffer(invalid.as_ptr(), invalid.len()).is_null());
        assert!(floofy_choices_read_buffer(invalid.as_ptr(), invalid.len()).is_null());
        let empty = floofy_manager_read_buffer(std::ptr::null(), 0);
        assert_eq!(floofy_manager_num_dialogues(empty), 0);
        floofy_manager_free(empty);
    }
}

#[test]
fn test_null_handles_are_tolerated() {
    // SAFETY: every function accepts null handles
    unsafe {
        assert_eq!(floofy_manager_num_dialogues(std::ptr::null()), 0);
        assert!(floofy_manager_dialogue_at(std::ptr::null_mut(), 0).is_null());
        assert_eq!(floofy_dialogue_num_entries(std::ptr::null()), 0);
        assert_eq!(floofy_dialogue_add_participant(std::ptr::null_mut(), "x".as_ptr(), 1), FLOOFY_NULL_ID);
        assert!(take(floofy_dialogue_name(std::ptr::null())).is_none());
        floofy_manager_free(std::ptr::null_mut());
        floofy_dialogue_free(std::ptr::null_mut());
    }
}

#[test]
fn test_choice_registry() {
    // SAFETY: all handles and buffers below are live for the duration of each call
    unsafe {
        let mgr = floofy_choices_new();
        let first = floofy_choices_add(mgr, "Take the gold".as_ptr(), 13);
        assert!(!first.is_null());
        assert!(floofy_choices_add(mgr, "Take the gold".as_ptr(), 13).is_null());
        floofy_choices_add(mgr, "Spare the goblin".as_ptr(), 16);
        assert_eq!(floofy_choices_num(mgr), 2);
        assert_eq!(floofy_choice_id(first), 1);

        assert!(floofy_choices_rename(mgr, "Take the gold".as_ptr(), 13, "Leave".as_ptr(), 5));
        assert_eq!(take(floofy_choice_name(first)).as_deref(), Some("Leave"));

        let contents = take(floofy_choices_write_buffer(mgr, true)).unwrap();
        let reloaded = floofy_choices_read_buffer(contents.as_ptr(), contents.len());
        assert_eq!(floofy_choices_num(reloaded), 2);
        assert_eq!(floofy_choice_id(floofy_choices_at(reloaded, 1)), 2);
        floofy_choices_free(reloaded);

        let removed = floofy_choices_remove(mgr, "Leave".as_ptr(), 5);
        assert_eq!(removed, first);
        assert!(floofy_choices_named(mgr, "Leave".as_ptr(), 5).is_null());
        assert!(floofy_choices_adopt(mgr, removed));
        assert_eq!(floofy_choices_named(mgr, "Leave".as_ptr(), 5), first);

        floofy_choices_free(mgr);
    }
}

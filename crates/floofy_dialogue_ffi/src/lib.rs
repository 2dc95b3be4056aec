// SPDX-License-Identifier: MIT OR Apache-2.0
//! C-linkage bindings for `floofy_dialogue`.
//!
//! The editor UI and the game runtime load this library and drive the
//! dialogue model through plain functions:
//! - Managers, dialogues, choice registries and detached records are opaque
//!   pointers
//! - Participants, entries and dialogue choices are `(dialogue, i64 id)`
//!   pairs; a negative id is the null value
//! - Strings go in as `(ptr, len)` UTF-8 and come out as [`FloofyString`],
//!   released with [`floofy_string_free`]
//!
//! Failures come back as null pointers, negative ids or `false`; nothing
//! unwinds across the boundary. `include/floofy_dialogue.h` declares the
//! same surface for C hosts.

// The whole crate is the unsafe boundary
#![allow(unsafe_code)]

pub mod marshal;
pub mod dialogues;
pub mod entities;
pub mod guid;
pub mod choices;

pub use marshal::{floofy_string_free, FloofyString, FLOOFY_NULL_ID};
pub use guid::FloofyGuid;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "FLOOFY_LOG";

/// Install a log subscriber writing to stderr, filtered by `FLOOFY_LOG`.
///
/// Returns `false` if the host already installed one.
#[no_mangle]
pub extern "C" fn floofy_init_logging() -> bool {
    let env_filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("floofy_dialogue=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}

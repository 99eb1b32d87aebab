//! Libraries for reading Rivals of Aether replay files.
//!
//! ## Replay Files
//!
//! > Supported version range: replays with a fixed-width text header, as written by the game's
//! > 2018 releases
//!
//! roa-rec reads `.roa` replay files into match metadata, match rules, and one decoded action
//! stream per human player. Action streams are tokenized lazily, so a caller can stop reading a
//! player's inputs early.
//!
//! ```rust
//! use roa::Replay;
//! let input = std::fs::File::open("./crates/roa-rec/test/replays/sample.roa")
//!     .expect("failed to open file");
//!
//! let replay = Replay::read_from(input).expect("failed to parse file");
//! assert_eq!(replay.players().len(), 2);
//! assert_eq!(replay.players()[1].name(), "Matt");
//! ```
//!
//! ### Action tables
//!
//! Single-character action codes are mapped through an [`ActionTable`]. The built-in table
//! covers the common buttons and directions; replays that use other codes can be decoded with a
//! table loaded from JSON.
//!
//! ```rust
//! use roa::{ActionTable, Replay};
//! let table = ActionTable::from_json_reader(&br#"{ "J": "JumpPress", "j": "JumpRelease" }"#[..])
//!     .expect("invalid table");
//! let text = "101.3.041710201814300\n003030800\nHsomeone                         00000002\n4J 6j\n";
//! let replay = Replay::from_bytes(text.as_bytes(), &table).expect("failed to parse replay");
//! assert_eq!(replay.players()[0].frames().count(), 2);
//! ```
//!
//! ## Aggregated frames
//!
//! [`aggregate`] merges consecutive actions that share a frame into summed per-category count
//! vectors. These serialize to JSON as `[frame, [counts...]]` pairs.

#![deny(future_incompatible)]
#![deny(nonstandard_style)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused)]

pub use roa_rec as rec;
pub use roa_support as support;

pub use roa_rec::{
    aggregate, find_replays, read_replays, ActionTable, AggregatedFrame, Error, Player, Replay,
    ReportMode,
};

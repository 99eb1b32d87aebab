//! Read Rivals of Aether replay (`.roa`) files.
//!
//! A replay is a text file. The first line holds [`MetaData`], the second [`RuleData`]. After
//! that, every line starting with `H` describes a human player ([`PlayerInfo`]), and the line
//! after it is that player's action stream. Action streams are decoded lazily by
//! [`ActionTokens`], classified by an [`ActionTable`], and can be merged per frame with
//! [`aggregate`].
//!
//! ```rust
//! use roa_rec::{Character, Replay};
//!
//! let replay = Replay::read_from(std::fs::File::open("test/replays/sample.roa")?)?;
//! assert_eq!(replay.players().len(), 2);
//! assert_eq!(replay.players()[0].character(), Character::Zetterburn);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(future_incompatible)]
#![deny(nonstandard_style)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_code)]
#![warn(unused)]

mod action;
mod batch;
mod error;
mod frames;
mod header;
mod player;
mod report;
mod tokens;
mod types;

pub use action::{
    frame_to_duration, normalize_angle, Action, ActionTable, ActionType, ActionVector,
    AngleBucket, SimpleAction, FRAME_RATE,
};
pub use batch::{find_replays, read_replays, REPLAY_EXTENSION};
pub use error::Error;
pub use frames::{aggregate, Aggregate, AggregatedFrame};
pub use header::{MetaData, RuleData};
pub use player::{Player, PlayerInfo, HUMAN_PLAYER_MARKER};
pub use report::ReportMode;
pub use roa_support::FieldError;
pub use tokens::{is_angle_sentinel, ActionTokens, RawAction, ANGLE_CODE_LEN, ANGLE_SENTINEL};
pub use types::{Character, Stage, StageType};

use serde::Serialize;
use std::io::Read;
use std::time::Duration;

/// Result type for replay reading methods.
pub type Result<T> = std::result::Result<T, Error>;

/// A decoded replay file.
#[derive(Debug, Clone, Serialize)]
pub struct Replay {
    meta: MetaData,
    rules: RuleData,
    players: Vec<Player>,
}

impl Replay {
    /// Read a replay, classifying actions with the default [`ActionTable`].
    pub fn read_from(input: impl Read) -> Result<Self> {
        Self::read_with_table(input, &ActionTable::default())
    }

    /// Read a replay, classifying actions with a custom [`ActionTable`].
    pub fn read_with_table(mut input: impl Read, table: &ActionTable) -> Result<Self> {
        let mut bytes = vec![];
        input.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes, table)
    }

    /// Decode a replay that is already in memory.
    pub fn from_bytes(bytes: &[u8], table: &ActionTable) -> Result<Self> {
        let lines = split_lines(bytes);

        let meta_line = lines.first().ok_or(Error::MissingHeaderLine("metadata"))?;
        let meta = MetaData::read_from(meta_line).map_err(|err| err.on_line(1))?;
        log::debug!("Replay version {} recorded {}", meta.version, meta.timestamp);

        let rule_line = lines.get(1).ok_or(Error::MissingHeaderLine("rules"))?;
        let rules = RuleData::read_from(rule_line).map_err(|err| err.on_line(2))?;

        let mut players = vec![];
        let mut index = 2;
        while index < lines.len() {
            let line = lines[index];
            if line.first() != Some(&HUMAN_PLAYER_MARKER) {
                if !line.is_empty() {
                    log::warn!("Skipping non-player line {}", index + 1);
                }
                index += 1;
                continue;
            }

            let info = PlayerInfo::read_from(line).map_err(|err| err.on_line(index + 1))?;
            let action_line = lines
                .get(index + 1)
                .ok_or(Error::MissingActionLine(index + 1))?;
            let name = info.name.clone();
            let player = Player::from_info(info, action_line, table)
                .map_err(|err| err.for_player(&name, index + 2))?;
            players.push(player);
            index += 2;
        }

        Ok(Self {
            meta,
            rules,
            players,
        })
    }

    pub fn meta(&self) -> &MetaData {
        &self.meta
    }

    pub fn rules(&self) -> &RuleData {
        &self.rules
    }

    /// Human players, in file order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Length of the match, up to the last action of any player.
    pub fn duration(&self) -> Duration {
        self.players
            .iter()
            .filter_map(Player::last_frame)
            .max()
            .map(frame_to_duration)
            .unwrap_or_default()
    }
}

/// Split a file into lines, dropping `\n` / `\r\n` terminators.
fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    let mut lines = bytes
        .split(|&byte| byte == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .collect::<Vec<_>>();
    // a final terminator does not start another line
    if bytes.ends_with(b"\n") || bytes.is_empty() {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn sample() -> String {
        [
            "101.3.041710201814300",
            "003030800",
            &format!("H{:<32}000000{:02}", "first", 2),
            "12A 15a 20y090 R 40r",
            &format!("C{:<32}000000{:02}", "cpu", 5),
            "1A",
            &format!("H{:<32}000000{:02}", "second", 9),
            "3J j 30y271 ",
        ]
        .join("\r\n")
    }

    #[test]
    fn decodes_all_humans() -> anyhow::Result<()> {
        let replay = Replay::from_bytes(sample().as_bytes(), &ActionTable::default())?;
        assert!(replay.meta().is_starred);
        assert_eq!(replay.rules().stage, Stage::AirArmada);
        let names = replay
            .players()
            .iter()
            .map(Player::name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(replay.players()[1].actions().len(), 3);
        assert_eq!(
            replay.players()[1].actions()[2].action_type,
            ActionType::Angle270
        );
        assert_eq!(replay.duration(), frame_to_duration(40));
        Ok(())
    }

    #[test]
    fn fixture() -> anyhow::Result<()> {
        let replay = Replay::read_from(File::open("test/replays/sample.roa")?)?;
        assert_eq!(replay.meta().version, "01.3.04");
        assert_eq!(replay.rules().stock_count, 3);
        assert_eq!(replay.players().len(), 2);
        for player in replay.players() {
            let mut previous = 0;
            for action in player.actions() {
                assert!(action.frame >= previous);
                previous = action.frame;
            }
        }
        Ok(())
    }

    #[test]
    fn errors_carry_line_numbers() {
        let text = sample().replace("003030800", "003x30800");
        let err = Replay::from_bytes(text.as_bytes(), &ActionTable::default()).unwrap_err();
        assert!(matches!(err, Error::LineError(2, _)));
        assert!(matches!(err.root(), Error::FieldError(FieldError::NonNumericField { .. })));
    }

    #[test]
    fn errors_carry_player_names() {
        let text = sample().replace("3J j 30y271 ", "3J j 30Q");
        let err = Replay::from_bytes(text.as_bytes(), &ActionTable::default()).unwrap_err();
        match err {
            Error::PlayerError(name, line, inner) => {
                assert_eq!(name, "second");
                assert_eq!(line, 8);
                assert!(matches!(
                    *inner,
                    Error::UnknownActionCode { offset: 5, .. }
                ));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn missing_lines() {
        assert!(matches!(
            Replay::from_bytes(b"", &ActionTable::default()),
            Err(Error::MissingHeaderLine("metadata"))
        ));
        assert!(matches!(
            Replay::from_bytes(b"101.3.041710201814300\n", &ActionTable::default()),
            Err(Error::MissingHeaderLine("rules"))
        ));
        let text = format!("101.3.041710201814300\n003030800\nH{:<32}00000002\n", "x");
        assert!(matches!(
            Replay::from_bytes(text.as_bytes(), &ActionTable::default()),
            Err(Error::MissingActionLine(3))
        ));
    }

    #[test]
    fn line_splitting() {
        assert_eq!(split_lines(b"a\r\nb\n"), vec![&b"a"[..], &b"b"[..]]);
        assert_eq!(split_lines(b"a\n\nb"), vec![&b"a"[..], &b""[..], &b"b"[..]]);
        assert!(split_lines(b"").is_empty());
    }
}

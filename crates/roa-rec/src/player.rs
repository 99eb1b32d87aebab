use crate::action::{Action, ActionTable, ActionVector};
use crate::frames::{aggregate, Aggregate};
use crate::tokens::ActionTokens;
use crate::{Character, Result};
use roa_support::FixedWidthExt;
use serde::Serialize;
use std::time::Duration;

/// First byte of a human player's info line.
pub const HUMAN_PLAYER_MARKER: u8 = b'H';

/// Identity of a player, from their info line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerInfo {
    /// Player name, without padding. Up to 32 bytes.
    pub name: String,
    pub character: Character,
}

impl PlayerInfo {
    /// Parse a player info line.
    ///
    /// ```rust
    /// use roa_rec::{Character, PlayerInfo};
    ///
    /// let line = format!("H{:<32}{}{:02}", "lazerzes", "000000", 12);
    /// let info = PlayerInfo::read_from(line.as_bytes())?;
    /// assert_eq!(info.name, "lazerzes");
    /// assert_eq!(info.character, Character::Clairen);
    /// # Ok::<(), roa_rec::Error>(())
    /// ```
    pub fn read_from(line: &[u8]) -> Result<Self> {
        let name = line.padded_str_field(1..33)?;
        let character = Character::from_id(line.uint_field(39..41)?)?;
        Ok(Self { name, character })
    }
}

/// A human player and everything they did during the match.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    info: PlayerInfo,
    actions: Vec<Action>,
    #[serde(skip)]
    raw_actions: Vec<u8>,
}

impl Player {
    /// Decode a player from their info line and action line.
    ///
    /// Errors are not tagged with the player; [`crate::Replay`] does that.
    pub fn read_from(info_line: &[u8], action_line: &[u8], table: &ActionTable) -> Result<Self> {
        let info = PlayerInfo::read_from(info_line)?;
        Self::from_info(info, action_line, table)
    }

    pub(crate) fn from_info(
        info: PlayerInfo,
        action_line: &[u8],
        table: &ActionTable,
    ) -> Result<Self> {
        let actions = ActionTokens::new(action_line)
            .map(|token| table.classify(&token?))
            .collect::<Result<Vec<_>>>()?;
        log::debug!(
            "Player {} ({}): {} actions",
            info.name,
            info.character,
            actions.len()
        );
        Ok(Self {
            info,
            actions,
            raw_actions: action_line.to_vec(),
        })
    }

    pub fn info(&self) -> &PlayerInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn character(&self) -> Character {
        self.info.character
    }

    /// All actions, in stream order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Actions merged per run of identical frames.
    pub fn frames(&self) -> Aggregate<std::slice::Iter<'_, Action>> {
        aggregate(&self.actions)
    }

    /// Re-scan the raw action stream.
    pub fn tokens(&self) -> ActionTokens<'_> {
        ActionTokens::new(&self.raw_actions)
    }

    /// Frame of the last action, if the player did anything at all.
    pub fn last_frame(&self) -> Option<u32> {
        self.actions.last().map(|action| action.frame)
    }

    /// Time from the start of the match to the last action.
    pub fn duration(&self) -> Duration {
        self.actions
            .last()
            .map(Action::time_from_start)
            .unwrap_or_default()
    }

    /// How many actions of each kind the player did.
    pub fn totals(&self) -> ActionVector {
        self.actions.iter().map(|action| action.vector).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionType, Error, SimpleAction};
    use roa_support::FieldError;

    fn info_line(name: &str, character: u8) -> String {
        format!("H{:<32}000000{:02}", name, character)
    }

    #[test]
    fn decodes_a_player() -> anyhow::Result<()> {
        let player = Player::read_from(
            info_line("Player One", 2).as_bytes(),
            b"12A 15a 20y090 R 40r",
            &ActionTable::default(),
        )?;
        assert_eq!(player.name(), "Player One");
        assert_eq!(player.character(), Character::Zetterburn);
        let types = player
            .actions()
            .iter()
            .map(|action| (action.frame, action.action_type))
            .collect::<Vec<_>>();
        assert_eq!(
            types,
            vec![
                (12, ActionType::AttackPress),
                (15, ActionType::AttackRelease),
                (20, ActionType::Angle90),
                (20, ActionType::RightPress),
                (40, ActionType::RightRelease),
            ]
        );
        assert_eq!(player.frames().count(), 4);
        assert_eq!(player.last_frame(), Some(40));
        assert_eq!(player.totals()[SimpleAction::Release], 2);
        assert_eq!(player.tokens().count(), 5);
        Ok(())
    }

    #[test]
    fn name_keeps_inner_spaces() {
        let info = PlayerInfo::read_from(info_line("  a b", 3).as_bytes()).unwrap();
        assert_eq!(info.name, "  a b");
    }

    #[test]
    fn short_info_line() {
        let err = PlayerInfo::read_from(b"HPlayer").unwrap_err();
        assert!(matches!(
            err,
            Error::FieldError(FieldError::TruncatedRecord { .. })
        ));
    }

    #[test]
    fn unknown_character() {
        let err = PlayerInfo::read_from(info_line("x", 77).as_bytes()).unwrap_err();
        assert!(matches!(err, Error::UnknownCharacterId(77)));
    }

    #[test]
    fn idle_player() -> anyhow::Result<()> {
        let player = Player::read_from(info_line("afk", 5).as_bytes(), b"", &ActionTable::default())?;
        assert_eq!(player.last_frame(), None);
        assert_eq!(player.duration(), Duration::ZERO);
        assert_eq!(player.totals().total(), 0);
        Ok(())
    }
}

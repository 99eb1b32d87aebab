use crate::{Result, Stage, StageType};
use roa_support::FixedWidthExt;
use serde::Serialize;

/// Replay metadata, from the first line of the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaData {
    /// Whether the replay was starred (protected from auto-deletion) in game.
    pub is_starred: bool,
    /// Game version the replay was recorded with.
    pub version: String,
    /// Recording date and time, as stored by the game.
    pub timestamp: String,
}

impl MetaData {
    /// Parse the metadata line.
    ///
    /// ```rust
    /// use roa_rec::MetaData;
    ///
    /// let meta = MetaData::read_from(b"101.3.041710201814300")?;
    /// assert!(meta.is_starred);
    /// assert_eq!(meta.version, "01.3.04");
    /// # Ok::<(), roa_rec::Error>(())
    /// ```
    pub fn read_from(line: &[u8]) -> Result<Self> {
        let is_starred = line.flag_field(0..1)?;
        let version = line.str_field(1..8)?;
        let timestamp = line.str_field(8..21)?;
        Ok(Self {
            is_starred,
            version,
            timestamp,
        })
    }
}

/// Match rules, from the second line of the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleData {
    pub stage_type: StageType,
    pub stage: Stage,
    pub stock_count: u8,
    /// Time limit in minutes.
    pub time_limit: u8,
    pub teams: bool,
    pub friendly_fire: bool,
}

impl RuleData {
    /// Parse the rules line.
    pub fn read_from(line: &[u8]) -> Result<Self> {
        let stage_type = StageType::from_id(line.uint_field(0..1)?)?;
        let stage = Stage::from_id(line.uint_field(1..3)?)?;
        let stock_count = line.uint_field(3..5)?;
        let time_limit = line.uint_field(5..7)?;
        let teams = line.flag_field(7..8)?;
        let friendly_fire = line.flag_field(8..9)?;
        log::debug!(
            "Rules: {} {}, {} stocks, {} minutes",
            stage_type,
            stage,
            stock_count,
            time_limit
        );
        Ok(Self {
            stage_type,
            stage,
            stock_count,
            time_limit,
            teams,
            friendly_fire,
        })
    }
}

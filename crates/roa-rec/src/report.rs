//! Plain-text renderings of a replay.
use crate::{Replay, SimpleAction};
use comfy_table::Table;
use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// What to print for each action in [`Replay::write_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// `frame<TAB>ActionType`
    Actions,
    /// `frame<TAB>[counts...]`, the one-hot simple-action vector.
    Vectors,
}

/// An error when parsing a string to a report mode.
///
/// The field contains the string that could not be parsed.
#[derive(Debug)]
pub struct ParseReportModeError(String);

impl fmt::Display for ParseReportModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown report mode {:?} (must be actions/vectors)", self.0)
    }
}

impl Error for ParseReportModeError {}

impl FromStr for ReportMode {
    type Err = ParseReportModeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &s.to_lowercase()[..] {
            "actions" => Ok(ReportMode::Actions),
            "vectors" => Ok(ReportMode::Vectors),
            _ => Err(ParseReportModeError(String::from(s))),
        }
    }
}

impl Replay {
    /// Write a tab-separated report of the replay.
    ///
    /// ```rust
    /// use roa_rec::{ActionTable, Replay, ReportMode};
    ///
    /// let text = format!("101.3.041710201814300\n003030800\nH{:<32}00000002\n5J 9j\n", "me");
    /// let replay = Replay::from_bytes(text.as_bytes(), &ActionTable::default())?;
    /// let mut out = vec![];
    /// replay.write_report(&mut out, ReportMode::Actions)?;
    /// assert_eq!(
    ///     String::from_utf8(out)?,
    ///     "true\t01.3.04\t1710201814300\n\
    ///      Basic\tAir Armada\t3\t8\tfalse\tfalse\n\
    ///      me\tZetterburn\n\
    ///      5\tJumpPress\n\
    ///      9\tJumpRelease\n"
    /// );
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write_report<W: Write>(&self, output: &mut W, mode: ReportMode) -> io::Result<()> {
        let meta = self.meta();
        writeln!(
            output,
            "{}\t{}\t{}",
            meta.is_starred, meta.version, meta.timestamp
        )?;
        let rules = self.rules();
        writeln!(
            output,
            "{}\t{}\t{}\t{}\t{}\t{}",
            rules.stage_type,
            rules.stage,
            rules.stock_count,
            rules.time_limit,
            rules.teams,
            rules.friendly_fire
        )?;

        for player in self.players() {
            writeln!(output, "{}\t{}", player.name(), player.character())?;
            for action in player.actions() {
                match mode {
                    ReportMode::Actions => {
                        writeln!(output, "{}\t{}", action.frame, action.action_type)?
                    }
                    ReportMode::Vectors => writeln!(output, "{}\t{}", action.frame, action.vector)?,
                }
            }
        }
        Ok(())
    }

    /// A table with one row per player, counting their actions per category.
    pub fn summary_table(&self) -> Table {
        let mut table = Table::new();
        let mut header = vec!["Player".to_string(), "Character".to_string()];
        header.extend(SimpleAction::ALL.iter().map(ToString::to_string));
        header.push("Last frame".to_string());
        table.set_header(header);

        for player in self.players() {
            let totals = player.totals();
            let mut row = vec![player.name().to_string(), player.character().to_string()];
            row.extend(totals.counts().iter().map(ToString::to_string));
            row.push(
                player
                    .last_frame()
                    .map_or_else(|| "-".to_string(), |frame| frame.to_string()),
            );
            table.add_row(row);
        }
        table
    }
}

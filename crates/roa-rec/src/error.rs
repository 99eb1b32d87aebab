use roa_support::FieldError;
use std::io;

/// Errors that may occur while reading a replay file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IoError(#[from] io::Error),
    #[error(transparent)]
    FieldError(#[from] FieldError),
    #[error("unknown character id {0}")]
    UnknownCharacterId(u8),
    #[error("unknown stage type {0}")]
    UnknownStageType(u8),
    #[error("unknown stage id {0}")]
    UnknownStageId(u8),
    #[error("action at byte {0} has no frame number, and there is no earlier action to take one from")]
    MissingInitialFrame(usize),
    #[error("frame number at byte {0} runs into the end of the action stream")]
    TruncatedAction(usize),
    /// An explicit frame number went backwards.
    ///
    /// The game only ever writes frames in order, so a replay that breaks this is rejected as a
    /// whole rather than decoded with actions out of order.
    #[error("action at byte {offset} is on frame {frame}, but the previous action was on frame {previous}")]
    FrameOutOfOrder {
        offset: usize,
        frame: u32,
        previous: u32,
    },
    #[error("unknown action code {code:?} at byte {offset}")]
    UnknownActionCode { code: String, offset: usize },
    #[error("invalid action table key {0:?}, keys must be a single printable ASCII character that is not a digit or 'y'")]
    InvalidActionTable(String),
    #[error("Failed to parse action table JSON: {0}")]
    ActionTableJsonError(#[from] serde_json::Error),
    #[error("replay has no {0} line")]
    MissingHeaderLine(&'static str),
    #[error("player on line {0} has no action line after it")]
    MissingActionLine(usize),
    #[error("Failed decoding line {0}: {1}")]
    LineError(usize, Box<Error>),
    #[error("Failed decoding actions of player {0:?} on line {1}: {2}")]
    PlayerError(String, usize, Box<Error>),
}

impl Error {
    /// Attach a 1-based line number to a record error.
    pub(crate) fn on_line(self, line: usize) -> Self {
        Error::LineError(line, Box::new(self))
    }

    /// Attach the owning player to an action stream error.
    pub(crate) fn for_player(self, name: &str, line: usize) -> Self {
        Error::PlayerError(name.to_string(), line, Box::new(self))
    }

    /// The innermost error, with line and player context peeled off.
    pub fn root(&self) -> &Error {
        match self {
            Error::LineError(_, inner) | Error::PlayerError(_, _, inner) => inner.root(),
            other => other,
        }
    }
}

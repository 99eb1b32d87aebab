//! Splits a player's action stream into `(frame, code)` tokens.
//!
//! The stream has no delimiters. Each token is an optional run of ASCII digits (the frame
//! number), then a code, then one separator byte. A code is a single byte, unless it starts with
//! the angle sentinel `y`/`Y`, in which case it is the sentinel plus three more bytes. A token
//! without digits happens on the same frame as the token before it.
use crate::{Error, Result};
use roa_support::extract_uint;
use std::borrow::Cow;
use std::cmp::min;

/// First byte of a 4-byte angle code.
pub const ANGLE_SENTINEL: u8 = b'y';

/// Length of an angle code, including the sentinel.
pub const ANGLE_CODE_LEN: usize = 4;

/// Check whether `byte` starts an angle code.
#[inline]
pub fn is_angle_sentinel(byte: u8) -> bool {
    byte.eq_ignore_ascii_case(&ANGLE_SENTINEL)
}

/// A single token from an action stream, before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAction<'a> {
    /// Frame the action happened on.
    pub frame: u32,
    /// The code, with trailing whitespace removed. Either one byte, or an angle code.
    pub code: &'a [u8],
    /// Byte offset of the token in the action stream.
    pub offset: usize,
}

impl RawAction<'_> {
    /// Whether this is a 4-byte angle code.
    pub fn is_angle(&self) -> bool {
        self.code.first().copied().map_or(false, is_angle_sentinel)
    }

    /// The code as text, for display and error messages.
    pub fn code_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.code)
    }
}

/// Lazy iterator over the tokens of one player's action stream.
///
/// The iterator stops after yielding the first error. Cloning it, or creating a new one over the
/// same input, restarts the scan.
///
/// ```rust
/// use roa_rec::ActionTokens;
///
/// let tokens = ActionTokens::new(b"12a 34b")
///     .map(|token| token.map(|t| (t.frame, t.code)))
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(tokens, vec![(12, &b"a"[..]), (34, &b"b"[..])]);
/// # Ok::<(), roa_rec::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ActionTokens<'a> {
    input: &'a [u8],
    cursor: usize,
    /// Frame of the last token that was yielded.
    last_frame: Option<u32>,
    done: bool,
}

impl<'a> ActionTokens<'a> {
    /// Start scanning an action stream.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            cursor: 0,
            last_frame: None,
            done: false,
        }
    }

    /// Byte offset the next token starts at.
    pub fn position(&self) -> usize {
        self.cursor
    }

    fn fail(&mut self, err: Error) -> Option<Result<RawAction<'a>>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<'a> Iterator for ActionTokens<'a> {
    type Item = Result<RawAction<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done && self.cursor < self.input.len() {
            let start = self.cursor;
            let digits = self.input[start..]
                .iter()
                .take_while(|byte| byte.is_ascii_digit())
                .count();
            let code_start = start + digits;
            let first = match self.input.get(code_start) {
                Some(&first) => first,
                None => return self.fail(Error::TruncatedAction(start)),
            };

            let code_len = if is_angle_sentinel(first) {
                ANGLE_CODE_LEN
            } else {
                1
            };
            let code_end = min(code_start + code_len, self.input.len());
            // one separator byte follows every code
            self.cursor = code_start + code_len + 1;

            let frame = if digits == 0 {
                match self.last_frame {
                    Some(frame) => frame,
                    None => return self.fail(Error::MissingInitialFrame(start)),
                }
            } else {
                match extract_uint(self.input, start..code_start) {
                    Ok(frame) => frame,
                    Err(err) => return self.fail(err.into()),
                }
            };
            if let Some(previous) = self.last_frame.filter(|&previous| frame < previous) {
                return self.fail(Error::FrameOutOfOrder {
                    offset: start,
                    frame,
                    previous,
                });
            }
            self.last_frame = Some(frame);

            let code = trim_padding(&self.input[code_start..code_end]);
            if code.is_empty() {
                log::trace!("skipping padding at byte {}", start);
                continue;
            }

            let action = RawAction {
                frame,
                code,
                offset: start,
            };
            log::trace!("frame {}: {}", action.frame, action.code_str());
            return Some(Ok(action));
        }
        None
    }
}

impl std::iter::FusedIterator for ActionTokens<'_> {}

fn trim_padding(code: &[u8]) -> &[u8] {
    let len = code
        .iter()
        .rposition(|byte| !byte.is_ascii_whitespace())
        .map_or(0, |last| last + 1);
    &code[..len]
}

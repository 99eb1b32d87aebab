//! Classification of raw action codes.
//!
//! Single-byte codes are looked up in an [`ActionTable`]. Angle codes (`y` plus a three digit
//! magnitude) snap to the nearest multiple of 45 degrees and map to one of eight `Angle*` types.
//! Every [`ActionType`] belongs to one coarser [`SimpleAction`], which is what [`ActionVector`]s
//! count.
use crate::tokens::{is_angle_sentinel, RawAction, ANGLE_CODE_LEN};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Write};
use std::ops::{Add, AddAssign, Index};
use std::time::Duration;

/// Frames per second of game time.
pub const FRAME_RATE: u32 = 60;

/// Convert a frame number into time since the start of the match.
pub fn frame_to_duration(frame: u32) -> Duration {
    Duration::from_secs_f64(f64::from(frame) / f64::from(FRAME_RATE))
}

/// A classified input.
///
/// Uppercase codes in the default table press a button or direction, lowercase codes release it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionType {
    LeftPress,
    LeftRelease,
    RightPress,
    RightRelease,
    UpPress,
    UpRelease,
    DownPress,
    DownRelease,
    JumpPress,
    JumpRelease,
    AttackPress,
    AttackRelease,
    SpecialPress,
    SpecialRelease,
    StrongPress,
    StrongRelease,
    ShieldPress,
    ShieldRelease,
    TauntPress,
    TauntRelease,
    Angle0,
    Angle45,
    Angle90,
    Angle135,
    Angle180,
    Angle225,
    Angle270,
    Angle315,
}

impl ActionType {
    /// The coarse bucket this action is counted in.
    pub fn simple(self) -> SimpleAction {
        use ActionType::*;
        match self {
            LeftRelease | RightRelease | UpRelease | DownRelease | JumpRelease | AttackRelease
            | SpecialRelease | StrongRelease | ShieldRelease | TauntRelease => SimpleAction::Release,
            LeftPress => SimpleAction::Left,
            RightPress => SimpleAction::Right,
            UpPress => SimpleAction::Up,
            DownPress => SimpleAction::Down,
            JumpPress => SimpleAction::Jump,
            AttackPress | StrongPress => SimpleAction::Attack,
            SpecialPress => SimpleAction::Special,
            ShieldPress => SimpleAction::Shield,
            TauntPress => SimpleAction::Taunt,
            Angle0 | Angle45 | Angle90 | Angle135 | Angle180 | Angle225 | Angle270 | Angle315 => {
                SimpleAction::Aim
            }
        }
    }

    /// The angle bucket, for `Angle*` types.
    pub fn angle(self) -> Option<AngleBucket> {
        AngleBucket::ALL
            .iter()
            .copied()
            .find(|bucket| bucket.action_type() == self)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Coarse input categories, used as the positions of an [`ActionVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SimpleAction {
    Release,
    Left,
    Right,
    Up,
    Down,
    Jump,
    Attack,
    Special,
    Shield,
    Taunt,
    Aim,
}

impl SimpleAction {
    /// Number of categories, and the length of an [`ActionVector`].
    pub const COUNT: usize = 11;

    /// All categories, in vector order.
    pub const ALL: [SimpleAction; SimpleAction::COUNT] = [
        SimpleAction::Release,
        SimpleAction::Left,
        SimpleAction::Right,
        SimpleAction::Up,
        SimpleAction::Down,
        SimpleAction::Jump,
        SimpleAction::Attack,
        SimpleAction::Special,
        SimpleAction::Shield,
        SimpleAction::Taunt,
        SimpleAction::Aim,
    ];

    /// Position of this category in an [`ActionVector`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SimpleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Per-category action counts.
///
/// ```rust
/// use roa_rec::{ActionVector, SimpleAction};
///
/// let mut counts = ActionVector::one_hot(SimpleAction::Jump);
/// counts += ActionVector::one_hot(SimpleAction::Jump);
/// counts += ActionVector::one_hot(SimpleAction::Attack);
/// assert_eq!(counts[SimpleAction::Jump], 2);
/// assert_eq!(counts.total(), 3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionVector([u32; SimpleAction::COUNT]);

impl ActionVector {
    /// A vector with a single count in `simple`'s position.
    pub fn one_hot(simple: SimpleAction) -> Self {
        let mut counts = [0; SimpleAction::COUNT];
        counts[simple.index()] = 1;
        Self(counts)
    }

    /// The counts, in [`SimpleAction::ALL`] order.
    pub fn counts(&self) -> &[u32; SimpleAction::COUNT] {
        &self.0
    }

    /// Sum of all counts.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }
}

impl From<[u32; SimpleAction::COUNT]> for ActionVector {
    fn from(counts: [u32; SimpleAction::COUNT]) -> Self {
        Self(counts)
    }
}

impl Index<SimpleAction> for ActionVector {
    type Output = u32;
    fn index(&self, simple: SimpleAction) -> &u32 {
        &self.0[simple.index()]
    }
}

impl AddAssign for ActionVector {
    fn add_assign(&mut self, other: Self) {
        for (count, add) in self.0.iter_mut().zip(other.0.iter()) {
            *count += add;
        }
    }
}

impl Add for ActionVector {
    type Output = Self;
    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl std::iter::Sum for ActionVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl fmt::Display for ActionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Snap an angle magnitude to the nearest multiple of 45 degrees, with 360 wrapping to 0.
///
/// Magnitudes above 382 snap past 360 and are returned as-is, they have no bucket.
///
/// ```rust
/// use roa_rec::normalize_angle;
///
/// assert_eq!(normalize_angle(91), 90);
/// assert_eq!(normalize_angle(112), 90);
/// assert_eq!(normalize_angle(113), 135);
/// assert_eq!(normalize_angle(359), 0);
/// ```
pub fn normalize_angle(magnitude: u16) -> u16 {
    // integer magnitudes are never exactly halfway between two buckets
    let snapped = (u32::from(magnitude) + 22) / 45 * 45;
    match snapped {
        360 => 0,
        n => n as u16,
    }
}

/// One of the eight directions an angle code snaps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AngleBucket {
    Deg0,
    Deg45,
    Deg90,
    Deg135,
    Deg180,
    Deg225,
    Deg270,
    Deg315,
}

impl AngleBucket {
    /// All buckets, counter-clockwise from 0 degrees.
    pub const ALL: [AngleBucket; 8] = [
        AngleBucket::Deg0,
        AngleBucket::Deg45,
        AngleBucket::Deg90,
        AngleBucket::Deg135,
        AngleBucket::Deg180,
        AngleBucket::Deg225,
        AngleBucket::Deg270,
        AngleBucket::Deg315,
    ];

    /// The bucket for an already-normalized angle.
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        if degrees % 45 != 0 {
            return None;
        }
        Self::ALL.get(usize::from(degrees / 45)).copied()
    }

    /// The angle this bucket stands for.
    pub fn degrees(self) -> u16 {
        self as u16 * 45
    }

    /// The action type of an angle code in this bucket.
    pub fn action_type(self) -> ActionType {
        match self {
            AngleBucket::Deg0 => ActionType::Angle0,
            AngleBucket::Deg45 => ActionType::Angle45,
            AngleBucket::Deg90 => ActionType::Angle90,
            AngleBucket::Deg135 => ActionType::Angle135,
            AngleBucket::Deg180 => ActionType::Angle180,
            AngleBucket::Deg225 => ActionType::Angle225,
            AngleBucket::Deg270 => ActionType::Angle270,
            AngleBucket::Deg315 => ActionType::Angle315,
        }
    }
}

/// Maps single-byte action codes to action types.
///
/// The full set of codes the game writes is not documented. The default table covers the
/// directions and buttons seen in replays; a different table can be loaded from JSON, an object
/// mapping one-character strings to [`ActionType`] names:
///
/// ```rust
/// use roa_rec::{ActionTable, ActionType};
///
/// let table = ActionTable::from_json_reader(&br#"{ "A": "AttackPress", "x": "TauntPress" }"#[..])?;
/// assert_eq!(table.get('x'), Some(ActionType::TauntPress));
/// assert_eq!(table.get('L'), None);
/// # Ok::<(), roa_rec::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTable(BTreeMap<char, ActionType>);

impl ActionTable {
    /// A table with no codes at all.
    pub fn empty() -> Self {
        ActionTable(BTreeMap::new())
    }

    /// Check that `key` can appear as a single-byte code.
    fn is_valid_key(key: char) -> bool {
        key.is_ascii_graphic() && !key.is_ascii_digit() && !is_angle_sentinel(key as u8)
    }

    /// Add or replace a code. Returns the previous mapping.
    pub fn insert(&mut self, key: char, action_type: ActionType) -> Result<Option<ActionType>> {
        if !Self::is_valid_key(key) {
            return Err(Error::InvalidActionTable(key.to_string()));
        }
        Ok(self.0.insert(key, action_type))
    }

    /// Look up a code.
    pub fn get(&self, key: char) -> Option<ActionType> {
        self.0.get(&key).copied()
    }

    /// Number of codes in the table.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table has no codes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over codes in byte order.
    pub fn iter(&self) -> impl Iterator<Item = (char, ActionType)> + '_ {
        self.0.iter().map(|(&key, &action_type)| (key, action_type))
    }

    /// Read a table from JSON.
    pub fn from_json_reader(input: impl Read) -> Result<Self> {
        let entries: BTreeMap<String, ActionType> = serde_json::from_reader(input)?;
        Self::try_from(entries)
    }

    /// Write the table as JSON, in the format `from_json_reader` accepts.
    pub fn write_json(&self, output: impl Write) -> Result<()> {
        let entries = self
            .iter()
            .map(|(key, action_type)| (key.to_string(), action_type))
            .collect::<BTreeMap<_, _>>();
        serde_json::to_writer_pretty(output, &entries)?;
        Ok(())
    }

    /// Classify a token.
    ///
    /// ```rust
    /// use roa_rec::{ActionTable, ActionTokens, ActionType};
    ///
    /// let table = ActionTable::default();
    /// let token = ActionTokens::new(b"5y091 ").next().unwrap()?;
    /// let action = table.classify(&token)?;
    /// assert_eq!(action.frame, 5);
    /// assert_eq!(action.action_type, ActionType::Angle90);
    /// # Ok::<(), roa_rec::Error>(())
    /// ```
    pub fn classify(&self, raw: &RawAction<'_>) -> Result<Action> {
        let unknown = || Error::UnknownActionCode {
            code: raw.code_str().into_owned(),
            offset: raw.offset,
        };
        let action_type = match *raw.code {
            [sentinel, ref digits @ ..] if is_angle_sentinel(sentinel) => {
                if raw.code.len() != ANGLE_CODE_LEN || !digits.iter().all(u8::is_ascii_digit) {
                    return Err(unknown());
                }
                let magnitude = digits
                    .iter()
                    .fold(0u16, |n, digit| n * 10 + u16::from(digit - b'0'));
                AngleBucket::from_degrees(normalize_angle(magnitude))
                    .ok_or_else(unknown)?
                    .action_type()
            }
            [byte] if byte.is_ascii() => self.get(char::from(byte)).ok_or_else(unknown)?,
            _ => return Err(unknown()),
        };
        Ok(Action::new(raw.frame, raw.code_str().into_owned(), action_type))
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        use ActionType::*;
        let entries = [
            ('L', LeftPress),
            ('l', LeftRelease),
            ('R', RightPress),
            ('r', RightRelease),
            ('U', UpPress),
            ('u', UpRelease),
            ('D', DownPress),
            ('d', DownRelease),
            ('J', JumpPress),
            ('j', JumpRelease),
            ('A', AttackPress),
            ('a', AttackRelease),
            ('B', SpecialPress),
            ('b', SpecialRelease),
            ('C', StrongPress),
            ('c', StrongRelease),
            ('S', ShieldPress),
            ('s', ShieldRelease),
            ('T', TauntPress),
            ('t', TauntRelease),
        ];
        ActionTable(entries.into_iter().collect())
    }
}

impl TryFrom<BTreeMap<String, ActionType>> for ActionTable {
    type Error = Error;

    fn try_from(entries: BTreeMap<String, ActionType>) -> Result<Self> {
        let mut table = Self::empty();
        for (key, action_type) in entries {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    table.insert(c, action_type)?;
                }
                _ => return Err(Error::InvalidActionTable(key)),
            }
        }
        Ok(table)
    }
}

/// A classified action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    /// Frame the action happened on.
    pub frame: u32,
    /// The raw code, as written in the replay.
    pub code: String,
    pub action_type: ActionType,
    pub simple: SimpleAction,
    /// One-hot count vector for `simple`.
    pub vector: ActionVector,
}

impl Action {
    /// Create an action, deriving its simple category and vector from `action_type`.
    pub fn new(frame: u32, code: String, action_type: ActionType) -> Self {
        let simple = action_type.simple();
        Self {
            frame,
            code,
            action_type,
            simple,
            vector: ActionVector::one_hot(simple),
        }
    }

    /// Time since the start of the match.
    pub fn time_from_start(&self) -> Duration {
        frame_to_duration(self.frame)
    }

    /// Time between an earlier action and this one. Zero if `earlier` is not earlier.
    pub fn time_since(&self, earlier: &Action) -> Duration {
        frame_to_duration(self.frame.saturating_sub(earlier.frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActionTokens;

    fn classify(input: &[u8]) -> Result<Action> {
        let table = ActionTable::default();
        let token = ActionTokens::new(input).next().unwrap()?;
        table.classify(&token)
    }

    #[test]
    fn exact_angle() {
        let action = classify(b"5y090 ").unwrap();
        assert_eq!(action.frame, 5);
        assert_eq!(action.action_type, ActionType::Angle90);
        assert_eq!(action.simple, SimpleAction::Aim);
    }

    #[test]
    fn angle_rounds_to_nearest_bucket() {
        assert_eq!(classify(b"5y091 ").unwrap().action_type, ActionType::Angle90);
        assert_eq!(classify(b"5y022 ").unwrap().action_type, ActionType::Angle0);
        assert_eq!(classify(b"5y023 ").unwrap().action_type, ActionType::Angle45);
        assert_eq!(classify(b"5Y300 ").unwrap().action_type, ActionType::Angle315);
    }

    #[test]
    fn full_turn_wraps_to_zero() {
        assert_eq!(normalize_angle(360), 0);
        assert_eq!(classify(b"1y360").unwrap().action_type, ActionType::Angle0);
        assert_eq!(classify(b"1y382").unwrap().action_type, ActionType::Angle0);
    }

    #[test]
    fn normalization_is_idempotent() {
        for magnitude in 0..=382 {
            let once = normalize_angle(magnitude);
            assert!(AngleBucket::from_degrees(once).is_some(), "{}", magnitude);
            assert_eq!(normalize_angle(once), once);
        }
    }

    #[test]
    fn out_of_range_angle() {
        assert!(matches!(
            classify(b"1y383"),
            Err(Error::UnknownActionCode { ref code, offset: 0 }) if code == "y383"
        ));
    }

    #[test]
    fn malformed_angles() {
        assert!(matches!(classify(b"1y09"), Err(Error::UnknownActionCode { .. })));
        assert!(matches!(classify(b"1y0x0"), Err(Error::UnknownActionCode { .. })));
    }

    #[test]
    fn unknown_single_code() {
        assert!(matches!(
            classify(b"3Q"),
            Err(Error::UnknownActionCode { ref code, .. }) if code == "Q"
        ));
    }

    #[test]
    fn attacks_collapse() {
        assert_eq!(classify(b"1A").unwrap().simple, SimpleAction::Attack);
        assert_eq!(classify(b"1C").unwrap().simple, SimpleAction::Attack);
        assert_eq!(classify(b"1c").unwrap().simple, SimpleAction::Release);
    }

    #[test]
    fn vectors_are_one_hot() {
        let action = classify(b"1J").unwrap();
        assert_eq!(action.vector.total(), 1);
        assert_eq!(action.vector[SimpleAction::Jump], 1);
    }

    #[test]
    fn bucket_round_trip() {
        for bucket in AngleBucket::ALL {
            assert_eq!(AngleBucket::from_degrees(bucket.degrees()), Some(bucket));
            assert_eq!(bucket.action_type().angle(), Some(bucket));
        }
        assert_eq!(AngleBucket::from_degrees(360), None);
        assert_eq!(AngleBucket::from_degrees(10), None);
    }

    #[test]
    fn table_keys_are_validated() {
        let mut table = ActionTable::empty();
        assert!(table.insert('y', ActionType::JumpPress).is_err());
        assert!(table.insert('Y', ActionType::JumpPress).is_err());
        assert!(table.insert('7', ActionType::JumpPress).is_err());
        assert!(table.insert(' ', ActionType::JumpPress).is_err());
        assert!(table.insert('é', ActionType::JumpPress).is_err());
        assert_eq!(table.insert('x', ActionType::JumpPress).unwrap(), None);

        let multi = ActionTable::from_json_reader(&br#"{ "AB": "AttackPress" }"#[..]);
        assert!(matches!(multi, Err(Error::InvalidActionTable(ref key)) if key == "AB"));
    }

    #[test]
    fn table_json_round_trip() -> anyhow::Result<()> {
        let table = ActionTable::default();
        let mut json = vec![];
        table.write_json(&mut json)?;
        assert_eq!(ActionTable::from_json_reader(&json[..])?, table);
        Ok(())
    }

    #[test]
    fn timing() {
        let first = Action::new(30, "A".to_string(), ActionType::AttackPress);
        let second = Action::new(90, "a".to_string(), ActionType::AttackRelease);
        assert_eq!(first.time_from_start(), Duration::from_millis(500));
        assert_eq!(second.time_since(&first), Duration::from_secs(1));
        assert_eq!(first.time_since(&second), Duration::ZERO);
    }
}

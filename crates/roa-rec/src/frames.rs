use crate::action::{Action, ActionVector};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// The summed vectors of a run of consecutive actions on the same frame.
///
/// Serializes as a `[frame, [counts...]]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u32, ActionVector)", into = "(u32, ActionVector)")]
pub struct AggregatedFrame {
    pub frame: u32,
    pub vector: ActionVector,
}

impl From<(u32, ActionVector)> for AggregatedFrame {
    fn from((frame, vector): (u32, ActionVector)) -> Self {
        Self { frame, vector }
    }
}

impl From<AggregatedFrame> for (u32, ActionVector) {
    fn from(frame: AggregatedFrame) -> Self {
        (frame.frame, frame.vector)
    }
}

/// Iterator that merges consecutive actions sharing a frame. See [`aggregate`].
#[derive(Debug, Clone)]
pub struct Aggregate<I> {
    inner: I,
    pending: Option<AggregatedFrame>,
}

impl<I> Iterator for Aggregate<I>
where
    I: Iterator,
    I::Item: Borrow<Action>,
{
    type Item = AggregatedFrame;

    fn next(&mut self) -> Option<Self::Item> {
        for action in self.inner.by_ref() {
            let action = action.borrow();
            match &mut self.pending {
                Some(pending) if pending.frame == action.frame => {
                    pending.vector += action.vector;
                }
                pending => {
                    let started = AggregatedFrame {
                        frame: action.frame,
                        vector: action.vector,
                    };
                    if let Some(done) = pending.replace(started) {
                        return Some(done);
                    }
                }
            }
        }
        self.pending.take()
    }
}

/// Merge runs of consecutive actions on the same frame into one summed vector each.
///
/// Only *adjacent* actions are merged. If a frame shows up again after a different frame, it
/// starts a new entry rather than joining the earlier one.
///
/// ```rust
/// use roa_rec::{aggregate, Action, ActionType, SimpleAction};
///
/// let actions = [
///     Action::new(10, "J".into(), ActionType::JumpPress),
///     Action::new(10, "A".into(), ActionType::AttackPress),
///     Action::new(20, "j".into(), ActionType::JumpRelease),
///     Action::new(10, "a".into(), ActionType::AttackRelease),
/// ];
/// let frames = aggregate(&actions).collect::<Vec<_>>();
/// assert_eq!(frames.iter().map(|f| f.frame).collect::<Vec<_>>(), vec![10, 20, 10]);
/// assert_eq!(frames[0].vector[SimpleAction::Jump], 1);
/// assert_eq!(frames[0].vector[SimpleAction::Attack], 1);
/// ```
pub fn aggregate<I>(actions: I) -> Aggregate<I::IntoIter>
where
    I: IntoIterator,
    I::Item: Borrow<Action>,
{
    Aggregate {
        inner: actions.into_iter(),
        pending: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionType, SimpleAction};

    fn jump(frame: u32) -> Action {
        Action::new(frame, "J".to_string(), ActionType::JumpPress)
    }

    #[test]
    fn empty_input() {
        assert_eq!(aggregate(Vec::<Action>::new()).count(), 0);
    }

    #[test]
    fn last_run_is_emitted() {
        let frames = aggregate(vec![jump(1), jump(2), jump(2)]).collect::<Vec<_>>();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].frame, 2);
        assert_eq!(frames[1].vector[SimpleAction::Jump], 2);
    }

    #[test]
    fn repeated_frame_is_not_merged_across_runs() {
        let actions = vec![jump(10), jump(10), jump(20), jump(10)];
        let frames = aggregate(&actions).collect::<Vec<_>>();
        assert_eq!(
            frames.iter().map(|f| f.frame).collect::<Vec<_>>(),
            vec![10, 20, 10]
        );
        assert_eq!(frames[0].vector.total(), 2);
        assert_eq!(frames[2].vector.total(), 1);
    }

    #[test]
    fn length_matches_input_when_no_frames_repeat() {
        let actions = vec![jump(1), jump(2), jump(3)];
        assert_eq!(aggregate(&actions).count(), actions.len());
        let actions = vec![jump(1), jump(1), jump(3)];
        assert!(aggregate(&actions).count() < actions.len());
    }

    #[test]
    fn serializes_as_pairs() -> anyhow::Result<()> {
        let frames = aggregate(vec![jump(4)]).collect::<Vec<_>>();
        let json = serde_json::to_string(&frames)?;
        assert_eq!(json, "[[4,[0,0,0,0,0,1,0,0,0,0,0]]]");
        let back: Vec<AggregatedFrame> = serde_json::from_str(&json)?;
        assert_eq!(back, frames);
        Ok(())
    }
}

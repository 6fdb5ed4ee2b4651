use crate::animation::action::{Tween, TweenSpec};
use crate::animation::binding::TweenTargets;

/// Identifier handed out by [`TweenMixer::play`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum TweenEventKind {
    /// First frame: the start value was captured.
    Started,
    /// The end value was written; the tween has been removed.
    Completed,
    /// The target could not be read or written; the tween has been removed.
    Failed(String),
}

/// Lifecycle notification for a tween, tagged with the cue of its spec.
#[derive(Debug, Clone, PartialEq)]
pub struct TweenEvent<C> {
    pub id: TweenId,
    pub cue: C,
    pub kind: TweenEventKind,
}

/// Owns every playing tween and advances them once per frame.
///
/// Tweens added while events are being handled only start on the next
/// [`update`](Self::update), so a stage spawned from a completion event never
/// shares a frame with the stage that completed.
pub struct TweenMixer<C> {
    tweens: Vec<(TweenId, Tween<C>)>,
    next_id: u64,
}

impl<C> Default for TweenMixer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TweenMixer<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tweens: Vec::new(),
            next_id: 0,
        }
    }

    pub fn play(&mut self, spec: TweenSpec<C>) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.push((id, Tween::new(spec)));
        id
    }

    #[must_use]
    pub fn is_playing(&self, id: TweenId) -> bool {
        self.tweens.iter().any(|(t, _)| *t == id)
    }

    #[must_use]
    pub fn get(&self, id: TweenId) -> Option<&Tween<C>> {
        self.tweens.iter().find(|(t, _)| *t == id).map(|(_, tween)| tween)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

impl<C: PartialEq> TweenMixer<C> {
    /// Whether any tween tagged `cue` is still playing.
    #[must_use]
    pub fn is_playing_cue(&self, cue: C) -> bool {
        self.tweens.iter().any(|(_, t)| t.spec().cue == cue)
    }
}

impl<C: Copy> TweenMixer<C> {
    /// Advances all tweens by `dt` seconds, in the order they were played,
    /// and returns their lifecycle events in the same order.
    pub fn update(&mut self, dt: f32, targets: &mut dyn TweenTargets) -> Vec<TweenEvent<C>> {
        let mut events = Vec::new();

        self.tweens.retain_mut(|(id, tween)| {
            let cue = tween.spec().cue;
            let step = tween.update(dt, &mut *targets);

            if step.started {
                events.push(TweenEvent { id: *id, cue, kind: TweenEventKind::Started });
            }
            if let Some(what) = step.failure {
                events.push(TweenEvent { id: *id, cue, kind: TweenEventKind::Failed(what) });
                return false;
            }
            if step.finished {
                events.push(TweenEvent { id: *id, cue, kind: TweenEventKind::Completed });
                return false;
            }
            true
        });

        events
    }
}

use crate::animation::binding::{StartValue, TweenProperty, TweenTargets};
use crate::animation::easing::Easing;
use crate::animation::values::Interpolatable;

/// One immutable animation stage: a property, its end value, a duration and
/// the cue reported with its start and completion events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec<C> {
    pub property: TweenProperty,
    pub duration: f32,
    pub easing: Easing,
    pub cue: C,
}

impl<C> TweenSpec<C> {
    #[must_use]
    pub fn new(property: TweenProperty, duration: f32, cue: C) -> Self {
        Self {
            property,
            duration,
            easing: Easing::default(),
            cue,
        }
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TweenState {
    /// Created, start value not captured yet.
    Pending,
    Running(StartValue),
}

/// Outcome of advancing a tween by one frame.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Step {
    pub started: bool,
    pub finished: bool,
    pub failure: Option<String>,
}

/// A playing tween. Behaves like a clip in `LoopMode::Once`: time accumulates
/// until the duration is reached, then the end value is written and the tween
/// finishes.
#[derive(Debug, Clone)]
pub struct Tween<C> {
    spec: TweenSpec<C>,
    pub time: f32,
    pub(crate) state: TweenState,
}

impl<C> Tween<C> {
    #[must_use]
    pub fn new(spec: TweenSpec<C>) -> Self {
        Self {
            spec,
            time: 0.0,
            state: TweenState::Pending,
        }
    }

    #[must_use]
    pub fn spec(&self) -> &TweenSpec<C> {
        &self.spec
    }

    /// Linear progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.spec.duration <= 0.0 {
            return 1.0;
        }
        (self.time / self.spec.duration).clamp(0.0, 1.0)
    }

    /// Core logic: capture the start value on the first frame, advance time,
    /// write the eased value.
    pub(crate) fn update(&mut self, dt: f32, targets: &mut dyn TweenTargets) -> Step {
        let mut step = Step {
            started: false,
            finished: false,
            failure: None,
        };

        let start = match self.state {
            TweenState::Running(start) => start,
            TweenState::Pending => {
                let Some(start) = capture(&self.spec.property, targets) else {
                    step.failure = Some(self.spec.property.describe());
                    return step;
                };
                self.state = TweenState::Running(start);
                step.started = true;
                start
            }
        };

        self.time += dt.max(0.0);
        let progress = self.progress();
        let eased = self.spec.easing.apply(progress);

        if !apply(&self.spec.property, start, eased, targets) {
            step.failure = Some(self.spec.property.describe());
            return step;
        }

        step.finished = progress >= 1.0;
        step
    }
}

fn capture(property: &TweenProperty, targets: &dyn TweenTargets) -> Option<StartValue> {
    match *property {
        TweenProperty::Position { node, .. } => targets.position(node).map(StartValue::Position),
        TweenProperty::Opacity { element, .. } => {
            targets.opacity(element).map(StartValue::Opacity)
        }
    }
}

fn apply(property: &TweenProperty, start: StartValue, t: f32, targets: &mut dyn TweenTargets) -> bool {
    match (*property, start) {
        (TweenProperty::Position { node, to }, StartValue::Position(from)) => {
            targets.set_position(node, sample(from, to.resolve(from), t))
        }
        (TweenProperty::Opacity { element, to }, StartValue::Opacity(from)) => {
            targets.set_opacity(element, sample(from, to, t))
        }
        _ => false,
    }
}

/// The end value is written exactly once progress reaches 1.
fn sample<T: Interpolatable>(from: T, to: T, t: f32) -> T {
    if t >= 1.0 {
        to
    } else {
        T::interpolate_linear(from, to, t)
    }
}

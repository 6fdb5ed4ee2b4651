//! Load-and-reveal timeline
//!
//! Sequences the page from "assets loading" to "card open". The timeline
//! never advances tweens itself: it starts them on a [`TweenMixer`] and reacts
//! to the mixer's cue-tagged events through [`Timeline::on_tween_event`].
//!
//! ```text
//! Loading ──all settled──▶ Revealed ──overlay fade done──▶ CardClosed ──click──▶ CardOpen
//!
//! reveal:  OverlayFade ─┬─ started ──▶ CameraPan
//!                       └─ completed ─▶ overlay display:none, open button enabled
//! open:    CardSlide ── completed ──▶ CardSettle ─┬─ started ──▶ ButtonFade
//!                                                 │               └─ completed ─▶ swap buttons
//!                                                 └─ completed ─▶ settled
//! ```

use crate::animation::{TweenEvent, TweenEventKind, TweenMixer, TweenProperty, TweenSpec};
use crate::app::ui::{UiElement, UiSurface};
use crate::assets::progress::LoadProgress;
use crate::config::{MoveStage, TimelineConfig};
use crate::errors::{Result, SceneError};
use crate::scene::NodeHandle;

/// Labels of the tweens the timeline starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    OverlayFade,
    CameraPan,
    CardSlide,
    CardSettle,
    ButtonFade,
}

/// Page state. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UiState {
    Loading,
    /// Assets settled, reveal running.
    Revealed,
    /// Overlay hidden, the open button accepts clicks.
    CardClosed,
    /// The open chain was started.
    CardOpen,
}

/// Progress of the card motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStage {
    Idle,
    Sliding,
    Settling,
    Settled,
}

/// Progress of the open/map button swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStage {
    Shown,
    Fading,
    Swapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Started,
    /// The click arrived outside `CardClosed` and changed nothing.
    Ignored,
}

pub struct Timeline {
    config: TimelineConfig,
    camera: NodeHandle,
    card: Option<NodeHandle>,
    state: UiState,
    open_stage: OpenStage,
    button_stage: ButtonStage,
    camera_pan_started: bool,
    load_error: Option<String>,
}

impl Timeline {
    #[must_use]
    pub fn new(config: TimelineConfig, camera: NodeHandle) -> Self {
        Self {
            config,
            camera,
            card: None,
            state: UiState::Loading,
            open_stage: OpenStage::Idle,
            button_stage: ButtonStage::Shown,
            camera_pan_started: false,
            load_error: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn state(&self) -> UiState {
        self.state
    }

    #[must_use]
    pub fn open_stage(&self) -> OpenStage {
        self.open_stage
    }

    #[must_use]
    pub fn button_stage(&self) -> ButtonStage {
        self.button_stage
    }

    #[must_use]
    pub fn card(&self) -> Option<NodeHandle> {
        self.card
    }

    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Initial widget state: empty bar, open button inert, map button hidden.
    pub fn prepare(&self, ui: &mut dyn UiSurface) {
        ui.set_progress(0.0);
        ui.set_text(UiElement::ProgressText, "0%");
        ui.set_enabled(UiElement::OpenButton, false);
        ui.set_visible(UiElement::MapButton, false);
    }

    /// Sets the node the open chain moves.
    pub fn attach_card(&mut self, node: NodeHandle) {
        log::debug!("Card node attached: {node:?}");
        self.card = Some(node);
    }

    /// Writes the combined load progress to the bar and readout. Returns the
    /// percent.
    ///
    /// Once a required asset failed the readout keeps the error message.
    pub fn on_progress(&mut self, progress: LoadProgress, ui: &mut dyn UiSurface) -> u32 {
        let percent = progress.percent();
        if self.load_error.is_some() {
            return percent;
        }
        ui.set_progress(percent as f32);
        ui.set_text(UiElement::ProgressText, &format!("{percent}%"));
        percent
    }

    /// Starts the reveal. Only the first call has an effect; returns whether
    /// this call started it.
    pub fn on_all_assets_loaded(
        &mut self,
        mixer: &mut TweenMixer<Cue>,
        ui: &mut dyn UiSurface,
    ) -> bool {
        if self.state != UiState::Loading || self.load_error.is_some() {
            log::debug!("Reveal already handled, state {:?}", self.state);
            return false;
        }
        log::info!("All assets loaded, revealing scene");
        self.state = UiState::Revealed;
        ui.set_progress(100.0);
        ui.set_text(UiElement::ProgressText, "100%");
        mixer.play(self.fade(UiElement::LoadingOverlay, self.config.overlay_fade_duration, Cue::OverlayFade));
        true
    }

    /// A required asset failed for good: keep the overlay up and say so.
    pub fn on_load_failed(&mut self, error: &SceneError, ui: &mut dyn UiSurface) {
        log::error!("Scene cannot be revealed: {error}");
        let message = match error {
            SceneError::AssetLoad { asset, .. } => format!("Failed to load {asset}"),
            other => other.to_string(),
        };
        ui.set_text(UiElement::ProgressText, &message);
        self.load_error = Some(error.to_string());
    }

    /// Starts the open chain.
    ///
    /// Clicks outside `CardClosed` (before the reveal finished, or once the
    /// chain has started) are ignored. A click with no card node attached is an
    /// error.
    pub fn on_open_clicked(&mut self, mixer: &mut TweenMixer<Cue>) -> Result<OpenOutcome> {
        if self.state != UiState::CardClosed {
            log::warn!("Open click ignored in state {:?}", self.state);
            return Ok(OpenOutcome::Ignored);
        }
        let card = self.card.ok_or_else(|| {
            SceneError::AnimationTargetUnavailable("card node is not attached".into())
        })?;

        log::info!("Opening card");
        self.state = UiState::CardOpen;
        self.open_stage = OpenStage::Sliding;
        mixer.play(self.move_to(card, self.config.card_slide, Cue::CardSlide));
        Ok(OpenOutcome::Started)
    }

    /// Dispatches a mixer event. Events that do not match the current stage
    /// are dropped.
    pub fn on_tween_event(
        &mut self,
        event: &TweenEvent<Cue>,
        mixer: &mut TweenMixer<Cue>,
        ui: &mut dyn UiSurface,
    ) {
        let done = match &event.kind {
            TweenEventKind::Started => {
                log::debug!("{:?} started", event.cue);
                false
            }
            TweenEventKind::Completed => {
                log::debug!("{:?} completed", event.cue);
                true
            }
            TweenEventKind::Failed(what) => {
                log::error!("{:?} lost its target ({what}), continuing", event.cue);
                true
            }
        };

        match (event.cue, done) {
            (Cue::OverlayFade, false) => self.start_camera_pan(mixer),
            (Cue::OverlayFade, true) if self.state == UiState::Revealed => {
                // A fade that failed before starting never triggered the pan.
                self.start_camera_pan(mixer);
                ui.set_displayed(UiElement::LoadingOverlay, false);
                ui.set_enabled(UiElement::OpenButton, true);
                self.state = UiState::CardClosed;
                log::info!("Scene revealed");
            }
            (Cue::CardSlide, true) if self.open_stage == OpenStage::Sliding => {
                self.open_stage = OpenStage::Settling;
                if let Some(card) = self.card {
                    mixer.play(self.move_to(card, self.config.card_settle, Cue::CardSettle));
                }
            }
            (Cue::CardSettle, false) => self.start_button_fade(mixer),
            (Cue::CardSettle, true) if self.open_stage == OpenStage::Settling => {
                self.start_button_fade(mixer);
                self.open_stage = OpenStage::Settled;
            }
            (Cue::ButtonFade, true) if self.button_stage == ButtonStage::Fading => {
                ui.set_visible(UiElement::OpenButton, false);
                ui.set_visible(UiElement::MapButton, true);
                self.button_stage = ButtonStage::Swapped;
                log::info!("Card open");
            }
            _ => {}
        }
    }

    // ========================================================================
    // Stage builders
    // ========================================================================

    fn start_camera_pan(&mut self, mixer: &mut TweenMixer<Cue>) {
        if self.camera_pan_started {
            return;
        }
        self.camera_pan_started = true;
        mixer.play(self.move_to(self.camera, self.config.camera_pan, Cue::CameraPan));
    }

    fn start_button_fade(&mut self, mixer: &mut TweenMixer<Cue>) {
        if self.button_stage != ButtonStage::Shown {
            return;
        }
        self.button_stage = ButtonStage::Fading;
        mixer.play(self.fade(UiElement::OpenButton, self.config.button_fade_duration, Cue::ButtonFade));
    }

    fn move_to(&self, node: NodeHandle, stage: MoveStage, cue: Cue) -> TweenSpec<Cue> {
        TweenSpec::new(TweenProperty::Position { node, to: stage.to }, stage.duration, cue)
            .with_easing(self.config.easing)
    }

    fn fade(&self, element: UiElement, duration: f32, cue: Cue) -> TweenSpec<Cue> {
        TweenSpec::new(TweenProperty::Opacity { element, to: 0.0 }, duration, cue)
            .with_easing(self.config.easing)
    }
}

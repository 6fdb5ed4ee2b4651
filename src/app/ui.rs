//! UI surface
//!
//! The page elements the timeline drives, behind [`UiSurface`]. The browser
//! implementation lives in `app::web`; [`HeadlessUi`] records state for
//! native hosts and tests.

use rustc_hash::FxHashMap;

use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiElement {
    /// `<progress>` widget, value in `0..=100`.
    ProgressBar,
    /// Percent readout next to the bar.
    ProgressText,
    /// Container holding the bar and readout.
    LoadingOverlay,
    OpenButton,
    MapButton,
}

impl UiElement {
    pub const ALL: [UiElement; 5] = [
        UiElement::ProgressBar,
        UiElement::ProgressText,
        UiElement::LoadingOverlay,
        UiElement::OpenButton,
        UiElement::MapButton,
    ];
}

/// Capability interface over the page.
///
/// `displayed` maps to CSS `display` (layout removal), `visible` to CSS
/// `visibility`.
pub trait UiSurface {
    fn set_progress(&mut self, value: f32);

    fn set_text(&mut self, element: UiElement, text: &str);

    fn opacity(&self, element: UiElement) -> Option<f32>;

    /// Returns `false` when the element is gone.
    fn set_opacity(&mut self, element: UiElement, opacity: f32) -> bool;

    fn set_displayed(&mut self, element: UiElement, displayed: bool);

    fn set_visible(&mut self, element: UiElement, visible: bool);

    fn set_enabled(&mut self, element: UiElement, enabled: bool);

    /// Opens `url` in a new browsing context.
    fn open_url(&mut self, url: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementState {
    pub opacity: f32,
    pub displayed: bool,
    pub visible: bool,
    pub enabled: bool,
    pub text: String,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            displayed: true,
            visible: true,
            enabled: true,
            text: String::new(),
        }
    }
}

/// Discrete UI changes, in the order they were made. Opacity writes happen
/// every frame during a fade and are not logged.
#[derive(Debug, Clone, PartialEq)]
pub enum UiChange {
    Progress(f32),
    Text(UiElement, String),
    Displayed(UiElement, bool),
    Visible(UiElement, bool),
    Enabled(UiElement, bool),
    OpenedUrl(String),
}

/// In-memory UI surface.
#[derive(Debug, Default)]
pub struct HeadlessUi {
    elements: FxHashMap<UiElement, ElementState>,
    progress: f32,
    changes: Vec<UiChange>,
}

impl HeadlessUi {
    #[must_use]
    pub fn new() -> Self {
        let elements = UiElement::ALL
            .iter()
            .map(|&el| (el, ElementState::default()))
            .collect();
        Self {
            elements,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn element(&self, element: UiElement) -> Option<&ElementState> {
        self.elements.get(&element)
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[must_use]
    pub fn text(&self, element: UiElement) -> &str {
        self.elements.get(&element).map_or("", |s| s.text.as_str())
    }

    #[must_use]
    pub fn changes(&self) -> &[UiChange] {
        &self.changes
    }

    /// Drops an element so later writes to it fail.
    pub fn remove(&mut self, element: UiElement) {
        self.elements.remove(&element);
    }

    #[must_use]
    pub fn opened_urls(&self) -> Vec<&str> {
        self.changes
            .iter()
            .filter_map(|c| match c {
                UiChange::OpenedUrl(url) => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    fn state_mut(&mut self, element: UiElement) -> Option<&mut ElementState> {
        self.elements.get_mut(&element)
    }
}

impl UiSurface for HeadlessUi {
    fn set_progress(&mut self, value: f32) {
        self.progress = value;
        self.changes.push(UiChange::Progress(value));
    }

    fn set_text(&mut self, element: UiElement, text: &str) {
        if let Some(state) = self.state_mut(element) {
            state.text = text.to_string();
            self.changes.push(UiChange::Text(element, text.to_string()));
        }
    }

    fn opacity(&self, element: UiElement) -> Option<f32> {
        self.elements.get(&element).map(|s| s.opacity)
    }

    fn set_opacity(&mut self, element: UiElement, opacity: f32) -> bool {
        match self.state_mut(element) {
            Some(state) => {
                state.opacity = opacity;
                true
            }
            None => false,
        }
    }

    fn set_displayed(&mut self, element: UiElement, displayed: bool) {
        if let Some(state) = self.state_mut(element) {
            state.displayed = displayed;
            self.changes.push(UiChange::Displayed(element, displayed));
        }
    }

    fn set_visible(&mut self, element: UiElement, visible: bool) {
        if let Some(state) = self.state_mut(element) {
            state.visible = visible;
            self.changes.push(UiChange::Visible(element, visible));
        }
    }

    fn set_enabled(&mut self, element: UiElement, enabled: bool) {
        if let Some(state) = self.state_mut(element) {
            state.enabled = enabled;
            self.changes.push(UiChange::Enabled(element, enabled));
        }
    }

    fn open_url(&mut self, url: &str) -> Result<()> {
        log::info!("Opening {url}");
        self.changes.push(UiChange::OpenedUrl(url.to_string()));
        Ok(())
    }
}

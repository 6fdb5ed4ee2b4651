//! Application Context Module
//!
//! [`AppContext`] owns everything the page touches for its whole lifetime:
//! the composed scene, orbit controls, pointer input, the tween mixer, the
//! loading manager, the timeline and the two capability seams (UI surface and
//! render backend). Frontends (the browser runtime in `app::web`, the headless
//! demo, tests) construct one and drive it with [`AppContext::frame`].
//!
//! # Frame routine
//!
//! 1. Drain load updates into the timeline and scene
//! 2. Advance tweens and dispatch their events
//! 3. Update orbit controls from input
//! 4. Propagate world matrices
//! 5. Clear, then render
//!
//! # Example
//!
//! ```rust,ignore
//! use card_scene::{AppContext, SceneConfig};
//! use card_scene::app::{HeadlessUi, NullRenderer};
//!
//! let mut ctx = AppContext::new(SceneConfig::default(), HeadlessUi::new(), NullRenderer::new(), 1280, 720);
//! ctx.start_loading()?;
//! loop {
//!     ctx.frame(1.0 / 60.0);
//! }
//! ```

use std::sync::Arc;

use glam::Vec3;

use crate::animation::{TweenEvent, TweenMixer, TweenTargets};
use crate::app::input::Input;
use crate::app::render::RenderBackend;
use crate::app::ui::{UiElement, UiSurface};
use crate::assets::{
    AssetId, AssetReader, AssetRequest, LoadUpdate, LoadedAsset, LoadingManager, Prefab,
};
use crate::config::SceneConfig;
use crate::errors::Result;
use crate::scene::{NodeHandle, PrefabInstance, Scene, compose_scene};
use crate::timeline::{Cue, OpenOutcome, Timeline, UiState};
use crate::utils::OrbitControls;

pub struct AppContext<U: UiSurface, R: RenderBackend> {
    pub config: SceneConfig,
    pub scene: Scene,
    pub camera: NodeHandle,
    /// Group the card model is instantiated under.
    pub card_root: NodeHandle,
    pub controls: OrbitControls,
    pub input: Input,
    pub mixer: TweenMixer<Cue>,
    pub loading: LoadingManager,
    pub timeline: Timeline,
    pub ui: U,
    pub renderer: R,

    model: Option<PrefabInstance>,
    model_asset: AssetId,
    environment_asset: AssetId,
    frame_count: u64,
}

impl<U: UiSurface, R: RenderBackend> AppContext<U, R> {
    /// Composes the scene for a `width` x `height` viewport and registers the
    /// model and environment map. Loading starts with
    /// [`start_loading`](Self::start_loading).
    pub fn new(config: SceneConfig, mut ui: U, mut renderer: R, width: u32, height: u32) -> Self {
        let aspect = if height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        let composed = compose_scene(&config, aspect);

        let mut loading = LoadingManager::new(config.assets.max_retries);
        let model_asset = loading.register(AssetRequest::model(config.assets.model.clone()));
        let environment_asset = loading.register(AssetRequest::environment(
            config.assets.environment.clone(),
            config.assets.environment_required,
        ));

        let timeline = Timeline::new(config.timeline.clone(), composed.camera);
        timeline.prepare(&mut ui);

        renderer.configure(&config.render);

        let mut input = Input::new();
        input.inject_resize(width, height);

        Self {
            controls: OrbitControls::from_config(&config.controls),
            scene: composed.scene,
            camera: composed.camera,
            card_root: composed.card_root,
            input,
            mixer: TweenMixer::new(),
            loading,
            timeline,
            ui,
            renderer,
            model: None,
            model_asset,
            environment_asset,
            frame_count: 0,
            config,
        }
    }

    /// Spawns the asset reads against the configured asset root.
    pub fn start_loading(&mut self) -> Result<()> {
        let reader = AssetReader::from_root(&self.config.assets.root)?;
        self.loading.start(&reader);
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> UiState {
        self.timeline.state()
    }

    #[must_use]
    pub fn model_asset(&self) -> AssetId {
        self.model_asset
    }

    #[must_use]
    pub fn environment_asset(&self) -> AssetId {
        self.environment_asset
    }

    #[must_use]
    pub fn model(&self) -> Option<&PrefabInstance> {
        self.model.as_ref()
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[must_use]
    pub fn camera_position(&self) -> Vec3 {
        self.scene
            .get_node(self.camera)
            .map_or(Vec3::ZERO, |n| n.transform.position)
    }

    /// Runs one frame of `dt` seconds.
    pub fn frame(&mut self, dt: f32) {
        for update in self.loading.poll() {
            self.handle_load_update(update);
        }

        let events = self.advance_tweens(dt);
        for event in &events {
            self.timeline.on_tween_event(event, &mut self.mixer, &mut self.ui);
        }

        let fov = self
            .scene
            .cameras
            .get(self.camera)
            .map_or(self.config.camera.fov, |c| c.fov.to_degrees());
        if let Some(node) = self.scene.get_node_mut(self.camera) {
            self.controls.update(&mut node.transform, &self.input, fov, dt);
        }
        self.input.end_frame();

        self.scene.update_matrix_world();

        self.renderer.clear();
        self.renderer.render(&self.scene, self.camera);
        self.frame_count += 1;
    }

    fn advance_tweens(&mut self, dt: f32) -> Vec<TweenEvent<Cue>> {
        let mut targets = TargetView {
            scene: &mut self.scene,
            ui: &mut self.ui,
        };
        self.mixer.update(dt, &mut targets)
    }

    /// Viewport change: camera aspect, renderer size and capped pixel ratio.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) {
        if height > 0
            && let Some(camera) = self.scene.camera_mut(self.camera)
        {
            camera.set_aspect(width as f32 / height as f32);
        }
        let pixel_ratio = device_pixel_ratio.min(self.config.render.max_pixel_ratio);
        self.renderer.resize(width, height, pixel_ratio);
        self.input.inject_resize(width, height);
    }

    /// Handles a button click.
    pub fn click(&mut self, element: UiElement) -> Result<()> {
        match element {
            UiElement::OpenButton => self.open_card().map(|_| ()),
            UiElement::MapButton => {
                let url = self.config.ui.map_url.clone();
                self.ui.open_url(&url)
            }
            _ => Ok(()),
        }
    }

    pub fn open_card(&mut self) -> Result<OpenOutcome> {
        self.timeline.on_open_clicked(&mut self.mixer)
    }

    // ========================================================================
    // Load updates
    // ========================================================================

    pub fn handle_load_update(&mut self, update: LoadUpdate) {
        match update {
            LoadUpdate::Progress(progress) => {
                self.timeline.on_progress(progress, &mut self.ui);
            }
            LoadUpdate::Loaded {
                asset: LoadedAsset::Model(prefab),
                ..
            } => self.install_model(&prefab),
            LoadUpdate::Loaded {
                asset: LoadedAsset::Environment(map),
                ..
            } => {
                log::info!("Environment map {}x{} applied", map.width, map.height);
                self.scene.environment.set_env_map(Some(Arc::new(map)));
            }
            LoadUpdate::Failed {
                required, error, ..
            } => {
                if required {
                    self.timeline.on_load_failed(&error, &mut self.ui);
                } else {
                    log::warn!("Continuing without optional asset: {error}");
                }
            }
            LoadUpdate::AllSettled(summary) => {
                if summary.can_reveal() {
                    self.timeline.on_all_assets_loaded(&mut self.mixer, &mut self.ui);
                } else {
                    log::error!("Reveal blocked: {} asset(s) failed", summary.failed);
                }
            }
        }
    }

    /// Instantiates the card model under the card root, applies the material
    /// overrides and hands the animated node to the timeline.
    fn install_model(&mut self, prefab: &Prefab) {
        let instance = self.scene.instantiate(prefab, self.card_root);

        let card = &self.config.card;
        let mut overridden = 0;
        for &handle in &instance.nodes {
            if let Some(mesh) = self.scene.meshes.get_mut(handle) {
                let material = &mut mesh.material;
                material.normal_scale = card.normal_scale;
                if let Some(sampling) = material.base_color_map.as_mut() {
                    sampling.min_filter = card.map_min_filter;
                    sampling.mag_filter = card.map_mag_filter;
                }
                overridden += 1;
            }
        }
        log::info!("Card model '{}' installed, {overridden} mesh(es)", prefab.name);

        let animated = match &card.animated_node {
            Some(name) => self.scene.find_by_name(instance.root, name),
            None => instance.top_level.first().copied(),
        };
        match animated {
            Some(node) => self.timeline.attach_card(node),
            None => log::error!(
                "Card model has no animatable node ({:?})",
                card.animated_node
            ),
        }

        self.model = Some(instance);
    }
}

/// Tween targets resolved against the scene graph and the UI surface.
struct TargetView<'a, U: UiSurface> {
    scene: &'a mut Scene,
    ui: &'a mut U,
}

impl<U: UiSurface> TweenTargets for TargetView<'_, U> {
    fn position(&self, node: NodeHandle) -> Option<Vec3> {
        self.scene.get_node(node).map(|n| n.transform.position)
    }

    fn set_position(&mut self, node: NodeHandle, value: Vec3) -> bool {
        match self.scene.get_node_mut(node) {
            Some(n) => {
                n.transform.position = value;
                true
            }
            None => false,
        }
    }

    fn opacity(&self, element: UiElement) -> Option<f32> {
        self.ui.opacity(element)
    }

    fn set_opacity(&mut self, element: UiElement, value: f32) -> bool {
        self.ui.set_opacity(element, value)
    }
}

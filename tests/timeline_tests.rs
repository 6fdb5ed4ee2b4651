//! Timeline Integration Tests
//!
//! Drives a headless [`AppContext`] frame by frame with injected load events.
//!
//! Tests for:
//! - Progress readout (25% at 50 of 200 bytes, pending assets weighted in)
//! - Reveal: overlay fade, deferred hide, camera pan, single firing
//! - Open chain: stage order, button swap after the fade, click guards
//! - Load failures: optional environment, required model

use std::sync::Arc;

use glam::Vec3;

use card_scene::animation::TweenMixer;
use card_scene::app::{HeadlessUi, NullRenderer, UiChange, UiElement};
use card_scene::assets::{LoadEvent, LoadProgress, LoadedAsset, Prefab, PrefabNode};
use card_scene::config::SceneConfig;
use card_scene::engine::AppContext;
use card_scene::errors::SceneError;
use card_scene::scene::{
    EnvironmentMap, EnvironmentMapping, FilterMode, Geometry, Material, Mesh, Scene,
    TextureSampling, Transform,
};
use card_scene::timeline::{ButtonStage, Cue, OpenOutcome, OpenStage, Timeline, UiState};

type Ctx = AppContext<HeadlessUi, NullRenderer>;

const DT: f32 = 1.0 / 60.0;
const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Fixtures
// ============================================================================

fn card_prefab() -> Prefab {
    let mut material = Material::new_standard();
    material.has_normal_map = true;
    material.base_color_map = Some(TextureSampling::default());

    Prefab {
        name: "Scene".into(),
        nodes: vec![
            PrefabNode {
                name: Some("Card".into()),
                transform: Transform::new(),
                children_indices: vec![1],
                mesh: None,
            },
            PrefabNode {
                name: Some("Paper".into()),
                transform: Transform::new(),
                children_indices: vec![],
                mesh: Some(Mesh::new(
                    "Paper",
                    Geometry::Imported {
                        mesh_index: 0,
                        primitive_index: 0,
                    },
                    material,
                )),
            },
        ],
        root_indices: vec![0],
        source: Arc::from(Vec::<u8>::new()),
    }
}

/// A card whose single mesh carries two primitives with their own materials.
const LAYERED_GLTF: &str = r#"{
    "asset": { "version": "2.0" },
    "scenes": [{ "nodes": [0] }],
    "nodes": [{ "name": "Card", "mesh": 0 }],
    "meshes": [{
        "name": "Paper",
        "primitives": [
            { "attributes": { "POSITION": 0 }, "material": 0 },
            { "attributes": { "POSITION": 0 }, "material": 1 }
        ]
    }],
    "materials": [
        { "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } } },
        { "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } } }
    ],
    "textures": [{ "source": 0 }],
    "images": [{ "uri": "card.png" }],
    "accessors": [{
        "bufferView": 0,
        "componentType": 5126,
        "count": 3,
        "type": "VEC3",
        "min": [0.0, 0.0, 0.0],
        "max": [1.0, 1.0, 0.0]
    }],
    "bufferViews": [{ "buffer": 0, "byteLength": 36 }],
    "buffers": [{ "byteLength": 36, "uri": "card.bin" }]
}"#;

fn environment_map() -> EnvironmentMap {
    EnvironmentMap {
        name: "ENV.hdr".into(),
        width: 1,
        height: 1,
        texels: vec![1.0, 1.0, 1.0, 1.0],
        mapping: EnvironmentMapping::EquirectangularReflection,
    }
}

fn new_ctx() -> Ctx {
    AppContext::new(
        SceneConfig::default(),
        HeadlessUi::new(),
        NullRenderer::new(),
        1280,
        720,
    )
}

fn send(ctx: &Ctx, event: LoadEvent) {
    ctx.loading.sender().send(event).unwrap();
}

fn deliver_all(ctx: &Ctx) {
    send(
        ctx,
        LoadEvent::Loaded {
            id: ctx.model_asset(),
            asset: LoadedAsset::Model(card_prefab()),
        },
    );
    send(
        ctx,
        LoadEvent::Loaded {
            id: ctx.environment_asset(),
            asset: LoadedAsset::Environment(environment_map()),
        },
    );
}

/// Runs frames until `done` holds or `max_frames` elapse. Returns whether
/// `done` was reached.
fn run_until(ctx: &mut Ctx, max_frames: usize, mut done: impl FnMut(&Ctx) -> bool) -> bool {
    for _ in 0..max_frames {
        ctx.frame(DT);
        if done(ctx) {
            return true;
        }
    }
    false
}

fn revealed_ctx() -> Ctx {
    let mut ctx = new_ctx();
    deliver_all(&ctx);
    assert!(run_until(&mut ctx, 200, |c| c.state() == UiState::CardClosed));
    ctx
}

fn card_position(ctx: &Ctx) -> Vec3 {
    let card = ctx.timeline.card().expect("card attached");
    ctx.scene.get_node(card).unwrap().transform.position
}

fn element(ctx: &Ctx, el: UiElement) -> &card_scene::app::ui::ElementState {
    ctx.ui.element(el).unwrap()
}

// ============================================================================
// Initial state & progress
// ============================================================================

#[test]
fn prepare_sets_initial_widgets() {
    let ctx = new_ctx();
    assert_eq!(ctx.state(), UiState::Loading);
    assert_eq!(ctx.ui.text(UiElement::ProgressText), "0%");
    assert!(!element(&ctx, UiElement::OpenButton).enabled);
    assert!(!element(&ctx, UiElement::MapButton).visible);
    assert!(element(&ctx, UiElement::LoadingOverlay).displayed);
}

fn send_progress(ctx: &Ctx, id: card_scene::assets::AssetId, loaded: u64, total: u64) {
    send(
        ctx,
        LoadEvent::Progress {
            id,
            progress: LoadProgress::new(loaded, total),
        },
    );
}

#[test]
fn progress_50_of_200_reads_25_percent() {
    let mut ctx = new_ctx();
    send_progress(&ctx, ctx.model_asset(), 50, 200);
    send_progress(&ctx, ctx.environment_asset(), 50, 200);
    ctx.frame(DT);

    assert!(approx(ctx.ui.progress(), 25.0));
    assert_eq!(ctx.ui.text(UiElement::ProgressText), "25%");
    assert_eq!(ctx.state(), UiState::Loading);
}

#[test]
fn finished_model_alone_reads_half() {
    let mut ctx = new_ctx();
    send_progress(&ctx, ctx.model_asset(), 500, 500);
    ctx.frame(DT);
    assert_eq!(ctx.ui.text(UiElement::ProgressText), "50%");
    assert_eq!(ctx.state(), UiState::Loading);

    send_progress(&ctx, ctx.environment_asset(), 0, 5_000);
    ctx.frame(DT);
    assert_eq!(ctx.ui.text(UiElement::ProgressText), "50%");
    assert!(approx(ctx.ui.progress(), 50.0));
}

#[test]
fn progress_floors_instead_of_rounding() {
    let mut ctx = new_ctx();
    send_progress(&ctx, ctx.model_asset(), 199, 200);
    send_progress(&ctx, ctx.environment_asset(), 199, 200);
    ctx.frame(DT);
    assert_eq!(ctx.ui.text(UiElement::ProgressText), "99%");
}

// ============================================================================
// Reveal
// ============================================================================

#[test]
fn reveal_waits_for_every_asset() {
    let mut ctx = new_ctx();
    send(
        &ctx,
        LoadEvent::Loaded {
            id: ctx.model_asset(),
            asset: LoadedAsset::Model(card_prefab()),
        },
    );
    for _ in 0..30 {
        ctx.frame(DT);
    }
    assert_eq!(ctx.state(), UiState::Loading);
    assert!(ctx.mixer.is_empty());

    send(
        &ctx,
        LoadEvent::Loaded {
            id: ctx.environment_asset(),
            asset: LoadedAsset::Environment(environment_map()),
        },
    );
    ctx.frame(DT);
    assert_eq!(ctx.state(), UiState::Revealed);
    assert!(ctx.scene.environment.has_env_map());
}

#[test]
fn overlay_fades_before_it_is_hidden() {
    let mut ctx = new_ctx();
    deliver_all(&ctx);

    let mut saw_partial_fade = false;
    let hidden = run_until(&mut ctx, 200, |c| {
        let overlay = element(c, UiElement::LoadingOverlay);
        if overlay.displayed && overlay.opacity > 0.0 && overlay.opacity < 1.0 {
            saw_partial_fade = true;
        }
        if !overlay.displayed {
            assert_eq!(overlay.opacity, 0.0, "hidden before the fade finished");
        }
        !overlay.displayed
    });

    assert!(hidden);
    assert!(saw_partial_fade);
    assert_eq!(ctx.state(), UiState::CardClosed);
    assert!(element(&ctx, UiElement::OpenButton).enabled);
}

#[test]
fn overlay_hide_happens_about_one_second_after_reveal() {
    let mut ctx = new_ctx();
    deliver_all(&ctx);
    ctx.frame(DT);
    assert_eq!(ctx.state(), UiState::Revealed);

    let mut frames = 1;
    while ctx.state() == UiState::Revealed && frames < 200 {
        ctx.frame(DT);
        frames += 1;
    }
    assert!((59..=62).contains(&frames), "hidden after {frames} frames");
}

#[test]
fn camera_pans_toward_target() {
    let mut ctx = new_ctx();
    let start = ctx.camera_position();
    assert!(approx(start.z, 12.0));

    deliver_all(&ctx);
    for _ in 0..30 {
        ctx.frame(DT);
    }
    let midway = ctx.camera_position();
    assert!(midway.x < start.x);
    assert!(midway.y > start.y);

    for _ in 0..240 {
        ctx.frame(DT);
    }
    let end = ctx.camera_position();
    // The tween aims at (-5, 5, 12); the controls keep the camera within 12 units.
    let aim = Vec3::new(-5.0, 5.0, 12.0).normalize() * 12.0;
    assert!(end.distance(aim) < 1e-2, "camera ended at {end}");
    assert!(!ctx.mixer.is_playing_cue(Cue::CameraPan));
}

#[test]
fn camera_pan_runs_alongside_fade() {
    let mut ctx = new_ctx();
    deliver_all(&ctx);
    for _ in 0..10 {
        ctx.frame(DT);
    }
    assert!(ctx.mixer.is_playing_cue(Cue::OverlayFade));
    assert!(ctx.mixer.is_playing_cue(Cue::CameraPan));
}

#[test]
fn reveal_fires_once() {
    let mut scene = Scene::new();
    let camera = scene.create_node_with_name("Camera");
    let mut timeline = Timeline::new(SceneConfig::default().timeline, camera);
    let mut mixer = TweenMixer::new();
    let mut ui = HeadlessUi::new();

    assert!(timeline.on_all_assets_loaded(&mut mixer, &mut ui));
    assert!(!timeline.on_all_assets_loaded(&mut mixer, &mut ui));
    assert_eq!(mixer.len(), 1);
}

#[test]
fn late_load_events_do_not_restart_reveal() {
    let mut ctx = revealed_ctx();
    deliver_all(&ctx);
    ctx.frame(DT);
    assert_eq!(ctx.state(), UiState::CardClosed);
    assert!(!element(&ctx, UiElement::LoadingOverlay).displayed);
    assert!(!ctx.mixer.is_playing_cue(Cue::OverlayFade));
}

// ============================================================================
// Open chain
// ============================================================================

#[test]
fn card_node_is_first_model_root() {
    let ctx = revealed_ctx();
    let card = ctx.timeline.card().unwrap();
    assert_eq!(ctx.scene.get_node(card).unwrap().name, "Card");
    let model = ctx.model().unwrap();
    assert_eq!(model.top_level, vec![card]);
}

#[test]
fn material_overrides_are_applied() {
    let ctx = revealed_ctx();
    let paper = ctx.scene.find_by_name(ctx.card_root, "Paper").unwrap();
    let material = &ctx.scene.meshes[paper].material;
    assert_eq!(material.normal_scale, glam::Vec2::new(1.2, -1.2));
    let sampling = material.base_color_map.unwrap();
    assert_eq!(sampling.min_filter, FilterMode::Linear);
    assert_eq!(sampling.mag_filter, FilterMode::Nearest);
}

#[test]
fn material_overrides_reach_every_primitive() {
    let mut ctx = new_ctx();
    let prefab = card_scene::assets::loaders::load_gltf("layered.gltf", LAYERED_GLTF.as_bytes())
        .unwrap();
    send(
        &ctx,
        LoadEvent::Loaded {
            id: ctx.model_asset(),
            asset: LoadedAsset::Model(prefab),
        },
    );
    ctx.frame(DT);

    for name in ["Paper_0", "Paper_1"] {
        let node = ctx.scene.find_by_name(ctx.card_root, name).unwrap();
        let material = &ctx.scene.meshes[node].material;
        assert_eq!(material.normal_scale, glam::Vec2::new(1.2, -1.2), "{name}");
        let sampling = material.base_color_map.unwrap();
        assert_eq!(sampling.min_filter, FilterMode::Linear, "{name}");
        assert_eq!(sampling.mag_filter, FilterMode::Nearest, "{name}");
    }
}

#[test]
fn open_chain_runs_stages_in_order() {
    let mut ctx = revealed_ctx();
    assert_eq!(ctx.open_card().unwrap(), OpenOutcome::Started);
    assert_eq!(ctx.state(), UiState::CardOpen);

    // Stage 1: slide along X only.
    let mut max_x: f32 = 0.0;
    let slid = run_until(&mut ctx, 200, |c| {
        let p = card_position(c);
        max_x = max_x.max(p.x);
        assert!(approx(p.z, 0.0), "stage 2 motion during stage 1");
        c.timeline.open_stage() != OpenStage::Sliding
    });
    assert!(slid);
    assert!(approx(max_x, 4.5));
    assert_eq!(ctx.timeline.button_stage(), ButtonStage::Shown);

    // Stage 2: back to x = 0 while moving forward to z = 0.5.
    assert!(run_until(&mut ctx, 200, |c| c.timeline.open_stage() == OpenStage::Settled));
    let end = card_position(&ctx);
    assert!(approx(end.x, 0.0));
    assert!(approx(end.z, 0.5));
    assert_eq!(ctx.timeline.button_stage(), ButtonStage::Swapped);
}

#[test]
fn map_button_appears_only_after_open_button_fade() {
    let mut ctx = revealed_ctx();
    ctx.open_card().unwrap();

    let swapped = run_until(&mut ctx, 400, |c| {
        let open = element(c, UiElement::OpenButton);
        let map = element(c, UiElement::MapButton);
        if map.visible {
            assert_eq!(open.opacity, 0.0);
            assert!(!open.visible);
        }
        map.visible
    });
    assert!(swapped);

    // The swap lands while the card is still settling (1 s fade vs 1.5 s motion).
    assert_eq!(ctx.timeline.open_stage(), OpenStage::Settling);

    let changes = ctx.ui.changes();
    let hide_open = changes
        .iter()
        .position(|c| *c == UiChange::Visible(UiElement::OpenButton, false))
        .unwrap();
    let show_map = changes
        .iter()
        .position(|c| *c == UiChange::Visible(UiElement::MapButton, true))
        .unwrap();
    assert!(hide_open < show_map);
}

#[test]
fn button_fade_starts_with_second_stage() {
    let mut ctx = revealed_ctx();
    ctx.open_card().unwrap();
    assert!(run_until(&mut ctx, 200, |c| c.timeline.open_stage() == OpenStage::Settling));
    assert_eq!(element(&ctx, UiElement::OpenButton).opacity, 1.0);

    assert!(run_until(&mut ctx, 5, |c| c.timeline.button_stage() == ButtonStage::Fading));
    ctx.frame(DT);
    let opacity = element(&ctx, UiElement::OpenButton).opacity;
    assert!(opacity < 1.0 && opacity > 0.0);
}

#[test]
fn second_click_during_chain_is_ignored() {
    let mut ctx = revealed_ctx();
    ctx.open_card().unwrap();
    for _ in 0..20 {
        ctx.frame(DT);
    }
    let before = card_position(&ctx);
    let playing = ctx.mixer.len();

    assert_eq!(ctx.open_card().unwrap(), OpenOutcome::Ignored);
    assert_eq!(ctx.mixer.len(), playing);
    assert_eq!(card_position(&ctx), before);
    assert_eq!(ctx.timeline.open_stage(), OpenStage::Sliding);
}

#[test]
fn click_after_chain_does_not_restart() {
    let mut ctx = revealed_ctx();
    ctx.click(UiElement::OpenButton).unwrap();
    assert!(run_until(&mut ctx, 400, |c| {
        c.timeline.open_stage() == OpenStage::Settled && c.mixer.is_empty()
    }));

    ctx.click(UiElement::OpenButton).unwrap();
    for _ in 0..30 {
        ctx.frame(DT);
    }
    let p = card_position(&ctx);
    assert!(approx(p.x, 0.0));
    assert!(approx(p.z, 0.5));
    assert!(ctx.mixer.is_empty());
}

#[test]
fn click_before_reveal_is_ignored() {
    let mut ctx = new_ctx();
    assert_eq!(ctx.open_card().unwrap(), OpenOutcome::Ignored);

    deliver_all(&ctx);
    ctx.frame(DT);
    assert_eq!(ctx.state(), UiState::Revealed);
    assert_eq!(ctx.open_card().unwrap(), OpenOutcome::Ignored);
    assert_eq!(ctx.timeline.open_stage(), OpenStage::Idle);
}

#[test]
fn click_without_card_node_is_an_error() {
    let mut ctx = new_ctx();
    let empty = Prefab {
        name: "Empty".into(),
        ..Prefab::default()
    };
    send(
        &ctx,
        LoadEvent::Loaded {
            id: ctx.model_asset(),
            asset: LoadedAsset::Model(empty),
        },
    );
    send(
        &ctx,
        LoadEvent::Loaded {
            id: ctx.environment_asset(),
            asset: LoadedAsset::Environment(environment_map()),
        },
    );
    assert!(run_until(&mut ctx, 200, |c| c.state() == UiState::CardClosed));

    let err = ctx.open_card().unwrap_err();
    assert!(matches!(err, SceneError::AnimationTargetUnavailable(_)));
    assert_eq!(ctx.state(), UiState::CardClosed);
}

#[test]
fn lost_card_node_does_not_stall_chain() {
    let mut ctx = revealed_ctx();
    let card = ctx.timeline.card().unwrap();
    ctx.open_card().unwrap();
    ctx.frame(DT);

    // Drop the node from under the running slide.
    ctx.scene.remove_node(card);

    assert!(run_until(&mut ctx, 400, |c| c.timeline.button_stage() == ButtonStage::Swapped));
    assert!(element(&ctx, UiElement::MapButton).visible);
    assert_eq!(ctx.timeline.open_stage(), OpenStage::Settled);
}

#[test]
fn map_button_opens_configured_url() {
    let mut ctx = revealed_ctx();
    ctx.click(UiElement::MapButton).unwrap();
    assert_eq!(
        ctx.ui.opened_urls(),
        vec!["https://goo.gl/maps/CTaSeRSC7cHaXBc27"]
    );
}

// ============================================================================
// Load failures
// ============================================================================

#[test]
fn optional_environment_failure_still_reveals() {
    let mut ctx = new_ctx();
    send(
        &ctx,
        LoadEvent::Loaded {
            id: ctx.model_asset(),
            asset: LoadedAsset::Model(card_prefab()),
        },
    );
    send(
        &ctx,
        LoadEvent::Failed {
            id: ctx.environment_asset(),
            reason: "404".into(),
        },
    );
    assert!(run_until(&mut ctx, 200, |c| c.state() == UiState::CardClosed));
    assert!(!ctx.scene.environment.has_env_map());
}

#[test]
fn required_model_failure_blocks_reveal() {
    let mut ctx = new_ctx();
    send(
        &ctx,
        LoadEvent::Failed {
            id: ctx.model_asset(),
            reason: "connection reset".into(),
        },
    );
    send(
        &ctx,
        LoadEvent::Loaded {
            id: ctx.environment_asset(),
            asset: LoadedAsset::Environment(environment_map()),
        },
    );
    for _ in 0..120 {
        ctx.frame(DT);
    }

    assert_eq!(ctx.state(), UiState::Loading);
    assert!(ctx.timeline.load_error().is_some());
    assert_eq!(ctx.ui.text(UiElement::ProgressText), "Failed to load W_Card.glb");
    assert!(element(&ctx, UiElement::LoadingOverlay).displayed);
    assert_eq!(ctx.open_card().unwrap(), OpenOutcome::Ignored);
}

// ============================================================================
// Frame routine
// ============================================================================

#[test]
fn every_frame_clears_then_renders() {
    let mut ctx = new_ctx();
    for _ in 0..5 {
        ctx.frame(DT);
    }
    assert_eq!(ctx.renderer.clears, 5);
    assert_eq!(ctx.renderer.frames, 5);
    assert_eq!(ctx.frame_count(), 5);
    assert!(ctx.renderer.settings.is_some());
}

#[test]
fn resize_caps_pixel_ratio_and_updates_aspect() {
    let mut ctx = new_ctx();
    ctx.resize(800, 400, 3.0);
    assert_eq!(ctx.renderer.size, (800, 400));
    assert!(approx(ctx.renderer.pixel_ratio, 2.0));
    assert!(approx(ctx.scene.cameras[ctx.camera].aspect, 2.0));

    ctx.resize(800, 400, 1.5);
    assert!(approx(ctx.renderer.pixel_ratio, 1.5));
}

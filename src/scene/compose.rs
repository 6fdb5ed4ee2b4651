//! Static scene layout: camera, lights, fog and the backdrop the card sits in.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::config::{SceneConfig, hex_color};
use crate::scene::camera::Camera;
use crate::scene::environment::Fog;
use crate::scene::light::{Light, SpotLight};
use crate::scene::mesh::{Geometry, Material, Mesh};
use crate::scene::node::Node;
use crate::scene::{NodeHandle, Scene};

/// The composed scene and the handles the rest of the app drives.
pub struct ComposedScene {
    pub scene: Scene,
    pub camera: NodeHandle,
    /// Group the loaded card model is attached to.
    pub card_root: NodeHandle,
    /// Group holding the card root, wall and ground.
    pub backdrop: NodeHandle,
}

/// Builds the scene graph described by `config` for a viewport of the given
/// aspect ratio.
#[must_use]
pub fn compose_scene(config: &SceneConfig, aspect: f32) -> ComposedScene {
    let mut scene = Scene::new();

    let cam = &config.camera;
    let camera = scene.add_camera(
        "Camera",
        Camera::new_perspective(cam.fov, aspect, cam.near, cam.far),
    );
    if let Some(node) = scene.get_node_mut(camera) {
        node.transform.position = cam.position;
    }
    scene.active_camera = Some(camera);

    let spot = &config.lights.spot;
    let spot_light = scene.add_light(
        "SpotLight",
        Light::new_spot(
            hex_color(spot.color),
            spot.intensity,
            SpotLight {
                distance: spot.distance,
                angle: spot.angle,
                penumbra: spot.penumbra,
                decay: spot.decay,
                target: spot.target,
            },
        ),
    );
    if let Some(node) = scene.get_node_mut(spot_light) {
        node.transform.position = spot.position;
        node.transform.look_at(spot.target, Vec3::Y);
    }

    let ambient = &config.lights.ambient;
    scene.add_light(
        "AmbientLight",
        Light::new_ambient(hex_color(ambient.color), ambient.intensity),
    );

    if config.fog.enabled {
        scene.fog = Some(Fog {
            color: hex_color(config.fog.color),
            near: config.fog.near,
            far: config.fog.far,
        });
    }

    let backdrop = scene.create_node_with_name("Backdrop");

    // The card group never moves; its local matrix stays frozen.
    let mut card_group = Node::with_name("CardModel");
    card_group.matrix_auto_update = false;
    let card_root = scene.add_to_parent(card_group, backdrop);

    let bd = &config.backdrop;
    let color = hex_color(bd.color);

    let mut wall = Mesh::new(
        "Wall",
        Geometry::Plane { width: bd.size, height: bd.size },
        Material::new_phong(color),
    );
    wall.receive_shadow = bd.receive_shadow;
    let wall = scene.add_mesh_to_parent(wall, backdrop);
    if let Some(node) = scene.get_node_mut(wall) {
        node.transform.position.z = bd.wall_z;
    }

    let mut ground = Mesh::new(
        "Ground",
        Geometry::Plane { width: bd.size, height: bd.size },
        Material::new_phong(color),
    );
    ground.receive_shadow = bd.receive_shadow;
    let ground = scene.add_mesh_to_parent(ground, backdrop);
    if let Some(node) = scene.get_node_mut(ground) {
        node.transform.position.y = bd.ground_y;
        node.transform.set_rotation_euler(-FRAC_PI_2, 0.0, 0.0);
    }

    scene.update_matrix_world();

    ComposedScene {
        scene,
        camera,
        card_root,
        backdrop,
    }
}

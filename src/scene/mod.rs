//! Scene graph
//!
//! - Node: hierarchy and transform
//! - Transform: position, rotation, scale with cached matrices
//! - Scene: node storage plus camera, light and mesh component maps
//! - compose: the static card scene layout

pub mod camera;
pub mod compose;
pub mod environment;
pub mod light;
pub mod mesh;
pub mod node;
pub mod scene;
pub mod transform;

pub use camera::Camera;
pub use compose::{ComposedScene, compose_scene};
pub use environment::{Environment, EnvironmentMap, EnvironmentMapping, Fog};
pub use light::{Light, LightKind, SpotLight};
pub use mesh::{FilterMode, Geometry, Material, MaterialKind, Mesh, TextureSampling};
pub use node::Node;
pub use scene::{PrefabInstance, Scene};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}

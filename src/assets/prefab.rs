use std::sync::Arc;

use crate::scene::mesh::Mesh;
use crate::scene::transform::Transform;

/// Prefab node: plain data, children referenced by index.
#[derive(Debug, Clone, Default)]
pub struct PrefabNode {
    pub name: Option<String>,
    pub transform: Transform,
    /// Indices into [`Prefab::nodes`].
    pub children_indices: Vec<usize>,
    pub mesh: Option<Mesh>,
}

/// Model description decoded from a glTF asset.
///
/// A prefab holds no scene handles and is `Send`, so it can be decoded on a
/// loader task and instantiated later with
/// [`Scene::instantiate`](crate::scene::Scene::instantiate).
#[derive(Debug, Clone, Default)]
pub struct Prefab {
    pub name: String,
    /// Flattened node list in glTF order, followed by split primitives.
    pub nodes: Vec<PrefabNode>,
    /// Nodes of the model's default scene.
    pub root_indices: Vec<usize>,
    /// The undecoded asset, kept for the render backend to upload geometry.
    pub source: Arc<[u8]>,
}

impl Prefab {
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.mesh.is_some()).count()
    }
}

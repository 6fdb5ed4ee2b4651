use glam::Affine3A;
use slotmap::{SecondaryMap, SlotMap};

use crate::assets::prefab::Prefab;
use crate::scene::NodeHandle;
use crate::scene::camera::Camera;
use crate::scene::environment::{Environment, Fog};
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use crate::scene::node::Node;

/// Handles created by [`Scene::instantiate`].
#[derive(Debug, Clone, PartialEq)]
pub struct PrefabInstance {
    /// Group node standing for the model's scene.
    pub root: NodeHandle,
    /// One handle per prefab node, in prefab order.
    pub nodes: Vec<NodeHandle>,
    /// Handles of the prefab's root nodes, children of `root`.
    pub top_level: Vec<NodeHandle>,
}

/// Scene container: node hierarchy plus component maps.
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub meshes: SecondaryMap<NodeHandle, Mesh>,
    pub cameras: SecondaryMap<NodeHandle, Camera>,
    pub lights: SecondaryMap<NodeHandle, Light>,

    pub environment: Environment,
    pub fog: Option<Fog>,
    pub active_camera: Option<NodeHandle>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SecondaryMap::new(),
            cameras: SecondaryMap::new(),
            lights: SecondaryMap::new(),
            environment: Environment::new(),
            fog: None,
            active_camera: None,
        }
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Adds a node at the root level.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::with_name(name))
    }

    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.add_node(child);
        self.attach(handle, parent);
        handle
    }

    /// Re-parents `child` under `parent`, keeping both sides in sync.
    /// Ignored when either handle is stale or the move would create a cycle.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent || !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Refusing to attach {child:?} under its own descendant {parent:?}");
            return;
        }

        self.detach(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
        self.root_nodes.retain(|&h| h != child);
    }

    /// Moves `child` back to the root level.
    pub fn detach(&mut self, child: NodeHandle) {
        let Some(old_parent) = self.nodes.get(child).and_then(Node::parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(old_parent) {
            p.children.retain(|&h| h != child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }
        self.root_nodes.push(child);
    }

    /// Removes `handle` and its whole subtree along with their components.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }
        self.detach(handle);
        self.root_nodes.retain(|&h| h != handle);
        for h in self.collect_subtree(handle) {
            self.nodes.remove(h);
            self.meshes.remove(h);
            self.cameras.remove(h);
            self.lights.remove(h);
            if self.active_camera == Some(h) {
                self.active_camera = None;
            }
        }
    }

    fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(Node::parent);
        while let Some(h) = current {
            if h == ancestor {
                return true;
            }
            current = self.nodes.get(h).and_then(Node::parent);
        }
        false
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth-first search for a node named `name` under (and including) `root`.
    #[must_use]
    pub fn find_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let node = self.nodes.get(root)?;
        if node.name == name {
            return Some(root);
        }
        node.children
            .iter()
            .find_map(|&child| self.find_by_name(child, name))
    }

    /// Collects `root` and all of its descendants, depth first.
    #[must_use]
    pub fn collect_subtree(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(h) = stack.pop() {
            let Some(node) = self.nodes.get(h) else { continue };
            out.push(h);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn add_camera(&mut self, name: &str, camera: Camera) -> NodeHandle {
        let handle = self.create_node_with_name(name);
        self.cameras.insert(handle, camera);
        handle
    }

    pub fn add_light(&mut self, name: &str, light: Light) -> NodeHandle {
        let handle = self.create_node_with_name(name);
        self.lights.insert(handle, light);
        handle
    }

    pub fn add_mesh_to_parent(&mut self, mesh: Mesh, parent: NodeHandle) -> NodeHandle {
        let handle = self.add_to_parent(Node::with_name(mesh.name.clone()), parent);
        self.meshes.insert(handle, mesh);
        handle
    }

    pub fn camera_mut(&mut self, handle: NodeHandle) -> Option<&mut Camera> {
        self.cameras.get_mut(handle)
    }

    /// Builds scene nodes for every prefab node under a new group named after
    /// the prefab, itself attached to `parent`.
    pub fn instantiate(&mut self, prefab: &Prefab, parent: NodeHandle) -> PrefabInstance {
        let root = self.add_to_parent(Node::with_name(prefab.name.clone()), parent);

        let nodes: Vec<NodeHandle> = prefab
            .nodes
            .iter()
            .map(|p| {
                let mut node = Node::with_name(p.name.clone().unwrap_or_default());
                node.transform = p.transform.clone();
                let handle = self.add_node(node);
                if let Some(mesh) = &p.mesh {
                    self.meshes.insert(handle, mesh.clone());
                }
                handle
            })
            .collect();

        for (index, p) in prefab.nodes.iter().enumerate() {
            for &child in &p.children_indices {
                if let Some(&child_handle) = nodes.get(child) {
                    self.attach(child_handle, nodes[index]);
                }
            }
        }

        let top_level: Vec<NodeHandle> = prefab
            .root_indices
            .iter()
            .filter_map(|&i| nodes.get(i).copied())
            .collect();
        for &handle in &top_level {
            self.attach(handle, root);
        }

        // Nodes no scene references stay out of the root list.
        let placed: Vec<NodeHandle> = self.collect_subtree(root);
        for &handle in &nodes {
            if !placed.contains(&handle) {
                self.root_nodes.retain(|&h| h != handle);
            }
        }

        PrefabInstance { root, nodes, top_level }
    }

    // ========================================================================
    // Per-frame update
    // ========================================================================

    /// Propagates local matrices to world matrices and refreshes cameras.
    pub fn update_matrix_world(&mut self) {
        let roots = self.root_nodes.clone();
        for root in roots {
            self.update_subtree(root, Affine3A::IDENTITY);
        }

        for (handle, camera) in &mut self.cameras {
            if let Some(node) = self.nodes.get(handle) {
                camera.update_view_projection(&node.transform.world_matrix);
            }
        }
    }

    fn update_subtree(&mut self, handle: NodeHandle, parent_world: Affine3A) {
        let Some(node) = self.nodes.get_mut(handle) else {
            return;
        };

        if node.matrix_auto_update {
            node.transform.update_local_matrix();
        }
        node.transform.world_matrix = parent_world * node.transform.local_matrix;

        let world = node.transform.world_matrix;
        let children = node.children.clone();
        for child in children {
            self.update_subtree(child, world);
        }
    }
}

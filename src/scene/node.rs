use crate::scene::NodeHandle;
use crate::scene::transform::Transform;
use glam::Affine3A;

/// A scene node: hierarchy, transform and visibility.
///
/// Cameras, lights and meshes live in the [`Scene`](crate::scene::Scene)
/// component maps keyed by the node handle.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,

    pub visible: bool,
    /// When false the local matrix is frozen; the world matrix still follows
    /// the parent.
    pub matrix_auto_update: bool,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: String::new(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            matrix_auto_update: true,
        }
    }

    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new()
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

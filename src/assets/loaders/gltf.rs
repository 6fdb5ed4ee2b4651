//! glTF / GLB decoding into a [`Prefab`].
//!
//! Only the data the scene setup needs is extracted: node hierarchy, TRS,
//! and the material parameters that the card overrides touch. Geometry and
//! image data stay in [`Prefab::source`] for the render backend.
//!
//! A mesh with several primitives becomes one child node per primitive,
//! appended after the document's own nodes, each with its own material.

use std::sync::Arc;

use glam::{Quat, Vec2, Vec3, Vec4};

use crate::assets::prefab::{Prefab, PrefabNode};
use crate::errors::{Result, SceneError};
use crate::scene::mesh::{FilterMode, Geometry, Material, Mesh, TextureSampling};
use crate::scene::transform::Transform;

/// Decodes a `.glb` or `.gltf` byte slice.
///
/// Node names fall back to `Node_{index}`. Root indices come from the default
/// scene, or the first scene when none is marked default.
pub fn load_gltf(label: &str, bytes: &[u8]) -> Result<Prefab> {
    let gltf = gltf::Gltf::from_slice(bytes)?;

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or_else(|| SceneError::Gltf(format!("{label}: document has no scene")))?;

    let mut nodes = Vec::with_capacity(gltf.nodes().len());
    let mut split = Vec::new();
    for node in gltf.nodes() {
        let (mut prefab_node, mut meshes) = load_node(&node);
        if meshes.len() == 1 {
            prefab_node.mesh = meshes.pop();
        } else if !meshes.is_empty() {
            split.push((node.index(), meshes));
        }
        nodes.push(prefab_node);
    }
    for (parent, meshes) in split {
        for mesh in meshes {
            let index = nodes.len();
            nodes.push(PrefabNode {
                name: Some(mesh.name.clone()),
                mesh: Some(mesh),
                ..PrefabNode::default()
            });
            nodes[parent].children_indices.push(index);
        }
    }

    let root_indices = scene.nodes().map(|n| n.index()).collect();

    Ok(Prefab {
        name: scene.name().unwrap_or("Scene").to_string(),
        nodes,
        root_indices,
        source: Arc::from(bytes),
    })
}

/// Returns the node without its mesh, plus one [`Mesh`] per primitive.
fn load_node(node: &gltf::Node) -> (PrefabNode, Vec<Mesh>) {
    let name = node
        .name()
        .map_or_else(|| format!("Node_{}", node.index()), str::to_string);

    let (t, r, s) = node.transform().decomposed();
    let transform = Transform::from_trs(Vec3::from_array(t), Quat::from_array(r), Vec3::from_array(s));

    let meshes = node.mesh().map_or_else(Vec::new, |mesh| {
        let mesh_name = mesh.name().map_or_else(|| name.clone(), str::to_string);
        let single = mesh.primitives().len() == 1;
        mesh.primitives()
            .map(|prim| {
                let prim_name = if single {
                    mesh_name.clone()
                } else {
                    format!("{mesh_name}_{}", prim.index())
                };
                Mesh::new(
                    prim_name,
                    Geometry::Imported {
                        mesh_index: mesh.index(),
                        primitive_index: prim.index(),
                    },
                    load_material(&prim.material()),
                )
            })
            .collect()
    });

    let prefab_node = PrefabNode {
        name: Some(name),
        transform,
        children_indices: node.children().map(|c| c.index()).collect(),
        mesh: None,
    };
    (prefab_node, meshes)
}

fn load_material(material: &gltf::Material) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let mut mat = Material::new_standard();
    mat.color = Vec4::from_array(pbr.base_color_factor()).truncate();

    if let Some(info) = material.normal_texture() {
        mat.has_normal_map = true;
        mat.normal_scale = Vec2::splat(info.scale());
    }

    if let Some(info) = pbr.base_color_texture() {
        let sampler = info.texture().sampler();
        mat.base_color_map = Some(TextureSampling {
            mag_filter: sampler.mag_filter().map_or(FilterMode::Linear, |f| match f {
                gltf::texture::MagFilter::Nearest => FilterMode::Nearest,
                gltf::texture::MagFilter::Linear => FilterMode::Linear,
            }),
            min_filter: sampler.min_filter().map_or(FilterMode::Linear, |f| match f {
                gltf::texture::MinFilter::Nearest
                | gltf::texture::MinFilter::NearestMipmapNearest
                | gltf::texture::MinFilter::NearestMipmapLinear => FilterMode::Nearest,
                gltf::texture::MinFilter::Linear
                | gltf::texture::MinFilter::LinearMipmapNearest
                | gltf::texture::MinFilter::LinearMipmapLinear => FilterMode::Linear,
            }),
        });
    }

    mat
}

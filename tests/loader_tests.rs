//! Asset Decoder Tests
//!
//! Tests for:
//! - glTF hierarchy, names, transforms and material parameters
//! - Multi-primitive meshes split into one node per material
//! - Malformed model input
//! - Radiance HDR decoding into RGBA32F texels
//! - Kind-based dispatch through `decode`

use glam::{Vec2, Vec3};
use image::Rgb;
use image::codecs::hdr::HdrEncoder;

use card_scene::assets::loaders::{load_gltf, load_hdr};
use card_scene::assets::manager::decode;
use card_scene::assets::{AssetKind, LoadedAsset};
use card_scene::errors::SceneError;
use card_scene::scene::{EnvironmentMapping, FilterMode, Geometry};

const EPSILON: f32 = 1e-5;

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

// ============================================================================
// Fixtures
// ============================================================================

const CARD_GLTF: &str = r#"{
    "asset": { "version": "2.0" },
    "scene": 0,
    "scenes": [{ "name": "CardScene", "nodes": [0] }],
    "nodes": [
        { "name": "Card", "translation": [1.0, 2.0, 3.0], "children": [1, 2] },
        { "name": "Front", "mesh": 0 },
        { "scale": [2.0, 2.0, 2.0], "mesh": 0 }
    ],
    "meshes": [{
        "name": "CardMesh",
        "primitives": [{ "attributes": { "POSITION": 0 }, "material": 0 }]
    }],
    "materials": [{
        "pbrMetallicRoughness": {
            "baseColorFactor": [0.5, 0.25, 1.0, 1.0],
            "baseColorTexture": { "index": 0 }
        },
        "normalTexture": { "index": 0, "scale": 0.8 }
    }],
    "textures": [{ "sampler": 0, "source": 0 }],
    "images": [{ "uri": "card.png" }],
    "samplers": [{ "magFilter": 9728, "minFilter": 9987 }],
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

/// One mesh, two primitives, two materials.
const LAYERED_GLTF: &str = r#"{
    "asset": { "version": "2.0" },
    "scenes": [{ "nodes": [0] }],
    "nodes": [{ "name": "Card", "mesh": 0 }],
    "meshes": [{
        "name": "CardMesh",
        "primitives": [
            { "attributes": { "POSITION": 0 }, "material": 0 },
            { "attributes": { "POSITION": 0 }, "material": 1 }
        ]
    }],
    "materials": [
        {
            "pbrMetallicRoughness": { "baseColorFactor": [1.0, 0.0, 0.0, 1.0] },
            "normalTexture": { "index": 0, "scale": 0.8 }
        },
        {
            "pbrMetallicRoughness": {
                "baseColorFactor": [0.0, 1.0, 0.0, 1.0],
                "baseColorTexture": { "index": 0 }
            }
        }
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

fn hdr_bytes(width: usize, height: usize, pixel: Rgb<f32>) -> Vec<u8> {
    let pixels = vec![pixel; width * height];
    let mut buf = Vec::new();
    HdrEncoder::new(&mut buf)
        .encode(&pixels, width, height)
        .unwrap();
    buf
}

// ============================================================================
// glTF
// ============================================================================

#[test]
fn gltf_keeps_scene_name_and_roots() {
    let prefab = load_gltf("card.gltf", CARD_GLTF.as_bytes()).unwrap();
    assert_eq!(prefab.name, "CardScene");
    assert_eq!(prefab.root_indices, vec![0]);
    assert_eq!(prefab.nodes.len(), 3);
    assert_eq!(prefab.nodes[0].children_indices, vec![1, 2]);
    assert_eq!(prefab.mesh_count(), 2);
    assert_eq!(&*prefab.source, CARD_GLTF.as_bytes());
}

#[test]
fn gltf_node_names_fall_back_to_index() {
    let prefab = load_gltf("card.gltf", CARD_GLTF.as_bytes()).unwrap();
    let names: Vec<_> = prefab.nodes.iter().map(|n| n.name.as_deref()).collect();
    assert_eq!(names, vec![Some("Card"), Some("Front"), Some("Node_2")]);
}

#[test]
fn gltf_transforms_are_decomposed() {
    let prefab = load_gltf("card.gltf", CARD_GLTF.as_bytes()).unwrap();
    assert!(approx_vec3(prefab.nodes[0].transform.position, Vec3::new(1.0, 2.0, 3.0)));
    assert!(approx_vec3(prefab.nodes[0].transform.scale, Vec3::ONE));
    assert!(approx_vec3(prefab.nodes[2].transform.scale, Vec3::splat(2.0)));
}

#[test]
fn gltf_meshes_reference_document_geometry() {
    let prefab = load_gltf("card.gltf", CARD_GLTF.as_bytes()).unwrap();
    assert!(prefab.nodes[0].mesh.is_none());

    let mesh = prefab.nodes[1].mesh.as_ref().unwrap();
    assert_eq!(mesh.name, "CardMesh");
    assert_eq!(
        mesh.geometry,
        Geometry::Imported {
            mesh_index: 0,
            primitive_index: 0
        }
    );
}

#[test]
fn gltf_material_parameters() {
    let prefab = load_gltf("card.gltf", CARD_GLTF.as_bytes()).unwrap();
    let material = &prefab.nodes[1].mesh.as_ref().unwrap().material;

    assert!(approx_vec3(material.color, Vec3::new(0.5, 0.25, 1.0)));
    assert!(material.has_normal_map);
    assert!((material.normal_scale - Vec2::splat(0.8)).abs().max_element() < EPSILON);

    let sampling = material.base_color_map.unwrap();
    assert_eq!(sampling.mag_filter, FilterMode::Nearest);
    // Mipmapped filters collapse to their base filter.
    assert_eq!(sampling.min_filter, FilterMode::Linear);
}

#[test]
fn gltf_primitives_split_into_child_nodes() {
    let prefab = load_gltf("layered.gltf", LAYERED_GLTF.as_bytes()).unwrap();
    assert_eq!(prefab.nodes.len(), 3);
    assert!(prefab.nodes[0].mesh.is_none());
    assert_eq!(prefab.nodes[0].children_indices, vec![1, 2]);
    assert_eq!(prefab.mesh_count(), 2);

    let names: Vec<_> = prefab.nodes[1..].iter().map(|n| n.name.as_deref()).collect();
    assert_eq!(names, vec![Some("CardMesh_0"), Some("CardMesh_1")]);
    let second = prefab.nodes[2].mesh.as_ref().unwrap();
    assert_eq!(
        second.geometry,
        Geometry::Imported {
            mesh_index: 0,
            primitive_index: 1
        }
    );
}

#[test]
fn gltf_each_primitive_keeps_its_material() {
    let prefab = load_gltf("layered.gltf", LAYERED_GLTF.as_bytes()).unwrap();
    let first = &prefab.nodes[1].mesh.as_ref().unwrap().material;
    let second = &prefab.nodes[2].mesh.as_ref().unwrap().material;

    assert!(approx_vec3(first.color, Vec3::X));
    assert!(first.has_normal_map);
    assert!(first.base_color_map.is_none());

    assert!(approx_vec3(second.color, Vec3::Y));
    assert!(!second.has_normal_map);
    assert_eq!(second.base_color_map.unwrap().mag_filter, FilterMode::Linear);
}

#[test]
fn gltf_without_scene_is_rejected() {
    let json = r#"{ "asset": { "version": "2.0" }, "nodes": [{ "name": "Lonely" }] }"#;
    let err = load_gltf("empty.gltf", json.as_bytes()).unwrap_err();
    assert!(matches!(err, SceneError::Gltf(_)), "got {err:?}");
}

#[test]
fn garbage_is_not_a_model() {
    assert!(load_gltf("noise.glb", b"definitely not gltf").is_err());
}

// ============================================================================
// HDR
// ============================================================================

#[test]
fn hdr_decodes_to_rgba32f() {
    let bytes = hdr_bytes(4, 2, Rgb([2.0, 1.0, 0.5]));
    let map = load_hdr("ENV.hdr", &bytes).unwrap();

    assert_eq!((map.width, map.height), (4, 2));
    assert_eq!(map.texels.len(), 4 * 2 * 4);
    assert_eq!(map.mapping, EnvironmentMapping::EquirectangularReflection);
    assert_eq!(map.name, "ENV.hdr");

    let [r, g, b, a] = map.texel(3, 1).unwrap();
    assert!((r - 2.0).abs() < 0.02);
    assert!((g - 1.0).abs() < 0.02);
    assert!((b - 0.5).abs() < 0.02);
    assert!((a - 1.0).abs() < EPSILON);
    assert!(map.texel(4, 0).is_none());
}

#[test]
fn truncated_hdr_is_an_error() {
    let bytes = hdr_bytes(4, 4, Rgb([1.0, 1.0, 1.0]));
    let err = load_hdr("ENV.hdr", &bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err, SceneError::ImageDecode(_)), "got {err:?}");
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn decode_dispatches_on_kind() {
    let model = decode(AssetKind::Model, "card.gltf", CARD_GLTF.as_bytes()).unwrap();
    assert!(matches!(model, LoadedAsset::Model(_)));

    let env = decode(AssetKind::Environment, "ENV.hdr", &hdr_bytes(1, 1, Rgb([1.0; 3]))).unwrap();
    assert!(matches!(env, LoadedAsset::Environment(_)));

    assert!(decode(AssetKind::Environment, "card.gltf", CARD_GLTF.as_bytes()).is_err());
}

pub mod gltf;
pub mod hdr;

pub use self::gltf::load_gltf;
pub use hdr::load_hdr;

use image::ImageFormat;

use crate::errors::Result;
use crate::scene::environment::{EnvironmentMap, EnvironmentMapping};

/// Decodes a Radiance HDR image into RGBA32F texels mapped for
/// equirectangular reflections.
pub fn load_hdr(label: &str, bytes: &[u8]) -> Result<EnvironmentMap> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Hdr)?;
    let rgba = img.into_rgba32f();
    let (width, height) = rgba.dimensions();

    log::debug!("Decoded environment map {label}: {width}x{height}");

    Ok(EnvironmentMap {
        name: label.to_string(),
        width,
        height,
        texels: rgba.into_raw(),
        mapping: EnvironmentMapping::EquirectangularReflection,
    })
}

//! Image Output

use crate::color::*;
use crate::display::FrameBuffer;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use exr::prelude::*;
use image::{ImageBuffer, ImageFormat, Rgb};
use regex::Regex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::result::Result;
use std::sync::OnceLock;

/// Write a frame buffer to the given path. The format is chosen from the
/// file extension: `.exr` and `.pfm` keep linear floating point values while
/// `.png` and `.tga` are gamma corrected to 8 bits.
///
/// * `path`  - Output file path.
/// * `frame` - The image.
pub fn write_image(path: &str, frame: &FrameBuffer) -> Result<(), String> {
    if frame.width == 0 || frame.height == 0 {
        return Err(format!("Refusing to write empty image {path}"));
    }

    match get_extension_from_filename(path) {
        Some(".exr") => write_exr(path, frame),
        Some(".tga") => write_8_bit(path, frame, ImageFormat::Tga),
        Some(".png") => write_8_bit(path, frame, ImageFormat::Png),
        Some(".pfm") => write_pfm(path, frame),
        Some(extension) => Err(format!("Extension {extension} is not supported")),
        None => Err(format!("Can't determine file type from suffix of filename {path}")),
    }
}

/// Returns regular expression for extracting the file extension; the last
/// period followed by no periods or slashes.
fn regex_file_ext() -> &'static Regex {
    static DATA: OnceLock<Regex> = OnceLock::new();
    DATA.get_or_init(|| Regex::new(r"(\.[^./\\]+)$").expect("invalid file extension regex"))
}

/// Retrieve the extension from a file path.
///
/// * `path` - The file path.
fn get_extension_from_filename(path: &str) -> Option<&str> {
    regex_file_ext()
        .captures(path)
        .and_then(|c| c.get(1).map(|m| m.as_str()))
}

/// Writes the image in OpenEXR format.
///
/// * `path`  - Output file path.
/// * `frame` - The image.
fn write_exr(path: &str, frame: &FrameBuffer) -> Result<(), String> {
    info!("Writing image {path} with resolution {}x{}", frame.width, frame.height);

    let size = Vec2(frame.width, frame.height);
    let layer = Layer::new(
        size,
        LayerAttributes::named("render"),
        Encoding::SMALL_LOSSLESS,
        SpecificChannels::rgb(|pos: Vec2<usize>| {
            let c = frame.get(pos.0, pos.1);
            (c.r, c.g, c.b)
        }),
    );

    let attributes = ImageAttributes::new(IntegerBounds::from_dimensions(size));
    Image::empty(attributes)
        .with_layer(layer)
        .write()
        .to_file(path)
        .map_err(|err| format!("Error saving output image {path}: {err}"))
}

/// Writes the image in an 8-bit image format.
///
/// * `path`         - Output file path.
/// * `frame`        - The image.
/// * `image_format` - Image format.
fn write_8_bit(path: &str, frame: &FrameBuffer, image_format: ImageFormat) -> Result<(), String> {
    info!("Writing image {path} with resolution {}x{}", frame.width, frame.height);

    let imgbuf = ImageBuffer::from_fn(frame.width as u32, frame.height as u32, |x, y| {
        Rgb(frame.get(x as usize, y as usize).to_srgb8())
    });

    imgbuf
        .save_with_format(path, image_format)
        .map_err(|err| format!("Error saving output image {path}: {err}."))
}

/// Writes the image in PFM (Portable FloatMap) format. Rows are stored
/// bottom to top and a negative scale marks little-endian data.
///
/// * `path`  - Output file path.
/// * `frame` - The image.
fn write_pfm(path: &str, frame: &FrameBuffer) -> Result<(), String> {
    info!("Writing image {path} with resolution {}x{}", frame.width, frame.height);

    let file = File::create(path).map_err(|e| format!("write_pfm(): Error writing PFM file '{path}': {e}"))?;
    let mut out = BufWriter::new(file);

    let big_endian = cfg!(target_endian = "big");
    let scale = if big_endian { 1.0 } else { -1.0 };
    write!(out, "PF\n{} {}\n{scale}\n", frame.width, frame.height)
        .map_err(|e| format!("write_pfm(): Error writing PFM header '{path}': {e}"))?;

    for y in (0..frame.height).rev() {
        let row = &frame.pixels[y * frame.width..(y + 1) * frame.width];
        for f in row.iter().flat_map(Color::to_array) {
            if big_endian {
                out.write_f32::<BigEndian>(f)
            } else {
                out.write_f32::<LittleEndian>(f)
            }
            .map_err(|e| format!("write_pfm(): Error writing PFM pixels '{path}': {e}"))?;
        }
    }

    out.flush()
        .map_err(|e| format!("write_pfm(): Error writing PFM file '{path}': {e}"))
}

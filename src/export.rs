use std::io::Cursor;
use std::path::Path;

use anyhow::Context;
use base64::{engine::general_purpose, Engine as _};
use image::{ImageFormat, RgbaImage};

use crate::freehand::FreehandSurface;
use crate::model::{CanvasSize, Rectangle};
use crate::overlay::COMMITTED_LINE_WIDTH;
use crate::raster;

/// Default file name offered for exports.
pub const EXPORT_FILE_NAME: &str = "drawing.png";

/// Flattens background, freehand layer and rectangles into one image of
/// `size`. Rectangles are stroked from their records, not copied from the
/// on-screen overlay.
pub fn composite(
    size: CanvasSize,
    background: Option<&RgbaImage>,
    freehand: &dyn FreehandSurface,
    rects: &[Rectangle],
) -> RgbaImage {
    let mut out = raster::blank(size);
    if let Some(bg) = background {
        raster::draw_scaled(&mut out, bg);
    }
    if !freehand.is_empty() {
        raster::draw_scaled(&mut out, &freehand.rasterize());
    }
    raster::stroke_all(&mut out, rects, COMMITTED_LINE_WIDTH);
    out
}

pub fn encode_png(img: &RgbaImage) -> anyhow::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("encoding PNG")?;
    Ok(bytes)
}

pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(png))
}

pub fn write_png(path: &Path, img: &RgbaImage) -> anyhow::Result<()> {
    let bytes = encode_png(img)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

use std::io::Cursor;

use anyhow::Context;
use image::{ImageFormat, Rgba, RgbaImage};

use crate::model::CanvasSize;
use crate::raster;

/// A drawing surface the page delegates brush strokes to. Only its raster
/// output matters to compositing; how strokes are represented is up to the
/// implementation.
pub trait FreehandSurface {
    fn clear(&mut self);

    /// Discards current content and reallocates at `size`.
    fn resize(&mut self, size: CanvasSize);

    fn rasterize(&self) -> RgbaImage;

    fn is_empty(&self) -> bool;

    /// Bumped on every visible change, so the UI knows when to re-upload.
    fn revision(&self) -> u64;

    fn rasterize_png(&self) -> anyhow::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.rasterize()
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .context("encoding freehand layer")?;
        Ok(bytes)
    }
}

#[derive(Clone, Debug)]
struct BrushStroke {
    points: Vec<(f32, f32)>,
}

/// Round-brush canvas keeping strokes as point lists and a cached raster.
pub struct BrushCanvas {
    size: CanvasSize,
    radius: f32,
    color: Rgba<u8>,
    strokes: Vec<BrushStroke>,
    active: Option<BrushStroke>,
    surface: RgbaImage,
    revision: u64,
}

impl BrushCanvas {
    pub const DEFAULT_RADIUS: f32 = 10.0;

    pub fn new(size: CanvasSize, radius: f32) -> Self {
        Self {
            size,
            radius,
            color: Rgba([0, 0, 0, 255]),
            strokes: Vec::new(),
            active: None,
            surface: raster::blank(size),
            revision: 0,
        }
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len() + usize::from(self.active.is_some())
    }

    pub fn begin_stroke(&mut self, pos: (f32, f32)) {
        if let Some(done) = self.active.take() {
            self.strokes.push(done);
        }
        raster::stamp_segment(&mut self.surface, pos, pos, self.radius, self.color);
        self.active = Some(BrushStroke { points: vec![pos] });
        self.revision += 1;
    }

    pub fn extend_stroke(&mut self, pos: (f32, f32)) {
        let Some(stroke) = self.active.as_mut() else {
            return;
        };
        if let Some(&last) = stroke.points.last() {
            raster::stamp_segment(&mut self.surface, last, pos, self.radius, self.color);
        }
        stroke.points.push(pos);
        self.revision += 1;
    }

    pub fn end_stroke(&mut self) {
        if let Some(done) = self.active.take() {
            self.strokes.push(done);
        }
    }
}

impl FreehandSurface for BrushCanvas {
    fn clear(&mut self) {
        self.strokes.clear();
        self.active = None;
        raster::clear(&mut self.surface);
        self.revision += 1;
    }

    fn resize(&mut self, size: CanvasSize) {
        self.size = size;
        self.strokes.clear();
        self.active = None;
        self.surface = raster::blank(size);
        self.revision += 1;
    }

    fn rasterize(&self) -> RgbaImage {
        self.surface.clone()
    }

    fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.active.is_none()
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

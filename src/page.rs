use std::path::Path;

use image::RgbaImage;
use tracing::{debug, info};

use crate::background::{BackgroundManager, DecodeJob, DecodeOutcome};
use crate::export;
use crate::freehand::{BrushCanvas, FreehandSurface};
use crate::history::AnnotationHistory;
use crate::model::{CanvasSize, LabelColor, Rectangle};
use crate::overlay::AnnotationOverlay;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSettings {
    /// Canvas size before any background is loaded.
    pub default_size: CanvasSize,
    pub brush_radius: f32,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            default_size: CanvasSize::default(),
            brush_radius: BrushCanvas::DEFAULT_RADIUS,
        }
    }
}

/// Page-level state: the three layers, the shared canvas size and the
/// currently selected label color.
pub struct AnnotationPage<F = BrushCanvas> {
    size: CanvasSize,
    color: LabelColor,
    background: BackgroundManager,
    freehand: F,
    overlay: AnnotationOverlay,
}

impl AnnotationPage<BrushCanvas> {
    pub fn new(settings: PageSettings) -> Self {
        let freehand = BrushCanvas::new(settings.default_size, settings.brush_radius);
        Self::with_freehand(settings.default_size, freehand)
    }

    pub fn begin_stroke(&mut self, pos: (f32, f32)) {
        self.freehand.begin_stroke(pos);
    }

    pub fn extend_stroke(&mut self, pos: (f32, f32)) {
        self.freehand.extend_stroke(pos);
    }

    pub fn end_stroke(&mut self) {
        self.freehand.end_stroke();
    }
}

impl<F: FreehandSurface> AnnotationPage<F> {
    pub fn with_freehand(size: CanvasSize, mut freehand: F) -> Self {
        freehand.resize(size);
        Self {
            size,
            color: LabelColor::default(),
            background: BackgroundManager::new(),
            freehand,
            overlay: AnnotationOverlay::new(size),
        }
    }

    // ── Background ──────────────────────────────────────────────────────

    pub fn begin_background_load(&mut self, bytes: Vec<u8>) -> DecodeJob {
        self.background.begin_load(bytes)
    }

    pub fn begin_background_load_path(&mut self, path: &Path) -> Option<DecodeJob> {
        self.background.begin_load_path(path)
    }

    /// Applies a finished decode. On success every layer is re-provisioned
    /// at the image's natural size.
    pub fn apply_decode(&mut self, outcome: DecodeOutcome) -> bool {
        match self.background.complete(outcome) {
            Some(size) => {
                info!(width = size.width, height = size.height, "background loaded");
                self.resize(size);
                true
            }
            None => false,
        }
    }

    /// Decodes on the calling thread and applies the result.
    pub fn load_background_now(&mut self, bytes: Vec<u8>) -> bool {
        let job = self.begin_background_load(bytes);
        self.apply_decode(job.run())
    }

    pub fn resize(&mut self, size: CanvasSize) {
        self.size = size;
        self.freehand.resize(size);
        self.overlay.provision(size);
    }

    // ── Rectangles ──────────────────────────────────────────────────────

    pub fn select_color(&mut self, color: LabelColor) {
        self.color = color;
    }

    pub fn color(&self) -> LabelColor {
        self.color
    }

    pub fn begin_rect(&mut self, pos: (f32, f32)) {
        self.overlay.begin(pos);
    }

    pub fn update_rect(&mut self, pos: (f32, f32)) -> bool {
        self.overlay.update(pos, self.color)
    }

    pub fn end_rect(&mut self, pos: (f32, f32)) -> Option<Rectangle> {
        self.overlay.end(pos, self.color)
    }

    pub fn leave_rect(&mut self, pos: (f32, f32)) -> Option<Rectangle> {
        self.overlay.leave(pos, self.color)
    }

    pub fn add_rectangle(&mut self, rect: Rectangle) {
        self.overlay.commit(rect);
    }

    pub fn undo(&mut self) -> Option<Rectangle> {
        let removed = self.overlay.undo();
        if removed.is_none() {
            debug!("undo with empty history");
        }
        removed
    }

    /// Empties the history and wipes both drawing layers. The background
    /// stays.
    pub fn clear(&mut self) {
        self.overlay.clear();
        self.freehand.clear();
    }

    // ── Export ──────────────────────────────────────────────────────────

    /// Flattened page, or `None` when no background was ever loaded.
    pub fn export(&self) -> Option<RgbaImage> {
        let Some(bg) = self.background.image() else {
            debug!("export skipped: no background image");
            return None;
        };
        Some(export::composite(
            self.size,
            Some(bg.rgba()),
            &self.freehand,
            self.overlay.history().as_slice(),
        ))
    }

    /// Writes the export to `path`. Returns `Ok(false)` when there was
    /// nothing to export.
    pub fn save_png(&self, path: &Path) -> anyhow::Result<bool> {
        let Some(img) = self.export() else {
            return Ok(false);
        };
        export::write_png(path, &img)?;
        info!("exported {}", path.display());
        Ok(true)
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn history(&self) -> &AnnotationHistory {
        self.overlay.history()
    }

    pub fn overlay(&self) -> &AnnotationOverlay {
        &self.overlay
    }

    pub fn freehand(&self) -> &F {
        &self.freehand
    }

    pub fn background(&self) -> &BackgroundManager {
        &self.background
    }
}

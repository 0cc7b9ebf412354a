use image::RgbaImage;
use tracing::debug;

use crate::history::AnnotationHistory;
use crate::model::{CanvasSize, LabelColor, Rectangle};
use crate::raster;

/// Line width of committed rectangles, on screen and in exports.
pub const COMMITTED_LINE_WIDTH: f32 = 2.0;
/// Line width of the rectangle being dragged out.
pub const PREVIEW_LINE_WIDTH: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        origin: (f32, f32),
        current: (f32, f32),
    },
}

/// The rectangle layer: committed history plus the raster it is drawn into.
pub struct AnnotationOverlay {
    size: CanvasSize,
    surface: RgbaImage,
    history: AnnotationHistory,
    drag: DragState,
    revision: u64,
}

impl AnnotationOverlay {
    pub fn new(size: CanvasSize) -> Self {
        Self {
            size,
            surface: raster::blank(size),
            history: AnnotationHistory::new(),
            drag: DragState::Idle,
            revision: 0,
        }
    }

    /// Reallocates the surface at `size` and redraws the history into it.
    pub fn provision(&mut self, size: CanvasSize) {
        self.size = size;
        self.surface = raster::blank(size);
        self.redraw();
    }

    pub fn begin(&mut self, pos: (f32, f32)) {
        self.drag = DragState::Dragging {
            origin: pos,
            current: pos,
        };
    }

    /// Redraws committed rectangles plus the in-progress one. Returns `false`
    /// when no drag is active.
    pub fn update(&mut self, pos: (f32, f32), color: LabelColor) -> bool {
        let DragState::Dragging { origin, .. } = self.drag else {
            return false;
        };
        self.drag = DragState::Dragging {
            origin,
            current: pos,
        };
        self.redraw();
        let preview = Rectangle::from_drag(origin, pos, color);
        raster::stroke_rect(&mut self.surface, &preview, PREVIEW_LINE_WIDTH);
        true
    }

    /// Commits the drag as a rectangle in `color`. No-op when idle.
    pub fn end(&mut self, pos: (f32, f32), color: LabelColor) -> Option<Rectangle> {
        let DragState::Dragging { origin, .. } = self.drag else {
            return None;
        };
        self.drag = DragState::Idle;
        let rect = Rectangle::from_drag(origin, pos, color);
        self.commit(rect);
        Some(rect)
    }

    /// Appends an already-built rectangle and redraws.
    pub fn commit(&mut self, rect: Rectangle) {
        debug!(?rect, "rectangle committed");
        self.history.push(rect);
        self.redraw();
    }

    /// Pointer left the surface mid-drag; commits exactly like `end`.
    pub fn leave(&mut self, pos: (f32, f32), color: LabelColor) -> Option<Rectangle> {
        self.end(pos, color)
    }

    /// Clears the surface and strokes every committed rectangle in order.
    pub fn redraw(&mut self) {
        raster::clear(&mut self.surface);
        raster::stroke_all(&mut self.surface, &self.history, COMMITTED_LINE_WIDTH);
        self.revision += 1;
    }

    pub fn undo(&mut self) -> Option<Rectangle> {
        let removed = self.history.undo()?;
        self.redraw();
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.drag = DragState::Idle;
        raster::clear(&mut self.surface);
        self.revision += 1;
    }

    pub fn history(&self) -> &AnnotationHistory {
        &self.history
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

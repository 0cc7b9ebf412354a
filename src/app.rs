use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui;
use tracing::{debug, info, warn};

use crate::background::{DecodeJob, DecodeOutcome};
use crate::export::EXPORT_FILE_NAME;
use crate::freehand::FreehandSurface;
use crate::model::LabelColor;
use crate::page::{AnnotationPage, PageSettings};
use crate::raster;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

// ── Tool / Interaction State ────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
enum Tool {
    Rectangle,
    Brush,
}

/// GPU copy of one layer, re-uploaded only when the layer's revision moves.
#[derive(Default)]
struct LayerTexture {
    handle: Option<egui::TextureHandle>,
    revision: Option<u64>,
}

impl LayerTexture {
    fn sync(
        &mut self,
        ctx: &egui::Context,
        name: &str,
        revision: u64,
        options: egui::TextureOptions,
        image: impl FnOnce() -> egui::ColorImage,
    ) {
        if self.handle.is_some() && self.revision == Some(revision) {
            return;
        }
        let image = image();
        match self.handle.as_mut() {
            Some(handle) => handle.set(image, options),
            None => self.handle = Some(ctx.load_texture(name, image, options)),
        }
        self.revision = Some(revision);
    }

    fn paint(&self, painter: &egui::Painter, rect: egui::Rect) {
        if let Some(ref tex) = self.handle {
            painter.image(
                tex.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
    }
}

// ── App ─────────────────────────────────────────────────────────────────────

pub struct AnnotateApp {
    page: AnnotationPage,
    tool: Tool,

    decode_tx: Sender<DecodeOutcome>,
    decode_rx: Receiver<DecodeOutcome>,
    background_revision: u64,

    background_tex: LayerTexture,
    freehand_tex: LayerTexture,
    overlay_tex: LayerTexture,

    // pan & zoom
    pan: egui::Vec2,
    zoom: f32,
    panning: bool,
}

impl AnnotateApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: PageSettings,
        image_path: Option<PathBuf>,
    ) -> Self {
        let (decode_tx, decode_rx) = mpsc::channel();
        let mut app = Self {
            page: AnnotationPage::new(settings),
            tool: Tool::Rectangle,
            decode_tx,
            decode_rx,
            background_revision: 0,
            background_tex: LayerTexture::default(),
            freehand_tex: LayerTexture::default(),
            overlay_tex: LayerTexture::default(),
            pan: egui::Vec2::ZERO,
            zoom: 1.0,
            panning: false,
        };
        if let Some(path) = image_path {
            app.load_path(&cc.egui_ctx, path);
        }
        app
    }

    fn upload(&mut self, ctx: &egui::Context) {
        let picked = rfd::FileDialog::new()
            .add_filter("Image", IMAGE_EXTENSIONS)
            .pick_file();
        if let Some(path) = picked {
            self.load_path(ctx, path);
        }
    }

    fn load_path(&mut self, ctx: &egui::Context, path: PathBuf) {
        info!("loading background {}", path.display());
        if let Some(job) = self.page.begin_background_load_path(&path) {
            self.spawn_decode(ctx, job);
        }
    }

    fn spawn_decode(&self, ctx: &egui::Context, job: DecodeJob) {
        let tx = self.decode_tx.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let outcome = job.run();
            if tx.send(outcome).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    fn poll_decodes(&mut self) {
        while let Ok(outcome) = self.decode_rx.try_recv() {
            if self.page.apply_decode(outcome) {
                self.background_revision += 1;
                self.pan = egui::Vec2::ZERO;
                self.zoom = 1.0;
            }
        }
    }

    fn save(&self) {
        if !self.page.background().is_set() {
            debug!("save ignored: no background image");
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(EXPORT_FILE_NAME)
            .add_filter("PNG", &["png"])
            .save_file()
        else {
            return;
        };
        if let Err(err) = self.page.save_png(&path) {
            warn!("export failed: {err:#}");
        }
    }

    fn sync_textures(&mut self, ctx: &egui::Context) {
        let page = &self.page;
        if let Some(bg) = page.background().image() {
            self.background_tex.sync(
                ctx,
                "background",
                self.background_revision,
                egui::TextureOptions::LINEAR,
                || raster::to_color_image(bg.rgba()),
            );
        }
        self.freehand_tex.sync(
            ctx,
            "freehand",
            page.freehand().revision(),
            egui::TextureOptions::NEAREST,
            || raster::to_color_image(&page.freehand().rasterize()),
        );
        self.overlay_tex.sync(
            ctx,
            "overlay",
            page.overlay().revision(),
            egui::TextureOptions::NEAREST,
            || raster::to_color_image(page.overlay().surface()),
        );
    }

    fn canvas_size_vec(&self) -> egui::Vec2 {
        self.page.size().to_vec2()
    }

    /// Convert canvas-space coords to screen-space
    fn canvas_to_screen(&self, panel: egui::Rect, pos: egui::Pos2) -> egui::Pos2 {
        panel.center() + self.pan + (pos.to_vec2() - self.canvas_size_vec() * 0.5) * self.zoom
    }

    /// Convert screen-space coords to canvas-space
    fn screen_to_canvas(&self, panel: egui::Rect, screen_pos: egui::Pos2) -> (f32, f32) {
        let rel = screen_pos - panel.center() - self.pan;
        let size = self.canvas_size_vec();
        (rel.x / self.zoom + size.x * 0.5, rel.y / self.zoom + size.y * 0.5)
    }

    fn canvas_rect_on_screen(&self, panel: egui::Rect) -> egui::Rect {
        egui::Rect::from_min_max(
            self.canvas_to_screen(panel, egui::Pos2::ZERO),
            self.canvas_to_screen(panel, self.canvas_size_vec().to_pos2()),
        )
    }

    fn handle_pointer(&mut self, ctx: &egui::Context, response: &egui::Response, panel: egui::Rect) {
        let surface = self.canvas_rect_on_screen(panel);
        let (origin, latest) = ctx.input(|i| (i.pointer.press_origin(), i.pointer.latest_pos()));

        if response.drag_started_by(egui::PointerButton::Primary) {
            if let Some(start) = origin.filter(|p| surface.contains(*p)) {
                let pos = self.screen_to_canvas(panel, start);
                match self.tool {
                    Tool::Rectangle => self.page.begin_rect(pos),
                    Tool::Brush => self.page.begin_stroke(pos),
                }
            }
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(current) = latest {
                let pos = self.screen_to_canvas(panel, current);
                match self.tool {
                    Tool::Rectangle if surface.contains(current) => {
                        self.page.update_rect(pos);
                    }
                    Tool::Rectangle => {
                        if self.page.overlay().is_dragging() {
                            self.page.leave_rect(pos);
                        }
                    }
                    Tool::Brush => self.page.extend_stroke(pos),
                }
            }
        }

        if response.drag_stopped_by(egui::PointerButton::Primary) {
            match self.tool {
                Tool::Rectangle => {
                    if let Some(end) = latest {
                        let pos = self.screen_to_canvas(panel, end);
                        self.page.end_rect(pos);
                    }
                }
                Tool::Brush => self.page.end_stroke(),
            }
        }
    }

    fn toolbar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            if ui.button("Upload Background Image").clicked() {
                self.upload(ctx);
            }
            ui.separator();
            for color in LabelColor::PALETTE {
                let selected = self.page.color() == color;
                let text = egui::RichText::new(color.label())
                    .color(color.to_egui())
                    .strong();
                if ui.selectable_label(selected, text).clicked() {
                    self.page.select_color(color);
                }
            }
            ui.separator();
            ui.selectable_value(&mut self.tool, Tool::Rectangle, "Rectangle");
            ui.selectable_value(&mut self.tool, Tool::Brush, "Brush");
            ui.separator();
            if ui.button("Clear").clicked() {
                self.page.clear();
            }
            if ui.button("Undo").clicked() {
                self.page.undo();
            }
            if ui.button("Save").clicked() {
                self.save();
            }
            ui.separator();
            let size = self.page.size();
            ui.label(format!(
                "{}x{}  Zoom: {:.0}%",
                size.width,
                size.height,
                self.zoom * 100.0
            ));
        });
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for AnnotateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_decodes();

        // Keyboard shortcuts
        let (undo, save) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(egui::Key::Z),
                i.modifiers.command && i.key_pressed(egui::Key::S),
            )
        });
        if undo {
            self.page.undo();
        }
        if save {
            AnnotateApp::save(self);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.toolbar(ctx, ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let panel = response.rect;

            // Handle pan (middle mouse button)
            let middle_down = ctx.input(|i| i.pointer.middle_down());
            if middle_down {
                self.pan += ctx.input(|i| i.pointer.delta());
                self.panning = true;
            } else {
                self.panning = false;
            }

            // Handle zoom (scroll wheel)
            let scroll_delta = ctx.input(|i| i.smooth_scroll_delta.y);
            if scroll_delta != 0.0 && response.hovered() {
                let zoom_factor = 1.0 + scroll_delta * 0.002;
                let new_zoom = (self.zoom * zoom_factor).clamp(0.1, 10.0);
                if let Some(cursor) = response.hover_pos() {
                    let cursor_rel = cursor - panel.center() - self.pan;
                    self.pan -= cursor_rel * (new_zoom / self.zoom - 1.0);
                }
                self.zoom = new_zoom;
            }

            if !self.panning {
                self.handle_pointer(ctx, &response, panel);
            }

            self.sync_textures(ctx);

            painter.rect_filled(panel, 0.0, egui::Color32::from_gray(40));
            let surface = self.canvas_rect_on_screen(panel);
            painter.rect_filled(surface, 0.0, egui::Color32::WHITE);
            self.background_tex.paint(&painter, surface);
            self.freehand_tex.paint(&painter, surface);
            self.overlay_tex.paint(&painter, surface);
        });
    }
}

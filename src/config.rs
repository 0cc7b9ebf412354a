use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::export::EXPORT_FILE_NAME;
use crate::freehand::BrushCanvas;
use crate::model::CanvasSize;
use crate::page::PageSettings;

/// Annotate an image with labelled rectangles and export it as PNG.
#[derive(Parser, Debug)]
#[command(name = "annotate-rects", version)]
pub struct Cli {
    /// Background image to open on startup.
    pub image: Option<PathBuf>,

    /// Canvas width before a background is loaded.
    #[arg(long, default_value_t = 300)]
    pub width: u32,

    /// Canvas height before a background is loaded.
    #[arg(long, default_value_t = 300)]
    pub height: u32,

    /// Freehand brush radius in pixels.
    #[arg(long, default_value_t = BrushCanvas::DEFAULT_RADIUS)]
    pub brush_radius: f32,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Composite rectangles onto an image without opening a window.
    Render {
        /// Background image.
        #[arg(short, long)]
        image: PathBuf,

        /// JSON array of rectangles: {startX, startY, width, height, color}.
        #[arg(short, long)]
        annotations: PathBuf,

        #[arg(short, long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,
    },
}

impl Cli {
    pub fn page_settings(&self) -> PageSettings {
        PageSettings {
            default_size: CanvasSize::new(self.width.max(1), self.height.max(1)),
            brush_radius: self.brush_radius.max(0.5),
        }
    }
}

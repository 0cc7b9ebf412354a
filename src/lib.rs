pub mod app;
pub mod background;
pub mod cli;
pub mod config;
pub mod export;
pub mod freehand;
pub mod history;
pub mod model;
pub mod overlay;
pub mod page;
pub mod raster;

pub use history::AnnotationHistory;
pub use model::{CanvasSize, LabelColor, Rectangle};
pub use page::{AnnotationPage, PageSettings};

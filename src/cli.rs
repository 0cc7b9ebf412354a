//! Headless rendering: background + rectangle list → PNG, no window.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context};
use tracing::{error, info};

use crate::history::AnnotationHistory;
use crate::page::{AnnotationPage, PageSettings};

pub fn run_render(image: &Path, annotations: &Path, output: &Path) -> ExitCode {
    match render(image, annotations, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("render failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

pub fn render(image: &Path, annotations: &Path, output: &Path) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(image).with_context(|| format!("reading {}", image.display()))?;
    let json = std::fs::read_to_string(annotations)
        .with_context(|| format!("reading {}", annotations.display()))?;
    let history = AnnotationHistory::from_json(&json)
        .with_context(|| format!("parsing {}", annotations.display()))?;

    let mut page = AnnotationPage::new(PageSettings::default());
    if !page.load_background_now(bytes) {
        bail!("{} is not a decodable image", image.display());
    }
    for rect in &history {
        page.add_rectangle(*rect);
    }

    page.save_png(output)?;
    info!(
        rectangles = history.len(),
        "rendered {} -> {}",
        image.display(),
        output.display()
    );
    Ok(())
}

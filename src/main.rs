use std::process::ExitCode;

use annotate_rects::app::AnnotateApp;
use annotate_rects::cli;
use annotate_rects::config::{Cli, Command};
use clap::Parser;
use eframe::egui;
use tracing::error;

fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,annotate_rects=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    setup_logging();
    let args = Cli::parse();

    if let Some(Command::Render {
        image,
        annotations,
        output,
    }) = &args.command
    {
        return cli::run_render(image, annotations, output);
    }

    let settings = args.page_settings();
    let title = match &args.image {
        Some(path) => format!(
            "annotate-rects: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        ),
        None => "annotate-rects".to_string(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title(&title),
        ..Default::default()
    };

    let image = args.image;
    let result = eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(AnnotateApp::new(cc, settings, image)))),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("failed to run window: {err}");
            ExitCode::FAILURE
        }
    }
}

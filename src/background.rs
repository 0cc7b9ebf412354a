use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use image::RgbaImage;
use tracing::{debug, warn};

use crate::model::CanvasSize;

/// A decoded background upload.
#[derive(Clone, Debug)]
pub struct BackgroundImage {
    rgba: RgbaImage,
    data_url: String,
}

impl BackgroundImage {
    /// Decodes `bytes`, guessing the format from content.
    pub fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
        let format = image::guess_format(bytes)?;
        let rgba = image::load_from_memory_with_format(bytes, format)?.to_rgba8();
        let data_url = format!(
            "data:{};base64,{}",
            format.to_mime_type(),
            general_purpose::STANDARD.encode(bytes)
        );
        Ok(Self { rgba, data_url })
    }

    /// Natural pixel size of the image.
    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.rgba.width(), self.rgba.height())
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.rgba
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

/// A pending decode, tagged with the generation it was requested under.
#[derive(Debug)]
pub struct DecodeJob {
    generation: u64,
    bytes: Vec<u8>,
}

impl DecodeJob {
    /// Decoding is self-contained, so jobs may run on any thread.
    pub fn run(self) -> DecodeOutcome {
        let image = match BackgroundImage::decode(&self.bytes) {
            Ok(img) => Some(img),
            Err(err) => {
                warn!(generation = self.generation, "background decode failed: {err}");
                None
            }
        };
        DecodeOutcome {
            generation: self.generation,
            image,
        }
    }
}

#[derive(Debug)]
pub struct DecodeOutcome {
    generation: u64,
    image: Option<BackgroundImage>,
}

#[derive(Debug, Default)]
pub struct BackgroundManager {
    current: Option<BackgroundImage>,
    generation: u64,
}

impl BackgroundManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load. Any job handed out earlier becomes stale.
    pub fn begin_load(&mut self, bytes: Vec<u8>) -> DecodeJob {
        self.generation += 1;
        debug!(generation = self.generation, len = bytes.len(), "background load requested");
        DecodeJob {
            generation: self.generation,
            bytes,
        }
    }

    /// Reads `path` and starts a load. Unreadable files are logged and ignored.
    pub fn begin_load_path(&mut self, path: &Path) -> Option<DecodeJob> {
        match std::fs::read(path) {
            Ok(bytes) => Some(self.begin_load(bytes)),
            Err(err) => {
                warn!("cannot read {}: {err}", path.display());
                None
            }
        }
    }

    /// Installs a finished decode. Returns the new canvas size when the
    /// outcome is current and decoded successfully; stale or failed outcomes
    /// change nothing.
    pub fn complete(&mut self, outcome: DecodeOutcome) -> Option<CanvasSize> {
        if outcome.generation != self.generation {
            debug!(
                stale = outcome.generation,
                current = self.generation,
                "discarding stale background decode"
            );
            return None;
        }
        let image = outcome.image?;
        let size = image.size();
        self.current = Some(image);
        Some(size)
    }

    pub fn image(&self) -> Option<&BackgroundImage> {
        self.current.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.current.is_some()
    }
}

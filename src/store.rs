//! On-disk session storage: editor state as JSON, the canvas as PNG, and
//! page exports.
//!
//! ERROR HANDLING
//! ==============
//! A missing file is a fresh session, not an error. Anything else that goes
//! wrong is returned as a [`StoreError`]; the session logs it and keeps
//! running on in-memory state.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use canvas::persist::PersistedState;
use image::RgbaImage;
use tracing::{debug, warn};

use crate::config::Config;

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid state file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("image error on {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone)]
pub struct Store {
    state_path: PathBuf,
    canvas_path: PathBuf,
    export_dir: PathBuf,
}

impl Store {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            state_path: config.state_path.clone(),
            canvas_path: config.canvas_path.clone(),
            export_dir: config.export_dir.clone(),
        }
    }

    /// Saved editor state, or an empty seed when nothing was saved yet.
    pub fn load_state(&self) -> Result<PersistedState, StoreError> {
        let bytes = match std::fs::read(&self.state_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.state_path.display(), "no saved state; starting fresh");
                return Ok(PersistedState::default());
            }
            Err(source) => return Err(StoreError::Io { path: self.state_path.clone(), source }),
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Json { path: self.state_path.clone(), source })
    }

    pub fn save_state(&self, state: &PersistedState) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(state)
            .map_err(|source| StoreError::Json { path: self.state_path.clone(), source })?;
        write_atomic(&self.state_path, &json)
    }

    /// Saved canvas bitmap. `None` when there is none or its size does not
    /// match the canvas.
    pub fn load_canvas(&self, width: u32, height: u32) -> Result<Option<RgbaImage>, StoreError> {
        if !self.canvas_path.exists() {
            debug!(path = %self.canvas_path.display(), "no saved canvas; starting blank");
            return Ok(None);
        }
        let pixels = image::open(&self.canvas_path)
            .map_err(|source| StoreError::Image { path: self.canvas_path.clone(), source })?
            .to_rgba8();
        if pixels.dimensions() != (width, height) {
            warn!(
                path = %self.canvas_path.display(),
                found = ?pixels.dimensions(),
                expected = ?(width, height),
                "saved canvas has the wrong size; starting blank"
            );
            return Ok(None);
        }
        Ok(Some(pixels))
    }

    pub fn save_canvas(&self, pixels: &RgbaImage) -> Result<(), StoreError> {
        save_png(&self.canvas_path, pixels)
    }

    /// Write an export as `grid-<unix_secs>.png` and return its path.
    pub fn export(&self, pixels: &RgbaImage, unix_secs: u64) -> Result<PathBuf, StoreError> {
        std::fs::create_dir_all(&self.export_dir)
            .map_err(|source| StoreError::Io { path: self.export_dir.clone(), source })?;
        let path = self.export_dir.join(format!("grid-{unix_secs}.png"));
        save_png(&path, pixels)?;
        Ok(path)
    }
}

fn save_png(path: &Path, pixels: &RgbaImage) -> Result<(), StoreError> {
    pixels
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| StoreError::Image { path: path.to_path_buf(), source })
}

/// Write through a sibling temp file so a crash never leaves half a file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes).map_err(|source| StoreError::Io { path: tmp.clone(), source })?;
    std::fs::rename(&tmp, path).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })
}

//! # File-Level Encoding
//!
//! [`ImageCypher`] wraps [`CypherCore`] with path validation, image file I/O
//! and cleanup of partially written outputs.
//!
//! ## Output cleanup
//!
//! The output path is recorded in an [`OutputGuard`] right before the encoder
//! starts writing and cleared once the write returns successfully. If the
//! function exits early while the guard still holds a path, its `Drop`
//! removes the file, so a failed run never leaves a half-written image that
//! looks like a result.

use log::{error, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::common::config::CypherConfig;
use crate::common::error::Result;
use crate::common::paths::{ImagePath, PathMode};
use crate::cypher::core::CypherCore;
use crate::processing::image_io::{load_pixels, save_pixels};

/// Encodes messages into image files and decodes them back.
#[derive(Debug, Clone, Default)]
pub struct ImageCypher {
    core: CypherCore,
}

impl ImageCypher {
    pub fn new(core: CypherCore) -> Self {
        Self { core }
    }

    pub fn from_config(config: &CypherConfig) -> Self {
        Self::new(CypherCore::from_config(config))
    }

    pub fn core(&self) -> &CypherCore {
        &self.core
    }

    /// Encrypt `message` and hide it in a copy of `image_path`, written to
    /// `output_path`.
    ///
    /// # Arguments
    /// - `image_path`: Existing carrier image (png, jpg, jpeg or bmp)
    /// - `message`: Text to hide
    /// - `output_path`: Where the encoded image goes; the extension picks the
    ///   format and should be lossless (png or bmp)
    /// - `password`: Password the message is sealed with
    ///
    /// # Returns
    /// - `Ok(ImagePath)`: The resolved output path
    /// - `Err`: Validation, path, capacity, image or I/O failure. No output
    ///   file is left behind by a failed write.
    ///
    /// # Example
    /// ```ignore
    /// let cypher = ImageCypher::default();
    /// cypher.encode_file("cat.png", "the eagle has landed", "cat_out.png", "pw")?;
    /// ```
    pub fn encode_file(
        &self,
        image_path: impl AsRef<Path>,
        message: &str,
        output_path: impl AsRef<Path>,
        password: &str,
    ) -> Result<ImagePath> {
        self.core.validate_message(message)?;
        let input = ImagePath::validate(image_path, PathMode::MustExist)?;
        let output = ImagePath::validate(output_path, PathMode::MayCreate)?;

        if output.is_lossy() {
            warn!(
                "⚠️  {} uses a lossy format: the hidden message will not survive compression",
                output.as_path().display()
            );
        }

        info!("📤 Hiding message in {}", input.as_path().display());
        let pixels = load_pixels(input.as_path())?;
        let stego = self.core.hide_message(pixels, message, password)?;

        let mut guard = OutputGuard::new();
        guard.arm(output.as_path());
        save_pixels(&stego, output.as_path())?;
        guard.commit();

        info!("✅ Encoded image written to {}", output.as_path().display());
        Ok(output)
    }

    /// Recover the message hidden in `image_path`.
    ///
    /// # Errors
    /// Path and image errors from loading, then
    /// [`NoHiddenMessage`](crate::common::error::CypherError::NoHiddenMessage)
    /// or [`Authentication`](crate::common::error::CypherError::Authentication)
    /// from the core.
    pub fn decode_file(&self, image_path: impl AsRef<Path>, password: &str) -> Result<String> {
        let input = ImagePath::validate(image_path, PathMode::MustExist)?;
        info!("📥 Reading hidden message from {}", input.as_path().display());

        let pixels = load_pixels(input.as_path())?;
        self.core.reveal_message(&pixels, password)
    }
}

/// Removes a pending output file unless the write was committed.
#[derive(Debug, Default)]
struct OutputGuard {
    pending: Option<PathBuf>,
}

impl OutputGuard {
    fn new() -> Self {
        Self { pending: None }
    }

    /// Mark `path` as about to be written.
    fn arm(&mut self, path: &Path) {
        self.pending = Some(path.to_path_buf());
    }

    /// The write finished; keep the file.
    fn commit(&mut self) {
        self.pending = None;
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        let Some(path) = self.pending.take() else {
            return;
        };

        match fs::remove_file(&path) {
            Ok(()) => warn!("🧹 Removed partial output {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => error!(
                "❌ Failed to remove partial output {}: {}",
                path.display(),
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_guard_removes_uncommitted_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.png");
        fs::write(&path, b"half an image").unwrap();

        {
            let mut guard = OutputGuard::new();
            guard.arm(&path);
        }

        assert!(!path.exists());
    }

    #[test]
    fn test_guard_keeps_committed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("done.png");
        fs::write(&path, b"complete").unwrap();

        {
            let mut guard = OutputGuard::new();
            guard.arm(&path);
            guard.commit();
        }

        assert!(path.exists());
    }

    #[test]
    fn test_unarmed_guard_touches_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("existing.png");
        fs::write(&path, b"keep me").unwrap();

        drop(OutputGuard::new());
        assert!(path.exists());
    }

    #[test]
    fn test_guard_tolerates_missing_file() {
        let dir = tempdir().unwrap();
        let mut guard = OutputGuard::default();
        guard.arm(&dir.path().join("never-created.png"));
        drop(guard);
    }
}

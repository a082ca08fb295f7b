//! # Image Path Validation
//!
//! Every path handed to the library is normalized once, at the boundary, into
//! an [`ImagePath`]: absolute, with one of the recognized image extensions,
//! and (for inputs) pointing at an existing regular file.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::error::{CypherError, Result};

/// Extensions accepted for both input and output images (lowercase).
pub const ALLOWED_IMAGE_FORMATS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Extensions whose encoders are lossy; hidden data does not survive them.
const LOSSY_FORMATS: [&str; 2] = ["jpg", "jpeg"];

/// How strictly a path is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMode {
    /// The path must name an existing regular file (carrier inputs).
    MustExist,
    /// The file may or may not exist yet (encoded outputs).
    MayCreate,
}

/// A validated, absolute path to an image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePath(PathBuf);

impl ImagePath {
    /// Resolve and validate `raw`.
    ///
    /// # Arguments
    /// - `raw`: Any path-like value, relative paths resolve against the
    ///   current directory
    /// - `mode`: Whether the file must already exist
    ///
    /// # Errors
    /// [`CypherError::Path`] when the path is empty, cannot be resolved, is
    /// missing (in [`PathMode::MustExist`]) or has an unsupported extension.
    ///
    /// # Example
    /// ```ignore
    /// let input = ImagePath::validate("holiday.png", PathMode::MustExist)?;
    /// ```
    pub fn validate(raw: impl AsRef<Path>, mode: PathMode) -> Result<Self> {
        let raw = raw.as_ref();
        let path = resolve(raw)?;

        if mode == PathMode::MustExist && !path.is_file() {
            return Err(CypherError::Path(format!(
                "the file {} does not exist",
                raw.display()
            )));
        }

        match extension_of(&path) {
            Some(ext) if ALLOWED_IMAGE_FORMATS.contains(&ext.as_str()) => Ok(Self(path)),
            _ => Err(CypherError::Path(format!(
                "unsupported file format for {}. Accepted formats: {}",
                raw.display(),
                ALLOWED_IMAGE_FORMATS.join(", ")
            ))),
        }
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// True for JPEG outputs, which destroy LSB data on save.
    pub fn is_lossy(&self) -> bool {
        extension_of(&self.0)
            .map(|ext| LOSSY_FORMATS.contains(&ext.as_str()))
            .unwrap_or(false)
    }
}

impl AsRef<Path> for ImagePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
}

/// Make `raw` absolute, following symlinks for whatever part already exists.
fn resolve(raw: &Path) -> Result<PathBuf> {
    if raw.as_os_str().is_empty() {
        return Err(CypherError::Path("empty path".to_string()));
    }

    let absolute = if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| CypherError::Path(format!("cannot resolve {}: {}", raw.display(), e)))?
            .join(raw)
    };

    if let Ok(canonical) = fs::canonicalize(&absolute) {
        return Ok(canonical);
    }

    // Not created yet: canonicalize the parent directory if it exists.
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => match fs::canonicalize(parent) {
            Ok(parent) => Ok(parent.join(name)),
            Err(_) => Ok(absolute),
        },
        _ => Err(CypherError::Path(format!(
            "cannot resolve {}",
            raw.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_existing_png_accepted() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("carrier.png");
        fs::write(&file, b"not really a png").unwrap();

        let validated = ImagePath::validate(&file, PathMode::MustExist).unwrap();
        assert!(validated.as_path().is_absolute());
        assert!(validated.as_path().ends_with("carrier.png"));
    }

    #[test]
    fn test_missing_input_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("absent.png");

        let err = ImagePath::validate(&file, PathMode::MustExist).unwrap_err();
        assert!(matches!(err, CypherError::Path(_)));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("folder.png");
        fs::create_dir(&sub).unwrap();

        assert!(ImagePath::validate(&sub, PathMode::MustExist).is_err());
    }

    #[test]
    fn test_output_may_not_exist_yet() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("out.BMP");

        let validated = ImagePath::validate(&file, PathMode::MayCreate).unwrap();
        assert!(validated.as_path().ends_with("out.BMP"));
        assert!(!validated.is_lossy());
    }

    #[test]
    fn test_extension_checked_in_both_modes() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, b"hello").unwrap();

        assert!(ImagePath::validate(&file, PathMode::MustExist).is_err());
        assert!(ImagePath::validate(&file, PathMode::MayCreate).is_err());
        assert!(ImagePath::validate(dir.path().join("noext"), PathMode::MayCreate).is_err());
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!(
            ImagePath::validate("", PathMode::MayCreate),
            Err(CypherError::Path(_))
        ));
    }

    #[test]
    fn test_jpeg_is_lossy() {
        let jpg = ImagePath::validate("/tmp/photo.JPG", PathMode::MayCreate).unwrap();
        let jpeg = ImagePath::validate("/tmp/photo.jpeg", PathMode::MayCreate).unwrap();
        let png = ImagePath::validate("/tmp/photo.png", PathMode::MayCreate).unwrap();
        assert!(jpg.is_lossy());
        assert!(jpeg.is_lossy());
        assert!(!png.is_lossy());
    }
}

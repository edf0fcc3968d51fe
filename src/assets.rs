//! Loading of the fixed image set the guide embeds.
//!
//! The document always uses the same five files: the cover photo and one
//! product shot per card.  They are read once, up front, so a missing file
//! aborts the run before any rendering happens.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use log::debug;

/// Environment variable overriding the image directory.
pub const IMAGES_DIR_ENV: &str = "LEADMAGNET_IMAGES_DIR";

/// File name of the cover photo.
pub const COVER_FILE: &str = "cover.jpg";

/// File names of the product shots, in card order.
pub const PRODUCT_FILES: [&str; 4] = [
    "img_coral_mine.png",
    "img_h500.png",
    "img_assimilator.png",
    "img_lecithin.png",
];

/// Raw bytes of every image the guide embeds.
#[derive(Clone, Debug)]
pub struct GuideImages {
    /// Cover photo (`cover.jpg`).
    pub cover: Vec<u8>,
    /// CORAL-MINE product shot.
    pub coral_mine: Vec<u8>,
    /// H-500 product shot.
    pub h500: Vec<u8>,
    /// ASSIMILATOR product shot.
    pub assimilator: Vec<u8>,
    /// CORAL LECITHIN product shot.
    pub lecithin: Vec<u8>,
}

impl GuideImages {
    /// Loads the image set from the first directory that carries all of it.
    ///
    /// Candidates, in order: `LEADMAGNET_IMAGES_DIR`, `assets/images` next to
    /// the executable, `assets/images` under the crate manifest, and the
    /// current working directory (where the images historically lived).
    pub fn load() -> Result<Self, Error> {
        let directory = resolve_image_directory()?;
        Self::load_from(&directory)
    }

    /// Loads the image set from an explicit directory.
    pub fn load_from(directory: impl AsRef<Path>) -> Result<Self, Error> {
        let directory = directory.as_ref();
        debug!("Loading guide images from {}", directory.display());

        let [coral_mine, h500, assimilator, lecithin] = PRODUCT_FILES;
        Ok(Self {
            cover: read_image(directory, COVER_FILE)?,
            coral_mine: read_image(directory, coral_mine)?,
            h500: read_image(directory, h500)?,
            assimilator: read_image(directory, assimilator)?,
            lecithin: read_image(directory, lecithin)?,
        })
    }
}

fn read_image(directory: &Path, name: &str) -> Result<Vec<u8>, Error> {
    let path = directory.join(name);
    fs::read(&path).map_err(|err| {
        Error::new(
            format!("Failed to read guide image {}", path.display()),
            err,
        )
    })
}

fn image_directory_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    if let Some(value) = env::var_os(IMAGES_DIR_ENV) {
        let path = PathBuf::from(value);
        if !path.as_os_str().is_empty() {
            candidates.push(path);
        }
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/images");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/images");
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates.push(PathBuf::from("."));

    candidates
}

fn missing_image_files(directory: &Path) -> Vec<&'static str> {
    std::iter::once(COVER_FILE)
        .chain(PRODUCT_FILES)
        .filter(|name| !directory.join(name).is_file())
        .collect()
}

fn resolve_image_directory() -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in image_directory_candidates() {
        if !candidate.is_dir() {
            attempts.push(format!("{} (directory missing)", candidate.display()));
            continue;
        }

        let missing = missing_image_files(&candidate);
        if missing.is_empty() {
            return Ok(candidate);
        }

        attempts.push(format!(
            "{} (missing files [{}])",
            candidate.display(),
            missing.join(", ")
        ));
    }

    Err(Error::new(
        format!(
            "Unable to locate the guide images. Checked: {}. \
             See assets/images/README.md or set {}.",
            attempts.join(", "),
            IMAGES_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "guide images not found"),
    ))
}

/// Reports whether any candidate directory carries the complete image set.
pub fn images_available() -> bool {
    resolve_image_directory().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_missing_directory_names_the_file() {
        let err = GuideImages::load_from("/nonexistent/images").unwrap_err();
        assert!(err.to_string().contains(COVER_FILE));
    }

    #[test]
    fn missing_file_report_covers_the_full_set() {
        let missing = missing_image_files(Path::new("/nonexistent/images"));
        assert_eq!(missing.len(), 1 + PRODUCT_FILES.len());
        assert!(missing.contains(&COVER_FILE));
    }
}

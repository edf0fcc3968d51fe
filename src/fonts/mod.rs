//! Font loading for the lead magnet.
//!
//! The document is Russian-language, so the bundled family must cover the
//! Cyrillic range; Roboto does.  Resolution prefers an explicit
//! `LEADMAGNET_FONTS_DIR`, then `assets/fonts` next to the executable, then
//! `assets/fonts` under the crate manifest.  On Windows the system Arial
//! family (which also carries Cyrillic) is used as a last resort.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, FontData, FontFamily};
use log::warn;

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable overriding the bundled font directory.
pub const FONTS_DIR_ENV: &str = "LEADMAGNET_FONTS_DIR";

/// Environment variable overriding the Windows fallback font directory.
pub const WINDOWS_FONTS_DIR_ENV: &str = "LEADMAGNET_WINDOWS_FONTS_DIR";

const FONT_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

// (file name, human-readable style) for the Arial fallback on Windows.
const WINDOWS_FONT_FILES: [(&str, &str); 4] = [
    ("arial.ttf", "regular"),
    ("arialbd.ttf", "bold"),
    ("ariali.ttf", "italic"),
    ("arialbi.ttf", "bold italic"),
];

const WINDOWS_FALLBACK_FAMILY_NAME: &str = "Arial";

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        candidates.push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn reject_reason(candidate: &Path) -> Option<String> {
    if !candidate.is_dir() {
        return Some("directory missing".to_owned());
    }

    let missing: Vec<&str> = FONT_FILES
        .iter()
        .copied()
        .filter(|name| !candidate.join(name).is_file())
        .collect();

    if missing.is_empty() {
        None
    } else {
        Some(format!("missing files [{}]", missing.join(", ")))
    }
}

fn resolve_font_directory() -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        match reject_reason(&candidate) {
            None => return Ok(candidate),
            Some(reason) => attempts.push(format!("{} ({})", candidate.display(), reason)),
        }
    }

    let summary = if attempts.is_empty() {
        "no search paths were available".to_owned()
    } else {
        attempts.join(", ")
    };

    Err(Error::new(
        format!(
            "Unable to locate the bundled font directory. Checked: {}. \
             See assets/fonts/README.md or set {}.",
            summary, FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "bundled fonts directory not found"),
    ))
}

fn load_bundled_font_family() -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory()?;

    fonts::from_files(&directory, DEFAULT_FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                DEFAULT_FONT_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn windows_font_directory() -> Option<PathBuf> {
    if let Some(path) = env_path(WINDOWS_FONTS_DIR_ENV) {
        return Some(path);
    }

    #[cfg(windows)]
    {
        for var in ["WINDIR", "SystemRoot"] {
            if let Some(root) = env_path(var) {
                let candidate = root.join("Fonts");
                if candidate.is_dir() {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

fn load_windows_font(directory: &Path, file: &str, style: &str) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, None).map_err(|err| {
        let io_kind = if path.is_file() {
            io::ErrorKind::Other
        } else {
            io::ErrorKind::NotFound
        };
        Error::new(
            format!(
                "Failed to load Windows fallback {} font at {}: {}",
                style,
                path.display(),
                err
            ),
            io::Error::new(io_kind, err.to_string()),
        )
    })
}

fn windows_fallback_font_family() -> Result<FontFamily<FontData>, Error> {
    let directory = windows_font_directory().ok_or_else(|| {
        Error::new(
            "Windows font directory not found for fallback",
            io::Error::new(io::ErrorKind::NotFound, "windows fonts directory not found"),
        )
    })?;

    let [regular, bold, italic, bold_italic] = WINDOWS_FONT_FILES;
    Ok(FontFamily {
        regular: load_windows_font(&directory, regular.0, regular.1)?,
        bold: load_windows_font(&directory, bold.0, bold.1)?,
        italic: load_windows_font(&directory, italic.0, italic.1)?,
        bold_italic: load_windows_font(&directory, bold_italic.0, bold_italic.1)?,
    })
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Returns the bundled Roboto family, falling back to Windows Arial when the
/// bundled fonts are missing.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    match load_bundled_font_family() {
        Ok(family) => Ok(family),
        Err(err) if fonts_missing(&err) => match windows_fallback_font_family() {
            Ok(fallback) => {
                warn!(
                    "Bundled fonts unavailable ({}); falling back to Windows '{}' family.",
                    err, WINDOWS_FALLBACK_FAMILY_NAME
                );
                Ok(fallback)
            }
            Err(fallback_err) => {
                warn!(
                    "Bundled fonts unavailable ({}); Windows fallback failed: {}",
                    err, fallback_err
                );
                Err(Error::new(
                    format!(
                        "Bundled fonts unavailable and Windows fallback failed: {}",
                        fallback_err
                    ),
                    io::Error::new(io::ErrorKind::NotFound, "default fonts are not available"),
                ))
            }
        },
        Err(err) => Err(err),
    }
}

/// Reports whether a complete bundled font directory can be resolved.
pub fn default_fonts_available() -> bool {
    resolve_font_directory().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_reason_names_missing_directory() {
        let reason =
            reject_reason(Path::new("/nonexistent/fonts")).expect("missing directory is rejected");
        assert!(reason.contains("directory missing"));
    }

    #[test]
    fn candidate_list_is_deduplicated() {
        let candidates = font_directory_candidates();
        for (index, candidate) in candidates.iter().enumerate() {
            assert!(!candidates[index + 1..].contains(candidate));
        }
    }
}
